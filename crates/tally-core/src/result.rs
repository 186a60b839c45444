//! Operation result codes
//!
//! These are the values handed to the transaction result aggregator.
//! Encoding them is the transaction codec's job.

use crate::{AccountId, OperationType};

/// Create-account result code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CreateAccountResultCode {
    Success = 0,
    /// Invalid starting balance or destination equals source
    Malformed = -1,
    /// Source cannot spare the starting balance
    Underfunded = -2,
    /// Starting balance below the reserve of a fresh account
    LowReserve = -3,
    /// Destination already exists
    AlreadyExist = -4,
}

impl CreateAccountResultCode {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(CreateAccountResultCode::Success),
            -1 => Some(CreateAccountResultCode::Malformed),
            -2 => Some(CreateAccountResultCode::Underfunded),
            -3 => Some(CreateAccountResultCode::LowReserve),
            -4 => Some(CreateAccountResultCode::AlreadyExist),
            _ => None,
        }
    }

    #[inline]
    pub fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == CreateAccountResultCode::Success
    }
}

/// Per-operation-kind result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationResultTr {
    CreateAccount(CreateAccountResultCode),
}

impl OperationResultTr {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationResultTr::CreateAccount(_) => OperationType::CreateAccount,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            OperationResultTr::CreateAccount(code) => code.is_success(),
        }
    }
}

/// Result of one operation as reported upward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationResult {
    /// The operation ran; inner code says how it went
    Inner(OperationResultTr),
    /// Source account was not present in the ledger
    NoAccount,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Inner(tr) => tr.is_success(),
            OperationResult::NoAccount => false,
        }
    }
}

/// State change produced by a successful apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationEffect {
    /// A new account was created
    Created(AccountId),
}
