//! Operation errors
//!
//! Rejections are deterministic semantic outcomes reported as result
//! codes. Ledger faults are failures of the surrounding machinery and
//! propagate to the caller as errors.

use tally_core::{AccountId, OperationResult, OperationResultTr, TallyError};
use thiserror::Error;

use crate::{CreateAccountError, MeterName};

/// Meter for operations whose source account is missing
pub const NO_ACCOUNT_METER: MeterName = MeterName::new("operation", "failure", "no-account");

/// Why an operation did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("create account rejected: {0}")]
    CreateAccount(#[from] CreateAccountError),

    #[error("source account {0} not found")]
    NoAccount(AccountId),

    #[error("ledger fault: {0}")]
    Ledger(#[from] TallyError),
}

impl OperationError {
    /// Result to report, or `None` for a ledger fault
    pub fn result(&self) -> Option<OperationResult> {
        match self {
            OperationError::CreateAccount(e) => Some(OperationResult::Inner(
                OperationResultTr::CreateAccount(e.code()),
            )),
            OperationError::NoAccount(_) => Some(OperationResult::NoAccount),
            OperationError::Ledger(_) => None,
        }
    }

    /// Meter marked for this outcome
    pub fn meter(&self) -> Option<MeterName> {
        match self {
            OperationError::CreateAccount(e) => Some(e.meter()),
            OperationError::NoAccount(_) => Some(NO_ACCOUNT_METER),
            OperationError::Ledger(_) => None,
        }
    }
}
