//! Create-account operation
//!
//! Creates `destination` and funds it with `starting_balance` taken from
//! the source account. All checks run before the single mutating branch,
//! so every rejection leaves the ledger exactly as it found it.

use tally_core::{
    AccountEntry, AccountId, CreateAccountOp, CreateAccountResultCode, OperationEffect,
    OperationResult, OperationResultTr, OperationType, ReservePolicy, TallyError,
};
use tally_state::LedgerView;
use thiserror::Error;

use crate::{MeterName, OperationError, OperationHandler};

const METER_DOMAIN: &str = OperationType::CreateAccount.meter_prefix();

pub const CREATE_ACCOUNT_SUCCESS_METER: MeterName =
    MeterName::new(METER_DOMAIN, "success", "apply");

/// Ways a create-account operation can be rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateAccountError {
    #[error("starting balance must be positive")]
    MalformedNegativeBalance,

    #[error("destination equals source")]
    MalformedSelfDestination,

    #[error("destination account already exists")]
    AlreadyExists,

    #[error("starting balance below minimum reserve")]
    LowReserve,

    #[error("source cannot spare the starting balance")]
    Underfunded,
}

impl CreateAccountError {
    /// Result code reported for this rejection
    pub fn code(&self) -> CreateAccountResultCode {
        match self {
            CreateAccountError::MalformedNegativeBalance
            | CreateAccountError::MalformedSelfDestination => CreateAccountResultCode::Malformed,
            CreateAccountError::AlreadyExists => CreateAccountResultCode::AlreadyExist,
            CreateAccountError::LowReserve => CreateAccountResultCode::LowReserve,
            CreateAccountError::Underfunded => CreateAccountResultCode::Underfunded,
        }
    }

    /// Meter marked for this rejection
    pub fn meter(&self) -> MeterName {
        match self {
            CreateAccountError::MalformedNegativeBalance => {
                MeterName::new(METER_DOMAIN, "invalid", "malformed-negative-balance")
            }
            CreateAccountError::MalformedSelfDestination => {
                MeterName::new(METER_DOMAIN, "invalid", "malformed-destination-equals-source")
            }
            CreateAccountError::AlreadyExists => {
                MeterName::new(METER_DOMAIN, "failure", "already-exist")
            }
            CreateAccountError::LowReserve => MeterName::new(METER_DOMAIN, "failure", "low-reserve"),
            CreateAccountError::Underfunded => {
                MeterName::new(METER_DOMAIN, "failure", "underfunded")
            }
        }
    }

    /// Rejected by `check_valid` rather than `apply`
    pub fn is_malformed(&self) -> bool {
        self.code() == CreateAccountResultCode::Malformed
    }
}

/// Create-account operation bound to its source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountOpFrame {
    op: CreateAccountOp,
    source_id: AccountId,
}

impl CreateAccountOpFrame {
    pub fn new(op: CreateAccountOp, source_id: AccountId) -> Self {
        CreateAccountOpFrame { op, source_id }
    }

    pub fn op(&self) -> &CreateAccountOp {
        &self.op
    }

    /// Structural checks, in order: positive balance, then distinct destination
    pub fn validate(&self) -> Result<(), CreateAccountError> {
        if self.op.starting_balance <= 0 {
            return Err(CreateAccountError::MalformedNegativeBalance);
        }
        if self.op.destination == self.source_id {
            return Err(CreateAccountError::MalformedSelfDestination);
        }
        Ok(())
    }

    /// Decide the outcome against ledger state and, on success, move funds.
    ///
    /// The existence check comes first, then the new account's reserve,
    /// then the source's spare balance. Only after all three pass is
    /// anything written.
    pub fn apply_to(
        &self,
        view: &mut dyn LedgerView,
        source: &mut AccountEntry,
        reserve: &dyn ReservePolicy,
    ) -> Result<OperationEffect, OperationError> {
        let destination = self.op.destination;
        let starting_balance = self.op.starting_balance;

        if view.account_exists(&destination) {
            return Err(OperationError::CreateAccount(CreateAccountError::AlreadyExists));
        }

        if starting_balance < reserve.minimum_balance(0) {
            return Err(OperationError::CreateAccount(CreateAccountError::LowReserve));
        }

        // Against the source's current minimum, not its minimum after the debit
        let min_balance = reserve.minimum_balance_for(source);
        if source.balance.saturating_sub(min_balance) < starting_balance {
            return Err(OperationError::CreateAccount(CreateAccountError::Underfunded));
        }

        let mut debited = source.clone();
        if !debited.add_balance(-starting_balance) {
            return Err(TallyError::BalanceOverflow(source.account_id).into());
        }
        view.put_account(debited.clone())?;

        let created = AccountEntry::new(
            destination,
            starting_balance,
            view.starting_sequence_number(),
        )
        .with_script_hash(self.op.script_hash);
        view.put_account(created)?;

        *source = debited;
        Ok(OperationEffect::Created(destination))
    }
}

impl OperationHandler for CreateAccountOpFrame {
    fn operation_type(&self) -> OperationType {
        OperationType::CreateAccount
    }

    fn source_id(&self) -> AccountId {
        self.source_id
    }

    fn check_valid(&self) -> Result<(), OperationError> {
        self.validate().map_err(OperationError::from)
    }

    fn apply(
        &self,
        view: &mut dyn LedgerView,
        source: &mut AccountEntry,
        reserve: &dyn ReservePolicy,
    ) -> Result<OperationEffect, OperationError> {
        self.apply_to(view, source, reserve)
    }

    fn success_result(&self) -> OperationResult {
        OperationResult::Inner(OperationResultTr::CreateAccount(
            CreateAccountResultCode::Success,
        ))
    }

    fn success_meter(&self) -> MeterName {
        CREATE_ACCOUNT_SUCCESS_METER
    }
}
