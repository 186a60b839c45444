//! Per-operation-kind contract

use tally_core::{
    AccountEntry, AccountId, OperationEffect, OperationResult, OperationType, ReservePolicy,
};
use tally_state::LedgerView;

use crate::{MeterName, OperationError};

/// Validate/apply contract every operation kind implements
pub trait OperationHandler {
    fn operation_type(&self) -> OperationType;

    /// Account that authorized the operation
    fn source_id(&self) -> AccountId;

    /// Stateless structural checks. Must not touch the ledger.
    fn check_valid(&self) -> Result<(), OperationError>;

    /// State-dependent application.
    ///
    /// Every failure path must leave `view` and `source` unmodified.
    fn apply(
        &self,
        view: &mut dyn LedgerView,
        source: &mut AccountEntry,
        reserve: &dyn ReservePolicy,
    ) -> Result<OperationEffect, OperationError>;

    /// Result reported on success
    fn success_result(&self) -> OperationResult;

    /// Meter marked on success
    fn success_meter(&self) -> MeterName;
}
