//! Operation dispatch
//!
//! `OperationFrame` is the closed set of operation kinds. It wraps each
//! handler with the work every kind shares: loading the source account,
//! isolating `apply` in a child ledger txn, marking the outcome meter and
//! logging the outcome.

use tally_core::{
    AccountId, Operation, OperationBody, OperationEffect, OperationResult, OperationType,
    ReservePolicy, TallyResult,
};
use tally_state::{LedgerTxn, LedgerView};
use tracing::{debug, warn};

use crate::{CreateAccountOpFrame, OperationContext, OperationError, OperationHandler};

/// One operation of a transaction, ready to validate and apply
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationFrame {
    CreateAccount(CreateAccountOpFrame),
}

impl OperationFrame {
    /// Bind a decoded operation to its effective source
    pub fn from_operation(op: &Operation, tx_source: AccountId) -> Self {
        let source = op.source_or(tx_source);
        match &op.body {
            OperationBody::CreateAccount(body) => {
                OperationFrame::CreateAccount(CreateAccountOpFrame::new(body.clone(), source))
            }
        }
    }

    fn handler(&self) -> &dyn OperationHandler {
        match self {
            OperationFrame::CreateAccount(frame) => frame,
        }
    }

    pub fn operation_type(&self) -> OperationType {
        self.handler().operation_type()
    }

    pub fn source_id(&self) -> AccountId {
        self.handler().source_id()
    }

    /// Stateless validation; marks the invalid meter on rejection
    pub fn check_valid(&self, ctx: &OperationContext<'_>) -> Result<(), OperationError> {
        let result = self.handler().check_valid();
        if let Err(e) = &result {
            self.record_failure(ctx, e);
        }
        result
    }

    /// Apply against `view`.
    ///
    /// The handler runs inside a child txn that is committed only on
    /// success. The child checks created accounts against the same reserve
    /// the handler decided with, and its commit restores `view` if a write
    /// fails, so `view` is untouched whenever an error is returned.
    pub fn apply(
        &self,
        ctx: &OperationContext<'_>,
        view: &mut dyn LedgerView,
    ) -> Result<OperationEffect, OperationError> {
        let handler = self.handler();
        let source_id = handler.source_id();

        let result = match view.load_account(&source_id) {
            None => Err(OperationError::NoAccount(source_id)),
            Some(mut source) => {
                let header = view.header().clone();
                let reserve: &dyn ReservePolicy = match ctx.reserve {
                    Some(reserve) => reserve,
                    None => &header,
                };

                let mut txn = LedgerTxn::new(view).with_reserve(reserve);
                match handler.apply(&mut txn, &mut source, reserve) {
                    Ok(effect) => txn.commit().map(|_| effect).map_err(OperationError::from),
                    Err(e) => {
                        txn.rollback();
                        Err(e)
                    }
                }
            }
        };

        match &result {
            Ok(effect) => {
                ctx.metrics.mark(handler.success_meter());
                debug!(
                    op = ?handler.operation_type(),
                    source = %source_id,
                    effect = ?effect,
                    "Operation applied"
                );
            }
            Err(e) => self.record_failure(ctx, e),
        }
        result
    }

    /// Validate then apply, reporting rejections as result codes.
    ///
    /// Only ledger faults come back as `Err`.
    pub fn run(
        &self,
        ctx: &OperationContext<'_>,
        view: &mut dyn LedgerView,
    ) -> TallyResult<OperationResult> {
        let outcome = self
            .check_valid(ctx)
            .and_then(|()| self.apply(ctx, view));
        match outcome {
            Ok(_) => Ok(self.handler().success_result()),
            Err(OperationError::Ledger(e)) => Err(e),
            Err(e) => Ok(e.result().unwrap_or(OperationResult::NoAccount)),
        }
    }

    fn record_failure(&self, ctx: &OperationContext<'_>, error: &OperationError) {
        match error.meter() {
            Some(meter) => {
                ctx.metrics.mark(meter);
                debug!(
                    op = ?self.operation_type(),
                    source = %self.source_id(),
                    outcome = %meter,
                    "Operation rejected"
                );
            }
            None => warn!(
                op = ?self.operation_type(),
                source = %self.source_id(),
                error = %error,
                "Operation aborted by ledger fault"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CreateAccountError, MetricsRegistry, CREATE_ACCOUNT_SUCCESS_METER, NO_ACCOUNT_METER,
    };
    use tally_core::{
        AccountEntry, CreateAccountResultCode, FlatReserve, OperationResultTr, ScriptHash,
        TallyError,
    };
    use tally_state::{LedgerConfig, LedgerState};

    fn root() -> AccountId {
        AccountId::from_seed(0)
    }

    fn genesis() -> LedgerState {
        LedgerState::genesis(LedgerConfig::local(), root())
    }

    fn create(dest: u64, amount: i64) -> OperationFrame {
        OperationFrame::from_operation(
            &Operation::create_account(AccountId::from_seed(dest), amount, ScriptHash::ZERO),
            root(),
        )
    }

    fn code(result: OperationResult) -> Option<CreateAccountResultCode> {
        match result {
            OperationResult::Inner(OperationResultTr::CreateAccount(c)) => Some(c),
            OperationResult::NoAccount => None,
        }
    }

    #[test]
    fn test_run_success_marks_meter() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let mut state = genesis();

        let result = create(1, 1000).run(&ctx, &mut state).unwrap();

        assert_eq!(code(result), Some(CreateAccountResultCode::Success));
        assert_eq!(metrics.count(CREATE_ACCOUNT_SUCCESS_METER), 1);
        assert_eq!(metrics.total(), 1);
        assert!(state.contains(&AccountId::from_seed(1)));
    }

    #[test]
    fn test_run_reports_malformed() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let mut state = genesis();

        let result = create(1, 0).run(&ctx, &mut state).unwrap();
        assert_eq!(code(result), Some(CreateAccountResultCode::Malformed));

        let self_create = OperationFrame::from_operation(
            &Operation::create_account(root(), 1000, ScriptHash::ZERO),
            root(),
        );
        let result = self_create.run(&ctx, &mut state).unwrap();
        assert_eq!(code(result), Some(CreateAccountResultCode::Malformed));

        assert_eq!(
            metrics.count(CreateAccountError::MalformedNegativeBalance.meter()),
            1
        );
        assert_eq!(
            metrics.count(CreateAccountError::MalformedSelfDestination.meter()),
            1
        );
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_run_missing_source_is_no_account() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let mut state = genesis();

        let op = Operation::create_account(AccountId::from_seed(2), 1000, ScriptHash::ZERO)
            .with_source(AccountId::from_seed(99));
        let frame = OperationFrame::from_operation(&op, root());
        assert_eq!(frame.source_id(), AccountId::from_seed(99));

        let result = frame.run(&ctx, &mut state).unwrap();
        assert_eq!(result, OperationResult::NoAccount);
        assert_eq!(metrics.count(NO_ACCOUNT_METER), 1);
    }

    #[test]
    fn test_context_reserve_overrides_header() {
        let metrics = MetricsRegistry::new();
        let reserve = FlatReserve(5000);
        let ctx = OperationContext::new(&metrics).with_reserve(&reserve);
        let mut state = genesis();

        let err = create(1, 1000).apply(&ctx, &mut state).unwrap_err();
        assert_eq!(err, OperationError::from(CreateAccountError::LowReserve));
        assert_eq!(metrics.count(CreateAccountError::LowReserve.meter()), 1);
    }

    #[test]
    fn test_operations_compose_in_one_txn() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let mut state = genesis();
        let total = state.total_balance();

        let mut txn = LedgerTxn::new(&mut state);
        create(1, 1000).apply(&ctx, &mut txn).unwrap();
        // sees the account created by the previous operation
        let err = create(1, 1000).apply(&ctx, &mut txn).unwrap_err();
        assert_eq!(err, OperationError::from(CreateAccountError::AlreadyExists));

        // second account funded by the first
        let op = Operation::create_account(AccountId::from_seed(2), 300, ScriptHash::ZERO)
            .with_source(AccountId::from_seed(1));
        OperationFrame::from_operation(&op, root())
            .apply(&ctx, &mut txn)
            .unwrap();
        let delta = txn.commit().unwrap();

        assert_eq!(delta.created().count(), 2);
        assert_eq!(state.get(&AccountId::from_seed(1)).unwrap().balance, 700);
        assert_eq!(state.get(&AccountId::from_seed(2)).unwrap().balance, 300);
        assert_eq!(state.total_balance(), total);
    }

    /// View whose writes to one account always fail
    struct FaultyView {
        inner: LedgerState,
        broken: AccountId,
    }

    impl LedgerView for FaultyView {
        fn header(&self) -> &tally_state::LedgerHeader {
            self.inner.header()
        }

        fn load_account(&self, id: &AccountId) -> Option<AccountEntry> {
            self.inner.load_account(id)
        }

        fn put_account(&mut self, entry: AccountEntry) -> TallyResult<()> {
            if entry.account_id == self.broken {
                return Err(TallyError::AccountNotFound(entry.account_id));
            }
            self.inner.put_account(entry)
        }

        fn erase_account(&mut self, id: &AccountId) -> TallyResult<()> {
            self.inner.erase_account(id)
        }

        fn invariant_checks_enabled(&self) -> bool {
            self.inner.invariant_checks_enabled()
        }
    }

    #[test]
    fn test_ledger_fault_propagates_and_leaves_view_untouched() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let dest = AccountId::from_seed(1);
        let mut view = FaultyView {
            inner: genesis(),
            broken: root(),
        };
        let root_before = view.inner.get(&root()).cloned();

        let err = create(1, 1000).run(&ctx, &mut view).unwrap_err();

        assert_eq!(err, TallyError::AccountNotFound(root()));
        assert_eq!(view.inner.get(&root()).cloned(), root_before);
        assert!(!view.inner.contains(&dest));
        assert_eq!(metrics.total(), 0);
    }

    #[test]
    fn test_failed_destination_write_restores_source() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let dest = AccountId::from_seed(1);
        let mut view = FaultyView {
            inner: genesis(),
            broken: dest,
        };
        let root_before = view.inner.get(&root()).cloned();
        let total = view.inner.total_balance();

        let err = create(1, 1000).run(&ctx, &mut view).unwrap_err();

        assert_eq!(err, TallyError::AccountNotFound(dest));
        assert_eq!(view.inner.get(&root()).cloned(), root_before);
        assert!(!view.inner.contains(&dest));
        assert_eq!(view.inner.total_balance(), total);
        assert_eq!(metrics.total(), 0);
    }

    #[test]
    fn test_lower_context_reserve_allows_small_create() {
        let metrics = MetricsRegistry::new();
        let reserve = FlatReserve(10);
        let ctx = OperationContext::new(&metrics).with_reserve(&reserve);
        let mut state = genesis();
        assert!(state.header().minimum_balance(0) > 50);

        let result = create(1, 50).run(&ctx, &mut state).unwrap();

        assert_eq!(code(result), Some(CreateAccountResultCode::Success));
        assert_eq!(metrics.count(CREATE_ACCOUNT_SUCCESS_METER), 1);
        assert_eq!(metrics.total(), 1);
        assert_eq!(state.get(&AccountId::from_seed(1)).unwrap().balance, 50);
    }

    #[test]
    fn test_lower_context_reserve_inside_outer_txn() {
        let metrics = MetricsRegistry::new();
        let reserve = FlatReserve(10);
        let ctx = OperationContext::new(&metrics).with_reserve(&reserve);
        let mut state = genesis();

        let mut txn = LedgerTxn::new(&mut state).with_reserve(&reserve);
        create(1, 50).apply(&ctx, &mut txn).unwrap();
        create(2, 60).apply(&ctx, &mut txn).unwrap();
        let delta = txn.commit().unwrap();

        assert_eq!(delta.created().count(), 2);
        assert!(state.contains(&AccountId::from_seed(2)));
    }

    #[test]
    fn test_header_reserve_used_by_default() {
        let metrics = MetricsRegistry::new();
        let ctx = OperationContext::new(&metrics);
        let mut state = genesis();
        let min = state.header().minimum_balance(0);

        let result = create(1, min - 1).run(&ctx, &mut state).unwrap();
        assert_eq!(code(result), Some(CreateAccountResultCode::LowReserve));
        let result = create(1, min).run(&ctx, &mut state).unwrap();
        assert_eq!(code(result), Some(CreateAccountResultCode::Success));
    }
}
