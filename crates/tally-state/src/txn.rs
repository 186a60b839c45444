//! Copy-on-write ledger transactions
//!
//! A [`LedgerTxn`] buffers writes on top of any parent [`LedgerView`].
//! Reads see the buffered writes first. Nothing reaches the parent until
//! [`LedgerTxn::commit`]; dropping or rolling back discards everything.
//! Because a txn is itself a `LedgerView`, txns nest: a transaction-level
//! txn can hold one child per operation.

use tally_core::{AccountEntry, AccountId, ReservePolicy, TallyError, TallyResult};
use tracing::{debug, warn};

use crate::{check_delta, EntryChange, LedgerDelta, LedgerHeader, LedgerView};

/// Buffered unit of work over a parent view
pub struct LedgerTxn<'a> {
    parent: &'a mut dyn LedgerView,
    header: LedgerHeader,
    delta: LedgerDelta,
    check_invariants: bool,
    /// Policy created accounts are checked against; the header when unset
    reserve: Option<&'a dyn ReservePolicy>,
}

impl<'a> LedgerTxn<'a> {
    /// Open a txn over `parent`, inheriting its invariant setting
    pub fn new(parent: &'a mut dyn LedgerView) -> Self {
        let header = parent.header().clone();
        let check_invariants = parent.invariant_checks_enabled();
        LedgerTxn {
            parent,
            delta: LedgerDelta::new(header.ledger_seq),
            header,
            check_invariants,
            reserve: None,
        }
    }

    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Check created accounts against `reserve` instead of the header.
    ///
    /// Nested txns do not inherit it.
    pub fn with_reserve(mut self, reserve: &'a dyn ReservePolicy) -> Self {
        self.reserve = Some(reserve);
        self
    }

    /// Changes buffered so far
    pub fn delta(&self) -> &LedgerDelta {
        &self.delta
    }

    /// Push buffered changes into the parent and return them.
    ///
    /// Invariants run before anything is written. If the parent rejects a
    /// write, the entries already written are restored, so on any error
    /// the parent is left as it was.
    pub fn commit(self) -> TallyResult<LedgerDelta> {
        if self.check_invariants {
            let reserve: &dyn ReservePolicy = match self.reserve {
                Some(reserve) => reserve,
                None => &self.header,
            };
            if let Err(e) = check_delta(&self.header, reserve, &self.delta) {
                warn!(error = %e, changes = self.delta.len(), "Commit rejected by ledger invariant");
                return Err(e);
            }
        }

        let LedgerTxn { parent, delta, .. } = self;
        let mut written: Vec<&EntryChange> = Vec::with_capacity(delta.len());
        for change in delta.changes() {
            if let Err(e) = parent.put_account(change.current().clone()) {
                warn!(
                    error = %e,
                    account = %change.account_id(),
                    written = written.len(),
                    "Commit write failed, restoring parent"
                );
                restore(parent, &written);
                return Err(e);
            }
            written.push(change);
        }

        debug!(
            ledger_seq = delta.ledger_seq(),
            changes = delta.len(),
            "Ledger txn committed"
        );
        Ok(delta)
    }

    /// Discard buffered changes
    pub fn rollback(self) {
        debug!(
            ledger_seq = self.delta.ledger_seq(),
            changes = self.delta.len(),
            "Ledger txn rolled back"
        );
    }
}

/// Put back the parent's values for changes already written, newest first
fn restore(parent: &mut dyn LedgerView, written: &[&EntryChange]) {
    for change in written.iter().rev() {
        let restored = match change.previous() {
            Some(previous) => parent.put_account(previous.clone()),
            None => parent.erase_account(&change.account_id()),
        };
        if let Err(e) = restored {
            warn!(error = %e, account = %change.account_id(), "Could not restore account");
        }
    }
}

impl LedgerView for LedgerTxn<'_> {
    fn header(&self) -> &LedgerHeader {
        &self.header
    }

    fn load_account(&self, id: &AccountId) -> Option<AccountEntry> {
        match self.delta.get(id) {
            Some(entry) => Some(entry.clone()),
            None => self.parent.load_account(id),
        }
    }

    fn put_account(&mut self, entry: AccountEntry) -> TallyResult<()> {
        if entry.balance < 0 {
            return Err(TallyError::NegativeBalance {
                account: entry.account_id,
                balance: entry.balance,
            });
        }

        if let Some(previous) = self.delta.get(&entry.account_id).cloned() {
            self.delta.record_update(previous, entry);
        } else if let Some(previous) = self.parent.load_account(&entry.account_id) {
            self.delta.record_update(previous, entry);
        } else {
            self.delta.record_create(entry);
        }
        Ok(())
    }

    /// Only accounts created in this txn can be erased
    fn erase_account(&mut self, id: &AccountId) -> TallyResult<()> {
        let created_here = match self.delta.change(id) {
            Some(change) => change.is_created(),
            None if self.parent.account_exists(id) => false,
            None => return Err(TallyError::AccountNotFound(*id)),
        };
        if !created_here {
            return Err(TallyError::EraseCommitted(*id));
        }
        self.delta.discard(id);
        Ok(())
    }

    fn invariant_checks_enabled(&self) -> bool {
        self.check_invariants
    }
}
