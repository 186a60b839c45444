//! Ledger view contract
//!
//! Operations read and write ledger state only through this trait.
//! Implementations must reflect writes made earlier in the same round
//! (read-your-writes).

use tally_core::{AccountEntry, AccountId, SequenceNumber, TallyResult};

use crate::LedgerHeader;

/// Mutable working projection of ledger state
pub trait LedgerView {
    /// Header of the ledger being closed
    fn header(&self) -> &LedgerHeader;

    /// Look up an account, including uncommitted writes
    fn load_account(&self, id: &AccountId) -> Option<AccountEntry>;

    /// Create or update an account
    fn put_account(&mut self, entry: AccountEntry) -> TallyResult<()>;

    /// Remove an account created through this view.
    ///
    /// Only used to undo a partially applied commit.
    fn erase_account(&mut self, id: &AccountId) -> TallyResult<()>;

    /// Sequence number for accounts created in this round
    fn starting_sequence_number(&self) -> SequenceNumber {
        self.header().starting_sequence_number()
    }

    /// Whether commits into this view should run ledger invariants
    fn invariant_checks_enabled(&self) -> bool {
        false
    }

    fn account_exists(&self, id: &AccountId) -> bool {
        self.load_account(id).is_some()
    }
}
