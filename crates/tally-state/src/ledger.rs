//! Committed ledger state - the account set at the end of a round

use std::collections::HashMap;

use tally_core::{AccountEntry, AccountId, SequenceNumber, TallyError, TallyResult};
use tracing::debug;

use crate::{LedgerConfig, LedgerHeader, LedgerView};

/// Ledger state - accounts indexed by identity
#[derive(Debug)]
pub struct LedgerState {
    header: LedgerHeader,
    config: LedgerConfig,
    /// Accounts indexed by ID
    accounts: HashMap<AccountId, AccountEntry>,
}

impl LedgerState {
    /// Empty ledger at the configured genesis sequence
    pub fn new(config: LedgerConfig) -> Self {
        LedgerState {
            header: LedgerHeader::genesis(&config),
            config,
            accounts: HashMap::new(),
        }
    }

    /// Ledger whose root account holds every coin
    pub fn genesis(config: LedgerConfig, root: AccountId) -> Self {
        let mut state = LedgerState::new(config);
        let root_entry = AccountEntry::new(root, state.config.total_coins, SequenceNumber::ZERO);
        state.accounts.insert(root, root_entry);
        debug!(
            root = %root,
            total_coins = state.config.total_coins,
            ledger_seq = state.header.ledger_seq,
            "Ledger created from genesis"
        );
        state
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get an account by ID
    pub fn get(&self, id: &AccountId) -> Option<&AccountEntry> {
        self.accounts.get(id)
    }

    /// Check if an account exists
    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Get number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate over all accounts
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &AccountEntry)> {
        self.accounts.iter()
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> i128 {
        self.accounts.values().map(|a| a.balance as i128).sum()
    }

    /// Close the current round and move to the next ledger
    pub fn advance_ledger(&mut self) -> u32 {
        self.header = self.header.next();
        debug!(ledger_seq = self.header.ledger_seq, "Advanced ledger");
        self.header.ledger_seq
    }
}

impl LedgerView for LedgerState {
    fn header(&self) -> &LedgerHeader {
        &self.header
    }

    fn load_account(&self, id: &AccountId) -> Option<AccountEntry> {
        self.accounts.get(id).cloned()
    }

    fn put_account(&mut self, entry: AccountEntry) -> TallyResult<()> {
        if entry.balance < 0 {
            return Err(TallyError::NegativeBalance {
                account: entry.account_id,
                balance: entry.balance,
            });
        }
        self.accounts.insert(entry.account_id, entry);
        Ok(())
    }

    fn erase_account(&mut self, id: &AccountId) -> TallyResult<()> {
        match self.accounts.remove(id) {
            Some(_) => Ok(()),
            None => Err(TallyError::AccountNotFound(*id)),
        }
    }

    fn invariant_checks_enabled(&self) -> bool {
        self.config.check_invariants
    }
}
