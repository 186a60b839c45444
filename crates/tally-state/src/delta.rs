//! Change tracking for a ledger-close round
//!
//! [`LedgerDelta`] accumulates every account change made inside one
//! transactional unit. When several writes touch the same account they
//! are coalesced into the minimal diff against the state the unit
//! started from:
//!
//! - Create + Update = Create (with final value)
//! - Update + Update = Update (original previous, final current)
//! - Update + Update back to the original value = no change

use std::collections::HashMap;

use tally_core::{AccountEntry, AccountId};

/// A single change to an account entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChange {
    /// The account did not exist before this unit
    Created(AccountEntry),
    /// An existing account was modified
    Updated {
        previous: AccountEntry,
        current: Box<AccountEntry>,
    },
}

impl EntryChange {
    pub fn account_id(&self) -> AccountId {
        self.current().account_id
    }

    /// Value after the change
    pub fn current(&self) -> &AccountEntry {
        match self {
            EntryChange::Created(entry) => entry,
            EntryChange::Updated { current, .. } => current.as_ref(),
        }
    }

    /// Value before the change, if the account existed
    pub fn previous(&self) -> Option<&AccountEntry> {
        match self {
            EntryChange::Created(_) => None,
            EntryChange::Updated { previous, .. } => Some(previous),
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, EntryChange::Created(_))
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, EntryChange::Updated { .. })
    }

    /// Balance moved into (positive) or out of (negative) this account
    pub fn balance_change(&self) -> i128 {
        let before = self.previous().map(|p| p.balance as i128).unwrap_or(0);
        self.current().balance as i128 - before
    }
}

/// Accumulator for account changes inside one transactional unit
///
/// Changes iterate in the order each account was first touched so that
/// every node produces the same sequence.
#[derive(Debug, Clone, Default)]
pub struct LedgerDelta {
    ledger_seq: u32,
    changes: HashMap<AccountId, EntryChange>,
    change_order: Vec<AccountId>,
}

impl LedgerDelta {
    pub fn new(ledger_seq: u32) -> Self {
        LedgerDelta {
            ledger_seq,
            changes: HashMap::new(),
            change_order: Vec::new(),
        }
    }

    pub fn ledger_seq(&self) -> u32 {
        self.ledger_seq
    }

    /// Record a new account.
    ///
    /// If the account was already touched in this unit the earlier
    /// change keeps its kind and only the current value is replaced.
    pub fn record_create(&mut self, entry: AccountEntry) {
        let id = entry.account_id;
        match self.changes.remove(&id) {
            Some(EntryChange::Created(_)) => {
                self.changes.insert(id, EntryChange::Created(entry));
            }
            Some(EntryChange::Updated { previous, .. }) => {
                self.changes.insert(
                    id,
                    EntryChange::Updated {
                        previous,
                        current: Box::new(entry),
                    },
                );
            }
            None => {
                self.change_order.push(id);
                self.changes.insert(id, EntryChange::Created(entry));
            }
        }
    }

    /// Record an update to an account that existed before this unit.
    pub fn record_update(&mut self, previous: AccountEntry, current: AccountEntry) {
        let id = current.account_id;
        match self.changes.remove(&id) {
            Some(EntryChange::Created(_)) => {
                self.changes.insert(id, EntryChange::Created(current));
            }
            Some(EntryChange::Updated { previous: orig, .. }) => {
                if orig == current {
                    self.change_order.retain(|touched| *touched != id);
                } else {
                    self.changes.insert(
                        id,
                        EntryChange::Updated {
                            previous: orig,
                            current: Box::new(current),
                        },
                    );
                }
            }
            None => {
                self.change_order.push(id);
                self.changes.insert(
                    id,
                    EntryChange::Updated {
                        previous,
                        current: Box::new(current),
                    },
                );
            }
        }
    }

    /// Forget every change recorded for `id`
    pub fn discard(&mut self, id: &AccountId) -> Option<EntryChange> {
        let change = self.changes.remove(id)?;
        self.change_order.retain(|touched| touched != id);
        Some(change)
    }

    /// Current value of an account touched in this unit
    pub fn get(&self, id: &AccountId) -> Option<&AccountEntry> {
        self.changes.get(id).map(EntryChange::current)
    }

    pub fn change(&self, id: &AccountId) -> Option<&EntryChange> {
        self.changes.get(id)
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.changes.contains_key(id)
    }

    /// All changes in the order they were first recorded
    pub fn changes(&self) -> impl Iterator<Item = &EntryChange> {
        self.change_order.iter().filter_map(|id| self.changes.get(id))
    }

    /// Accounts created in this unit
    pub fn created(&self) -> impl Iterator<Item = &AccountEntry> {
        self.changes().filter_map(|c| match c {
            EntryChange::Created(entry) => Some(entry),
            _ => None,
        })
    }

    /// Net balance change over all accounts
    pub fn net_balance_change(&self) -> i128 {
        self.changes.values().map(EntryChange::balance_change).sum()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
