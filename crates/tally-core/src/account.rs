//! Account entries
//!
//! An account is either absent from the ledger or present with every
//! field populated. Balances are signed so that arithmetic can be
//! checked before a negative value is ever stored.

use crate::{AccountId, ScriptHash, SequenceNumber};

/// Account entry as stored in the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountEntry {
    /// Account identity
    pub account_id: AccountId,
    /// Balance in stroops
    pub balance: i64,
    /// Sequence number for the next operation from this account
    pub seq_num: SequenceNumber,
    /// Number of extra entries owned by this account (raises its reserve)
    pub num_sub_entries: u32,
    /// Attached contract code, if any
    pub script_hash: Option<ScriptHash>,
}

impl AccountEntry {
    pub fn new(account_id: AccountId, balance: i64, seq_num: SequenceNumber) -> Self {
        AccountEntry {
            account_id,
            balance,
            seq_num,
            num_sub_entries: 0,
            script_hash: None,
        }
    }

    pub fn with_script_hash(mut self, script_hash: ScriptHash) -> Self {
        self.script_hash = Some(script_hash);
        self
    }

    pub fn with_sub_entries(mut self, num_sub_entries: u32) -> Self {
        self.num_sub_entries = num_sub_entries;
        self
    }

    /// Add `delta` to the balance.
    ///
    /// Returns false and leaves the balance untouched if the result would
    /// overflow or go negative.
    pub fn add_balance(&mut self, delta: i64) -> bool {
        match self.balance.checked_add(delta) {
            Some(new_balance) if new_balance >= 0 => {
                self.balance = new_balance;
                true
            }
            _ => false,
        }
    }
}
