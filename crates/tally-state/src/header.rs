//! Ledger header
//!
//! The header carries the parameters that stay fixed for a whole
//! ledger-close round: its sequence, the base reserve and the coin supply.

use tally_core::{ReservePolicy, SequenceNumber};

use crate::LedgerConfig;

/// Reserve entries every account pays for regardless of sub-entries
pub const BASE_ACCOUNT_ENTRIES: i64 = 2;

/// Header of the ledger being closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerHeader {
    pub ledger_seq: u32,
    pub base_reserve: u32,
    pub total_coins: i64,
}

impl LedgerHeader {
    pub fn new(ledger_seq: u32, base_reserve: u32, total_coins: i64) -> Self {
        LedgerHeader {
            ledger_seq,
            base_reserve,
            total_coins,
        }
    }

    pub fn genesis(config: &LedgerConfig) -> Self {
        LedgerHeader::new(
            config.genesis_ledger_seq,
            config.base_reserve,
            config.total_coins,
        )
    }

    /// Sequence number given to accounts created in this ledger
    #[inline]
    pub fn starting_sequence_number(&self) -> SequenceNumber {
        SequenceNumber::starting_for_ledger(self.ledger_seq)
    }

    /// Header for the following ledger
    pub fn next(&self) -> LedgerHeader {
        LedgerHeader {
            ledger_seq: self.ledger_seq.saturating_add(1),
            ..self.clone()
        }
    }
}

impl ReservePolicy for LedgerHeader {
    /// (2 + n) * base_reserve, saturating at i64::MAX
    fn minimum_balance(&self, num_sub_entries: u32) -> i64 {
        (BASE_ACCOUNT_ENTRIES + num_sub_entries as i64).saturating_mul(self.base_reserve as i64)
    }
}
