//! Reserve policy contract
//!
//! The ledger requires every account to hold a minimum balance that
//! grows with the number of extra entries it owns. The formula lives
//! with the ledger header; operations only see this trait.

use crate::AccountEntry;

/// Minimum-balance rules supplied by the ledger
pub trait ReservePolicy {
    /// Minimum balance of an account owning `num_sub_entries` extra entries
    fn minimum_balance(&self, num_sub_entries: u32) -> i64;

    /// Minimum balance `account` must keep given its current entries
    fn minimum_balance_for(&self, account: &AccountEntry) -> i64 {
        self.minimum_balance(account.num_sub_entries)
    }
}

/// Fixed per-account minimum, ignoring sub-entries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatReserve(pub i64);

impl ReservePolicy for FlatReserve {
    fn minimum_balance(&self, _num_sub_entries: u32) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, SequenceNumber};

    struct PerEntry(i64);

    impl ReservePolicy for PerEntry {
        fn minimum_balance(&self, n: u32) -> i64 {
            (1 + n as i64) * self.0
        }
    }

    #[test]
    fn test_default_minimum_balance_for_uses_sub_entries() {
        let acc = AccountEntry::new(AccountId::from_seed(1), 0, SequenceNumber::ZERO)
            .with_sub_entries(4);
        assert_eq!(PerEntry(10).minimum_balance_for(&acc), 50);
    }

    #[test]
    fn test_flat_reserve() {
        let acc = AccountEntry::new(AccountId::from_seed(1), 0, SequenceNumber::ZERO)
            .with_sub_entries(9);
        assert_eq!(FlatReserve(100).minimum_balance(0), 100);
        assert_eq!(FlatReserve(100).minimum_balance_for(&acc), 100);
    }
}
