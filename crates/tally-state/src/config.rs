//! Ledger configuration

/// Ledger configuration
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Reserve charged per counted entry, in stroops
    pub base_reserve: u32,
    /// Coins held by the root account at genesis
    pub total_coins: i64,
    /// Sequence of the first ledger
    pub genesis_ledger_seq: u32,
    /// Run ledger invariants whenever a transaction commits
    pub check_invariants: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            base_reserve: 5_000_000,
            total_coins: 1_000_000_000_000_000_000,
            genesis_ledger_seq: 1,
            check_invariants: true,
        }
    }
}

impl LedgerConfig {
    /// Small numbers for local simulation
    pub fn local() -> Self {
        LedgerConfig {
            base_reserve: 50,
            total_coins: 1_000_000_000,
            genesis_ledger_seq: 1,
            check_invariants: true,
        }
    }

    /// Skip invariant checks on commit (replay of trusted history)
    pub fn unchecked() -> Self {
        LedgerConfig {
            check_invariants: false,
            ..LedgerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(LedgerConfig::default().check_invariants);
        assert!(!LedgerConfig::unchecked().check_invariants);
        assert_eq!(LedgerConfig::unchecked().base_reserve, LedgerConfig::default().base_reserve);

        let local = LedgerConfig::local();
        assert!(local.base_reserve < LedgerConfig::default().base_reserve);
        assert!(local.total_coins > 2 * local.base_reserve as i64);
    }
}
