//! Identity types for the ledger
//!
//! Accounts are addressed by the 32 bytes of their public key. Script
//! hashes are SHA-256 digests of attached contract code.

use std::fmt;

use sha2::{Digest, Sha256};

/// Account identity - raw Ed25519 public key bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    #[inline]
    pub fn new(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Deterministic identity derived from a seed, for simulations and tests.
    pub fn from_seed(seed: u64) -> Self {
        let digest = Sha256::digest(seed.to_le_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        AccountId(bytes)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Hash identifying contract code attached to an account
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScriptHash(pub [u8; 32]);

impl ScriptHash {
    pub const ZERO: ScriptHash = ScriptHash([0u8; 32]);

    #[inline]
    pub fn new(bytes: [u8; 32]) -> Self {
        ScriptHash(bytes)
    }

    /// SHA-256 of the script code
    pub fn of(code: &[u8]) -> Self {
        let digest = Sha256::digest(code);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        ScriptHash(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Account sequence number - orders future operations from an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SequenceNumber(pub i64);

impl SequenceNumber {
    pub const ZERO: SequenceNumber = SequenceNumber(0);

    #[inline]
    pub fn new(seq: i64) -> Self {
        SequenceNumber(seq)
    }

    /// Sequence number given to accounts created while closing `ledger_seq`.
    /// Format: \[ledger:32\]\[counter:32\]
    #[inline]
    pub fn starting_for_ledger(ledger_seq: u32) -> Self {
        SequenceNumber((ledger_seq as i64) << 32)
    }

    #[inline]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_from_seed_is_deterministic() {
        assert_eq!(AccountId::from_seed(7), AccountId::from_seed(7));
        assert_ne!(AccountId::from_seed(7), AccountId::from_seed(8));
    }

    #[test]
    fn test_account_id_display() {
        let id = AccountId::new([0xab; 32]);
        assert_eq!(id.to_string(), "ab".repeat(32));
        assert_eq!(format!("{:?}", id), "Account(abababab..)");
    }

    #[test]
    fn test_script_hash_of() {
        // SHA-256 of the empty string
        let h = ScriptHash::of(b"");
        assert_eq!(
            h.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(ScriptHash::of(b"a"), ScriptHash::of(b"b"));
    }

    #[test]
    fn test_starting_sequence() {
        assert_eq!(SequenceNumber::starting_for_ledger(0), SequenceNumber(0));
        assert_eq!(SequenceNumber::starting_for_ledger(3).value(), 3i64 << 32);
    }
}
