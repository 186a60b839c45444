//! Error types for the ledger

use thiserror::Error;

use crate::AccountId;

/// Ledger faults
///
/// These are failures of the ledger machinery itself, not semantic
/// rejections of an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    #[error("Negative balance on account {account}: {balance}")]
    NegativeBalance { account: AccountId, balance: i64 },

    #[error("Invariant {code} violated: {detail}")]
    InvariantViolated { code: &'static str, detail: String },

    #[error("Account {0} predates this transaction and cannot be erased")]
    EraseCommitted(AccountId),
}

/// Result type for ledger operations
pub type TallyResult<T> = Result<T, TallyError>;
