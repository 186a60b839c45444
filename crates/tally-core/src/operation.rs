//! Operation definitions
//!
//! An operation is one unit of state-transition logic inside a
//! transaction. Operations arrive already decoded from the transaction
//! codec and are discarded once their result has been reported.

use crate::{AccountId, ScriptHash};

/// Operation type classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperationType {
    CreateAccount = 0x00,
}

impl OperationType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(OperationType::CreateAccount),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Meter prefix for this operation type
    pub const fn meter_prefix(self) -> &'static str {
        match self {
            OperationType::CreateAccount => "op-create-account",
        }
    }
}

/// Create a new account funded from the source account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountOp {
    /// Account to create
    pub destination: AccountId,
    /// Amount moved from the source to the new account
    pub starting_balance: i64,
    /// Contract code attached to the new account
    pub script_hash: ScriptHash,
}

impl CreateAccountOp {
    pub fn new(destination: AccountId, starting_balance: i64, script_hash: ScriptHash) -> Self {
        CreateAccountOp {
            destination,
            starting_balance,
            script_hash,
        }
    }
}

/// Operation body - one variant per operation kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount(_) => OperationType::CreateAccount,
        }
    }
}

/// Operation as it appears inside a transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    /// Per-operation source; falls back to the transaction source when absent
    pub source_account: Option<AccountId>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Operation {
            source_account: None,
            body,
        }
    }

    pub fn with_source(mut self, source: AccountId) -> Self {
        self.source_account = Some(source);
        self
    }

    /// Shorthand for a create-account operation without its own source
    pub fn create_account(
        destination: AccountId,
        starting_balance: i64,
        script_hash: ScriptHash,
    ) -> Self {
        Operation::new(OperationBody::CreateAccount(CreateAccountOp::new(
            destination,
            starting_balance,
            script_hash,
        )))
    }

    /// Effective source given the enclosing transaction's source
    pub fn source_or(&self, tx_source: AccountId) -> AccountId {
        self.source_account.unwrap_or(tx_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_roundtrip() {
        let t = OperationType::CreateAccount;
        assert_eq!(OperationType::from_byte(t.to_byte()), Some(t));
        assert_eq!(OperationType::from_byte(0xff), None);
    }

    #[test]
    fn test_source_fallback() {
        let tx_source = AccountId::from_seed(1);
        let op_source = AccountId::from_seed(2);
        let op = Operation::create_account(AccountId::from_seed(3), 10, ScriptHash::ZERO);
        assert_eq!(op.source_or(tx_source), tx_source);
        let op = op.with_source(op_source);
        assert_eq!(op.source_or(tx_source), op_source);
        assert_eq!(op.body.operation_type(), OperationType::CreateAccount);
    }
}
