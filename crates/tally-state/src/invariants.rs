//! Ledger invariants
//!
//! These hold for every committed unit of work. A violation means the
//! ledger engine itself is broken, not that an operation was rejected.
//!
//! # The Four Invariants
//!
//! 1. **Non-Negative Balance** - No account is ever committed below zero
//! 2. **Conservation Of Balance** - Operations move coins, never mint or burn them
//! 3. **New Account Sequence** - Created accounts start at the round's starting sequence
//! 4. **Reserve On Create** - Created accounts hold at least a fresh account's reserve

use std::fmt;

use tally_core::{ReservePolicy, TallyError, TallyResult};

use crate::{LedgerDelta, LedgerHeader};

/// The ledger invariants checked on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Invariant {
    /// INV-1: every current entry in the delta has balance >= 0
    NonNegativeBalance = 1,

    /// INV-2: the sum of balance changes across the delta is zero
    ///
    /// Fees and inflation are handled outside of operations and are not
    /// recorded through account deltas.
    ConservationOfBalance = 2,

    /// INV-3: created accounts carry `header.starting_sequence_number()`
    NewAccountSequence = 3,

    /// INV-4: created accounts hold at least `minimum_balance(0)` of the
    /// reserve policy the creating operation was decided under
    ReserveOnCreate = 4,
}

impl Invariant {
    /// Get the invariant code (e.g., "INV-1")
    pub fn code(&self) -> &'static str {
        match self {
            Invariant::NonNegativeBalance => "INV-1",
            Invariant::ConservationOfBalance => "INV-2",
            Invariant::NewAccountSequence => "INV-3",
            Invariant::ReserveOnCreate => "INV-4",
        }
    }

    /// Get the short name of the invariant
    pub fn name(&self) -> &'static str {
        match self {
            Invariant::NonNegativeBalance => "Non-Negative Balance",
            Invariant::ConservationOfBalance => "Conservation Of Balance",
            Invariant::NewAccountSequence => "New Account Sequence",
            Invariant::ReserveOnCreate => "Reserve On Create",
        }
    }

    /// Get all invariants
    pub fn all() -> &'static [Invariant] {
        &[
            Invariant::NonNegativeBalance,
            Invariant::ConservationOfBalance,
            Invariant::NewAccountSequence,
            Invariant::ReserveOnCreate,
        ]
    }

    /// Check this invariant against a delta
    pub fn check(
        &self,
        header: &LedgerHeader,
        reserve: &dyn ReservePolicy,
        delta: &LedgerDelta,
    ) -> Result<(), String> {
        match self {
            Invariant::NonNegativeBalance => {
                match delta.changes().map(|c| c.current()).find(|e| e.balance < 0) {
                    Some(entry) => Err(format!(
                        "account {} has balance {}",
                        entry.account_id, entry.balance
                    )),
                    None => Ok(()),
                }
            }
            Invariant::ConservationOfBalance => {
                let net = delta.net_balance_change();
                if net == 0 {
                    Ok(())
                } else {
                    Err(format!("net balance change {}", net))
                }
            }
            Invariant::NewAccountSequence => {
                let expected = header.starting_sequence_number();
                match delta.created().find(|e| e.seq_num != expected) {
                    Some(entry) => Err(format!(
                        "account {} created with sequence {}, expected {}",
                        entry.account_id, entry.seq_num, expected
                    )),
                    None => Ok(()),
                }
            }
            Invariant::ReserveOnCreate => {
                let min = reserve.minimum_balance(0);
                match delta.created().find(|e| e.balance < min) {
                    Some(entry) => Err(format!(
                        "account {} created with {} below reserve {}",
                        entry.account_id, entry.balance, min
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.name())
    }
}

/// Invariant violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub invariant: Invariant,
    pub context: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ledger Invariant Violation: {} - {}", self.invariant, self.context)
    }
}

impl From<InvariantViolation> for TallyError {
    fn from(v: InvariantViolation) -> Self {
        TallyError::InvariantViolated {
            code: v.invariant.code(),
            detail: v.context,
        }
    }
}

/// Check all invariants, returning every violation
pub fn check_all_invariants(
    header: &LedgerHeader,
    reserve: &dyn ReservePolicy,
    delta: &LedgerDelta,
) -> Vec<InvariantViolation> {
    Invariant::all()
        .iter()
        .filter_map(|&invariant| {
            invariant
                .check(header, reserve, delta)
                .err()
                .map(|context| InvariantViolation { invariant, context })
        })
        .collect()
}

/// Check all invariants, failing on the first violation
pub fn check_delta(
    header: &LedgerHeader,
    reserve: &dyn ReservePolicy,
    delta: &LedgerDelta,
) -> TallyResult<()> {
    match check_all_invariants(header, reserve, delta).into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}
