//! Tally State - Ledger state and change tracking
//!
//! This crate implements the mutable side of a ledger-close round:
//! - Ledger header and reserve arithmetic
//! - The `LedgerView` read/write contract operations run against
//! - Committed ledger state
//! - Change tracking (`LedgerDelta`) and copy-on-write transactions
//! - Ledger invariants checked on commit

pub mod config;
pub mod header;
pub mod view;
pub mod ledger;
pub mod delta;
pub mod txn;
pub mod invariants;

pub use config::*;
pub use header::*;
pub use view::*;
pub use ledger::*;
pub use delta::*;
pub use txn::*;
pub use invariants::*;
