//! Tally Core - Fundamental ledger types
//!
//! This crate defines the types shared by every layer of the ledger:
//! - Identifiers (AccountId, ScriptHash, SequenceNumber)
//! - Account entries
//! - Operations and their result codes
//! - The reserve policy contract

pub mod id;
pub mod account;
pub mod operation;
pub mod result;
pub mod reserve;
pub mod error;

pub use id::*;
pub use account::*;
pub use operation::*;
pub use result::*;
pub use reserve::*;
pub use error::*;
