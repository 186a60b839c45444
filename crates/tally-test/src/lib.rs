//! Tally Test Harness - Ledger simulation and validation
//!
//! This crate provides:
//! - Randomized multi-ledger simulation of create-account traffic
//! - Ledger law checks (conservation, reserves, sequence numbers)
//! - Test logging setup

pub mod logging;
pub mod simulator;

pub use logging::*;
pub use simulator::*;
