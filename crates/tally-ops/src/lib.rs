//! Tally Ops - Operation processing
//!
//! Each operation is processed in two calls made by the transaction
//! pipeline:
//! 1. `check_valid` - stateless structural validation
//! 2. `apply` - state-dependent application against a `LedgerView`
//!
//! Operation kinds are a closed set dispatched through `OperationFrame`.
//! Metrics are recorded by the frame around each handler's result.

pub mod metrics;
pub mod context;
pub mod error;
pub mod handler;
pub mod create_account;
pub mod frame;

pub use metrics::*;
pub use context::*;
pub use error::*;
pub use handler::*;
pub use create_account::*;
pub use frame::*;
