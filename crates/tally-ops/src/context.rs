//! Explicit processing context passed into every operation call

use tally_core::ReservePolicy;

use crate::MetricsRegistry;

/// Collaborators an operation may need, passed explicitly
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    /// Where outcome meters are marked
    pub metrics: &'a MetricsRegistry,
    /// Reserve rules; the ledger header's rules when `None`
    pub reserve: Option<&'a dyn ReservePolicy>,
}

impl<'a> OperationContext<'a> {
    pub fn new(metrics: &'a MetricsRegistry) -> Self {
        OperationContext {
            metrics,
            reserve: None,
        }
    }

    pub fn with_reserve(mut self, reserve: &'a dyn ReservePolicy) -> Self {
        self.reserve = Some(reserve);
        self
    }
}
