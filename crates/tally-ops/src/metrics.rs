//! Outcome meters
//!
//! Every operation outcome marks one named meter. The registry is shared
//! by reference through `OperationContext`.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

/// Three-part meter name, e.g. `op-create-account.failure.low-reserve`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeterName {
    pub domain: &'static str,
    pub kind: &'static str,
    pub name: &'static str,
}

impl MeterName {
    pub const fn new(domain: &'static str, kind: &'static str, name: &'static str) -> Self {
        MeterName { domain, kind, name }
    }
}

impl fmt::Display for MeterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.domain, self.kind, self.name)
    }
}

/// Thread-safe meter registry
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    meters: Mutex<HashMap<MeterName, u64>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Mark one event on a meter
    pub fn mark(&self, meter: MeterName) {
        *self.meters.lock().entry(meter).or_insert(0) += 1;
    }

    /// Events recorded on a meter
    pub fn count(&self, meter: MeterName) -> u64 {
        self.meters.lock().get(&meter).copied().unwrap_or(0)
    }

    /// Sum over every meter
    pub fn total(&self) -> u64 {
        self.meters.lock().values().sum()
    }

    /// All meters, sorted by name
    pub fn snapshot(&self) -> Vec<(MeterName, u64)> {
        let mut out: Vec<_> = self.meters.lock().iter().map(|(k, v)| (*k, *v)).collect();
        out.sort();
        out
    }
}
