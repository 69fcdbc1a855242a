//! Generation metrics collection

mod collector;
mod types;

pub use collector::MetricsCollector;
pub use types::MetricsSnapshot;

// Bounded history of generation latencies
pub(crate) const MAX_METRICS_HISTORY: usize = 1000;
