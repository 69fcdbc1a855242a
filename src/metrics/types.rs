use std::time::Duration;
use serde::{Serialize, Deserialize};

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Time since the collector was created
    pub uptime: Duration,

    /// Completed `generate` calls, including those made for chat and streaming
    pub total_generations: usize,

    /// Prefixes emitted by response streams
    pub stream_chunks: usize,

    /// Successful initializations
    pub total_loads: usize,

    /// Average generation latency
    pub average_latency: Duration,

    /// 95th percentile generation latency
    pub p95_latency: Duration,

    /// Number of errors
    pub error_count: usize,

    /// Errors over every attempted operation: loads, generations and failed
    /// calls of any kind. Not a per-generation failure rate.
    pub error_rate: f32,

    /// Error counts by kind
    pub error_types: Vec<(String, usize)>,
}

impl MetricsSnapshot {
    /// Latency statistics from raw measurements
    pub(crate) fn latency_stats(latencies: &[Duration]) -> (Duration, Duration) {
        if latencies.is_empty() {
            return (Duration::default(), Duration::default());
        }

        let mut sorted = latencies.to_vec();
        sorted.sort();

        let total: Duration = sorted.iter().sum();
        let average = total / sorted.len() as u32;

        let p95_idx = ((sorted.len() as f32 * 0.95) as usize).min(sorted.len() - 1);
        (average, sorted[p95_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_stats() {
        let latencies = vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(30),
            Duration::from_millis(40),
            Duration::from_millis(50),
        ];

        let (average, p95) = MetricsSnapshot::latency_stats(&latencies);
        assert_eq!(average, Duration::from_millis(30));
        assert_eq!(p95, Duration::from_millis(50));
    }

    #[test]
    fn test_empty_latencies() {
        let (average, p95) = MetricsSnapshot::latency_stats(&[]);
        assert_eq!(average, Duration::default());
        assert_eq!(p95, Duration::default());
    }
}
