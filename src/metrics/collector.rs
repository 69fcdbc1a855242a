use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{MetricsSnapshot, MAX_METRICS_HISTORY};

/// Collects and manages service metrics
#[derive(Debug)]
pub struct MetricsCollector {
    state: RwLock<MetricsState>,
    start_time: Instant,
}

#[derive(Debug, Default)]
struct MetricsState {
    total_generations: usize,
    stream_chunks: usize,
    total_loads: usize,
    latencies: Vec<Duration>,
    total_errors: usize,
    error_types: Vec<(String, usize)>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MetricsState::default()),
            start_time: Instant::now(),
        }
    }

    /// Record a completed generation
    pub async fn record_generation(&self, latency: Duration) {
        let mut state = self.state.write().await;
        state.total_generations += 1;
        state.latencies.push(latency);

        // Keep history bounded
        if state.latencies.len() > MAX_METRICS_HISTORY {
            state.latencies.remove(0);
        }
    }

    pub async fn record_stream_chunk(&self) {
        self.state.write().await.stream_chunks += 1;
    }

    pub async fn record_load(&self) {
        self.state.write().await.total_loads += 1;
    }

    /// Record an error
    pub async fn record_error(&self, error_type: &str) {
        let mut state = self.state.write().await;
        state.total_errors += 1;

        if let Some(entry) = state.error_types.iter_mut().find(|(t, _)| t == error_type) {
            entry.1 += 1;
        } else {
            state.error_types.push((error_type.to_string(), 1));
        }
    }

    /// Get a snapshot of current metrics
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.read().await;
        let (average_latency, p95_latency) = MetricsSnapshot::latency_stats(&state.latencies);

        // Successful loads and generations plus every failed call
        let attempts = state.total_generations + state.total_loads + state.total_errors;

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            total_generations: state.total_generations,
            stream_chunks: state.stream_chunks,
            total_loads: state.total_loads,
            average_latency,
            p95_latency,
            error_count: state.total_errors,
            error_rate: if attempts > 0 {
                state.total_errors as f32 / attempts as f32
            } else {
                0.0
            },
            error_types: state.error_types.clone(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
