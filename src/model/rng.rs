use std::ops::Range;
use std::time::Duration;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Shared source of randomness for delays and template picks.
///
/// Seeding makes a service fully reproducible for tests.
pub struct SimulationRng {
    rng: Mutex<StdRng>,
}

impl SimulationRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.lock().gen_range(0..len)
    }

    /// Uniform duration in `[start, end)`, or `start` when the range is empty
    pub fn delay_in(&self, range: Range<Duration>) -> Duration {
        if range.start >= range.end {
            return range.start;
        }
        let ms = self
            .rng
            .lock()
            .gen_range(range.start.as_millis() as u64..range.end.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

impl std::fmt::Debug for SimulationRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRng").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sequences_match() {
        let a = SimulationRng::seeded(42);
        let b = SimulationRng::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.pick_index(3), b.pick_index(3));
            let range = Duration::from_millis(150)..Duration::from_millis(250);
            assert_eq!(a.delay_in(range.clone()), b.delay_in(range));
        }
    }

    #[test]
    fn test_delay_bounds() {
        let rng = SimulationRng::seeded(1);
        let range = Duration::from_millis(800)..Duration::from_millis(2000);
        for _ in 0..100 {
            let delay = rng.delay_in(range.clone());
            assert!(range.contains(&delay));
        }
    }

    #[test]
    fn test_empty_range_returns_start() {
        let rng = SimulationRng::from_entropy();
        let at = Duration::from_millis(5);
        assert_eq!(rng.delay_in(at..at), at);
    }
}
