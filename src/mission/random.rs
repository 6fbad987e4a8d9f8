// src/mission/random.rs

/// Source of the randomized escape turn.
pub trait TurnSource {
    /// A value drawn uniformly from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// `fastrand`-backed source; seed it for reproducible missions.
#[derive(Debug, Clone)]
pub struct FastrandTurns {
    rng: fastrand::Rng,
}

impl FastrandTurns {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for FastrandTurns {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnSource for FastrandTurns {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let value = low + (high - low) * self.rng.f64();
        // rounding can land exactly on the open bound
        if value >= high { low } else { value }
    }
}

/// Replays a fixed list of turns, cycling when exhausted. Values outside the
/// requested range are clamped into it.
#[derive(Debug, Clone)]
pub struct FixedTurns {
    values: Vec<f64>,
    next: usize,
}

impl FixedTurns {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl TurnSource for FixedTurns {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let Some(&value) = self.values.get(self.next % self.values.len().max(1)) else {
            return low;
        };
        self.next += 1;
        if (low..high).contains(&value) { value } else { low }
    }
}
