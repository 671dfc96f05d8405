//! Decision sources for simulated outcomes.
//!
//! Analyzer sampling and challenge grading are stand-ins for real services and
//! draw their outcomes from a `DecisionSource`. Production wiring uses a
//! thread-local or seeded RNG; tests pin outcomes with `FixedDecisions`.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of simulated outcomes
pub trait DecisionSource: Send + Sync {
    /// Returns true with the given probability (clamped to `[0, 1]`).
    fn chance(&self, probability: f64) -> bool;

    /// Uniform index in `0..upper`; returns 0 when `upper` is 0.
    fn index(&self, upper: usize) -> usize;
}

/// Unseeded randomness from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDecisions;

impl DecisionSource for RandomDecisions {
    fn chance(&self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Reproducible randomness from a seeded `StdRng`
pub struct SeededDecisions {
    rng: Mutex<StdRng>,
}

impl SeededDecisions {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DecisionSource for SeededDecisions {
    fn chance(&self, probability: f64) -> bool {
        self.rng.lock().gen_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.rng.lock().gen_range(0..upper)
    }
}

/// Fixed outcomes: every chance resolves to `outcome`, every index to
/// `position` (clamped into range).
#[derive(Debug, Clone, Copy)]
pub struct FixedDecisions {
    pub outcome: bool,
    pub position: usize,
}

impl FixedDecisions {
    pub fn always() -> Self {
        Self {
            outcome: true,
            position: 0,
        }
    }

    pub fn never() -> Self {
        Self {
            outcome: false,
            position: 0,
        }
    }
}

impl DecisionSource for FixedDecisions {
    fn chance(&self, _probability: f64) -> bool {
        self.outcome
    }

    fn index(&self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.position.min(upper - 1)
        }
    }
}
