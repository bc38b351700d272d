//! Per-cycle random trials.
//!
//! Rates are configured as "once every N cycles" ([`Cadence`]) and turned
//! into a per-cycle [`Probability`] of `1/N`. Each actor draws from its own
//! [`Trials`] stream, split off a master [`SeedSequence`] so a whole run can
//! be replayed from one seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected rate value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrialError {
    /// Probability outside `[0, 1]`.
    #[error("probability must be within [0, 1], got {0}")]
    Probability(f64),

    /// Cadence that is neither zero nor a finite count of at least one cycle.
    #[error("cadence must be 0 (never) or a finite number of cycles >= 1, got {0}")]
    Cadence(f64),
}

/// Per-cycle success probability.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Never succeeds.
    pub const NEVER: Probability = Probability(0.0);
    /// Always succeeds.
    pub const ALWAYS: Probability = Probability(1.0);

    /// Validate a raw probability.
    pub fn new(p: f64) -> Result<Self, TrialError> {
        if p.is_finite() && (0.0..=1.0).contains(&p) {
            Ok(Probability(p))
        } else {
            Err(TrialError::Probability(p))
        }
    }

    /// The raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// "Once every N cycles" on average. Zero means never.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Cadence(f64);

impl Cadence {
    /// Never fires.
    pub const NEVER: Cadence = Cadence(0.0);
    /// Fires every cycle.
    pub const ALWAYS: Cadence = Cadence(1.0);

    /// Once every `cycles` cycles.
    pub fn every(cycles: f64) -> Result<Self, TrialError> {
        if cycles == 0.0 || (cycles.is_finite() && cycles >= 1.0) {
            Ok(Cadence(cycles))
        } else {
            Err(TrialError::Cadence(cycles))
        }
    }

    /// Average number of cycles between successes.
    pub fn cycles(&self) -> f64 {
        self.0
    }

    /// Per-cycle probability, `1/N`.
    pub fn probability(&self) -> Probability {
        if self.0 == 0.0 {
            Probability::NEVER
        } else {
            Probability(1.0 / self.0)
        }
    }
}

impl TryFrom<f64> for Cadence {
    type Error = TrialError;

    fn try_from(cycles: f64) -> Result<Self, Self::Error> {
        Cadence::every(cycles)
    }
}

impl From<u32> for Cadence {
    fn from(cycles: u32) -> Self {
        Cadence(f64::from(cycles))
    }
}

impl From<Cadence> for f64 {
    fn from(cadence: Cadence) -> Self {
        cadence.0
    }
}

/// One actor's independent stream of Bernoulli trials.
#[derive(Debug, Clone)]
pub struct Trials {
    rng: StdRng,
}

impl Trials {
    /// Deterministic stream from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one trial.
    pub fn draw(&mut self, p: Probability) -> bool {
        self.rng.gen_bool(p.0)
    }
}

/// Hands out independent [`Trials`] streams derived from one master seed.
#[derive(Debug)]
pub struct SeedSequence {
    seed: u64,
    master: StdRng,
}

impl SeedSequence {
    /// Derive streams from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            master: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive streams from a freshly drawn seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The next actor's stream.
    pub fn next_trials(&mut self) -> Trials {
        Trials::seeded(self.master.gen())
    }
}
