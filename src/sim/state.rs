//! Round state and outcome types
//!
//! This is all a caller ever observes of a round.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::OUT_OF_BOUNDS_SCORE;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// No round open, a new one may start
    #[default]
    Idle,
    /// Ball is in play
    Running,
    /// Outcome decided, waiting for the close delay
    Settled,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Ball came to rest in a slot
    Landed { slot: usize, multiplier: f32 },
    /// Ball fell below the scene without settling
    OutOfBounds,
    /// Ball never settled and the watchdog forced the round out
    Stalled,
}

impl RoundOutcome {
    /// Payout multiplier, or the out-of-bounds sentinel
    pub fn score(&self) -> f32 {
        match self {
            RoundOutcome::Landed { multiplier, .. } => *multiplier,
            RoundOutcome::OutOfBounds | RoundOutcome::Stalled => OUT_OF_BOUNDS_SCORE,
        }
    }

    pub fn slot(&self) -> Option<usize> {
        match self {
            RoundOutcome::Landed { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Landed { multiplier, .. } => write!(f, "{}x", multiplier),
            RoundOutcome::OutOfBounds => write!(f, "Your ball flew away"),
            RoundOutcome::Stalled => write!(f, "Your ball got stuck"),
        }
    }
}

/// Phase plus the most recent outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Outcome of the current round once settled, kept after it closes
    pub result: Option<RoundOutcome>,
    /// Rounds started since the controller was created
    pub round: u64,
}

impl RoundState {
    /// Numeric result as the UI shows it (`-1` for out of bounds)
    pub fn score(&self) -> Option<f32> {
        self.result.map(|r| r.score())
    }

    pub fn is_open(&self) -> bool {
        self.phase != RoundPhase::Idle
    }
}

/// RNG seed wrapper, so a round's randomness can be replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
