//! Configuration and round errors
//!
//! Nothing in here is raised mid-round: configuration is checked before a
//! round starts, and a running round only ever reports through `RoundState`.

use crate::sim::RoundPhase;

/// Invalid board or scoring configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Row count or pegs-per-row is zero, so the layout has no pegs
    EmptyLayout { rows: u32, initial_pegs: u32 },
    /// Peg spacing must be positive and finite
    InvalidGap(f32),
    /// Slot count must be odd (a single center slot) and non-zero
    InvalidSlotCount(usize),
    /// Score list length differs from the slot count
    ScoreTableLength { expected: usize, actual: usize },
    /// `score(i) != score(len + 1 - i)` at the given 1-based index
    AsymmetricScoreTable { index: usize },
    /// A score rises when moving from an edge toward the center
    NonMonotonicScoreTable { index: usize },
    /// A `(lo, hi)` range is empty or out of order
    InvalidRange { name: &'static str, lo: f32, hi: f32 },
    /// A strictly positive value was zero, negative or not finite
    NonPositive { name: &'static str, value: f32 },
    /// A coordinate, offset or force was NaN or infinite
    NonFinite { name: &'static str, value: f32 },
    /// Settings JSON could not be parsed
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyLayout { rows, initial_pegs } => write!(
                f,
                "layout is empty (rows: {}, initial pegs per row: {})",
                rows, initial_pegs
            ),
            ConfigError::InvalidGap(gap) => write!(f, "invalid peg gap: {}", gap),
            ConfigError::InvalidSlotCount(n) => {
                write!(f, "slot count must be odd and non-zero, got {}", n)
            }
            ConfigError::ScoreTableLength { expected, actual } => write!(
                f,
                "score table has {} entries, expected {}",
                actual, expected
            ),
            ConfigError::AsymmetricScoreTable { index } => {
                write!(f, "score table is not symmetric at slot {}", index)
            }
            ConfigError::NonMonotonicScoreTable { index } => write!(
                f,
                "score table increases toward the center at slot {}",
                index
            ),
            ConfigError::InvalidRange { name, lo, hi } => {
                write!(f, "invalid {} range: [{}, {}]", name, lo, hi)
            }
            ConfigError::NonPositive { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
            ConfigError::NonFinite { name, value } => {
                write!(f, "{} must be finite, got {}", name, value)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rejected round control request
#[derive(Debug, Clone, PartialEq)]
pub enum RoundError {
    /// A round is still open (running or waiting to close)
    RoundInProgress(RoundPhase),
    /// The settings cannot produce a playable board
    Config(ConfigError),
    /// The physics world refused to create the ball
    SceneRejected,
    /// A previous round's step listener is still attached
    StepListenerAttached,
}

impl std::fmt::Display for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundError::RoundInProgress(phase) => {
                write!(f, "cannot start a round while one is {:?}", phase)
            }
            RoundError::Config(e) => write!(f, "configuration error: {}", e),
            RoundError::SceneRejected => write!(f, "physics world rejected the ball body"),
            RoundError::StepListenerAttached => {
                write!(f, "a step listener from an earlier round is still attached")
            }
        }
    }
}

impl std::error::Error for RoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoundError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RoundError {
    fn from(e: ConfigError) -> Self {
        RoundError::Config(e)
    }
}
