//! Payout multipliers per slot
//!
//! Symmetric around the center slot and non-increasing from the edges
//! inward: extreme slots are the rarest landings on a Galton board.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed, validated multiplier list (one per slot, left to right)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct ScoreTable {
    multipliers: Vec<f32>,
}

impl ScoreTable {
    pub fn new(multipliers: Vec<f32>) -> Result<Self, ConfigError> {
        let n = multipliers.len();
        if n == 0 || n % 2 == 0 {
            return Err(ConfigError::InvalidSlotCount(n));
        }
        for i in 0..n / 2 {
            if multipliers[i] != multipliers[n - 1 - i] {
                return Err(ConfigError::AsymmetricScoreTable { index: i + 1 });
            }
            if multipliers[i + 1] > multipliers[i] {
                return Err(ConfigError::NonMonotonicScoreTable { index: i + 2 });
            }
        }
        Ok(Self { multipliers })
    }

    /// Multiplier for a 1-based slot index
    #[inline]
    pub fn score(&self, slot_index: usize) -> Option<f32> {
        slot_index
            .checked_sub(1)
            .and_then(|i| self.multipliers.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// 1-based index of the center (lowest paying) slot
    pub fn center_index(&self) -> usize {
        self.multipliers.len() / 2 + 1
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.multipliers
    }
}

impl TryFrom<Vec<f32>> for ScoreTable {
    type Error = ConfigError;

    fn try_from(v: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<ScoreTable> for Vec<f32> {
    fn from(table: ScoreTable) -> Self {
        table.multipliers
    }
}
