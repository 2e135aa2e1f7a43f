//! Board settings
//!
//! Every tunable of a round lives here. Settings deserialize from partial
//! JSON; missing fields fall back to `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Layout, ScoreTable};

/// Board, physics and detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Peg pyramid ===
    /// Half the distance between neighbouring pegs
    pub gap: f32,
    /// Number of peg rows
    pub rows: u32,
    /// Pegs in the top row (each row below adds one)
    pub initial_pegs_per_row: u32,
    pub peg_radius: f32,
    pub top_row_y: f32,
    pub reference_width: f32,
    /// Horizontal / vertical padding around the peg span
    pub x_float: f32,
    pub y_float: f32,

    // === Slots ===
    pub slot_count: usize,
    pub base_drop: f32,
    pub label_drop: f32,
    /// Payout multiplier per slot, left to right
    pub scores: Vec<f32>,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_restitution: f32,
    pub ball_spawn_y: f32,
    pub ball_spawn_divisor: (f32, f32),

    // === Physics ===
    pub gravity: f32,
    pub top_row_restitution: (f32, f32),
    pub lower_row_restitution: (f32, f32),

    // === Outcome detection ===
    /// Per-step speed below which the ball counts as resting
    pub speed_threshold: f32,
    pub settle_margin: f32,
    pub out_of_bounds_margin: f32,
    pub settle_delay_secs: f32,
    /// Steps before a ball that never settles is forced out (`None` disables)
    pub watchdog_steps: Option<u64>,

    /// RNG seed (`None` lets the caller pick one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gap: GAP,
            rows: NUMBER_OF_ROWS,
            initial_pegs_per_row: INITIAL_PEGS_PER_ROW,
            peg_radius: PEG_RADIUS,
            top_row_y: TOP_ROW_Y,
            reference_width: REFERENCE_WIDTH,
            x_float: X_FLOAT,
            y_float: Y_FLOAT,

            slot_count: NUMBER_OF_BASE,
            base_drop: BASE_DROP,
            label_drop: LABEL_DROP,
            scores: SCORE_LIST.to_vec(),

            ball_radius: BALL_RADIUS,
            ball_restitution: BALL_RESTITUTION,
            ball_spawn_y: BALL_SPAWN_Y,
            ball_spawn_divisor: BALL_SPAWN_DIVISOR,

            gravity: GRAVITY,
            top_row_restitution: TOP_ROW_RESTITUTION,
            lower_row_restitution: LOWER_ROW_RESTITUTION,

            speed_threshold: SPEED_THRESHOLD,
            settle_margin: SETTLE_MARGIN,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,
            settle_delay_secs: SETTLE_DELAY_SECS,
            watchdog_steps: Some(WATCHDOG_STEPS),

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check that these settings describe a playable board
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.initial_pegs_per_row == 0 {
            return Err(ConfigError::EmptyLayout {
                rows: self.rows,
                initial_pegs: self.initial_pegs_per_row,
            });
        }
        if !(self.gap.is_finite() && self.gap > 0.0) {
            return Err(ConfigError::InvalidGap(self.gap));
        }
        for (name, value) in [
            ("top_row_y", self.top_row_y),
            ("reference_width", self.reference_width),
            ("x_float", self.x_float),
            ("y_float", self.y_float),
            ("base_drop", self.base_drop),
            ("label_drop", self.label_drop),
            ("ball_restitution", self.ball_restitution),
            ("ball_spawn_y", self.ball_spawn_y),
            ("gravity", self.gravity),
            ("settle_margin", self.settle_margin),
            ("out_of_bounds_margin", self.out_of_bounds_margin),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        for (name, value) in [
            ("peg_radius", self.peg_radius),
            ("ball_radius", self.ball_radius),
            ("speed_threshold", self.speed_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.settle_delay_secs.is_finite() && self.settle_delay_secs >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "settle_delay_secs",
                value: self.settle_delay_secs,
            });
        }
        for (name, (lo, hi)) in [
            ("ball_spawn_divisor", self.ball_spawn_divisor),
            ("top_row_restitution", self.top_row_restitution),
            ("lower_row_restitution", self.lower_row_restitution),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ConfigError::InvalidRange { name, lo, hi });
            }
        }
        if self.ball_spawn_divisor.0 <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "ball_spawn_divisor",
                lo: self.ball_spawn_divisor.0,
                hi: self.ball_spawn_divisor.1,
            });
        }
        if self.slot_count == 0 || self.slot_count % 2 == 0 {
            return Err(ConfigError::InvalidSlotCount(self.slot_count));
        }
        self.score_table().map(|_| ())
    }

    /// Build the peg layout described by these settings
    pub fn layout(&self) -> Layout {
        Layout::generate(
            self.gap,
            self.rows,
            self.initial_pegs_per_row,
            self.top_row_y,
            self.reference_width,
            (self.x_float, self.y_float),
        )
    }

    /// Build and validate the score table against the slot count
    pub fn score_table(&self) -> Result<ScoreTable, ConfigError> {
        let table = ScoreTable::new(self.scores.clone())?;
        if table.len() != self.slot_count {
            return Err(ConfigError::ScoreTableLength {
                expected: self.slot_count,
                actual: table.len(),
            });
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "rows": 8, "seed": 7 }"#).unwrap();
        assert_eq!(settings.rows, 8);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.gap, GAP);
        assert_eq!(settings.scores.len(), NUMBER_OF_BASE);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ rows: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_rows_rejected() {
        let settings = Settings {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::EmptyLayout { rows: 0, .. })
        ));
    }

    #[test]
    fn test_even_slot_count_rejected() {
        let settings = Settings {
            slot_count: 16,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::InvalidSlotCount(16)));
    }

    #[test]
    fn test_score_length_mismatch_rejected() {
        let settings = Settings {
            slot_count: 15,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::ScoreTableLength {
                expected: 15,
                actual: 17
            })
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let settings = Settings {
            top_row_restitution: (0.3, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidRange {
                name: "top_row_restitution",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_geometry_rejected() {
        let settings = Settings {
            top_row_y: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFinite {
                name: "top_row_y",
                ..
            })
        ));

        let settings = Settings {
            gravity: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFinite { name: "gravity", .. })
        ));

        // Negative offsets are fine, only NaN and infinity are not
        let settings = Settings {
            out_of_bounds_margin: -10.0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Ok(()));
    }
}
