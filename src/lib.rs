//! Plinko - a ball dropped through a pyramid of pegs
//!
//! Core modules:
//! - `sim`: Layout, scene construction, outcome detection and round control
//! - `settings`: Tunable board, physics and detection parameters
//! - `error`: Configuration and round errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RoundError};
pub use settings::Settings;

/// Board configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, velocities are reported per step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Peg pyramid
    pub const GAP: f32 = 25.0;
    pub const NUMBER_OF_ROWS: u32 = 16;
    pub const INITIAL_PEGS_PER_ROW: u32 = 3;
    pub const PEG_RADIUS: f32 = 9.0;
    /// Y of the topmost peg row
    pub const TOP_ROW_Y: f32 = 50.0;
    /// Frame width the pyramid is centered against
    pub const REFERENCE_WIDTH: f32 = 600.0;
    /// Padding added around the peg span to size the scene
    pub const X_FLOAT: f32 = 200.0;
    pub const Y_FLOAT: f32 = 200.0;

    /// Slots
    pub const NUMBER_OF_BASE: usize = 17;
    /// Base segments sit this far below the lowest peg row
    pub const BASE_DROP: f32 = 70.0;
    /// Slot labels sit this far below the lowest peg row
    pub const LABEL_DROP: f32 = 78.0;
    pub const SCORE_LIST: [f32; NUMBER_OF_BASE] = [
        120.0, 40.0, 10.0, 5.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 5.0, 10.0, 40.0, 120.0,
    ];

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_RESTITUTION: f32 = 0.6;
    /// Spawn height, above the visible field
    pub const BALL_SPAWN_Y: f32 = -20.0;
    /// Spawn x is `scene_width / U(lo, hi)`
    pub const BALL_SPAWN_DIVISOR: (f32, f32) = (1.9, 2.1);

    /// Peg restitution ranges (top row is damped to funnel the ball)
    pub const TOP_ROW_RESTITUTION: (f32, f32) = (0.1, 0.2);
    pub const LOWER_ROW_RESTITUTION: (f32, f32) = (0.4, 0.5);

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1000.0;

    /// Outcome detection
    pub const SPEED_THRESHOLD: f32 = 0.05;
    pub const SETTLE_MARGIN: f32 = 50.0;
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 50.0;
    /// Wall-clock delay between detection and round close
    pub const SETTLE_DELAY_SECS: f32 = 1.0;
    /// Steps before a ball that never settles is forced out (60 s at 60 Hz)
    pub const WATCHDOG_STEPS: u64 = 60 * 60;

    /// Score reported when the ball leaves the field
    pub const OUT_OF_BOUNDS_SCORE: f32 = -1.0;
}
