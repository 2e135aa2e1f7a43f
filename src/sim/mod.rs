//! Plinko simulation module
//!
//! Everything that decides a round lives here:
//! - `layout`: peg pyramid geometry
//! - `slots` / `score`: landing slots and their payouts
//! - `scene`: turning a layout into physics bodies
//! - `detector`: deciding when and where the ball landed
//! - `round`: one round at a time, from build to teardown
//!
//! `physics` is the engine seam; `world` and `collision` are the bundled engine.

pub mod collision;
pub mod detector;
pub mod layout;
pub mod physics;
pub mod round;
pub mod runner;
pub mod scene;
pub mod score;
pub mod slots;
pub mod state;
pub mod world;

pub use collision::{
    CollisionResult, ball_circle_collision, ball_outline_collision, ball_segment_collision,
};
pub use detector::{OutcomeDetector, SettleCriteria};
pub use layout::{Layout, Peg, PegBounds, SceneSize};
pub use physics::{Aabb, BodyDesc, BodyHandle, BodyMotion, PhysicsWorld, Shape};
pub use round::{PendingClose, RoundController, board_geometry};
pub use runner::{Runner, StepSubscription};
pub use scene::{BaseTemplate, RandomSource, Scene, SceneBuilder};
pub use score::ScoreTable;
pub use slots::{LabelAnchor, Slot, SlotSet};
pub use state::{RngState, RoundOutcome, RoundPhase, RoundState};
pub use world::BasicWorld;
