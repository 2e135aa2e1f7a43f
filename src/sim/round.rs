//! Round control
//!
//! One round at a time: build the board, step the world, let the detector
//! decide, hold the settled ball on screen for the close delay, then tear
//! everything down. Teardown always runs to completion (stop stepping,
//! detach the step listener, remove every body) before a new round adds its
//! bodies.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::detector::{OutcomeDetector, SettleCriteria};
use super::layout::Layout;
use super::physics::{BodyMotion, PhysicsWorld};
use super::runner::{Runner, StepSubscription};
use super::scene::{BaseTemplate, RandomSource, Scene, SceneBuilder};
use super::score::ScoreTable;
use super::slots::{LabelAnchor, SlotSet};
use super::state::{RngState, RoundOutcome, RoundPhase, RoundState};
use super::world::BasicWorld;
use crate::error::{ConfigError, RoundError};
use crate::settings::Settings;

/// Layout and slots for a set of settings
pub fn board_geometry(settings: &Settings) -> Result<(Layout, SlotSet), ConfigError> {
    let layout = settings.layout();
    let bounds = layout.bounds.ok_or(ConfigError::EmptyLayout {
        rows: settings.rows,
        initial_pegs: settings.initial_pegs_per_row,
    })?;
    let slots = SlotSet::partition(
        &bounds,
        settings.slot_count,
        bounds.max_y + settings.base_drop,
    );
    Ok((layout, slots))
}

/// Scheduled round close; dropping it cancels it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClose {
    remaining: f32,
}

impl PendingClose {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            remaining: delay_secs,
        }
    }

    /// Count down; `true` once the delay has elapsed
    pub fn tick(&mut self, elapsed: f32) -> bool {
        self.remaining -= elapsed.max(0.0);
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}

/// Everything owned by the round in play
struct ActiveRound {
    layout: Layout,
    slots: SlotSet,
    scene: Scene,
    detector: OutcomeDetector,
    subscription: StepSubscription,
}

/// Runs Plinko rounds against a physics world
pub struct RoundController<W: PhysicsWorld, R: RandomSource = Pcg32> {
    settings: Settings,
    scores: ScoreTable,
    templates: Vec<BaseTemplate>,
    world: W,
    rng: R,
    runner: Runner,
    state: RoundState,
    active: Option<ActiveRound>,
    pending_close: Option<PendingClose>,
}

impl RoundController<BasicWorld, Pcg32> {
    /// Controller over the bundled world, seeded for reproducible rounds
    pub fn basic(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        let world = BasicWorld::new(Vec2::new(0.0, settings.gravity));
        let rng = RngState::new(seed);
        log::debug!("Round RNG seeded with {}", rng.seed);
        Self::new(settings, world, rng.to_rng())
    }
}

impl<W: PhysicsWorld, R: RandomSource> RoundController<W, R> {
    pub fn new(settings: Settings, world: W, rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;
        let scores = settings.score_table()?;
        Ok(Self {
            settings,
            scores,
            templates: vec![BaseTemplate::cup()],
            world,
            rng,
            runner: Runner::default(),
            state: RoundState::default(),
            active: None,
            pending_close: None,
        })
    }

    /// Replace the base segment outlines used from the next round on
    pub fn with_templates(mut self, templates: Vec<BaseTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Bodies of the round in play
    pub fn scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(|a| &a.scene)
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.active.as_ref().map(|a| &a.layout)
    }

    pub fn ball_motion(&self) -> Option<BodyMotion> {
        let active = self.active.as_ref()?;
        self.world.body_motion(active.scene.ball)
    }

    /// Seconds left before a settled round closes
    pub fn close_pending(&self) -> Option<f32> {
        self.pending_close.map(|p| p.remaining())
    }

    pub fn is_stepping(&self) -> bool {
        self.runner.is_running()
    }

    /// Start a round. Rejected while another round is running or settling.
    pub fn start_round(&mut self) -> Result<(), RoundError> {
        if self.state.is_open() {
            return Err(RoundError::RoundInProgress(self.state.phase));
        }
        self.open_round()
    }

    /// Tear down whatever is open (cancelling a pending close) and start anew
    pub fn force_start_round(&mut self) -> Result<(), RoundError> {
        if self.state.is_open() {
            log::info!("Force-starting over round {}", self.state.round);
        }
        self.teardown();
        self.open_round()
    }

    fn open_round(&mut self) -> Result<(), RoundError> {
        let (layout, slots) = board_geometry(&self.settings)?;
        let lowest_peg_y = layout.lowest_peg_y().unwrap_or(self.settings.top_row_y);

        let builder = SceneBuilder::new(&self.settings, &self.templates);
        let scene = builder
            .build(&mut self.world, &layout, &slots, &mut self.rng)
            .ok_or(RoundError::SceneRejected)?;

        let Some(subscription) = self.runner.subscribe() else {
            scene.remove_from(&mut self.world);
            return Err(RoundError::StepListenerAttached);
        };

        let mut detector = OutcomeDetector::new(SettleCriteria::new(
            &self.settings,
            lowest_peg_y,
            layout.scene.height,
        ));
        detector.arm();

        self.state.round += 1;
        self.state.phase = RoundPhase::Running;
        self.state.result = None;
        log::info!(
            "Round {} started: {} pegs, {} slots, ball at x={:.1}",
            self.state.round,
            layout.pegs.len(),
            slots.len(),
            scene.ball_spawn.x
        );

        self.active = Some(ActiveRound {
            layout,
            slots,
            scene,
            detector,
            subscription,
        });
        self.runner.start();
        Ok(())
    }

    /// Advance by `elapsed` seconds of host time.
    ///
    /// Steps the world, runs the detector after each step and counts down
    /// the close delay. Returns the outcome on the call where it is decided.
    pub fn update(&mut self, elapsed: f32) -> Option<RoundOutcome> {
        let mut decided = None;

        if let Some(active) = self.active.as_mut() {
            let ActiveRound {
                slots,
                scene,
                detector,
                ..
            } = active;
            let scores = &self.scores;
            let ball = scene.ball;

            self.runner.advance(&mut self.world, elapsed, |world| {
                let fired = match world.body_motion(ball) {
                    Some(motion) => detector.observe(&motion, slots, scores),
                    None => detector.ball_lost(),
                };
                if fired.is_some() {
                    decided = fired;
                }
            });
        }

        if let Some(outcome) = decided {
            self.state.phase = RoundPhase::Settled;
            self.state.result = Some(outcome);
            self.pending_close = Some(PendingClose::new(self.settings.settle_delay_secs));
            return decided;
        }

        if let Some(pending) = self.pending_close.as_mut() {
            if pending.tick(elapsed) {
                self.finish_round();
            }
        }
        None
    }

    /// Close a settled round, keeping its result
    fn finish_round(&mut self) {
        self.teardown();
        match self.state.result {
            Some(outcome) => log::info!("Round {} closed: {}", self.state.round, outcome),
            None => log::info!("Round {} closed without a result", self.state.round),
        }
    }

    /// Stop stepping, detach the listener, remove all round bodies and
    /// cancel any pending close. The last result is kept.
    pub fn teardown(&mut self) {
        self.pending_close = None;
        self.runner.stop();
        if let Some(mut active) = self.active.take() {
            active.detector.disarm();
            self.runner.unsubscribe(active.subscription);
            active.scene.remove_from(&mut self.world);
        }
        self.state.phase = RoundPhase::Idle;
    }

    /// Label positions for the slot scores, offset by where the scene sits on screen
    pub fn label_anchors(&self, viewport_offset: Vec2) -> Vec<LabelAnchor> {
        let geometry = match &self.active {
            Some(active) => Some((active.layout.lowest_peg_y(), active.slots.clone())),
            None => board_geometry(&self.settings)
                .ok()
                .map(|(layout, slots)| (layout.lowest_peg_y(), slots)),
        };
        match geometry {
            Some((Some(lowest_peg_y), slots)) => {
                slots.label_anchors(lowest_peg_y, self.settings.label_drop, viewport_offset)
            }
            _ => Vec::new(),
        }
    }
}
