//! Outcome detection
//!
//! Watches the ball once per step and decides when the round is over.
//! `Running -> Settled` fires at most once per arming:
//! - the ball leaves the field (`y > scene_height + margin`): out of bounds
//! - the ball rests below the pegs (both speed components under the
//!   threshold and `y > lowest_peg_y + margin`): score of the slot under it
//! - the watchdog runs out of steps first: stalled
//!
//! The out-of-bounds check wins when both could apply on the same step.

use super::physics::BodyMotion;
use super::score::ScoreTable;
use super::slots::SlotSet;
use super::state::RoundOutcome;
use crate::settings::Settings;

/// Thresholds for deciding a round is over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleCriteria {
    /// Per-step speed below which the ball counts as resting
    pub speed_threshold: f32,
    /// Y the ball must pass to count as landed
    pub settle_y: f32,
    /// Y past which the ball has left the field
    pub out_of_bounds_y: f32,
    /// Steps before forcing a stalled outcome
    pub max_steps: Option<u64>,
}

impl SettleCriteria {
    pub fn new(settings: &Settings, lowest_peg_y: f32, scene_height: f32) -> Self {
        Self {
            speed_threshold: settings.speed_threshold,
            settle_y: lowest_peg_y + settings.settle_margin,
            out_of_bounds_y: scene_height + settings.out_of_bounds_margin,
            max_steps: settings.watchdog_steps,
        }
    }

    #[inline]
    pub fn is_resting(&self, motion: &BodyMotion) -> bool {
        motion.velocity.x.abs() < self.speed_threshold
            && motion.velocity.y.abs() < self.speed_threshold
            && motion.position.y > self.settle_y
    }

    #[inline]
    pub fn is_out_of_bounds(&self, motion: &BodyMotion) -> bool {
        motion.position.y > self.out_of_bounds_y
    }
}

/// Per-round settling detector
#[derive(Debug, Clone)]
pub struct OutcomeDetector {
    criteria: SettleCriteria,
    armed: bool,
    steps: u64,
    outcome: Option<RoundOutcome>,
}

impl OutcomeDetector {
    /// A disarmed detector; call `arm` when the round starts
    pub fn new(criteria: SettleCriteria) -> Self {
        Self {
            criteria,
            armed: false,
            steps: 0,
            outcome: None,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.steps = 0;
        self.outcome = None;
    }

    /// Stop observing without reporting anything
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn criteria(&self) -> &SettleCriteria {
        &self.criteria
    }

    /// Feed one step of ball motion.
    ///
    /// Returns the outcome on the step the transition fires, `None` on every
    /// other call (including all calls after it fired).
    pub fn observe(
        &mut self,
        motion: &BodyMotion,
        slots: &SlotSet,
        scores: &ScoreTable,
    ) -> Option<RoundOutcome> {
        if !self.armed {
            return None;
        }
        self.steps += 1;

        let outcome = if self.criteria.is_out_of_bounds(motion) {
            Some(RoundOutcome::OutOfBounds)
        } else if self.criteria.is_resting(motion) {
            Some(Self::landing(motion, slots, scores))
        } else if self.criteria.max_steps.is_some_and(|max| self.steps >= max) {
            log::warn!(
                "Ball did not settle within {} steps, forcing the round out",
                self.steps
            );
            Some(RoundOutcome::Stalled)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            self.armed = false;
            self.outcome = Some(outcome);
            log::info!(
                "Round settled after {} steps at ({:.1}, {:.1}): {:?}",
                self.steps,
                motion.position.x,
                motion.position.y,
                outcome
            );
        }
        outcome
    }

    /// The ball vanished from the world; counts as leaving the field
    pub fn ball_lost(&mut self) -> Option<RoundOutcome> {
        if !self.armed {
            return None;
        }
        log::warn!("Ball body missing from the world after {} steps", self.steps);
        self.armed = false;
        self.outcome = Some(RoundOutcome::OutOfBounds);
        self.outcome
    }

    fn landing(motion: &BodyMotion, slots: &SlotSet, scores: &ScoreTable) -> RoundOutcome {
        let x = motion.position.x;
        let slot = match slots.locate(x) {
            Some(slot) => Some(slot),
            None => {
                log::warn!("Ball rests at x={:.2} outside every slot, clamping", x);
                slots.locate_clamped(x)
            }
        };

        match slot.and_then(|s| scores.score(s.index).map(|m| (s.index, m))) {
            Some((slot, multiplier)) => RoundOutcome::Landed { slot, multiplier },
            None => RoundOutcome::OutOfBounds,
        }
    }
}
