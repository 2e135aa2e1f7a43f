//! Fixed-timestep stepping loop
//!
//! The host feeds real elapsed time; the runner turns it into whole
//! `SIM_DT` steps. A step listener is attached through a `StepSubscription`,
//! which has to be handed back to detach it: a round cannot drop its
//! listener on the floor and leave it firing into the next round.

use super::physics::PhysicsWorld;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Proof that a step listener is attached. Not `Clone`; give it back to
/// `Runner::unsubscribe` to detach.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a subscription must be handed back to Runner::unsubscribe"]
pub struct StepSubscription {
    id: u64,
}

impl StepSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Drives a world in fixed steps while running
#[derive(Debug, Clone)]
pub struct Runner {
    dt: f32,
    max_substeps: u32,
    running: bool,
    accumulator: f32,
    next_subscription: u64,
    listener: Option<u64>,
    steps: u64,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl Runner {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            running: false,
            accumulator: 0.0,
            next_subscription: 1,
            listener: None,
            steps: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Total steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Attach the step listener. Returns `None` if one is already attached.
    pub fn subscribe(&mut self) -> Option<StepSubscription> {
        if self.listener.is_some() {
            return None;
        }
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listener = Some(id);
        Some(StepSubscription { id })
    }

    /// Detach the listener this subscription refers to
    pub fn unsubscribe(&mut self, subscription: StepSubscription) {
        if self.listener == Some(subscription.id) {
            self.listener = None;
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Advance `world` by the whole steps that fit in `elapsed` seconds,
    /// calling `on_step` after each one while a listener is attached.
    ///
    /// Returns the number of steps taken.
    pub fn advance<W, F>(&mut self, world: &mut W, elapsed: f32, mut on_step: F) -> u32
    where
        W: PhysicsWorld + ?Sized,
        F: FnMut(&W),
    {
        if !self.running {
            return 0;
        }
        // NaN would poison the accumulator and stall every later frame
        if !elapsed.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed);
            return 0;
        }

        let elapsed = elapsed.clamp(0.0, 0.1);
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            world.step(self.dt);
            self.accumulator -= self.dt;
            self.steps += 1;
            substeps += 1;

            if self.listener.is_some() {
                on_step(&*world);
            }
        }

        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        substeps
    }
}
