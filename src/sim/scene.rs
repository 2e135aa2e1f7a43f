//! Scene construction
//!
//! Turns a layout into bodies: static pegs, the dynamic ball, and static
//! base segments shaped from outline templates. Building never starts the
//! simulation; the round controller does that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::physics::{BodyDesc, BodyHandle, PhysicsWorld};
use super::slots::SlotSet;
use crate::settings::Settings;

/// Source of uniform random numbers for scene variation.
///
/// Every `rand::Rng` is one; tests can plug in a fixed source.
pub trait RandomSource {
    /// Uniform sample in `[lo, hi)`; returns `lo` when the range is empty
    fn uniform(&mut self, lo: f32, hi: f32) -> f32;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.random_range(lo..hi)
    }
}

/// Outline used to shape every base segment.
///
/// Points are in template space with `x` from 0 to the template width; the
/// builder scales the outline to the slot width and moves it under the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTemplate {
    pub points: Vec<Vec2>,
}

impl BaseTemplate {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// An open-topped cup, 100 wide and 40 deep, with 6-unit walls
    pub fn cup() -> Self {
        Self::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 34.0),
            Vec2::new(94.0, 34.0),
            Vec2::new(94.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 40.0),
            Vec2::new(0.0, 40.0),
        ])
    }

    /// Horizontal extent of the outline, `None` when there is nothing to shape
    pub fn width(&self) -> Option<f32> {
        if self.points.len() < 2 {
            return None;
        }
        let (min, max) = self
            .points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let width = max - min;
        (width.is_finite() && width > 0.0).then_some(width)
    }
}

/// Handles of every body a round registered
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub pegs: Vec<BodyHandle>,
    pub ball: BodyHandle,
    pub bases: Vec<BodyHandle>,
    pub ball_spawn: Vec2,
}

impl Scene {
    /// Remove every body of this scene from the world
    pub fn remove_from<W: PhysicsWorld + ?Sized>(&self, world: &mut W) {
        for handle in self.pegs.iter().chain(&self.bases) {
            world.remove_body(*handle);
        }
        world.remove_body(self.ball);
    }

    pub fn body_count(&self) -> usize {
        self.pegs.len() + self.bases.len() + 1
    }
}

/// Builds a round's bodies from settings
pub struct SceneBuilder<'a> {
    settings: &'a Settings,
    templates: &'a [BaseTemplate],
}

impl<'a> SceneBuilder<'a> {
    pub fn new(settings: &'a Settings, templates: &'a [BaseTemplate]) -> Self {
        Self {
            settings,
            templates,
        }
    }

    /// Restitution for a peg in `row`
    pub fn peg_restitution<R: RandomSource + ?Sized>(&self, row: u32, rng: &mut R) -> f32 {
        let (lo, hi) = if row == 0 {
            self.settings.top_row_restitution
        } else {
            self.settings.lower_row_restitution
        };
        rng.uniform(lo, hi)
    }

    /// Ball spawn point: horizontally jittered around the scene center, above the field
    pub fn ball_spawn<R: RandomSource + ?Sized>(&self, layout: &Layout, rng: &mut R) -> Vec2 {
        let (lo, hi) = self.settings.ball_spawn_divisor;
        let divisor = rng.uniform(lo, hi);
        Vec2::new(layout.scene.width / divisor, self.settings.ball_spawn_y)
    }

    /// Register pegs, ball and base segments with `world`.
    ///
    /// Returns `None` if the ball could not be created. Pegs or base segments
    /// the world rejects are skipped.
    pub fn build<W, R>(
        &self,
        world: &mut W,
        layout: &Layout,
        slots: &SlotSet,
        rng: &mut R,
    ) -> Option<Scene>
    where
        W: PhysicsWorld + ?Sized,
        R: RandomSource + ?Sized,
    {
        let settings = self.settings;

        let pegs: Vec<BodyHandle> = layout
            .pegs
            .iter()
            .filter_map(|peg| {
                let restitution = self.peg_restitution(peg.row, rng);
                world.add_body(
                    BodyDesc::circle(Vec2::new(peg.x, peg.y), settings.peg_radius)
                        .fixed()
                        .with_restitution(restitution),
                )
            })
            .collect();

        let bases = self.build_bases(world, slots);

        let ball_spawn = self.ball_spawn(layout, rng);
        let ball = match world.add_body(
            BodyDesc::circle(ball_spawn, settings.ball_radius)
                .with_restitution(settings.ball_restitution),
        ) {
            Some(ball) => ball,
            None => {
                log::warn!("World rejected the ball body");
                for handle in pegs.iter().chain(&bases) {
                    world.remove_body(*handle);
                }
                return None;
            }
        };

        log::debug!(
            "Scene built: {} pegs, {} base bodies, ball at ({:.1}, {:.1})",
            pegs.len(),
            bases.len(),
            ball_spawn.x,
            ball_spawn.y
        );

        Some(Scene {
            pegs,
            ball,
            bases,
            ball_spawn,
        })
    }

    /// One body per (slot, template); unusable templates are skipped
    fn build_bases<W: PhysicsWorld + ?Sized>(
        &self,
        world: &mut W,
        slots: &SlotSet,
    ) -> Vec<BodyHandle> {
        let Some((field_left, _)) = slots.span() else {
            return Vec::new();
        };

        let mut bases = Vec::with_capacity(slots.len() * self.templates.len());
        for (t, template) in self.templates.iter().enumerate() {
            let Some(template_width) = template.width() else {
                log::warn!("Base template {} has no usable outline, skipping", t);
                continue;
            };
            let min_x = template
                .points
                .iter()
                .fold(f32::INFINITY, |lo, p| lo.min(p.x));
            let points: Vec<Vec2> = template
                .points
                .iter()
                .map(|p| Vec2::new(p.x - min_x, p.y))
                .collect();

            for slot in slots.iter() {
                let desc =
                    BodyDesc::outline(Vec2::new(field_left, slots.base_y), points.clone()).fixed();
                let Some(handle) = world.add_body(desc) else {
                    log::warn!("World rejected base segment for slot {}", slot.index);
                    continue;
                };
                let scale = slot.width / template_width;
                world.scale_body(handle, Vec2::splat(scale));
                world.translate_body(handle, Vec2::new(slot.x_start - field_left, 0.0));
                bases.push(handle);
            }
        }
        bases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::BasicWorld;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Always returns the middle of the range
    struct Midpoint;

    impl RandomSource for Midpoint {
        fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
            (lo + hi) / 2.0
        }
    }

    fn board(settings: &Settings) -> (Layout, SlotSet) {
        let layout = settings.layout();
        let bounds = layout.bounds.unwrap();
        let slots = SlotSet::partition(
            &bounds,
            settings.slot_count,
            bounds.max_y + settings.base_drop,
        );
        (layout, slots)
    }

    #[test]
    fn test_build_registers_all_bodies() {
        let settings = Settings::default();
        let (layout, slots) = board(&settings);
        let templates = [BaseTemplate::cup()];
        let mut world = BasicWorld::default();
        let scene = SceneBuilder::new(&settings, &templates)
            .build(&mut world, &layout, &slots, &mut Midpoint)
            .unwrap();

        assert_eq!(scene.pegs.len(), layout.pegs.len());
        assert_eq!(scene.bases.len(), 17);
        assert_eq!(world.body_count(), scene.body_count());
    }

    #[test]
    fn test_ball_spawn_centered_above_field() {
        let settings = Settings::default();
        let (layout, slots) = board(&settings);
        let mut world = BasicWorld::default();
        let scene = SceneBuilder::new(&settings, &[])
            .build(&mut world, &layout, &slots, &mut Midpoint)
            .unwrap();
        // 1050 / 2.0
        assert!((scene.ball_spawn.x - 525.0).abs() < 1e-3);
        assert_eq!(scene.ball_spawn.y, -20.0);
        let motion = world.body_motion(scene.ball).unwrap();
        assert_eq!(motion.position, scene.ball_spawn);
    }

    #[test]
    fn test_ball_spawn_jitter_band() {
        let settings = Settings::default();
        let layout = settings.layout();
        let builder = SceneBuilder::new(&settings, &[]);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let spawn = builder.ball_spawn(&layout, &mut rng);
            assert!(spawn.x > 1050.0 / 2.1 - 1e-3 && spawn.x <= 1050.0 / 1.9 + 1e-3);
        }
    }

    #[test]
    fn test_peg_restitution_by_row() {
        let settings = Settings::default();
        let builder = SceneBuilder::new(&settings, &[]);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let top = builder.peg_restitution(0, &mut rng);
            assert!((0.1..=0.2).contains(&top));
            let lower = builder.peg_restitution(3, &mut rng);
            assert!((0.4..=0.5).contains(&lower));
        }
    }

    #[test]
    fn test_base_segments_fill_slots() {
        let settings = Settings::default();
        let (layout, slots) = board(&settings);
        let templates = [BaseTemplate::cup()];
        let mut world = BasicWorld::default();
        let scene = SceneBuilder::new(&settings, &templates)
            .build(&mut world, &layout, &slots, &mut Midpoint)
            .unwrap();

        for (handle, slot) in scene.bases.iter().zip(slots.iter()) {
            let bounds = world.body_bounds(*handle).unwrap();
            assert!((bounds.min.x - slot.x_start).abs() < 1e-3);
            assert!((bounds.width() - slot.width).abs() < 1e-3);
            assert!((bounds.min.y - slots.base_y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_template_skipped_slots_unaffected() {
        let settings = Settings::default();
        let (layout, slots) = board(&settings);
        let templates = [BaseTemplate::new(Vec::new()), BaseTemplate::cup()];
        let mut world = BasicWorld::default();
        let scene = SceneBuilder::new(&settings, &templates)
            .build(&mut world, &layout, &slots, &mut Midpoint)
            .unwrap();
        assert_eq!(scene.bases.len(), 17);
        assert_eq!(slots.len(), 17);
    }

    #[test]
    fn test_remove_from_world() {
        let settings = Settings::default();
        let (layout, slots) = board(&settings);
        let templates = [BaseTemplate::cup()];
        let mut world = BasicWorld::default();
        let scene = SceneBuilder::new(&settings, &templates)
            .build(&mut world, &layout, &slots, &mut Midpoint)
            .unwrap();
        scene.remove_from(&mut world);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let settings = Settings::default();
        let layout = settings.layout();
        let builder = SceneBuilder::new(&settings, &[]);
        let a = builder.ball_spawn(&layout, &mut Pcg32::seed_from_u64(5));
        let b = builder.ball_spawn(&layout, &mut Pcg32::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
