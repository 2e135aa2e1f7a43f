//! Physics world interface
//!
//! The round logic never integrates motion itself. It creates bodies in a
//! world, steps it, and reads back position and velocity. Any 2D rigid-body
//! engine can sit behind `PhysicsWorld`; `BasicWorld` is the bundled one.

use glam::Vec2;

/// Opaque handle to a body inside a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Collision shape, in body-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Closed outline; edges run between consecutive points and back to the first
    Outline { points: Vec<Vec2> },
}

/// Description of a body before creation
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: Vec2,
    pub is_static: bool,
    pub restitution: f32,
    pub friction: f32,
}

impl BodyDesc {
    /// A circle centered on `position`
    pub fn circle(position: Vec2, radius: f32) -> Self {
        Self {
            shape: Shape::Circle { radius },
            position,
            is_static: false,
            restitution: 0.0,
            friction: 0.1,
        }
    }

    /// A polygon whose outline points are offsets from `position`
    pub fn outline(position: Vec2, points: Vec<Vec2>) -> Self {
        Self {
            shape: Shape::Outline { points },
            position,
            is_static: false,
            restitution: 0.0,
            friction: 0.1,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

/// Position and velocity of a body after a step.
///
/// Velocity is displacement per step, not per second, so speed thresholds
/// stay independent of the step length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMotion {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// The black-box rigid-body engine a round runs against
pub trait PhysicsWorld {
    /// Register a body. Returns `None` if the shape is degenerate
    /// (e.g. an outline with fewer than two points).
    fn add_body(&mut self, desc: BodyDesc) -> Option<BodyHandle>;

    /// Remove a body; `false` if the handle was unknown
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// Remove every body
    fn clear(&mut self);

    /// Scale a body's shape about its position
    fn scale_body(&mut self, handle: BodyHandle, scale: Vec2);

    /// Move a body by `offset`
    fn translate_body(&mut self, handle: BodyHandle, offset: Vec2);

    /// World-space bounds of a body's shape
    fn body_bounds(&self, handle: BodyHandle) -> Option<Aabb>;

    fn body_motion(&self, handle: BodyHandle) -> Option<BodyMotion>;

    fn body_count(&self) -> usize;

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);
}
