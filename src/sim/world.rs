//! Bundled rigid-body world
//!
//! A small impulse world good enough for a Plinko board: one or a few
//! dynamic circles falling under gravity through static circles and static
//! outlines. Dynamic bodies do not collide with each other.

use glam::Vec2;

use super::collision::{ball_circle_collision, ball_outline_collision, bounce_velocity};
use super::physics::{Aabb, BodyDesc, BodyHandle, BodyMotion, PhysicsWorld, Shape};

/// Integration substeps per `step` call (keeps a fast ball from skipping a peg)
pub const WORLD_SUBSTEPS: u32 = 4;
/// Fraction of velocity lost to air per second
pub const AIR_FRICTION: f32 = 0.6;
/// Passes over the static bodies per substep (resolves corner contacts)
const CONTACT_ITERATIONS: usize = 2;

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    shape: Shape,
    position: Vec2,
    /// Pixels per second
    velocity: Vec2,
    is_static: bool,
    restitution: f32,
    friction: f32,
}

impl Body {
    fn bounds(&self) -> Aabb {
        match &self.shape {
            Shape::Circle { radius } => Aabb {
                min: self.position - Vec2::splat(*radius),
                max: self.position + Vec2::splat(*radius),
            },
            Shape::Outline { points } => {
                let (min, max) = points.iter().fold(
                    (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                    |(min, max), p| (min.min(*p), max.max(*p)),
                );
                Aabb {
                    min: self.position + min,
                    max: self.position + max,
                }
            }
        }
    }
}

/// The bundled `PhysicsWorld`
#[derive(Debug, Clone)]
pub struct BasicWorld {
    /// Acceleration applied to dynamic bodies (pixels/s², +y is down)
    pub gravity: Vec2,
    bodies: Vec<Body>,
    next_handle: u32,
    /// Length of the last step, used to report per-step velocity
    last_dt: f32,
}

impl BasicWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            next_handle: 1,
            last_dt: crate::consts::SIM_DT,
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    fn substep(&mut self, dt: f32) {
        let gravity = self.gravity;
        let damping = (1.0 - AIR_FRICTION * dt).clamp(0.0, 1.0);
        // Slower than one substep of gravity into a surface counts as resting
        let rest_speed = gravity.length() * dt * 2.0;

        let (statics, dynamics): (Vec<&mut Body>, Vec<&mut Body>) =
            self.bodies.iter_mut().partition(|b| b.is_static);

        for ball in dynamics {
            let Shape::Circle { radius } = ball.shape else {
                continue;
            };

            ball.velocity = (ball.velocity + gravity * dt) * damping;
            ball.position += ball.velocity * dt;

            for _ in 0..CONTACT_ITERATIONS {
                for other in statics.iter() {
                    let result = match &other.shape {
                        Shape::Circle { radius: r } => {
                            ball_circle_collision(ball.position, radius, other.position, *r)
                        }
                        Shape::Outline { points } => {
                            let local = ball.position - other.position;
                            let mut result = ball_outline_collision(local, radius, points);
                            result.point += other.position;
                            result
                        }
                    };
                    if !result.hit {
                        continue;
                    }

                    ball.position += result.normal * result.penetration;
                    ball.velocity = bounce_velocity(
                        ball.velocity,
                        result.normal,
                        ball.restitution.max(other.restitution),
                        ball.friction.max(other.friction),
                        rest_speed,
                    );
                }
            }
        }
    }
}

impl Default for BasicWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, crate::consts::GRAVITY))
    }
}

impl PhysicsWorld for BasicWorld {
    fn add_body(&mut self, desc: BodyDesc) -> Option<BodyHandle> {
        match &desc.shape {
            Shape::Circle { radius } if !(*radius > 0.0) => return None,
            Shape::Outline { points } if points.len() < 2 => return None,
            _ => {}
        }

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.push(Body {
            handle,
            shape: desc.shape,
            position: desc.position,
            velocity: Vec2::ZERO,
            is_static: desc.is_static,
            restitution: desc.restitution,
            friction: desc.friction,
        });
        Some(handle)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != handle);
        self.bodies.len() != before
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn scale_body(&mut self, handle: BodyHandle, scale: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            match &mut body.shape {
                Shape::Circle { radius } => *radius *= scale.x.abs().max(scale.y.abs()),
                Shape::Outline { points } => {
                    for p in points.iter_mut() {
                        *p *= scale;
                    }
                }
            }
        }
    }

    fn translate_body(&mut self, handle: BodyHandle, offset: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.position += offset;
        }
    }

    fn body_bounds(&self, handle: BodyHandle) -> Option<Aabb> {
        self.body(handle).map(Body::bounds)
    }

    fn body_motion(&self, handle: BodyHandle) -> Option<BodyMotion> {
        let dt = self.last_dt;
        self.body(handle).map(|b| BodyMotion {
            position: b.position,
            velocity: b.velocity * dt,
        })
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.last_dt = dt;
        let sub_dt = dt / WORLD_SUBSTEPS as f32;
        for _ in 0..WORLD_SUBSTEPS {
            self.substep(sub_dt);
        }
    }
}
