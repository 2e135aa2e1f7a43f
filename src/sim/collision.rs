//! Collision detection and response for the bundled world
//!
//! Only one kind of pair matters on a Plinko board: a moving ball against a
//! static peg (circle) or a static base segment (closed outline).

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Surface normal, pointing from the obstacle toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a static circle (peg)
pub fn ball_circle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> CollisionResult {
    let offset = ball_pos - center;
    let dist = offset.length();
    let reach = ball_radius + radius;
    if dist >= reach {
        return CollisionResult::miss();
    }

    // Dead-center overlap: push straight up
    let normal = if dist > 1e-6 { offset / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        point: center + normal * radius,
        normal,
        penetration: reach - dist,
    }
}

/// Check a ball against a line segment
pub fn ball_segment_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    a: Vec2,
    b: Vec2,
) -> CollisionResult {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();

    let closest = if line_len_sq < 0.0001 {
        a
    } else {
        let t = ((ball_pos - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        a + line_vec * t
    };

    let dist = (ball_pos - closest).length();
    if dist >= ball_radius {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        (ball_pos - closest) / dist
    } else {
        // Ball center is on the line - use the perpendicular facing up
        let perp = Vec2::new(-line_vec.y, line_vec.x).normalize_or_zero();
        if perp.y > 0.0 { -perp } else if perp == Vec2::ZERO { Vec2::NEG_Y } else { perp }
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: ball_radius - dist,
    }
}

/// Check a ball against every edge of a closed outline, returning the deepest contact
pub fn ball_outline_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    points: &[Vec2],
) -> CollisionResult {
    let n = points.len();
    if n < 2 {
        return CollisionResult::miss();
    }

    let mut best = CollisionResult::miss();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let result = ball_segment_collision(ball_pos, ball_radius, a, b);
        if result.hit && result.penetration > best.penetration {
            best = result;
        }
    }
    best
}

/// Velocity after hitting a static surface.
///
/// The normal component bounces with `restitution` unless it is slower than
/// `rest_speed`, in which case it is cancelled so the ball can come to rest.
/// The tangential component loses a `friction` fraction.
pub fn bounce_velocity(
    velocity: Vec2,
    normal: Vec2,
    restitution: f32,
    friction: f32,
    rest_speed: f32,
) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        // Already separating
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = (velocity - normal_part) * (1.0 - friction).clamp(0.0, 1.0);
    let bounced = if -vn < rest_speed {
        Vec2::ZERO
    } else {
        -normal_part * restitution
    };
    tangent_part + bounced
}
