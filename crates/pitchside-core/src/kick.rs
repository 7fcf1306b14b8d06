//! Launch velocity for ball pushes.
//!
//! Ground kicks scale the planar displacement. Lofted kicks use an
//! empirically tuned speed curve so the ball lands near the target despite
//! drag; the vertical component equals the launch speed, which is a
//! heuristic rather than a true ballistic solve.

use crate::model::{ServerPoint, Velocity};

/// Multiplier on displacement for ground kicks.
pub const GROUND_POWER_FACTOR: f32 = 1.475;
/// Linear drag term in the lofted speed curve.
pub const AIR_DRAG_LINEAR: f32 = 0.82;
/// Quadratic drag term in the lofted speed curve.
pub const AIR_DRAG_QUADRATIC: f32 = 0.022;
pub const GRAVITY: f32 = 9.81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum KickKind {
    #[strum(serialize = "ground")]
    Ground,
    #[strum(serialize = "lofted")]
    Lofted,
}

/// Launch speed for a lofted kick covering `distance` metres.
pub fn lofted_speed(distance: f32) -> f32 {
    (GRAVITY * distance * (AIR_DRAG_LINEAR + AIR_DRAG_QUADRATIC * distance)).sqrt()
}

/// Velocity that sends a ball at `ball` towards `target`, both in the
/// server frame. Only the planar displacement matters.
pub fn compute_kick_velocity(ball: ServerPoint, target: ServerPoint, kind: KickKind) -> Velocity {
    let dx = target.0.x - ball.0.x;
    let dy = target.0.y - ball.0.y;
    let distance = dx.hypot(dy);
    if distance <= f32::EPSILON {
        return Velocity::zeros();
    }

    match kind {
        KickKind::Ground => Velocity::new(dx * GROUND_POWER_FACTOR, dy * GROUND_POWER_FACTOR, 0.0),
        KickKind::Lofted => {
            let speed = lofted_speed(distance);
            let bearing = dy.atan2(dx);
            Velocity::new(bearing.cos() * speed, bearing.sin() * speed, speed)
        }
    }
}
