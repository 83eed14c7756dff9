//! Wall contact: clamping into the world box and bouncing off its sides
//!
//! The box a body's center may occupy is `[radius, size - radius]` on each
//! axis. Walls are immovable, so momentum they take from a body is tracked on
//! the body for the conservation diagnostics.

use super::body::Collidable;
use super::world::World;
use crate::{axis, axis_mut, snap_zero};

/// Which axes bounced during one wall check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub x: bool,
    pub y: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }

    /// Number of bouncing axes (0, 1 or 2)
    pub fn count(&self) -> usize {
        self.x as usize + self.y as usize
    }

    fn set(&mut self, i: usize) {
        if i == 0 {
            self.x = true;
        } else {
            self.y = true;
        }
    }
}

/// Reflect one velocity component off a wall
///
/// The wall returns `min(elasticity, damping)` of the speed. Whatever is left
/// below `epsilon_v` is residue and becomes an exact zero.
#[inline]
pub fn bounce_axis(velocity: f64, elasticity: f64, damping: f64, epsilon_v: f64) -> f64 {
    snap_zero(-velocity * elasticity.min(damping), epsilon_v)
}

/// Speed left after moving a body by `shift` along an axis with gravity `g`
///
/// Keeps `v²/2 - g·x` unchanged, so pulling a body that sank into the floor
/// back onto it costs the speed it gained below the floor. A shift that would
/// need more energy than the body has leaves it at rest.
#[inline]
pub fn speed_after_shift(velocity: f64, gravity: f64, shift: f64) -> f64 {
    if velocity == 0.0 || gravity == 0.0 || shift == 0.0 {
        return velocity;
    }
    let v2 = velocity * velocity + 2.0 * gravity * shift;
    v2.max(0.0).sqrt().copysign(velocity)
}

/// Whether the body touches the lower wall of axis `i`
#[inline]
pub fn rests_on_lower_wall<C: Collidable>(body: &C, i: usize, world: &World) -> bool {
    (axis(body.position(), i) - body.radius()).abs() < world.rest_tolerance
}

/// Whether the body sits on the floor
#[inline]
pub fn on_ground<C: Collidable>(body: &C, world: &World) -> bool {
    rests_on_lower_wall(body, 1, world)
}

/// Clamp a body into the world box, bouncing on every axis it crossed
///
/// The clamp trades speed for height (see [`speed_after_shift`]) before the
/// bounce, so with lossless walls a bounce neither creates nor destroys
/// energy.
pub fn resolve_walls<C: Collidable>(body: &mut C, world: &World) -> WallContact {
    let radius = body.radius();
    let bounds = world.bounds_for(radius);
    let elasticity = body.elasticity();
    let mass = body.mass();
    let mut contact = WallContact::default();

    for i in 0..2 {
        let pos = axis(body.position(), i);
        let clamped = if pos < radius {
            Some(radius)
        } else if pos > axis(bounds, i) {
            Some(axis(bounds, i))
        } else {
            None
        };

        if let Some(clamped) = clamped {
            *axis_mut(body.position_mut(), i) = clamped;

            let v = speed_after_shift(
                axis(body.velocity(), i),
                axis(world.gravity, i),
                clamped - pos,
            );
            *axis_mut(body.wall_momentum_mut(), i) += 2.0 * mass * v;
            *axis_mut(body.velocity_mut(), i) = bounce_axis(
                v,
                axis(elasticity, i),
                axis(world.damping, i),
                world.epsilon_v,
            );
            contact.set(i);
        }

        // A stopped axis no longer owes anything to the walls
        if axis(body.velocity(), i).abs() < world.epsilon_v {
            *axis_mut(body.wall_momentum_mut(), i) = 0.0;
        }
    }

    contact
}

/// Position-only clamp into the world box; velocity is left alone
pub fn contain<C: Collidable>(body: &mut C, world: &World) {
    let radius = body.radius();
    let bounds = world.bounds_for(radius);
    let pos = body.position_mut();
    pos.x = pos.x.clamp(radius, bounds.x);
    pos.y = pos.y.clamp(radius, bounds.y);
}
