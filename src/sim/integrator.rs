//! Fixed-step motion under constant gravity

use serde::{Deserialize, Serialize};

use super::body::Collidable;
use super::boundary::rests_on_lower_wall;
use super::world::World;
use crate::{Vector2, axis, axis_mut};

/// Position update rule, chosen once per world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationScheme {
    /// v += g·dt, then x += v·dt
    #[default]
    SemiImplicitEuler,
    /// x += v·dt + g·dt²/2, then v += g·dt. Exact for constant gravity.
    VelocityVerlet,
}

/// Advance one body by `world.dt`
///
/// Gravity is skipped on an axis where the body already sits still against
/// the lower wall, so a settled body is not pushed into the floor before
/// friction gets to act on it.
pub fn integrate<C: Collidable>(body: &mut C, world: &World) {
    let dt = world.dt;
    for i in 0..2 {
        let v_old = axis(body.velocity(), i);
        let g = if v_old == 0.0 && rests_on_lower_wall(body, i, world) {
            0.0
        } else {
            axis(world.gravity, i)
        };
        let v_new = v_old + g * dt;

        let dx = match world.scheme {
            IntegrationScheme::SemiImplicitEuler => v_new * dt,
            IntegrationScheme::VelocityVerlet => v_old * dt + 0.5 * g * dt * dt,
        };

        *axis_mut(body.velocity_mut(), i) = v_new;
        *axis_mut(body.position_mut(), i) += dx;
    }
}

/// Advance a body whose velocity is dictated from outside (dragged)
pub fn integrate_dragged<C: Collidable>(body: &mut C, drag_velocity: Vector2, world: &World) {
    *body.velocity_mut() = drag_velocity;
    *body.position_mut() += drag_velocity * world.dt;
}
