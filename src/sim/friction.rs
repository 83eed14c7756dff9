//! Kinetic friction for bodies sliding along the floor

use super::body::Collidable;
use super::boundary::on_ground;
use super::world::World;
use crate::snap_zero;

/// Slow a grounded body's horizontal motion
///
/// Applies only to bodies on the floor with no vertical velocity. The speed
/// lost in one step is `|gy|·friction·dt`, never more than the body has, so
/// friction cannot reverse the direction of travel.
pub fn apply_friction<C: Collidable>(body: &mut C, world: &World) {
    if body.velocity().y != 0.0 || !on_ground(body, world) {
        return;
    }

    let vx = body.velocity().x;
    let decel = vx.abs().min((world.gravity.y * world.friction * world.dt).abs());
    let vel = body.velocity_mut();
    vel.x = snap_zero(vx - decel.copysign(vx), world.epsilon_v);
}
