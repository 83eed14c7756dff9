//! Momentum and energy bookkeeping
//!
//! Diagnostic only: nothing here feeds back into the simulation. Momentum
//! must stay constant while wall interactions are accounted for; energy stays
//! constant only when every restitution coefficient is 1.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::world::World;
use crate::Vector2;
use crate::consts::EPSILON;
use crate::snap_zero;

/// System-wide totals at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Conservation {
    /// Σ(m·v + wall momentum)
    pub momentum: Vector2,
    /// Σ(kinetic + gravitational potential)
    pub energy: f64,
}

impl Conservation {
    /// Measure totals over a set of bodies
    pub fn measure<'a>(bodies: impl IntoIterator<Item = &'a Body>, world: &World) -> Self {
        let mut momentum = Vector2::ZERO;
        let mut energy = 0.0;

        for body in bodies {
            let p = body.momentum();
            if p.length() > EPSILON {
                momentum += p + body.wall_momentum;
            }
            energy += body.kinetic_energy() + body.potential_energy(world.gravity);
        }

        Self {
            momentum: Vector2::new(snap_zero(momentum.x, EPSILON), snap_zero(momentum.y, EPSILON)),
            energy: snap_zero(energy, EPSILON),
        }
    }
}
