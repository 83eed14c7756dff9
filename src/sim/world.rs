//! Global simulation parameters

use serde::{Deserialize, Serialize};

use super::integrator::IntegrationScheme;
use crate::Vector2;
use crate::consts::REST_TOLERANCE;
use crate::settings::{ConfigError, SimConfig};

/// World bounds and physical constants shared by every body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Width and height; the lower-left corner is the origin
    pub size: Vector2,
    pub gravity: Vector2,
    /// Per-axis velocity restitution of the walls
    pub damping: Vector2,
    /// Kinetic friction coefficient on the floor
    pub friction: f64,
    /// Fixed timestep
    pub dt: f64,
    /// Speed below which a bouncing or sliding axis is considered stopped
    pub epsilon_v: f64,
    /// Distance below which a body counts as touching a wall
    pub rest_tolerance: f64,
    pub scheme: IntegrationScheme,
}

impl World {
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            size: config.size,
            gravity: config.gravity,
            damping: config.damping,
            friction: config.friction,
            dt: config.dt,
            epsilon_v: rest_speed(config.gravity, config.dt),
            rest_tolerance: REST_TOLERANCE,
            scheme: config.scheme,
        })
    }

    /// Highest allowed center position for a body of this radius
    #[inline]
    pub fn bounds_for(&self, radius: f64) -> Vector2 {
        self.size - Vector2::splat(radius)
    }
}

/// Half the speed gravity adds in one step: anything slower is floating point
/// residue from the last bounce.
pub fn rest_speed(gravity: Vector2, dt: f64) -> f64 {
    gravity.abs().max_element() * dt / 2.0
}
