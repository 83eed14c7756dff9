//! Rain Balls - fixed-step 2D physics for a handful of circular bodies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, walls, friction, collisions)
//! - `settings`: Scene configuration and validation
//! - `renderer`: Snapshot consumer seam for whatever draws the bodies
//! - `input`: Raw input events to control commands

pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{BodySpawn, ConfigError, RainConfig, SimConfig};
pub use sim::{Command, Simulation, StepReport};

use glam::DVec2;

/// 2D vector used throughout the simulation (world units, y pointing up)
pub type Vector2 = DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Default world dimensions
    pub const WORLD_WIDTH: f64 = 1600.0;
    pub const WORLD_HEIGHT: f64 = 900.0;

    /// Default gravity (units/s², pointing down)
    pub const GRAVITY_Y: f64 = -200.0;
    /// Default velocity restitution on boundaries, per axis
    pub const WALL_DAMPING: f64 = 0.8;
    /// Default kinetic friction coefficient
    pub const FRICTION: f64 = 0.1;

    /// General floating point threshold
    pub const EPSILON: f64 = 1e-7;
    /// Distance tolerance for "resting on a wall"
    pub const REST_TOLERANCE: f64 = 1e-9;

    /// Drag velocity per unit of pointer offset
    pub const DRAG_GAIN: f64 = 10.0;

    /// Upper bound on a rain scene's ball count
    pub const MAX_RAIN_BODIES: u32 = 10_000;

    /// Default body properties
    pub const BODY_DENSITY: f64 = 1.0;
    pub const BODY_ELASTICITY: f64 = 1.0;
}

/// Read one axis of a vector (0 = x, 1 = y)
#[inline]
pub fn axis(v: Vector2, i: usize) -> f64 {
    if i == 0 { v.x } else { v.y }
}

/// Mutable access to one axis of a vector (0 = x, 1 = y)
#[inline]
pub fn axis_mut(v: &mut Vector2, i: usize) -> &mut f64 {
    if i == 0 { &mut v.x } else { &mut v.y }
}

/// Rotate a vector 90° counter-clockwise
#[inline]
pub fn perpendicular(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Snap a value to zero when it is within `eps` of it
#[inline]
pub fn snap_zero(value: f64, eps: f64) -> f64 {
    if value.abs() < eps { 0.0 } else { value }
}
