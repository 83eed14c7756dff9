//! Simulated bodies
//!
//! A body is a point mass with a radius. Position is the center, y points up.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::settings::{BodySpawn, ConfigError};

/// Stable body identifier (assigned in spawn order, starting at 1)
pub type BodyId = u32;

/// Opaque RGB token, only meaningful to the renderer
pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];

/// What the wall and pair resolvers need to know about a shape.
///
/// Circles are the only implementor today; anything else that can bounce off
/// walls and other bodies must expose the same attributes.
pub trait Collidable {
    fn id(&self) -> BodyId;
    fn position(&self) -> Vector2;
    fn position_mut(&mut self) -> &mut Vector2;
    fn velocity(&self) -> Vector2;
    fn velocity_mut(&mut self) -> &mut Vector2;
    /// Half extent; the collision shape is a circle of this radius
    fn radius(&self) -> f64;
    fn mass(&self) -> f64;
    /// Per-axis coefficient of restitution
    fn elasticity(&self) -> Vector2;
    /// Momentum handed to the (immovable) walls, per axis
    fn wall_momentum_mut(&mut self) -> &mut Vector2;

    /// Restitution used against other bodies: the weaker of the two axes
    fn restitution(&self) -> f64 {
        self.elasticity().min_element()
    }
}

/// A rigid circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
    pub density: f64,
    /// π·radius²·density, fixed at creation
    pub mass: f64,
    pub elasticity: Vector2,
    pub color: Color,
    /// Net momentum absorbed by the walls since the axis last came to rest
    pub wall_momentum: Vector2,
}

impl Body {
    /// Build a body from a validated spawn description
    pub fn new(id: BodyId, spawn: &BodySpawn, world_size: Vector2) -> Result<Self, ConfigError> {
        spawn.validate(world_size)?;
        Ok(Self {
            id,
            position: spawn.position,
            velocity: spawn.velocity,
            radius: spawn.radius,
            density: spawn.density,
            mass: mass_of(spawn.radius, spawn.density),
            elasticity: spawn.elasticity,
            color: spawn.color,
            wall_momentum: Vector2::ZERO,
        })
    }

    /// Linear momentum m·v
    #[inline]
    pub fn momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    /// Kinetic energy m|v|²/2
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Gravitational potential energy above the floor, m·|gy|·h
    ///
    /// Horizontal gravity is ignored.
    #[inline]
    pub fn potential_energy(&self, gravity: Vector2) -> f64 {
        self.mass * gravity.y.abs() * (self.position.y - self.radius)
    }

    /// Whether a point lies inside the body's circle
    pub fn contains_point(&self, point: Vector2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }

    /// Diagnostic line: `p=[x,y] v=[vx,vy] comment`
    pub fn trace_line(&self, comment: &str) -> String {
        self.snapshot().trace_line(comment)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
            color: self.color,
        }
    }
}

/// Area of the circle times density
#[inline]
pub fn mass_of(radius: f64, density: f64) -> f64 {
    PI * radius * radius * density
}

impl Collidable for Body {
    fn id(&self) -> BodyId {
        self.id
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn position_mut(&mut self) -> &mut Vector2 {
        &mut self.position
    }

    fn velocity(&self) -> Vector2 {
        self.velocity
    }

    fn velocity_mut(&mut self) -> &mut Vector2 {
        &mut self.velocity
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn elasticity(&self) -> Vector2 {
        self.elasticity
    }

    fn wall_momentum_mut(&mut self) -> &mut Vector2 {
        &mut self.wall_momentum
    }
}

/// What the renderer gets to see of a body after a completed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
    pub color: Color,
}

impl BodySnapshot {
    /// Diagnostic line: `p=[x,y] v=[vx,vy] comment`
    pub fn trace_line(&self, comment: &str) -> String {
        format!(
            "p=[{:.3},{:.3}] v=[{:.3},{:.3}] {}",
            self.position.x, self.position.y, self.velocity.x, self.velocity.y, comment
        )
    }
}
