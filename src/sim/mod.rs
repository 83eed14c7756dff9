//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod conservation;
pub mod control;
pub mod friction;
pub mod integrator;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, BodyId, BodySnapshot, Collidable, Color, WHITE, mass_of};
pub use boundary::{WallContact, bounce_axis, contain, on_ground, resolve_walls, speed_after_shift};
pub use collision::{
    CollisionOutcome, CollisionTally, bounding_boxes_overlap, resolve_all, resolve_pair,
};
pub use conservation::Conservation;
pub use control::{Command, ControlMode, SimulationControl};
pub use friction::apply_friction;
pub use integrator::{IntegrationScheme, integrate, integrate_dragged};
pub use spawn::rain;
pub use state::{Simulation, drag_velocity};
pub use tick::{StepReport, step};
pub use world::World;
