//! Simulation state: the world, its bodies and the control state machine
//!
//! Everything the loop mutates lives here and nowhere else. Renderers only
//! ever see snapshots taken between steps.

use super::body::{Body, BodyId, BodySnapshot};
use super::conservation::Conservation;
use super::control::{Command, ControlMode, SimulationControl};
use super::spawn::rain;
use super::world::World;
use crate::Vector2;
use crate::consts::DRAG_GAIN;
use crate::settings::{BodySpawn, ConfigError, SimConfig};

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    /// Bodies in ascending id order
    bodies: Vec<Body>,
    pub control: SimulationControl,
    /// Steps run so far
    pub time_ticks: u64,
    next_id: BodyId,
}

impl Simulation {
    /// Build the world and spawn the configured bodies, then the rain
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let world = World::new(config)?;
        let mut sim = Self {
            world,
            bodies: Vec::with_capacity(config.bodies.len()),
            control: SimulationControl::new(config.autoplay),
            time_ticks: 0,
            next_id: 1,
        };

        for spawn in &config.bodies {
            sim.spawn(spawn)?;
        }
        if let Some(rain_config) = &config.rain {
            for spawn in rain(rain_config, sim.world.size)? {
                sim.spawn(&spawn)?;
            }
        }

        log::info!(
            "World {}x{} with {} bodies, gravity [{}, {}], dt {:.4}",
            sim.world.size.x,
            sim.world.size.y,
            sim.bodies.len(),
            sim.world.gravity.x,
            sim.world.gravity.y,
            sim.world.dt
        );

        Ok(sim)
    }

    /// Allocate a new body ID
    fn next_body_id(&mut self) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body; ids grow monotonically so the list stays sorted
    pub fn spawn(&mut self, spawn: &BodySpawn) -> Result<BodyId, ConfigError> {
        let body = Body::new(self.next_id, spawn, self.world.size)?;
        let id = self.next_body_id();
        log::debug!("spawn {}: {}", id, body.trace_line(&format!("r={:.1}", body.radius)));
        self.bodies.push(body);
        Ok(id)
    }

    /// Read-only snapshot of every body, for the renderer
    pub fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
        self.bodies.iter().map(Body::snapshot)
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies().collect()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        let i = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(&self.bodies[i])
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let i = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(&mut self.bodies[i])
    }

    /// Mutable access to the full body list for the step pipeline
    pub(crate) fn parts_mut(&mut self) -> (&World, &mut [Body], &SimulationControl) {
        (&self.world, &mut self.bodies, &self.control)
    }

    /// First body whose circle contains the point
    pub fn body_at(&self, point: Vector2) -> Option<BodyId> {
        self.bodies.iter().find(|b| b.contains_point(point)).map(|b| b.id)
    }

    pub fn mode(&self) -> ControlMode {
        self.control.mode
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.control.selected
    }

    pub fn is_stopped(&self) -> bool {
        self.control.stop_requested
    }

    /// Apply a control command
    ///
    /// Unknown body ids are rejected with a warning. Selecting or releasing a
    /// body clears its wall momentum.
    pub fn set_control(&mut self, command: Command) {
        match command {
            Command::Select(id) => {
                if self.body(id).is_none() {
                    log::warn!("select: no body with id {}", id);
                    return;
                }
                self.release_selection();
                self.control.select(id);
                if let Some(body) = self.body_mut(id) {
                    body.wall_momentum = Vector2::ZERO;
                    log::debug!("{}", body.trace_line("Selected"));
                }
            }
            Command::Deselect => self.release_selection(),
            Command::SetSelectedVelocity(velocity) => {
                if !self.control.set_drag(velocity) {
                    log::warn!("drag ignored: no body selected");
                }
            }
            Command::Pause | Command::Step => {
                self.control.apply_mode(command);
                if self.control.mode == ControlMode::Paused {
                    self.trace_first("Paused");
                }
            }
            _ => self.control.apply_mode(command),
        }
    }

    /// Log the first body's diagnostic line
    pub(crate) fn trace_first(&self, comment: &str) {
        if let Some(first) = self.bodies.first() {
            log::debug!("{}", first.trace_line(comment));
        }
    }

    fn release_selection(&mut self) {
        if let Some(id) = self.control.deselect() {
            if let Some(body) = self.body_mut(id) {
                body.wall_momentum = Vector2::ZERO;
            }
        }
    }

    /// Drag the selected body toward a point
    pub fn drag_toward(&mut self, point: Vector2) -> bool {
        let Some(body) = self.control.selected.and_then(|id| self.body(id)) else {
            return false;
        };
        let velocity = drag_velocity(body.position, point);
        self.control.set_drag(velocity)
    }

    /// Current momentum and energy totals
    pub fn conservation(&self) -> Conservation {
        Conservation::measure(&self.bodies, &self.world)
    }
}

/// Velocity that pulls a body at `from` toward `to`
///
/// Proportional to the offset, so the body closes a fixed fraction of the
/// gap every second.
#[inline]
pub fn drag_velocity(from: Vector2, to: Vector2) -> Vector2 {
    (to - from) * DRAG_GAIN
}
