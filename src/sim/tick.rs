//! Fixed timestep simulation step
//!
//! One step advances every body by exactly `world.dt`. The stages run in a
//! fixed order over all bodies, each seeing the finished output of the last:
//! integrate, walls, friction, pairwise collisions, containment.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::boundary::{contain, resolve_walls};
use super::collision::resolve_all;
use super::conservation::Conservation;
use super::control::{ControlMode, SimulationControl};
use super::friction::apply_friction;
use super::integrator::{integrate, integrate_dragged};
use super::state::Simulation;
use super::world::World;

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Body pairs whose overlap was resolved
    pub collisions: u32,
    /// Pairs whose bounding squares met but circles did not
    pub false_positives: u32,
    /// Pairs skipped for sharing a center
    pub degenerate: u32,
    /// Axis bounces off the walls
    pub wall_bounces: u32,
    /// Totals after the step
    pub conservation: Conservation,
}

/// Advance a set of bodies by one timestep
///
/// `bodies` must be in ascending id order; pairs are resolved in that order.
pub fn step(world: &World, bodies: &mut [Body], control: &SimulationControl) -> StepReport {
    for body in bodies.iter_mut() {
        match control.drag_for(body.id) {
            Some(drag) => integrate_dragged(body, drag, world),
            None => integrate(body, world),
        }
    }

    let mut wall_bounces = 0;
    for body in bodies.iter_mut() {
        wall_bounces += resolve_walls(body, world).count() as u32;
    }

    for body in bodies.iter_mut() {
        apply_friction(body, world);
    }

    let tally = resolve_all(bodies);

    // Pair correction may push a body through a wall; put it back
    for body in bodies.iter_mut() {
        contain(body, world);
    }

    StepReport {
        collisions: tally.resolved,
        false_positives: tally.false_positives,
        degenerate: tally.degenerate,
        wall_bounces,
        conservation: Conservation::measure(bodies.iter(), world),
    }
}

impl Simulation {
    /// Run one step regardless of the control mode
    pub fn step(&mut self) -> StepReport {
        let (world, bodies, control) = self.parts_mut();
        let report = step(world, bodies, control);
        self.time_ticks += 1;

        if report.collisions > 0 {
            log::debug!("tick {}: {} collisions", self.time_ticks, report.collisions);
        }
        report
    }

    /// Step if the control mode allows it
    ///
    /// Returns `None` while paused or after a stop was requested. A pending
    /// single step runs once and leaves the simulation paused.
    pub fn advance(&mut self) -> Option<StepReport> {
        if self.control.stop_requested || !self.control.should_step() {
            return None;
        }
        let report = self.step();
        if self.control.mode == ControlMode::SingleStep {
            self.control.finish_step();
            self.trace_first("Frame");
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector2;
    use crate::consts::SIM_DT;
    use crate::settings::{BodySpawn, SimConfig};
    use crate::sim::control::Command;
    use crate::sim::integrator::IntegrationScheme;

    fn frictionless(size: Vector2, bodies: Vec<BodySpawn>) -> Simulation {
        let mut config = SimConfig::frictionless(size);
        config.bodies = bodies;
        Simulation::new(&config).unwrap()
    }

    #[test]
    fn test_rest_stability_on_floor() {
        let config = SimConfig {
            size: Vector2::new(400.0, 300.0),
            bodies: vec![BodySpawn::new(20.0, Vector2::new(200.0, 20.0))],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();

        for _ in 0..1000 {
            sim.step();
        }

        let body = sim.body(1).unwrap();
        assert_eq!(body.velocity, Vector2::ZERO);
        assert_eq!(body.position, Vector2::new(200.0, 20.0));
    }

    #[test]
    fn test_dropped_body_settles() {
        let config = SimConfig {
            bodies: vec![
                BodySpawn::new(20.0, Vector2::new(100.0, 120.0)).with_velocity(Vector2::new(50.0, 0.0)),
            ],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();

        for _ in 0..2000 {
            sim.step();
        }

        let body = sim.body(1).unwrap();
        assert_eq!(body.velocity, Vector2::ZERO);
        assert_eq!(body.position.y, 20.0);
        assert_eq!(body.wall_momentum, Vector2::ZERO);
    }

    #[test]
    fn test_no_op_step_is_bit_identical() {
        let mut sim = frictionless(
            Vector2::new(1000.0, 1000.0),
            vec![
                BodySpawn::new(10.0, Vector2::new(123.456, 654.321)),
                BodySpawn::new(30.0, Vector2::new(30.0, 30.0)),
                BodySpawn::new(25.0, Vector2::new(975.0, 500.125)),
            ],
        );
        let before = sim.snapshot();

        for _ in 0..100 {
            let report = sim.step();
            assert_eq!(report.collisions, 0);
            assert_eq!(report.wall_bounces, 0);
        }

        let after = sim.snapshot();
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
            assert_eq!(a.velocity.y.to_bits(), b.velocity.y.to_bits());
        }
    }

    #[test]
    fn test_elastic_head_on_swap() {
        let mut sim = frictionless(
            Vector2::new(1000.0, 1000.0),
            vec![
                BodySpawn::new(50.0, Vector2::new(100.0, 0.0)).with_velocity(Vector2::new(100.0, 0.0)),
                BodySpawn::new(50.0, Vector2::new(300.0, 0.0)).with_velocity(Vector2::new(-100.0, 0.0)),
            ],
        );

        let mut hit = false;
        for _ in 0..60 {
            let report = sim.step();
            if report.collisions > 0 {
                hit = true;
                break;
            }
        }
        assert!(hit);

        let a = sim.body(1).unwrap();
        let b = sim.body(2).unwrap();
        assert!(a.velocity.abs_diff_eq(Vector2::new(-100.0, 0.0), 1e-9));
        assert!(b.velocity.abs_diff_eq(Vector2::new(100.0, 0.0), 1e-9));
        assert!((a.position.distance(b.position) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_conserved_when_lossless() {
        let mut sim = frictionless(
            Vector2::new(600.0, 400.0),
            vec![
                BodySpawn::new(30.0, Vector2::new(100.0, 100.0)).with_velocity(Vector2::new(250.0, 130.0)),
                BodySpawn::new(20.0, Vector2::new(300.0, 200.0)).with_velocity(Vector2::new(-180.0, 90.0)),
                BodySpawn::new(40.0, Vector2::new(480.0, 300.0)).with_velocity(Vector2::new(60.0, -220.0)),
                BodySpawn::new(15.0, Vector2::new(250.0, 330.0)).with_velocity(Vector2::new(-40.0, -40.0)),
            ],
        );
        let start = sim.conservation().energy;

        let mut collisions = 0;
        for _ in 0..1200 {
            collisions += sim.step().collisions;
        }

        assert!(collisions > 0);
        let end = sim.conservation().energy;
        assert!((end - start).abs() < 1e-9 * start);
    }

    #[test]
    fn test_energy_conserved_in_free_flight_with_verlet() {
        let config = SimConfig {
            size: Vector2::new(10_000.0, 10_000.0),
            damping: Vector2::ONE,
            friction: 0.0,
            scheme: IntegrationScheme::VelocityVerlet,
            bodies: vec![
                BodySpawn::new(10.0, Vector2::new(100.0, 5000.0)).with_velocity(Vector2::new(50.0, 300.0)),
            ],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();
        let start = sim.conservation().energy;

        for _ in 0..300 {
            let report = sim.step();
            assert_eq!(report.wall_bounces, 0);
        }

        let end = sim.conservation().energy;
        assert!((end - start).abs() < 1e-9 * start);
    }

    /// Drop a body from rest 400 above the floor at the default timestep;
    /// returns the height of the first bounce and the steps taken to reach it
    fn first_apex(scheme: IntegrationScheme) -> (f64, u32) {
        let radius = 10.0;
        let config = SimConfig {
            damping: Vector2::ONE,
            friction: 0.0,
            scheme,
            bodies: vec![BodySpawn::new(radius, Vector2::new(100.0, radius + 400.0))],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();

        let mut bounced = false;
        let mut apex = 0.0_f64;
        let mut steps = 0;
        for _ in 0..1000 {
            let report = sim.step();
            steps += 1;
            let body = sim.body(1).unwrap();
            if report.wall_bounces > 0 {
                bounced = true;
            }
            if bounced {
                apex = apex.max(body.position.y - radius);
                if body.velocity.y < 0.0 {
                    break;
                }
            }
        }
        assert!(bounced);
        (apex, steps)
    }

    #[test]
    fn test_drop_bounce_returns_to_height_with_verlet() {
        let (apex, _) = first_apex(IntegrationScheme::VelocityVerlet);
        // Sampling at dt can miss the vertex by at most g·dt²/8
        let slack = 200.0 * SIM_DT * SIM_DT / 8.0;
        assert!(apex <= 400.0 + 1e-6, "apex {apex}");
        assert!(apex >= 400.0 - slack - 1e-6, "apex {apex}");
    }

    #[test]
    fn test_drop_bounce_with_euler_loses_only_integration_drift() {
        let (apex, steps) = first_apex(IntegrationScheme::SemiImplicitEuler);
        // Each airborne step loses g·dt²/2 of height
        let drift = steps as f64 * 0.5 * 200.0 * SIM_DT * SIM_DT;
        assert!(apex < 400.0, "apex {apex}");
        assert!(400.0 - apex <= drift + 200.0 * SIM_DT * SIM_DT, "apex {apex}, drift {drift}");
    }

    #[test]
    fn test_energy_conserved_under_gravity_with_verlet() {
        let config = SimConfig {
            damping: Vector2::ONE,
            friction: 0.0,
            scheme: IntegrationScheme::VelocityVerlet,
            bodies: vec![
                BodySpawn::new(20.0, Vector2::new(100.0, 300.0)).with_velocity(Vector2::new(150.0, 0.0)),
            ],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();
        let start = sim.conservation().energy;

        let mut bounces = 0;
        for _ in 0..3000 {
            bounces += sim.step().wall_bounces;
        }

        assert!(bounces > 10);
        let end = sim.conservation().energy;
        assert!((end - start).abs() < 1e-6 * start, "{start} -> {end}");
    }

    #[test]
    fn test_euler_energy_drift_per_step() {
        let config = SimConfig {
            damping: Vector2::ONE,
            friction: 0.0,
            bodies: vec![
                BodySpawn::new(10.0, Vector2::new(100.0, 800.0)).with_velocity(Vector2::new(30.0, 0.0)),
            ],
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();
        let mass = sim.body(1).unwrap().mass;
        let start = sim.conservation().energy;

        for _ in 0..30 {
            assert_eq!(sim.step().wall_bounces, 0);
        }

        let expected = start - 30.0 * 0.5 * mass * 200.0 * 200.0 * SIM_DT * SIM_DT;
        let end = sim.conservation().energy;
        assert!((end - expected).abs() < 1e-9 * start, "{end} vs {expected}");
    }

    #[test]
    fn test_momentum_conserved_away_from_walls() {
        let mut sim = frictionless(
            Vector2::new(2000.0, 2000.0),
            vec![
                BodySpawn::new(40.0, Vector2::new(900.0, 1000.0)).with_velocity(Vector2::new(120.0, 10.0)),
                BodySpawn::new(40.0, Vector2::new(1100.0, 1010.0)).with_velocity(Vector2::new(-80.0, -20.0)),
            ],
        );
        let start = sim.conservation().momentum;

        let mut collisions = 0;
        for _ in 0..120 {
            let report = sim.step();
            collisions += report.collisions;
            assert_eq!(report.wall_bounces, 0);
        }

        assert_eq!(collisions, 1);
        assert!(sim.conservation().momentum.abs_diff_eq(start, 1e-6 * start.length()));
    }

    #[test]
    fn test_wall_momentum_keeps_total_constant() {
        let mut sim = frictionless(
            Vector2::new(300.0, 300.0),
            vec![BodySpawn::new(10.0, Vector2::new(289.0, 150.0)).with_velocity(Vector2::new(120.0, 0.0))],
        );
        let start = sim.conservation().momentum;

        let report = sim.step();
        assert_eq!(report.wall_bounces, 1);
        assert!(sim.body(1).unwrap().velocity.x < 0.0);

        assert!(sim.conservation().momentum.abs_diff_eq(start, 1e-9 * start.length()));
    }

    #[test]
    fn test_bounds_hold_after_every_step() {
        let config = SimConfig {
            size: Vector2::new(500.0, 400.0),
            rain: Some(crate::settings::RainConfig {
                count: 30,
                seed: 11,
                max_radius: 40.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).unwrap();

        for _ in 0..600 {
            sim.step();
            for b in sim.bodies() {
                assert!(b.position.x >= b.radius && b.position.x <= 500.0 - b.radius);
                assert!(b.position.y >= b.radius && b.position.y <= 400.0 - b.radius);
                assert!(b.velocity.is_finite());
            }
        }
    }

    #[test]
    fn test_dragged_body_follows_override() {
        let mut sim = frictionless(
            Vector2::new(1000.0, 1000.0),
            vec![BodySpawn::new(10.0, Vector2::new(500.0, 500.0))],
        );
        sim.set_control(Command::Select(1));
        sim.set_control(Command::SetSelectedVelocity(Vector2::new(60.0, 0.0)));

        sim.step();
        let body = sim.body(1).unwrap();
        assert_eq!(body.velocity, Vector2::new(60.0, 0.0));
        assert!((body.position.x - 501.0).abs() < 1e-9);

        // Released bodies keep their last velocity
        sim.set_control(Command::Deselect);
        sim.step();
        assert!((sim.body(1).unwrap().position.x - 502.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_respects_control() {
        let mut config = SimConfig::frictionless(Vector2::new(1000.0, 1000.0));
        config.autoplay = false;
        config.bodies = vec![BodySpawn::new(10.0, Vector2::new(500.0, 500.0)).with_velocity(Vector2::new(60.0, 0.0))];
        let mut sim = Simulation::new(&config).unwrap();

        assert!(sim.advance().is_none());
        assert_eq!(sim.time_ticks, 0);

        sim.set_control(Command::Step);
        assert!(sim.advance().is_some());
        assert_eq!(sim.mode(), ControlMode::Paused);
        assert!(sim.advance().is_none());
        assert_eq!(sim.time_ticks, 1);

        sim.set_control(Command::Play);
        assert!(sim.advance().is_some());
        assert!(sim.advance().is_some());
        assert_eq!(sim.time_ticks, 3);

        sim.set_control(Command::Stop);
        assert!(sim.advance().is_none());
        assert_eq!(sim.time_ticks, 3);
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig {
            rain: Some(crate::settings::RainConfig {
                seed: 99999,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut sim1 = Simulation::new(&config).unwrap();
        let mut sim2 = Simulation::new(&config).unwrap();

        for _ in 0..300 {
            assert_eq!(sim1.step(), sim2.step());
        }
        assert_eq!(sim1.snapshot(), sim2.snapshot());
    }
}
