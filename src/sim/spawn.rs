//! Seeded random scenes

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Vector2;
use crate::settings::{BodySpawn, ConfigError, RainConfig};

/// Scatter `config.count` balls over a world of the given size
///
/// Radii, positions, velocities and colors come from a PCG stream seeded with
/// `config.seed`, so the same config always produces the same scene. Every
/// ball starts fully inside the world.
pub fn rain(config: &RainConfig, world_size: Vector2) -> Result<Vec<BodySpawn>, ConfigError> {
    config.validate(world_size)?;
    let fit = world_size.min_element() / 2.0;

    let min_r = config.min_radius;
    let max_r = config.max_radius.min(fit).max(min_r);
    let max_speed = config.max_speed.abs();

    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut spawns = Vec::with_capacity(config.count as usize);

    for _ in 0..config.count {
        let radius = rng.random_range(min_r..=max_r);
        let position = Vector2::new(
            rng.random_range(radius..=world_size.x - radius),
            rng.random_range(radius..=world_size.y - radius),
        );
        let velocity = Vector2::new(
            rng.random_range(-max_speed..=max_speed),
            rng.random_range(-max_speed..=max_speed),
        );
        let color: [u8; 3] = rng.random();

        spawns.push(
            BodySpawn::new(radius, position)
                .with_velocity(velocity)
                .with_elasticity(config.elasticity)
                .with_color(color),
        );
    }

    log::info!(
        "Rain of {} balls (seed {}, radius {:.0}..{:.0})",
        config.count,
        config.seed,
        min_r,
        max_r
    );

    Ok(spawns)
}
