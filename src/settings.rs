//! Scene configuration
//!
//! Every field has a documented default so a scene file only needs to name
//! what it changes. Bodies must at least give a radius and a position.

use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::consts::*;
use crate::sim::{Color, IntegrationScheme, WHITE};

/// Reasons a configuration or spawn request is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveRadius(f64),
    NonPositiveDensity(f64),
    NonPositiveTimestep(f64),
    EmptyWorld { width: f64, height: f64 },
    ElasticityOutOfRange(Vector2),
    DampingOutOfRange(Vector2),
    NegativeFriction(f64),
    BodyDoesNotFit { radius: f64 },
    TooManyBodies { count: u32, max: u32 },
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositiveRadius(r) => write!(f, "Body radius must be positive, got {r}"),
            ConfigError::NonPositiveDensity(d) => {
                write!(f, "Body density must be positive, got {d}")
            }
            ConfigError::NonPositiveTimestep(dt) => write!(f, "Timestep must be positive, got {dt}"),
            ConfigError::EmptyWorld { width, height } => {
                write!(f, "World has zero area ({width} x {height})")
            }
            ConfigError::ElasticityOutOfRange(e) => {
                write!(f, "Elasticity must be within [0, 1] on both axes, got [{}, {}]", e.x, e.y)
            }
            ConfigError::DampingOutOfRange(d) => {
                write!(f, "Damping must be within [0, 1] on both axes, got [{}, {}]", d.x, d.y)
            }
            ConfigError::NegativeFriction(mu) => write!(f, "Friction must not be negative, got {mu}"),
            ConfigError::BodyDoesNotFit { radius } => {
                write!(f, "Body of radius {radius} does not fit inside the world")
            }
            ConfigError::TooManyBodies { count, max } => {
                write!(f, "Rain of {count} balls exceeds the limit of {max}")
            }
            ConfigError::Io(msg) => write!(f, "Cannot read scene file: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Invalid scene file: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn in_unit_range(v: Vector2) -> bool {
    (0.0..=1.0).contains(&v.x) && (0.0..=1.0).contains(&v.y)
}

fn default_density() -> f64 {
    BODY_DENSITY
}

fn default_elasticity() -> Vector2 {
    Vector2::splat(BODY_ELASTICITY)
}

fn default_color() -> Color {
    WHITE
}

/// Initial state for one body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySpawn {
    pub radius: f64,
    pub position: Vector2,
    #[serde(default)]
    pub velocity: Vector2,
    #[serde(default = "default_density")]
    pub density: f64,
    /// Per-axis coefficient of restitution against walls
    #[serde(default = "default_elasticity")]
    pub elasticity: Vector2,
    #[serde(default = "default_color")]
    pub color: Color,
}

impl BodySpawn {
    /// A body at rest with default density, elasticity and color
    pub fn new(radius: f64, position: Vector2) -> Self {
        Self {
            radius,
            position,
            velocity: Vector2::ZERO,
            density: BODY_DENSITY,
            elasticity: default_elasticity(),
            color: WHITE,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_elasticity(mut self, elasticity: Vector2) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Check the spawn against a world of the given size
    pub fn validate(&self, world_size: Vector2) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        if !(self.density > 0.0) {
            return Err(ConfigError::NonPositiveDensity(self.density));
        }
        if !in_unit_range(self.elasticity) {
            return Err(ConfigError::ElasticityOutOfRange(self.elasticity));
        }
        if 2.0 * self.radius > world_size.min_element() {
            return Err(ConfigError::BodyDoesNotFit { radius: self.radius });
        }
        Ok(())
    }
}

/// Seeded random scene: a rain of balls scattered over the world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Number of balls to spawn
    pub count: u32,
    /// RNG seed for reproducibility
    pub seed: u64,
    /// Smallest ball radius
    pub min_radius: f64,
    /// Largest ball radius
    pub max_radius: f64,
    /// Largest initial speed per axis
    pub max_speed: f64,
    /// Elasticity given to every spawned ball
    pub elasticity: Vector2,
}

impl RainConfig {
    /// Check the rain can be spawned into a world of the given size
    pub fn validate(&self, world_size: Vector2) -> Result<(), ConfigError> {
        if self.count > MAX_RAIN_BODIES {
            return Err(ConfigError::TooManyBodies {
                count: self.count,
                max: MAX_RAIN_BODIES,
            });
        }
        if !(self.min_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.min_radius));
        }
        if self.min_radius > world_size.min_element() / 2.0 {
            return Err(ConfigError::BodyDoesNotFit {
                radius: self.min_radius,
            });
        }
        if !in_unit_range(self.elasticity) {
            return Err(ConfigError::ElasticityOutOfRange(self.elasticity));
        }
        Ok(())
    }
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 0,
            min_radius: 10.0,
            max_radius: 120.0,
            max_speed: 300.0,
            elasticity: default_elasticity(),
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World width and height
    pub size: Vector2,
    /// Constant acceleration applied to every body
    pub gravity: Vector2,
    /// Per-axis velocity restitution of the walls
    pub damping: Vector2,
    /// Kinetic friction coefficient for bodies sliding on the floor
    pub friction: f64,
    /// Fixed timestep
    pub dt: f64,
    /// Position update scheme, shared by every body
    pub scheme: IntegrationScheme,
    /// Start running instead of paused
    pub autoplay: bool,
    /// Explicitly placed bodies, spawned first and in order
    pub bodies: Vec<BodySpawn>,
    /// Optional random scene spawned after the explicit bodies
    pub rain: Option<RainConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: Vector2::new(WORLD_WIDTH, WORLD_HEIGHT),
            gravity: Vector2::new(0.0, GRAVITY_Y),
            damping: Vector2::splat(WALL_DAMPING),
            friction: FRICTION,
            dt: SIM_DT,
            scheme: IntegrationScheme::default(),
            autoplay: true,
            bodies: Vec::new(),
            rain: None,
        }
    }
}

impl SimConfig {
    /// Weightless, lossless, frictionless world of the given size
    pub fn frictionless(size: Vector2) -> Self {
        Self {
            size,
            gravity: Vector2::ZERO,
            damping: Vector2::ONE,
            friction: 0.0,
            ..Default::default()
        }
    }

    /// Parse a scene from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a scene file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json(&json)
    }

    /// Check world parameters, every explicit body and the rain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.x > 0.0 && self.size.y > 0.0) {
            return Err(ConfigError::EmptyWorld {
                width: self.size.x,
                height: self.size.y,
            });
        }
        if !(self.dt > 0.0) {
            return Err(ConfigError::NonPositiveTimestep(self.dt));
        }
        if !in_unit_range(self.damping) {
            return Err(ConfigError::DampingOutOfRange(self.damping));
        }
        if self.friction < 0.0 {
            return Err(ConfigError::NegativeFriction(self.friction));
        }
        for spawn in &self.bodies {
            spawn.validate(self.size)?;
        }
        if let Some(rain) = &self.rain {
            rain.validate(self.size)?;
        }
        Ok(())
    }
}
