//! Rain Balls entry point
//!
//! Native builds run headless: the default scene (or the JSON scene named by
//! `RAINBALLS_SCENE`) is stepped for a fixed number of ticks and telemetry
//! goes to the log. Set `RUST_LOG=debug` for per-collision and per-body lines.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use rainballs::input::InputDispatcher;
    use rainballs::renderer::{LogRenderer, present};
    use rainballs::{ConfigError, RainConfig, SimConfig, Simulation};

    /// Ten seconds of simulated time at the default rate
    const RUN_TICKS: u64 = 600;

    fn load_config() -> Result<SimConfig, ConfigError> {
        match std::env::var("RAINBALLS_SCENE") {
            Ok(path) => {
                log::info!("Loading scene from {}", path);
                SimConfig::from_file(&path)
            }
            Err(_) => Ok(SimConfig {
                rain: Some(RainConfig::default()),
                ..Default::default()
            }),
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let config = load_config()?;
        let mut sim = Simulation::new(&config)?;
        let mut renderer = LogRenderer::default();
        // No event source when headless; tracing starts on with debug logging
        let mut input = InputDispatcher::new(sim.world.size.y);
        input.trace = log::log_enabled!(log::Level::Debug);

        let start = sim.conservation();
        present(&mut renderer, &sim, None, input.trace);

        while sim.time_ticks < RUN_TICKS {
            input.frame(&mut sim);
            match sim.advance() {
                Some(report) => present(&mut renderer, &sim, Some(&report), input.trace),
                None => {
                    log::warn!("Scene is paused or stopped; nothing to run");
                    break;
                }
            }
        }

        let end = sim.conservation();
        log::info!(
            "Ran {} ticks over {} frames: energy {:.3} -> {:.3}, momentum [{:.3},{:.3}] -> [{:.3},{:.3}]",
            sim.time_ticks,
            renderer.frames(),
            start.energy,
            end.energy,
            start.momentum.x,
            start.momentum.y,
            end.momentum.x,
            end.momentum.y
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rain Balls (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page; nothing to run here
}
