pub mod color;
pub mod config;
pub mod galaxy;
pub mod render;
pub mod rng;
pub mod scene;

use std::time::Instant;

use config::{GalaxyParams, ParamError};
use galaxy::ParticleBuffer;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Generate one galaxy: validate the parameter snapshot, then scatter the
/// full particle set from scratch. Same seed + same params = same buffers.
pub fn generate(seed: u64, params: &GalaxyParams) -> Result<(ParticleBuffer, Vec<Timing>), ParamError> {
    params.validate()?;

    let mut timings = Vec::new();
    let total_start = Instant::now();

    let t = Instant::now();
    let buffer = galaxy::scatter_seeded(seed, params);
    timings.push(Timing {
        name: "scatter",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((buffer, timings))
}
