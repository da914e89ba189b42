use thiserror::Error;

use crate::color::Rgb;

/// All tunable parameters — exposed as UI sliders in the frontend.
/// One snapshot is consumed per generation; nothing here is derived or cached.
#[derive(Clone, Debug)]
pub struct GalaxyParams {
    pub particle_count: u32,
    pub particle_size: f32,
    pub branches: u32,
    pub radius: f32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Rgb,
    pub outside_color: Rgb,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            particle_count: 5000,
            particle_size: 0.005,
            branches: 3,
            radius: 2.0,
            spin: 1.0,
            randomness: 1.0,
            randomness_power: 3.0,
            inside_color: Rgb::from_u8(0xff, 0x60, 0x30),
            outside_color: Rgb::from_u8(0x1b, 0x39, 0x84),
        }
    }
}

/// A parameter outside its slider range. Out-of-range input is rejected
/// before any buffer work, never clamped.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{field} = {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl GalaxyParams {
    /// Slider limits, mirrored from the frontend panel. The generator
    /// re-checks them so a bad set from any caller fails fast.
    pub fn validate(&self) -> Result<(), ParamError> {
        check("particle_count", self.particle_count as f64, 100.0, 300_000.0)?;
        check("particle_size", self.particle_size as f64, 0.001, 0.1)?;
        check("branches", self.branches as f64, 3.0, 30.0)?;
        check("radius", self.radius as f64, 0.1, 100.0)?;
        check("spin", self.spin as f64, -5.0, 5.0)?;
        check("randomness", self.randomness as f64, 0.0, 2.0)?;
        check("randomness_power", self.randomness_power as f64, 1.0, 10.0)?;
        Ok(())
    }
}

fn check(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParamError> {
    // NaN fails every comparison, so it lands in the error arm too.
    if !(value >= min && value <= max) {
        return Err(ParamError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
