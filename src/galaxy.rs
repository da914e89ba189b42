use std::f32::consts::TAU;

use crate::config::GalaxyParams;
use crate::rng::{Rng, UniformSource, splitmix64};

const SALT_SCATTER: u64 = 0x5C47_7E12_ED00_57A2;

/// One fully generated point cloud: paired position/color buffers.
/// Both are always exactly `particle_count` long and are filled in a single
/// pass, so no caller can observe one without the other.
#[derive(Clone, Debug)]
pub struct ParticleBuffer {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl ParticleBuffer {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Scatter particles along spiral arms.
///
/// Per particle: arm by index modulo branch count, radial distance uniform in
/// [0, radius), extra rotation proportional to distance (the spiral twist),
/// then a power-shaped random offset per axis. The base disk is flat; only the
/// offsets give it thickness. Color ramps from the inside color at the center
/// to the outside color at the rim.
///
/// Draw order is fixed per particle: radius, then (u, sign) for x, y, z in
/// that order. Scripted sources in tests rely on it.
pub fn scatter<S: UniformSource>(params: &GalaxyParams, rng: &mut S) -> ParticleBuffer {
    let n = params.particle_count as usize;
    let branches = params.branches as usize;
    let mut positions = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);

    for i in 0..n {
        let branch_angle = TAU * (i % branches) as f32 / branches as f32;
        let r = params.radius * rng.next_f32();
        let spin_angle = params.spin * r;

        let mut offset = [0.0f32; 3];
        for axis in &mut offset {
            *axis = rng.next_f32().powf(params.randomness_power)
                * rng.next_sign()
                * params.randomness
                * r;
        }

        let angle = branch_angle + spin_angle;
        positions.push([
            angle.cos() * r + offset[0],
            offset[1],
            angle.sin() * r + offset[2],
        ]);
        colors.push(
            params
                .inside_color
                .lerp(params.outside_color, r / params.radius)
                .to_array(),
        );
    }

    ParticleBuffer { positions, colors }
}

/// Scatter with the crate's standard seeding, shared by the CLI and the
/// server so the same seed reproduces the same galaxy everywhere.
pub fn scatter_seeded(seed: u64, params: &GalaxyParams) -> ParticleBuffer {
    let mut rng = Rng::new(splitmix64(seed ^ SALT_SCATTER));
    scatter(params, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    /// Feeds a constant uniform value and positive sign, making every
    /// coordinate predictable.
    struct Constant(f32);

    impl UniformSource for Constant {
        fn next_f32(&mut self) -> f32 {
            self.0
        }

        fn next_sign(&mut self) -> f32 {
            1.0
        }
    }

    fn small_params() -> GalaxyParams {
        GalaxyParams {
            particle_count: 6,
            branches: 3,
            radius: 1.0,
            spin: 0.0,
            randomness: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn buffers_have_exactly_particle_count_entries() {
        let params = GalaxyParams {
            particle_count: 1234,
            ..Default::default()
        };
        let buffer = scatter_seeded(42, &params);
        assert_eq!(buffer.positions.len(), 1234);
        assert_eq!(buffer.colors.len(), 1234);
        assert_eq!(buffer.len(), 1234);
    }

    #[test]
    fn positions_finite_and_colors_in_unit_range() {
        let params = GalaxyParams {
            particle_count: 2000,
            spin: -5.0,
            randomness: 2.0,
            randomness_power: 1.0,
            ..Default::default()
        };
        let buffer = scatter_seeded(7, &params);
        for p in &buffer.positions {
            assert!(p.iter().all(|c| c.is_finite()));
        }
        for c in &buffer.colors {
            assert!(c.iter().all(|ch| (0.0..=1.0).contains(ch)));
        }
    }

    #[test]
    fn zero_randomness_leaves_the_disk_flat() {
        let params = GalaxyParams {
            particle_count: 500,
            randomness: 0.0,
            randomness_power: 7.5,
            ..Default::default()
        };
        let buffer = scatter_seeded(3, &params);
        for p in &buffer.positions {
            assert_eq!(p[1], 0.0);
        }
    }

    #[test]
    fn branch_assignment_cycles_by_index() {
        // Six particles on three arms: 0,3 on arm 0; 1,4 on arm 1; 2,5 on arm 2.
        let params = small_params();
        let buffer = scatter(&params, &mut Constant(0.5));
        for (i, p) in buffer.positions.iter().enumerate() {
            let branch_angle = TAU * (i % 3) as f32 / 3.0;
            assert_eq!(p[0], branch_angle.cos() * 0.5);
            assert_eq!(p[1], 0.0);
            assert_eq!(p[2], branch_angle.sin() * 0.5);
        }
    }

    #[test]
    fn branch_angles_independent_of_seed() {
        let params = GalaxyParams {
            particle_count: 300,
            branches: 5,
            spin: 0.0,
            randomness: 0.0,
            ..Default::default()
        };
        let a = scatter_seeded(1, &params);
        let b = scatter_seeded(2, &params);
        for (i, (pa, pb)) in a.positions.iter().zip(&b.positions).enumerate() {
            let expected = TAU * (i % 5) as f32 / 5.0;
            // Angle is defined whenever the radial draw is nonzero.
            for p in [pa, pb] {
                let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
                if r > 1e-4 {
                    let angle = p[2].atan2(p[0]).rem_euclid(TAU);
                    let diff = (angle - expected).abs();
                    assert!(diff < 1e-4 || (diff - TAU).abs() < 1e-4);
                }
            }
        }
        // Same arms, but the radii themselves must differ between seeds.
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn center_particle_gets_inside_color_exactly() {
        let mut params = small_params();
        params.inside_color = Rgb::from_u8(255, 96, 48);
        let buffer = scatter(&params, &mut Constant(0.0));
        for c in &buffer.colors {
            assert_eq!(*c, params.inside_color.to_array());
        }
    }

    #[test]
    fn color_ramps_toward_outside_with_radius() {
        let mut params = small_params();
        params.inside_color = Rgb { r: 1.0, g: 0.0, b: 0.0 };
        params.outside_color = Rgb { r: 0.0, g: 0.0, b: 1.0 };
        let near = scatter(&params, &mut Constant(0.1));
        let far = scatter(&params, &mut Constant(0.9));
        assert!(near.colors[0][0] > far.colors[0][0]);
        assert!(near.colors[0][2] < far.colors[0][2]);
        assert!((far.colors[0][0] - 0.1).abs() < 1e-6);
        assert_eq!(far.colors[0][1], 0.0);
        assert!((far.colors[0][2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn same_seed_reproduces_the_same_galaxy() {
        let params = GalaxyParams::default();
        let a = scatter_seeded(99, &params);
        let b = scatter_seeded(99, &params);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.colors, b.colors);
    }

    #[test]
    fn offsets_scale_with_radial_distance() {
        // randomness_power = 1 keeps the offset exactly u * sign * randomness * r.
        let params = GalaxyParams {
            particle_count: 6,
            branches: 3,
            radius: 2.0,
            spin: 0.0,
            randomness: 1.0,
            randomness_power: 1.0,
            ..Default::default()
        };
        let buffer = scatter(&params, &mut Constant(0.5));
        // r = 1.0, each offset = 0.5 * 1.0 * 1.0 * 1.0 = 0.5
        for p in &buffer.positions {
            assert!((p[1] - 0.5).abs() < 1e-6);
        }
    }
}
