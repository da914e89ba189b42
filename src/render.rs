use rayon::prelude::*;

use crate::scene::PointCloud;

// Diagnostic previews: the cloud splatted into a square RGBA image with
// additive accumulation, the closest a still image gets to the viewer's
// additive point blending.

/// Top-down view, the galactic plane (x, z).
pub fn render_top(cloud: &PointCloud, size: usize) -> Vec<u8> {
    project(cloud, size, |p| [p[0], p[2]])
}

/// Edge-on view (x, y), shows the vertical jitter profile.
pub fn render_side(cloud: &PointCloud, size: usize) -> Vec<u8> {
    project(cloud, size, |p| [p[0], p[1]])
}

fn project(cloud: &PointCloud, size: usize, axes: impl Fn(&[f32; 3]) -> [f32; 2]) -> Vec<u8> {
    // Fit the frame to the data, like the heightmap preview does.
    let mut half = 1e-3f32;
    for p in &cloud.particles.positions {
        let [u, v] = axes(p);
        half = half.max(u.abs()).max(v.abs());
    }
    half *= 1.05;

    // Splat radius in pixels from the world-space point size.
    let px_radius = ((cloud.point_size / (2.0 * half)) * size as f32).round().max(0.0) as i32;
    let weight = 1.0 / ((2 * px_radius + 1).pow(2)) as f32;

    let mut accum = vec![[0.0f32; 3]; size * size];
    for (p, c) in cloud.particles.positions.iter().zip(&cloud.particles.colors) {
        let [u, v] = axes(p);
        let cx = ((u / half + 1.0) * 0.5 * size as f32) as i32;
        let cy = ((v / half + 1.0) * 0.5 * size as f32) as i32;
        for dy in -px_radius..=px_radius {
            for dx in -px_radius..=px_radius {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= size as i32 || y >= size as i32 {
                    continue;
                }
                let cell = &mut accum[y as usize * size + x as usize];
                cell[0] += c[0] * weight;
                cell[1] += c[1] * weight;
                cell[2] += c[2] * weight;
            }
        }
    }

    // Exposure chosen so the dense core saturates and lone outliers stay visible.
    let exposure = 40_000.0 / cloud.particles.len().max(1) as f32;
    let mut rgba = vec![0u8; size * size * 4];
    rgba.par_chunks_mut(4)
        .zip(accum.par_iter())
        .for_each(|(px, acc)| {
            for ch in 0..3 {
                let v = 1.0 - (-acc[ch] * exposure).exp();
                px[ch] = (v * 255.0) as u8;
            }
            px[3] = 255;
        });

    rgba
}
