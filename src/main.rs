use std::path::PathBuf;

use galaxygen::config::GalaxyParams;
use galaxygen::render;
use galaxygen::scene::PointCloud;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let seed: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let particle_count: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let out_dir: PathBuf = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let params = GalaxyParams {
        particle_count,
        ..Default::default()
    };

    log::info!(
        "Generating {} particles with seed={}, branches={}, radius={}",
        params.particle_count, seed, params.branches, params.radius
    );

    let (buffer, timings) = galaxygen::generate(seed, &params).expect("invalid parameters");

    log::info!("Timings:");
    for t in &timings {
        log::info!("  {:10} {:8.1} ms", t.name, t.ms);
    }

    let cloud = PointCloud {
        particles: buffer,
        point_size: params.particle_size,
    };

    let size = 1024;
    let save = |name: &str, rgba: &[u8]| {
        let path = out_dir.join(name);
        image::save_buffer(&path, rgba, size as u32, size as u32, image::ColorType::Rgba8)
            .expect("failed to save image");
        log::info!("Saved {}", path.display());
    };

    save("top.png", &render::render_top(&cloud, size));
    save("side.png", &render::render_side(&cloud, size));

    log::info!("Done.");
}
