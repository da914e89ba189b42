use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use galaxygen::color::Rgb;
use galaxygen::config::GalaxyParams;
use galaxygen::render;
use galaxygen::scene::{GalaxyGenerator, GenerateError, Scene};

#[derive(Deserialize)]
struct GenerateRequest {
    seed: Option<u64>,
    particle_count: Option<u32>,
    particle_size: Option<f32>,
    branches: Option<u32>,
    radius: Option<f32>,
    spin: Option<f32>,
    randomness: Option<f32>,
    randomness_power: Option<f32>,
    inside_color: Option<String>,
    outside_color: Option<String>,
}

#[derive(Serialize)]
struct GenerateResponse {
    count: u32,
    /// Packed f32 xyz triples, base64.
    positions: String,
    /// Packed f32 rgb triples, base64.
    colors: String,
    /// Top-down preview as a PNG data URL.
    preview: String,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

/// The one live scene and its generator. The mutex serializes panel commits;
/// the generator itself never arbitrates concurrent calls.
struct Viewer {
    scene: Scene,
    generator: GalaxyGenerator,
}

type SharedViewer = Arc<Mutex<Viewer>>;

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

fn bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

async fn generate_handler(
    State(viewer): State<SharedViewer>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let defaults = GalaxyParams::default();
    let inside_color = match &req.inside_color {
        Some(s) => Rgb::from_hex(s).map_err(bad_request)?,
        None => defaults.inside_color,
    };
    let outside_color = match &req.outside_color {
        Some(s) => Rgb::from_hex(s).map_err(bad_request)?,
        None => defaults.outside_color,
    };

    let params = GalaxyParams {
        particle_count: req.particle_count.unwrap_or(defaults.particle_count),
        particle_size: req.particle_size.unwrap_or(defaults.particle_size),
        branches: req.branches.unwrap_or(defaults.branches),
        radius: req.radius.unwrap_or(defaults.radius),
        spin: req.spin.unwrap_or(defaults.spin),
        randomness: req.randomness.unwrap_or(defaults.randomness),
        randomness_power: req.randomness_power.unwrap_or(defaults.randomness_power),
        inside_color,
        outside_color,
    };
    let seed = req.seed.unwrap_or(42);

    let response = tokio::task::spawn_blocking(move || {
        let mut guard = viewer.lock().unwrap();
        let viewer = &mut *guard;
        let mut timings = Vec::new();

        let t = Instant::now();
        let id = viewer
            .generator
            .regenerate(&mut viewer.scene, seed, &params)
            .map_err(|e| match e {
                GenerateError::InvalidParams(_) => bad_request(e),
                GenerateError::Scene(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            })?;
        timings.push(TimingEntry {
            name: "regenerate".into(),
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let cloud = viewer.scene.get(id).expect("cloud installed above");

        let t = Instant::now();
        let preview = encode_png(&render::render_top(cloud, 512), 512, 512);
        timings.push(TimingEntry {
            name: "preview".into(),
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let b64 = base64::engine::general_purpose::STANDARD;
        let position_bytes: &[u8] = bytemuck::cast_slice(&cloud.particles.positions);
        let color_bytes: &[u8] = bytemuck::cast_slice(&cloud.particles.colors);
        Ok(GenerateResponse {
            count: params.particle_count,
            positions: b64.encode(position_bytes),
            colors: b64.encode(color_bytes),
            preview,
            timings,
        })
    })
    .await
    .unwrap()?;

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let viewer: SharedViewer = Arc::new(Mutex::new(Viewer {
        scene: Scene::new(),
        generator: GalaxyGenerator::new(),
    }));

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .fallback_service(frontend)
        .with_state(viewer);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    log::info!("galaxygen server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
