//! Island Example
//!
//! Composes the night-time island: a lighthouse spot light sweeping its
//! target around a 50 unit orbit over an animated ocean. Runs headless for a
//! few simulated seconds and logs what a renderer would receive.
//!
//! Assets are read from `TIDELIGHT_ASSET_BASE` (default `assets/`):
//! - models/island.glb
//! - textures/waternormals.jpg
//!
//! Run with `RUST_LOG=info cargo run --example island`.

use tidelight::composer::{FrameSnapshot, Renderer};
use tidelight::prelude::*;

const FRAMES: u64 = 300;
const DT: f32 = 1.0 / 60.0;

/// Logs a one-line summary every second of simulated time.
struct LogRenderer;

impl Renderer for LogRenderer {
    fn viewport_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn render(&mut self, frame: &FrameSnapshot, scene: &Scene) -> tidelight::Result<()> {
        if frame.frame_count % 60 != 0 {
            return Ok(());
        }
        let water_time = scene.surfaces.values().next().map_or(0.0, |s| s.time());
        let beam = frame.lights.iter().find_map(|l| l.direction);
        log::info!(
            "frame {}: {} items, water time {water_time:.3}, beam {beam:?}",
            frame.frame_count,
            frame.item_count()
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cache = AssetCache::new(&AssetSettings::from_env())?;
    let spec = SceneSpec::island();
    let mut graph = SceneComposer::new(cache).compose(&spec)?;

    let mut renderer = LogRenderer;
    let mut input = Input::new();

    for frame in 1..=FRAMES {
        input.start_frame();
        // Press the debug key once, halfway through
        if frame == FRAMES / 2 {
            input.inject_key(Key::P, ButtonState::Pressed);
        }

        graph.frame(&input, DT);
        graph.render(&mut renderer)?;
    }

    log::info!("{graph:?}");
    Ok(())
}
