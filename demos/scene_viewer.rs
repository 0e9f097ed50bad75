//! Scene Viewer
//!
//! Composes a preset or a JSON scene file and steps it with wall-clock
//! deltas, logging the extracted frames.
//!
//! Usage:
//!   cargo run --example scene_viewer -- <preset | scene.json> [frames]
//!
//! Presets: rotating_box, house, spotlight_bench, island.

use std::path::Path;

use anyhow::{Context, bail};
use tidelight::composer::{FrameSnapshot, Renderer};
use tidelight::prelude::*;

struct SummaryRenderer {
    frames: u64,
    items: usize,
}

impl Renderer for SummaryRenderer {
    fn viewport_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn render(&mut self, frame: &FrameSnapshot, _scene: &Scene) -> tidelight::Result<()> {
        self.frames += 1;
        self.items += frame.item_count();
        log::debug!(
            "frame {}: {} items, {} lights",
            frame.frame_count,
            frame.item_count(),
            frame.lights.len()
        );
        Ok(())
    }
}

fn load_spec(arg: &str) -> anyhow::Result<SceneSpec> {
    if let Some(spec) = SceneSpec::preset(arg) {
        return Ok(spec);
    }
    if Path::new(arg).extension().is_some_and(|ext| ext == "json") {
        return SceneSpec::from_json_file(arg).with_context(|| format!("reading scene file {arg}"));
    }
    bail!(
        "unknown scene '{arg}'; expected a .json file or one of {:?}",
        SceneSpec::PRESETS
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scene_arg = args.next().unwrap_or_else(|| "rotating_box".to_string());
    let frames: u64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid frame count '{n}'"))?,
        None => 120,
    };

    let spec = load_spec(&scene_arg)?;
    let cache = AssetCache::new(&AssetSettings::from_env())?;
    let mut graph = SceneComposer::new(cache.clone())
        .compose(&spec)
        .with_context(|| format!("composing '{}'", spec.name))?;

    let mut renderer = SummaryRenderer { frames: 0, items: 0 };
    let mut timer = Timer::new();
    let input = Input::new();

    for _ in 0..frames {
        let dt = timer.tick();
        graph.frame(&input, dt);
        graph.render(&mut renderer)?;
    }

    log::info!(
        "'{}': {} frames in {:.2}s, {:.1} items/frame, {} models and {} textures cached",
        graph.name(),
        renderer.frames,
        timer.elapsed_seconds(),
        renderer.items as f32 / renderer.frames.max(1) as f32,
        cache.model_count(),
        cache.texture_count()
    );
    Ok(())
}
