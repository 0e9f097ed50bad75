use std::fmt;

use glam::Vec3;

use crate::clock::{FrameClock, FrameState};
use crate::composer::extract::{FrameSnapshot, Renderer};
use crate::errors::Result;
use crate::resources::input::{Input, Key};
use crate::scene::directed_light::DirectedLight;
use crate::scene::{NodeKey, Scene};
use crate::utils::orbit_control::OrbitControls;

/// Log target of the debug hook.
pub const DIAGNOSTICS_TARGET: &str = "tidelight::diagnostics";

/// Key that triggers the debug hook.
pub const DEBUG_KEY: Key = Key::P;

/// Camera placement reported by the debug hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSnapshot {
    pub camera_position: Vec3,
    /// Orbit-control target, or the composed look-at point without controls
    pub target: Vec3,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.camera_position;
        let t = self.target;
        write!(
            f,
            "camera position: [{:.3}, {:.3}, {:.3}], orbit target: [{:.3}, {:.3}, {:.3}]",
            p.x, p.y, p.z, t.x, t.y, t.z
        )
    }
}

/// Result of one [`RenderGraph::frame`].
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub state: FrameState,
    /// Set when the debug key went down this frame
    pub debug: Option<DebugSnapshot>,
}

/// A composed, running scene.
///
/// Owns the scene and everything that drives it per frame. The host loop
/// calls [`frame`](Self::frame) once per displayed frame, then
/// [`render`](Self::render).
pub struct RenderGraph {
    name: String,
    scene: Scene,
    clock: FrameClock,
    controls: Option<OrbitControls>,
    camera: NodeKey,
    camera_target: Vec3,
    directed_lights: Vec<DirectedLight>,
    surface: Option<NodeKey>,
    snapshot: FrameSnapshot,
}

impl RenderGraph {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        scene: Scene,
        clock: FrameClock,
        controls: Option<OrbitControls>,
        camera: NodeKey,
        camera_target: Vec3,
        directed_lights: Vec<DirectedLight>,
        surface: Option<NodeKey>,
    ) -> Self {
        Self {
            name,
            scene,
            clock,
            controls,
            camera,
            camera_target,
            directed_lights,
            surface,
            snapshot: FrameSnapshot::new(),
        }
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Advances the graph by `dt` seconds.
    ///
    /// Runs the frame clock callbacks, applies orbit controls from `input`
    /// and propagates world matrices. Fires the debug hook when the debug key
    /// went down this frame.
    pub fn frame(&mut self, input: &Input, dt: f32) -> FrameReport {
        let debug = self.handle_debug_key(input);

        let state = self.clock.tick(&mut self.scene, dt);

        if let Some(controls) = &mut self.controls
            && let Some((transform, camera)) = self.scene.query_camera_bundle(self.camera)
        {
            let fov = camera.fov_degrees();
            controls.update(transform, input, fov, state.dt);
        }

        self.scene.update_matrix_world();

        FrameReport { state, debug }
    }

    /// Logs and returns the camera placement if the debug key went down.
    /// Does not change the graph.
    pub fn handle_debug_key(&self, input: &Input) -> Option<DebugSnapshot> {
        if !input.get_key_down(DEBUG_KEY) {
            return None;
        }
        let snapshot = self.debug_snapshot();
        log::info!(target: DIAGNOSTICS_TARGET, "{snapshot}");
        Some(snapshot)
    }

    #[must_use]
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let camera_position = self
            .scene
            .get_node(self.camera)
            .map_or(Vec3::ZERO, |n| n.transform.position);
        let target = self.controls.as_ref().map_or(self.camera_target, OrbitControls::target);
        DebugSnapshot {
            camera_position,
            target,
        }
    }

    /// Window resize: updates the camera aspect. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some((_, camera)) = self.scene.query_camera_bundle(self.camera) {
            camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// Fills a fresh snapshot of the current frame.
    #[must_use]
    pub fn extract(&self) -> FrameSnapshot {
        let mut snapshot = FrameSnapshot::new();
        self.extract_into(&mut snapshot);
        snapshot
    }

    fn extract_into(&self, snapshot: &mut FrameSnapshot) {
        let camera = self
            .scene
            .get_node(self.camera)
            .and_then(|n| n.camera)
            .and_then(|k| self.scene.cameras.get(k));
        snapshot.extract_into(&self.scene, camera);
        snapshot.frame_count = self.clock.state().frame_count;
    }

    /// Hands the current frame to `renderer`, matching the camera aspect to
    /// the renderer's viewport first.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let (width, height) = renderer.viewport_size();
        self.resize(width, height);

        let mut snapshot = std::mem::take(&mut self.snapshot);
        self.extract_into(&mut snapshot);
        let result = renderer.render(&snapshot, &self.scene);
        self.snapshot = snapshot;
        result
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    #[must_use]
    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    #[must_use]
    pub fn camera_node(&self) -> NodeKey {
        self.camera
    }

    #[must_use]
    pub fn directed_lights(&self) -> &[DirectedLight] {
        &self.directed_lights
    }

    /// Node carrying the animated water surface, if any.
    #[must_use]
    pub fn surface_node(&self) -> Option<NodeKey> {
        self.surface
    }
}

impl fmt::Debug for RenderGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderGraph")
            .field("name", &self.name)
            .field("nodes", &self.scene.nodes.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
