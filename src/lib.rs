//! # tidelight
//!
//! Declarative 3D scene composition on top of a live scene graph.
//!
//! A [`SceneSpec`] names a camera, lights, glTF models with material and
//! shadow tweaks, primitive meshes and an optional animated water surface.
//! [`SceneComposer`] loads everything through a deduplicating
//! [`AssetCache`], builds the [`Scene`] and returns a [`RenderGraph`] whose
//! [`FrameClock`] drives the per-frame animation. Drawing is delegated to an
//! external [`Renderer`].
//!
//! ```rust,ignore
//! use tidelight::{AssetCache, AssetSettings, Input, SceneComposer, SceneSpec};
//!
//! let cache = AssetCache::new(&AssetSettings::from_env())?;
//! let spec = SceneSpec::preset("island").unwrap();
//! let mut graph = SceneComposer::new(cache).compose(&spec)?;
//!
//! let input = Input::new();
//! loop {
//!     graph.frame(&input, 1.0 / 60.0);
//!     graph.render(&mut my_renderer)?;
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod clock;
pub mod composer;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod tuning;
pub mod utils;

#[cfg(feature = "winit")]
pub mod app;

pub use assets::{AssetCache, AssetReaderVariant, AssetSettings, MemoryAssetReader, ModelAsset};
pub use clock::{CallbackId, FrameClock, FrameState};
pub use composer::{FrameSnapshot, RenderGraph, Renderer, SceneComposer, SceneSpec};
pub use errors::{Error, Result};
pub use resources::{ButtonState, Color, Input, Key, Material, MaterialOverrides, MouseButton, Texture};
pub use scene::{AnimatedSurface, Camera, DirectedLight, DirectedLightConfig, Light, Node, Scene, WaterConfig};
pub use tuning::{MaterialTuner, ShadowFlagger, ShadowFlags};
pub use utils::{OrbitControls, Timer};

/// Common imports for hosts driving a composed scene.
pub mod prelude {
    pub use crate::assets::{AssetCache, AssetSettings};
    pub use crate::clock::{FrameClock, FrameState};
    pub use crate::composer::{RenderGraph, SceneComposer, SceneSpec};
    pub use crate::resources::{ButtonState, Color, Input, Key, MaterialOverrides, MouseButton};
    pub use crate::scene::{DirectedLightConfig, Scene, WaterConfig};
    pub use crate::utils::{OrbitControls, Timer};
    pub use glam::Vec3;
}
