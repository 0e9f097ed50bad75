//! Scene graph
//!
//! - Node: hierarchy + transform, components referenced by key
//! - Scene: the frame graph and its component pools
//! - TransformSystem: world matrix propagation, decoupled from `Scene`
//! - AnimatedSurface / DirectedLight: the animated pieces of a composed scene

pub mod camera;
pub mod directed_light;
pub mod light;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;
pub mod water;

pub use camera::{Camera, Frustum};
pub use directed_light::{DirectedLight, DirectedLightConfig};
pub use light::{Light, LightKind, SpotLight};
pub use node::Node;
pub use scene::{AmbientLight, ModelInstance, Scene};
pub use transform::Transform;
pub use water::{AnimatedSurface, WaterConfig};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct MeshKey;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct SurfaceKey;
    pub struct ModelKey;
}
