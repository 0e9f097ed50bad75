//! Core resource definitions
//!
//! Data structures needed to describe renderable content, independent of any
//! GPU implementation:
//! - Color: linear RGB parsed from hex or CSS names
//! - Material / MaterialOverrides: shading parameters and sparse edits to them
//! - Texture: decoded image data with sampler state
//! - Geometry / Mesh: analytic primitives
//! - Uniforms: shader uniform blocks and their versioned container
//! - Input: platform-agnostic keyboard and mouse state

pub mod color;
pub mod geometry;
pub mod input;
pub mod material;
pub mod mesh;
pub mod texture;
pub mod uniform_slot;
pub mod uniforms;

pub use color::Color;
pub use geometry::{BoundingBox, Geometry};
pub use input::{ButtonState, Input, Key, MouseButton};
pub use material::{AlphaMode, Material, MaterialOverrides};
pub use mesh::Mesh;
pub use texture::{Texture, TextureSampler, WrapMode};
pub use uniform_slot::UniformSlot;
pub use uniforms::WaterUniforms;
