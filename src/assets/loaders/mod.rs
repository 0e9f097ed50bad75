pub mod gltf;
pub mod texture;

pub use self::gltf::GltfLoader;
pub use self::texture::decode_texture;
