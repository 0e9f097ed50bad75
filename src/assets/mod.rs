//! Asset loading
//!
//! - AssetCache: URL-keyed, deduplicating cache of decoded models and textures
//! - AssetReaderVariant: file / in-memory / HTTP byte sources
//! - ModelAsset: a decoded model's node tree and material table
//! - Loaders: glTF structure and image decoding

pub mod cache;
pub mod io;
pub mod loaders;
pub mod model;
pub mod storage;

pub use cache::{AssetCache, AssetSettings, LoadState, ModelHandle, TextureHandle};
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use loaders::GltfLoader;
pub use model::{AssetNode, AssetNodeKey, ModelAsset};

#[cfg(feature = "http")]
pub use io::HttpAssetReader;
