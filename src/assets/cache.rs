use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::assets::io::{AssetReaderVariant, MemoryAssetReader};
use crate::assets::loaders::{GltfLoader, decode_texture};
use crate::assets::model::ModelAsset;
use crate::assets::storage::AssetStorage;
use crate::errors::{Error, Result};
use crate::resources::texture::{Texture, TextureSampler};

use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Runtime driving the blocking `load_*` methods.
fn get_asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("tidelight-assets")
        .enable_all()
        .build()?;
    // A concurrent initializer may have won; its runtime is kept.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| Error::TaskJoin("asset runtime unavailable".to_string()))
}

/// Drives `future` to completion on the asset runtime.
pub(crate) fn block_on_assets<T>(future: impl Future<Output = Result<T>>) -> Result<T> {
    get_asset_runtime()?.block_on(future)
}

// Strongly-typed handles
new_key_type! {
    pub struct ModelHandle;
    pub struct TextureHandle;
}

/// Where asset URLs are resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory or `http(s)://` base URL
    pub base_path: String,
}

impl AssetSettings {
    pub const BASE_PATH_ENV: &'static str = "TIDELIGHT_ASSET_BASE";

    /// Defaults, with `base_path` taken from `TIDELIGHT_ASSET_BASE` when set.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(Self::BASE_PATH_ENV) {
            Ok(base_path) if !base_path.trim().is_empty() => Self { base_path },
            _ => Self::default(),
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: "assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Ready,
}

/// URL-keyed cache of decoded models and textures.
///
/// Loads are idempotent per URL: every successful load of the same URL
/// returns the same `Arc`. Failures are not cached, so a failed URL may be
/// requested again.
///
/// The blocking `load_*` methods drive an internal tokio runtime and must not
/// be called from inside an async context; use the `*_async` variants there
/// (they expect a tokio runtime).
#[derive(Clone)]
pub struct AssetCache {
    reader: AssetReaderVariant,
    models: Arc<AssetStorage<ModelHandle, ModelAsset>>,
    textures: Arc<AssetStorage<TextureHandle, Texture>>,
}

impl AssetCache {
    pub fn new(settings: &AssetSettings) -> Result<Self> {
        Ok(Self::with_reader(AssetReaderVariant::from_source(&settings.base_path)?))
    }

    #[must_use]
    pub fn with_reader(reader: AssetReaderVariant) -> Self {
        Self {
            reader,
            models: Arc::new(AssetStorage::new()),
            textures: Arc::new(AssetStorage::new()),
        }
    }

    /// Cache backed by in-memory files.
    #[must_use]
    pub fn from_memory(reader: MemoryAssetReader) -> Self {
        Self::with_reader(AssetReaderVariant::memory(reader))
    }

    #[must_use]
    pub fn reader(&self) -> &AssetReaderVariant {
        &self.reader
    }

    // ========================================================================
    // Synchronous Methods
    // ========================================================================

    pub fn load_model(&self, url: &str) -> Result<Arc<ModelAsset>> {
        get_asset_runtime()?.block_on(self.load_model_async(url))
    }

    /// Loads a model, running `on_ready` on the freshly decoded asset before
    /// it is shared.
    ///
    /// `on_ready` runs at most once per cached asset: if `url` is already
    /// cached it is skipped and the cached asset is returned as is. If it
    /// fails, nothing is cached and its error is returned.
    pub fn load_model_with<F>(&self, url: &str, on_ready: F) -> Result<Arc<ModelAsset>>
    where
        F: FnOnce(&mut ModelAsset) -> Result<()>,
    {
        get_asset_runtime()?.block_on(self.load_model_with_async(url, on_ready))
    }

    /// Blocking [`load_model_variant_async`](Self::load_model_variant_async).
    pub fn load_model_variant<F>(&self, url: &str, variant: &str, on_ready: F) -> Result<Arc<ModelAsset>>
    where
        F: FnOnce(&mut ModelAsset) -> Result<()>,
    {
        get_asset_runtime()?.block_on(self.load_model_variant_async(url, variant, on_ready))
    }

    pub fn load_texture(&self, url: &str, sampler: TextureSampler) -> Result<Arc<Texture>> {
        get_asset_runtime()?.block_on(self.load_texture_async(url, sampler))
    }

    // ========================================================================
    // Async Methods
    // ========================================================================

    pub async fn load_model_async(&self, url: &str) -> Result<Arc<ModelAsset>> {
        self.load_model_with_async(url, |_| Ok(())).await
    }

    pub async fn load_model_with_async<F>(&self, url: &str, on_ready: F) -> Result<Arc<ModelAsset>>
    where
        F: FnOnce(&mut ModelAsset) -> Result<()>,
    {
        self.load_model_variant_async(url, "", on_ready).await
    }

    /// Loads a prepared variant of the model at `url`.
    ///
    /// Each distinct `variant` label is cached as its own instance, so callers
    /// preparing the same file differently never observe each other's hook.
    /// The empty label is the plain URL entry used by
    /// [`load_model_with_async`](Self::load_model_with_async).
    pub async fn load_model_variant_async<F>(&self, url: &str, variant: &str, on_ready: F) -> Result<Arc<ModelAsset>>
    where
        F: FnOnce(&mut ModelAsset) -> Result<()>,
    {
        let key = Self::variant_key(url, variant);
        if let Some(asset) = self.models.get_by_key(&key) {
            log::debug!("Model cache hit: {key}, post-load hook skipped");
            return Ok(asset);
        }

        log::debug!("Model cache miss: {key}");

        // 1. IO: Read bytes
        let bytes = self.reader.read_bytes(url).await?;

        // 2. Decode off the async workers
        let label = url.to_string();
        let mut asset = tokio::task::spawn_blocking(move || GltfLoader::decode(&label, &bytes)).await??;

        // 3. One-time preparation while the asset is still exclusively owned
        on_ready(&mut asset)?;

        // 4. Freeze and share
        let (_, shared, inserted) = self.models.insert_with_key(&key, asset);
        if !inserted {
            log::debug!("Concurrent load of {key} resolved to the first cached instance");
        }
        Ok(shared)
    }

    /// Storage key of a model variant: the bare URL for the empty label.
    #[must_use]
    pub fn variant_key(url: &str, variant: &str) -> String {
        if variant.is_empty() {
            url.to_string()
        } else {
            format!("{url}#{variant}")
        }
    }

    pub async fn load_texture_async(&self, url: &str, sampler: TextureSampler) -> Result<Arc<Texture>> {
        if let Some(texture) = self.textures.get_by_key(url) {
            log::debug!("Texture cache hit: {url}");
            return Ok(texture);
        }

        log::debug!("Texture cache miss: {url}");

        let bytes = self.reader.read_bytes(url).await?;
        let label = url.to_string();
        let texture =
            tokio::task::spawn_blocking(move || decode_texture(&label, &bytes, sampler)).await??;

        let (_, shared, _) = self.textures.insert_with_key(url, texture);
        Ok(shared)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn state(&self, url: &str) -> LoadState {
        if self.models.contains_key(url) || self.textures.contains_key(url) {
            LoadState::Ready
        } else {
            LoadState::NotLoaded
        }
    }

    #[must_use]
    pub fn cached_model(&self, url: &str) -> Option<Arc<ModelAsset>> {
        self.models.get_by_key(url)
    }

    #[must_use]
    pub fn cached_texture(&self, url: &str) -> Option<Arc<Texture>> {
        self.textures.get_by_key(url)
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_path() {
        assert_eq!(AssetSettings::default().base_path, "assets");
    }

    #[test]
    fn missing_model_is_not_cached() {
        let cache = AssetCache::from_memory(MemoryAssetReader::new());
        let err = cache.load_model("missing.glb").unwrap_err();
        assert!(matches!(err, Error::AssetLoad { ref url, .. } if url == "missing.glb"));
        assert_eq!(cache.state("missing.glb"), LoadState::NotLoaded);
        assert_eq!(cache.model_count(), 0);
    }

    #[test]
    fn variants_are_cached_separately() {
        assert_eq!(AssetCache::variant_key("a.gltf", ""), "a.gltf");
        assert_eq!(AssetCache::variant_key("a.gltf", "x"), "a.gltf#x");

        let model = r#"{ "asset": { "version": "2.0" }, "scenes": [{ "nodes": [0] }], "nodes": [{ "name": "Root" }], "materials": [{ "name": "m" }] }"#;
        let cache = AssetCache::from_memory(MemoryAssetReader::new().with("a.gltf", model.as_bytes().to_vec()));

        let plain = cache.load_model("a.gltf").unwrap();
        let dimmed = cache
            .load_model_variant("a.gltf", "dim", |asset| {
                if let Some(material) = asset.material_mut("m") {
                    material.emissive_intensity = 0.5;
                }
                Ok(())
            })
            .unwrap();
        let again = cache
            .load_model_variant("a.gltf", "dim", |_| Err(Error::InvalidScene("hook ran twice".into())))
            .unwrap();

        assert!(!Arc::ptr_eq(&plain, &dimmed));
        assert!(Arc::ptr_eq(&dimmed, &again));
        assert!((plain.material("m").unwrap().emissive_intensity - 1.0).abs() < 1e-6);
        assert!((dimmed.material("m").unwrap().emissive_intensity - 0.5).abs() < 1e-6);
        assert_eq!(cache.model_count(), 2);
    }
}
