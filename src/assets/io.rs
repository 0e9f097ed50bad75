use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};

/// Asset reader trait.
/// Reads raw bytes for a URL relative to the reader's root.
pub trait AssetReader: Send + Sync {
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Local file reader
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root_path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    #[must_use]
    pub fn resolve(&self, uri: &str) -> PathBuf {
        self.root_path.join(relative_uri(uri))
    }
}

/// `uri` relative to a reader root: a leading `/` or `./` still means the
/// root, never the filesystem or host root.
fn relative_uri(uri: &str) -> &str {
    let mut rest = uri;
    loop {
        let trimmed = rest.trim_start_matches('/').trim_start_matches("./");
        if trimmed.len() == rest.len() {
            return rest;
        }
        rest = trimmed;
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.resolve(uri);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::asset_load(uri, format!("{}: {e}", path.display())))
    }
}

/// In-memory reader, for embedded assets and tests.
#[derive(Default)]
pub struct MemoryAssetReader {
    files: RwLock<FxHashMap<String, Arc<[u8]>>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the bytes served for `uri`.
    pub fn insert(&self, uri: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.write().insert(uri.into(), bytes.into());
    }

    #[must_use]
    pub fn with(self, uri: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(uri, bytes);
        self
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.files.read().contains_key(uri)
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files
            .read()
            .get(uri)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| Error::asset_load(uri, "not found"))
    }
}

/// HTTP reader (conditional compilation)
#[cfg(feature = "http")]
pub struct HttpAssetReader {
    root_url: String,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    #[must_use]
    pub fn new(url: &str) -> Self {
        let root_url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        Self { root_url }
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    #[must_use]
    pub fn resolve(&self, uri: &str) -> String {
        if is_remote(uri) {
            uri.to_string()
        } else {
            format!("{}{}", self.root_url, relative_uri(uri))
        }
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let request = ehttp::Request::get(self.resolve(uri));
        let response = ehttp::fetch_async(request)
            .await
            .map_err(|e| Error::asset_load(uri, e))?;
        if !response.ok {
            return Err(Error::asset_load(
                uri,
                format!("HTTP {} {}", response.status, response.status_text),
            ));
        }
        Ok(response.bytes)
    }
}

/// Asset reader variants.
/// Enum dispatch instead of trait objects (the trait has an async method).
#[derive(Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    Memory(Arc<MemoryAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    /// Picks a reader for a base path or base URL.
    pub fn from_source(source: &str) -> Result<Self> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source))))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(Error::FeatureNotEnabled(
                    "HTTP asset sources need `features = [\"http\"]`".to_string(),
                ))
            }
        } else {
            Ok(Self::File(Arc::new(FileAssetReader::new(source))))
        }
    }

    #[must_use]
    pub fn memory(reader: MemoryAssetReader) -> Self {
        Self::Memory(Arc::new(reader))
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            Self::Memory(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
