//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the failure modes of scene
//! composition:
//! - Asset loading and decoding errors (missing files, malformed glTF, bad images)
//! - Material lookups against a loaded asset
//! - Invalid scene descriptions
//!
//! Neither asset nor material failures are recovered at the component level.
//! They propagate unchanged through [`SceneComposer::compose`], which has no
//! partial-success mode.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use tidelight::errors::{Error, Result};
//!
//! fn tune_window(asset: &mut ModelAsset) -> Result<()> {
//!     MaterialTuner::tune(asset, "window", &MaterialOverrides::glass())
//! }
//! ```
//!
//! [`SceneComposer::compose`]: crate::composer::SceneComposer::compose

use thiserror::Error;

/// The main error type for tidelight.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The resource behind `url` is missing or could not be decoded.
    #[error("Failed to load asset '{url}': {reason}")]
    AssetLoad {
        /// URL as passed to the cache (before base-path resolution)
        url: String,
        /// Human readable cause
        reason: String,
    },

    /// A material expected on a loaded asset is absent.
    #[error("Material '{material}' not found on asset '{asset}'")]
    MaterialNotFound {
        /// URL of the asset that was searched
        asset: String,
        /// The requested material name
        material: String,
    },

    // ========================================================================
    // Scene Description Errors
    // ========================================================================
    /// A scene description that cannot be composed.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // I/O & Runtime Errors
    // ========================================================================
    /// File I/O error outside of asset loading (e.g. reading a scene file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task join error (when a decode task fails to complete).
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Feature not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl Error {
    pub(crate) fn asset_load(url: &str, reason: impl std::fmt::Display) -> Self {
        Error::AssetLoad {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
