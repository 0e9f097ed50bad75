use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How texture coordinates outside `0..1` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureSampler {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

impl TextureSampler {
    #[must_use]
    pub fn repeat() -> Self {
        Self {
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
        }
    }
}

static NEXT_TEXTURE_VERSION: AtomicU64 = AtomicU64::new(1);

/// Decoded RGBA8 image plus its sampling state.
#[derive(Debug)]
pub struct Texture {
    pub uuid: Uuid,
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows
    pub data: Vec<u8>,
    pub sampler: TextureSampler,
    version: u64,
}

impl Texture {
    #[must_use]
    pub fn new_rgba8(label: &str, width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            uuid: Uuid::new_v4(),
            label: label.to_string(),
            width,
            height,
            data,
            sampler: TextureSampler::default(),
            version: NEXT_TEXTURE_VERSION.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Changes sampling state; bumps the version so consumers re-upload.
    pub fn set_sampler(&mut self, sampler: TextureSampler) {
        if self.sampler != sampler {
            self.sampler = sampler;
            self.version = NEXT_TEXTURE_VERSION.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// RGBA of the texel at `(x, y)`; `None` when out of bounds.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }
}
