//! Lightweight uniform data container.
//!
//! Holds a small `Pod` uniform block inline together with a version counter.
//! Writers bump the version; the renderer compares versions to decide whether
//! the block needs re-uploading.

use bytemuck::Pod;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_UNIFORM_SLOT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct UniformSlot<T: Pod> {
    id: u64,
    data: T,
    version: u64,
    label: String,
}

impl<T: Pod> UniformSlot<T> {
    pub fn new(data: T, label: &str) -> Self {
        Self {
            id: NEXT_UNIFORM_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            data,
            version: 0,
            label: label.to_string(),
        }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.data
    }

    /// Replaces the whole block (bumps the version).
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version += 1;
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw bytes as uploaded to the GPU.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.data)
    }
}

impl<T: Pod> Clone for UniformSlot<T> {
    fn clone(&self) -> Self {
        Self {
            id: NEXT_UNIFORM_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            data: self.data,
            version: self.version,
            label: self.label.clone(),
        }
    }
}

impl<T: Pod> Deref for UniformSlot<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

// Writes through DerefMut count as a change.
impl<T: Pod> DerefMut for UniformSlot<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.version += 1;
        &mut self.data
    }
}
