//! Frame clock
//!
//! Per-frame callback scheduling. Everything that animates a composed scene
//! (water time, light orbits, mesh spin) registers here instead of hooking
//! into an ambient render loop.

use crate::scene::Scene;

/// Timing of the frame being processed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Seconds accumulated over all ticks
    pub time: f32,
    /// Seconds since the previous tick
    pub dt: f32,
    /// Number of ticks so far, including this one
    pub frame_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

type FrameCallback = Box<dyn FnMut(&mut Scene, &FrameState) + Send>;

struct Entry {
    id: CallbackId,
    name: String,
    callback: FrameCallback,
}

/// Runs registered callbacks once per tick, in registration order.
#[derive(Default)]
pub struct FrameClock {
    entries: Vec<Entry>,
    next_id: u64,
    state: FrameState,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, callback: F) -> CallbackId
    where
        F: FnMut(&mut Scene, &FrameState) + Send + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            name: name.to_string(),
            callback: Box::new(callback),
        });
        log::debug!("Registered frame callback '{name}' ({id:?})");
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: CallbackId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(index);
        log::debug!("Unregistered frame callback '{}'", entry.name);
        true
    }

    /// Advances time by `dt` and runs every callback once.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, scene: &mut Scene, dt: f32) -> FrameState {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.state.time += dt;
        self.state.dt = dt;
        self.state.frame_count += 1;

        let state = self.state;
        for entry in &mut self.entries {
            (entry.callback)(scene, &state);
        }
        state
    }

    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered callback names, in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("callbacks", &self.names().collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}
