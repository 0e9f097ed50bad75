use std::time::{Duration, Instant};

/// Wall-clock frame timer for hosts that do not supply their own deltas.
///
/// Deltas are capped at `max_delta` so a stalled frame (debugger, window
/// drag) does not advance animations by seconds at once.
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick, after capping
    pub delta: Duration,
    /// Total elapsed wall time since creation
    pub elapsed: Duration,
    pub frame_count: u64,
    pub max_delta: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(250);

    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Self::DEFAULT_MAX_DELTA,
        }
    }

    /// Samples the clock; returns the capped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last_update).min(self.max_delta);
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.last_update = now;
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
