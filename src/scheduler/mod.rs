//! "Run this before the next repaint" and "never mind".
//!
//! The animator only ever talks to [`FrameScheduler`]; hosts pick the
//! implementation. [`BrowserScheduler`] drives real pages, [`ManualScheduler`]
//! drives tests and headless embedders.

pub mod browser;
pub mod manual;

pub use browser::BrowserScheduler;
pub use manual::ManualScheduler;

use crate::constants::FALLBACK_FRAME_INTERVAL_MS;

/// Single-shot frame callback; receives the frame timestamp.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Opaque token for a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub(crate) u32);

pub trait FrameScheduler {
    /// Run `callback` once, at the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Prevent a pending callback from firing. Unknown, fired and already
    /// cancelled handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Current time, in the same timebase as frame timestamps.
    fn now(&self) -> f64;
}

/// Keeps timer-driven frames at least [`FALLBACK_FRAME_INTERVAL_MS`] apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePacer {
    last_fire: f64,
    interval: f64,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(FALLBACK_FRAME_INTERVAL_MS)
    }
}

impl FramePacer {
    pub fn new(interval: f64) -> Self {
        Self { last_fire: 0.0, interval }
    }

    /// `max(last_fire + interval, now)`.
    pub fn next_fire_time(&self, now: f64) -> f64 {
        (self.last_fire + self.interval).max(now)
    }

    /// Record a frame that actually fired. Cancelled frames never get here.
    pub fn mark_fired(&mut self, at: f64) {
        self.last_fire = at;
    }
}
