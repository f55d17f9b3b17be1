//! Deterministic scheduler whose clock only moves when told to.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{FrameCallback, FrameHandle, FrameScheduler};

#[derive(Default)]
struct ManualFrames {
    clock: f64,
    next_id: u32,
    pending: BTreeMap<FrameHandle, FrameCallback>,
}

/// Frames fire only on [`ManualScheduler::advance`].
///
/// ```rust,ignore
/// let scheduler = Rc::new(ManualScheduler::new());
/// let bar = ProgressBuilder::new(ProgressOptions::default()).build(scheduler.clone(), sink);
/// bar.start();
/// scheduler.run_until_idle(16.0, 1_000);
/// assert_eq!(bar.get(), 100.0);
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    frames: RefCell<ManualFrames>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(clock: f64) -> Self {
        let scheduler = Self::default();
        scheduler.frames.borrow_mut().clock = clock;
        scheduler
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().pending.len()
    }

    /// Move the clock by `ms` and fire every frame that was pending before
    /// the call. Frames requested by those callbacks wait for the next
    /// advance. Returns how many callbacks ran.
    pub fn advance(&self, ms: f64) -> usize {
        let (time, due): (f64, Vec<FrameHandle>) = {
            let mut frames = self.frames.borrow_mut();
            frames.clock += ms;
            (frames.clock, frames.pending.keys().copied().collect())
        };

        let mut fired = 0;
        for handle in due {
            // An earlier callback in this batch may have cancelled it.
            let callback = self.frames.borrow_mut().pending.remove(&handle);
            if let Some(callback) = callback {
                callback(time);
                fired += 1;
            }
        }
        fired
    }

    /// Advance in `step` increments until nothing is pending or `max_frames`
    /// advances have happened. Returns the number of advances.
    pub fn run_until_idle(&self, step: f64, max_frames: usize) -> usize {
        let mut advances = 0;
        while self.pending_frames() > 0 && advances < max_frames {
            self.advance(step);
            advances += 1;
        }
        advances
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut frames = self.frames.borrow_mut();
        frames.next_id += 1;
        let handle = FrameHandle(frames.next_id);
        frames.pending.insert(handle, callback);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.frames.borrow_mut().pending.remove(&handle);
    }

    fn now(&self) -> f64 {
        self.frames.borrow().clock
    }
}
