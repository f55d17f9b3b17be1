// src/messages.rs
//
// Inputs the animator reacts to, and the side effects it asks for.
//
use crate::events::ProgressEvent;
use crate::models::{Goal, RunId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// Animate toward a goal; `now` is the scheduler clock.
    Go { goal: Goal, now: f64 },
    /// Emit `start`, then animate toward the configured goal.
    Start { now: f64 },
    /// A frame fired for `run` at `time`.
    Tick { run: RunId, time: f64 },
    Reset,
    Stop,
    /// Jump straight to the configured goal.
    Finish,
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Cancel the pending frame unless it belongs to the run that is current
    /// when the command executes.
    CancelFrame,

    /// Ask the scheduler for one frame on behalf of `run`. Dropped by the
    /// executor if `run` is no longer current.
    RequestFrame(RunId),

    /// Push a new value to the render sink.
    Render { value: f64, percentage: f64 },

    /// Deliver a lifecycle notification.
    Notify(ProgressEvent),
}
