//! Animated progress bar.
//!
//! [`ProgressBar`] moves a displayed value toward a goal one frame at a time,
//! pushing every step to a [`RenderSink`] and announcing lifecycle events on
//! an [`EventBus`]. Frames come from a [`FrameScheduler`]: the browser's
//! `requestAnimationFrame` (or a paced timer) on the web, or a
//! [`ManualScheduler`] anywhere else. [`AsProgress`] exposes the widget to
//! JavaScript.

mod macros;

pub mod bindings;
mod command_executors;
pub mod config;
pub mod constants;
pub mod dom_utils;
pub mod events;
pub mod messages;
pub mod models;
pub mod progress;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod update;
pub mod utils;

pub use bindings::AsProgress;
pub use config::{LabelCallback, ProgressOptions};
pub use events::{EventBus, EventKind, ListenerId, ProgressEvent};
pub use models::{AnimationRun, Goal, ParseGoalError, Range, RenderFrame, RunId};
pub use progress::{ProgressBar, ProgressBuilder, WeakProgressBar};
pub use render::{NullSink, RenderSink};
pub use scheduler::{BrowserScheduler, FrameCallback, FrameHandle, FramePacer, FrameScheduler, ManualScheduler};
pub use state::Phase;
