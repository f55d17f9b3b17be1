//! Per-widget animation state.

use crate::config::ProgressOptions;
use crate::models::{AnimationRun, Range, RunId};

/// Where the animator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Running(AnimationRun),
    /// The last run reached its goal, or `finish` was called.
    Finished,
}

#[derive(Debug, Clone)]
pub struct ProgressState {
    pub range: Range,
    /// Value `reset` returns to.
    pub first: f64,
    /// Configured default goal.
    pub goal: f64,
    pub speed: f64,
    pub current: f64,
    pub phase: Phase,
    pub destroyed: bool,
    next_run: u64,
}

impl ProgressState {
    /// `first` defaults to `min` and is clamped into the range.
    pub fn new(options: &ProgressOptions, first: Option<f64>) -> Self {
        let range = options.range();
        let first = range.clamp(first.unwrap_or(range.min));
        Self {
            range,
            first,
            goal: options.goal,
            speed: options.speed,
            current: first,
            phase: Phase::Idle,
            destroyed: false,
            next_run: 0,
        }
    }

    pub fn percentage(&self, value: f64) -> f64 {
        self.range.percentage(value)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn active_run(&self) -> Option<&AnimationRun> {
        match &self.phase {
            Phase::Running(run) => Some(run),
            _ => None,
        }
    }

    /// Whether `run` is the run currently in flight.
    pub fn is_current(&self, run: RunId) -> bool {
        self.active_run().map_or(false, |r| r.id == run)
    }

    pub(crate) fn begin_run(&mut self, goal: f64, now: f64) -> AnimationRun {
        self.next_run += 1;
        let run = AnimationRun {
            id: RunId(self.next_run),
            start_value: self.current,
            start_time: now,
            goal,
        };
        self.phase = Phase::Running(run);
        run
    }
}
