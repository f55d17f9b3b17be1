//! Plain data types shared by the animator, the scheduler glue and the DOM
//! layer.

use std::fmt;
use std::str::FromStr;

use crate::utils::parse_leading_int;

/// Bounds over which progress is expressed. `min <= max` is a caller
/// contract and is not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `round(100 * (value - min) / (max - min))`.
    ///
    /// A zero-width range yields a non-finite result.
    pub fn percentage(&self, value: f64) -> f64 {
        (100.0 * (value - self.min) / self.span()).round()
    }

    /// Value sitting at `pct` percent of the range, rounded.
    pub fn value_at_percentage(&self, pct: f64) -> f64 {
        (self.min + (pct / 100.0) * self.span()).round()
    }

    /// Clamp into `[min, max]` without panicking on an inverted range or NaN.
    pub fn clamp(&self, value: f64) -> f64 {
        if value > self.max {
            self.max
        } else if value < self.min {
            self.min
        } else {
            value
        }
    }
}

/// Where a `go` call should head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// The configured default goal.
    Default,
    /// An absolute value in range units.
    Value(f64),
    /// A percentage of the range, e.g. parsed from `"50%"`.
    Percent(f64),
}

impl Goal {
    /// Resolve into an absolute, clamped target.
    pub fn resolve(self, range: &Range, default_goal: f64) -> f64 {
        let raw = match self {
            Goal::Default => default_goal,
            Goal::Value(v) => v,
            Goal::Percent(pct) => range.value_at_percentage(pct),
        };
        range.clamp(raw)
    }
}

impl From<f64> for Goal {
    fn from(v: f64) -> Self {
        Goal::Value(v)
    }
}

impl From<Option<f64>> for Goal {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Goal::Default, Goal::Value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGoalError(String);

impl fmt::Display for ParseGoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid progress goal: {:?}", self.0)
    }
}

impl std::error::Error for ParseGoalError {}

impl FromStr for Goal {
    type Err = ParseGoalError;

    /// `"40%"` becomes a percentage (leading integer only, like `parseInt`),
    /// anything else must be a plain number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('%') {
            return parse_leading_int(&s.replace('%', ""))
                .map(Goal::Percent)
                .ok_or_else(|| ParseGoalError(s.to_string()));
        }
        s.trim()
            .parse::<f64>()
            .map(Goal::Value)
            .map_err(|_| ParseGoalError(s.to_string()))
    }
}

/// Identifies one `go` invocation so stale frames can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Captured when an animation begins; every frame is measured against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRun {
    pub id: RunId,
    pub start_value: f64,
    pub start_time: f64,
    pub goal: f64,
}

impl AnimationRun {
    /// Value to display at `time`.
    ///
    /// Time is always measured from `start_time` so slow frames never
    /// accumulate drift. The result never overshoots `goal`.
    pub fn value_at(&self, time: f64, range: &Range, speed: f64) -> f64 {
        let elapsed = (time - self.start_time).max(0.0);
        let distance = elapsed / speed;
        let delta = (distance / 100.0 * range.span()).round();

        if self.goal > self.start_value {
            let next = self.start_value + delta;
            if next > self.goal {
                self.goal
            } else {
                next
            }
        } else {
            let next = self.start_value - delta;
            if next < self.goal {
                self.goal
            } else {
                next
            }
        }
    }
}

/// What the render sink receives on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Bar width, in percent.
    pub percentage: f64,
    /// Raw value for the accessibility attribute.
    pub value: f64,
    pub label: String,
}
