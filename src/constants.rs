// Default option values - these are the single source of truth for defaults
pub const DEFAULT_NAMESPACE: &str = "asProgress";
pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;
pub const DEFAULT_GOAL: f64 = 100.0;
pub const DEFAULT_SPEED: f64 = 20.0; // time units per 1/100 of the range

// Bootstrap markup uses fixed class names
pub const BOOTSTRAP_NAMESPACE: &str = "progress";
pub const BOOTSTRAP_BAR_CLASS: &str = "progress-bar";

// Accessibility attribute carrying the raw value
pub const ARIA_VALUE_ATTR: &str = "aria-valuenow";

// Prefix for DOM events dispatched on the widget element
pub const EVENT_PREFIX: &str = "asProgress::";

/// Spacing between frames when the host has no native frame scheduling.
pub const FALLBACK_FRAME_INTERVAL_MS: f64 = 16.0;
