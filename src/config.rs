//! Widget options: defaults, option objects and `data-*` overrides.

use std::rc::Rc;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_GOAL, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_NAMESPACE, DEFAULT_SPEED,
};
use crate::models::Range;

/// Turns a raw value into label text.
pub type LabelCallback = Rc<dyn Fn(f64, &Range) -> String>;

/// Default label: the value's percentage followed by `%`.
pub fn default_label() -> LabelCallback {
    Rc::new(|value, range| format!("{}%", range.percentage(value)))
}

/// Serialisable widget options.
///
/// Callbacks are not part of this struct; they are attached through
/// [`crate::progress::ProgressBuilder`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressOptions {
    pub namespace: String,
    pub bootstrap: bool,
    pub min: f64,
    pub max: f64,
    pub goal: f64,
    pub speed: f64,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            bootstrap: false,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            goal: DEFAULT_GOAL,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Option keys that may be overridden from `data-*` attributes.
pub const ATTRIBUTE_KEYS: [&str; 6] = ["namespace", "bootstrap", "min", "max", "goal", "speed"];

impl ProgressOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn range(&self) -> Range {
        Range::new(self.min, self.max)
    }

    /// Overlay string attributes (the element's dataset) on top of these
    /// options. Unknown keys and values that do not coerce are skipped.
    pub fn merge_attributes<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in attributes {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "namespace" if !value.is_empty() => self.namespace = value.to_string(),
                "bootstrap" => {
                    if let Ok(flag) = value.parse::<bool>() {
                        self.bootstrap = flag;
                    }
                }
                "min" => merge_number(&mut self.min, value),
                "max" => merge_number(&mut self.max, value),
                "goal" => merge_number(&mut self.goal, value),
                "speed" => merge_number(&mut self.speed, value),
                _ => {}
            }
        }
    }
}

fn merge_number(slot: &mut f64, value: &str) {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => *slot = n,
        _ => crate::debug_log!("ignoring non-numeric attribute value {:?}", value),
    }
}
