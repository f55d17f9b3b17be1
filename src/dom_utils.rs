//! dom_utils.rs – the DOM side of the widget.
//!
//! Finds the bar, label and accessibility target inside a widget element,
//! reads markup-provided configuration, and reflects rendered values and
//! lifecycle events back into the page.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement};

use crate::config::{ProgressOptions, ATTRIBUTE_KEYS};
use crate::constants::{ARIA_VALUE_ATTR, BOOTSTRAP_BAR_CLASS, BOOTSTRAP_NAMESPACE};
use crate::events::ProgressEvent;
use crate::models::RenderFrame;
use crate::render::RenderSink;
use crate::utils::parse_leading_int;

/// Class names the widget looks for, depending on markup flavour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub namespace: String,
    pub bar: String,
    pub label: String,
    /// Bootstrap markup keeps the aria attributes on the bar itself.
    pub bootstrap: bool,
}

impl ClassNames {
    pub fn resolve(options: &ProgressOptions) -> Self {
        if options.bootstrap {
            Self {
                namespace: BOOTSTRAP_NAMESPACE.to_string(),
                bar: BOOTSTRAP_BAR_CLASS.to_string(),
                label: format!("{}-label", BOOTSTRAP_NAMESPACE),
                bootstrap: true,
            }
        } else {
            Self {
                namespace: options.namespace.clone(),
                bar: format!("{}__bar", options.namespace),
                label: format!("{}__label", options.namespace),
                bootstrap: false,
            }
        }
    }

    pub fn bar_selector(&self) -> String {
        format!(".{}", self.bar)
    }

    pub fn label_selector(&self) -> String {
        format!(".{}", self.label)
    }
}

/// Nodes of one widget instance.
#[derive(Debug, Clone)]
pub struct ProgressElements {
    pub element: Element,
    /// Carries `aria-valuenow`.
    pub target: Element,
    pub bar: Option<HtmlElement>,
    pub label: Option<Element>,
}

impl ProgressElements {
    /// Look up the widget's parts. Custom markup gets the namespace class
    /// added to the root element.
    pub fn locate(element: &Element, classes: &ClassNames) -> Result<Self, JsValue> {
        let bar_el = element.query_selector(&classes.bar_selector())?;

        let target = if classes.bootstrap {
            bar_el.clone().unwrap_or_else(|| element.clone())
        } else {
            element.class_list().add_1(&classes.namespace)?;
            element.clone()
        };

        Ok(Self {
            element: element.clone(),
            target,
            bar: bar_el.and_then(|e| e.dyn_into::<HtmlElement>().ok()),
            label: element.query_selector(&classes.label_selector())?,
        })
    }

    /// Starting value persisted in markup, if any.
    pub fn first_value(&self) -> Option<f64> {
        self.target
            .get_attribute(ARIA_VALUE_ATTR)
            .and_then(|v| parse_leading_int(&v))
    }
}

/// `data-*` attributes that map onto option keys.
pub fn read_data_attributes(element: &Element) -> Vec<(String, String)> {
    let html = match element.dyn_ref::<HtmlElement>() {
        Some(html) => html,
        None => return Vec::new(),
    };
    let dataset = html.dataset();
    ATTRIBUTE_KEYS
        .iter()
        .filter_map(|key| dataset.get(key).map(|v| (key.to_string(), v)))
        .collect()
}

/// Renders into the widget's nodes.
pub struct DomRenderSink {
    target: Element,
    bar: Option<HtmlElement>,
    label: Option<Element>,
}

impl DomRenderSink {
    pub fn new(elements: &ProgressElements) -> Self {
        Self {
            target: elements.target.clone(),
            bar: elements.bar.clone(),
            label: elements.label.clone(),
        }
    }
}

impl RenderSink for DomRenderSink {
    fn render(&self, frame: &RenderFrame) {
        if let Some(bar) = &self.bar {
            if let Err(e) = bar.style().set_property("width", &format!("{}%", frame.percentage)) {
                web_sys::console::warn_1(&format!("Failed to size progress bar: {:?}", e).into());
            }
        }
        if let Err(e) = self.target.set_attribute(ARIA_VALUE_ATTR, &frame.value.to_string()) {
            web_sys::console::warn_1(&format!("Failed to set {}: {:?}", ARIA_VALUE_ATTR, e).into());
        }
        if let Some(label) = &self.label {
            label.set_inner_html(&frame.label);
        }
    }
}

/// Dispatch `asProgress::<event>` on `element`. The update value travels in
/// `detail`.
pub fn dispatch_dom_event(element: &Element, event: &ProgressEvent) -> Result<bool, JsValue> {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&event.value().map(JsValue::from_f64).unwrap_or(JsValue::UNDEFINED));

    let dom_event = CustomEvent::new_with_event_init_dict(&event.kind().dom_event_name(), &init)?;
    element.dispatch_event(&dom_event)
}
