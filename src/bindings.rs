//! JS-facing widget class.
//!
//! One `AsProgress` per element. Instances are remembered per element so
//! `AsProgress.attach` never builds a second bar on the same node.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::config::{default_label, ProgressOptions, ATTRIBUTE_KEYS};
use crate::debug_log;
use crate::dom_utils::{dispatch_dom_event, read_data_attributes, ClassNames, DomRenderSink, ProgressElements};
use crate::events::{EventKind, ProgressEvent};
use crate::models::Goal;
use crate::progress::{ProgressBar, ProgressBuilder};
use crate::scheduler::BrowserScheduler;

thread_local! {
    static INSTANCES: RefCell<Vec<(Element, ProgressBar)>> = RefCell::new(Vec::new());
}

fn lookup(element: &Element) -> Option<ProgressBar> {
    INSTANCES.with(|instances| {
        instances
            .borrow()
            .iter()
            .find(|(el, _)| Object::is(el, element))
            .map(|(_, bar)| bar.clone())
    })
}

fn register(element: &Element, bar: &ProgressBar) {
    INSTANCES.with(|instances| instances.borrow_mut().push((element.clone(), bar.clone())));
}

fn unregister(element: &Element) {
    // Take the entries out first so dropping them runs outside the borrow.
    let removed: Vec<(Element, ProgressBar)> = INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        let (gone, kept): (Vec<_>, Vec<_>) =
            instances.drain(..).partition(|(el, _)| Object::is(el, element));
        *instances = kept;
        gone
    });
    drop(removed);
}

#[wasm_bindgen]
pub struct AsProgress {
    element: Element,
    bar: ProgressBar,
}

#[wasm_bindgen]
impl AsProgress {
    /// Build a bar on `element`. `options` may hold `min`, `max`, `goal`,
    /// `speed`, `namespace`, `bootstrap`, `labelCallback` and `on<Event>`
    /// hooks; `data-*` attributes on the element win over it.
    ///
    /// An element keeps its first bar: constructing again returns a handle to
    /// it and `options` are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(element: Element, options: JsValue) -> Result<AsProgress, JsValue> {
        console_error_panic_hook::set_once();

        if let Some(bar) = lookup(&element) {
            debug_log!("element already has a progress bar, reusing it");
            return Ok(AsProgress { element, bar });
        }

        let mut opts = options_from_js(&options)?;
        opts.merge_attributes(read_data_attributes(&element));

        let classes = ClassNames::resolve(&opts);
        let nodes = ProgressElements::locate(&element, &classes)?;
        let mut builder = ProgressBuilder::new(opts).first(nodes.first_value());

        if let Some(label) = function_option(&options, "labelCallback") {
            let fallback = default_label();
            builder = builder.label(move |value, range| {
                call_label(&label, value).unwrap_or_else(|| fallback(value, range))
            });
        }

        for kind in EventKind::ALL {
            if let Some(hook) = function_option(&options, &kind.callback_name()) {
                builder = builder.on(kind, move |event| call_hook(&hook, event));
            }
        }

        let forward_to = element.clone();
        builder = builder.on_any(move |event| {
            if let Err(e) = dispatch_dom_event(&forward_to, event) {
                web_sys::console::warn_1(&format!("Failed to dispatch {}: {:?}", event.kind(), e).into());
            }
        });

        let bar = builder.build(Rc::new(BrowserScheduler::new()), DomRenderSink::new(&nodes));
        register(&element, &bar);
        debug_log!("progress bar ready at {}", bar.get());

        Ok(AsProgress { element, bar })
    }

    /// The bar already living on `element`, or a new one.
    pub fn attach(element: Element, options: JsValue) -> Result<AsProgress, JsValue> {
        AsProgress::new(element, options)
    }

    /// `goal` may be a number, a numeric string, a percentage string such as
    /// `"40%"`, or omitted for the configured goal.
    pub fn go(&self, goal: JsValue) {
        if goal.is_undefined() || goal.is_null() {
            self.bar.go(Goal::Default);
        } else if let Some(value) = goal.as_f64() {
            self.bar.go(value);
        } else if let Some(text) = goal.as_string() {
            self.bar.go_str(&text);
        } else {
            web_sys::console::warn_1(&"Unsupported progress goal, using configured goal".into());
            self.bar.go(Goal::Default);
        }
    }

    pub fn start(&self) {
        self.bar.start();
    }

    pub fn stop(&self) {
        self.bar.stop();
    }

    pub fn reset(&self) {
        self.bar.reset();
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn get(&self) -> f64 {
        self.bar.get()
    }

    pub fn percentage(&self) -> f64 {
        self.bar.percentage()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.bar.is_running()
    }

    pub fn destroy(&self) {
        self.bar.destroy();
        unregister(&self.element);
    }
}

/// Known option keys copied into a plain object, so hook functions never
/// reach the deserializer.
fn options_from_js(options: &JsValue) -> Result<ProgressOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ProgressOptions::default());
    }

    let plain = Object::new();
    for key in ATTRIBUTE_KEYS {
        let key = JsValue::from_str(key);
        let value = Reflect::get(options, &key)?;
        if !value.is_undefined() {
            Reflect::set(&plain, &key, &value)?;
        }
    }

    serde_wasm_bindgen::from_value(plain.into())
        .map_err(|e| JsValue::from_str(&format!("Invalid progress options: {}", e)))
}

fn function_option(options: &JsValue, name: &str) -> Option<Function> {
    if !options.is_object() {
        return None;
    }
    Reflect::get(options, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn call_label(label: &Function, value: f64) -> Option<String> {
    match label.call1(&JsValue::NULL, &JsValue::from_f64(value)) {
        Ok(text) => text
            .as_string()
            .or_else(|| text.as_f64().map(|n| n.to_string())),
        Err(e) => {
            web_sys::console::error_1(&format!("labelCallback threw: {:?}", e).into());
            None
        }
    }
}

fn call_hook(hook: &Function, event: &ProgressEvent) {
    let arg = event.value().map(JsValue::from_f64).unwrap_or(JsValue::UNDEFINED);
    if let Err(e) = hook.call1(&JsValue::NULL, &arg) {
        web_sys::console::error_1(&format!("{} hook threw: {:?}", event.kind().callback_name(), e).into());
    }
}
