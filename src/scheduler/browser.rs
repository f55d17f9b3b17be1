//! Scheduler backed by `requestAnimationFrame`, with a paced timer fallback
//! for hosts that lack it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use super::{FrameCallback, FrameHandle, FramePacer, FrameScheduler};
use crate::debug_log;

enum PendingFrame {
    Animation {
        id: i32,
        _closure: Closure<dyn FnMut(f64)>,
    },
    Timer(Timeout),
}

struct Pending {
    frame: PendingFrame,
    callback: FrameCallback,
}

#[derive(Default)]
struct BrowserFrames {
    next_id: u32,
    pending: HashMap<FrameHandle, Pending>,
    // Most recently fired JS callback. Kept alive until the next one fires so
    // it is never dropped from inside its own invocation.
    spent: Option<PendingFrame>,
    pacer: FramePacer,
}

pub struct BrowserScheduler {
    window: Option<Window>,
    native: bool,
    frames: Rc<RefCell<BrowserFrames>>,
}

impl Default for BrowserScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserScheduler {
    /// Use native frame scheduling when the window offers it.
    pub fn new() -> Self {
        let window = web_sys::window();
        let native = window.as_ref().map_or(false, |w| {
            has_method(w, "requestAnimationFrame") && has_method(w, "cancelAnimationFrame")
        });
        debug_log!("frame scheduler: {}", if native { "requestAnimationFrame" } else { "timer fallback" });
        Self { window, native, frames: Rc::new(RefCell::new(BrowserFrames::default())) }
    }

    /// Always use the paced timer, even when native scheduling exists.
    pub fn fallback() -> Self {
        Self { native: false, ..Self::new() }
    }

    pub fn is_native(&self) -> bool {
        self.native
    }

    fn allocate(&self) -> FrameHandle {
        let mut frames = self.frames.borrow_mut();
        frames.next_id = frames.next_id.wrapping_add(1);
        FrameHandle(frames.next_id)
    }

    fn request_animation(&self, window: &Window, handle: FrameHandle) -> Result<PendingFrame, JsValue> {
        let weak = Rc::downgrade(&self.frames);
        let closure = Closure::wrap(Box::new(move |time: f64| {
            fire(&weak, handle, time);
        }) as Box<dyn FnMut(f64)>);
        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        Ok(PendingFrame::Animation { id, _closure: closure })
    }

    fn request_timer(&self, handle: FrameHandle) -> PendingFrame {
        let now = self.now();
        let at = self.frames.borrow().pacer.next_fire_time(now);
        let delay = (at - now).max(0.0).ceil() as u32;

        let weak = Rc::downgrade(&self.frames);
        PendingFrame::Timer(Timeout::new(delay, move || fire(&weak, handle, at)))
    }
}

impl FrameScheduler for BrowserScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.allocate();

        let frame = match (&self.window, self.native) {
            (Some(window), true) => match self.request_animation(window, handle) {
                Ok(frame) => frame,
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("requestAnimationFrame failed, using timer: {:?}", e).into(),
                    );
                    self.request_timer(handle)
                }
            },
            _ => self.request_timer(handle),
        };

        self.frames.borrow_mut().pending.insert(handle, Pending { frame, callback });
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let removed = self.frames.borrow_mut().pending.remove(&handle);
        if let Some(Pending { frame: PendingFrame::Animation { id, .. }, .. }) = &removed {
            if let Some(window) = &self.window {
                let _ = window.cancel_animation_frame(*id);
            }
        }
        // Dropping a `Timeout` clears it.
        drop(removed);
    }

    fn now(&self) -> f64 {
        self.window
            .as_ref()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

fn fire(frames: &Weak<RefCell<BrowserFrames>>, handle: FrameHandle, time: f64) {
    let frames = match frames.upgrade() {
        Some(frames) => frames,
        None => return,
    };

    let (callback, previous) = {
        let mut state = frames.borrow_mut();
        let Pending { frame, callback } = match state.pending.remove(&handle) {
            Some(pending) => pending,
            None => return,
        };
        if let PendingFrame::Timer(_) = frame {
            state.pacer.mark_fired(time);
        }
        let previous = state.spent.replace(frame);
        (callback, previous)
    };
    drop(previous);

    callback(time);
}

fn has_method(window: &Window, name: &str) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .map(|v| v.is_function())
        .unwrap_or(false)
}
