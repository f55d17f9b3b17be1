//! The progress bar handle hosts hold on to.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::command_executors::dispatch;
use crate::config::{default_label, LabelCallback, ProgressOptions};
use crate::debug_log;
use crate::events::{EventBus, EventKind, Listener, ListenerId, ProgressEvent};
use crate::messages::Message;
use crate::models::{Goal, Range, RunId};
use crate::render::RenderSink;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::state::{Phase, ProgressState};

pub(crate) struct Inner {
    pub(crate) state: RefCell<ProgressState>,
    /// At most one frame is ever pending, tagged with the run it serves.
    pub(crate) pending: Cell<Option<(RunId, FrameHandle)>>,
    pub(crate) scheduler: Rc<dyn FrameScheduler>,
    pub(crate) sink: Box<dyn RenderSink>,
    pub(crate) events: EventBus,
    pub(crate) label: LabelCallback,
}

/// Shared handle to one animated progress bar. Clones refer to the same bar.
#[derive(Clone)]
pub struct ProgressBar {
    inner: Rc<Inner>,
}

/// Non-owning handle, for listeners that need to drive their own bar.
#[derive(Clone)]
pub struct WeakProgressBar {
    inner: Weak<Inner>,
}

impl WeakProgressBar {
    pub fn upgrade(&self) -> Option<ProgressBar> {
        self.inner.upgrade().map(|inner| ProgressBar { inner })
    }
}

impl ProgressBar {
    pub fn builder(options: ProgressOptions) -> ProgressBuilder {
        ProgressBuilder::new(options)
    }

    /// Animate toward `goal`, superseding any run in flight.
    pub fn go(&self, goal: impl Into<Goal>) {
        let now = self.inner.scheduler.now();
        self.dispatch(Message::Go { goal: goal.into(), now });
    }

    /// Like [`go`](Self::go) but takes `"40"` or `"40%"`. Unparseable input
    /// heads for the configured goal.
    pub fn go_str(&self, goal: &str) {
        let goal = goal.parse::<Goal>().unwrap_or_else(|e| {
            debug_log!("{}, using configured goal", e);
            Goal::Default
        });
        self.go(goal);
    }

    pub fn start(&self) {
        let now = self.inner.scheduler.now();
        self.dispatch(Message::Start { now });
    }

    pub fn stop(&self) {
        self.dispatch(Message::Stop);
    }

    pub fn reset(&self) {
        self.dispatch(Message::Reset);
    }

    pub fn finish(&self) {
        self.dispatch(Message::Finish);
    }

    /// Cancel any pending frame, emit `destroy` and drop every listener.
    /// Later calls are ignored; `get` keeps answering.
    pub fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        self.dispatch(Message::Destroy);
        self.inner.events.clear();
    }

    pub fn get(&self) -> f64 {
        self.inner.state.borrow().current
    }

    pub fn percentage(&self) -> f64 {
        let state = self.inner.state.borrow();
        state.percentage(state.current)
    }

    /// `round(100 * (value - min) / (max - min))`.
    pub fn percentage_of(&self, value: f64) -> f64 {
        self.inner.state.borrow().percentage(value)
    }

    pub fn range(&self) -> Range {
        self.inner.state.borrow().range
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().is_running()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ProgressEvent) + 'static,
    {
        self.inner.events.on(kind, Rc::new(listener))
    }

    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ProgressEvent) + 'static,
    {
        self.inner.events.on_any(Rc::new(listener))
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    pub fn downgrade(&self) -> WeakProgressBar {
        WeakProgressBar { inner: Rc::downgrade(&self.inner) }
    }

    fn dispatch(&self, msg: Message) {
        dispatch(&self.inner, msg);
    }
}

impl fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ProgressBar")
            .field("current", &state.current)
            .field("range", &state.range)
            .field("phase", &state.phase)
            .field("pending", &self.inner.pending.get())
            .finish()
    }
}

/// Collects the non-serialisable parts of a bar (label, listeners, first
/// value) before it is built.
pub struct ProgressBuilder {
    options: ProgressOptions,
    first: Option<f64>,
    label: Option<LabelCallback>,
    listeners: Vec<(Option<EventKind>, Listener)>,
}

impl ProgressBuilder {
    pub fn new(options: ProgressOptions) -> Self {
        Self { options, first: None, label: None, listeners: Vec::new() }
    }

    /// Starting value, e.g. read from markup. Defaults to `min`.
    pub fn first(mut self, first: impl Into<Option<f64>>) -> Self {
        self.first = first.into();
        self
    }

    pub fn label<F>(mut self, label: F) -> Self
    where
        F: Fn(f64, &Range) -> String + 'static,
    {
        self.label = Some(Rc::new(label));
        self
    }

    pub fn on<F>(mut self, kind: EventKind, listener: F) -> Self
    where
        F: Fn(&ProgressEvent) + 'static,
    {
        self.listeners.push((Some(kind), Rc::new(listener)));
        self
    }

    pub fn on_any<F>(mut self, listener: F) -> Self
    where
        F: Fn(&ProgressEvent) + 'static,
    {
        self.listeners.push((None, Rc::new(listener)));
        self
    }

    /// Build the bar: emits `init`, renders the first value (`update`,
    /// `reset`), then emits `ready`.
    pub fn build<S>(self, scheduler: Rc<dyn FrameScheduler>, sink: S) -> ProgressBar
    where
        S: RenderSink + 'static,
    {
        let events = EventBus::new();
        for (kind, listener) in self.listeners {
            match kind {
                Some(kind) => events.on(kind, listener),
                None => events.on_any(listener),
            };
        }

        let inner = Rc::new(Inner {
            state: RefCell::new(ProgressState::new(&self.options, self.first)),
            pending: Cell::new(None),
            scheduler,
            sink: Box::new(sink),
            events,
            label: self.label.unwrap_or_else(default_label),
        });
        let bar = ProgressBar { inner };

        bar.inner.events.emit(&ProgressEvent::Init);
        bar.reset();
        bar.inner.events.emit(&ProgressEvent::Ready);
        bar
    }
}
