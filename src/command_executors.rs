//! Runs the `Command`s produced by `update` against the scheduler, the render
//! sink and the event bus.

use std::rc::Rc;

use crate::debug_log;
use crate::messages::{Command, Message};
use crate::models::{RenderFrame, RunId};
use crate::progress::Inner;
use crate::update::update;

/// Feed `msg` to the reducer, then execute its commands in order.
///
/// The state borrow is released before any command runs, so listeners and
/// label callbacks are free to call back into the widget.
pub(crate) fn dispatch(inner: &Rc<Inner>, msg: Message) {
    let commands = update(&mut inner.state.borrow_mut(), msg);
    for cmd in commands {
        execute(inner, cmd);
    }
}

fn execute(inner: &Rc<Inner>, cmd: Command) {
    match cmd {
        Command::CancelFrame => cancel_frame(inner),
        Command::RequestFrame(run) => request_frame(inner, run),
        Command::Render { value, percentage } => {
            let range = inner.state.borrow().range;
            let label = (inner.label)(value, &range);
            inner.sink.render(&RenderFrame { percentage, value, label });
        }
        Command::Notify(event) => inner.events.emit(&event),
    }
}

fn cancel_frame(inner: &Rc<Inner>) {
    let (owner, handle) = match inner.pending.get() {
        Some(pending) => pending,
        None => return,
    };
    // A listener may already have started a newer run and requested its frame.
    if inner.state.borrow().is_current(owner) {
        return;
    }
    debug_log!("cancelling frame {:?} of {}", handle, owner);
    inner.pending.set(None);
    inner.scheduler.cancel_frame(handle);
}

fn request_frame(inner: &Rc<Inner>, run: RunId) {
    // A listener may have superseded this run while earlier commands ran.
    if !inner.state.borrow().is_current(run) {
        debug_log!("not scheduling superseded {}", run);
        return;
    }

    if let Some((_, previous)) = inner.pending.take() {
        inner.scheduler.cancel_frame(previous);
    }

    let weak = Rc::downgrade(inner);
    let handle = inner.scheduler.request_frame(Box::new(move |time: f64| {
        if let Some(inner) = weak.upgrade() {
            if inner.pending.get().map_or(false, |(owner, _)| owner == run) {
                inner.pending.set(None);
            }
            dispatch(&inner, Message::Tick { run, time });
        }
    }));
    inner.pending.set(Some((run, handle)));
}
