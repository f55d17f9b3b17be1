//! Lifecycle notifications and the observer list that delivers them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::constants::EVENT_PREFIX;
use crate::utils::capitalise_first;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    Ready,
    Start,
    Update,
    Reset,
    Stop,
    Finish,
    Destroy,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Init,
        EventKind::Ready,
        EventKind::Start,
        EventKind::Update,
        EventKind::Reset,
        EventKind::Stop,
        EventKind::Finish,
        EventKind::Destroy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Ready => "ready",
            EventKind::Start => "start",
            EventKind::Update => "update",
            EventKind::Reset => "reset",
            EventKind::Stop => "stop",
            EventKind::Finish => "finish",
            EventKind::Destroy => "destroy",
        }
    }

    /// Name of the DOM event dispatched on the widget element,
    /// e.g. `asProgress::update`.
    pub fn dom_event_name(self) -> String {
        format!("{}{}", EVENT_PREFIX, self.as_str())
    }

    /// Name of the option hook for this event, e.g. `onUpdate`.
    pub fn callback_name(self) -> String {
        format!("on{}", capitalise_first(self.as_str()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    Init,
    Ready,
    Start,
    /// Carries the newly applied value.
    Update(f64),
    Reset,
    Stop,
    Finish,
    Destroy,
}

impl ProgressEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProgressEvent::Init => EventKind::Init,
            ProgressEvent::Ready => EventKind::Ready,
            ProgressEvent::Start => EventKind::Start,
            ProgressEvent::Update(_) => EventKind::Update,
            ProgressEvent::Reset => EventKind::Reset,
            ProgressEvent::Stop => EventKind::Stop,
            ProgressEvent::Finish => EventKind::Finish,
            ProgressEvent::Destroy => EventKind::Destroy,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ProgressEvent::Update(v) => Some(*v),
            _ => None,
        }
    }
}

pub type Listener = Rc<dyn Fn(&ProgressEvent)>;

/// Listener ids returned by [`EventBus::on`] / [`EventBus::on_any`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    kind: Option<EventKind>,
    listener: Listener,
}

/// Ordered list of listeners, each bound to one event kind or to all.
///
/// Emission works on a snapshot, so listeners may subscribe, unsubscribe or
/// drive the widget while an event is being delivered.
#[derive(Default)]
pub struct EventBus {
    registrations: RefCell<Vec<Registration>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.register(Some(kind), listener)
    }

    pub fn on_any(&self, listener: Listener) -> ListenerId {
        self.register(None, listener)
    }

    fn register(&self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.registrations.borrow_mut().push(Registration { id, kind, listener });
        id
    }

    /// Returns `false` when the id was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut regs = self.registrations.borrow_mut();
        let before = regs.len();
        regs.retain(|r| r.id != id);
        regs.len() != before
    }

    pub fn clear(&self) {
        self.registrations.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, event: &ProgressEvent) {
        let kind = event.kind();
        let targets: Vec<Listener> = self
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.kind.map_or(true, |k| k == kind))
            .map(|r| r.listener.clone())
            .collect();
        for listener in targets {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn names_follow_widget_conventions() {
        assert_eq!(EventKind::Update.dom_event_name(), "asProgress::update");
        assert_eq!(EventKind::Update.callback_name(), "onUpdate");
        assert_eq!(EventKind::Destroy.callback_name(), "onDestroy");
    }

    #[test]
    fn emit_respects_kind_filter() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        bus.on(EventKind::Update, Rc::new(move |e: &ProgressEvent| s.borrow_mut().push(format!("u:{:?}", e.value()))));
        let s = seen.clone();
        bus.on_any(Rc::new(move |e: &ProgressEvent| s.borrow_mut().push(format!("any:{}", e.kind()))));

        bus.emit(&ProgressEvent::Update(3.0));
        bus.emit(&ProgressEvent::Stop);

        assert_eq!(*seen.borrow(), vec!["u:Some(3.0)", "any:update", "any:stop"]);
    }

    #[test]
    fn off_removes_listener() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = bus.on(EventKind::Stop, Rc::new(move |_: &ProgressEvent| *c.borrow_mut() += 1));

        bus.emit(&ProgressEvent::Stop);
        assert!(bus.off(id));
        assert!(!bus.off(id));
        bus.emit(&ProgressEvent::Stop);

        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn listener_may_subscribe_during_emit() {
        let bus = Rc::new(EventBus::new());
        let inner = Rc::downgrade(&bus);
        bus.on(
            EventKind::Init,
            Rc::new(move |_: &ProgressEvent| {
                if let Some(bus) = inner.upgrade() {
                    bus.on_any(Rc::new(|_: &ProgressEvent| {}));
                }
            }),
        );
        bus.emit(&ProgressEvent::Init);
        assert_eq!(bus.len(), 2);
    }
}
