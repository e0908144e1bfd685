//! Typed publish/subscribe channel
//!
//! One bus per controller instance. Subscribers are kept per event kind
//! with set semantics: delivery order between subscribers of the same kind
//! is unspecified. `emit` snapshots the subscriber list before calling
//! anyone, so a callback may unsubscribe itself (or others) mid-emit
//! without disturbing the current delivery.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// An event payload that knows which subscriber list it belongs to
pub trait Event {
    type Kind: Copy + Eq + Hash + fmt::Debug + 'static;

    fn kind(&self) -> Self::Kind;
}

type Callback<E> = Rc<dyn Fn(&E)>;

struct BusInner<E: Event> {
    next_id: u64,
    subscribers: HashMap<E::Kind, HashMap<u64, Callback<E>>>,
}

/// Per-instance event channel
pub struct EventBus<E: Event> {
    inner: Rc<RefCell<BusInner<E>>>,
}

impl<E: Event> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Event + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let counts: HashMap<E::Kind, usize> = inner
            .subscribers
            .iter()
            .map(|(kind, subs)| (*kind, subs.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}

impl<E: Event + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                subscribers: HashMap::new(),
            })),
        }
    }

    /// Register `callback` for `kind`; the returned handle unsubscribes it
    pub fn on(&self, kind: E::Kind, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .subscribers
                .entry(kind)
                .or_default()
                .insert(id, Rc::new(callback));
            id
        };

        let weak: Weak<RefCell<BusInner<E>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if let Some(subs) = inner.borrow_mut().subscribers.get_mut(&kind) {
                        subs.remove(&id);
                    }
                }
            })),
        }
    }

    /// Deliver `event` synchronously to a snapshot of its subscribers
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .inner
            .borrow()
            .subscribers
            .get(&event.kind())
            .map(|subs| subs.values().cloned().collect())
            .unwrap_or_default();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Drop every subscriber
    pub fn clear(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }

    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.inner
            .borrow()
            .subscribers
            .get(&kind)
            .map_or(0, HashMap::len)
    }
}

/// Unsubscribe handle returned by [`EventBus::on`]
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    #[derive(Debug)]
    struct Msg(Kind, u32);

    impl Event for Msg {
        type Kind = Kind;
        fn kind(&self) -> Kind {
            self.0
        }
    }

    #[test]
    fn test_emit_reaches_all_subscribers_of_kind() {
        let bus: EventBus<Msg> = EventBus::new();
        let total = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let total = total.clone();
            bus.on(Kind::Ping, move |m| total.set(total.get() + m.1));
        }
        let pong = Rc::new(Cell::new(false));
        {
            let pong = pong.clone();
            bus.on(Kind::Pong, move |_| pong.set(true));
        }

        bus.emit(&Msg(Kind::Ping, 2));
        assert_eq!(total.get(), 6);
        assert!(!pong.get());
    }

    #[test]
    fn test_unsubscribe() {
        let bus: EventBus<Msg> = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = hits.clone();
            bus.on(Kind::Ping, move |_| hits.set(hits.get() + 1))
        };
        bus.emit(&Msg(Kind::Ping, 0));
        sub.unsubscribe();
        bus.emit(&Msg(Kind::Ping, 0));

        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count(Kind::Ping), 0);
    }

    #[test]
    fn test_self_unsubscribe_during_emit_keeps_snapshot() {
        let bus: EventBus<Msg> = EventBus::new();
        let calls = Rc::new(Cell::new(0));
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let sub = {
            let calls = calls.clone();
            let handle = handle.clone();
            bus.on(Kind::Ping, move |_| {
                calls.set(calls.get() + 1);
                if let Some(sub) = handle.borrow_mut().take() {
                    sub.unsubscribe();
                }
            })
        };
        *handle.borrow_mut() = Some(sub);
        {
            let calls = calls.clone();
            bus.on(Kind::Ping, move |_| calls.set(calls.get() + 1));
        }

        bus.emit(&Msg(Kind::Ping, 0));
        assert_eq!(calls.get(), 2);

        bus.emit(&Msg(Kind::Ping, 0));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_clear_drops_everything() {
        let bus: EventBus<Msg> = EventBus::new();
        bus.on(Kind::Ping, |_| {});
        bus.on(Kind::Pong, |_| {});
        bus.clear();
        assert_eq!(bus.subscriber_count(Kind::Ping), 0);
        assert_eq!(bus.subscriber_count(Kind::Pong), 0);
    }
}
