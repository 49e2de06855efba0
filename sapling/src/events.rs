//! Event registration and dispatch.
//!
//! The registry lives beside the tree, not in it: handlers are keyed by
//! `(node, event name)` and the tree is only consulted at dispatch time to
//! walk the bubble path. Deregistration is by handler identity - `off` only
//! removes the handler whose `Rc` it is given, so a closure registered
//! without keeping the `Rc` around cannot be deregistered.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;
use indextree::NodeId;

use crate::arena::Document;

/// An event callback. Cloning the `Rc` preserves identity for [`Events::off`].
pub type Handler = Rc<dyn Fn(&mut Event)>;

/// A dispatched event, handed mutably to each handler along the bubble path.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event name, e.g. `"click"`.
    pub name: CompactString,
    /// The node the event was dispatched on.
    pub target: NodeId,
    /// The node whose handlers are currently running.
    pub current_target: NodeId,
    /// Whether the event travels up the ancestor chain.
    pub bubbles: bool,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    fn new(name: &str, target: NodeId) -> Self {
        Event {
            name: CompactString::new(name),
            target,
            current_target: target,
            bubbles: true,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Stop the event from reaching handlers further up the bubble path.
    /// Remaining handlers on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handler registry: `on`, `off`, and bubbling `dispatch`.
#[derive(Default, Clone)]
pub struct Events {
    handlers: HashMap<(NodeId, CompactString), Vec<Handler>>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event` on `node`. The same handler may be
    /// registered several times and will run once per registration.
    pub fn on(&mut self, node: NodeId, event: &str, handler: Handler) {
        self.handlers
            .entry((node, CompactString::new(event)))
            .or_default()
            .push(handler);
    }

    /// Deregister one occurrence of `handler` for `event` on `node`.
    ///
    /// Succeeds only if `handler` is reference-equal (same `Rc`) to a
    /// registered one; returns whether anything was removed.
    pub fn off(&mut self, node: NodeId, event: &str, handler: &Handler) -> bool {
        let Some(list) = self.handlers.get_mut(&(node, CompactString::new(event))) else {
            return false;
        };
        match list.iter().position(|h| Rc::ptr_eq(h, handler)) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of handlers registered for `event` on `node`.
    pub fn handler_count(&self, node: NodeId, event: &str) -> usize {
        self.handlers
            .get(&(node, CompactString::new(event)))
            .map_or(0, Vec::len)
    }

    /// Dispatch `event` on `target`, bubbling up the ancestor chain of `doc`.
    ///
    /// Handlers run in registration order on the target first, then on each
    /// ancestor, until the root or [`Event::stop_propagation`]. Returns the
    /// event so callers can inspect `is_default_prevented`.
    pub fn dispatch(&self, doc: &Document, target: NodeId, event: &str) -> Event {
        let mut ev = Event::new(event, target);
        for node in target.ancestors(&doc.arena) {
            ev.current_target = node;
            if let Some(list) = self.handlers.get(&(node, ev.name.clone())) {
                for handler in list {
                    handler(&mut ev);
                }
            }
            if ev.propagation_stopped || !ev.bubbles {
                break;
            }
        }
        ev
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("keys", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handler() -> (Handler, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let handler: Handler = Rc::new(move |_ev| seen.set(seen.get() + 1));
        (handler, count)
    }

    #[test]
    fn test_on_dispatch_off() {
        let doc = Document::html5();
        let body = doc.body().unwrap();
        let mut events = Events::new();
        let (handler, count) = counting_handler();

        events.on(body, "click", handler.clone());
        events.dispatch(&doc, body, "click");
        events.dispatch(&doc, body, "click");
        assert_eq!(count.get(), 2);

        assert!(events.off(body, "click", &handler));
        events.dispatch(&doc, body, "click");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_off_requires_same_rc() {
        let doc = Document::html5();
        let body = doc.body().unwrap();
        let mut events = Events::new();
        let (handler, count) = counting_handler();
        let (other, _) = counting_handler();

        events.on(body, "click", handler);
        // a different closure, even an identical-looking one, removes nothing
        assert!(!events.off(body, "click", &other));
        events.dispatch(&doc, body, "click");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let doc = Document::html5();
        let body = doc.body().unwrap();
        let mut events = Events::new();
        let (on_root, root_count) = counting_handler();

        events.on(doc.root, "click", on_root);
        let ev = events.dispatch(&doc, body, "click");
        assert_eq!(root_count.get(), 1);
        assert_eq!(ev.target, body);
    }

    #[test]
    fn test_stop_propagation() {
        let doc = Document::html5();
        let body = doc.body().unwrap();
        let mut events = Events::new();

        let stopper: Handler = Rc::new(|ev| ev.stop_propagation());
        let (on_root, root_count) = counting_handler();
        events.on(body, "click", stopper);
        events.on(doc.root, "click", on_root);

        let ev = events.dispatch(&doc, body, "click");
        assert!(ev.is_propagation_stopped());
        assert_eq!(root_count.get(), 0);
    }

    #[test]
    fn test_handlers_only_fire_for_their_event() {
        let doc = Document::html5();
        let body = doc.body().unwrap();
        let mut events = Events::new();
        let (handler, count) = counting_handler();

        events.on(body, "click", handler);
        events.dispatch(&doc, body, "keydown");
        assert_eq!(count.get(), 0);
        assert_eq!(events.handler_count(body, "click"), 1);
    }
}
