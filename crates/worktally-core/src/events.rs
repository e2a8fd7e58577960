//! Recalculation triggers.
//!
//! The host owns an [`EventHub`] and forwards UI notifications into it. A
//! [`Subscription`] registers the recalculation handler on the hub and keeps
//! it registered until disposed or dropped, which the host does when the page
//! goes away.
//!
//! Everything here is single-threaded: handlers run synchronously inside
//! [`EventHub::emit`], one after another, each to completion.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::aggregate::{PassReport, recalculate_all};
use crate::document::{Document, NodeId};
use crate::markers::CompiledMarkers;

/// UI notifications the hub delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The user changed the value of `target`.
    Input { target: NodeId },
    /// A partial page update finished.
    AfterRequest { successful: bool },
    /// The initial document is ready.
    DocumentReady,
    /// Content inserted by a partial update has settled into the document.
    AfterSettle,
}

/// Whether `event` calls for a recalculation pass.
pub fn triggers_recalculation(event: &Event, doc: &Document, markers: &CompiledMarkers) -> bool {
    match event {
        Event::Input { target } => markers.is_tracked_input(doc, *target),
        Event::AfterRequest { successful } => *successful,
        Event::DocumentReady | Event::AfterSettle => true,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(&mut Document, &Event)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// Host-owned dispatcher of UI events to listeners.
#[derive(Clone, Default)]
pub struct EventHub {
    registry: Rc<RefCell<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Document, &Event) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(listener_id, _)| *listener_id != id);
        registry.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Deliver `event` to every listener registered when the call starts.
    pub fn emit(&self, doc: &mut Document, event: &Event) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            // A listener that emits into the hub does not receive its own event.
            match listener.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(doc, event),
                Err(_) => trace!(?event, "skipping re-entrant delivery"),
            }
        }
    }

    fn downgrade(&self) -> Weak<RefCell<Registry>> {
        Rc::downgrade(&self.registry)
    }
}

#[derive(Default)]
struct PassLog {
    passes: usize,
    last: Option<PassReport>,
}

/// The standing recalculation handler of one page session.
pub struct Subscription {
    hub: Weak<RefCell<Registry>>,
    listener: Option<ListenerId>,
    log: Rc<RefCell<PassLog>>,
}

impl Subscription {
    /// Register the recalculation handler on `hub`.
    pub fn bind(hub: &EventHub, markers: Rc<CompiledMarkers>) -> Subscription {
        let log = Rc::new(RefCell::new(PassLog::default()));
        let handler_log = Rc::clone(&log);

        let listener = hub.listen(move |doc, event| {
            if !triggers_recalculation(event, doc, &markers) {
                trace!(?event, "event does not affect totals");
                return;
            }
            debug!(?event, "recalculating totals");
            let report = recalculate_all(doc, &markers);
            let mut log = handler_log.borrow_mut();
            log.passes += 1;
            log.last = Some(report);
        });

        Subscription {
            hub: hub.downgrade(),
            listener: Some(listener),
            log,
        }
    }

    /// Whether the handler is still registered on a live hub.
    pub fn is_active(&self) -> bool {
        self.listener.is_some() && self.hub.strong_count() > 0
    }

    /// Number of passes the handler has run.
    pub fn passes(&self) -> usize {
        self.log.borrow().passes
    }

    /// Report of the most recent pass.
    pub fn last_report(&self) -> Option<PassReport> {
        self.log.borrow().last.clone()
    }

    /// Unregister the handler.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        if let Some(registry) = self.hub.upgrade() {
            EventHub { registry }.unlisten(id);
            debug!("recalculation subscription disposed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
