//! Page session host.
//!
//! A [`Session`] is what a hosting application holds for one page: the
//! document mirror, the event hub UI notifications are fed into, and the
//! recalculation subscription bound for the page's lifetime.

use std::path::Path;
use std::rc::Rc;

use tracing::debug;
use worktally_core::{
    CompiledMarkers, Document, Event, EventHub, Markers, NodeId, PassReport, Result, Subscription,
    recalculate_all,
};

use crate::config::load_markers;

pub struct Session {
    doc: Document,
    hub: EventHub,
    markers: Rc<CompiledMarkers>,
    subscription: Subscription,
}

impl Session {
    /// Start a session over an empty document.
    pub fn new(markers: CompiledMarkers) -> Self {
        Self::with_document(Document::new(), markers)
    }

    /// Start a session over an existing document.
    pub fn with_document(doc: Document, markers: CompiledMarkers) -> Self {
        let markers = Rc::new(markers);
        let hub = EventHub::new();
        let subscription = Subscription::bind(&hub, Rc::clone(&markers));
        Session {
            doc,
            hub,
            markers,
            subscription,
        }
    }

    /// Start a session with markers from `config` (or the default location).
    pub fn from_config(config: Option<&Path>) -> Result<Self> {
        let markers: Markers = load_markers(config)?;
        Ok(Self::new(markers.compile()?))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for mirroring UI changes (inserting fragments, etc.).
    /// Follow structural changes with [`Session::after_settle`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub fn markers(&self) -> &CompiledMarkers {
        &self.markers
    }

    /// Deliver a UI notification.
    pub fn emit(&mut self, event: Event) {
        self.hub.emit(&mut self.doc, &event);
    }

    /// The user typed `text` into `target`.
    pub fn type_into(&mut self, target: NodeId, text: &str) {
        if self.doc.set_value(target, text) {
            self.emit(Event::Input { target });
        }
    }

    pub fn ready(&mut self) {
        self.emit(Event::DocumentReady);
    }

    pub fn after_request(&mut self, successful: bool) {
        self.emit(Event::AfterRequest { successful });
    }

    pub fn after_settle(&mut self) {
        self.emit(Event::AfterSettle);
    }

    /// Run a pass directly, outside of any event.
    pub fn recalculate(&mut self) -> PassReport {
        recalculate_all(&mut self.doc, &self.markers)
    }

    /// Passes triggered by events so far.
    pub fn passes(&self) -> usize {
        self.subscription.passes()
    }

    pub fn last_report(&self) -> Option<PassReport> {
        self.subscription.last_report()
    }

    /// End the session: dispose the subscription and hand back the document.
    pub fn close(self) -> Document {
        let Session {
            doc,
            subscription,
            ..
        } = self;
        subscription.dispose();
        debug!("session closed");
        doc
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CompiledMarkers::default())
    }
}
