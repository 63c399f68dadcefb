//! Outbound notifications from the engine to the host page.

use crate::core::listing::{Listing, ListingId};

/// Events the engine surfaces to the host
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The map instance finished initializing
    MapReady,
    /// The mapping SDK failed to load. The engine stays usable in a
    /// degraded state; the rest of the page keeps working.
    MapUnavailable { reason: String },
    /// A pin was clicked, in addition to the engine's own card handling
    MarkerClick { listing: Listing },
    /// A reconcile pass produced no markers; the viewport was left alone
    NoResults,
    CardOpened { listing_id: ListingId },
    /// The card was hidden: explicit close, replacement by a newer click,
    /// or a failed detail fetch. Pairs with every `CardOpened`.
    CardClosed,
}

type Listener = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// Callback registry for engine events
#[derive(Default)]
pub struct EventManager {
    listeners: Vec<Listener>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, listener: F)
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &EngineEvent) {
        log::debug!("engine event: {event:?}");
        for listener in &self.listeners {
            listener(event);
        }
    }
}
