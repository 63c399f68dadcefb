//! The host-facing facade wiring the marker engine together.

use crate::core::bounds::ScreenRect;
use crate::core::config::{MapEngineOptions, MARKER_HEIGHT, MARKER_WIDTH};
use crate::core::listing::{Listing, ListingDetail};
use crate::events::{EngineEvent, EventManager};
use crate::fit::BoundsFitController;
use crate::interaction::{ListingResolver, PinInteractionController};
use crate::map::{MapLifecycleController, MapStatus, MapSurface};
use crate::markers::manager::DualLayerMarkerManager;
use crate::markers::overlay::{OverlayPlane, PriceOverlayRenderer};
use crate::markers::Layer;
use crate::ui::card::CardState;
use crate::{MarkerError, Result};
use std::future::Future;
use std::sync::Arc;

/// Renders rental listings as price-labeled pins over a host-provided map
/// and manages the detail card opened by pin clicks.
///
/// The engine owns the single map handle, the marker registry and the card
/// state; the host feeds it listing sequences and UI events and listens for
/// [`EngineEvent`]s. All collaborators are constructor-injected, so several
/// engines (or fully faked ones in tests) can coexist.
pub struct ListingMapEngine {
    options: MapEngineOptions,
    map: Option<Box<dyn MapSurface>>,
    lifecycle: MapLifecycleController,
    markers: DualLayerMarkerManager,
    renderer: PriceOverlayRenderer,
    interaction: PinInteractionController,
    fit: BoundsFitController,
    events: EventManager,
    resolver: Arc<dyn ListingResolver>,
    all_listings: Vec<Listing>,
    filtered_listings: Vec<Listing>,
    show_context: bool,
}

impl ListingMapEngine {
    pub fn new(
        options: MapEngineOptions,
        plane: Box<dyn OverlayPlane>,
        resolver: Arc<dyn ListingResolver>,
    ) -> Self {
        let fit = BoundsFitController::from_options(&options);
        let interaction = PinInteractionController::new(options.card);
        let show_context = options.show_context_layer;
        Self {
            options,
            map: None,
            lifecycle: MapLifecycleController::new(),
            markers: DualLayerMarkerManager::new(),
            renderer: PriceOverlayRenderer::new(plane),
            interaction,
            fit,
            events: EventManager::new(),
            resolver,
            all_listings: Vec::new(),
            filtered_listings: Vec::new(),
            show_context,
        }
    }

    /// Registers a listener for outbound engine events
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.events.on(listener);
    }

    /// Initializes the map instance by awaiting the SDK loader. Idempotent:
    /// a second call while initialization is pending or complete is a no-op.
    /// A loader failure leaves the engine in a degraded-but-usable state and
    /// surfaces [`EngineEvent::MapUnavailable`]; it never panics or rejects.
    pub async fn init_map<F, Fut>(&mut self, load: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Box<dyn MapSurface>>>,
    {
        if !self.lifecycle.begin_initialization() {
            log::debug!("map initialization already underway, ignoring");
            return;
        }
        match load().await {
            Ok(map) => self.adopt_map(map),
            Err(err) => {
                self.lifecycle.mark_failed();
                log::warn!("mapping SDK failed to load: {err}");
                self.events.emit(&EngineEvent::MapUnavailable {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Adopts an already-constructed map surface. Same idempotence as
    /// [`Self::init_map`]; useful for hosts whose SDK loads synchronously.
    pub fn attach_map(&mut self, map: Box<dyn MapSurface>) {
        if !self.lifecycle.begin_initialization() {
            log::debug!("map already attached, ignoring");
            return;
        }
        self.adopt_map(map);
    }

    fn adopt_map(&mut self, map: Box<dyn MapSurface>) {
        self.map = Some(map);
        self.lifecycle.mark_ready();
        self.events.emit(&EngineEvent::MapReady);
        // Markers may have been reconciled before the map arrived; frame
        // them now and give every pin a first position.
        self.refit();
        if let Err(err) = self.redraw() {
            log::warn!("initial marker placement failed: {err}");
        }
    }

    pub fn map_status(&self) -> MapStatus {
        self.lifecycle.status()
    }

    pub fn map(&self) -> Option<&dyn MapSurface> {
        self.map.as_deref()
    }

    /// Replaces both listing sequences and reconciles the marker layers
    pub fn set_listings(&mut self, all: Vec<Listing>, filtered: Vec<Listing>) -> Result<()> {
        self.all_listings = all;
        self.filtered_listings = filtered;
        self.reconcile_and_fit()
    }

    /// Toggles the context layer and reconciles
    pub fn set_show_context(&mut self, show_context: bool) -> Result<()> {
        self.show_context = show_context;
        self.reconcile_and_fit()
    }

    fn reconcile_and_fit(&mut self) -> Result<()> {
        let outcome = self.markers.reconcile(
            &self.all_listings,
            &self.filtered_listings,
            self.show_context,
            &mut self.renderer,
        )?;
        if !outcome.changed {
            return Ok(());
        }
        if outcome.created > 0 {
            self.refit();
            self.redraw()?;
        } else {
            self.events.emit(&EngineEvent::NoResults);
        }
        Ok(())
    }

    fn refit(&mut self) {
        let positions = self.markers.visible_positions();
        if positions.is_empty() {
            return;
        }
        if let Some(map) = self.map.as_deref_mut() {
            let action = self.fit.plan(&positions);
            self.fit.apply(&action, map);
        }
    }

    /// Re-projects every live marker against the map's current view. The
    /// host calls this on each map redraw tick (pan, zoom, resize).
    pub fn redraw(&mut self) -> Result<()> {
        let Some(map) = self.map.as_deref() else {
            return Ok(());
        };
        self.markers
            .reposition_all(&mut self.renderer, map.projector())
    }

    /// Handles a click on the pin for `listing_id`: notifies the host,
    /// opens the card anchored to the pin's current rectangle and resolves
    /// the full listing record.
    pub async fn marker_click(&self, listing_id: &str) -> Result<()> {
        let listing = self
            .find_listing(listing_id)
            .ok_or_else(|| MarkerError::UnknownListing(listing_id.to_string()))?;
        let map = self
            .map
            .as_deref()
            .ok_or_else(|| MarkerError::SdkUnavailable("map not initialized".to_string()))?;

        let marker_rect = self
            .marker_rect(listing_id, map)
            .ok_or_else(|| MarkerError::SdkUnavailable("projection not ready".to_string()))?;

        self.events.emit(&EngineEvent::MarkerClick {
            listing: listing.clone(),
        });
        // A newer click implicitly closes the previous card; keep the
        // open/close event stream balanced for hosts keying UI off it.
        if self.interaction.card_state().is_open() {
            self.events.emit(&EngineEvent::CardClosed);
        }
        self.events.emit(&EngineEvent::CardOpened {
            listing_id: listing.id.clone(),
        });

        let opened = self
            .interaction
            .open(
                &listing,
                marker_rect,
                map.container_rect(),
                self.resolver.as_ref(),
            )
            .await;
        if opened.is_err() {
            // A current-card fetch failure hides the card.
            self.events.emit(&EngineEvent::CardClosed);
        }
        opened
    }

    /// A click on empty map area closes any open card
    pub fn map_background_click(&self) {
        self.close_card();
    }

    pub fn close_card(&self) {
        if self.interaction.card_state().is_open() {
            self.interaction.close();
            self.events.emit(&EngineEvent::CardClosed);
        }
    }

    pub fn card_state(&self) -> CardState {
        self.interaction.card_state()
    }

    /// Pans/zooms to a specific listing and re-opens its detail card. Lets
    /// the host drive the map from elsewhere, e.g. a results list.
    pub async fn zoom_to_listing(&mut self, listing_id: &str) -> Result<()> {
        let listing = self
            .find_listing(listing_id)
            .ok_or_else(|| MarkerError::UnknownListing(listing_id.to_string()))?;
        let position = listing
            .markable_position()
            .ok_or_else(|| MarkerError::UnknownListing(listing_id.to_string()))?;

        let zoom = self
            .options
            .fixed_single_zoom
            .unwrap_or(crate::core::config::DEFAULT_SINGLE_LISTING_ZOOM);
        {
            let map = self
                .map
                .as_deref_mut()
                .ok_or_else(|| MarkerError::SdkUnavailable("map not initialized".to_string()))?;
            map.set_view(position, zoom);
        }
        self.redraw()?;
        self.marker_click(listing_id).await
    }

    /// Applies or clears the hover treatment on one pin
    pub fn set_marker_hovered(
        &mut self,
        listing_id: &str,
        layer: Layer,
        hovered: bool,
    ) -> Result<()> {
        let Some(handle) = self.markers.find_mut(listing_id, layer) else {
            return Ok(());
        };
        self.renderer.set_hovered(handle, hovered)
    }

    /// Reacts to an external region change by panning to its preset
    pub fn set_region(&mut self, region: &str) {
        let Some(map) = self.map.as_deref_mut() else {
            log::debug!("region change before map ready, ignoring");
            return;
        };
        self.lifecycle.recenter(region, &self.options, map);
    }

    /// Tears down every marker. The map handle itself is dropped with the
    /// engine; no marker outlives its owning map instance.
    pub fn shutdown(&mut self) {
        self.close_card();
        self.markers.clear(&mut self.renderer);
        self.map = None;
    }

    pub fn marker_count(&self) -> usize {
        self.markers.handles().len()
    }

    fn find_listing(&self, listing_id: &str) -> Option<Listing> {
        self.filtered_listings
            .iter()
            .chain(self.all_listings.iter())
            .find(|l| l.id == listing_id)
            .cloned()
    }

    /// Current on-screen rectangle of the pin for a listing, preferring the
    /// plane-reported rect and falling back to a nominal rect around the
    /// projected anchor.
    fn marker_rect(&self, listing_id: &str, map: &dyn MapSurface) -> Option<ScreenRect> {
        if let Some(handle) = self.markers.find(listing_id) {
            if let Some(rect) = self.renderer.marker_rect(handle) {
                return Some(rect);
            }
            let center = map.projector().screen_position(&handle.position)?;
            return Some(ScreenRect::from_center_and_size(
                center,
                MARKER_WIDTH,
                MARKER_HEIGHT,
            ));
        }
        // No live marker (e.g. zoom_to_listing on a context-only listing
        // while the toggle is off); anchor on the projected coordinate.
        let listing = self.find_listing(listing_id)?;
        let center = map
            .projector()
            .screen_position(&listing.markable_position()?)?;
        Some(ScreenRect::from_center_and_size(
            center,
            MARKER_WIDTH,
            MARKER_HEIGHT,
        ))
    }
}

/// Convenience detail used by hosts that resolve listings locally
#[async_trait::async_trait]
impl ListingResolver for std::collections::HashMap<String, ListingDetail> {
    async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail> {
        self.get(listing_id)
            .cloned()
            .ok_or_else(|| MarkerError::UnknownListing(listing_id.to_string()))
    }
}
