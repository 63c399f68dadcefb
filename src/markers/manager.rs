//! Dual-layer marker reconciliation.
//!
//! The manager owns every live `MarkerHandle` and is the only component
//! allowed to create or destroy them. A reconcile pass is a full rebuild:
//! destroy everything, recreate from the latest listing sequences. Marker
//! counts are small, and a full rebuild removes the entire class of
//! stale-handle bugs incremental diffing invites.

use crate::core::geo::LatLng;
use crate::core::listing::{Listing, ListingId};
use crate::map::Projector;
use crate::markers::overlay::PriceOverlayRenderer;
use crate::markers::{Layer, MarkerHandle};
use crate::prelude::HashSet;
use crate::Result;

/// Identity of a reconcile pass. Rapid successive state changes coalesce:
/// a pass whose signature matches the previous one does no work.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReconcileSignature {
    context: Vec<ListingId>,
    result: Vec<ListingId>,
    show_context: bool,
}

impl ReconcileSignature {
    fn of(all: &[Listing], filtered: &[Listing], show_context: bool) -> Self {
        Self {
            context: all.iter().map(|l| l.id.clone()).collect(),
            result: filtered.iter().map(|l| l.id.clone()).collect(),
            show_context,
        }
    }
}

/// What a reconcile pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    /// Whether any work was performed. `false` means the signature matched
    /// the previous pass and no overlay was touched.
    pub changed: bool,
    pub created: usize,
    pub destroyed: usize,
    /// Listings excluded for missing/invalid coordinates
    pub skipped_unmappable: usize,
}

/// Diffs the context/result listing sequences into live marker handles
#[derive(Default)]
pub struct DualLayerMarkerManager {
    handles: Vec<MarkerHandle>,
    last_signature: Option<ReconcileSignature>,
}

impl DualLayerMarkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds both marker layers from the latest sequences.
    ///
    /// The result layer gets one marker per unique markable listing in
    /// `filtered`. The context layer, when toggled on, gets one per unique
    /// markable listing in `all` — including listings already present in the
    /// result layer; the duplication keeps the full context picture visible
    /// underneath the highlighted subset.
    pub fn reconcile(
        &mut self,
        all: &[Listing],
        filtered: &[Listing],
        show_context: bool,
        renderer: &mut PriceOverlayRenderer,
    ) -> Result<ReconcileOutcome> {
        let signature = ReconcileSignature::of(all, filtered, show_context);
        if self.last_signature.as_ref() == Some(&signature) {
            log::debug!("reconcile skipped, signature unchanged");
            return Ok(ReconcileOutcome::default());
        }
        // Invalidate up front: if this pass errors out partway, the registry
        // holds a partial marker set and no signature may claim otherwise.
        self.last_signature = None;

        let destroyed = self.handles.len();
        for handle in self.handles.drain(..) {
            renderer.destroy(handle);
        }

        let mut outcome = ReconcileOutcome {
            changed: true,
            destroyed,
            ..ReconcileOutcome::default()
        };

        self.build_layer(filtered, Layer::Result, renderer, &mut outcome)?;
        if show_context {
            self.build_layer(all, Layer::Context, renderer, &mut outcome)?;
        }

        if outcome.skipped_unmappable > 0 {
            log::warn!(
                "{} listing(s) excluded from the map for missing or invalid coordinates",
                outcome.skipped_unmappable
            );
        }
        log::debug!(
            "reconcile created {} marker(s), destroyed {}",
            outcome.created,
            outcome.destroyed
        );

        self.last_signature = Some(signature);
        Ok(outcome)
    }

    fn build_layer(
        &mut self,
        listings: &[Listing],
        layer: Layer,
        renderer: &mut PriceOverlayRenderer,
        outcome: &mut ReconcileOutcome,
    ) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::default();
        for listing in listings {
            if !seen.insert(listing.id.as_str()) {
                continue;
            }
            let Some(position) = listing.markable_position() else {
                outcome.skipped_unmappable += 1;
                continue;
            };
            let handle = renderer.create(listing, position, layer, layer.color())?;
            self.handles.push(handle);
            outcome.created += 1;
        }
        Ok(())
    }

    /// Re-projects every live marker. Called on each map redraw tick.
    pub fn reposition_all(
        &self,
        renderer: &mut PriceOverlayRenderer,
        projector: &dyn Projector,
    ) -> Result<()> {
        for handle in &self.handles {
            renderer.reposition(handle, projector)?;
        }
        Ok(())
    }

    /// Destroys every handle without recording a new signature
    pub fn clear(&mut self, renderer: &mut PriceOverlayRenderer) {
        for handle in self.handles.drain(..) {
            renderer.destroy(handle);
        }
        self.last_signature = None;
    }

    pub fn handles(&self) -> &[MarkerHandle] {
        &self.handles
    }

    /// Finds the handle for a listing, preferring the result layer (the one
    /// the user sees on top).
    pub fn find(&self, listing_id: &str) -> Option<&MarkerHandle> {
        self.handles
            .iter()
            .filter(|h| h.listing_id == listing_id)
            .max_by_key(|h| h.layer.z_index())
    }

    pub fn find_mut(&mut self, listing_id: &str, layer: Layer) -> Option<&mut MarkerHandle> {
        self.handles
            .iter_mut()
            .find(|h| h.listing_id == listing_id && h.layer == layer)
    }

    /// Unique coordinates of the currently visible markers. A listing
    /// present in both layers counts once.
    pub fn visible_positions(&self) -> Vec<LatLng> {
        let mut seen: HashSet<&str> = HashSet::default();
        self.handles
            .iter()
            .filter(|h| seen.insert(h.listing_id.as_str()))
            .map(|h| h.position)
            .collect()
    }
}
