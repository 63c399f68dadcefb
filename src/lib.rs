//! # pricepin
//!
//! A geospatial listing marker engine: renders rental listings as
//! interactive, price-labeled pins over a host-provided map, keeps two
//! independently-sourced marker populations (a full "context" layer and a
//! filtered "result" layer) synchronized with live data, and manages the
//! detail card opened by pin clicks.
//!
//! The map widget itself and the listing data layer are external
//! collaborators, consumed through the [`map::MapSurface`],
//! [`markers::overlay::OverlayPlane`] and [`interaction::ListingResolver`]
//! seams so the projection and reconciliation logic can be driven by any
//! SDK and unit-tested against fakes.

pub mod core;
pub mod engine;
pub mod events;
pub mod fit;
pub mod interaction;
pub mod map;
pub mod markers;
pub mod prelude;
pub mod ui;

// Re-export public API
pub use crate::core::{
    bounds::ScreenRect,
    config::{CardLayout, MapEngineOptions, RegionPreset},
    geo::{LatLng, LatLngBounds, Point},
    listing::{Listing, ListingDetail, ListingId},
    viewport::Viewport,
};

pub use crate::engine::ListingMapEngine;
pub use crate::events::{EngineEvent, EventManager};
pub use crate::fit::{BoundsFitController, FitAction};
pub use crate::interaction::{ListingResolver, PinInteractionController};
pub use crate::map::{EmbeddedMap, MapLifecycleController, MapStatus, MapSurface, Projector};
pub use crate::markers::{
    manager::{DualLayerMarkerManager, ReconcileOutcome},
    overlay::{format_price, MarkerColor, MarkerSpec, OverlayPlacement, OverlayPlane,
        PriceOverlayRenderer},
    Layer, MarkerHandle, OverlayId,
};
pub use crate::ui::card::{CardContent, CardPlacement, CardPosition, CardState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MarkerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("mapping SDK unavailable: {0}")]
    SdkUnavailable(String),

    #[error("detail fetch failed for listing {listing_id}: {reason}")]
    DetailFetch { listing_id: String, reason: String },

    #[error("overlay error: {0}")]
    Overlay(String),

    #[error("unknown listing: {0}")]
    UnknownListing(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MarkerError;
