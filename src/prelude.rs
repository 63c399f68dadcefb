//! Prelude module for common pricepin types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use pricepin::prelude::*;`

pub use crate::core::{
    bounds::ScreenRect,
    config::{CardLayout, MapEngineOptions, RegionPreset},
    geo::{LatLng, LatLngBounds, Point},
    listing::{Listing, ListingDetail, ListingId},
    viewport::Viewport,
};

pub use crate::engine::ListingMapEngine;
pub use crate::events::EngineEvent;
pub use crate::fit::{BoundsFitController, FitAction};
pub use crate::interaction::{ListingResolver, PinInteractionController};
pub use crate::map::{EmbeddedMap, MapLifecycleController, MapStatus, MapSurface, Projector};
pub use crate::markers::{
    manager::{DualLayerMarkerManager, ReconcileOutcome},
    overlay::{MarkerColor, OverlayPlane, PriceOverlayRenderer},
    Layer, MarkerHandle,
};
pub use crate::ui::card::{CardContent, CardPlacement, CardPosition, CardState};

pub use crate::{MarkerError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
