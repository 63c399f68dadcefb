pub mod manager;
pub mod overlay;

use crate::core::geo::LatLng;
use crate::core::listing::ListingId;
use crate::markers::overlay::MarkerColor;

/// Identifier of a live overlay element on the host's overlay plane
pub type OverlayId = u64;

/// Which marker population a handle belongs to. The result layer is always
/// drawn above the context layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// All active listings, shown as visual background
    Context,
    /// Listings matching the current filter
    Result,
}

impl Layer {
    /// Z-order of overlays in this layer
    pub fn z_index(self) -> i32 {
        match self {
            Layer::Context => 0,
            Layer::Result => 1,
        }
    }

    /// Default pin color for this layer
    pub fn color(self) -> MarkerColor {
        match self {
            Layer::Context => MarkerColor::CONTEXT,
            Layer::Result => MarkerColor::RESULT,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Context => write!(f, "context"),
            Layer::Result => write!(f, "result"),
        }
    }
}

/// The engine's record tying a listing to a live overlay element.
///
/// Exactly one handle exists per `(listing_id, layer)` pair at any time; the
/// manager enforces this during reconciliation.
#[derive(Debug, Clone)]
pub struct MarkerHandle {
    pub listing_id: ListingId,
    pub layer: Layer,
    pub overlay: OverlayId,
    pub position: LatLng,
    pub color: MarkerColor,
    pub hovered: bool,
}
