//! Detail-card placement and state.
//!
//! The card is the popup opened when a pin is clicked. Its position is
//! recomputed on every click from the pin's current rectangle and discarded
//! on close; nothing here is persisted.

use crate::core::bounds::ScreenRect;
use crate::core::config::CardLayout;
use crate::core::listing::{Listing, ListingDetail, ListingId};
use serde::{Deserialize, Serialize};

/// Screen-space card position relative to the map container's origin.
/// `x` is the card's horizontal center, `y` its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPosition {
    pub x: f64,
    pub y: f64,
}

/// Which side of the pin the card ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPlacement {
    Above,
    Below,
}

/// Computes where the card goes for a clicked pin.
///
/// The anchor is the pin rectangle's top-center, expressed relative to the
/// map container's own origin. The card prefers sitting above the pin with
/// a fixed gap and flips below when it would poke past the container's top
/// edge; the horizontal center is clamped so the full card width stays
/// inside the container margins.
pub fn place_card(
    marker: &ScreenRect,
    container: &ScreenRect,
    layout: &CardLayout,
) -> (CardPosition, CardPlacement) {
    let anchor_x = marker.center().x - container.min.x;
    let anchor_top = marker.min.y - container.min.y;
    let anchor_bottom = marker.max.y - container.min.y;

    let (y, placement) = if anchor_top - layout.gap - layout.height < layout.margin {
        (anchor_bottom + layout.gap, CardPlacement::Below)
    } else {
        (anchor_top - layout.gap - layout.height, CardPlacement::Above)
    };

    let min_center = layout.margin + layout.width / 2.0;
    let max_center = container.width() - layout.margin - layout.width / 2.0;
    let x = if min_center <= max_center {
        anchor_x.clamp(min_center, max_center)
    } else {
        // Container narrower than card + margins; center it.
        container.width() / 2.0
    };

    (CardPosition { x, y }, placement)
}

/// What the card is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum CardContent {
    /// The clicked listing's summary fields, shown while the full record is
    /// in flight
    Summary(Listing),
    /// The resolved full record
    Detail(ListingDetail),
}

/// An open detail card
#[derive(Debug, Clone, PartialEq)]
pub struct OpenCard {
    pub listing_id: ListingId,
    pub position: CardPosition,
    pub placement: CardPlacement,
    pub content: CardContent,
    /// Click ordinal the card was opened by, used for stale-response checks
    pub(crate) generation: u64,
}

/// Card visibility state. At most one card is ever open.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CardState {
    #[default]
    Hidden,
    Open(OpenCard),
}

impl CardState {
    pub fn is_open(&self) -> bool {
        matches!(self, CardState::Open(_))
    }

    pub fn open_card(&self) -> Option<&OpenCard> {
        match self {
            CardState::Open(card) => Some(card),
            CardState::Hidden => None,
        }
    }

    /// Listing id of the currently open card, if any
    pub fn open_listing_id(&self) -> Option<&str> {
        self.open_card().map(|card| card.listing_id.as_str())
    }
}
