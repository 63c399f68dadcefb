//! Listing data as supplied by the host page's data layer.
//!
//! The engine never mutates listings; it only decides whether a listing can
//! be placed on the map and what its pin should say. Coordinates arrive in
//! whatever partial shape the upstream store produced, so both the container
//! and each component are optional at the serde boundary.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Stable identity key for a listing. Opaque to the engine.
pub type ListingId = String;

/// Raw coordinate pair as delivered by the data layer. Either component may
/// be missing independently of the other.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCoordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A rental listing row, read-only to this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub coordinates: Option<RawCoordinates>,
    /// Nightly starting rate. Missing prices render as $0.00.
    #[serde(default)]
    pub price_starting: Option<f64>,
    /// Optional grouping key used for viewport recentering.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Listing {
    pub fn new(id: impl Into<ListingId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            coordinates: None,
            price_starting: None,
            region: None,
            images: Vec::new(),
        }
    }

    /// Builder-style helper for tests and embedding hosts
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(RawCoordinates {
            lat: Some(lat),
            lng: Some(lng),
        });
        self
    }

    pub fn priced(mut self, price: f64) -> Self {
        self.price_starting = Some(price);
        self
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Returns the markable position of this listing, or `None` when it must
    /// be excluded from rendering.
    ///
    /// A listing is markable only when both components are present, finite
    /// and non-zero, and the pair is a valid geographic coordinate. Listings
    /// that fail this check are never defaulted to a placeholder position;
    /// a misplaced pin is worse than a missing one.
    pub fn markable_position(&self) -> Option<LatLng> {
        let coords = self.coordinates.as_ref()?;
        let lat = coords.lat.filter(|v| v.is_finite() && *v != 0.0)?;
        let lng = coords.lng.filter(|v| v.is_finite() && *v != 0.0)?;
        let position = LatLng::new(lat, lng);
        position.is_valid().then_some(position)
    }
}

/// Full listing record resolved on pin click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_starting: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl ListingDetail {
    /// Detail record carrying only the summary fields of a listing, shown
    /// while the full record is in flight.
    pub fn from_summary(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            description: String::new(),
            price_starting: listing.price_starting,
            images: listing.images.clone(),
            region: listing.region.clone(),
        }
    }
}
