//! Engine configuration supplied by the host page.

use crate::core::geo::LatLng;
use crate::prelude::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default maximum zoom applied after a bounds fit, so tightly clustered
/// pins do not land the user at street level.
pub const DEFAULT_MAX_FIT_ZOOM: f64 = 15.0;

/// Zoom used when centering on a single listing
pub const DEFAULT_SINGLE_LISTING_ZOOM: f64 = 14.0;

/// Nominal on-screen size of a price pin, used when a marker rect has to be
/// derived from a projected point (e.g. `zoom_to_listing`).
pub const MARKER_WIDTH: f64 = 64.0;
pub const MARKER_HEIGHT: f64 = 28.0;

/// Known center/zoom preset for a region (borough granularity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPreset {
    pub center: LatLng,
    pub zoom: f64,
}

impl RegionPreset {
    pub fn new(lat: f64, lng: f64, zoom: f64) -> Self {
        Self {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }
}

static DEFAULT_REGION_PRESETS: Lazy<HashMap<String, RegionPreset>> = Lazy::new(|| {
    let mut presets = HashMap::default();
    presets.insert(
        "manhattan".to_string(),
        RegionPreset::new(40.7831, -73.9712, 12.0),
    );
    presets.insert(
        "brooklyn".to_string(),
        RegionPreset::new(40.6782, -73.9442, 12.0),
    );
    presets.insert(
        "queens".to_string(),
        RegionPreset::new(40.7282, -73.7949, 12.0),
    );
    presets.insert(
        "bronx".to_string(),
        RegionPreset::new(40.8448, -73.8648, 12.0),
    );
    presets.insert(
        "staten-island".to_string(),
        RegionPreset::new(40.5795, -74.1502, 12.0),
    );
    presets
});

/// Returns the built-in borough-granularity presets
pub fn default_region_presets() -> &'static HashMap<String, RegionPreset> {
    &DEFAULT_REGION_PRESETS
}

/// Geometry of the detail card opened on pin click
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    pub width: f64,
    pub height: f64,
    /// Minimum distance between the card and the container edges
    pub margin: f64,
    /// Vertical gap between the card and the pin it anchors to
    pub gap: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: 340.0,
            height: 300.0,
            margin: 20.0,
            gap: 12.0,
        }
    }
}

/// Host-supplied engine options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEngineOptions {
    /// Fixed zoom used when exactly one marker is visible. `None` lets the
    /// bounds fit decide.
    pub fixed_single_zoom: Option<f64>,
    /// Disables the post-fit zoom clamp
    pub disable_auto_zoom: bool,
    /// Zoom ceiling applied after a bounds fit
    pub max_fit_zoom: f64,
    /// Initial state of the context-layer toggle
    pub show_context_layer: bool,
    pub card: CardLayout,
    /// Extra/overriding region presets merged over the built-in table
    #[serde(default)]
    pub region_presets: std::collections::HashMap<String, RegionPreset>,
}

impl Default for MapEngineOptions {
    fn default() -> Self {
        Self {
            fixed_single_zoom: Some(DEFAULT_SINGLE_LISTING_ZOOM),
            disable_auto_zoom: false,
            max_fit_zoom: DEFAULT_MAX_FIT_ZOOM,
            show_context_layer: true,
            card: CardLayout::default(),
            region_presets: std::collections::HashMap::new(),
        }
    }
}

impl MapEngineOptions {
    /// Looks up a region preset, preferring host-supplied entries
    pub fn region_preset(&self, key: &str) -> Option<RegionPreset> {
        self.region_presets
            .get(key)
            .or_else(|| default_region_presets().get(key))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets_cover_boroughs() {
        let presets = default_region_presets();
        assert!(presets.contains_key("manhattan"));
        assert!(presets.contains_key("brooklyn"));
        assert_eq!(presets.len(), 5);
    }

    #[test]
    fn test_host_presets_override_builtin() {
        let mut options = MapEngineOptions::default();
        options.region_presets.insert(
            "brooklyn".to_string(),
            RegionPreset::new(40.65, -73.95, 13.0),
        );

        let preset = options.region_preset("brooklyn").unwrap();
        assert_eq!(preset.zoom, 13.0);
        assert!(options.region_preset("manhattan").is_some());
        assert!(options.region_preset("atlantis").is_none());
    }
}
