//! Viewport fit-to-markers with sane zoom bounds.

use crate::core::config::MapEngineOptions;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::map::MapSurface;

/// The viewport adjustment a fit pass decided on
#[derive(Debug, Clone, PartialEq)]
pub enum FitAction {
    /// No visible markers, leave the viewport unchanged
    None,
    /// Exactly one marker with a caller-specified zoom: center on it at that
    /// zoom. Auto-fitting a single point is degenerate and over-zooms.
    Center { center: LatLng, zoom: f64 },
    /// Fit the minimal bounds covering all visible markers, clamping the
    /// resulting zoom to `max_zoom` when set.
    Fit {
        bounds: LatLngBounds,
        max_zoom: Option<f64>,
    },
}

/// Frames the visible marker set after a successful reconcile
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsFitController {
    fixed_single_zoom: Option<f64>,
    max_fit_zoom: f64,
    disable_auto_zoom: bool,
}

impl BoundsFitController {
    pub fn new(fixed_single_zoom: Option<f64>, max_fit_zoom: f64, disable_auto_zoom: bool) -> Self {
        Self {
            fixed_single_zoom,
            max_fit_zoom,
            disable_auto_zoom,
        }
    }

    pub fn from_options(options: &MapEngineOptions) -> Self {
        Self::new(
            options.fixed_single_zoom,
            options.max_fit_zoom,
            options.disable_auto_zoom,
        )
    }

    /// Decides how to frame the given marker coordinates
    pub fn plan(&self, positions: &[LatLng]) -> FitAction {
        match (positions, self.fixed_single_zoom) {
            ([], _) => FitAction::None,
            ([single], Some(zoom)) => FitAction::Center {
                center: *single,
                zoom,
            },
            _ => {
                let bounds = LatLngBounds::covering(positions)
                    .unwrap_or_else(|| LatLngBounds::from_point(positions[0]));
                FitAction::Fit {
                    bounds,
                    max_zoom: (!self.disable_auto_zoom).then_some(self.max_fit_zoom),
                }
            }
        }
    }

    /// Applies a planned action to the map
    pub fn apply(&self, action: &FitAction, map: &mut dyn MapSurface) {
        match action {
            FitAction::None => {}
            FitAction::Center { center, zoom } => map.set_view(*center, *zoom),
            FitAction::Fit { bounds, max_zoom } => map.fit_bounds(bounds, *max_zoom),
        }
    }
}
