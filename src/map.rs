//! The mapping-SDK seam and map lifecycle.
//!
//! The engine consumes the host's interactive map through the small
//! `MapSurface` trait: projection, pan/zoom/center control, container
//! geometry and a readiness flag. `EmbeddedMap` is a self-contained
//! implementation backed by [`Viewport`], useful for tests and headless
//! hosts; real pages adapt their SDK behind the same trait.

use crate::core::bounds::ScreenRect;
use crate::core::config::MapEngineOptions;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::viewport::Viewport;

/// Geo → screen-space conversion for the map's current projection state.
///
/// Returns `None` while the projection is not yet usable (e.g. before the
/// map finished initializing). Positions are invalidated by any pan or zoom
/// and must be requested fresh on every redraw; implementations never cache
/// and have no side effects.
pub trait Projector {
    fn screen_position(&self, position: &LatLng) -> Option<Point>;
}

/// The surface the third-party mapping SDK exposes to this engine
pub trait MapSurface {
    fn is_ready(&self) -> bool;
    /// The map container's rectangle in its own coordinate space
    fn container_rect(&self) -> ScreenRect;
    fn center(&self) -> LatLng;
    fn zoom(&self) -> f64;
    /// Jump to a view. Used for initial placement and `zoom_to_listing`.
    fn set_view(&mut self, center: LatLng, zoom: f64);
    /// Smoothly recenter. Adapters map this to the SDK's animated pan;
    /// `EmbeddedMap` recenters directly.
    fn pan_to(&mut self, center: LatLng, zoom: Option<f64>);
    /// Fit the viewport to the bounds, then clamp zoom to `max_zoom` if given
    fn fit_bounds(&mut self, bounds: &LatLngBounds, max_zoom: Option<f64>);
    fn projector(&self) -> &dyn Projector;
}

/// Viewport-backed map surface with no external SDK
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedMap {
    viewport: Viewport,
}

impl EmbeddedMap {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Viewport::new(center, zoom, size);
        viewport.set_center(center);
        Self { viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }
}

impl Projector for EmbeddedMap {
    fn screen_position(&self, position: &LatLng) -> Option<Point> {
        self.viewport
            .is_ready()
            .then(|| self.viewport.lat_lng_to_pixel(position))
    }
}

impl MapSurface for EmbeddedMap {
    fn is_ready(&self) -> bool {
        self.viewport.is_ready()
    }

    fn container_rect(&self) -> ScreenRect {
        ScreenRect::from_coords(0.0, 0.0, self.viewport.size.x, self.viewport.size.y)
    }

    fn center(&self) -> LatLng {
        self.viewport.center
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
    }

    fn pan_to(&mut self, center: LatLng, zoom: Option<f64>) {
        self.viewport.set_center(center);
        if let Some(zoom) = zoom {
            self.viewport.set_zoom(zoom);
        }
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, max_zoom: Option<f64>) {
        self.viewport.fit_bounds(bounds, None);
        if let Some(max_zoom) = max_zoom {
            if self.viewport.zoom > max_zoom {
                self.viewport.set_zoom(max_zoom);
            }
        }
    }

    fn projector(&self) -> &dyn Projector {
        self
    }
}

/// Lifecycle state of the single map instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStatus {
    Uninitialized,
    Initializing,
    Ready,
    /// The SDK failed to load. Fatal to this subsystem only; the host page
    /// keeps working without the map.
    Failed,
}

/// Owns map-instance creation and region recentering.
///
/// Initialization is idempotent: a second attempt while one is pending or
/// complete is a no-op.
pub struct MapLifecycleController {
    status: MapStatus,
    region: Option<String>,
}

impl MapLifecycleController {
    pub fn new() -> Self {
        Self {
            status: MapStatus::Uninitialized,
            region: None,
        }
    }

    pub fn status(&self) -> MapStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == MapStatus::Ready
    }

    /// Claims the right to initialize. Returns `false` when an attempt is
    /// already pending or complete.
    pub fn begin_initialization(&mut self) -> bool {
        match self.status {
            MapStatus::Uninitialized | MapStatus::Failed => {
                self.status = MapStatus::Initializing;
                true
            }
            MapStatus::Initializing | MapStatus::Ready => false,
        }
    }

    pub fn mark_ready(&mut self) {
        self.status = MapStatus::Ready;
        log::debug!("map instance ready");
    }

    pub fn mark_failed(&mut self) {
        self.status = MapStatus::Failed;
    }

    /// Reacts to an external region change by panning the map to the
    /// region's preset. Returns `true` when the view moved. Unknown regions
    /// and repeats of the current region leave the viewport alone.
    pub fn recenter(
        &mut self,
        region: &str,
        options: &MapEngineOptions,
        map: &mut dyn MapSurface,
    ) -> bool {
        if self.region.as_deref() == Some(region) {
            return false;
        }
        let Some(preset) = options.region_preset(region) else {
            log::warn!("no preset for region {region:?}, ignoring recenter");
            return false;
        };
        self.region = Some(region.to_string());
        map.pan_to(preset.center, Some(preset.zoom));
        log::debug!("recentered map on region {region:?}");
        true
    }
}

impl Default for MapLifecycleController {
    fn default() -> Self {
        Self::new()
    }
}
