use crate::core::geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Pixel origin for coordinate transformations (to avoid precision issues)
    pixel_origin: Option<Point>,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
            pixel_origin: None,
        }
    }

    /// Sets the center of the viewport, clamped to world bounds
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        );
        self.update_pixel_origin();
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.update_pixel_origin();
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
        self.update_pixel_origin();
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Whether the viewport can project coordinates yet. A zero-sized
    /// viewport has no meaningful screen space.
    pub fn is_ready(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// using the standard Web Mercator projection (EPSG:3857).
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;

        let world = 2.0 * PI * EARTH_RADIUS;
        let pixel_x = (x + PI * EARTH_RADIUS) / world * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / world * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let world = 2.0 * PI * EARTH_RADIUS;
        let x = (pixel.x / scale) * world - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * world;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    fn pixel_origin(&self) -> Point {
        self.pixel_origin
            .unwrap_or_else(|| self.project(&self.center, None).floor())
    }

    fn update_pixel_origin(&mut self) {
        self.pixel_origin = Some(self.project(&self.center, None).floor());
    }

    /// Converts a geographical coordinate to container-relative pixel
    /// coordinates. Positions are only valid for the current center/zoom/size
    /// and must be recomputed on every redraw.
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let layer_point = self.project(lat_lng, None).subtract(&self.pixel_origin());
        Point::new(
            layer_point.x + self.size.x / 2.0,
            layer_point.y + self.size.y / 2.0,
        )
    }

    /// Converts container-relative pixel coordinates back to a coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let layer_point = Point::new(pixel.x - self.size.x / 2.0, pixel.y - self.size.y / 2.0);
        self.unproject(&layer_point.add(&self.pixel_origin()), None)
    }

    /// Fits the viewport to contain the given bounds, picking the highest
    /// integer zoom at which the bounds still fit inside the padded frame.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) {
        let padding = padding.unwrap_or(20.0);
        self.center = bounds.center();

        let frame = Point::new(self.size.x - 2.0 * padding, self.size.y - 2.0 * padding);
        let mut best_zoom = self.min_zoom;

        for test_zoom in (self.min_zoom as i32)..=(self.max_zoom as i32) {
            let zoom = f64::from(test_zoom);
            let nw = self.project(
                &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
                Some(zoom),
            );
            let se = self.project(
                &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
                Some(zoom),
            );

            if (se.x - nw.x).abs() <= frame.x && (se.y - nw.y).abs() <= frame.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        self.set_zoom(best_zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
