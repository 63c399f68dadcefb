//! Per-marker visual lifecycle.
//!
//! The engine never touches a rendering surface directly. `OverlayPlane` is
//! the seam the host implements (a DOM overlay pane, an egui painter, a test
//! recorder); `PriceOverlayRenderer` owns what gets drawn and where.

use crate::core::bounds::ScreenRect;
use crate::core::listing::Listing;
use crate::map::Projector;
use crate::markers::{Layer, MarkerHandle, OverlayId};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Scale applied to a hovered pin. The transform is centered on the pin's
/// own anchor so hovering never shifts it.
pub const HOVER_SCALE: f64 = 1.1;

/// Channel multiplier for the hover darkening
const HOVER_DARKEN: f64 = 0.8;

/// Pin fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl MarkerColor {
    /// Muted background pin for the context layer
    pub const CONTEXT: MarkerColor = MarkerColor::new(0x9c, 0xa3, 0xaf);
    /// Highlighted pin for the result layer
    pub const RESULT: MarkerColor = MarkerColor::new(0xe1, 0x1d, 0x48);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns this color darkened by the given channel multiplier
    pub fn darkened(self, factor: f64) -> MarkerColor {
        let scale = |channel: u8| (f64::from(channel) * factor).round().clamp(0.0, 255.0) as u8;
        MarkerColor::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Formats a nightly rate as a fixed two-decimal currency label.
///
/// Rounds half-up at cent precision via a mill-precision integer, so
/// `199.995` renders as `$200.00` even though its nearest f64 sits just
/// below the half-cent. A missing price renders as `$0.00`.
pub fn format_price(price: Option<f64>) -> String {
    let value = price.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0);
    let mills = (value * 1000.0).round() as i64;
    let cents = (mills + 5) / 10;
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Everything the plane needs to build one pin element
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub listing_id: String,
    pub label: String,
    pub color: MarkerColor,
    pub z_index: i32,
}

/// Where and how large a pin element currently is. `center` is the pin's
/// anchor in container-relative pixels; `scale` is applied around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    pub center: crate::core::geo::Point,
    pub scale: f64,
}

/// The rendering surface seam. Implementations attach custom-content pin
/// elements, move them, restyle them and report their on-screen rectangles.
pub trait OverlayPlane {
    fn attach(&mut self, spec: &MarkerSpec) -> Result<OverlayId>;
    fn set_placement(&mut self, id: OverlayId, placement: &OverlayPlacement) -> Result<()>;
    fn set_style(&mut self, id: OverlayId, color: MarkerColor, scale: f64) -> Result<()>;
    fn detach(&mut self, id: OverlayId);
    /// Current bounding rectangle of the element, if it has been placed
    fn bounding_rect(&self, id: OverlayId) -> Option<ScreenRect>;
}

/// Owns the visual lifecycle of price pins on a single overlay plane
pub struct PriceOverlayRenderer {
    plane: Box<dyn OverlayPlane>,
}

impl PriceOverlayRenderer {
    pub fn new(plane: Box<dyn OverlayPlane>) -> Self {
        Self { plane }
    }

    /// Builds a clickable price pin for the listing and attaches it to the
    /// overlay plane. The caller supplies a markable position; unmappable
    /// listings never reach this point.
    pub fn create(
        &mut self,
        listing: &Listing,
        position: crate::core::geo::LatLng,
        layer: Layer,
        color: MarkerColor,
    ) -> Result<MarkerHandle> {
        let spec = MarkerSpec {
            listing_id: listing.id.clone(),
            label: format_price(listing.price_starting),
            color,
            z_index: layer.z_index(),
        };
        let overlay = self.plane.attach(&spec)?;
        Ok(MarkerHandle {
            listing_id: listing.id.clone(),
            layer,
            overlay,
            position,
            color,
            hovered: false,
        })
    }

    /// Re-projects the pin and updates its placement. A no-op while the
    /// projection is not ready; the element stays at its last position and
    /// the next redraw tries again.
    pub fn reposition(&mut self, handle: &MarkerHandle, projector: &dyn Projector) -> Result<bool> {
        let Some(center) = projector.screen_position(&handle.position) else {
            return Ok(false);
        };
        let scale = if handle.hovered { HOVER_SCALE } else { 1.0 };
        self.plane
            .set_placement(handle.overlay, &OverlayPlacement { center, scale })?;
        Ok(true)
    }

    /// Applies or clears the hover treatment: darkened color, slight scale,
    /// anchor unchanged.
    pub fn set_hovered(&mut self, handle: &mut MarkerHandle, hovered: bool) -> Result<()> {
        handle.hovered = hovered;
        let (color, scale) = if hovered {
            (handle.color.darkened(HOVER_DARKEN), HOVER_SCALE)
        } else {
            (handle.color, 1.0)
        };
        self.plane.set_style(handle.overlay, color, scale)
    }

    /// Detaches the visual element and releases the handle
    pub fn destroy(&mut self, handle: MarkerHandle) {
        self.plane.detach(handle.overlay);
    }

    /// Current on-screen rectangle of the pin, used for card anchoring
    pub fn marker_rect(&self, handle: &MarkerHandle) -> Option<ScreenRect> {
        self.plane.bounding_rect(handle.overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(Some(7.0)), "$7.00");
        assert_eq!(format_price(Some(123.0)), "$123.00");
        assert_eq!(format_price(Some(123.456)), "$123.46");
        assert_eq!(format_price(None), "$0.00");
    }

    #[test]
    fn test_price_rounding_half_up() {
        assert_eq!(format_price(Some(199.995)), "$200.00");
        assert_eq!(format_price(Some(1.005)), "$1.01");
        assert_eq!(format_price(Some(0.004)), "$0.00");
    }

    #[test]
    fn test_price_degenerate_inputs() {
        assert_eq!(format_price(Some(f64::NAN)), "$0.00");
        assert_eq!(format_price(Some(-5.0)), "$0.00");
    }

    #[test]
    fn test_color_darkened() {
        let color = MarkerColor::new(100, 200, 0);
        let darker = color.darkened(0.5);
        assert_eq!(darker, MarkerColor::new(50, 100, 0));
    }
}
