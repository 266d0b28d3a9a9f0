//! Tap-position resolution against a panned/zoomed floor-plan image.

use serde::{Deserialize, Serialize};

/// Intrinsic pixel dimensions of a floor-plan image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// The pan/zoom state of the displayed image at tap-release. Screen
/// coordinates relate to image pixels as `screen = image * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

/// A position on a map image as percentages of its intrinsic size,
/// each axis in `[0.0, 100.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPosition {
    pub x: f64,
    pub y: f64,
}

/// Maps an on-screen tap to a percent position on the image.
///
/// Pure: the caller samples the transform at tap-release, so pan/zoom
/// changes mid-gesture cannot skew the result. Taps landing outside the
/// image extent yield `None` and no point is proposed.
pub fn resolve_tap(
    tap_x: f64,
    tap_y: f64,
    transform: &ViewTransform,
    image: &ImageSize,
) -> Option<MapPosition> {
    if transform.scale <= 0.0 || image.width <= 0.0 || image.height <= 0.0 {
        return None;
    }

    let image_x = (tap_x - transform.offset_x) / transform.scale;
    let image_y = (tap_y - transform.offset_y) / transform.scale;

    if !(0.0..=image.width).contains(&image_x) || !(0.0..=image.height).contains(&image_y) {
        return None;
    }

    Some(MapPosition {
        x: image_x / image.width * 100.0,
        y: image_y / image.height * 100.0,
    })
}
