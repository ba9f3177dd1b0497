// crates/gastromap-core/src/viewport.rs

//! Spherical Mercator math needed to fit the map to a bounding box.
//!
//! The numbers follow Leaflet's `EPSG:3857` CRS so that a viewport computed
//! here lands on the same center and zoom the browser would pick.

use crate::bounds::Bounds;
use crate::model::LatLng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_LATITUDE: f64 = 85.051_128_779_8;
const TILE_SIZE: f64 = 256.0;

/// Map container size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        PixelSize { width, height }
    }
}

/// Projected pixel coordinates at some zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

fn scale(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

pub fn project(p: LatLng, zoom: f64) -> Point {
    let d = PI / 180.0;
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * d).sin();
    let x = EARTH_RADIUS * p.lng * d;
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    let k = 0.5 / (PI * EARTH_RADIUS);
    let s = scale(zoom);
    Point {
        x: s * (k * x + 0.5),
        y: s * (-k * y + 0.5),
    }
}

pub fn unproject(p: Point, zoom: f64) -> LatLng {
    let d = 180.0 / PI;
    let k = 0.5 / (PI * EARTH_RADIUS);
    let s = scale(zoom);
    let x = (p.x / s - 0.5) / k;
    let y = (p.y / s - 0.5) / -k;
    LatLng::new(
        (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0) * d,
        x * d / EARTH_RADIUS,
    )
}

/// Zoom constraints of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    /// Zoom levels are multiples of this step (Leaflet `zoomSnap`); `0` disables snapping.
    pub snap: f64,
}

/// A map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Viewport { center, zoom }
    }

    /// The view that shows all of `bounds` in a map of `size`.
    ///
    /// The zoom is the largest snapped level at which the projected bounds
    /// still fit, clamped to `range`.
    pub fn fit_bounds(bounds: &Bounds, size: PixelSize, range: ZoomRange) -> Viewport {
        let sw = project(bounds.south_west, 0.0);
        let ne = project(bounds.north_east, 0.0);
        let span_x = (ne.x - sw.x).abs();
        let span_y = (sw.y - ne.y).abs();

        let scale = (size.width / span_x).min(size.height / span_y);
        let mut zoom = scale.log2();
        if range.snap > 0.0 && zoom.is_finite() {
            zoom = (zoom / range.snap).floor() * range.snap;
        }
        let zoom = if zoom.is_nan() {
            range.max
        } else {
            zoom.clamp(range.min, range.max)
        };

        let mut view = Viewport::centered_on(bounds, zoom);
        // An exact fit can miss the edges by rounding; back off one level.
        if range.snap > 0.0
            && view.zoom - range.snap >= range.min
            && !view.visible_bounds(size).contains(bounds)
        {
            view = Viewport::centered_on(bounds, view.zoom - range.snap);
        }
        view
    }

    fn centered_on(bounds: &Bounds, zoom: f64) -> Viewport {
        let sw = project(bounds.south_west, zoom);
        let ne = project(bounds.north_east, zoom);
        let center = unproject(
            Point {
                x: (sw.x + ne.x) / 2.0,
                y: (sw.y + ne.y) / 2.0,
            },
            zoom,
        );
        Viewport { center, zoom }
    }

    /// Geographic extent visible in a map of `size` showing this view.
    pub fn visible_bounds(&self, size: PixelSize) -> Bounds {
        let c = project(self.center, self.zoom);
        let top_left = Point {
            x: c.x - size.width / 2.0,
            y: c.y - size.height / 2.0,
        };
        let bottom_right = Point {
            x: c.x + size.width / 2.0,
            y: c.y + size.height / 2.0,
        };
        Bounds::new(
            unproject(top_left, self.zoom),
            unproject(bottom_right, self.zoom),
        )
    }
}
