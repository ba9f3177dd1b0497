// crates/gastromap-core/src/bounds.rs

use crate::model::{District, LatLng};
use geo::{BoundingRect, Rect};
use serde::{Deserialize, Serialize};

/// Geographic bounding box, serialized the way Leaflet takes it:
/// `[[south, west], [north, east]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 2]; 2]", into = "[[f64; 2]; 2]")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Bounds {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Converts a planar `geo` rectangle where `x` is longitude and `y` latitude.
    pub fn from_rect(rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Bounds::new(LatLng::new(min.y, min.x), LatLng::new(max.y, max.x))
    }

    pub fn extend(&mut self, other: &Bounds) {
        self.south_west.lat = self.south_west.lat.min(other.south_west.lat);
        self.south_west.lng = self.south_west.lng.min(other.south_west.lng);
        self.north_east.lat = self.north_east.lat.max(other.north_east.lat);
        self.north_east.lng = self.north_east.lng.max(other.north_east.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains_point(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.contains_point(other.south_west) && self.contains_point(other.north_east)
    }

    pub fn is_valid(&self) -> bool {
        [
            self.south_west.lat,
            self.south_west.lng,
            self.north_east.lat,
            self.north_east.lng,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Combined extent of every district, `None` when there is no geometry.
    pub fn of_districts(districts: &[District]) -> Option<Bounds> {
        districts
            .iter()
            .filter_map(|d| d.geometry.bounding_rect())
            .map(Bounds::from_rect)
            .reduce(|mut acc, b| {
                acc.extend(&b);
                acc
            })
    }
}

impl From<[[f64; 2]; 2]> for Bounds {
    fn from([a, b]: [[f64; 2]; 2]) -> Self {
        Bounds::new(a.into(), b.into())
    }
}

impl From<Bounds> for [[f64; 2]; 2] {
    fn from(b: Bounds) -> Self {
        [
            [b.south_west.lat, b.south_west.lng],
            [b.north_east.lat, b.north_east.lng],
        ]
    }
}
