// crates/gastromap-core/src/model.rs

//! Typed records for the two datasets shown on the map.

use geo::MultiPolygon;
use serde::{Deserialize, Deserializer, Serialize};

/// A WGS84 position in Leaflet order (`lat`, `lng`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Builds a position from a GeoJSON `[lng, lat]` pair.
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        LatLng { lat, lng }
    }
}

/// Properties of a restaurant feature.
///
/// Field names follow the Zürich open data schema. Every field is required;
/// address fields may arrive as JSON numbers and are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiProperties {
    /// Business type, the category used for color, clustering and filtering.
    pub betriebsart: String,
    pub betriebsname: String,
    #[serde(deserialize_with = "string_or_number")]
    pub strasselang: String,
    #[serde(deserialize_with = "string_or_number")]
    pub hnr: String,
    #[serde(deserialize_with = "string_or_number")]
    pub plz: String,
    #[serde(deserialize_with = "string_or_number")]
    pub ort: String,
}

impl PoiProperties {
    pub fn address(&self) -> Address<'_> {
        Address(self)
    }
}

/// Formatted two-line postal address of a [`PoiProperties`].
#[derive(Debug, Clone, Copy)]
pub struct Address<'a>(&'a PoiProperties);

impl Address<'_> {
    /// `"{strasselang} {hnr}"`
    pub fn street_line(&self) -> String {
        format!("{} {}", self.0.strasselang, self.0.hnr)
            .trim()
            .to_string()
    }

    /// `"{plz} {ort}"`
    pub fn locality_line(&self) -> String {
        format!("{} {}", self.0.plz, self.0.ort).trim().to_string()
    }
}

/// A restaurant point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub position: LatLng,
    pub properties: PoiProperties,
}

impl Poi {
    #[inline]
    pub fn category(&self) -> &str {
        &self.properties.betriebsart
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.properties.betriebsname
    }
}

/// A city district polygon. Only its geometry is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    pub geometry: MultiPolygon<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}
