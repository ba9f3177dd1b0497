// crates/gastromap-core/src/loader/mod.rs

//! # Data Loader
//!
//! Turns GeoJSON `FeatureCollection` text into typed records. Transport is
//! somebody else's job (see [`crate::source`]); this module only parses and
//! validates.
//!
//! Parsing fails fast: the first feature that does not match the typed
//! record aborts the whole dataset with [`MapError::InvalidFeature`].

use crate::error::{MapError, Result};
use crate::model::{District, LatLng, Poi, PoiProperties};
use geo::{Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson};

pub(crate) mod common_io;

pub use common_io::open_stream;

pub const DISTRICTS_DATASET: &str = "districts";
pub const POIS_DATASET: &str = "pois";

fn parse_collection(dataset: &str, text: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = text.parse().map_err(|e| MapError::parse(dataset, e))?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) => Err(MapError::parse(dataset, "expected a FeatureCollection, found a Feature")),
        GeoJson::Geometry(_) => Err(MapError::parse(dataset, "expected a FeatureCollection, found a Geometry")),
    }
}

fn invalid(dataset: &str, index: usize, reason: impl ToString) -> MapError {
    MapError::InvalidFeature {
        dataset: dataset.to_string(),
        index,
        reason: reason.to_string(),
    }
}

fn take_geometry(dataset: &str, index: usize, feature: &mut Feature) -> Result<Geometry<f64>> {
    let Some(geometry) = feature.geometry.take() else {
        return Err(invalid(dataset, index, "feature has no geometry"));
    };
    geometry
        .value
        .try_into()
        .map_err(|e: geojson::Error| invalid(dataset, index, e))
}

/// Parses the district polygon collection. Polygons and multipolygons are accepted.
pub fn parse_districts(text: &str) -> Result<Vec<District>> {
    let collection = parse_collection(DISTRICTS_DATASET, text)?;
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, mut feature)| {
            let geometry = take_geometry(DISTRICTS_DATASET, index, &mut feature)?;
            let geometry = match geometry {
                Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                Geometry::MultiPolygon(mp) => mp,
                other => {
                    return Err(invalid(
                        DISTRICTS_DATASET,
                        index,
                        format!("expected a polygon, found {}", geometry_name(&other)),
                    ))
                }
            };
            Ok(District { geometry })
        })
        .collect()
}

/// Parses the restaurant point collection into typed [`Poi`] records.
pub fn parse_pois(text: &str) -> Result<Vec<Poi>> {
    let collection = parse_collection(POIS_DATASET, text)?;
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, mut feature)| {
            let geometry = take_geometry(POIS_DATASET, index, &mut feature)?;
            let point = match geometry {
                Geometry::Point(point) => point,
                other => {
                    return Err(invalid(
                        POIS_DATASET,
                        index,
                        format!("expected a point, found {}", geometry_name(&other)),
                    ))
                }
            };
            let properties = feature
                .properties
                .ok_or_else(|| invalid(POIS_DATASET, index, "feature has no properties"))?;
            let properties: PoiProperties =
                serde_json::from_value(serde_json::Value::Object(properties))
                    .map_err(|e| invalid(POIS_DATASET, index, e))?;
            Ok(Poi {
                position: LatLng::from_lng_lat(point.x(), point.y()),
                properties,
            })
        })
        .collect()
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "Geometry",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POIS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature",
              "geometry": { "type": "Point", "coordinates": [8.5431, 47.3712] },
              "properties": { "betriebsart": "Restaurant", "betriebsname": "Zeughauskeller",
                              "strasselang": "Bahnhofstrasse", "hnr": "28a", "plz": "8001", "ort": "Zürich" } },
            { "type": "Feature",
              "geometry": { "type": "Point", "coordinates": [8.5450, 47.3668] },
              "properties": { "betriebsart": "Bar", "betriebsname": "Kronenhalle Bar",
                              "strasselang": "Rämistrasse", "hnr": 4, "plz": 8001, "ort": "Zürich" } }
        ]
    }"#;

    #[test]
    fn parses_points_into_typed_records() {
        let pois = parse_pois(POIS).unwrap();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].position, LatLng::new(47.3712, 8.5431));
        assert_eq!(pois[0].category(), "Restaurant");
        assert_eq!(pois[1].properties.hnr, "4");
        assert_eq!(pois[1].properties.plz, "8001");
    }

    #[test]
    fn missing_property_names_feature_and_field() {
        let text = POIS.replacen(
            r#""betriebsname": "Zeughauskeller""#,
            r#""betriebsname": null"#,
            1,
        );
        let err = parse_pois(&text).unwrap_err();
        match err {
            MapError::InvalidFeature { dataset, index, reason } => {
                assert_eq!(dataset, "pois");
                assert_eq!(index, 0);
                assert!(reason.contains("null"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_point_poi_is_rejected() {
        let text = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature",
              "geometry": { "type": "LineString", "coordinates": [[8.5, 47.3], [8.6, 47.4]] },
              "properties": {} } ] }"#;
        let err = parse_pois(text).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("LineString"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_pois("{ \"type\": \"FeatureCollection\", ").unwrap_err();
        assert!(matches!(err, MapError::Parse { .. }));
        let err = parse_districts(r#"{ "type": "Point", "coordinates": [8.5, 47.3] }"#).unwrap_err();
        assert!(err.to_string().contains("found a Geometry"));
    }

    #[test]
    fn parses_polygons_and_multipolygons() {
        let text = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "bezeichnung": "Kreis 1" },
              "geometry": { "type": "Polygon",
                "coordinates": [[[8.53, 47.36], [8.55, 47.36], [8.55, 47.38], [8.53, 47.36]]] } },
            { "type": "Feature", "properties": null,
              "geometry": { "type": "MultiPolygon",
                "coordinates": [[[[8.50, 47.39], [8.52, 47.39], [8.52, 47.41], [8.50, 47.39]]],
                                [[[8.56, 47.39], [8.58, 47.39], [8.58, 47.41], [8.56, 47.39]]]] } }
        ] }"#;
        let districts = parse_districts(text).unwrap();
        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].geometry.0.len(), 1);
        assert_eq!(districts[1].geometry.0.len(), 2);
    }
}
