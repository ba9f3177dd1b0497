// crates/gastromap-core/src/popup.rs

//! HTML snippets and icon/style options handed to the mapping library.

use crate::model::PoiProperties;
use crate::text::escape_html;
use serde::{Deserialize, Serialize};

/// Popup body for a restaurant: colored category label, name, address.
pub fn popup_html(properties: &PoiProperties, color: &str) -> String {
    let address = properties.address();
    format!(
        concat!(
            "<p class=\"leaflet-popup-category\" style=\"--marker-color: {color};\">{category}</p>",
            "<h3>{name}</h3>",
            "<p>{street}<br/>{locality}</p>"
        ),
        color = escape_html(color),
        category = escape_html(&properties.betriebsart),
        name = escape_html(&properties.betriebsname),
        street = escape_html(&address.street_line()),
        locality = escape_html(&address.locality_line()),
    )
}

/// Options for a Leaflet `divIcon` marker colored by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub icon_anchor: [f64; 2],
    pub label_anchor: [f64; 2],
    pub popup_anchor: [f64; 2],
    pub html: String,
}

impl MarkerIcon {
    pub fn colored(color: &str) -> Self {
        MarkerIcon {
            class_name: "leaflet-marker-container",
            icon_anchor: [0.0, 24.0],
            label_anchor: [-6.0, 0.0],
            popup_anchor: [0.0, -36.0],
            html: format!(
                "<span class=\"leaflet-marker\" style=\"--marker-color: {};\"></span>",
                escape_html(color)
            ),
        }
    }
}

/// Path style of the district polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistrictStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl Default for DistrictStyle {
    fn default() -> Self {
        DistrictStyle {
            color: "#993399".to_string(),
            weight: 3.0,
            fill_opacity: 0.1,
        }
    }
}
