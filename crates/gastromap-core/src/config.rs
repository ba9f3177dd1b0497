// crates/gastromap-core/src/config.rs

use crate::bounds::Bounds;
use crate::cluster::DEFAULT_CLUSTER_RADIUS;
use crate::error::{MapError, Result};
use crate::filter::NO_FILTER_LABEL;
use crate::model::LatLng;
use crate::popup::DistrictStyle;
use crate::viewport::ZoomRange;
use serde::{Deserialize, Serialize};

/// Everything the bootstrap needs to know about the map.
///
/// `MapConfig::default()` is the Zürich restaurant map. Every field has a
/// default, so a partial JSON object only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// DOM id of the map container.
    pub container_id: String,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub zoom_snap: f64,
    pub attribution_prefix: String,
    pub tiles: TileConfig,
    pub data: DataConfig,
    pub district_style: DistrictStyle,
    pub cluster: ClusterConfig,
    pub filter: FilterControlConfig,
    /// Appended to the attribution once everything is loaded.
    pub data_attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub url: String,
    pub attribution: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub opacity: f64,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Relative path of the district polygon collection.
    pub districts: String,
    /// Relative path of the restaurant point collection.
    pub pois: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub chunked_loading: bool,
    pub chunk_size: usize,
    pub max_cluster_radius: f64,
    /// Marker option the donut groups by.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterControlConfig {
    pub position: String,
    pub no_filter_label: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            container_id: "map".to_string(),
            initial_center: LatLng::new(46.801111, 8.226667),
            initial_zoom: 13.0,
            zoom_snap: 0.5,
            attribution_prefix: String::new(),
            tiles: TileConfig::default(),
            data: DataConfig::default(),
            district_style: DistrictStyle::default(),
            cluster: ClusterConfig::default(),
            filter: FilterControlConfig::default(),
            data_attribution: "<a href=\"https://data.stadt-zuerich.ch\" target=\"_blank\">Open Data Stadt Zürich</a>".to_string(),
        }
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        TileConfig {
            url: "https://wmts.geo.admin.ch/1.0.0/ch.swisstopo.swissimage/default/current/3857/{z}/{x}/{y}.jpeg".to_string(),
            attribution: "&copy; <a href=\"https://www.swisstopo.admin.ch/\">swisstopo</a>".to_string(),
            min_zoom: 10.0,
            max_zoom: 19.0,
            opacity: 0.9,
            bounds: Bounds::new(
                LatLng::new(45.398181, 5.140242),
                LatLng::new(48.230651, 11.47757),
            ),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            districts: "data/stzh.adm_stadtkreise_a.json".to_string(),
            pois: "data/stp.gastwirtschaftsbetriebe.json".to_string(),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            chunked_loading: true,
            chunk_size: 200,
            max_cluster_radius: DEFAULT_CLUSTER_RADIUS,
            key: "betriebsart".to_string(),
        }
    }
}

impl Default for FilterControlConfig {
    fn default() -> Self {
        FilterControlConfig {
            position: "topright".to_string(),
            no_filter_label: NO_FILTER_LABEL.to_string(),
        }
    }
}

impl MapConfig {
    /// Parses a (possibly partial) JSON configuration and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig =
            serde_json::from_str(json).map_err(|e| MapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.container_id.trim().is_empty() {
            return Err(MapError::Config("container_id must not be empty".into()));
        }
        if self.tiles.min_zoom > self.tiles.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.tiles.min_zoom, self.tiles.max_zoom
            )));
        }
        if self.zoom_snap < 0.0 {
            return Err(MapError::Config("zoom_snap must not be negative".into()));
        }
        if self.cluster.max_cluster_radius <= 0.0 {
            return Err(MapError::Config(
                "max_cluster_radius must be positive".into(),
            ));
        }
        if self.data.districts.is_empty() || self.data.pois.is_empty() {
            return Err(MapError::Config("dataset paths must not be empty".into()));
        }
        Ok(())
    }

    pub fn zoom_range(&self) -> ZoomRange {
        ZoomRange {
            min: self.tiles.min_zoom,
            max: self.tiles.max_zoom,
            snap: self.zoom_snap,
        }
    }
}
