// crates/gastromap-core/src/renderer.rs

//! The seam between the map logic and a concrete mapping library.
//!
//! [`crate::controller::MapController`] decides *what* is on the map;
//! a [`MapRenderer`] decides *how* it gets drawn. The browser build
//! implements it on top of Leaflet, [`HeadlessRenderer`] keeps everything in
//! memory.

use crate::bounds::Bounds;
use crate::cluster::{Cluster, ClusterIndex, ClusterInput};
use crate::color::ArcColors;
use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::filter::FilterOption;
use crate::model::{District, LatLng, Poi};
use crate::popup::{popup_html, DistrictStyle, MarkerIcon};
use crate::viewport::{PixelSize, Viewport, ZoomRange};

/// A restaurant ready to be drawn: position, category color, popup and icon.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiMarker {
    /// Index of the feature in the full dataset.
    pub feature_index: usize,
    pub position: LatLng,
    pub category: String,
    pub color: String,
    pub popup_html: String,
    pub icon: MarkerIcon,
}

impl PoiMarker {
    pub fn new(feature_index: usize, poi: &Poi, colors: &ArcColors) -> Self {
        let color = colors.color_of(poi.category());
        PoiMarker {
            feature_index,
            position: poi.position,
            category: poi.category().to_string(),
            popup_html: popup_html(&poi.properties, &color),
            icon: MarkerIcon::colored(&color),
            color,
        }
    }
}

/// Operations the controller performs on the map, in the order it performs them.
pub trait MapRenderer {
    /// Creates the map in its container and adds the base tile layer.
    fn init_base_map(&mut self, config: &MapConfig) -> Result<()>;

    fn add_district_layer(&mut self, districts: &[District], style: &DistrictStyle) -> Result<()>;

    /// Moves the view so that `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: &Bounds) -> Result<()>;

    /// Removes every marker from the POI layer.
    fn clear_poi_layer(&mut self) -> Result<()>;

    /// Adds markers to the (just cleared) POI layer.
    fn add_poi_markers(&mut self, markers: &[PoiMarker]) -> Result<()>;

    fn clear_cluster_layer(&mut self) -> Result<()>;

    /// Feeds the POI layer's current markers into the cluster layer.
    fn cluster_poi_layer(&mut self, colors: &ArcColors) -> Result<()>;

    fn add_filter_control(&mut self, options: &[FilterOption], selected: &str) -> Result<()>;

    fn add_attribution(&mut self, html: &str) -> Result<()>;

    /// Surfaces a fatal initialization error to the user.
    fn show_error(&mut self, error: &MapError);
}

/// One call the controller made, as recorded by [`HeadlessRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    InitBaseMap,
    AddDistricts(usize),
    FitBounds,
    ClearPois,
    AddPois(usize),
    ClearClusters,
    ClusterPois(usize),
    AddFilterControl(usize),
    AddAttribution,
    ShowError,
}

/// A [`MapRenderer`] without a browser.
///
/// It keeps the viewport, layers and controls in memory and clusters the
/// POI layer with [`ClusterIndex`] at the current zoom. Useful for tests and
/// for inspecting datasets from native tooling.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    size: PixelSize,
    zoom_range: ZoomRange,
    cluster_radius: f64,
    chunk_size: usize,
    pub viewport: Option<Viewport>,
    pub districts: Vec<District>,
    pub district_style: Option<DistrictStyle>,
    pub poi_layer: Vec<PoiMarker>,
    pub clusters: Vec<Cluster>,
    pub filter_options: Vec<FilterOption>,
    pub selected_filter: Option<String>,
    pub attributions: Vec<String>,
    pub error: Option<String>,
    pub ops: Vec<RenderOp>,
    pub cluster_progress: Vec<(usize, usize)>,
}

impl HeadlessRenderer {
    pub fn new(size: PixelSize) -> Self {
        let defaults = MapConfig::default();
        HeadlessRenderer {
            size,
            zoom_range: defaults.zoom_range(),
            cluster_radius: defaults.cluster.max_cluster_radius,
            chunk_size: defaults.cluster.chunk_size,
            viewport: None,
            districts: Vec::new(),
            district_style: None,
            poi_layer: Vec::new(),
            clusters: Vec::new(),
            filter_options: Vec::new(),
            selected_filter: None,
            attributions: Vec::new(),
            error: None,
            ops: Vec::new(),
            cluster_progress: Vec::new(),
        }
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Geographic extent currently on screen.
    pub fn visible_bounds(&self) -> Option<Bounds> {
        self.viewport.map(|v| v.visible_bounds(self.size))
    }

    /// Dataset indices of the markers in the POI layer.
    pub fn rendered_indices(&self) -> Vec<usize> {
        self.poi_layer.iter().map(|m| m.feature_index).collect()
    }

    /// Total number of markers held by the cluster layer.
    pub fn clustered_marker_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    fn require_map(&self) -> Result<Viewport> {
        self.viewport
            .ok_or_else(|| MapError::Render("base map is not initialized".into()))
    }
}

impl MapRenderer for HeadlessRenderer {
    fn init_base_map(&mut self, config: &MapConfig) -> Result<()> {
        self.zoom_range = config.zoom_range();
        self.cluster_radius = config.cluster.max_cluster_radius;
        self.chunk_size = if config.cluster.chunked_loading {
            config.cluster.chunk_size
        } else {
            usize::MAX
        };
        self.viewport = Some(Viewport::new(config.initial_center, config.initial_zoom));
        self.attributions.push(config.tiles.attribution.clone());
        self.ops.push(RenderOp::InitBaseMap);
        Ok(())
    }

    fn add_district_layer(&mut self, districts: &[District], style: &DistrictStyle) -> Result<()> {
        self.require_map()?;
        self.districts = districts.to_vec();
        self.district_style = Some(style.clone());
        self.ops.push(RenderOp::AddDistricts(districts.len()));
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &Bounds) -> Result<()> {
        self.require_map()?;
        self.viewport = Some(Viewport::fit_bounds(bounds, self.size, self.zoom_range));
        self.ops.push(RenderOp::FitBounds);
        Ok(())
    }

    fn clear_poi_layer(&mut self) -> Result<()> {
        self.poi_layer.clear();
        self.ops.push(RenderOp::ClearPois);
        Ok(())
    }

    fn add_poi_markers(&mut self, markers: &[PoiMarker]) -> Result<()> {
        self.poi_layer.extend_from_slice(markers);
        self.ops.push(RenderOp::AddPois(markers.len()));
        Ok(())
    }

    fn clear_cluster_layer(&mut self) -> Result<()> {
        self.clusters.clear();
        self.cluster_progress.clear();
        self.ops.push(RenderOp::ClearClusters);
        Ok(())
    }

    fn cluster_poi_layer(&mut self, _colors: &ArcColors) -> Result<()> {
        let zoom = self.require_map()?.zoom;
        let inputs: Vec<ClusterInput> = self
            .poi_layer
            .iter()
            .map(|m| ClusterInput {
                position: m.position,
                category: m.category.clone(),
            })
            .collect();
        let mut index = ClusterIndex::new(zoom, self.cluster_radius);
        let progress = &mut self.cluster_progress;
        index.extend_chunked(&inputs, self.chunk_size, |done, total| {
            progress.push((done, total))
        });
        // Cluster members index the POI layer; map them back to dataset indices.
        self.clusters = index
            .clusters()
            .iter()
            .cloned()
            .map(|mut c| {
                for member in &mut c.members {
                    *member = self.poi_layer[*member].feature_index;
                }
                c
            })
            .collect();
        self.ops.push(RenderOp::ClusterPois(inputs.len()));
        Ok(())
    }

    fn add_filter_control(&mut self, options: &[FilterOption], selected: &str) -> Result<()> {
        self.filter_options = options.to_vec();
        self.selected_filter = Some(selected.to_string());
        self.ops.push(RenderOp::AddFilterControl(options.len()));
        Ok(())
    }

    fn add_attribution(&mut self, html: &str) -> Result<()> {
        self.attributions.push(html.to_string());
        self.ops.push(RenderOp::AddAttribution);
        Ok(())
    }

    fn show_error(&mut self, error: &MapError) {
        self.error = Some(error.to_string());
        self.ops.push(RenderOp::ShowError);
    }
}
