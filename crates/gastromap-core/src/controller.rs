// crates/gastromap-core/src/controller.rs

//! # Map Controller
//!
//! Owns the session state (datasets, filter, arc colors) and sequences the
//! bootstrap:
//!
//! ```text
//! Uninitialized -> BaseMapReady -> DistrictsLoaded -> PoisLoaded -> Ready
//! ```
//!
//! Each step requires the previous one. Any failure during
//! [`MapController::initialize`] is fatal: the controller moves to
//! [`Phase::Failed`] and asks the renderer to show the error.
//!
//! After loading, [`MapController::set_filter`] is the only mutator. It
//! rebuilds the POI and cluster layers from scratch in a fixed order
//! (clear POIs, add filtered POIs, clear clusters, cluster POIs).

use crate::bounds::Bounds;
use crate::color::ArcColors;
use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::filter::{category_options, CategoryFilter, FilterOption};
use crate::loader::{parse_districts, parse_pois};
use crate::model::{District, Poi};
use crate::renderer::{MapRenderer, PoiMarker};
use crate::source::DataSource;

/// Bootstrap progress of a [`MapController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Uninitialized,
    BaseMapReady,
    DistrictsLoaded,
    PoisLoaded,
    Ready,
    Failed,
}

/// Everything the map shows, derived or loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub districts: Vec<District>,
    pub district_bounds: Option<Bounds>,
    pub pois: Vec<Poi>,
    pub arc_colors: ArcColors,
    pub filter: CategoryFilter,
}

pub struct MapController<R, S> {
    config: MapConfig,
    renderer: R,
    source: S,
    phase: Phase,
    state: AppState,
}

impl<R: MapRenderer, S: DataSource> MapController<R, S> {
    pub fn new(config: MapConfig, renderer: R, source: S) -> Self {
        MapController {
            config,
            renderer,
            source,
            phase: Phase::Uninitialized,
            state: AppState::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MapError::OutOfOrder {
                expected,
                found: self.phase,
            })
        }
    }

    /// Runs the whole bootstrap sequence.
    pub async fn initialize(&mut self) -> Result<()> {
        let result = self.run_bootstrap().await;
        if let Err(e) = &result {
            log::warn!("map initialization halted in {:?}: {e}", self.phase);
            self.phase = Phase::Failed;
            self.renderer.show_error(e);
        }
        result
    }

    async fn run_bootstrap(&mut self) -> Result<()> {
        self.init_base_map()?;
        self.load_districts().await?;
        self.load_pois().await?;
        self.finish()
    }

    /// Creates the map and its tile layer.
    pub fn init_base_map(&mut self) -> Result<()> {
        self.expect_phase(Phase::Uninitialized)?;
        self.config.validate()?;
        self.renderer.init_base_map(&self.config)?;
        self.phase = Phase::BaseMapReady;
        log::info!("base map ready in #{}", self.config.container_id);
        Ok(())
    }

    /// Loads and draws the districts, then fits the view to them.
    pub async fn load_districts(&mut self) -> Result<()> {
        self.expect_phase(Phase::BaseMapReady)?;
        let text = self.source.fetch_text(&self.config.data.districts).await?;
        let districts = parse_districts(&text)?;
        let bounds = Bounds::of_districts(&districts)
            .filter(Bounds::is_valid)
            .ok_or_else(|| {
                MapError::InvalidBounds(format!(
                    "{} contains no district geometry",
                    self.config.data.districts
                ))
            })?;

        self.renderer
            .add_district_layer(&districts, &self.config.district_style)?;
        self.renderer.fit_bounds(&bounds)?;

        log::info!("loaded {} districts", districts.len());
        self.state.districts = districts;
        self.state.district_bounds = Some(bounds);
        self.phase = Phase::DistrictsLoaded;
        Ok(())
    }

    /// Loads the restaurants, draws and clusters them, then adds the filter dropdown.
    pub async fn load_pois(&mut self) -> Result<()> {
        self.expect_phase(Phase::DistrictsLoaded)?;
        let text = self.source.fetch_text(&self.config.data.pois).await?;
        let pois = parse_pois(&text)?;

        self.state.arc_colors = ArcColors::from_categories(pois.iter().map(Poi::category));
        self.state.pois = pois;
        self.rebuild_layers()?;

        let options = self.category_options();
        self.renderer
            .add_filter_control(&options, self.state.filter.value())?;

        log::info!(
            "loaded {} restaurants in {} categories",
            self.state.pois.len(),
            self.state.arc_colors.len()
        );
        self.phase = Phase::PoisLoaded;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.expect_phase(Phase::PoisLoaded)?;
        let attribution = self.config.data_attribution.clone();
        self.renderer.add_attribution(&attribution)?;
        self.phase = Phase::Ready;
        log::info!("map ready");
        Ok(())
    }

    /// Applies a dropdown value (`""` shows everything) and rebuilds the layers.
    pub fn set_filter(&mut self, value: &str) -> Result<()> {
        if !matches!(self.phase, Phase::PoisLoaded | Phase::Ready) {
            return Err(MapError::OutOfOrder {
                expected: Phase::PoisLoaded,
                found: self.phase,
            });
        }
        self.state.filter = CategoryFilter::from_value(value);
        self.rebuild_layers()
    }

    /// Like [`set_filter`](Self::set_filter), but only for values the
    /// dropdown offers. Anything else leaves the filter and layers untouched.
    pub fn select_option(&mut self, value: &str) -> Result<()> {
        if !matches!(self.phase, Phase::PoisLoaded | Phase::Ready) {
            return Err(MapError::OutOfOrder {
                expected: Phase::PoisLoaded,
                found: self.phase,
            });
        }
        if !self.category_options().iter().any(|o| o.value == value) {
            return Err(MapError::UnknownCategory(value.to_string()));
        }
        self.set_filter(value)
    }

    /// Dropdown entries for the full, unfiltered dataset.
    pub fn category_options(&self) -> Vec<FilterOption> {
        category_options(&self.state.pois, &self.config.filter.no_filter_label)
    }

    /// Markers for every feature that passes the current filter.
    pub fn visible_markers(&self) -> Vec<PoiMarker> {
        self.state
            .filter
            .apply(&self.state.pois)
            .map(|(index, poi)| PoiMarker::new(index, poi, &self.state.arc_colors))
            .collect()
    }

    fn rebuild_layers(&mut self) -> Result<()> {
        let markers = self.visible_markers();
        log::debug!(
            "rebuilding layers for filter {:?}: {} of {} restaurants",
            self.state.filter.selected(),
            markers.len(),
            self.state.pois.len()
        );
        self.renderer.clear_poi_layer()?;
        self.renderer.add_poi_markers(&markers)?;
        self.renderer.clear_cluster_layer()?;
        self.renderer.cluster_poi_layer(&self.state.arc_colors)
    }
}
