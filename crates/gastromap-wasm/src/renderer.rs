// crates/gastromap-wasm/src/renderer.rs

//! [`MapRenderer`] on top of Leaflet.
//!
//! The POI layer is a feature group that never joins the map itself; its
//! markers are shown through the donut cluster group, which is created on the
//! first clustering pass once the arc colors are known.

use crate::leaflet::{self, to_js};
use gastromap_core::popup::DistrictStyle;
use gastromap_core::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlOptionElement, HtmlSelectElement};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    zoom_snap: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    attribution: &'a str,
    min_zoom: f64,
    max_zoom: f64,
    opacity: f64,
    bounds: Bounds,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClusterOptions {
    chunked_loading: bool,
    max_cluster_radius: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DonutOptions<'a> {
    key: &'a str,
    arc_color_dict: &'a ArcColors,
}

#[derive(Serialize)]
struct ControlOptions<'a> {
    position: &'a str,
}

fn render_error(e: JsValue) -> MapError {
    MapError::Render(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| MapError::Render("no document".into()))
}

/// Leaflet needs `[lat, lng]` rings, nested per polygon.
fn district_latlngs(district: &District) -> Vec<Vec<Vec<[f64; 2]>>> {
    district
        .geometry
        .0
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| [c.y, c.x]).collect())
                .collect()
        })
        .collect()
}

pub struct LeafletRenderer {
    container_id: String,
    cluster: ClusterOptions,
    cluster_key: String,
    filter_position: String,
    map: Option<leaflet::Map>,
    poi_layer: leaflet::FeatureGroup,
    cluster_layer: Option<leaflet::ClusterGroup>,
    select: Option<HtmlSelectElement>,
    on_add: Option<Closure<dyn FnMut(JsValue) -> JsValue>>,
}

impl LeafletRenderer {
    pub fn new() -> Self {
        let defaults = MapConfig::default();
        LeafletRenderer {
            container_id: defaults.container_id,
            cluster: ClusterOptions {
                chunked_loading: defaults.cluster.chunked_loading,
                max_cluster_radius: defaults.cluster.max_cluster_radius,
            },
            cluster_key: defaults.cluster.key,
            filter_position: defaults.filter.position,
            map: None,
            poi_layer: leaflet::feature_group(),
            cluster_layer: None,
            select: None,
            on_add: None,
        }
    }

    /// The `<select>` of the filter control, once it has been added.
    pub fn filter_element(&self) -> Option<&HtmlSelectElement> {
        self.select.as_ref()
    }

    fn map(&self) -> Result<&leaflet::Map> {
        self.map
            .as_ref()
            .ok_or_else(|| MapError::Render("base map is not initialized".into()))
    }

    fn marker_options(&self, marker: &PoiMarker) -> std::result::Result<JsValue, JsValue> {
        let options = js_sys::Object::new();
        let icon = leaflet::div_icon(&to_js(&marker.icon)?);
        js_sys::Reflect::set(&options, &"icon".into(), &icon)?;
        js_sys::Reflect::set(
            &options,
            &self.cluster_key.as_str().into(),
            &marker.category.as_str().into(),
        )?;
        Ok(options.into())
    }

    fn build_select(
        document: &Document,
        options: &[FilterOption],
        selected: &str,
    ) -> std::result::Result<HtmlSelectElement, JsValue> {
        let select: HtmlSelectElement = document.create_element("select")?.dyn_into()?;
        for option in options {
            let element: HtmlOptionElement = document.create_element("option")?.dyn_into()?;
            element.set_value(&option.value);
            element.set_text(&option.label);
            select.add_with_html_option_element(&element)?;
        }
        select.set_value(selected);
        Ok(select)
    }
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for LeafletRenderer {
    fn init_base_map(&mut self, config: &MapConfig) -> Result<()> {
        self.container_id = config.container_id.clone();
        self.cluster = ClusterOptions {
            chunked_loading: config.cluster.chunked_loading,
            max_cluster_radius: config.cluster.max_cluster_radius,
        };
        self.cluster_key = config.cluster.key.clone();
        self.filter_position = config.filter.position.clone();

        let options = to_js(&MapOptions {
            zoom_snap: config.zoom_snap,
        })
        .map_err(render_error)?;
        let map = leaflet::map(&config.container_id, &options).map_err(render_error)?;
        let center = to_js(&[config.initial_center.lat, config.initial_center.lng])
            .map_err(render_error)?;
        map.set_view(&center, config.initial_zoom);
        map.attribution_control()
            .set_prefix(&config.attribution_prefix);

        let tiles = TileOptions {
            attribution: &config.tiles.attribution,
            min_zoom: config.tiles.min_zoom,
            max_zoom: config.tiles.max_zoom,
            opacity: config.tiles.opacity,
            bounds: config.tiles.bounds,
        };
        leaflet::tile_layer(&config.tiles.url, &to_js(&tiles).map_err(render_error)?)
            .add_to(&map);

        self.map = Some(map);
        Ok(())
    }

    fn add_district_layer(&mut self, districts: &[District], style: &DistrictStyle) -> Result<()> {
        let map = self.map()?;
        let style = to_js(style).map_err(render_error)?;
        for district in districts {
            let latlngs = to_js(&district_latlngs(district)).map_err(render_error)?;
            leaflet::polygon(&latlngs, &style).add_to(map);
        }
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &Bounds) -> Result<()> {
        let map = self.map()?;
        map.fit_bounds(&to_js(bounds).map_err(render_error)?)
            .map_err(render_error)?;
        Ok(())
    }

    fn clear_poi_layer(&mut self) -> Result<()> {
        self.poi_layer.clear_layers();
        Ok(())
    }

    fn add_poi_markers(&mut self, markers: &[PoiMarker]) -> Result<()> {
        for marker in markers {
            let latlng = to_js(&[marker.position.lat, marker.position.lng]).map_err(render_error)?;
            let options = self.marker_options(marker).map_err(render_error)?;
            let layer = leaflet::marker(&latlng, &options).bind_popup(&marker.popup_html);
            self.poi_layer.add_layer(&layer);
        }
        Ok(())
    }

    fn clear_cluster_layer(&mut self) -> Result<()> {
        if let Some(layer) = &self.cluster_layer {
            layer.clear_layers();
        }
        Ok(())
    }

    fn cluster_poi_layer(&mut self, colors: &ArcColors) -> Result<()> {
        let map = self.map()?;
        if self.cluster_layer.is_none() {
            let options = to_js(&self.cluster).map_err(render_error)?;
            let donut = to_js(&DonutOptions {
                key: &self.cluster_key,
                arc_color_dict: colors,
            })
            .map_err(render_error)?;
            let layer = leaflet::donut_cluster(&options, &donut).map_err(render_error)?;
            layer.add_to(map);
            self.cluster_layer = Some(layer);
        }
        if let Some(layer) = &self.cluster_layer {
            layer.add_layers(&self.poi_layer.get_layers());
        }
        Ok(())
    }

    fn add_filter_control(&mut self, options: &[FilterOption], selected: &str) -> Result<()> {
        let map = self.map()?;
        let document = document()?;
        let container: HtmlElement = document
            .create_element("div")
            .and_then(|e| e.dyn_into::<HtmlElement>().map_err(JsValue::from))
            .map_err(render_error)?;
        container.set_class_name("leaflet-filter-control");
        let select = Self::build_select(&document, options, selected).map_err(render_error)?;
        container.append_child(&select).map_err(render_error)?;
        leaflet::disable_click_propagation(&container);

        let control = leaflet::control(
            &to_js(&ControlOptions {
                position: &self.filter_position,
            })
            .map_err(render_error)?,
        );
        let on_add = Closure::wrap(
            Box::new(move |_map: JsValue| -> JsValue { container.clone().into() })
                as Box<dyn FnMut(JsValue) -> JsValue>,
        );
        control.set_on_add(on_add.as_ref().unchecked_ref());
        control.add_to(map);

        self.on_add = Some(on_add);
        self.select = Some(select);
        Ok(())
    }

    fn add_attribution(&mut self, html: &str) -> Result<()> {
        self.map()?.attribution_control().add_attribution(html);
        Ok(())
    }

    fn show_error(&mut self, error: &MapError) {
        log::error!("{error}");
        let shown = document().ok().and_then(|document| {
            let target = document.get_element_by_id(&self.container_id)?;
            let banner = document.create_element("div").ok()?;
            banner.set_class_name("gastromap-error");
            banner.set_text_content(Some(&format!("Die Karte konnte nicht geladen werden: {error}")));
            target.append_child(&banner).ok()
        });
        if shown.is_none() {
            log::warn!("no #{} element to show the error in", self.container_id);
        }
    }
}
