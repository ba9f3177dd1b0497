// crates/gastromap-wasm/src/leaflet.rs

//! Bindings to the global `L` object of Leaflet and the plugins loaded next
//! to it (`leaflet.markercluster`, `Leaflet.DonutCluster`).
//!
//! Only the calls the map makes are bound. Options travel as plain JS
//! objects built with [`to_js`].

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    // ---------------------------------------------------------------------
    // L.Map
    // ---------------------------------------------------------------------
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    pub fn map(container_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds, catch)]
    pub fn fit_bounds(this: &Map, bounds: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, getter, js_name = attributionControl)]
    pub fn attribution_control(this: &Map) -> AttributionControl;

    pub type AttributionControl;

    #[wasm_bindgen(method, js_name = setPrefix)]
    pub fn set_prefix(this: &AttributionControl, prefix: &str);

    #[wasm_bindgen(method, js_name = addAttribution)]
    pub fn add_attribution(this: &AttributionControl, text: &str);

    // ---------------------------------------------------------------------
    // Layers
    // ---------------------------------------------------------------------
    #[derive(Clone)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &Map) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, html: &str) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    pub fn polygon(latlngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn marker(latlng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(extends = Layer)]
    pub type FeatureGroup;

    #[wasm_bindgen(js_namespace = L, js_name = featureGroup)]
    pub fn feature_group() -> FeatureGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &FeatureGroup, layer: &Layer) -> FeatureGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &FeatureGroup) -> FeatureGroup;

    #[wasm_bindgen(method, js_name = getLayers)]
    pub fn get_layers(this: &FeatureGroup) -> js_sys::Array;

    // ---------------------------------------------------------------------
    // Leaflet.DonutCluster (wraps L.markerClusterGroup)
    // ---------------------------------------------------------------------
    #[wasm_bindgen(extends = Layer)]
    pub type ClusterGroup;

    #[wasm_bindgen(js_namespace = L, js_name = DonutCluster, catch)]
    pub fn donut_cluster(options: &JsValue, donut: &JsValue) -> Result<ClusterGroup, JsValue>;

    #[wasm_bindgen(method, js_name = addLayers)]
    pub fn add_layers(this: &ClusterGroup, layers: &js_sys::Array) -> ClusterGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &ClusterGroup) -> ClusterGroup;

    // ---------------------------------------------------------------------
    // Controls
    // ---------------------------------------------------------------------
    pub type Control;

    #[wasm_bindgen(js_namespace = L, js_name = control)]
    pub fn control(options: &JsValue) -> Control;

    #[wasm_bindgen(method, setter, js_name = onAdd)]
    pub fn set_on_add(this: &Control, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Control, map: &Map) -> Control;

    #[wasm_bindgen(js_namespace = ["L", "DomEvent"], js_name = disableClickPropagation)]
    pub fn disable_click_propagation(element: &web_sys::HtmlElement);
}

/// Serializes options as plain JS objects (maps become objects, not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}
