//! gastromap-wasm: the browser front end of gastromap-core
//!
//! Draws the Zürich districts and restaurants on a Leaflet map, clusters the
//! restaurants into category donuts and adds a dropdown that filters them by
//! business category.
//!
//! What it provides
//! ----------------
//! - Panic hook and console logging on module load (via `#[wasm_bindgen(start)]`)
//! - `init_map(config?)`: runs the whole bootstrap and wires the dropdown
//! - `set_filter(value)`: same as picking a dropdown entry (`""` shows all)
//! - `category_color(name)`: the marker color of a category
//! - `category_options()`: the dropdown entries as `{ label, value }` objects
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { init_map, set_filter } from './pkg/gastromap_wasm.js';
//!
//! async function main() {
//!   await init();
//!   await init_map({ container_id: 'map' });
//!   set_filter('Restaurant');
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Leaflet, `leaflet.markercluster` and `Leaflet.DonutCluster` must be loaded
//!   as globals before `init_map` runs. See `www/index.html`.
//! - Dataset paths in the config are resolved relative to the page URL.

use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlSelectElement};

use gastromap_core::{MapConfig, MapController, MapError, Phase};

pub mod fetch;
pub mod leaflet;
pub mod renderer;

pub use fetch::FetchSource;
pub use renderer::LeafletRenderer;

type Controller = MapController<LeafletRenderer, FetchSource>;

struct Session {
    controller: Controller,
    _on_change: Option<Closure<dyn FnMut(Event)>>,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    static INITIALIZING: Cell<bool> = const { Cell::new(false) };
}

/// Held by the one `init_map` call that is allowed to build the map, from
/// before the first await until its session is stored.
struct InitGuard;

impl InitGuard {
    fn acquire() -> Result<InitGuard, MapError> {
        if INITIALIZING.with(Cell::get) || SESSION.with(|s| s.borrow().is_some()) {
            return Err(MapError::Config("map is already initialized".into()));
        }
        INITIALIZING.with(|flag| flag.set(true));
        Ok(InitGuard)
    }
}

impl Drop for InitGuard {
    fn drop(&mut self) {
        INITIALIZING.with(|flag| flag.set(false));
    }
}

fn js_error(e: MapError) -> JsValue {
    JsError::new(&e.to_string()).into()
}

fn not_loaded() -> MapError {
    MapError::OutOfOrder {
        expected: Phase::PoisLoaded,
        found: Phase::Uninitialized,
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed, e.g. on a second start().
    let _ = console_log::init_with_level(log::Level::Info);
}

/* --------------------------------------------------------------------------
   Bootstrap
-------------------------------------------------------------------------- */

/// Builds the map. `config` is a partial `MapConfig` object; missing fields
/// (or a missing argument) fall back to the defaults.
#[wasm_bindgen]
pub async fn init_map(config: JsValue) -> Result<(), JsValue> {
    let _guard = InitGuard::acquire().map_err(js_error)?;
    let config: MapConfig = if config.is_undefined() || config.is_null() {
        MapConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| js_error(MapError::Config(e.to_string())))?
    };

    let mut controller = MapController::new(config, LeafletRenderer::new(), FetchSource);
    let result = controller.initialize().await;

    // The dropdown only exists once the restaurants are in.
    let on_change = match controller.renderer().filter_element() {
        Some(select) => Some(listen_for_filter(select)?),
        None => None,
    };
    SESSION.with(|s| {
        *s.borrow_mut() = Some(Session {
            controller,
            _on_change: on_change,
        })
    });
    result.map_err(js_error)
}

fn listen_for_filter(select: &HtmlSelectElement) -> Result<Closure<dyn FnMut(Event)>, JsValue> {
    let target = select.clone();
    let on_change = Closure::wrap(Box::new(move |_event: Event| {
        let value = target.value();
        if let Err(e) = apply_filter(&value) {
            log::error!("filter {value:?} failed: {e}");
        }
    }) as Box<dyn FnMut(Event)>);
    select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    Ok(on_change)
}

fn apply_filter(value: &str) -> gastromap_core::Result<()> {
    SESSION.with(|s| match s.borrow_mut().as_mut() {
        Some(session) => session.controller.select_option(value),
        None => Err(not_loaded()),
    })
}

/* --------------------------------------------------------------------------
   Filter
-------------------------------------------------------------------------- */

/// Shows only restaurants of category `value`; `""` shows all of them.
/// The dropdown is updated to match. Values the dropdown does not offer are
/// rejected and leave the map as it was.
#[wasm_bindgen]
pub fn set_filter(value: &str) -> Result<(), JsValue> {
    apply_filter(value).map_err(js_error)?;
    SESSION.with(|s| {
        if let Some(select) = s
            .borrow()
            .as_ref()
            .and_then(|session| session.controller.renderer().filter_element())
        {
            select.set_value(value);
        }
    });
    Ok(())
}

/// The active filter value, `""` when everything is shown.
#[wasm_bindgen]
pub fn current_filter() -> String {
    SESSION.with(|s| {
        s.borrow()
            .as_ref()
            .map(|session| session.controller.state().filter.value().to_string())
            .unwrap_or_default()
    })
}

/// Dropdown entries for the loaded restaurants. Empty before `init_map`.
#[wasm_bindgen]
pub fn category_options() -> Result<JsValue, JsValue> {
    let options = SESSION.with(|s| {
        s.borrow()
            .as_ref()
            .map(|session| session.controller.category_options())
            .unwrap_or_default()
    });
    leaflet::to_js(&options)
}

/* --------------------------------------------------------------------------
   Colors
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn category_color(category: &str) -> String {
    gastromap_core::category_color(category)
}
