// crates/gastromap-wasm/src/fetch.rs

use gastromap_core::{DataSource, MapError, Result};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Fetches datasets with `window.fetch`, relative to the page URL.
#[derive(Debug, Clone, Default)]
pub struct FetchSource;

fn reason(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

impl DataSource for FetchSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let window = web_sys::window().ok_or_else(|| MapError::fetch(path, "no window"))?;
        log::debug!("GET {path}");

        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| MapError::fetch(path, reason(e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| MapError::fetch(path, reason(e)))?;
        if !response.ok() {
            return Err(MapError::fetch(
                path,
                format!("HTTP {} {}", response.status(), response.status_text()),
            ));
        }

        let text = response.text().map_err(|e| MapError::fetch(path, reason(e)))?;
        JsFuture::from(text)
            .await
            .map_err(|e| MapError::fetch(path, reason(e)))?
            .as_string()
            .ok_or_else(|| MapError::fetch(path, "response body is not text"))
    }
}
