// crates/gastromap-core/src/source.rs

//! Where dataset text comes from.
//!
//! The controller awaits [`DataSource::fetch_text`] once per dataset. There
//! is no retry, timeout or cancellation: a fetch either completes or fails.

use crate::error::{MapError, Result};
use crate::loader::common_io;
use std::collections::HashMap;
use std::path::PathBuf;

/// A provider of dataset text addressed by relative path.
///
/// Implementations are driven from a single-threaded event loop, so the
/// returned futures carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch_text(&self, path: &str) -> Result<String>;
}

/// Datasets held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl DataSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| MapError::fetch(path, "404 Not Found"))
    }
}

/// Datasets read from disk relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSource { root: root.into() }
    }
}

impl DataSource for FileSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        log::debug!("reading {}", full.display());
        common_io::read_to_string(&full)
    }
}

/// Datasets fetched over HTTP(S) relative to a base URL.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpSource {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "fetch")]
impl DataSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| MapError::fetch(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::fetch(&url, format!("HTTP {status}")));
        }
        response.text().map_err(|e| MapError::fetch(&url, e))
    }
}
