// crates/gastromap-core/src/lib.rs

pub mod bounds;
pub mod cluster;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod loader; // GeoJSON -> typed records
pub mod model;
pub mod popup;
pub mod renderer;
pub mod source;
pub mod text;
pub mod viewport;
pub mod prelude;

// Re-exports
pub use crate::error::{MapError, Result};
pub use crate::bounds::Bounds;
pub use crate::color::{category_color, ArcColors};
pub use crate::config::MapConfig;
pub use crate::controller::{AppState, MapController, Phase};
pub use crate::filter::{CategoryFilter, FilterOption};
pub use crate::model::{District, LatLng, Poi, PoiProperties};
// Export the renderer seam (crucial for front ends!)
pub use crate::renderer::{HeadlessRenderer, MapRenderer, PoiMarker};
pub use crate::source::DataSource;
