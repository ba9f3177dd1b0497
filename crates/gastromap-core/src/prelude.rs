//! gastromap prelude: bring common types and traits into scope for front ends and demos.

#![allow(unused_imports)]

pub use crate::bounds::Bounds;
pub use crate::cluster::{Cluster, ClusterIndex, ClusterInput, DonutArc};
pub use crate::color::{category_color, ArcColors};
pub use crate::config::MapConfig;
pub use crate::controller::{AppState, MapController, Phase};
pub use crate::error::{MapError, Result};
pub use crate::filter::{category_options, CategoryFilter, FilterOption, NO_FILTER_LABEL};
pub use crate::loader::{parse_districts, parse_pois};
pub use crate::model::{District, LatLng, Poi, PoiProperties};
pub use crate::renderer::{HeadlessRenderer, MapRenderer, PoiMarker, RenderOp};
pub use crate::source::{DataSource, FileSource, MemorySource};
#[cfg(feature = "fetch")]
pub use crate::source::HttpSource;
pub use crate::viewport::{PixelSize, Viewport};
