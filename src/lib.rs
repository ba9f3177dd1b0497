//! Umbrella crate for the demos: re-exports gastromap-core.

pub use gastromap_core::*;
