// crates/gastromap-core/src/color.rs

//! # Category Colors
//!
//! Every business category gets a color derived from its name alone, so the
//! same category is painted identically on markers, popups and cluster arcs
//! without any lookup table.

use serde::Serialize;
use std::collections::BTreeMap;

/// Hashes a category name into a `#rrggbb` color.
///
/// The hash walks the UTF-16 code units of `category` and accumulates
/// `code + ((hash << 2) - hash)` in wrapping 32-bit signed arithmetic. The
/// low three bytes of the result, least significant first, become the red,
/// green and blue channels.
///
/// # Examples
///
/// ```rust
/// use gastromap_core::color::category_color;
///
/// assert_eq!(category_color(""), "#000000");
/// assert_eq!(category_color("Bar"), "#e70300");
/// assert_ne!(category_color("Bar"), category_color("bar"));
/// ```
pub fn category_color(category: &str) -> String {
    let hash = category_hash(category);
    let mut color = String::with_capacity(7);
    color.push('#');
    for i in 0..3 {
        let value = (hash >> (i * 8)) & 0xFF;
        color.push_str(&format!("{value:02x}"));
    }
    color
}

fn category_hash(category: &str) -> i32 {
    category.encode_utf16().fold(0i32, |hash, code| {
        i32::from(code).wrapping_add(hash.wrapping_shl(2).wrapping_sub(hash))
    })
}

/// Category → color dictionary for a dataset.
///
/// Serializes as a plain JSON object, which is the shape the DonutCluster
/// plugin expects for its `arcColorDict` option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArcColors(BTreeMap<String, String>);

impl ArcColors {
    pub fn from_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = BTreeMap::new();
        for category in categories {
            map.entry(category.to_string())
                .or_insert_with(|| category_color(category));
        }
        ArcColors(map)
    }

    /// Color for `category`, hashing it if the dataset never contained it.
    pub fn color_of(&self, category: &str) -> String {
        self.0
            .get(category)
            .cloned()
            .unwrap_or_else(|| category_color(category))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_is_black() {
        assert_eq!(category_color(""), "#000000");
    }

    #[test]
    fn short_names_match_hand_computed_hash() {
        // B=66, a=97, r=114: 66 -> 97 + 3*66 = 295 -> 114 + 3*295 = 999 = 0x0003e7
        assert_eq!(category_hash("Bar"), 999);
        assert_eq!(category_color("Bar"), "#e70300");
        // b=98: 98 -> 391 -> 1287 = 0x000507
        assert_eq!(category_hash("bar"), 1287);
        assert_eq!(category_color("bar"), "#070500");
    }

    #[test]
    fn long_names_wrap_like_i32() {
        assert_eq!(category_color("Restaurant"), "#457028");
        assert_eq!(
            category_color("Restaurant mit Bar und Hotelbetrieb"),
            "#d25538"
        );
        assert_eq!(category_color("Hotel"), "#2c2800");
        assert_eq!(category_color("Imbiss"), "#9b7700");
    }

    #[test]
    fn hashes_utf16_code_units() {
        assert_eq!(category_color("Café"), "#950c00");
        assert_eq!(category_color("Zürich"), "#72b600");
    }

    #[test]
    fn color_is_deterministic_and_well_formed() {
        for s in ["Restaurant", "Bar", "Take-Away", "Café / Bäckerei", "x"] {
            let a = category_color(s);
            assert_eq!(a, category_color(s));
            assert_eq!(a.len(), 7);
            assert!(a.starts_with('#'));
            assert!(a[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn arc_colors_dedupe_categories() {
        let colors = ArcColors::from_categories(["Restaurant", "Bar", "Restaurant"]);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors.color_of("Bar"), "#e70300");
        assert_eq!(colors.color_of("Unbekannt"), category_color("Unbekannt"));
        let json = serde_json::to_string(&colors).unwrap();
        assert_eq!(json, r##"{"Bar":"#e70300","Restaurant":"#457028"}"##);
    }
}
