// crates/gastromap-core/src/filter.rs

//! Category filter state and the options offered by the filter dropdown.

use crate::model::Poi;
use crate::text::fold_key;
use serde::Serialize;
use std::collections::BTreeSet;

/// Label of the leading dropdown entry that shows every category.
pub const NO_FILTER_LABEL: &str = "-- kein Filter gewählt --";

/// The currently selected category, if any.
///
/// An empty selection (the dropdown value `""`) lets every feature through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter(Option<String>);

impl CategoryFilter {
    pub fn none() -> Self {
        CategoryFilter(None)
    }

    /// Builds a filter from a dropdown value; `""` means no filter.
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            CategoryFilter(None)
        } else {
            CategoryFilter(Some(value.to_string()))
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The value the dropdown shows for this filter.
    pub fn value(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Exact, case-sensitive category match.
    #[inline]
    pub fn matches(&self, category: &str) -> bool {
        match &self.0 {
            None => true,
            Some(selected) => selected == category,
        }
    }

    #[inline]
    pub fn accepts(&self, poi: &Poi) -> bool {
        self.matches(poi.category())
    }

    /// Indices of the features that pass the filter, in dataset order.
    pub fn apply<'a>(&'a self, pois: &'a [Poi]) -> impl Iterator<Item = (usize, &'a Poi)> + 'a {
        pois.iter().enumerate().filter(|(_, p)| self.accepts(p))
    }
}

/// One entry of the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn no_filter(label: &str) -> Self {
        FilterOption {
            label: label.to_string(),
            value: String::new(),
        }
    }

    pub fn category(category: &str) -> Self {
        FilterOption {
            label: category.to_string(),
            value: category.to_string(),
        }
    }
}

/// Distinct categories of `pois`, sorted case- and accent-insensitively.
pub fn sorted_categories(pois: &[Poi]) -> Vec<&str> {
    let distinct: BTreeSet<&str> = pois.iter().map(Poi::category).collect();
    let mut categories: Vec<&str> = distinct.into_iter().collect();
    categories.sort_by_cached_key(|c| (fold_key(c), c.to_lowercase(), c.to_string()));
    categories
}

/// Dropdown entries: the "no filter" entry followed by every category of the full dataset.
pub fn category_options(pois: &[Poi], no_filter_label: &str) -> Vec<FilterOption> {
    std::iter::once(FilterOption::no_filter(no_filter_label))
        .chain(sorted_categories(pois).into_iter().map(FilterOption::category))
        .collect()
}
