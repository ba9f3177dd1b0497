// crates/gastromap-core/src/cluster.rs

//! # Donut Clusters
//!
//! Proximity clustering of rendered markers and the per-category arcs a
//! cluster is drawn with. The browser hands display to the DonutCluster
//! plugin; this module computes the same grouping without one, so headless
//! rendering and tests can reason about clusters.
//!
//! Clustering is greedy in insertion order: a marker joins the first cluster
//! whose anchor lies within `radius` pixels at the given zoom, otherwise it
//! anchors a new cluster. A grid of `radius`-sized cells keeps the lookup
//! local.

use crate::color::ArcColors;
use crate::model::LatLng;
use crate::text::fold_key;
use crate::viewport::{project, Point};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

/// The markercluster plugin's default `maxClusterRadius`.
pub const DEFAULT_CLUSTER_RADIUS: f64 = 80.0;

/// What the cluster index needs to know about a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInput {
    pub position: LatLng,
    pub category: String,
}

/// A group of nearby markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Position of the marker that founded the cluster.
    pub anchor: LatLng,
    anchor_px: Point,
    /// Indices into the sequence of inputs, in insertion order.
    pub members: Vec<usize>,
    lat_sum: f64,
    lng_sum: f64,
    counts: BTreeMap<String, usize>,
}

impl Cluster {
    fn new(index: usize, input: &ClusterInput, px: Point) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(input.category.clone(), 1);
        Cluster {
            anchor: input.position,
            anchor_px: px,
            members: vec![index],
            lat_sum: input.position.lat,
            lng_sum: input.position.lng,
            counts,
        }
    }

    fn push(&mut self, index: usize, input: &ClusterInput) {
        self.members.push(index);
        self.lat_sum += input.position.lat;
        self.lng_sum += input.position.lng;
        *self.counts.entry(input.category.clone()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A lone marker is shown as itself, not as a donut.
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    pub fn centroid(&self) -> LatLng {
        let n = self.members.len() as f64;
        LatLng::new(self.lat_sum / n, self.lng_sum / n)
    }

    pub fn category_counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// One arc per category present, proportional to its share of the cluster.
    ///
    /// Arcs are laid out clockwise from 0 in the dropdown's category order.
    pub fn donut_arcs(&self, colors: &ArcColors) -> Vec<DonutArc> {
        let total = self.members.len() as f64;
        let mut categories: Vec<(&String, &usize)> = self.counts.iter().collect();
        categories.sort_by_cached_key(|(c, _)| (fold_key(c), c.to_lowercase(), c.to_string()));

        let mut start = 0.0;
        categories
            .into_iter()
            .map(|(category, &count)| {
                let sweep = TAU * count as f64 / total;
                let arc = DonutArc {
                    category: category.clone(),
                    color: colors.color_of(category),
                    count,
                    start_angle: start,
                    end_angle: start + sweep,
                };
                start += sweep;
                arc
            })
            .collect()
    }
}

/// One colored segment of a cluster donut. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutArc {
    pub category: String,
    pub color: String,
    pub count: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Incremental cluster index for one zoom level.
#[derive(Debug, Clone)]
pub struct ClusterIndex {
    zoom: f64,
    radius: f64,
    clusters: Vec<Cluster>,
    grid: HashMap<(i64, i64), Vec<usize>>,
    added: usize,
}

impl ClusterIndex {
    pub fn new(zoom: f64, radius: f64) -> Self {
        ClusterIndex {
            zoom,
            radius: radius.max(f64::MIN_POSITIVE),
            clusters: Vec::new(),
            grid: HashMap::new(),
            added: 0,
        }
    }

    fn cell(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.radius).floor() as i64,
            (p.y / self.radius).floor() as i64,
        )
    }

    fn nearest_within_radius(&self, p: Point) -> Option<usize> {
        let (cx, cy) = self.cell(p);
        let mut best: Option<(usize, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &id in ids {
                    let a = self.clusters[id].anchor_px;
                    let dist = ((a.x - p.x).powi(2) + (a.y - p.y).powi(2)).sqrt();
                    if dist <= self.radius && best.map_or(true, |(b, d)| dist < d || (dist == d && id < b)) {
                        best = Some((id, dist));
                    }
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// Adds one marker; member indices count every marker ever added.
    pub fn add(&mut self, input: &ClusterInput) {
        let index = self.added;
        self.added += 1;
        let px = project(input.position, self.zoom);
        match self.nearest_within_radius(px) {
            Some(id) => self.clusters[id].push(index, input),
            None => {
                let id = self.clusters.len();
                let cell = self.cell(px);
                self.clusters.push(Cluster::new(index, input, px));
                self.grid.entry(cell).or_default().push(id);
            }
        }
    }

    /// Adds markers `chunk_size` at a time, calling `progress(processed, total)` after each chunk.
    pub fn extend_chunked<F>(&mut self, inputs: &[ClusterInput], chunk_size: usize, mut progress: F)
    where
        F: FnMut(usize, usize),
    {
        let total = inputs.len();
        let mut processed = 0;
        for chunk in inputs.chunks(chunk_size.max(1)) {
            for input in chunk {
                self.add(input);
            }
            processed += chunk.len();
            progress(processed, total);
        }
    }

    pub fn clear(&mut self) {
        self.clusters.clear();
        self.grid.clear();
        self.added = 0;
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn marker_count(&self) -> usize {
        self.added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(lat: f64, lng: f64, category: &str) -> ClusterInput {
        ClusterInput {
            position: LatLng::new(lat, lng),
            category: category.to_string(),
        }
    }

    #[test]
    fn nearby_markers_share_a_cluster() {
        let mut index = ClusterIndex::new(13.0, DEFAULT_CLUSTER_RADIUS);
        // ~20 m apart in the old town
        index.add(&input(47.3717, 8.5423, "Restaurant"));
        index.add(&input(47.3718, 8.5425, "Bar"));
        index.add(&input(47.3716, 8.5421, "Restaurant"));
        // Oerlikon, several km north
        index.add(&input(47.4111, 8.5442, "Bar"));

        let clusters = index.clusters();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, [0, 1, 2]);
        assert!(clusters[1].is_single());
        assert_eq!(clusters[0].category_counts()["Restaurant"], 2);
        assert_eq!(index.marker_count(), 4);
    }

    #[test]
    fn zooming_in_splits_clusters() {
        let markers = [input(47.3717, 8.5423, "Bar"), input(47.3740, 8.5450, "Bar")];
        let mut far = ClusterIndex::new(12.0, DEFAULT_CLUSTER_RADIUS);
        let mut near = ClusterIndex::new(18.0, DEFAULT_CLUSTER_RADIUS);
        for m in &markers {
            far.add(m);
            near.add(m);
        }
        assert_eq!(far.clusters().len(), 1);
        assert_eq!(near.clusters().len(), 2);
    }

    #[test]
    fn donut_has_one_arc_per_category() {
        let mut index = ClusterIndex::new(10.0, DEFAULT_CLUSTER_RADIUS);
        for category in ["Restaurant", "Bar", "Restaurant", "Café", "Restaurant"] {
            index.add(&input(47.37, 8.54, category));
        }
        let colors = ArcColors::from_categories(["Restaurant", "Bar", "Café"]);
        let cluster = &index.clusters()[0];
        let arcs = cluster.donut_arcs(&colors);

        let names: Vec<_> = arcs.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(names, ["Bar", "Café", "Restaurant"]);
        assert_eq!(arcs[2].count, 3);
        assert_eq!(arcs[0].color, "#e70300");
        assert_eq!(arcs[0].start_angle, 0.0);
        assert!((arcs.last().unwrap().end_angle - TAU).abs() < 1e-12);
        for pair in arcs.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        assert!((arcs[2].end_angle - arcs[2].start_angle - TAU * 0.6).abs() < 1e-12);
    }

    #[test]
    fn chunked_loading_reports_progress() {
        let inputs: Vec<_> = (0..7)
            .map(|i| input(47.30 + i as f64 * 0.02, 8.50, "Restaurant"))
            .collect();
        let mut index = ClusterIndex::new(15.0, DEFAULT_CLUSTER_RADIUS);
        let mut seen = Vec::new();
        index.extend_chunked(&inputs, 3, |done, total| seen.push((done, total)));
        assert_eq!(seen, [(3, 7), (6, 7), (7, 7)]);
        assert_eq!(index.marker_count(), 7);

        index.clear();
        assert!(index.clusters().is_empty());
        assert_eq!(index.marker_count(), 0);
    }

    #[test]
    fn centroid_averages_members() {
        let mut index = ClusterIndex::new(10.0, DEFAULT_CLUSTER_RADIUS);
        index.add(&input(47.36, 8.52, "Bar"));
        index.add(&input(47.38, 8.56, "Bar"));
        let c = index.clusters()[0].centroid();
        assert!((c.lat - 47.37).abs() < 1e-12);
        assert!((c.lng - 8.54).abs() < 1e-12);
        assert_eq!(index.clusters()[0].anchor, LatLng::new(47.36, 8.52));
    }
}
