use futures::executor::block_on;
use gastromap_core::prelude::*;
use std::collections::BTreeSet;

const DISTRICTS: &str = include_str!("fixtures/districts.json");
const POIS: &str = include_str!("fixtures/pois.json");

fn source() -> MemorySource {
    let config = MapConfig::default();
    MemorySource::new()
        .with(config.data.districts, DISTRICTS)
        .with(config.data.pois, POIS)
}

fn ready_controller() -> MapController<HeadlessRenderer, MemorySource> {
    let mut controller = MapController::new(
        MapConfig::default(),
        HeadlessRenderer::new(PixelSize::new(1280.0, 800.0)),
        source(),
    );
    block_on(controller.initialize()).expect("bootstrap");
    controller
}

fn expected_indices(pois: &[Poi], value: &str) -> Vec<usize> {
    pois.iter()
        .enumerate()
        .filter(|(_, p)| value.is_empty() || p.category() == value)
        .map(|(i, _)| i)
        .collect()
}

fn clustered_indices(renderer: &HeadlessRenderer) -> BTreeSet<usize> {
    renderer
        .clusters
        .iter()
        .flat_map(|c| c.members.iter().copied())
        .collect()
}

#[test]
fn bootstrap_runs_every_step_in_order() {
    let controller = ready_controller();
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(
        controller.renderer().ops,
        [
            RenderOp::InitBaseMap,
            RenderOp::AddDistricts(3),
            RenderOp::FitBounds,
            RenderOp::ClearPois,
            RenderOp::AddPois(8),
            RenderOp::ClearClusters,
            RenderOp::ClusterPois(8),
            RenderOp::AddFilterControl(7),
            RenderOp::AddAttribution,
        ]
    );
    let attributions = &controller.renderer().attributions;
    assert!(attributions[0].contains("swisstopo"));
    assert!(attributions.last().unwrap().contains("Open Data Stadt Zürich"));
    assert!(controller.renderer().error.is_none());
}

#[test]
fn viewport_contains_all_districts() {
    let controller = ready_controller();
    let district_bounds = controller.state().district_bounds.unwrap();
    assert_eq!(district_bounds.south_west, LatLng::new(47.3640, 8.5000));
    assert_eq!(district_bounds.north_east, LatLng::new(47.4350, 8.5800));

    let visible = controller.renderer().visible_bounds().unwrap();
    assert!(visible.contains(&district_bounds), "{visible:?}");
    let zoom = controller.renderer().viewport.unwrap().zoom;
    assert!((10.0..=19.0).contains(&zoom));
}

#[test]
fn dropdown_lists_all_categories_case_insensitively() {
    let controller = ready_controller();
    let labels: Vec<_> = controller
        .renderer()
        .filter_options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(
        labels,
        ["-- kein Filter gewählt --", "Bar", "bar", "Café", "Hotel", "Imbiss", "Restaurant"]
    );
    assert_eq!(controller.renderer().filter_options[0].value, "");
    assert_eq!(controller.renderer().selected_filter.as_deref(), Some(""));
}

#[test]
fn every_filter_renders_exactly_its_subset() {
    let mut controller = ready_controller();
    let pois = controller.state().pois.clone();
    let mut values: Vec<String> = controller
        .category_options()
        .into_iter()
        .map(|o| o.value)
        .collect();
    values.push("Pizzeria".to_string());

    for value in &values {
        controller.set_filter(value).unwrap();
        let renderer = controller.renderer();
        let expected = expected_indices(&pois, value);
        assert_eq!(renderer.rendered_indices(), expected, "filter {value:?}");
        assert_eq!(
            clustered_indices(renderer),
            expected.iter().copied().collect::<BTreeSet<_>>(),
            "clusters for {value:?}"
        );
        assert_eq!(renderer.clustered_marker_count(), expected.len());
    }
}

#[test]
fn filter_change_rebuilds_in_fixed_order() {
    let mut controller = ready_controller();
    let before = controller.renderer().ops.len();
    controller.set_filter("Restaurant").unwrap();
    assert_eq!(
        controller.renderer().ops[before..],
        [
            RenderOp::ClearPois,
            RenderOp::AddPois(3),
            RenderOp::ClearClusters,
            RenderOp::ClusterPois(3),
        ]
    );
}

#[test]
fn filter_round_trip_restores_rendered_set() {
    let mut controller = ready_controller();
    controller.set_filter("Bar").unwrap();
    let first = controller.renderer().poi_layer.clone();
    let first_clusters = controller.renderer().clusters.clone();

    controller.set_filter("Restaurant").unwrap();
    assert_ne!(controller.renderer().poi_layer, first);

    controller.set_filter("Bar").unwrap();
    assert_eq!(controller.renderer().poi_layer, first);
    assert_eq!(controller.renderer().clusters, first_clusters);

    controller.set_filter("").unwrap();
    assert_eq!(controller.renderer().poi_layer.len(), 8);
}

#[test]
fn selecting_an_unlisted_category_changes_nothing() {
    let mut controller = ready_controller();
    controller.select_option("Bar").unwrap();
    let ops = controller.renderer().ops.len();
    let shown = controller.renderer().poi_layer.clone();

    let err = controller.select_option("Pizzeria").unwrap_err();
    assert!(matches!(err, MapError::UnknownCategory(ref v) if v == "Pizzeria"));
    assert_eq!(controller.state().filter.value(), "Bar");
    assert_eq!(controller.renderer().ops.len(), ops);
    assert_eq!(controller.renderer().poi_layer, shown);

    controller.select_option("").unwrap();
    assert_eq!(controller.renderer().poi_layer.len(), 8);
}

#[test]
fn selecting_before_load_is_out_of_order() {
    let mut controller = MapController::new(
        MapConfig::default(),
        HeadlessRenderer::new(PixelSize::new(1024.0, 768.0)),
        source(),
    );
    assert!(matches!(
        controller.select_option("Bar"),
        Err(MapError::OutOfOrder { .. })
    ));
}

#[test]
fn filter_matching_is_case_sensitive() {
    let mut controller = ready_controller();
    controller.set_filter("bar").unwrap();
    let names: Vec<_> = controller
        .renderer()
        .poi_layer
        .iter()
        .map(|m| m.category.as_str())
        .collect();
    assert_eq!(names, ["bar"]);
}

#[test]
fn markers_carry_category_colors_and_popups() {
    let controller = ready_controller();
    for marker in &controller.renderer().poi_layer {
        assert_eq!(marker.color, category_color(&marker.category));
        assert!(marker.icon.html.contains(&marker.color));
        assert!(marker.popup_html.contains(&format!("--marker-color: {};", marker.color)));
    }
    let zeughaus = &controller.renderer().poi_layer[0];
    assert!(zeughaus.popup_html.contains("<h3>Zeughauskeller</h3>"));
    assert!(zeughaus
        .popup_html
        .contains("<p>Bahnhofstrasse 28a<br/>8001 Zürich</p>"));
    assert_eq!(controller.state().arc_colors.color_of("Bar"), "#e70300");
}

#[test]
fn clusters_split_into_category_arcs() {
    let controller = ready_controller();
    let state = controller.state();
    for cluster in &controller.renderer().clusters {
        let arcs = cluster.donut_arcs(&state.arc_colors);
        assert_eq!(arcs.len(), cluster.category_counts().len());
        let total: usize = arcs.iter().map(|a| a.count).sum();
        assert_eq!(total, cluster.len());
        for arc in &arcs {
            assert_eq!(arc.color, category_color(&arc.category));
        }
    }
}

#[test]
fn two_restaurants_and_a_bar() {
    let pois = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [8.54, 47.37] },
          "properties": { "betriebsart": "Restaurant", "betriebsname": "A", "strasselang": "Gasse", "hnr": "1", "plz": "8001", "ort": "Zürich" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [8.55, 47.38] },
          "properties": { "betriebsart": "Bar", "betriebsname": "B", "strasselang": "Gasse", "hnr": "2", "plz": "8001", "ort": "Zürich" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [8.56, 47.39] },
          "properties": { "betriebsart": "Restaurant", "betriebsname": "C", "strasselang": "Gasse", "hnr": "3", "plz": "8001", "ort": "Zürich" } }
    ] }"#;
    let config = MapConfig::default();
    let source = MemorySource::new()
        .with(config.data.districts.clone(), DISTRICTS)
        .with(config.data.pois.clone(), pois);
    let mut controller =
        MapController::new(config, HeadlessRenderer::new(PixelSize::new(800.0, 600.0)), source);
    block_on(controller.initialize()).unwrap();

    let labels: Vec<_> = controller
        .category_options()
        .into_iter()
        .map(|o| o.label)
        .collect();
    assert_eq!(labels, ["-- kein Filter gewählt --", "Bar", "Restaurant"]);

    controller.set_filter("Restaurant").unwrap();
    let names: Vec<_> = controller
        .renderer()
        .poi_layer
        .iter()
        .map(|m| m.popup_html.contains("<h3>A</h3>") || m.popup_html.contains("<h3>C</h3>"))
        .collect();
    assert_eq!(names, [true, true]);
    assert_eq!(controller.renderer().rendered_indices(), [0, 2]);
}

#[test]
fn district_fetch_failure_halts_before_pois() {
    let config = MapConfig::default();
    let source = MemorySource::new().with(config.data.pois.clone(), POIS);
    let mut controller =
        MapController::new(config, HeadlessRenderer::new(PixelSize::new(800.0, 600.0)), source);

    let err = block_on(controller.initialize()).unwrap_err();
    assert!(err.is_fetch());
    assert_eq!(controller.phase(), Phase::Failed);
    let renderer = controller.renderer();
    assert_eq!(renderer.ops, [RenderOp::InitBaseMap, RenderOp::ShowError]);
    assert!(renderer.error.as_deref().unwrap().contains("stzh.adm_stadtkreise_a.json"));
    assert!(controller.set_filter("Bar").is_err());
}

#[test]
fn poi_parse_failure_keeps_districts_but_no_markers() {
    let config = MapConfig::default();
    let broken = POIS.replacen("\"betriebsname\"", "\"name\"", 1);
    let source = MemorySource::new()
        .with(config.data.districts.clone(), DISTRICTS)
        .with(config.data.pois.clone(), broken);
    let mut controller =
        MapController::new(config, HeadlessRenderer::new(PixelSize::new(800.0, 600.0)), source);

    let err = block_on(controller.initialize()).unwrap_err();
    assert!(err.is_parse());
    assert!(matches!(err, MapError::InvalidFeature { index: 0, .. }));
    let renderer = controller.renderer();
    assert_eq!(renderer.districts.len(), 3);
    assert!(renderer.poi_layer.is_empty());
    assert!(renderer.filter_options.is_empty());
    assert_eq!(renderer.ops.last(), Some(&RenderOp::ShowError));
    assert_eq!(renderer.attributions.len(), 1);
}

#[test]
fn empty_district_collection_cannot_be_fitted() {
    let config = MapConfig::default();
    let source = MemorySource::new()
        .with(
            config.data.districts.clone(),
            r#"{ "type": "FeatureCollection", "features": [] }"#,
        )
        .with(config.data.pois.clone(), POIS);
    let mut controller =
        MapController::new(config, HeadlessRenderer::new(PixelSize::new(800.0, 600.0)), source);

    let err = block_on(controller.initialize()).unwrap_err();
    assert!(matches!(err, MapError::InvalidBounds(_)));
    assert!(controller.renderer().poi_layer.is_empty());
}

#[test]
fn bootstrap_from_disk() {
    let config = MapConfig::from_json_str(
        r#"{ "data": { "districts": "tests/fixtures/districts.json", "pois": "tests/fixtures/pois.json" } }"#,
    )
    .unwrap();
    let mut controller = MapController::new(
        config,
        HeadlessRenderer::new(PixelSize::new(1024.0, 768.0)),
        FileSource::new(env!("CARGO_MANIFEST_DIR")),
    );
    block_on(controller.initialize()).unwrap();
    assert_eq!(controller.state().pois.len(), 8);
    assert_eq!(controller.state().districts.len(), 3);
}

#[test]
fn chunked_clustering_reports_progress() {
    let config = MapConfig::from_json_str(r#"{ "cluster": { "chunk_size": 3 } }"#).unwrap();
    let mut controller = MapController::new(
        config,
        HeadlessRenderer::new(PixelSize::new(1024.0, 768.0)),
        source(),
    );
    block_on(controller.initialize()).unwrap();
    assert_eq!(
        controller.renderer().cluster_progress,
        [(3, 8), (6, 8), (8, 8)]
    );
}
