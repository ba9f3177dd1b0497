//! Error handling example for gastromap
//!
//! Shows how bootstrap failures surface: missing datasets, malformed
//! features, empty district collections and calls made out of order.

use futures::executor::block_on;
use gastromap_rs::prelude::*;

const DISTRICTS: &str = include_str!("../crates/gastromap-core/tests/fixtures/districts.json");
const POIS: &str = include_str!("../crates/gastromap-core/tests/fixtures/pois.json");

fn bootstrap(source: MemorySource) -> MapController<HeadlessRenderer, MemorySource> {
    let mut controller = MapController::new(
        MapConfig::default(),
        HeadlessRenderer::new(PixelSize::new(1024.0, 768.0)),
        source,
    );
    match block_on(controller.initialize()) {
        Ok(()) => println!("  ✓ map ready"),
        Err(e) if e.is_fetch() => println!("  ✗ fetch error: {e}"),
        Err(e) if e.is_parse() => println!("  ✗ parse error: {e}"),
        Err(e) => println!("  ✗ {e}"),
    }
    println!(
        "  phase: {:?}, markers: {}, shown error: {:?}",
        controller.phase(),
        controller.renderer().poi_layer.len(),
        controller.renderer().error
    );
    controller
}

fn main() -> Result<()> {
    println!("=== gastromap error handling example ===\n");
    let data = MapConfig::default().data;

    println!("--- Example 1: Both datasets present ---");
    let mut ready = bootstrap(
        MemorySource::new()
            .with(data.districts.clone(), DISTRICTS)
            .with(data.pois.clone(), POIS),
    );
    println!();

    println!("--- Example 2: District dataset missing ---");
    bootstrap(MemorySource::new().with(data.pois.clone(), POIS));
    println!();

    println!("--- Example 3: Restaurant without a name ---");
    bootstrap(
        MemorySource::new()
            .with(data.districts.clone(), DISTRICTS)
            .with(data.pois.clone(), POIS.replacen("\"betriebsname\"", "\"name\"", 1)),
    );
    println!();

    println!("--- Example 4: No districts to fit the view to ---");
    bootstrap(
        MemorySource::new()
            .with(data.districts.clone(), r#"{ "type": "FeatureCollection", "features": [] }"#)
            .with(data.pois.clone(), POIS),
    );
    println!();

    println!("--- Example 5: Filtering before the map is ready ---");
    let mut fresh = MapController::new(
        MapConfig::default(),
        HeadlessRenderer::new(PixelSize::new(1024.0, 768.0)),
        MemorySource::new(),
    );
    if let Err(e) = fresh.set_filter("Bar") {
        println!("  ✗ {e}");
    }
    println!();

    println!("--- Example 6: Unknown categories ---");
    if let Err(e) = ready.select_option("Pizzeria") {
        println!("  ✗ dropdown: {e}");
    }
    ready.set_filter("Pizzeria")?;
    println!("  markers for \"Pizzeria\": {}", ready.renderer().poi_layer.len());

    Ok(())
}
