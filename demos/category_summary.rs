//! Category summary for a restaurant dataset
//!
//! Runs the full map bootstrap without a browser and prints:
//! - the dropdown entries and their marker colors
//! - how many restaurants and clusters each filter leaves on the map
//!
//! Usage: `cargo run --example category_summary [DATA_DIR]`
//! where DATA_DIR holds `districts.json` and `pois.json`
//! (defaults to the test fixtures of gastromap-core).

use futures::executor::block_on;
use gastromap_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== gastromap category summary ===\n");

    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "crates/gastromap-core/tests/fixtures".to_string());
    let config = MapConfig::from_json_str(&format!(
        r#"{{ "data": {{ "districts": "{dir}/districts.json", "pois": "{dir}/pois.json" }} }}"#
    ))?;

    let mut controller = MapController::new(
        config,
        HeadlessRenderer::new(PixelSize::new(1280.0, 800.0)),
        FileSource::new(env!("CARGO_MANIFEST_DIR")),
    );
    block_on(controller.initialize())?;

    let state = controller.state();
    if let Some(viewport) = controller.renderer().viewport {
        println!(
            "{} districts, view centered on {:.4}, {:.4} at zoom {}",
            state.districts.len(),
            viewport.center.lat,
            viewport.center.lng,
            viewport.zoom
        );
    }
    println!("{} restaurants\n", state.pois.len());

    println!("--- Categories ---");
    for option in controller.category_options().iter().skip(1) {
        println!(
            "  {:<40} {}",
            option.label,
            state.arc_colors.color_of(&option.value)
        );
    }
    println!();

    println!("--- Filters ---");
    let values: Vec<String> = controller
        .category_options()
        .into_iter()
        .map(|o| o.value)
        .collect();
    for value in &values {
        controller.set_filter(value)?;
        let renderer = controller.renderer();
        let label = if value.is_empty() { "(all)" } else { value.as_str() };
        println!(
            "  {:<40} {:>5} markers in {:>4} clusters",
            label,
            renderer.poi_layer.len(),
            renderer.clusters.len()
        );
    }

    Ok(())
}
