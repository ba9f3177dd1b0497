use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use gastromap_wasm::{category_color, category_options, current_filter, set_filter};

#[wasm_bindgen_test]
fn colors_match_the_core_hash() {
    gastromap_wasm::start();

    assert_eq!(category_color(""), "#000000");
    assert_eq!(category_color("Bar"), "#e70300");
    assert_eq!(category_color("Restaurant"), "#457028");
    assert_eq!(category_color("Café"), "#950c00");
}

#[wasm_bindgen_test]
fn nothing_to_filter_before_init() {
    gastromap_wasm::start();

    let options = category_options().unwrap();
    assert!(js_sys::Array::is_array(&options));
    assert_eq!(js_sys::Array::from(&options).length(), 0);
    assert_eq!(current_filter(), "");

    let err: JsValue = set_filter("Bar").unwrap_err();
    assert!(!err.is_undefined());
}
