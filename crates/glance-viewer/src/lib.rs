//! Glance Viewer - glTF model viewer
//!
//! Loads one model into a lit scene with orbit controls. The panel variant
//! adds controls for graphics quality, the light, the background, the
//! model's bounding box and a camera reset.
//!
//! Runs in the browser as a wasm module, or natively through the `glance`
//! launcher.

pub mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
mod ui;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );

    let mut config = glance_core::ViewerConfig::default();
    dom::apply_url_overrides(&mut config);

    if dom::ensure_canvas(&config.window.canvas).is_none() {
        tracing::error!("No document to attach the canvas to");
        return;
    }

    // Assets are served next to the page
    app::run(config, dom::viewport(), String::new());
}
