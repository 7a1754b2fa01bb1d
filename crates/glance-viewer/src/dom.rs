//! Browser page plumbing: canvas, viewport size and URL parameters

use glance_core::{Variant, ViewerConfig, Viewport};

/// Create the render canvas under `<body>` unless the page already has it.
/// `selector` is the `#id` form used by the window config.
pub fn ensure_canvas(selector: &str) -> Option<()> {
    let window = web_sys::window()?;
    let document = window.document()?;

    if document.query_selector(selector).ok().flatten().is_some() {
        return Some(());
    }

    let id = selector.trim_start_matches('#');
    let canvas = document.create_element("canvas").ok()?;
    canvas.set_id(id);
    canvas
        .set_attribute("style", "display:block;width:100%;height:100%;")
        .ok()?;
    document.body()?.append_child(&canvas).ok()?;

    tracing::debug!(id, "Canvas created");
    Some(())
}

/// Inner window size and device pixel ratio at startup
pub fn viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::new(1.0, 1.0);
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    Viewport::new(width as f32, height as f32).with_device_pixel_ratio(window.device_pixel_ratio() as f32)
}

/// `?variant=basic|panel` and `?model=<path>` override the built-in config
pub fn apply_url_overrides(config: &mut ViewerConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(href) = window.location().href() else {
        return;
    };
    let Ok(url) = web_sys::Url::new(&href) else {
        return;
    };
    let params = url.search_params();

    if let Some(value) = params.get("variant") {
        match value.parse::<Variant>() {
            Ok(variant) => {
                tracing::info!(%variant, "Variant from URL parameter");
                config.viewer.variant = variant;
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    if let Some(model) = params.get("model").filter(|m| !m.is_empty()) {
        tracing::info!(model = %model, "Model from URL parameter");
        config.model.path = Some(model);
    }
}
