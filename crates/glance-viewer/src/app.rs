//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::{EguiGlobalSettings, EguiPlugin};
use bevy_picking::DefaultPickingPlugins;
use glance_core::{BackgroundTheme, ViewerConfig, ViewerSession, Viewport};
use glance_scene::{to_color, GlanceScenePlugin, Session};

use crate::ui::UiPlugin;

/// Build the session from `config` and run the viewer until the window closes.
///
/// `asset_root` is the directory (or URL prefix on the web) the model path is
/// resolved against.
pub fn run(config: ViewerConfig, viewport: Viewport, asset_root: String) {
    let variant = config.variant();
    let session = ViewerSession::new(&config, viewport);

    tracing::info!(
        %variant,
        model = session.model_path(),
        asset_root = %asset_root,
        "Starting viewer"
    );

    let mut app = App::new();
    app.insert_resource(ClearColor(to_color(BackgroundTheme::default().color())))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        canvas: Some(config.window.canvas.clone()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: asset_root,
                    // Static hosting has no .meta files
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking before EguiPlugin so egui detects it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        // The scene camera renders offscreen; egui attaches to the display camera
        .insert_resource(EguiGlobalSettings {
            auto_create_primary_context: false,
            ..default()
        })
        .insert_resource(Session(session))
        .add_plugins(GlanceScenePlugin);

    if variant.has_panel() {
        app.add_plugins(UiPlugin);
    }

    app.run();
}
