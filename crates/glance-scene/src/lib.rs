//! Glance Scene - Bevy side of the viewer
//!
//! The viewer session from `glance-core` lives in the [`Session`] resource.
//! The plugins in this crate spawn the camera, lights, model and bounding
//! box overlay, feed pointer input into the orbit controls, and copy the
//! session state onto those entities every frame. The scene is rendered
//! offscreen at the session's pixel ratio and presented on the window.
//!
//! The app must insert a [`Session`] before adding [`GlanceScenePlugin`].

pub mod camera;
pub mod lights;
pub mod models;
pub mod overlay;
pub mod session;
pub mod viewport;

use bevy::prelude::*;

/// Plugin that sets up the shared 3D scene components
pub struct GlanceScenePlugin;

impl Plugin for GlanceScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<session::ActiveRenderLoop>()
            .add_plugins(viewport::ViewportPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(lights::LightsPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(overlay::OverlayPlugin);
    }
}

pub use camera::MainCamera;
pub use session::{to_color, to_vec3, ActiveRenderLoop, Session};
pub use viewport::SceneTarget;
