//! Session and render-loop resources

use bevy::prelude::*;
use glance_core::{glam, RenderLoop, Rgb, ViewerSession};

/// The viewer session shared by every system
#[derive(Resource, Deref, DerefMut)]
pub struct Session(pub ViewerSession);

/// Frame driver; stopping it freezes the controls and deactivates the camera
#[derive(Resource, Default, Deref, DerefMut)]
pub struct ActiveRenderLoop(pub RenderLoop);

/// Run condition for systems that only make sense while frames are produced
pub fn render_loop_running(render_loop: Res<ActiveRenderLoop>) -> bool {
    render_loop.is_running()
}

pub fn to_vec3(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

pub fn to_color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_srgb_f32();
    Color::srgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_color(Rgb(0xffffff)), Color::srgb(1.0, 1.0, 1.0));
        assert_eq!(to_color(Rgb(0x000000)), Color::srgb(0.0, 0.0, 0.0));
    }
}
