//! Camera spawning, orbit input and the per-frame camera update

use bevy::camera::RenderTarget;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use glance_core::{FrameTarget, OrbitControls, PerspectiveCamera, RenderSurface, Scene};

use crate::session::{render_loop_running, to_vec3, ActiveRenderLoop, Session};
use crate::viewport::SceneTarget;

/// Pixel-unit scroll events per wheel notch
const PIXELS_PER_LINE: f32 = 100.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, start_render_loop))
            .add_systems(
                Update,
                (
                    orbit_input.run_if(render_loop_running),
                    drive_frame,
                    sync_camera_activity,
                )
                    .chain(),
            );
    }
}

fn spawn_camera(mut commands: Commands, session: Res<Session>, target: Res<SceneTarget>) {
    let camera = &session.camera;
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(target.image.clone().into()),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_radians(),
            aspect_ratio: camera.aspect,
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(to_vec3(camera.position))
            .looking_at(to_vec3(session.controls.target), Vec3::Y),
        MainCamera,
    ));
}

fn start_render_loop(mut render_loop: ResMut<ActiveRenderLoop>) {
    render_loop.start();
}

/// Mouse and touch input accumulated into the orbit controls
fn orbit_input(
    mut session: ResMut<Session>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Pointer over the panel belongs to egui
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    // Controls state is read back every frame, not mirrored through change detection
    let viewer = &mut session.bypass_change_detection().0;
    let height = viewer.surface.height;
    let motion = mouse_motion.delta;

    if motion != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            viewer.controls.rotate_by_pixels(motion.x, motion.y, height);
        } else if mouse_button.pressed(MouseButton::Right) || mouse_button.pressed(MouseButton::Middle) {
            viewer
                .controls
                .pan_by_pixels(&viewer.camera, motion.x, motion.y, height);
        }
    }

    let steps = match mouse_scroll.unit {
        MouseScrollUnit::Line => mouse_scroll.delta.y,
        MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
    };
    viewer.controls.zoom_by_wheel(steps);

    // Single finger orbits
    if touch_input.iter().count() == 1 {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                viewer.controls.rotate_by_pixels(delta.x, delta.y, height);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            if curr_dist > 1.0 && prev_dist > 1.0 {
                viewer.controls.dolly_in(prev_dist / curr_dist);
            }
        }
    }
}

/// Hands the updated session camera to the engine, which renders it after `Update`
struct CameraFrame<'w> {
    transform: Mut<'w, Transform>,
    projection: Mut<'w, Projection>,
}

impl FrameTarget for CameraFrame<'_> {
    fn render(
        &mut self,
        _scene: &Scene,
        camera: &PerspectiveCamera,
        controls: &OrbitControls,
        _surface: &RenderSurface,
    ) {
        *self.transform = Transform::from_translation(to_vec3(camera.position))
            .looking_at(to_vec3(controls.target), Vec3::Y);

        if let Projection::Perspective(perspective) = self.projection.as_mut() {
            perspective.fov = camera.fov_radians();
            perspective.aspect_ratio = camera.aspect;
            perspective.near = camera.near;
            perspective.far = camera.far;
        }
    }
}

/// One render-loop tick: controls update, then the camera handed to the renderer
fn drive_frame(
    mut session: ResMut<Session>,
    mut render_loop: ResMut<ActiveRenderLoop>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok((transform, projection)) = camera_query.single_mut() else {
        return;
    };
    let mut frame = CameraFrame {
        transform,
        projection,
    };
    render_loop.tick(&mut session.bypass_change_detection().0, &mut frame);
}

/// A stopped loop stops drawing too
fn sync_camera_activity(
    render_loop: Res<ActiveRenderLoop>,
    mut cameras: Query<&mut Camera, With<MainCamera>>,
) {
    let running = render_loop.is_running();
    for mut camera in cameras.iter_mut() {
        if camera.is_active != running {
            camera.is_active = running;
        }
    }
}
