//! Window size tracking and the scaled render target
//!
//! The 3D camera draws into an offscreen image sized to the session's
//! drawing buffer (logical size times pixel ratio). A second camera shows
//! that image stretched over the whole window, so the graphics level
//! changes render resolution while the window, and the panel drawn on it,
//! keep the host's scale factor.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::window::PrimaryWindow;
use bevy_egui::PrimaryEguiContext;

use crate::session::Session;

/// Offscreen image the main camera renders into
#[derive(Resource)]
pub struct SceneTarget {
    pub image: Handle<Image>,
    pub size: UVec2,
}

impl FromWorld for SceneTarget {
    fn from_world(world: &mut World) -> Self {
        let size = buffer_size(&world.resource::<Session>().0);
        let image = world.resource_mut::<Assets<Image>>().add(target_image(size));
        Self { image, size }
    }
}

/// Camera that presents the scene image on the window
#[derive(Component)]
pub struct DisplayCamera;

/// Plugin for viewport tracking
pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTarget>()
            .add_systems(Startup, spawn_display)
            .add_systems(PreUpdate, track_viewport)
            .add_systems(PostUpdate, resize_scene_target);
    }
}

fn buffer_size(session: &glance_core::ViewerSession) -> UVec2 {
    let (width, height) = session.surface.drawing_buffer_size();
    UVec2::new(width.max(1), height.max(1))
}

fn target_image(size: UVec2) -> Image {
    let extent = Extent3d {
        width: size.x,
        height: size.y,
        ..default()
    };
    let mut image = Image::new_fill(
        extent,
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

fn spawn_display(mut commands: Commands, target: Res<SceneTarget>) {
    let camera = commands
        .spawn((
            Camera2d,
            Camera {
                order: 1,
                ..default()
            },
            DisplayCamera,
            // The panel belongs on the window, not in the scaled scene image
            PrimaryEguiContext,
        ))
        .id();

    commands.spawn((
        ImageNode::new(target.image.clone()),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        UiTargetCamera(camera),
    ));
}

/// Window resized or moved to a display with another density
pub fn track_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<Session>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let resolution = &window.resolution;

    let device_ratio = resolution.scale_factor();
    let width = resolution.width();
    let height = resolution.height();
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let surface = &session.surface;
    if surface.width != width || surface.height != height {
        session.resize(width, height);
    }
    if session.surface.device_pixel_ratio() != device_ratio {
        tracing::debug!(ratio = device_ratio, "Device pixel ratio changed");
        session.set_device_pixel_ratio(device_ratio);
    }
}

/// Keep the scene image at the session's drawing buffer size
pub fn resize_scene_target(
    session: Res<Session>,
    mut target: ResMut<SceneTarget>,
    mut images: ResMut<Assets<Image>>,
) {
    let size = buffer_size(&session.0);
    if size == target.size {
        return;
    }
    let Some(image) = images.get_mut(&target.image) else {
        return;
    };
    image.resize(Extent3d {
        width: size.x,
        height: size.y,
        ..default()
    });
    tracing::info!(
        width = size.x,
        height = size.y,
        ratio = session.surface.pixel_ratio,
        "Render target resized"
    );
    target.size = size;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::{GraphicsLevel, ViewerAction, ViewerConfig, ViewerSession, Viewport};

    fn test_app(width: u32, height: u32, scale: f32) -> App {
        let mut app = App::new();
        app.insert_resource(Session(ViewerSession::new(
            &ViewerConfig::default(),
            Viewport::new(800.0, 600.0),
        )))
        .init_resource::<Assets<Image>>()
        .init_resource::<SceneTarget>()
        .add_systems(Update, (track_viewport, resize_scene_target).chain());

        let mut window = Window::default();
        window.resolution.set_physical_resolution(width, height);
        window.resolution.set_scale_factor(scale);
        app.world_mut().spawn((window, PrimaryWindow));
        app
    }

    fn target_image_size(app: &App) -> UVec2 {
        let target = app.world().resource::<SceneTarget>();
        let image = app.world().resource::<Assets<Image>>().get(&target.image).unwrap();
        image.size()
    }

    fn window_scale_override(app: &mut App) -> Option<f32> {
        let mut query = app.world_mut().query::<&Window>();
        query.single(app.world()).unwrap().resolution.scale_factor_override()
    }

    fn set_graphics(app: &mut App, level: GraphicsLevel) {
        app.world_mut()
            .resource_mut::<Session>()
            .dispatch(ViewerAction::SetGraphicsLevel(level))
            .unwrap();
        app.update();
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut app = test_app(1280, 720, 1.0);
        app.update();

        let session = app.world().resource::<Session>();
        assert_eq!(session.surface.width, 1280.0);
        assert_eq!(session.surface.height, 720.0);
        assert!((session.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(target_image_size(&app), UVec2::new(1280, 720));
    }

    #[test]
    fn test_device_ratio_followed_at_average() {
        let mut app = test_app(1600, 1200, 2.0);
        app.update();

        let session = app.world().resource::<Session>();
        assert_eq!(session.surface.width, 800.0);
        assert_eq!(session.surface.pixel_ratio, 2.0);
        assert_eq!(target_image_size(&app), UVec2::new(1600, 1200));
    }

    #[test]
    fn test_graphics_level_scales_render_target() {
        let mut app = test_app(1600, 1200, 2.0);
        app.update();

        set_graphics(&mut app, GraphicsLevel::Low);
        let (width, height) = app.world().resource::<Session>().surface.drawing_buffer_size();
        assert_eq!((width, height), (400, 300));
        assert_eq!(target_image_size(&app), UVec2::new(width, height));

        set_graphics(&mut app, GraphicsLevel::Fancy);
        assert_eq!(target_image_size(&app), UVec2::new(1600, 1200));

        // The window keeps the host scale factor and size
        assert_eq!(window_scale_override(&mut app), None);
        let session = app.world().resource::<Session>();
        assert_eq!((session.surface.width, session.surface.height), (800.0, 600.0));
    }

    #[test]
    fn test_render_target_follows_resize() {
        let mut app = test_app(1600, 1200, 2.0);
        app.update();
        set_graphics(&mut app, GraphicsLevel::Low);

        {
            let mut query = app.world_mut().query::<&mut Window>();
            let mut window = query.single_mut(app.world_mut()).unwrap();
            window.resolution.set_physical_resolution(1000, 800);
        }
        app.update();

        assert_eq!(target_image_size(&app), UVec2::new(250, 200));
    }
}
