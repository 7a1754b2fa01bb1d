//! Scene lighting and background

use bevy::prelude::*;
use glance_core::scene::LightRig;

use crate::session::{to_color, to_vec3, Session};

/// Illuminance (lux) for a directional light of intensity 1
pub const DIRECTIONAL_LUX_PER_UNIT: f32 = 10_000.0;
/// Ambient brightness for an ambient light of intensity 1
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 400.0;
/// Each half of the hemisphere light, per unit of intensity
pub const HEMISPHERE_LUX_PER_UNIT: f32 = 2_500.0;

/// Marker component for the main directional light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Which side of the hemisphere light an entity provides
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HemisphereHalf {
    Sky,
    Ground,
}

/// Plugin for scene lighting
pub struct LightsPlugin;

impl Plugin for LightsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lights)
            .add_systems(Update, (sync_directional_light, sync_background));
    }
}

fn setup_lights(mut commands: Commands, session: Res<Session>) {
    let rig: &LightRig = &session.scene.lights;
    let directional = &rig.directional;

    commands.spawn((
        DirectionalLight {
            color: to_color(directional.color),
            illuminance: directional.intensity * DIRECTIONAL_LUX_PER_UNIT,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(to_vec3(directional.position)).looking_at(Vec3::ZERO, Vec3::Y),
        visibility_for(directional.visible),
        MainDirectionalLight,
    ));

    if let Some(ambient) = &rig.ambient {
        commands.insert_resource(AmbientLight {
            color: to_color(ambient.color),
            brightness: ambient.intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
            ..default()
        });
    }

    // Sky color from straight above, ground color from straight below
    if let Some(hemisphere) = &rig.hemisphere {
        let illuminance = hemisphere.intensity * HEMISPHERE_LUX_PER_UNIT;
        commands.spawn((
            DirectionalLight {
                color: to_color(hemisphere.sky),
                illuminance,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(0.0, 1.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
            HemisphereHalf::Sky,
        ));
        commands.spawn((
            DirectionalLight {
                color: to_color(hemisphere.ground),
                illuminance,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(0.0, -1.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
            HemisphereHalf::Ground,
        ));
    }

    tracing::info!(
        ambient = rig.ambient.is_some(),
        hemisphere = rig.hemisphere.is_some(),
        "Lights added"
    );
}

fn visibility_for(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Panel changes to the directional light: visibility and intensity
pub fn sync_directional_light(
    session: Res<Session>,
    mut lights: Query<(&mut DirectionalLight, &mut Visibility), With<MainDirectionalLight>>,
) {
    if !session.is_changed() {
        return;
    }
    let source = &session.scene.lights.directional;
    for (mut light, mut visibility) in lights.iter_mut() {
        let illuminance = source.intensity * DIRECTIONAL_LUX_PER_UNIT;
        if light.illuminance != illuminance {
            light.illuminance = illuminance;
        }
        let wanted = visibility_for(source.visible);
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

/// Scene background, when set, becomes the clear color
pub fn sync_background(session: Res<Session>, mut clear_color: ResMut<ClearColor>) {
    if !session.is_changed() {
        return;
    }
    if let Some(background) = session.scene.background {
        let color = to_color(background);
        if clear_color.0 != color {
            clear_color.0 = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::{BackgroundTheme, ViewerAction, ViewerConfig, ViewerSession, Viewport};

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(Session(ViewerSession::new(
            &ViewerConfig::default(),
            Viewport::new(800.0, 600.0),
        )))
        .insert_resource(ClearColor(Color::BLACK))
        .add_systems(Update, (sync_directional_light, sync_background));
        app
    }

    #[test]
    fn test_background_follows_session() {
        let mut app = test_app();
        app.update();
        assert_eq!(app.world().resource::<ClearColor>().0, Color::BLACK);

        app.world_mut()
            .resource_mut::<Session>()
            .dispatch(ViewerAction::SetBackground(BackgroundTheme::Light))
            .unwrap();
        app.update();
        assert_eq!(
            app.world().resource::<ClearColor>().0,
            to_color(BackgroundTheme::Light.color())
        );
    }

    #[test]
    fn test_light_toggle_and_intensity() {
        let mut app = test_app();
        let light = app
            .world_mut()
            .spawn((DirectionalLight::default(), Visibility::Inherited, MainDirectionalLight))
            .id();

        {
            let mut session = app.world_mut().resource_mut::<Session>();
            session.dispatch(ViewerAction::ToggleLight).unwrap();
            session.dispatch(ViewerAction::SetLightIntensity(0.5)).unwrap();
        }
        app.update();

        let entity = app.world().entity(light);
        assert_eq!(entity.get::<Visibility>(), Some(&Visibility::Hidden));
        assert_eq!(
            entity.get::<DirectionalLight>().map(|l| l.illuminance),
            Some(0.5 * DIRECTIONAL_LUX_PER_UNIT)
        );

        app.world_mut()
            .resource_mut::<Session>()
            .dispatch(ViewerAction::ToggleLight)
            .unwrap();
        app.update();
        assert_eq!(
            app.world().entity(light).get::<Visibility>(),
            Some(&Visibility::Inherited)
        );
    }
}
