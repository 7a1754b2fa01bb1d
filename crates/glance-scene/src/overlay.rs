//! Bounding box overlay around the loaded model

use bevy::prelude::*;
use glance_core::Aabb;

use crate::session::{to_vec3, Session};

/// Edge thickness as a fraction of the longest box side
const EDGE_THICKNESS_RATIO: f32 = 0.005;

/// Parent entity of the 12 box edges
#[derive(Component)]
pub struct BoundingBoxOverlay;

/// Plugin for the bounding box overlay
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_overlay, sync_overlay_visibility).chain());
    }
}

/// Center and size of each of the 12 edges of `bounds`
pub fn box_edges(bounds: &Aabb, thickness: f32) -> [(Vec3, Vec3); 12] {
    let min = to_vec3(bounds.min);
    let max = to_vec3(bounds.max);
    let mid = (min + max) / 2.0;
    let size = max - min;
    let t = thickness;

    let along_x = Vec3::new(size.x, t, t);
    let along_y = Vec3::new(t, size.y, t);
    let along_z = Vec3::new(t, t, size.z);

    [
        (Vec3::new(mid.x, min.y, min.z), along_x),
        (Vec3::new(mid.x, max.y, min.z), along_x),
        (Vec3::new(mid.x, min.y, max.z), along_x),
        (Vec3::new(mid.x, max.y, max.z), along_x),
        (Vec3::new(min.x, mid.y, min.z), along_y),
        (Vec3::new(max.x, mid.y, min.z), along_y),
        (Vec3::new(min.x, mid.y, max.z), along_y),
        (Vec3::new(max.x, mid.y, max.z), along_y),
        (Vec3::new(min.x, min.y, mid.z), along_z),
        (Vec3::new(max.x, min.y, mid.z), along_z),
        (Vec3::new(min.x, max.y, mid.z), along_z),
        (Vec3::new(max.x, max.y, mid.z), along_z),
    ]
}

fn spawn_overlay(
    mut commands: Commands,
    session: Res<Session>,
    existing: Query<(), With<BoundingBoxOverlay>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !existing.is_empty() {
        return;
    }
    let Some(helper) = &session.scene.bounding_box else {
        return;
    };
    if helper.bounds.is_empty() {
        return;
    }

    let size = helper.bounds.size();
    let thickness = (size.max_element() * EDGE_THICKNESS_RATIO).max(1e-4);

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 1.0, 0.0),
        unlit: true,
        ..default()
    });

    let visibility = if helper.visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    commands
        .spawn((BoundingBoxOverlay, Transform::default(), visibility))
        .with_children(|parent| {
            for (center, edge) in box_edges(&helper.bounds, thickness) {
                parent.spawn((
                    Mesh3d(meshes.add(Cuboid::new(edge.x, edge.y, edge.z))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(center),
                ));
            }
        });

    tracing::debug!(visible = helper.visible, "Bounding box overlay created");
}

fn sync_overlay_visibility(
    session: Res<Session>,
    mut overlays: Query<&mut Visibility, With<BoundingBoxOverlay>>,
) {
    let Some(helper) = &session.scene.bounding_box else {
        return;
    };
    let wanted = if helper.visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in overlays.iter_mut() {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::{glam, LoadedModel, ViewerAction, ViewerConfig, ViewerSession, Viewport};

    #[test]
    fn test_box_edges() {
        let bounds = Aabb::new(glam::Vec3::new(-1.0, 0.0, -2.0), glam::Vec3::new(1.0, 4.0, 2.0));
        let edges = box_edges(&bounds, 0.1);

        let along_x = edges.iter().filter(|(_, s)| s.x == 2.0).count();
        let along_y = edges.iter().filter(|(_, s)| s.y == 4.0).count();
        let along_z = edges.iter().filter(|(_, s)| s.z == 4.0).count();
        assert_eq!((along_x, along_y, along_z), (4, 4, 4));

        assert!(edges.contains(&(Vec3::new(0.0, 0.0, -2.0), Vec3::new(2.0, 0.1, 0.1))));
        assert!(edges.contains(&(Vec3::new(1.0, 4.0, 0.0), Vec3::new(0.1, 0.1, 4.0))));
    }

    fn overlay_visibility(app: &mut App) -> Option<Visibility> {
        let mut query = app
            .world_mut()
            .query_filtered::<&Visibility, With<BoundingBoxOverlay>>();
        query.iter(app.world()).next().copied()
    }

    #[test]
    fn test_overlay_follows_toggle() {
        let mut app = App::new();
        app.insert_resource(Session(ViewerSession::new(
            &ViewerConfig::default(),
            Viewport::new(800.0, 600.0),
        )))
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .add_systems(Update, (spawn_overlay, sync_overlay_visibility).chain());

        // Nothing to draw before a model
        app.update();
        assert_eq!(overlay_visibility(&mut app), None);

        app.world_mut()
            .resource_mut::<Session>()
            .complete_load(Ok(LoadedModel {
                source: "model.glb".to_string(),
                bounds: Aabb::new(glam::Vec3::splat(-1.0), glam::Vec3::splat(1.0)),
            }))
            .unwrap();
        app.update();
        assert_eq!(overlay_visibility(&mut app), Some(Visibility::Hidden));

        app.world_mut()
            .resource_mut::<Session>()
            .dispatch(ViewerAction::ToggleBoundingBox)
            .unwrap();
        app.update();
        assert_eq!(overlay_visibility(&mut app), Some(Visibility::Inherited));

        let mut query = app.world_mut().query::<&Mesh3d>();
        assert_eq!(query.iter(app.world()).count(), 12);
    }
}
