//! Model loading: start the glTF load, spawn its scene, measure its bounds

use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::camera::primitives::MeshAabb;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};
use glance_core::{glam, Aabb, LoadError, LoadedModel};

use crate::session::Session;

/// Marker for the root entity of the loaded model
#[derive(Component)]
pub struct ModelRoot;

/// Set on the model root once its scene instance has finished spawning
#[derive(Component)]
pub struct SceneReady;

/// Progress of the session's model through the asset server
#[derive(Resource, Default)]
pub struct ModelAsset {
    pub handle: Option<Handle<Gltf>>,
    pub root: Option<Entity>,
    /// Completion already delivered to the session
    pub reported: bool,
}

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelAsset>()
            .add_systems(Startup, start_model_load)
            .add_systems(
                Update,
                (poll_model_load, mark_scene_ready, measure_model).chain(),
            );
    }
}

fn start_model_load(
    asset_server: Res<AssetServer>,
    session: Res<Session>,
    mut model: ResMut<ModelAsset>,
) {
    let path = session.model_path().to_string();
    tracing::info!(path = %path, "Starting to load model");
    model.handle = Some(asset_server.load(path));
}

/// Wait for the glTF and everything it references, then spawn its scene
fn poll_model_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut model: ResMut<ModelAsset>,
    mut session: ResMut<Session>,
) {
    if model.reported || model.root.is_some() {
        return;
    }
    let Some(handle) = model.handle.clone() else {
        return;
    };

    let failure = match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Failed(err)) => Some(err.to_string()),
        _ => match asset_server.get_recursive_dependency_load_state(handle.id()) {
            Some(RecursiveDependencyLoadState::Failed(err)) => Some(err.to_string()),
            Some(RecursiveDependencyLoadState::Loaded) => {
                let Some(gltf) = gltf_assets.get(&handle) else {
                    return;
                };
                // Default scene, else the first one
                match gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) {
                    Some(scene_handle) => {
                        let root = commands
                            .spawn((SceneRoot(scene_handle), Transform::default(), ModelRoot))
                            .id();
                        model.root = Some(root);
                        tracing::debug!(path = session.model_path(), "Model scene spawned");
                        None
                    }
                    None => Some("glTF file contains no scenes".to_string()),
                }
            }
            // Still loading
            _ => None,
        },
    };

    if let Some(message) = failure {
        model.reported = true;
        let error = LoadError::new(session.model_path(), message);
        if let Err(e) = session.complete_load(Err(error)) {
            tracing::warn!("{}", e);
        }
    }
}

fn mark_scene_ready(
    mut commands: Commands,
    scene_spawner: Res<SceneSpawner>,
    roots: Query<(Entity, &SceneInstance), (With<ModelRoot>, Without<SceneReady>)>,
) {
    for (entity, instance) in roots.iter() {
        if scene_spawner.instance_is_ready(**instance) {
            commands.entity(entity).insert(SceneReady);
        }
    }
}

/// Once the spawned scene is ready and its transforms propagated, report its world bounds
fn measure_model(
    mut model: ResMut<ModelAsset>,
    mut session: ResMut<Session>,
    ready: Query<(), With<SceneReady>>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
) {
    if model.reported {
        return;
    }
    let Some(root) = model.root else {
        return;
    };
    if !ready.contains(root) {
        return;
    }

    let mut bounds = Aabb::EMPTY;
    collect_bounds(root, &children_query, &mesh_query, meshes.as_ref(), &mut bounds);
    if bounds.is_empty() {
        tracing::warn!(path = session.model_path(), "Model has no mesh geometry");
    }

    model.reported = true;
    let loaded = LoadedModel {
        source: session.model_path().to_string(),
        bounds,
    };
    if let Err(e) = session.complete_load(Ok(loaded)) {
        tracing::warn!("{}", e);
    }
}

/// Union of the world-space boxes of every mesh below `entity`
fn collect_bounds(
    entity: Entity,
    children_query: &Query<&Children>,
    mesh_query: &Query<(&Mesh3d, &GlobalTransform)>,
    mesh_assets: &Assets<Mesh>,
    bounds: &mut Aabb,
) {
    if let Ok((mesh_handle, global_transform)) = mesh_query.get(entity) {
        if let Some(aabb) = mesh_assets.get(&mesh_handle.0).and_then(|mesh| mesh.compute_aabb()) {
            let center = Vec3::from(aabb.center);
            let half = Vec3::from(aabb.half_extents);
            let local = Aabb::from_center_half_extents(
                glam::Vec3::from_array(center.to_array()),
                glam::Vec3::from_array(half.to_array()),
            );
            for corner in local.corners() {
                let world = global_transform.transform_point(Vec3::from_array(corner.to_array()));
                bounds.expand_by_point(glam::Vec3::from_array(world.to_array()));
            }
        }
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            collect_bounds(child, children_query, mesh_query, mesh_assets, bounds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use glance_core::config::ModelConfig;
    use glance_core::{ModelLoadState, ViewerConfig, ViewerSession, Viewport};
    use std::time::Duration;

    /// Updates in which the session resource was marked changed
    #[derive(Resource, Default)]
    struct SessionChanges(u32);

    fn count_session_changes(session: Res<Session>, mut changes: ResMut<SessionChanges>) {
        if session.is_changed() {
            changes.0 += 1;
        }
    }

    fn session_for(path: &str) -> Session {
        let config = ViewerConfig {
            model: ModelConfig {
                path: Some(path.to_string()),
            },
            ..ViewerConfig::default()
        };
        Session(ViewerSession::new(&config, Viewport::new(800.0, 600.0)))
    }

    fn bounds_of(world: &mut World, root: Entity) -> Aabb {
        world
            .run_system_once(
                move |children: Query<&Children>,
                      mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
                      meshes: Res<Assets<Mesh>>| {
                    let mut bounds = Aabb::EMPTY;
                    collect_bounds(root, &children, &mesh_query, meshes.as_ref(), &mut bounds);
                    bounds
                },
            )
            .unwrap()
    }

    #[test]
    fn test_collect_bounds_over_hierarchy() {
        let mut world = World::new();
        let mut meshes = Assets::<Mesh>::default();
        let cube = meshes.add(Cuboid::new(2.0, 2.0, 2.0));
        world.insert_resource(meshes);

        let root = world.spawn(GlobalTransform::IDENTITY).id();
        let near = world
            .spawn((Mesh3d(cube.clone()), GlobalTransform::IDENTITY))
            .id();
        let far = world
            .spawn((
                Mesh3d(cube),
                GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0)),
            ))
            .id();
        world.entity_mut(root).add_children(&[near, far]);

        let bounds = bounds_of(&mut world, root);
        assert_eq!(bounds.min, glam::Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, glam::Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_collect_bounds_without_meshes() {
        let mut world = World::new();
        world.insert_resource(Assets::<Mesh>::default());
        let root = world.spawn(GlobalTransform::IDENTITY).id();
        assert!(bounds_of(&mut world, root).is_empty());
    }

    #[test]
    fn test_missing_model_reports_failure() {
        let mut app = App::new();
        app.add_plugins((TaskPoolPlugin::default(), AssetPlugin::default()))
            .init_asset::<Gltf>()
            .insert_resource(session_for("models/does_not_exist.glb"))
            .init_resource::<ModelAsset>()
            .add_systems(Startup, start_model_load)
            .add_systems(Update, poll_model_load);

        for _ in 0..500 {
            app.update();
            if !matches!(app.world().resource::<Session>().load_state(), ModelLoadState::Pending) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        let session = app.world().resource::<Session>();
        match session.load_state() {
            ModelLoadState::Failed(e) => assert_eq!(e.path, "models/does_not_exist.glb"),
            other => panic!("expected a failed load, got {:?}", other),
        }
        assert!(session.scene.model.is_none());
        assert!(session.scene.bounding_box.is_none());
        assert!(app.world().resource::<ModelAsset>().reported);
    }

    #[test]
    fn test_ready_scene_reports_bounds_once() {
        let mut app = App::new();
        let mut meshes = Assets::<Mesh>::default();
        let cube = meshes.add(Cuboid::new(2.0, 2.0, 2.0));
        app.insert_resource(meshes)
            .insert_resource(session_for("models/cube.glb"))
            .init_resource::<ModelAsset>()
            .init_resource::<SessionChanges>()
            .add_systems(Update, (measure_model, count_session_changes).chain());

        let root = app
            .world_mut()
            .spawn((ModelRoot, GlobalTransform::IDENTITY))
            .id();
        let child = app
            .world_mut()
            .spawn((
                Mesh3d(cube),
                GlobalTransform::from(Transform::from_xyz(0.0, 3.0, 0.0)),
            ))
            .id();
        app.world_mut().entity_mut(root).add_child(child);
        app.world_mut().resource_mut::<ModelAsset>().root = Some(root);

        // Not ready yet: nothing reported
        app.update();
        assert!(!app.world().resource::<Session>().is_loaded());
        assert_eq!(app.world().resource::<SessionChanges>().0, 1);

        app.world_mut().entity_mut(root).insert(SceneReady);
        app.update();
        app.update();

        let session = app.world().resource::<Session>();
        assert!(session.is_loaded());
        let bounds = session.scene.model.as_ref().unwrap().bounds;
        assert_eq!(bounds.min, glam::Vec3::new(-1.0, 2.0, -1.0));
        assert_eq!(bounds.max, glam::Vec3::new(1.0, 4.0, 1.0));
        assert_eq!(session.controls.target, glam::Vec3::new(0.0, 3.0, 0.0));
        assert!(app.world().resource::<ModelAsset>().reported);
        // Initial insert plus exactly one completion
        assert_eq!(app.world().resource::<SessionChanges>().0, 2);
    }
}
