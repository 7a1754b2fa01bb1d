//! The viewer session: every piece of mutable viewer state, and the
//! handlers that mutate it.
//!
//! A session is created once per viewer instance. The engine layer feeds
//! it three kinds of input: the model load completion (exactly once), one
//! frame advance per displayed frame, and panel actions.

use glam::Vec3;
use tracing::{debug, error, info, warn};

use crate::camera::{CameraSnapshot, PerspectiveCamera};
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::error::{LoadError, ViewerError};
use crate::panel::{GraphicsLevel, PanelState, ViewerAction};
use crate::scene::{LightRig, LoadedModel, Scene};
use crate::surface::{RenderSurface, Viewport};

/// Framed models never get a size below this, so clip planes stay valid
const MIN_FRAMING_SIZE: f32 = 1e-3;
const MIN_DISTANCE_FACTOR: f32 = 0.1;
const MAX_DISTANCE_FACTOR: f32 = 10.0;

/// Progress of the one model load a session performs
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelLoadState {
    #[default]
    Pending,
    Loaded,
    Failed(LoadError),
}

#[derive(Debug, Clone)]
pub struct ViewerSession {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub surface: RenderSurface,
    pub panel: PanelState,
    model_path: String,
    framing: bool,
    load_state: ModelLoadState,
    initial_view: Option<CameraSnapshot>,
}

impl ViewerSession {
    /// Build the scene, camera and surface for a viewport
    pub fn new(config: &ViewerConfig, viewport: Viewport) -> Self {
        let variant = config.variant();
        let lights = if variant.has_panel() {
            LightRig::full()
        } else {
            LightRig::basic()
        };

        let mut camera = PerspectiveCamera::new(
            config.camera.fov,
            1.0,
            config.camera.near,
            config.camera.far,
        );
        camera.position = Vec3::from_array(config.camera.position);
        camera.set_viewport(viewport.width, viewport.height);

        let controls = OrbitControls::new(config.controls.damping, config.controls.damping_factor);

        info!(
            variant = %variant,
            model = config.model_path(),
            width = viewport.width,
            height = viewport.height,
            "Viewer session created"
        );

        Self {
            scene: Scene::new(lights),
            camera,
            controls,
            surface: RenderSurface::new(viewport),
            panel: PanelState::default(),
            model_path: config.model_path().to_string(),
            framing: config.framing_enabled(),
            load_state: ModelLoadState::Pending,
            initial_view: None,
        }
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn load_state(&self) -> &ModelLoadState {
        &self.load_state
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == ModelLoadState::Loaded
    }

    pub fn initial_view(&self) -> Option<CameraSnapshot> {
        self.initial_view
    }

    pub fn camera_snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.camera.position,
            target: self.controls.target,
        }
    }

    /// Deliver the asynchronous load result. Accepted once; later calls are rejected.
    pub fn complete_load(&mut self, outcome: Result<LoadedModel, LoadError>) -> Result<(), ViewerError> {
        if self.load_state != ModelLoadState::Pending {
            warn!(path = %self.model_path, "Ignoring duplicate model load completion");
            return Err(ViewerError::LoadAlreadyCompleted(self.model_path.clone()));
        }

        match outcome {
            Ok(model) => {
                info!(
                    path = %model.source,
                    min = ?model.bounds.min,
                    max = ?model.bounds.max,
                    "Model loaded"
                );
                self.scene.insert_model(model);
                if self.framing {
                    self.frame_model();
                }
                self.initial_view = Some(self.camera_snapshot());
                self.load_state = ModelLoadState::Loaded;
            }
            Err(e) => {
                error!("{}", e);
                self.load_state = ModelLoadState::Failed(e);
            }
        }
        Ok(())
    }

    /// Center the controls on the model and back the camera off proportionally to its size
    fn frame_model(&mut self) {
        let Some(bounds) = self.scene.model.as_ref().map(|m| m.bounds) else {
            return;
        };

        let size = bounds.size().length().max(MIN_FRAMING_SIZE);
        let center = bounds.center();

        self.controls.target = center;
        self.controls.min_distance = size * MIN_DISTANCE_FACTOR;
        self.controls.max_distance = size * MAX_DISTANCE_FACTOR;
        self.controls.stop_motion();

        self.camera.near = size / 100.0;
        self.camera.far = size * 100.0;
        self.camera.position = center + Vec3::new(size / 2.0, size / 5.0, size / 2.0);

        debug!(?center, size, "Camera framed to model");
    }

    /// Viewport changed: new aspect and surface size, no validation
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
        self.surface.set_size(width, height);
        debug!(width, height, "Viewport resized");
    }

    /// The host's pixel ratio changed; the average graphics level follows it
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        let follow = self.panel.graphics == GraphicsLevel::Average;
        self.surface.set_device_pixel_ratio(ratio, follow);
    }

    /// Per-frame controls update. Returns whether the camera moved.
    pub fn advance_frame(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }

    /// Apply a panel action. Model-dependent actions before the model has
    /// loaded leave the session untouched and report `ModelNotLoaded`.
    pub fn dispatch(&mut self, action: ViewerAction) -> Result<(), ViewerError> {
        if action.requires_model() && !self.is_loaded() {
            warn!(action = action.name(), "Model not yet loaded, action ignored");
            return Err(ViewerError::ModelNotLoaded(action.name()));
        }

        match action {
            ViewerAction::SetGraphicsLevel(level) => {
                self.panel.graphics = level;
                self.surface.pixel_ratio = level.pixel_ratio(self.surface.device_pixel_ratio());
                debug!(level = %level, ratio = self.surface.pixel_ratio, "Graphics level changed");
            }
            ViewerAction::ToggleLight => {
                let light = &mut self.scene.lights.directional;
                light.visible = !light.visible;
                self.panel.light_button_active = !self.panel.light_button_active;
            }
            ViewerAction::SetLightIntensity(intensity) => {
                self.scene.lights.directional.intensity = intensity;
                self.panel.intensity = intensity;
            }
            ViewerAction::SetBackground(theme) => {
                self.panel.background = theme;
                self.scene.background = Some(theme.color());
            }
            ViewerAction::ToggleBoundingBox => {
                if let Some(helper) = self.scene.bounding_box.as_mut() {
                    helper.toggle();
                }
                self.panel.bbox_button_active = !self.panel.bbox_button_active;
            }
            ViewerAction::ResetCamera => {
                if let Some(view) = self.initial_view {
                    self.camera.position = view.position;
                    self.controls.target = view.target;
                    self.controls.stop_motion();
                }
            }
            ViewerAction::ToggleMenu => {
                self.panel.menu_collapsed = !self.panel.menu_collapsed;
            }
        }
        Ok(())
    }
}
