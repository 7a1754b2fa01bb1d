//! Configuration loading and defaults

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::ConfigError;

/// Which viewer flavor to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Directional light, no panel, no auto-framing
    Basic,
    /// Full light rig, control panel, camera framed to the model
    #[default]
    Panel,
}

impl Variant {
    pub fn default_model_path(self) -> &'static str {
        match self {
            Variant::Basic => "models/model.gltf",
            Variant::Panel => "models/kate_pc_size_ref.glb",
        }
    }

    pub fn has_panel(self) -> bool {
        matches!(self, Variant::Panel)
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Variant::Basic),
            "panel" => Ok(Variant::Panel),
            other => Err(format!("unknown viewer variant: {}", other)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Basic => f.write_str("basic"),
            Variant::Panel => f.write_str("panel"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewer: ViewerSection,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerSection {
    #[serde(default)]
    pub variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelConfig {
    /// Model file relative to the asset root; the variant's fixed path when unset
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            position: default_camera_position(),
        }
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 5.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Inertia after pointer release
    #[serde(default = "default_true")]
    pub damping: bool,
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping: true,
            damping_factor: default_damping_factor(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_damping_factor() -> f32 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// CSS selector of the canvas element (wasm only)
    #[serde(default = "default_canvas")]
    pub canvas: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            canvas: default_canvas(),
        }
    }
}

fn default_title() -> String {
    "Glance".to_string()
}

fn default_canvas() -> String {
    "#viewer-canvas".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RenderConfig {
    /// Frame the camera to the model once it loads; the variant decides when unset
    #[serde(default)]
    pub framing: Option<bool>,
}

impl ViewerConfig {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            viewer: ViewerSection { variant },
            ..Default::default()
        }
    }

    pub fn variant(&self) -> Variant {
        self.viewer.variant
    }

    pub fn model_path(&self) -> &str {
        self.model
            .path
            .as_deref()
            .unwrap_or_else(|| self.variant().default_model_path())
    }

    pub fn framing_enabled(&self) -> bool {
        self.render
            .framing
            .unwrap_or(self.variant() == Variant::Panel)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = ViewerConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(ViewerConfig::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let mut config = ViewerConfig::default();
    config.model.path = Some(config.variant().default_model_path().to_string());
    config.render.framing = Some(true);

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}
