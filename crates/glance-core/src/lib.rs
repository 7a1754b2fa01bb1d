//! Glance Core - Engine-independent viewer state
//!
//! This crate holds everything the viewer decides on its own, with no
//! rendering engine involved:
//! - `ViewerSession`: scene contents, camera, orbit controls, surface and panel state
//! - Orbit control math with damping and distance limits
//! - Camera framing from the loaded model's bounding volume
//! - A cancellable render loop driving any `FrameTarget`
//! - TOML configuration

pub use glam;

pub mod bounds;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod panel;
pub mod render_loop;
pub mod scene;
pub mod session;
pub mod surface;

pub use bounds::{Aabb, BoundingBoxHelper};
pub use camera::{CameraSnapshot, PerspectiveCamera};
pub use config::{load_config, save_default_config, Variant, ViewerConfig};
pub use controls::OrbitControls;
pub use error::{ConfigError, LoadError, ViewerError};
pub use panel::{BackgroundTheme, GraphicsLevel, PanelState, ViewerAction};
pub use render_loop::{FrameTarget, RenderLoop, RenderLoopHandle};
pub use scene::{LightRig, LoadedModel, Rgb, Scene};
pub use session::{ModelLoadState, ViewerSession};
pub use surface::{RenderSurface, Viewport};
