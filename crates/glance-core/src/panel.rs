//! Control panel state and the actions its widgets dispatch

use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;
use crate::scene::Rgb;

/// Graphics quality, expressed as a pixel density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsLevel {
    Low,
    #[default]
    Average,
    Fancy,
}

impl GraphicsLevel {
    pub const ALL: [GraphicsLevel; 3] = [GraphicsLevel::Low, GraphicsLevel::Average, GraphicsLevel::Fancy];

    pub fn pixel_ratio(self, device_pixel_ratio: f32) -> f32 {
        match self {
            GraphicsLevel::Low => 0.5,
            GraphicsLevel::Average => device_pixel_ratio,
            GraphicsLevel::Fancy => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GraphicsLevel::Low => "low",
            GraphicsLevel::Average => "average",
            GraphicsLevel::Fancy => "fancy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GraphicsLevel::Low => "Low",
            GraphicsLevel::Average => "Average",
            GraphicsLevel::Fancy => "Fancy",
        }
    }
}

impl FromStr for GraphicsLevel {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(GraphicsLevel::Low),
            "average" => Ok(GraphicsLevel::Average),
            "fancy" => Ok(GraphicsLevel::Fancy),
            other => Err(ViewerError::UnknownGraphicsLevel(other.to_string())),
        }
    }
}

impl fmt::Display for GraphicsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundTheme {
    Light,
    #[default]
    Dark,
}

impl BackgroundTheme {
    pub fn color(self) -> Rgb {
        match self {
            BackgroundTheme::Light => Rgb(0xf0f0f0),
            BackgroundTheme::Dark => Rgb(0x222222),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BackgroundTheme::Light => "Light",
            BackgroundTheme::Dark => "Dark",
        }
    }
}

impl FromStr for BackgroundTheme {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(BackgroundTheme::Light),
            "dark" => Ok(BackgroundTheme::Dark),
            other => Err(ViewerError::UnknownBackground(other.to_string())),
        }
    }
}

pub const MENU_GLYPH_COLLAPSED: &str = "☰";
pub const MENU_GLYPH_EXPANDED: &str = "✕";

pub const INTENSITY_MIN: f32 = 0.0;
pub const INTENSITY_MAX: f32 = 2.0;
pub const INTENSITY_STEP: f32 = 0.1;

/// Widget-side state of the panel. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub graphics: GraphicsLevel,
    pub background: BackgroundTheme,
    /// "active" style on the light toggle button
    pub light_button_active: bool,
    /// "active" style on the bounding box toggle button
    pub bbox_button_active: bool,
    pub menu_collapsed: bool,
    pub intensity: f32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            graphics: GraphicsLevel::Average,
            background: BackgroundTheme::Dark,
            light_button_active: false,
            bbox_button_active: false,
            menu_collapsed: false,
            intensity: 1.0,
        }
    }
}

impl PanelState {
    pub fn menu_glyph(&self) -> &'static str {
        if self.menu_collapsed {
            MENU_GLYPH_COLLAPSED
        } else {
            MENU_GLYPH_EXPANDED
        }
    }
}

/// A user action dispatched against the viewer session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerAction {
    SetGraphicsLevel(GraphicsLevel),
    ToggleLight,
    SetLightIntensity(f32),
    SetBackground(BackgroundTheme),
    ToggleBoundingBox,
    ResetCamera,
    ToggleMenu,
}

impl ViewerAction {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerAction::SetGraphicsLevel(_) => "set-graphics-level",
            ViewerAction::ToggleLight => "toggle-light",
            ViewerAction::SetLightIntensity(_) => "set-light-intensity",
            ViewerAction::SetBackground(_) => "set-background",
            ViewerAction::ToggleBoundingBox => "toggle-bounding-box",
            ViewerAction::ResetCamera => "reset-camera",
            ViewerAction::ToggleMenu => "toggle-menu",
        }
    }

    /// Whether the action needs a loaded model to act on
    pub fn requires_model(&self) -> bool {
        matches!(self, ViewerAction::ToggleBoundingBox | ViewerAction::ResetCamera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_level_ratios() {
        assert_eq!(GraphicsLevel::Low.pixel_ratio(3.0), 0.5);
        assert_eq!(GraphicsLevel::Average.pixel_ratio(3.0), 3.0);
        assert_eq!(GraphicsLevel::Fancy.pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn test_parse_select_values() {
        assert_eq!("low".parse::<GraphicsLevel>(), Ok(GraphicsLevel::Low));
        assert_eq!(" Fancy ".parse::<GraphicsLevel>(), Ok(GraphicsLevel::Fancy));
        assert_eq!(
            "ultra".parse::<GraphicsLevel>(),
            Err(ViewerError::UnknownGraphicsLevel("ultra".to_string()))
        );
        assert_eq!("light".parse::<BackgroundTheme>(), Ok(BackgroundTheme::Light));
        assert!("blue".parse::<BackgroundTheme>().is_err());
    }

    #[test]
    fn test_menu_glyph_swaps() {
        let mut panel = PanelState::default();
        assert_eq!(panel.menu_glyph(), MENU_GLYPH_EXPANDED);
        panel.menu_collapsed = true;
        assert_eq!(panel.menu_glyph(), MENU_GLYPH_COLLAPSED);
    }

    #[test]
    fn test_model_dependent_actions() {
        assert!(ViewerAction::ResetCamera.requires_model());
        assert!(ViewerAction::ToggleBoundingBox.requires_model());
        assert!(!ViewerAction::ToggleLight.requires_model());
    }
}
