//! Scene contents: background, light rig, loaded model and its overlay

use glam::Vec3;

use crate::bounds::{Aabb, BoundingBoxHelper};

/// 24-bit RGB color, `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    /// Channels as sRGB floats in `0.0..=1.0`
    pub fn to_srgb_f32(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    pub fn to_srgb_u8(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Position the light shines from, toward the origin
    pub position: Vec3,
    pub visible: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 1.0,
            position: Vec3::new(5.0, 5.0, 5.0).normalize(),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Rgb(0x404040),
            intensity: 1.0,
        }
    }
}

/// Sky/ground gradient light
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky: Rgb,
    pub ground: Rgb,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky: Rgb(0xffffbb),
            ground: Rgb(0x080820),
            intensity: 1.0,
        }
    }
}

/// The fixed set of lights in a scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightRig {
    pub directional: DirectionalLight,
    pub ambient: Option<AmbientLight>,
    pub hemisphere: Option<HemisphereLight>,
}

impl LightRig {
    /// Single directional light
    pub fn basic() -> Self {
        Self::default()
    }

    /// Directional, ambient and hemisphere lights
    pub fn full() -> Self {
        Self {
            directional: DirectionalLight::default(),
            ambient: Some(AmbientLight::default()),
            hemisphere: Some(HemisphereLight::default()),
        }
    }
}

/// Externally loaded model subgraph, reduced to what the viewer needs
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub source: String,
    /// World-space bounds of every mesh in the model
    pub bounds: Aabb,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// `None` leaves the renderer's clear color untouched
    pub background: Option<Rgb>,
    pub lights: LightRig,
    pub model: Option<LoadedModel>,
    pub bounding_box: Option<BoundingBoxHelper>,
}

impl Scene {
    pub fn new(lights: LightRig) -> Self {
        Self {
            lights,
            ..Default::default()
        }
    }

    /// Insert the model and derive its overlay from the bounds
    pub fn insert_model(&mut self, model: LoadedModel) {
        self.bounding_box = Some(BoundingBoxHelper::new(model.bounds));
        self.model = Some(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_channels() {
        assert_eq!(Rgb(0xff8000).to_srgb_u8(), [255, 128, 0]);
        let [r, g, b] = Rgb(0x404040).to_srgb_f32();
        assert!((r - 64.0 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_light_rigs() {
        let basic = LightRig::basic();
        assert!(basic.ambient.is_none());
        assert!(basic.hemisphere.is_none());
        assert!((basic.directional.position.length() - 1.0).abs() < 1e-6);

        let full = LightRig::full();
        assert_eq!(full.hemisphere.map(|h| h.sky), Some(Rgb(0xffffbb)));
    }

    #[test]
    fn test_insert_model_creates_hidden_overlay() {
        let mut scene = Scene::new(LightRig::basic());
        let bounds = Aabb::new(Vec3::ZERO, Vec3::ONE);
        scene.insert_model(LoadedModel {
            source: "models/model.gltf".to_string(),
            bounds,
        });

        let helper = scene.bounding_box.as_ref().unwrap();
        assert_eq!(helper.bounds, bounds);
        assert!(!helper.visible);
    }
}
