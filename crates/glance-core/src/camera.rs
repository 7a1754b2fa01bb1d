//! Perspective camera state

use glam::{Mat4, Vec3};

/// Perspective projection parameters plus a world position.
/// The camera always looks at the orbit controls' target.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    /// Recompute aspect from viewport dimensions. Dimensions are not validated.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov.to_radians()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }
}

/// Camera position and controls target captured for later reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_set_viewport() {
        let mut camera = PerspectiveCamera::default();
        camera.set_viewport(1920.0, 1080.0);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_view_matrix_centers_target() {
        let camera = PerspectiveCamera::default();
        let view = camera.view_matrix(Vec3::ZERO);
        // Target lands straight ahead on the -Z axis in view space
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((p.z + 5.0).abs() < 1e-6);
    }
}
