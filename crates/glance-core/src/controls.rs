//! Orbit navigation around a target point
//!
//! Input handlers only accumulate motion (rotation, dolly, pan). The
//! accumulated motion is applied to the camera once per frame in
//! [`OrbitControls::update`], with optional damping that lets the
//! remaining motion decay over the following frames.

use glam::Vec3;
use std::f32::consts::PI;

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Offset from the target in spherical coordinates (Y up).
/// `azimuth` is measured around +Y from +Z, `polar` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    pub radius: f32,
    pub azimuth: f32,
    pub polar: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let ring = self.polar.sin() * self.radius;
        Vec3::new(
            ring * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            ring * self.azimuth.cos(),
        )
    }

    /// Keep the polar angle off the poles so the up vector stays defined
    pub fn make_safe(&mut self) {
        self.polar = self.polar.clamp(EPS, PI - EPS);
    }
}

/// Orbit controls state
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    rotate_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            rotate_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(enable_damping: bool, damping_factor: f32) -> Self {
        Self {
            enable_damping,
            damping_factor,
            ..Default::default()
        }
    }

    /// Rotate from a pointer drag of `dx`/`dy` pixels on a viewport `viewport_height` tall
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let full_turn = 2.0 * PI * self.rotate_speed / viewport_height;
        self.rotate_left(full_turn * dx);
        self.rotate_up(full_turn * dy);
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.rotate_delta.azimuth -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.rotate_delta.polar -= angle;
    }

    /// Zoom from a wheel step; positive steps move closer
    pub fn zoom_by_wheel(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        let scale = 0.95_f32.powf(self.zoom_speed * steps.abs());
        if steps > 0.0 {
            self.dolly_in(scale);
        } else {
            self.dolly_out(scale);
        }
    }

    /// Shrinks the orbit radius by `scale` (< 1)
    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    /// Grows the orbit radius by `1 / scale`
    pub fn dolly_out(&mut self, scale: f32) {
        if scale != 0.0 {
            self.scale /= scale;
        }
    }

    /// Pan the target in the camera's view plane from a pointer drag in pixels
    pub fn pan_by_pixels(
        &mut self,
        camera: &PerspectiveCamera,
        dx: f32,
        dy: f32,
        viewport_height: f32,
    ) {
        if viewport_height <= 0.0 {
            return;
        }
        let offset = camera.position - self.target;
        // Half the visible height at the target distance
        let target_distance = offset.length() * (camera.fov_radians() / 2.0).tan();

        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let step = 2.0 * target_distance * self.pan_speed / viewport_height;
        self.pan_offset += -right * dx * step + up * dy * step;
    }

    /// Discard all accumulated motion
    pub fn stop_motion(&mut self) {
        self.rotate_delta = Spherical::default();
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }

    pub fn has_pending_motion(&self) -> bool {
        self.rotate_delta.azimuth.abs() > EPS
            || self.rotate_delta.polar.abs() > EPS
            || (self.scale - 1.0).abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
    }

    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        camera.position.distance(self.target)
    }

    /// Apply accumulated motion to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };

        spherical.azimuth += self.rotate_delta.azimuth * factor;
        spherical.polar += self.rotate_delta.polar * factor;
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * factor;

        camera.position = self.target + spherical.to_offset();

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.rotate_delta.azimuth *= decay;
            self.rotate_delta.polar *= decay;
            self.pan_offset *= decay;
        } else {
            self.rotate_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        before.distance_squared(camera.position) > EPS
    }
}
