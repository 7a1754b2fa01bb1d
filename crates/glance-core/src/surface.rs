//! Rendering surface dimensions and pixel density

/// Viewport size in logical pixels plus the host's device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

/// The single surface the scene is rendered into
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    device_pixel_ratio: f32,
}

impl RenderSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            pixel_ratio: viewport.device_pixel_ratio,
            device_pixel_ratio: viewport.device_pixel_ratio,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Host ratio changed (window moved to another display, browser zoom)
    pub fn set_device_pixel_ratio(&mut self, ratio: f32, follow: bool) {
        self.device_pixel_ratio = ratio;
        if follow {
            self.pixel_ratio = ratio;
        }
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Whether the current ratio is the host default (no override needed)
    pub fn uses_device_pixel_ratio(&self) -> bool {
        self.pixel_ratio == self.device_pixel_ratio
    }

    /// Size of the backing buffer in physical pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).floor().max(0.0) as u32,
            (self.height * self.pixel_ratio).floor().max(0.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_matches_viewport() {
        let surface = RenderSurface::new(Viewport::new(800.0, 600.0).with_device_pixel_ratio(2.0));
        assert_eq!((surface.width, surface.height), (800.0, 600.0));
        assert_eq!(surface.pixel_ratio, 2.0);
        assert!(surface.uses_device_pixel_ratio());
        assert_eq!(surface.drawing_buffer_size(), (1600, 1200));
    }

    #[test]
    fn test_buffer_size_with_reduced_ratio() {
        let mut surface = RenderSurface::new(Viewport::new(801.0, 601.0));
        surface.pixel_ratio = 0.5;
        assert!(!surface.uses_device_pixel_ratio());
        assert_eq!(surface.drawing_buffer_size(), (400, 300));
    }
}
