//! Cancellable per-frame render task

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::scene::Scene;
use crate::session::ViewerSession;
use crate::surface::RenderSurface;

/// Whatever draws a frame: the engine's renderer, or a recorder in tests
pub trait FrameTarget {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        controls: &OrbitControls,
        surface: &RenderSurface,
    );
}

/// Stops a running loop from outside the frame callback
#[derive(Debug, Clone)]
pub struct RenderLoopHandle {
    running: Arc<AtomicBool>,
}

impl RenderLoopHandle {
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Render loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Frame driver with a start/stop lifecycle. Created stopped.
#[derive(Debug, Default)]
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> RenderLoopHandle {
        if !self.running.swap(true, Ordering::SeqCst) {
            info!(frames = self.frames, "Render loop started");
        }
        self.handle()
    }

    pub fn handle(&self) -> RenderLoopHandle {
        RenderLoopHandle {
            running: self.running.clone(),
        }
    }

    pub fn stop(&self) {
        self.handle().stop();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Frames rendered since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: controls first, then render. Returns false once stopped.
    pub fn tick(&mut self, session: &mut ViewerSession, target: &mut dyn FrameTarget) -> bool {
        if !self.is_running() {
            return false;
        }
        session.advance_frame();
        target.render(&session.scene, &session.camera, &session.controls, &session.surface);
        self.frames += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::surface::Viewport;
    use glam::Vec3;

    #[derive(Default)]
    struct Recorder {
        positions: Vec<Vec3>,
    }

    impl FrameTarget for Recorder {
        fn render(
            &mut self,
            _scene: &Scene,
            camera: &PerspectiveCamera,
            _controls: &OrbitControls,
            _surface: &RenderSurface,
        ) {
            self.positions.push(camera.position);
        }
    }

    fn session() -> ViewerSession {
        ViewerSession::new(&ViewerConfig::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_no_frames_before_start() {
        let mut render_loop = RenderLoop::new();
        let mut session = session();
        let mut recorder = Recorder::default();

        assert!(!render_loop.tick(&mut session, &mut recorder));
        assert!(recorder.positions.is_empty());
        assert_eq!(render_loop.frames(), 0);
    }

    #[test]
    fn test_controls_update_before_render() {
        let mut render_loop = RenderLoop::new();
        render_loop.start();
        let mut session = session();
        session.controls.enable_damping = false;
        session.controls.rotate_left(-std::f32::consts::FRAC_PI_2);
        let mut recorder = Recorder::default();

        assert!(render_loop.tick(&mut session, &mut recorder));
        // The rendered frame already shows the rotated camera
        assert!((recorder.positions[0] - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_handle_stops_loop() {
        let mut render_loop = RenderLoop::new();
        let handle = render_loop.start();
        let mut session = session();
        let mut recorder = Recorder::default();

        for _ in 0..3 {
            assert!(render_loop.tick(&mut session, &mut recorder));
        }
        handle.stop();
        assert!(!render_loop.is_running());
        assert!(!render_loop.tick(&mut session, &mut recorder));
        assert_eq!(render_loop.frames(), 3);
        assert_eq!(recorder.positions.len(), 3);

        // Restart resumes counting
        render_loop.start();
        assert!(handle.is_running());
        assert!(render_loop.tick(&mut session, &mut recorder));
        assert_eq!(render_loop.frames(), 4);
    }
}
