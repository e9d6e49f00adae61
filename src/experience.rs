// experience.rs — one viewing session: camera, scene and orientation source

use crate::camera::{PerspectiveCamera, DEFAULT_FOV_DEG, FAR, NEAR};
use crate::positioner::{PointerEvent, Positioner};
use crate::scene::Scene;

pub struct Experience {
    camera: PerspectiveCamera,
    scene: Scene,
    positioner: Positioner,
    frames: u64,
}

impl Experience {
    pub fn new(width: u32, height: u32, positioner: Positioner) -> Self {
        let mut camera = PerspectiveCamera::new(DEFAULT_FOV_DEG, 1.0, NEAR, FAR);
        camera.set_aspect(width, height);

        Self {
            camera,
            scene: Scene::new(),
            positioner,
            frames: 0,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn positioner(&self) -> &Positioner {
        &self.positioner
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.positioner.handle_pointer(event);
    }

    /// Runs once per rendered frame, before drawing.
    pub fn frame(&mut self) {
        self.positioner.update_camera(&mut self.camera);
        self.scene.advance();
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_frame_orients_camera_and_spins_cube() {
        let mut exp = Experience::new(800, 600, Positioner::select(None));
        exp.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 });
        exp.handle_pointer(PointerEvent::Move { x: -900.0, y: 0.0 });
        exp.handle_pointer(PointerEvent::Up);
        exp.frame();

        // longitude 90° looks down +Z
        assert!((exp.camera().forward() - Vec3::Z).length() < 1e-4);
        assert!((exp.scene().cube().rotation.x - 45.01).abs() < 1e-4);
        assert_eq!(exp.frames(), 1);
    }

    #[test]
    fn test_view_holds_between_drags() {
        let mut exp = Experience::new(800, 600, Positioner::select(None));
        exp.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 });
        exp.handle_pointer(PointerEvent::Move { x: 120.0, y: -60.0 });
        exp.handle_pointer(PointerEvent::Up);
        exp.frame();
        let held = exp.camera().rotation;
        for _ in 0..5 {
            exp.frame();
        }
        assert!(exp.camera().rotation.abs_diff_eq(held, 1e-6));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut exp = Experience::new(800, 600, Positioner::select(None));
        exp.resize(1920, 1080);
        assert!((exp.camera().aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
