// positioner.rs — camera orientation sources (pointer-drag fallback / device pose)

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::camera::PerspectiveCamera;

/// Degrees of rotation per pixel of pointer travel.
pub const DRAG_SENSITIVITY: f64 = 0.1;
/// Latitude limit, keeps the view away from the poles.
pub const MAX_LATITUDE: f64 = 85.0;
/// Radius of the sphere the look target lives on.
pub const TARGET_RADIUS: f64 = 500.0;

/// Host-agnostic pointer input, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

/// Pointer-drag orientation state for one viewing session.
#[derive(Debug, Clone, Default)]
pub struct FallbackPositioner {
    latitude: f64,
    longitude: f64,
    dragging: bool,
    last_pointer_x: f64,
    last_pointer_y: f64,
    look_target: Vec3,
}

impl FallbackPositioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.dragging = true;
        self.last_pointer_x = x;
        self.last_pointer_y = y;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.dragging {
            return;
        }

        let delta_x = x - self.last_pointer_x;
        let delta_y = y - self.last_pointer_y;
        self.latitude += delta_y * DRAG_SENSITIVITY;
        self.longitude += -delta_x * DRAG_SENSITIVITY;
        self.last_pointer_x = x;
        self.last_pointer_y = y;

        log::trace!(
            "drag dx={delta_x} dy={delta_y} lat={:.2} lon={:.2}",
            self.latitude,
            self.longitude
        );
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(x, y),
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    /// Clamps the latitude and recomputes the look target from (latitude, longitude).
    pub fn compute_camera_target(&mut self) -> Vec3 {
        self.latitude = self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);

        let phi = (90.0 - self.latitude).to_radians();
        let theta = self.longitude.to_radians();
        self.look_target = Vec3::new(
            (TARGET_RADIUS * phi.sin() * theta.cos()) as f32,
            (TARGET_RADIUS * phi.cos()) as f32,
            (TARGET_RADIUS * phi.sin() * theta.sin()) as f32,
        );
        self.look_target
    }

    pub fn update_camera(&mut self, camera: &mut PerspectiveCamera) {
        let target = self.compute_camera_target();
        camera.look_at(target);
    }
}

/// Orientation (and optionally position) reported by tracking hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePose {
    pub orientation: Quat,
    pub position: Option<Vec3>,
}

/// Anything that can report the latest device pose.
pub trait PoseSource: Send + Sync {
    fn pose(&self) -> Option<DevicePose>;
}

/// Orients the camera from a hardware pose source.
pub struct DevicePositioner {
    source: Arc<dyn PoseSource>,
}

impl DevicePositioner {
    pub fn new(source: Arc<dyn PoseSource>) -> Self {
        Self { source }
    }

    pub fn update_camera(&mut self, camera: &mut PerspectiveCamera) {
        // No pose this frame: hold the previous orientation.
        let Some(pose) = self.source.pose() else {
            return;
        };
        camera.rotation = pose.orientation.normalize();
        if let Some(position) = pose.position {
            camera.position = position;
        }
    }
}

impl std::fmt::Debug for DevicePositioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevicePositioner").finish_non_exhaustive()
    }
}

/// The orientation source chosen for a session.
#[derive(Debug)]
pub enum Positioner {
    Fallback(FallbackPositioner),
    Device(DevicePositioner),
}

impl Positioner {
    /// Picks the device positioner when a pose source exists, the pointer fallback otherwise.
    pub fn select(pose_source: Option<Arc<dyn PoseSource>>) -> Self {
        match pose_source {
            Some(source) => {
                log::info!("using device pose positioner");
                Positioner::Device(DevicePositioner::new(source))
            }
            None => {
                log::info!("no device pose available, using pointer-drag positioner");
                Positioner::Fallback(FallbackPositioner::new())
            }
        }
    }

    pub fn update_camera(&mut self, camera: &mut PerspectiveCamera) {
        match self {
            Positioner::Fallback(p) => p.update_camera(camera),
            Positioner::Device(p) => p.update_camera(camera),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Positioner::Fallback(p) = self {
            p.handle_pointer(event);
        }
    }

    /// (latitude, longitude) in degrees, when pointer-driven.
    pub fn orientation(&self) -> Option<(f64, f64)> {
        match self {
            Positioner::Fallback(p) => Some((p.latitude(), p.longitude())),
            Positioner::Device(_) => None,
        }
    }
}
