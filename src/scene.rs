// scene.rs — photo sphere + spinning cube

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::mesh::{build_box, build_sphere, Mesh};

pub const SPHERE_RADIUS: f32 = 500.0;
pub const SPHERE_WIDTH_SEGMENTS: usize = 60;
pub const SPHERE_HEIGHT_SEGMENTS: usize = 40;
pub const CUBE_COLOR: u32 = 0x006600;
/// Radians added to the cube's X and Y rotation every frame.
pub const CUBE_SPIN_PER_FRAME: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Samples the panorama image.
    Panorama,
    /// Flat colour, linear RGBA.
    Color([f32; 4]),
}

/// Converts a 0xRRGGBB sRGB colour into linear RGBA.
pub fn hex_to_linear(hex: u32) -> [f32; 4] {
    fn channel(c: u32) -> f32 {
        let s = c as f32 / 255.0;
        if s <= 0.04045 {
            s / 12.92
        } else {
            ((s + 0.055) / 1.055).powf(2.4)
        }
    }
    [
        channel((hex >> 16) & 0xff),
        channel((hex >> 8) & 0xff),
        channel(hex & 0xff),
        1.0,
    ]
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: &'static str,
    pub mesh: Mesh,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
}

impl SceneNode {
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    cube: usize,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = vec![create_viewer()];
        log::info!("photo sphere installed");

        let mut cube = create_cube();
        cube.position.x = -5.0;
        nodes.push(cube);
        log::info!("cube installed");

        Self { cube: nodes.len() - 1, nodes }
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn cube(&self) -> &SceneNode {
        &self.nodes[self.cube]
    }

    /// Per-frame animation step.
    pub fn advance(&mut self) {
        let cube = &mut self.nodes[self.cube];
        cube.rotation.x += CUBE_SPIN_PER_FRAME;
        cube.rotation.y += CUBE_SPIN_PER_FRAME;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Inside-out sphere carrying the panorama.
fn create_viewer() -> SceneNode {
    let mut mesh = build_sphere(SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS);
    mesh.scale(Vec3::new(-1.0, 1.0, 1.0));

    SceneNode {
        name: "viewer",
        mesh,
        material: Material::Panorama,
        position: Vec3::ZERO,
        rotation: Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0),
    }
}

fn create_cube() -> SceneNode {
    SceneNode {
        name: "cube",
        mesh: build_box(1.0, 1.0, 1.0),
        material: Material::Color(hex_to_linear(CUBE_COLOR)),
        position: Vec3::ZERO,
        // radians, not degrees
        rotation: Vec3::new(45.0, 45.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_layout() {
        let scene = Scene::new();
        assert_eq!(scene.nodes().len(), 2);

        let viewer = &scene.nodes()[0];
        assert_eq!(viewer.material, Material::Panorama);
        assert!((viewer.rotation.y + std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let cube = scene.cube();
        assert_eq!(cube.position, Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(cube.rotation, Vec3::new(45.0, 45.0, 0.0));
    }

    #[test]
    fn test_advance_spins_cube_only() {
        let mut scene = Scene::new();
        let viewer_before = scene.nodes()[0].rotation;
        for _ in 0..10 {
            scene.advance();
        }
        let cube = scene.cube();
        assert!((cube.rotation.x - 45.1).abs() < 1e-4);
        assert!((cube.rotation.y - 45.1).abs() < 1e-4);
        assert_eq!(cube.rotation.z, 0.0);
        assert_eq!(scene.nodes()[0].rotation, viewer_before);
    }

    #[test]
    fn test_cube_color_is_dark_green() {
        let [r, g, b, a] = hex_to_linear(CUBE_COLOR);
        assert_eq!(r, 0.0);
        assert_eq!(b, 0.0);
        assert_eq!(a, 1.0);
        // 0x66 sRGB
        assert!((g - 0.1329).abs() < 1e-3);
    }

    #[test]
    fn test_model_matrix_places_cube() {
        let scene = Scene::new();
        let origin = scene.cube().model_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-5);
    }
}
