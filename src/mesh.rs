// mesh.rs — CPU-side geometry for the photo sphere and the cube

use glam::Vec3;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Scales every vertex in place. A negative component turns the mesh inside out.
    pub fn scale(&mut self, factor: Vec3) {
        for v in &mut self.vertices {
            let p = Vec3::from(v.position) * factor;
            v.position = p.to_array();
        }
    }
}

/// UV sphere, `width_segments` around the equator and `height_segments` pole to pole.
/// u runs with longitude, v from the north pole (v = 0) to the south pole (v = 1),
/// which is how an equirectangular image lies in a top-left-origin texture.
pub fn build_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices = Vec::with_capacity((width_segments + 1) * (height_segments + 1));
    let mut indices = Vec::with_capacity(width_segments * height_segments * 6);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * std::f32::consts::PI;

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;

            let x = -radius * phi.cos() * theta.sin();
            let y = radius * theta.cos();
            let z = radius * phi.sin() * theta.sin();

            vertices.push(Vertex {
                position: [x, y, z],
                uv: [u, v],
            });
        }
    }

    let row = (width_segments + 1) as u32;
    for iy in 0..height_segments as u32 {
        for ix in 0..width_segments as u32 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // 两极处的三角形退化，跳过
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as u32 - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

/// Axis-aligned box centred on the origin, four vertices per face.
pub fn build_box(width: f32, height: f32, depth: f32) -> Mesh {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);

    // Each face: outward normal axis and the two in-plane axes (u, v).
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let half = Vec3::new(hx, hy, hz);

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u_axis, v_axis) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u_axis * su + v_axis * sv) * half;
            vertices.push(Vertex {
                position: p.to_array(),
                uv: [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertex_count_and_radius() {
        let mesh = build_sphere(500.0, 60, 40);
        assert_eq!(mesh.vertices.len(), 61 * 41);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 500.0).abs() < 0.01, "radius {r}");
        }
    }

    #[test]
    fn test_sphere_skips_pole_triangles() {
        let mesh = build_sphere(1.0, 60, 40);
        // 两极各少一排三角形
        assert_eq!(mesh.indices.len(), (60 * 40 * 2 - 2 * 60) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_sphere_uv_spans_unit_square() {
        let mesh = build_sphere(1.0, 8, 4);
        let first = mesh.vertices.first().unwrap();
        let last = mesh.vertices.last().unwrap();
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
        // v = 0 is the north pole
        assert!((first.position[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_mirrors_x() {
        let mut mesh = build_sphere(500.0, 60, 40);
        let before: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        mesh.scale(Vec3::new(-1.0, 1.0, 1.0));
        for (v, p) in mesh.vertices.iter().zip(before) {
            assert_eq!(v.position, [-p[0], p[1], p[2]]);
        }
    }

    #[test]
    fn test_box_extents() {
        let mesh = build_box(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }
}
