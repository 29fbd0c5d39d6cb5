use glam::Vec3;
use wgpu::util::DeviceExt;

/// Vertex layout consumed by every mesh material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout matching `MeshVertex` in `camera.wgsl`.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Counter-clockwise (front-facing) triangle indices.
    pub indices: Vec<u32>,
}

/// Corner indices of the 20 icosahedron faces.
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

impl MeshData {
    /// Flat-shaded icosahedron: 20 faces, each with its own three vertices
    /// carrying the face normal, so every edge is a crease.
    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|c| c.normalize() * radius);

        let mut mesh = Self::default();
        for [a, b, c] in ICOSAHEDRON_FACES {
            mesh.push_flat_triangle(corners[a], corners[b], corners[c]);
        }
        mesh
    }

    /// Square of side `size` in the XY plane, facing +Z.
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let normal = [0.0, 0.0, 1.0];
        let vertices = [[-h, -h], [h, -h], [h, h], [-h, h]]
            .map(|[x, y]| MeshVertex {
                position: [x, y, 0.0],
                normal,
            })
            .to_vec();
        Self {
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Append a triangle with its face normal, flipping the winding so the
    /// normal points away from the origin.
    fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let base = self.vertices.len() as u32;
        for p in [a, b, c] {
            self.vertices.push(MeshVertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Mesh uploaded to GPU vertex/index buffers.
pub struct GpuMesh {
    /// Vertex buffer of [`MeshVertex`].
    pub vertex_buffer: wgpu::Buffer,
    /// `u32` index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload `data` into new GPU buffers.
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosahedron_is_flat_shaded() {
        let mesh = MeshData::icosahedron(12.0);
        assert_eq!(mesh.triangle_count(), 20);
        assert_eq!(mesh.vertices.len(), 60);
        for tri in mesh.vertices.chunks(3) {
            assert_eq!(tri[0].normal, tri[1].normal);
            assert_eq!(tri[1].normal, tri[2].normal);
        }
    }

    #[test]
    fn icosahedron_vertices_lie_on_sphere() {
        let mesh = MeshData::icosahedron(12.0);
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((r - 12.0).abs() < 1e-4, "radius {r}");
        }
    }

    #[test]
    fn icosahedron_faces_wind_outward() {
        let mesh = MeshData::icosahedron(1.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let winding = (b - a).cross(c - a);
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(winding.dot(a + b + c) > 0.0);
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert!(winding.normalize().dot(normal) > 0.999);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = MeshData::plane(2.0);
        assert_eq!(mesh.triangle_count(), 2);
        let [a, b, c] = [0, 1, 2]
            .map(|i| Vec3::from_array(mesh.vertices[mesh.indices[i] as usize].position));
        assert!((b - a).cross(c - a).z > 0.0);
    }

    #[test]
    fn vertex_stride_matches_layout() {
        assert_eq!(MeshVertex::layout().array_stride, 24);
    }
}
