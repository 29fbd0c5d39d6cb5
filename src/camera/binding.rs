use wgpu::util::DeviceExt;

use super::core::{Camera, CameraUniform};
use crate::scene::SceneLayouts;

/// GPU-side camera: uniform buffer, its bind group (group 0 of every mesh
/// material), and the clip planes last uploaded.
pub struct CameraBinding {
    uniform: CameraUniform,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Allocate the uniform buffer and bind group for `camera`.
    pub fn new(
        device: &wgpu::Device,
        layouts: &SceneLayouts,
        camera: &Camera,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Upload the camera's current matrices and clip planes.
    pub fn update(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Bind group for group 0.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Near plane of the last upload.
    pub fn znear(&self) -> f32 {
        self.uniform.clip[0]
    }

    /// Far plane of the last upload.
    pub fn zfar(&self) -> f32 {
        self.uniform.clip[1]
    }
}
