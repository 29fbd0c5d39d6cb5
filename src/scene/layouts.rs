use crate::gpu::pipeline_helpers::uniform_buffer_in;

/// Bind group layouts shared by every mesh material and the scene.
pub struct SceneLayouts {
    /// Group 0: camera uniform.
    pub camera: wgpu::BindGroupLayout,
    /// Group 1: per-object transform uniform.
    pub object: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    /// Create both layouts.
    pub fn new(device: &wgpu::Device) -> Self {
        let visibility = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let camera =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_buffer_in(0, visibility)],
            });
        let object =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[uniform_buffer_in(0, visibility)],
            });
        Self { camera, object }
    }
}
