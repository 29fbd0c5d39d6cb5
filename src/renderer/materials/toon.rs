//! Banded Lambert ("toon") material with one point light and ambient fill.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::error::InklineError;
use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, uniform_buffer, validated,
};
use crate::gpu::shader_composer::ShaderComposer;
use crate::scene::{Material, MeshVertex, SceneLayouts};

/// Toon shading inputs (group 2).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ToonParams {
    /// Surface color (alpha unused).
    pub base_color: [f32; 4],
    /// Point light world position (w unused).
    pub light_position: [f32; 4],
    /// Light color in rgb, number of shading bands in w.
    pub light_color: [f32; 4],
    /// Ambient color in rgb, ambient intensity in w.
    pub ambient: [f32; 4],
}

impl Default for ToonParams {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], Vec3::new(0.0, 16.0, 0.0), 4, [1.0, 0.976, 1.0], 0.35)
    }
}

impl ToonParams {
    /// Pack the shading inputs; fewer than two bands is raised to two.
    pub fn new(
        base_color: [f32; 3],
        light_position: Vec3,
        bands: u32,
        ambient_color: [f32; 3],
        ambient_intensity: f32,
    ) -> Self {
        let [r, g, b] = base_color;
        let [ar, ag, ab] = ambient_color;
        Self {
            base_color: [r, g, b, 1.0],
            light_position: light_position.extend(1.0).to_array(),
            light_color: [1.0, 1.0, 1.0, bands.max(2) as f32],
            ambient: [ar, ag, ab, ambient_intensity],
        }
    }
}

/// Toon material: pipeline plus its parameter buffer.
pub struct ToonMaterial {
    pipeline: wgpu::RenderPipeline,
    params: ToonParams,
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ToonMaterial {
    /// Compile the toon material for `format` targets.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Shader`] if the shader fails to compose or
    /// the pipeline is rejected.
    pub fn new(
        device: &wgpu::Device,
        layouts: &SceneLayouts,
        shader_composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        params: ToonParams,
    ) -> Result<Self, InklineError> {
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Toon Bind Group Layout"),
                entries: &[uniform_buffer(0)],
            });
        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Toon Params Buffer"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Toon Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        let pipeline = validated(device, "toon material", || {
            let shader = shader_composer.compose(
                device,
                "Toon Shader",
                include_str!("../../../assets/shaders/raster/toon.wgsl"),
                "raster/toon.wgsl",
            )?;
            Ok(create_mesh_pipeline(
                device,
                "Toon",
                &shader,
                format,
                MeshVertex::layout(),
                &[&layouts.camera, &layouts.object, &layout],
            ))
        })?;

        Ok(Self {
            pipeline,
            params,
            params_buffer,
            bind_group,
        })
    }

    /// Current parameters.
    pub fn params(&self) -> &ToonParams {
        &self.params
    }

    /// Replace the parameters and upload them.
    pub fn set_params(&mut self, queue: &wgpu::Queue, params: ToonParams) {
        self.params = params;
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[self.params]),
        );
    }
}

impl Material for ToonMaterial {
    fn label(&self) -> &str {
        "toon"
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(2, &self.bind_group, &[]);
    }
}
