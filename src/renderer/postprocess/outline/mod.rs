//! Screen-space outline pass.
//!
//! Each frame the pass re-renders the scene with a view-space normal
//! override into its own target, then runs a fullscreen composite that reads
//! the incoming color and depth buffers plus those normals. Wherever depth or
//! normals jump across a ring of neighbors `width` pixels away, the scene
//! color is blended toward the outline color.

pub mod kernel;
mod normal_capture;
pub mod params;

use std::sync::Arc;

pub use kernel::{EdgeSample, GBufferImage, OutlineKernel};
pub use normal_capture::NormalCapture;
pub use params::{DebugView, OutlineSettings, OutlineUniform};
use wgpu::util::DeviceExt;

use super::screen_pass::{FrameContext, PassBuffers, ScreenPass};
use crate::camera::core::validate_clip_planes;
use crate::camera::CameraBinding;
use crate::error::InklineError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, texture_2d, unfilterable_texture_2d,
    uniform_buffer, validated,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::render_state::DepthWriteScope;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::FrameBuffer;
use crate::renderer::materials::NormalMaterial;
use crate::scene::SceneLayouts;

/// Normal capture plus the edge-detecting composite.
pub struct OutlinePass {
    normal_capture: NormalCapture,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    settings: OutlineSettings,
    uniform: OutlineUniform,
    params_buffer: wgpu::Buffer,
    disposed: bool,
}

impl OutlinePass {
    /// Build the pass for `width` x `height` output in the context's surface
    /// format.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] for invalid settings, size, or clip
    /// planes, and [`InklineError::Shader`] if a shader fails to compose or
    /// the backend rejects a pipeline.
    /// Nothing is allocated when validation fails.
    pub fn new(
        context: &RenderContext,
        layouts: &SceneLayouts,
        shader_composer: &mut ShaderComposer,
        camera: &CameraBinding,
        width: u32,
        height: u32,
        settings: OutlineSettings,
    ) -> Result<Self, InklineError> {
        settings.validate()?;
        let screen_size = params::screen_size(width, height)?;
        validate_clip_planes(camera.znear(), camera.zfar())?;

        let device = &context.device;
        let (normal_material, bind_group_layout, pipeline) =
            validated(device, "outline pass", || {
                let normal_material =
                    NormalMaterial::new(device, layouts, shader_composer)?;
                let shader = shader_composer.compose(
                    device,
                    "Outline Shader",
                    include_str!("../../../../assets/shaders/screen/outline.wgsl"),
                    "screen/outline.wgsl",
                )?;
                let bind_group_layout = device.create_bind_group_layout(
                    &wgpu::BindGroupLayoutDescriptor {
                        label: Some("Outline Bind Group Layout"),
                        entries: &[
                            texture_2d(0),
                            unfilterable_texture_2d(1),
                            texture_2d(2),
                            uniform_buffer(3),
                        ],
                    },
                );
                let pipeline = create_screen_space_pipeline(
                    device,
                    "Outline",
                    &shader,
                    context.format(),
                    None,
                    &[&bind_group_layout],
                );
                Ok((normal_material, bind_group_layout, pipeline))
            })?;

        let uniform = OutlineUniform::new(
            &settings,
            screen_size,
            camera.znear(),
            camera.zfar(),
        );
        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Outline Params Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let normal_capture =
            NormalCapture::new(device, Arc::new(normal_material), width, height);

        log::debug!("outline pass: created at {width}x{height}");
        Ok(Self {
            normal_capture,
            pipeline,
            bind_group_layout,
            settings,
            uniform,
            params_buffer,
            disposed: false,
        })
    }

    /// Current tunables.
    pub fn settings(&self) -> &OutlineSettings {
        &self.settings
    }

    /// Replace the tunables.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] and keeps the old settings if
    /// `settings` fails validation.
    pub fn set_settings(
        &mut self,
        queue: &wgpu::Queue,
        settings: OutlineSettings,
    ) -> Result<(), InklineError> {
        settings.validate()?;
        self.settings = settings;
        self.uniform.apply_settings(&settings);
        self.flush_uniform(queue);
        Ok(())
    }

    /// Size of the normal target.
    pub fn normal_target_size(&self) -> (u32, u32) {
        self.normal_capture.size()
    }

    /// `(width, height, 1 / width, 1 / height)` as last uploaded.
    pub fn screen_size(&self) -> [f32; 4] {
        self.uniform.screen_size
    }

    /// The uniform block as last uploaded.
    pub fn uniform(&self) -> &OutlineUniform {
        &self.uniform
    }

    /// Whether [`ScreenPass::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn flush_uniform(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    fn create_bind_group(
        &self,
        device: &wgpu::Device,
        read: &FrameBuffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Outline Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(
                        &read.color.view,
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        &read.depth.view,
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(
                        self.normal_capture.view(),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.params_buffer.as_entire_binding(),
                },
            ],
        })
    }
}

impl ScreenPass for OutlinePass {
    fn label(&self) -> &'static str {
        "outline"
    }

    fn render(
        &mut self,
        frame: &mut FrameContext<'_>,
        buffers: PassBuffers<'_>,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed(self.label()));
        }
        let PassBuffers {
            write,
            read,
            destination,
        } = buffers;
        let _depth_write = DepthWriteScope::disable(&mut write.depth_write);

        let (near, far) = (frame.camera.znear(), frame.camera.zfar());
        validate_clip_planes(near, far)?;
        self.uniform.camera_near = near;
        self.uniform.camera_far = far;
        self.flush_uniform(frame.queue);

        self.normal_capture
            .render(frame.encoder, &mut *frame.scene, frame.camera)?;

        let bind_group = self.create_bind_group(frame.device, read);
        let output = destination.unwrap_or(&write.color.view);

        let mut pass =
            frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Outline Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: output,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
        Ok(())
    }

    fn resize(
        &mut self,
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed(self.label()));
        }
        let screen_size = params::screen_size(width, height)?;
        self.normal_capture.resize(&context.device, width, height);
        self.uniform.screen_size = screen_size;
        self.flush_uniform(&context.queue);
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            log::warn!("outline pass: dispose called twice, ignoring");
            return;
        }
        self.normal_capture.destroy();
        self.params_buffer.destroy();
        self.disposed = true;
        log::debug!("outline pass: disposed");
    }
}
