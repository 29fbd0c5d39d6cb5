//! View-space normal material, forced onto the whole scene while the
//! outline pass captures its normal buffer.

use crate::error::InklineError;
use crate::gpu::pipeline_helpers::create_mesh_pipeline;
use crate::gpu::shader_composer::ShaderComposer;
use crate::scene::{Material, MeshVertex, SceneLayouts};

/// Normal buffer format. Three channels are used; alpha is ignored.
pub const NORMAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Writes `normalize(view_normal) * 0.5 + 0.5` as RGB.
pub struct NormalMaterial {
    pipeline: wgpu::RenderPipeline,
}

impl NormalMaterial {
    /// Compile the normal material for [`NORMAL_FORMAT`] targets.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Shader`] if the shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        layouts: &SceneLayouts,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, InklineError> {
        let shader = shader_composer.compose(
            device,
            "View Normal Shader",
            include_str!("../../../assets/shaders/raster/view_normal.wgsl"),
            "raster/view_normal.wgsl",
        )?;
        let pipeline = create_mesh_pipeline(
            device,
            "View Normal",
            &shader,
            NORMAL_FORMAT,
            MeshVertex::layout(),
            &[&layouts.camera, &layouts.object],
        );
        Ok(Self { pipeline })
    }
}

impl Material for NormalMaterial {
    fn label(&self) -> &str {
        "view-normal"
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}
