//! The contract every post-processing pass implements, plus the per-frame
//! context and buffer handles passed to it.

use crate::camera::CameraBinding;
use crate::error::InklineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::FrameBuffer;
use crate::scene::Scene;

/// Collaborators borrowed for one frame.
pub struct FrameContext<'a> {
    /// Device for per-frame bind groups.
    pub device: &'a wgpu::Device,
    /// Encoder every pass records into.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Queue for uniform uploads.
    pub queue: &'a wgpu::Queue,
    /// Scene being rendered. Passes may install a temporary material
    /// override but must remove it before returning.
    pub scene: &'a mut dyn Scene,
    /// Camera uniforms, already uploaded for this frame.
    pub camera: &'a CameraBinding,
}

/// Buffers handed to one pass by the composer.
pub struct PassBuffers<'a> {
    /// Buffer this pass writes unless `destination` is set.
    pub write: &'a mut FrameBuffer,
    /// Output of the previous pass.
    pub read: &'a FrameBuffer,
    /// Final surface, set only for the last pass.
    pub destination: Option<&'a wgpu::TextureView>,
}

/// Uniform interface for stages of the post-processing chain.
pub trait ScreenPass {
    /// Debug label, also used in error messages.
    fn label(&self) -> &'static str;

    /// Whether the composer swaps read/write buffers after this pass.
    fn needs_swap(&self) -> bool {
        true
    }

    /// Encode GPU commands for this pass.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError`] if the pass is disposed or the scene fails
    /// to draw.
    fn render(
        &mut self,
        frame: &mut FrameContext<'_>,
        buffers: PassBuffers<'_>,
    ) -> Result<(), InklineError>;

    /// Recreate resolution-dependent resources.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] for a zero-sized target, leaving the
    /// pass unchanged.
    fn resize(
        &mut self,
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), InklineError>;

    /// Release GPU resources. Calling it again does nothing.
    fn dispose(&mut self);
}
