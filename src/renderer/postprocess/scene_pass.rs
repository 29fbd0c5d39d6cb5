//! The scene pass: draws the scene with its own materials.

use super::screen_pass::{FrameContext, PassBuffers, ScreenPass};
use crate::error::InklineError;
use crate::gpu::render_context::RenderContext;

/// Draws the scene with its authored materials into the read buffer, so the
/// next pass sees it as its input. Never swaps.
#[derive(Debug, Default)]
pub struct ScenePass {
    disposed: bool,
}

impl ScenePass {
    /// A scene pass ready to render.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScreenPass for ScenePass {
    fn label(&self) -> &'static str {
        "scene"
    }

    fn needs_swap(&self) -> bool {
        false
    }

    fn render(
        &mut self,
        frame: &mut FrameContext<'_>,
        buffers: PassBuffers<'_>,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed(self.label()));
        }
        let target = buffers.read;
        let color = buffers.destination.unwrap_or(&target.color.view);
        let mut pass =
            frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.scene.background()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &target.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: target.depth_store_op(),
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });
        frame.scene.draw(&mut pass, frame.camera)
    }

    fn resize(
        &mut self,
        _context: &RenderContext,
        _width: u32,
        _height: u32,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed(self.label()));
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}
