//! Normal capture: the scene re-rendered with the view-normal override into
//! an off-screen target the composite shader samples.

use std::sync::Arc;

use crate::camera::CameraBinding;
use crate::error::InklineError;
use crate::gpu::texture::RenderTarget;
use crate::renderer::materials::NORMAL_FORMAT;
use crate::scene::{Material, MaterialOverride, Scene};

/// Off-screen normal buffer with its own depth attachment.
pub struct NormalCapture {
    color: RenderTarget,
    depth: RenderTarget,
    material: Arc<dyn Material>,
}

impl NormalCapture {
    /// Allocate targets of `width` x `height`. The size must already be
    /// validated.
    pub fn new(
        device: &wgpu::Device,
        material: Arc<dyn Material>,
        width: u32,
        height: u32,
    ) -> Self {
        let (color, depth) = Self::create_targets(device, width, height);
        log::debug!("normal capture: allocated {width}x{height}");
        Self {
            color,
            depth,
            material,
        }
    }

    fn create_targets(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (RenderTarget, RenderTarget) {
        (
            RenderTarget::new(
                device,
                "Outline Normal Texture",
                width,
                height,
                NORMAL_FORMAT,
            ),
            RenderTarget::depth(device, "Outline Normal Depth", width, height),
        )
    }

    /// View of the encoded normals.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.color.view
    }

    /// Current target size.
    pub fn size(&self) -> (u32, u32) {
        self.color.size()
    }

    /// Reallocate both targets if the size changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.size() == (width, height) {
            return;
        }
        self.destroy();
        let (color, depth) = Self::create_targets(device, width, height);
        self.color = color;
        self.depth = depth;
        log::debug!("normal capture: resized to {width}x{height}");
    }

    /// Draw `scene` with every material replaced by the normal material.
    ///
    /// The override is popped when this returns, whether or not the draw
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Propagates the scene's draw error.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &mut dyn Scene,
        camera: &CameraBinding,
    ) -> Result<(), InklineError> {
        MaterialOverride::scoped(scene, Arc::clone(&self.material), |scene| {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Outline Normal Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &self.color.view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(scene.background()),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            scene.draw(&mut pass, camera)
        })
    }

    /// Release both targets.
    pub fn destroy(&self) {
        self.color.destroy();
        self.depth.destroy();
    }
}
