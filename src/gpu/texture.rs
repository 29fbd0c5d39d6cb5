//! Off-screen render targets: color, depth, and the ping-pong frame buffer.

use super::pipeline_helpers::DEPTH_FORMAT;
use crate::error::ConfigError;

/// Reject zero-sized targets before any texture is allocated.
///
/// # Errors
///
/// Returns [`ConfigError::ZeroSizedTarget`] if either dimension is zero.
pub fn validate_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroSizedTarget { width, height });
    }
    Ok(())
}

/// A single-mip render-target texture and its default view.
///
/// Created with `RENDER_ATTACHMENT | TEXTURE_BINDING | COPY_SRC` usage,
/// suitable for off-screen rendering followed by sampling or read-back.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a new render-target texture with the given dimensions and
    /// format.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Create a sampleable depth target (no stencil).
    #[must_use]
    pub fn depth(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
    ) -> Self {
        Self::new(device, label, width, height, DEPTH_FORMAT)
    }

    /// Texture dimensions in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// Release the GPU memory immediately.
    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

/// A color + depth buffer pair handed between pipeline stages.
pub struct FrameBuffer {
    /// Scene color.
    pub color: RenderTarget,
    /// Scene depth (sampleable).
    pub depth: RenderTarget,
    /// Whether draws into this buffer persist their depth values.
    pub depth_write: bool,
}

impl FrameBuffer {
    /// Allocate a frame buffer; depth writes start enabled.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            color: RenderTarget::new(
                device,
                &format!("{label} Color"),
                width,
                height,
                format,
            ),
            depth: RenderTarget::depth(
                device,
                &format!("{label} Depth"),
                width,
                height,
            ),
            depth_write: true,
        }
    }

    /// Dimensions of the color target.
    pub fn size(&self) -> (u32, u32) {
        self.color.size()
    }

    /// Depth store operation implied by the current `depth_write` flag.
    pub fn depth_store_op(&self) -> wgpu::StoreOp {
        if self.depth_write {
            wgpu::StoreOp::Store
        } else {
            wgpu::StoreOp::Discard
        }
    }

    /// Release both targets.
    pub fn destroy(&self) {
        self.color.destroy();
        self.depth.destroy();
    }
}
