//! The device and queue the outline chain runs on, plus where its final image
//! goes: a window surface, or nowhere when running headless.

use std::fmt;

use super::texture::validate_size;
use crate::error::ConfigError;

/// Why a [`RenderContext`] could not be created.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle could not back a surface.
    Surface(wgpu::CreateSurfaceError),
    /// None of the requested backends offered an adapter.
    NoAdapter {
        /// Backends that were searched.
        backends: wgpu::Backends,
        /// wgpu's reason.
        source: wgpu::RequestAdapterError,
    },
    /// The adapter refused the device request.
    Device(wgpu::RequestDeviceError),
    /// The adapter cannot present to the window surface.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create window surface: {e}"),
            Self::NoAdapter { backends, source } => {
                write!(f, "no adapter among {backends:?}: {source}")
            }
            Self::Device(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "adapter cannot present to this surface")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::NoAdapter { source, .. } => Some(source),
            Self::Device(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

enum Output {
    Window {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    },
}

/// Device, queue, and output description shared by every pass.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    downlevel: wgpu::DownlevelFlags,
    output: Output,
}

impl RenderContext {
    /// Open a context presenting to `window`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError`] if the surface, adapter, or device
    /// cannot be acquired.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        (width, height): (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::Surface)?;
        let adapter = request_adapter(
            &instance,
            wgpu::Backends::all(),
            Some(&surface),
        )
        .await?;
        let (device, queue) = request_device(&adapter).await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.present_mode = wgpu::PresentMode::Fifo;
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            adapter_info: adapter.get_info(),
            downlevel: adapter.get_downlevel_capabilities().flags,
            output: Output::Window { surface, config },
        })
    }

    /// Open a context with no surface, restricted to `backends`.
    ///
    /// Passes built on it target `format` at `width` x `height`; the final
    /// image goes to whatever view the caller renders into.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError`] if none of `backends` has an adapter
    /// or the device request fails.
    pub async fn headless(
        backends: wgpu::Backends,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let adapter = request_adapter(&instance, backends, None).await?;
        let (device, queue) = request_device(&adapter).await?;
        Ok(Self {
            device,
            queue,
            adapter_info: adapter.get_info(),
            downlevel: adapter.get_downlevel_capabilities().flags,
            output: Output::Offscreen {
                format,
                width,
                height,
            },
        })
    }

    /// The adapter this context runs on.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Downlevel capabilities of the adapter, e.g. whether depth textures
    /// can be copied into buffers.
    pub fn downlevel_flags(&self) -> wgpu::DownlevelFlags {
        self.downlevel
    }

    /// Format of the final image.
    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.output {
            Output::Window { config, .. } => config.format,
            Output::Offscreen { format, .. } => *format,
        }
    }

    /// Output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        match &self.output {
            Output::Window { config, .. } => (config.width, config.height),
            Output::Offscreen { width, height, .. } => (*width, *height),
        }
    }

    /// Change the output size, reconfiguring the surface if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSizedTarget`] and changes nothing if
    /// either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        validate_size(width, height)?;
        match &mut self.output {
            Output::Window { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            Output::Offscreen {
                width: w,
                height: h,
                ..
            } => {
                *w = width;
                *h = height;
            }
        }
        Ok(())
    }

    /// Acquire the next surface texture.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] from the surface, or
    /// [`wgpu::SurfaceError::Lost`] for a headless context.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.output {
            Output::Window { surface, .. } => surface.get_current_texture(),
            Output::Offscreen { .. } => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// A fresh encoder for one frame.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            })
    }

    /// Finish `encoder` and submit it.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

async fn request_adapter(
    instance: &wgpu::Instance,
    backends: wgpu::Backends,
    surface: Option<&wgpu::Surface<'_>>,
) -> Result<wgpu::Adapter, RenderContextError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|source| RenderContextError::NoAdapter { backends, source })?;
    let info = adapter.get_info();
    log::info!("render context: {} ({:?})", info.name, info.backend);
    Ok(adapter)
}

async fn request_device(
    adapter: &wgpu::Adapter,
) -> Result<(wgpu::Device, wgpu::Queue), RenderContextError> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Inkline Device"),
            // Uniforms, sampled textures, and at most three bind groups: the
            // WebGL2 floor covers it, so GL adapters qualify too.
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            ..Default::default()
        })
        .await
        .map_err(RenderContextError::Device)
}
