//! Standalone demo window backed by winit.
//!
//! Shows a slowly rotating, toon-shaded icosahedron on a plain background
//! with the outline pass applied on top.
//!
//! ```no_run
//! # use inkline::Viewer;
//! Viewer::builder()
//!     .with_title("Outlines")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::{Mat4, Quat};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    camera::{Camera, CameraBinding},
    error::InklineError,
    gpu::{render_context::RenderContext, shader_composer::ShaderComposer},
    options::Options,
    renderer::{
        materials::ToonMaterial,
        postprocess::{EffectComposer, FrameContext, OutlinePass, ScenePass},
    },
    scene::{GpuMesh, MeshData, MeshScene, SceneLayouts},
};

/// Radius of the demo icosahedron.
const ICOSAHEDRON_RADIUS: f32 = 12.0;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Inkline".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window running the outline demo.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] for invalid options and
    /// [`InklineError::Viewer`] if the event loop fails.
    pub fn run(self) -> Result<(), InklineError> {
        self.options.validate()?;
        let event_loop = EventLoop::new()
            .map_err(|e| InklineError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            state: None,
            options: self.options,
            title: self.title,
        };
        log::info!("viewer: starting event loop");
        event_loop
            .run_app(&mut app)
            .map_err(|e| InklineError::Viewer(e.to_string()))
    }
}

// ── Render state ─────────────────────────────────────────────────────────

/// GPU resources and scene, created once the window exists.
struct ViewerState {
    context: RenderContext,
    camera: Camera,
    camera_binding: CameraBinding,
    scene: MeshScene,
    composer: EffectComposer,
    object: usize,
    rotation: Quat,
    rotation_speed: f32,
}

impl ViewerState {
    fn new(window: Arc<Window>, options: &Options) -> Result<Self, InklineError> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let context =
            pollster::block_on(RenderContext::new(window, (width, height)))?;
        let device = &context.device;

        let layouts = SceneLayouts::new(device);
        let mut shader_composer = ShaderComposer::new()?;

        let camera = options.camera.to_camera(width as f32 / height as f32);
        let camera_binding = CameraBinding::new(device, &layouts, &camera);

        let toon = ToonMaterial::new(
            device,
            &layouts,
            &mut shader_composer,
            context.format(),
            options.display.toon_params(),
        )?;
        let mesh = GpuMesh::upload(
            device,
            "Icosahedron",
            &MeshData::icosahedron(ICOSAHEDRON_RADIUS),
        );
        let mut scene = MeshScene::new(options.display.clear_color());
        let object = scene.add_object(
            device,
            &layouts,
            Arc::new(mesh),
            Arc::new(toon),
            Mat4::IDENTITY,
        );

        let mut composer = EffectComposer::new(&context, width, height)?;
        composer.add_pass(Box::new(ScenePass::new()));
        composer.add_pass(Box::new(OutlinePass::new(
            &context,
            &layouts,
            &mut shader_composer,
            &camera_binding,
            width,
            height,
            options.outline,
        )?));

        Ok(Self {
            context,
            camera,
            camera_binding,
            scene,
            composer,
            object,
            rotation: Quat::IDENTITY,
            rotation_speed: options.display.rotation_speed,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Err(e) = self.context.resize(width, height) {
            log::warn!("viewer: ignoring resize: {e}");
            return;
        }
        self.camera.set_viewport(width, height);
        if let Err(e) = self.composer.resize(&self.context, width, height) {
            log::error!("viewer: resize failed: {e}");
        }
    }

    /// Rotate the object about its local Z, X, then Y axes.
    fn animate(&mut self) {
        let s = self.rotation_speed;
        self.rotation = (self.rotation
            * Quat::from_rotation_z(s)
            * Quat::from_rotation_x(s)
            * Quat::from_rotation_y(s))
        .normalize();
        if let Some(object) = self.scene.object_mut(self.object) {
            object.transform = Mat4::from_quat(self.rotation);
        }
    }

    fn redraw(&mut self) -> Result<(), InklineError> {
        self.animate();
        self.scene.upload_transforms(&self.context.queue);
        self.camera_binding.update(&self.context.queue, &self.camera);

        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (width, height) = self.context.size();
                self.resize(width, height);
                return Ok(());
            }
            Err(e) => {
                log::warn!("viewer: skipping frame: {e}");
                return Ok(());
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        let mut frame_context = FrameContext {
            device: &self.context.device,
            encoder: &mut encoder,
            queue: &self.context.queue,
            scene: &mut self.scene,
            camera: &self.camera_binding,
        };
        self.composer.render(&mut frame_context, &view)?;
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

impl Drop for ViewerState {
    fn drop(&mut self) {
        self.composer.dispose();
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    state: Option<ViewerState>,
    options: Options,
    title: String,
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match ViewerState::new(Arc::clone(&window), &self.options) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.state = None;
            event_loop.exit();
            return;
        }

        let (Some(window), Some(state)) = (&self.window, &mut self.state)
        else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                state.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.redraw() {
                    log::error!("render error: {e}");
                }
                window.request_redraw();
            }
            _ => (),
        }
    }
}
