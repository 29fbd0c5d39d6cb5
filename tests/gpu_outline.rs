//! Outline pass lifecycle and rendering on a headless adapter.
//!
//! Every test returns early when the machine has no usable adapter. Pixel
//! tests compare the WGSL composite with [`OutlineKernel`] on the same
//! inputs read back from the GPU.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use inkline::camera::{Camera, CameraBinding};
use inkline::error::{ConfigError, InklineError};
use inkline::gpu::pipeline_helpers::validated;
use inkline::gpu::render_context::RenderContext;
use inkline::gpu::shader_composer::ShaderComposer;
use inkline::gpu::texture::{FrameBuffer, RenderTarget};
use inkline::renderer::materials::{ToonMaterial, ToonParams};
use inkline::renderer::postprocess::outline::{
    DebugView, GBufferImage, OutlineKernel,
};
use inkline::renderer::postprocess::{
    EffectComposer, FrameContext, OutlinePass, OutlineSettings, PassBuffers,
    ScenePass, ScreenPass,
};
use inkline::scene::{GpuMesh, MeshData, MeshScene, Scene, SceneLayouts};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const SIZE: u32 = 64;

struct Fixture {
    context: RenderContext,
    layouts: SceneLayouts,
    shader_composer: ShaderComposer,
    camera: Camera,
    camera_binding: CameraBinding,
}

impl Fixture {
    fn on(backends: wgpu::Backends) -> Option<Self> {
        let context = pollster::block_on(RenderContext::headless(
            backends, FORMAT, SIZE, SIZE,
        ))
        .ok()?;
        let layouts = SceneLayouts::new(&context.device);
        let shader_composer = ShaderComposer::new().ok()?;
        let camera = Camera {
            aspect: 1.0,
            ..Camera::default()
        };
        let camera_binding =
            CameraBinding::new(&context.device, &layouts, &camera);
        Some(Self {
            context,
            layouts,
            shader_composer,
            camera,
            camera_binding,
        })
    }
}

/// Prefer a native backend, fall back to GL.
fn fixture() -> Option<Fixture> {
    [wgpu::Backends::PRIMARY, wgpu::Backends::GL]
        .into_iter()
        .find_map(Fixture::on)
}

/// `None` when the adapter cannot build the pass; callers skip.
fn outline_pass(f: &mut Fixture, settings: OutlineSettings) -> Option<OutlinePass> {
    OutlinePass::new(
        &f.context,
        &f.layouts,
        &mut f.shader_composer,
        &f.camera_binding,
        SIZE,
        SIZE,
        settings,
    )
    .ok()
}

fn toon_scene(f: &mut Fixture, mesh: &MeshData) -> MeshScene {
    let device = &f.context.device;
    let toon = ToonMaterial::new(
        device,
        &f.layouts,
        &mut f.shader_composer,
        FORMAT,
        ToonParams::default(),
    )
    .unwrap();
    let mesh = GpuMesh::upload(device, "Test Mesh", mesh);
    let mut scene = MeshScene::new(wgpu::Color::WHITE);
    let _ = scene.add_object(
        device,
        &f.layouts,
        Arc::new(mesh),
        Arc::new(toon),
        Mat4::IDENTITY,
    );
    scene
}

/// Copy a 4-byte-per-texel `SIZE` x `SIZE` texture into host memory.
fn read_texture(
    context: &RenderContext,
    texture: &wgpu::Texture,
    aspect: wgpu::TextureAspect,
) -> Vec<u8> {
    let device = &context.device;
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: u64::from(SIZE * SIZE * 4),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = context.create_encoder();
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(SIZE * 4),
                rows_per_image: Some(SIZE),
            },
        },
        wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
    );
    context.submit(encoder);

    readback.slice(..).map_async(wgpu::MapMode::Read, |_| ());
    let _ = device.poll(wgpu::PollType::Wait);
    let bytes = readback.slice(..).get_mapped_range().to_vec();
    readback.unmap();
    bytes
}

fn unorm(bytes: &[u8]) -> Vec<Vec4> {
    bytes
        .chunks_exact(4)
        .map(|c| Vec4::new(c[0].into(), c[1].into(), c[2].into(), c[3].into()) / 255.0)
        .collect()
}

fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Buffers for driving the scene and outline passes by hand.
struct Frame {
    scene: FrameBuffer,
    scratch: FrameBuffer,
    output: RenderTarget,
}

impl Frame {
    fn new(device: &wgpu::Device) -> Self {
        Self {
            scene: FrameBuffer::new(device, "Scene", SIZE, SIZE, FORMAT),
            scratch: FrameBuffer::new(device, "Scratch", SIZE, SIZE, FORMAT),
            output: RenderTarget::new(device, "Output", SIZE, SIZE, FORMAT),
        }
    }

    /// Scene pass into `self.scene`, then the outline pass into `output`.
    fn draw(
        &mut self,
        f: &Fixture,
        scene: &mut MeshScene,
        outline: &mut OutlinePass,
    ) -> Result<(), InklineError> {
        let mut encoder = f.context.create_encoder();
        {
            let mut frame = FrameContext {
                device: &f.context.device,
                encoder: &mut encoder,
                queue: &f.context.queue,
                scene,
                camera: &f.camera_binding,
            };
            ScenePass::new().render(
                &mut frame,
                PassBuffers {
                    write: &mut self.scratch,
                    read: &self.scene,
                    destination: None,
                },
            )?;
            outline.render(
                &mut frame,
                PassBuffers {
                    write: &mut self.scratch,
                    read: &self.scene,
                    destination: Some(&self.output.view),
                },
            )?;
        }
        f.context.submit(encoder);
        Ok(())
    }

    fn output_pixels(&self, context: &RenderContext) -> Vec<u8> {
        read_texture(context, &self.output.texture, wgpu::TextureAspect::All)
    }

    fn scene_pixels(&self, context: &RenderContext) -> Vec<u8> {
        read_texture(context, &self.scene.color.texture, wgpu::TextureAspect::All)
    }
}

#[test]
fn outline_pass_builds_on_every_available_backend() {
    for backends in [wgpu::Backends::PRIMARY, wgpu::Backends::GL] {
        let Some(mut f) = Fixture::on(backends) else {
            continue;
        };
        let result = OutlinePass::new(
            &f.context,
            &f.layouts,
            &mut f.shader_composer,
            &f.camera_binding,
            SIZE,
            SIZE,
            OutlineSettings::default(),
        );
        assert!(
            result.is_ok(),
            "{:?}: {:?}",
            f.context.adapter_info().backend,
            result.err()
        );
    }
}

#[test]
fn validation_errors_are_returned_not_raised() {
    let Some(f) = fixture() else { return };
    let device = &f.context.device;
    let texture = |width: u32| {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scoped Texture"),
            size: wgpu::Extent3d {
                width,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    };

    let rejected = validated(device, "zero-width texture", || Ok(texture(0)));
    assert!(matches!(rejected, Err(InklineError::Shader(msg)) if msg.contains("zero-width texture")));

    let accepted = validated(device, "small texture", || Ok(texture(4)));
    assert!(accepted.is_ok());
}

#[test]
fn resize_updates_target_and_screen_size_together() {
    let Some(mut f) = fixture() else { return };
    let Some(mut pass) = outline_pass(&mut f, OutlineSettings::default()) else {
        return;
    };
    assert_eq!(pass.normal_target_size(), (SIZE, SIZE));

    for (w, h) in [(1, 1), (17, 5), (640, 480), (SIZE, SIZE)] {
        pass.resize(&f.context, w, h).unwrap();
        assert_eq!(pass.normal_target_size(), (w, h));
        assert_eq!(
            pass.screen_size(),
            [w as f32, h as f32, 1.0 / w as f32, 1.0 / h as f32]
        );
    }
}

#[test]
fn zero_sized_resize_leaves_pass_unchanged() {
    let Some(mut f) = fixture() else { return };
    let Some(mut pass) = outline_pass(&mut f, OutlineSettings::default()) else {
        return;
    };
    let before = pass.screen_size();
    let err = pass.resize(&f.context, 0, 32).unwrap_err();
    assert!(matches!(
        err,
        InklineError::Config(ConfigError::ZeroSizedTarget { width: 0, height: 32 })
    ));
    assert_eq!(pass.screen_size(), before);
    assert_eq!(pass.normal_target_size(), (SIZE, SIZE));

    assert!(f.context.resize(0, 32).is_err());
    assert_eq!(f.context.size(), (SIZE, SIZE));
}

#[test]
fn construction_rejects_bad_configuration() {
    let Some(mut f) = fixture() else { return };
    let zero_width = OutlineSettings {
        width: 0,
        ..Default::default()
    };
    let result = OutlinePass::new(
        &f.context,
        &f.layouts,
        &mut f.shader_composer,
        &f.camera_binding,
        SIZE,
        SIZE,
        zero_width,
    );
    assert!(matches!(
        result,
        Err(InklineError::Config(ConfigError::ZeroSampleWidth))
    ));

    let result = OutlinePass::new(
        &f.context,
        &f.layouts,
        &mut f.shader_composer,
        &f.camera_binding,
        SIZE,
        0,
        OutlineSettings::default(),
    );
    assert!(result.is_err());
}

#[test]
fn dispose_twice_is_harmless() {
    let Some(mut f) = fixture() else { return };
    let (Some(mut first), Some(second)) = (
        outline_pass(&mut f, OutlineSettings::default()),
        outline_pass(&mut f, OutlineSettings::default()),
    ) else {
        return;
    };

    first.dispose();
    first.dispose();
    assert!(first.is_disposed());
    assert!(!second.is_disposed());
    assert_eq!(second.normal_target_size(), (SIZE, SIZE));
    assert!(matches!(
        first.resize(&f.context, 8, 8),
        Err(InklineError::PassDisposed("outline"))
    ));
}

#[test]
fn settings_updates_are_validated() {
    let Some(mut f) = fixture() else { return };
    let Some(mut pass) = outline_pass(&mut f, OutlineSettings::default()) else {
        return;
    };
    let thick = OutlineSettings {
        width: 4,
        depth_multiplier: 3.0,
        ..Default::default()
    };
    pass.set_settings(&f.context.queue, thick).unwrap();
    assert_eq!(pass.uniform().width, 4);
    assert_eq!(pass.uniform().multiplier_parameters[1], 3.0);

    let bad = OutlineSettings {
        normal_bias: 0.0,
        ..Default::default()
    };
    assert!(pass.set_settings(&f.context.queue, bad).is_err());
    assert_eq!(*pass.settings(), thick);
}

#[test]
fn failed_render_restores_depth_writes() {
    let Some(mut f) = fixture() else { return };
    let mut scene = toon_scene(&mut f, &MeshData::icosahedron(12.0));
    let Some(mut pass) = outline_pass(&mut f, OutlineSettings::default()) else {
        return;
    };
    let inverted = Camera {
        znear: 2000.0,
        ..f.camera.clone()
    };
    let bad_camera = CameraBinding::new(&f.context.device, &f.layouts, &inverted);
    let mut frame = Frame::new(&f.context.device);
    assert!(frame.scratch.depth_write);

    let mut encoder = f.context.create_encoder();
    let result = pass.render(
        &mut FrameContext {
            device: &f.context.device,
            encoder: &mut encoder,
            queue: &f.context.queue,
            scene: &mut scene,
            camera: &bad_camera,
        },
        PassBuffers {
            write: &mut frame.scratch,
            read: &frame.scene,
            destination: None,
        },
    );
    assert!(matches!(
        result,
        Err(InklineError::Config(ConfigError::InvalidClipPlanes { .. }))
    ));
    assert!(frame.scratch.depth_write);
    assert!(scene.override_material().is_none());
}

#[test]
fn color_view_reproduces_scene_bit_for_bit() {
    let Some(mut f) = fixture() else { return };
    let mut scene = toon_scene(&mut f, &MeshData::icosahedron(12.0));
    let settings = OutlineSettings {
        debug_view: DebugView::Color,
        ..Default::default()
    };
    let Some(mut pass) = outline_pass(&mut f, settings) else { return };
    let mut frame = Frame::new(&f.context.device);
    frame.draw(&f, &mut scene, &mut pass).unwrap();

    let scene_pixels = frame.scene_pixels(&f.context);
    assert_eq!(frame.output_pixels(&f.context), scene_pixels);
    // The scene is not blank: the icosahedron is shaded darker than white.
    assert!(scene_pixels.chunks_exact(4).any(|p| p[0] < 250));
}

#[test]
fn flat_frontal_plane_has_no_outline() {
    let Some(mut f) = fixture() else { return };
    // Far larger than the view at the camera's distance.
    let mut scene = toon_scene(&mut f, &MeshData::plane(200.0));
    let Some(mut pass) = outline_pass(&mut f, OutlineSettings::default()) else {
        return;
    };
    let mut frame = Frame::new(&f.context.device);
    frame.draw(&f, &mut scene, &mut pass).unwrap();

    let scene_pixels = frame.scene_pixels(&f.context);
    let shaded = frame.output_pixels(&f.context);
    for (i, (out, input)) in shaded.iter().zip(&scene_pixels).enumerate() {
        assert!(out.abs_diff(*input) <= 1, "byte {i}: {out} vs {input}");
    }

    let mask = OutlineSettings {
        debug_view: DebugView::OutlineMask,
        ..Default::default()
    };
    pass.set_settings(&f.context.queue, mask).unwrap();
    frame.draw(&f, &mut scene, &mut pass).unwrap();
    let strengths = frame.output_pixels(&f.context);
    assert!(strengths.chunks_exact(4).all(|p| p[..3] == [0, 0, 0]));
}

#[test]
fn composite_matches_cpu_kernel() {
    let Some(mut f) = fixture() else { return };
    if !f
        .context
        .downlevel_flags()
        .contains(wgpu::DownlevelFlags::DEPTH_TEXTURE_AND_BUFFER_COPIES)
    {
        return;
    }
    let mut scene = toon_scene(&mut f, &MeshData::icosahedron(12.0));
    let settings = OutlineSettings::default();
    let Some(mut pass) = outline_pass(&mut f, settings) else { return };
    let mut frame = Frame::new(&f.context.device);

    frame.draw(&f, &mut scene, &mut pass).unwrap();
    let shaded = frame.output_pixels(&f.context);
    let color = unorm(&frame.scene_pixels(&f.context));
    let depth = floats(&read_texture(
        &f.context,
        &frame.scene.depth.texture,
        wgpu::TextureAspect::DepthOnly,
    ));

    // The normal view passes the captured normals through unchanged.
    let normal_view = OutlineSettings {
        debug_view: DebugView::Normal,
        ..settings
    };
    pass.set_settings(&f.context.queue, normal_view).unwrap();
    frame.draw(&f, &mut scene, &mut pass).unwrap();
    let normal: Vec<Vec3> = unorm(&frame.output_pixels(&f.context))
        .into_iter()
        .map(Vec4::truncate)
        .collect();

    let image = GBufferImage::new(SIZE, SIZE, &color, &depth, &normal).unwrap();
    let kernel =
        OutlineKernel::new(settings, f.camera.znear, f.camera.zfar).unwrap();
    let expected = kernel.render(&image);

    for (i, (gpu, cpu)) in shaded.chunks_exact(4).zip(&expected).enumerate() {
        for c in 0..3 {
            let want = (cpu[c] * 255.0).round();
            let got = f32::from(gpu[c]);
            assert!(
                (got - want).abs() <= 2.0,
                "pixel ({}, {}) channel {c}: gpu {got}, cpu {want}",
                i as u32 % SIZE,
                i as u32 / SIZE,
            );
        }
    }
    let outlined = (0..SIZE)
        .any(|x| kernel.sample(&image, x, SIZE / 2).strength >= 0.5);
    assert!(outlined);
}

/// Render a white-background scene with a centered icosahedron through the
/// composer and return the RGBA8 pixels of the final image.
fn render_demo_frame(f: &mut Fixture, scene: &mut MeshScene) -> Option<Vec<u8>> {
    let target = RenderTarget::new(&f.context.device, "Final Target", SIZE, SIZE, FORMAT);

    let mut composer = EffectComposer::new(&f.context, SIZE, SIZE).unwrap();
    composer.add_pass(Box::new(ScenePass::new()));
    composer.add_pass(Box::new(outline_pass(f, OutlineSettings::default())?));
    assert_eq!(composer.pass_count(), 2);

    let mut encoder = f.context.create_encoder();
    {
        let mut frame = FrameContext {
            device: &f.context.device,
            encoder: &mut encoder,
            queue: &f.context.queue,
            scene: &mut *scene,
            camera: &f.camera_binding,
        };
        composer.render(&mut frame, &target.view).unwrap();
    }
    f.context.submit(encoder);

    let pixels = read_texture(&f.context, &target.texture, wgpu::TextureAspect::All);
    composer.dispose();
    composer.dispose();
    Some(pixels)
}

#[test]
fn silhouette_is_drawn_and_background_is_untouched() {
    let Some(mut f) = fixture() else { return };
    let mut scene = toon_scene(&mut f, &MeshData::icosahedron(12.0));
    let Some(pixels) = render_demo_frame(&mut f, &mut scene) else {
        return;
    };

    let pixel = |x: u32, y: u32| {
        let i = ((y * SIZE + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2]]
    };
    for (x, y) in [(0, 0), (SIZE - 1, 0), (0, SIZE - 1), (SIZE - 1, SIZE - 1)] {
        assert_eq!(pixel(x, y), [255, 255, 255], "corner ({x}, {y})");
    }
    let middle_row_has_outline =
        (0..SIZE).any(|x| pixel(x, SIZE / 2).iter().all(|&c| c < 64));
    assert!(middle_row_has_outline);

    // The normal override must not outlive the frame.
    assert!(scene.override_material().is_none());
}
