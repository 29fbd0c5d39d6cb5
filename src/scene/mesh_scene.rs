use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::{GpuMesh, Material, Scene, SceneLayouts};
use crate::camera::CameraBinding;
use crate::error::InklineError;

/// Per-object transform uniform (group 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    /// Object-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for transforming normals.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniform {
    /// Build the uniform for `model`; singular matrices fall back to an
    /// identity normal matrix.
    pub fn from_model(model: Mat4) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

/// One renderable: shared mesh, authored material, and transform.
pub struct SceneObject {
    /// Geometry.
    pub mesh: Arc<GpuMesh>,
    /// Authored material, used unless the scene has an override.
    pub material: Arc<dyn Material>,
    /// Object-to-world transform; uploaded by
    /// [`MeshScene::upload_transforms`].
    pub transform: Mat4,
    /// Hidden objects are skipped by every draw.
    pub visible: bool,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Flat list of mesh renderables drawn in insertion order.
pub struct MeshScene {
    objects: Vec<SceneObject>,
    background: wgpu::Color,
    override_material: Option<Arc<dyn Material>>,
}

impl MeshScene {
    /// Empty scene cleared to `background`.
    pub fn new(background: wgpu::Color) -> Self {
        Self {
            objects: Vec::new(),
            background,
            override_material: None,
        }
    }

    /// Add a renderable and return its index.
    pub fn add_object(
        &mut self,
        device: &wgpu::Device,
        layouts: &SceneLayouts,
        mesh: Arc<GpuMesh>,
        material: Arc<dyn Material>,
        transform: Mat4,
    ) -> usize {
        let index = self.objects.len();
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Object {index} Uniform Buffer")),
                contents: bytemuck::cast_slice(&[ObjectUniform::from_model(
                    transform,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Object {index} Bind Group")),
            layout: &layouts.object,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.objects.push(SceneObject {
            mesh,
            material,
            transform,
            visible: true,
            buffer,
            bind_group,
        });
        log::debug!("scene: added object {index}");
        index
    }

    /// All renderables.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mutable access to one renderable.
    pub fn object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    /// Change the clear color.
    pub fn set_background(&mut self, background: wgpu::Color) {
        self.background = background;
    }

    /// Write every object's transform to its uniform buffer.
    pub fn upload_transforms(&self, queue: &wgpu::Queue) {
        for object in &self.objects {
            queue.write_buffer(
                &object.buffer,
                0,
                bytemuck::cast_slice(&[ObjectUniform::from_model(
                    object.transform,
                )]),
            );
        }
    }
}

impl Scene for MeshScene {
    fn background(&self) -> wgpu::Color {
        self.background
    }

    fn override_material(&self) -> Option<&Arc<dyn Material>> {
        self.override_material.as_ref()
    }

    fn replace_override_material(
        &mut self,
        material: Option<Arc<dyn Material>>,
    ) -> Option<Arc<dyn Material>> {
        std::mem::replace(&mut self.override_material, material)
    }

    fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &CameraBinding,
    ) -> Result<(), InklineError> {
        pass.set_bind_group(0, camera.bind_group(), &[]);
        for object in self.objects.iter().filter(|o| o.visible) {
            if object.mesh.index_count == 0 {
                continue;
            }
            let material =
                self.override_material.as_ref().unwrap_or(&object.material);
            material.bind(pass);
            pass.set_bind_group(1, &object.bind_group, &[]);
            pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(
                object.mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
        }
        Ok(())
    }
}
