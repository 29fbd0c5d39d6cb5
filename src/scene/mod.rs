//! Host scene collaborator.
//!
//! The pipeline stages never own scene state. They draw through the
//! [`Scene`] trait and, for normal capture, temporarily swap every
//! renderable's material for an override via [`MaterialOverride`].
//!
//! Bind group convention shared by all mesh materials:
//!
//! - group 0: camera ([`crate::camera::CameraUniform`])
//! - group 1: per-object transform ([`ObjectUniform`])
//! - group 2: material parameters (optional, bound by [`Material::bind`])

mod layouts;
mod mesh;
mod mesh_scene;

use std::sync::Arc;

pub use layouts::SceneLayouts;
pub use mesh::{GpuMesh, MeshData, MeshVertex};
pub use mesh_scene::{MeshScene, ObjectUniform, SceneObject};

use crate::camera::CameraBinding;
use crate::error::InklineError;

/// A shading program for scene geometry.
pub trait Material: Send + Sync {
    /// Debug label.
    fn label(&self) -> &str;
    /// Set the pipeline and any material-owned bind groups (group 2+).
    fn bind(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Everything a pipeline stage needs from the host scene.
pub trait Scene {
    /// Clear color for any target the scene is rendered into.
    fn background(&self) -> wgpu::Color;

    /// Material currently forced onto every renderable, if any.
    fn override_material(&self) -> Option<&Arc<dyn Material>>;

    /// Install (or clear) the override material, returning the previous one.
    fn replace_override_material(
        &mut self,
        material: Option<Arc<dyn Material>>,
    ) -> Option<Arc<dyn Material>>;

    /// Record draw calls for every visible renderable.
    ///
    /// # Errors
    ///
    /// Implementations return [`InklineError::Scene`] when a renderable
    /// cannot be drawn.
    fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &CameraBinding,
    ) -> Result<(), InklineError>;
}

/// Override material installed for the guard's lifetime.
///
/// Whatever override was active before is reinstated on drop, including
/// when the render in between bails out with an error.
pub struct MaterialOverride<'s> {
    scene: &'s mut dyn Scene,
    previous: Option<Arc<dyn Material>>,
}

impl<'s> MaterialOverride<'s> {
    /// Push `material` as the scene's override.
    pub fn push(scene: &'s mut dyn Scene, material: Arc<dyn Material>) -> Self {
        let previous = scene.replace_override_material(Some(material));
        Self { scene, previous }
    }

    /// Run `f` with `material` overriding the scene, then pop it.
    pub fn scoped<R>(
        scene: &mut dyn Scene,
        material: Arc<dyn Material>,
        f: impl FnOnce(&dyn Scene) -> R,
    ) -> R {
        let guard = MaterialOverride::push(scene, material);
        f(guard.scene())
    }

    /// The scene with the override applied.
    pub fn scene(&self) -> &dyn Scene {
        &*self.scene
    }
}

impl Drop for MaterialOverride<'_> {
    fn drop(&mut self) {
        let _ = self.scene.replace_override_material(self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(&'static str);

    impl Material for Flat {
        fn label(&self) -> &str {
            self.0
        }

        fn bind(&self, _pass: &mut wgpu::RenderPass<'_>) {}
    }

    #[derive(Default)]
    struct Stub {
        override_material: Option<Arc<dyn Material>>,
    }

    impl Scene for Stub {
        fn background(&self) -> wgpu::Color {
            wgpu::Color::WHITE
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
            _pass: &mut wgpu::RenderPass<'_>,
            _camera: &CameraBinding,
        ) -> Result<(), InklineError> {
            Ok(())
        }
    }

    fn active_label(scene: &dyn Scene) -> Option<String> {
        scene.override_material().map(|m| m.label().to_owned())
    }

    #[test]
    fn override_is_visible_inside_scope_only() {
        let mut scene = Stub::default();
        let seen = MaterialOverride::scoped(
            &mut scene,
            Arc::new(Flat("normals")),
            active_label,
        );
        assert_eq!(seen.as_deref(), Some("normals"));
        assert!(scene.override_material().is_none());
    }

    #[test]
    fn previous_override_is_reinstated() {
        let mut scene = Stub::default();
        let _ = scene.replace_override_material(Some(Arc::new(Flat("wire"))));
        {
            let guard =
                MaterialOverride::push(&mut scene, Arc::new(Flat("normals")));
            assert_eq!(active_label(guard.scene()).as_deref(), Some("normals"));
        }
        assert_eq!(active_label(&scene).as_deref(), Some("wire"));
    }

    #[test]
    fn override_is_popped_when_render_fails() {
        let mut scene = Stub::default();
        let result: Result<(), InklineError> = MaterialOverride::scoped(
            &mut scene,
            Arc::new(Flat("normals")),
            |_| Err(InklineError::Scene("mesh buffer lost".into())),
        );
        assert!(result.is_err());
        assert!(scene.override_material().is_none());
    }
}
