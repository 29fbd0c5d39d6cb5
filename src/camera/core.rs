use glam::{Mat4, Vec3};

use crate::error::ConfigError;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Camera {
    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View-to-clip matrix.
    pub fn projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Set the aspect ratio from a viewport size; zero heights are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Check `0 < znear < zfar`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidClipPlanes`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_clip_planes(self.znear, self.zfar)
    }
}

/// Check that near/far planes are usable for depth linearization.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidClipPlanes`] unless `0 < near < far` and
/// both are finite.
pub fn validate_clip_planes(near: f32, far: f32) -> Result<(), ConfigError> {
    if near.is_finite() && far.is_finite() && near > 0.0 && far > near {
        Ok(())
    } else {
        Err(ConfigError::InvalidClipPlanes { near, far })
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the camera matrices and clip planes.
pub struct CameraUniform {
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// View-to-clip matrix.
    pub proj: [[f32; 4]; 4],
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position (w unused).
    pub position: [f32; 4],
    /// `[near, far, 0, 0]`.
    pub clip: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
            clip: [0.1, 1000.0, 0.0, 0.0],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        let view = camera.view();
        let proj = camera.projection();
        self.view = view.to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.view_proj = (proj * view).to_cols_array_2d();
        self.position = camera.eye.extend(1.0).to_array();
        self.clip = [camera.znear, camera.zfar, 0.0, 0.0];
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn default_matches_demo_framing() {
        let camera = Camera::default();
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 30.0));
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.build_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        assert!(validate_clip_planes(10.0, 1.0).is_err());
        assert!(validate_clip_planes(0.0, 1.0).is_err());
        assert!(validate_clip_planes(0.1, f32::INFINITY).is_err());
        assert!(validate_clip_planes(0.1, 100.0).is_ok());
    }

    #[test]
    fn uniform_carries_clip_planes() {
        let camera = Camera {
            znear: 0.5,
            zfar: 50.0,
            ..Camera::default()
        };
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        assert_eq!(uniform.clip, [0.5, 50.0, 0.0, 0.0]);
        assert_eq!(uniform.position, [0.0, 0.0, 30.0, 1.0]);
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(800, 0);
        assert_eq!(camera.aspect, 2.0);
    }
}
