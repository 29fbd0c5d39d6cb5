use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::core::validate_clip_planes;
use crate::camera::Camera;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and framing parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(title = "Near Plane", range(min = 0.01, max = 10.0))]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(title = "Far Plane", range(min = 10.0, max = 10000.0))]
    pub zfar: f32,
    /// Eye distance from the origin along +Z.
    #[schemars(title = "Distance", range(min = 1.0, max = 200.0), extend("step" = 0.5))]
    pub distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 30.0,
        }
    }
}

impl CameraOptions {
    /// Check the clip planes and field of view.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unusable clip planes or a field of view
    /// outside `(0, 180)` degrees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_clip_planes(self.znear, self.zfar)?;
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(ConfigError::InvalidParameter {
                name: "fovy",
                value: self.fovy,
            });
        }
        Ok(())
    }

    /// Camera looking at the origin from `distance` along +Z.
    pub fn to_camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, self.distance),
            aspect,
            fovy: self.fovy,
            znear: self.znear,
            zfar: self.zfar,
            ..Camera::default()
        }
    }
}
