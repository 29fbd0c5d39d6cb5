use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::materials::ToonParams;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Demo scene look: background, toon shading, and animation.
pub struct DisplayOptions {
    /// Clear color, channels in `[0, 1]`.
    #[schemars(title = "Background")]
    pub background: [f32; 3],
    /// Toon base color, channels in `[0, 1]`.
    #[schemars(title = "Object Color")]
    pub object_color: [f32; 3],
    /// Number of toon shading tones.
    #[schemars(title = "Tones", range(min = 2, max = 8))]
    pub bands: u32,
    /// Rotation per frame around each axis, in radians.
    #[schemars(title = "Rotation Speed", range(min = 0.0, max = 0.1), extend("step" = 0.001))]
    pub rotation_speed: f32,
    /// Point light world position.
    #[schemars(title = "Light Position")]
    pub light_position: [f32; 3],
    /// Ambient light color.
    #[schemars(title = "Ambient Color")]
    pub ambient_color: [f32; 3],
    /// Ambient light intensity.
    #[schemars(title = "Ambient Intensity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub ambient_intensity: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [1.0, 1.0, 1.0],
            object_color: [1.0, 1.0, 1.0],
            bands: 4,
            rotation_speed: 0.01,
            light_position: [0.0, 16.0, 0.0],
            ambient_color: [1.0, 0.976, 1.0],
            ambient_intensity: 0.35,
        }
    }
}

fn check_color(name: &'static str, color: [f32; 3]) -> Result<(), ConfigError> {
    if color.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(ConfigError::InvalidColor { name })
    }
}

impl DisplayOptions {
    /// Check colors, tone count, and intensities.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_color("background", self.background)?;
        check_color("object_color", self.object_color)?;
        check_color("ambient_color", self.ambient_color)?;
        if self.bands < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "bands",
                value: self.bands as f32,
            });
        }
        for (name, value) in [
            ("rotation_speed", self.rotation_speed),
            ("ambient_intensity", self.ambient_intensity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Background as a clear color.
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.background.map(f64::from);
        wgpu::Color { r, g, b, a: 1.0 }
    }

    /// Toon material inputs.
    pub fn toon_params(&self) -> ToonParams {
        ToonParams::new(
            self.object_color,
            Vec3::from_array(self.light_position),
            self.bands,
            self.ambient_color,
            self.ambient_intensity,
        )
    }
}
