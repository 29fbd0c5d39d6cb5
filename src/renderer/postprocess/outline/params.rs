//! Outline configuration and its GPU uniform block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gpu::texture::validate_size;

/// Debug visualizations that bypass the outline blend.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DebugView {
    /// Normal output: scene color blended toward the outline color.
    #[default]
    Off,
    /// Unmodified scene color.
    Color,
    /// Linear depth as grayscale.
    Depth,
    /// Encoded view-space normals.
    Normal,
    /// Outline strength as grayscale.
    OutlineMask,
}

impl DebugView {
    /// Every variant, in shader selector order.
    pub const ALL: [Self; 5] = [
        Self::Off,
        Self::Color,
        Self::Depth,
        Self::Normal,
        Self::OutlineMask,
    ];

    /// Selector value understood by `outline.wgsl`.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Off => 0,
            Self::Color => 1,
            Self::Depth => 2,
            Self::Normal => 3,
            Self::OutlineMask => 4,
        }
    }

    /// The next view, wrapping back to `Off`.
    #[must_use]
    pub fn next(self) -> Self {
        let index = self.as_u32() as usize;
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// The externally tunable knobs of the outline pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Outline", inline)]
#[serde(default)]
pub struct OutlineSettings {
    /// Outline RGB color, channels in `[0, 1]`.
    #[schemars(title = "Outline Color")]
    pub outline_color: [f32; 3],
    /// Exponent applied to the saturated depth response.
    #[schemars(title = "Depth Bias", range(min = 0.05, max = 4.0), extend("step" = 0.05))]
    pub depth_bias: f32,
    /// Scale applied to the raw depth discontinuity.
    #[schemars(title = "Depth Multiplier", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    pub depth_multiplier: f32,
    /// Exponent applied to the saturated normal response.
    #[schemars(title = "Normal Bias", range(min = 0.05, max = 4.0), extend("step" = 0.05))]
    pub normal_bias: f32,
    /// Scale applied to the raw normal discontinuity.
    #[schemars(title = "Normal Multiplier", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub normal_multiplier: f32,
    /// Neighbor sample stride in pixels.
    #[schemars(title = "Width", range(min = 1, max = 8))]
    pub width: u32,
    /// Debug visualization selector.
    #[schemars(title = "Debug View")]
    pub debug_view: DebugView,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            outline_color: [0.0, 0.0, 0.0],
            depth_bias: 1.0,
            depth_multiplier: 1.0,
            normal_bias: 1.0,
            normal_multiplier: 1.0,
            width: 2,
            debug_view: DebugView::Off,
        }
    }
}

fn check_multiplier(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

// A zero exponent would turn every pixel into an edge.
fn check_bias(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

impl OutlineSettings {
    /// Reject settings that would silently degrade the output.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: zero `width`, negative or
    /// non-finite multipliers, non-positive biases, or an out-of-range color.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroSampleWidth);
        }
        if self.width > i32::MAX as u32 {
            return Err(ConfigError::InvalidParameter {
                name: "width",
                value: self.width as f32,
            });
        }
        check_bias("depth_bias", self.depth_bias)?;
        check_multiplier("depth_multiplier", self.depth_multiplier)?;
        check_bias("normal_bias", self.normal_bias)?;
        check_multiplier("normal_multiplier", self.normal_multiplier)?;
        if !self
            .outline_color
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
        {
            return Err(ConfigError::InvalidColor {
                name: "outline_color",
            });
        }
        Ok(())
    }

    /// `(depthBias, depthMultiplier, normalBias, normalMultiplier)`.
    pub fn multiplier_parameters(&self) -> [f32; 4] {
        [
            self.depth_bias,
            self.depth_multiplier,
            self.normal_bias,
            self.normal_multiplier,
        ]
    }
}

/// `(width, height, 1 / width, 1 / height)` for a validated size.
///
/// # Errors
///
/// Returns [`ConfigError::ZeroSizedTarget`] if either dimension is zero.
pub fn screen_size(width: u32, height: u32) -> Result<[f32; 4], ConfigError> {
    validate_size(width, height)?;
    let (w, h) = (width as f32, height as f32);
    Ok([w, h, 1.0 / w, 1.0 / h])
}

/// Uniform block of `outline.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutlineUniform {
    /// Outline RGB color.
    pub outline_color: [f32; 3],
    /// [`DebugView`] selector.
    pub debug_view: u32,
    /// `(depthBias, depthMultiplier, normalBias, normalMultiplier)`.
    pub multiplier_parameters: [f32; 4],
    /// `(width, height, 1 / width, 1 / height)`.
    pub screen_size: [f32; 4],
    /// Camera near plane.
    pub camera_near: f32,
    /// Camera far plane.
    pub camera_far: f32,
    /// Neighbor sample stride in pixels.
    pub width: i32,
    /// Padding for GPU alignment.
    pub _pad: u32,
}

impl OutlineUniform {
    /// Pack validated settings, a screen size, and clip planes.
    pub fn new(
        settings: &OutlineSettings,
        screen_size: [f32; 4],
        camera_near: f32,
        camera_far: f32,
    ) -> Self {
        let mut uniform = Self {
            outline_color: [0.0; 3],
            debug_view: 0,
            multiplier_parameters: [1.0; 4],
            screen_size,
            camera_near,
            camera_far,
            width: 1,
            _pad: 0,
        };
        uniform.apply_settings(settings);
        uniform
    }

    /// Copy the tunable fields from `settings`.
    pub fn apply_settings(&mut self, settings: &OutlineSettings) {
        self.outline_color = settings.outline_color;
        self.debug_view = settings.debug_view.as_u32();
        self.multiplier_parameters = settings.multiplier_parameters();
        self.width = settings.width as i32;
    }
}
