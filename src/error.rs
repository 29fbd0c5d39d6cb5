//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Configuration rejected before it reaches the GPU.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Neighbor sample stride of zero degenerates into self-comparison.
    ZeroSampleWidth,
    /// A render target cannot have a zero dimension.
    ZeroSizedTarget {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// An edge-response scalar is negative, non-finite, or a zero bias.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Near/far planes must satisfy `0 < near < far`.
    InvalidClipPlanes {
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
    /// A color channel is outside `[0, 1]` or not finite.
    InvalidColor {
        /// Name of the offending color.
        name: &'static str,
    },
    /// A CPU image plane does not hold `width * height` entries.
    BufferLength {
        /// Name of the plane.
        name: &'static str,
        /// Required entry count.
        expected: usize,
        /// Supplied entry count.
        actual: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSampleWidth => {
                write!(f, "outline sample width must be at least 1 pixel")
            }
            Self::ZeroSizedTarget { width, height } => {
                write!(f, "render target size {width}x{height} has a zero dimension")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid value {value} for `{name}`")
            }
            Self::InvalidClipPlanes { near, far } => {
                write!(f, "clip planes near={near} far={far} must satisfy 0 < near < far")
            }
            Self::InvalidColor { name } => {
                write!(f, "color `{name}` must have finite channels in [0, 1]")
            }
            Self::BufferLength {
                name,
                expected,
                actual,
            } => {
                write!(f, "{name} plane has {actual} entries, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors produced by the inkline crate.
#[derive(Debug)]
pub enum InklineError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Invalid pass or option configuration.
    Config(ConfigError),
    /// WGSL composition or pipeline validation failed.
    Shader(String),
    /// The host scene failed to draw.
    Scene(String),
    /// A pass was used after `dispose()`.
    PassDisposed(&'static str),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for InklineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Scene(msg) => write!(f, "scene error: {msg}"),
            Self::PassDisposed(label) => {
                write!(f, "{label} pass used after dispose")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for InklineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for InklineError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ConfigError> for InklineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for InklineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
