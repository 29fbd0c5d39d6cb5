//! Perspective camera and its GPU binding.

/// Camera uniform buffer and bind group.
pub mod binding;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use binding::CameraBinding;
pub use self::core::{Camera, CameraUniform};
