//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render targets, scoped
//! render state, and shader composition.

/// Shared wgpu boilerplate helpers for screen-space and mesh pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Scoped render-state changes restored on every exit path.
pub mod render_state;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Off-screen color and depth render targets.
pub mod texture;
