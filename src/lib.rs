// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Screen-space silhouette and crease outlines for wgpu.
//!
//! Inkline draws cartoon-style outlines as a post-process. An
//! [`OutlinePass`](renderer::postprocess::OutlinePass) re-renders the scene
//! with a view-space normal material, then a fullscreen composite finds depth
//! and normal discontinuities around every pixel and blends an outline color
//! into the scene color.
//!
//! # Key entry points
//!
//! - [`renderer::postprocess::EffectComposer`] - ordered pass chain over
//!   ping-pong frame buffers
//! - [`renderer::postprocess::OutlinePass`] - the outline effect
//! - [`renderer::postprocess::outline::OutlineKernel`] - CPU evaluation of the
//!   composite, for tuning and tests
//! - [`scene::Scene`] - what a host scene must provide
//! - [`options::Options`] - TOML presets for the outline, camera, and demo
//!
//! # Frame flow
//!
//! [`ScenePass`](renderer::postprocess::ScenePass) renders color and depth
//! into the composer's read buffer. The outline pass captures normals into
//! its own target, samples all three, and writes either the next buffer or
//! the surface when it is last in the chain.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::InklineError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
