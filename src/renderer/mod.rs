//! Mesh materials and the post-processing chain.

pub mod materials;
pub mod postprocess;
