//! Mesh materials: the view-space normal override and the toon look.

pub mod normal;
pub mod toon;

pub use normal::{NormalMaterial, NORMAL_FORMAT};
pub use toon::{ToonMaterial, ToonParams};
