//! Post-processing chain: the pass contract, the composer that runs passes
//! over ping-pong buffers, and the scene and outline passes.

pub mod composer;
pub mod outline;
pub mod scene_pass;
pub mod screen_pass;

pub use composer::EffectComposer;
pub use outline::{OutlinePass, OutlineSettings};
pub use scene_pass::ScenePass;
pub use screen_pass::{FrameContext, PassBuffers, ScreenPass};
