//! Ordered chain of screen passes over two ping-pong frame buffers.

use super::screen_pass::{FrameContext, PassBuffers, ScreenPass};
use crate::error::InklineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{validate_size, FrameBuffer};

/// Borrow slot `read` shared and the other slot mutably.
fn ping_pong<T>(slots: &mut [T; 2], read: usize) -> (&T, &mut T) {
    let (first, second) = slots.split_at_mut(1);
    if read == 0 {
        (&first[0], &mut second[0])
    } else {
        (&second[0], &mut first[0])
    }
}

/// Owns the intermediate buffers and runs every pass in insertion order.
///
/// The last pass renders straight to the view passed to
/// [`EffectComposer::render`]; earlier passes write the off-screen buffer and
/// the buffers swap after each pass that asks for it.
pub struct EffectComposer {
    buffers: [FrameBuffer; 2],
    read_index: usize,
    passes: Vec<Box<dyn ScreenPass>>,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    disposed: bool,
}

impl EffectComposer {
    /// Allocate both frame buffers in the context's surface format.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] for a zero-sized target.
    pub fn new(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<Self, InklineError> {
        validate_size(width, height)?;
        let format = context.format();
        Ok(Self {
            buffers: Self::create_buffers(&context.device, width, height, format),
            read_index: 0,
            passes: Vec::new(),
            format,
            width,
            height,
            disposed: false,
        })
    }

    fn create_buffers(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> [FrameBuffer; 2] {
        [
            FrameBuffer::new(device, "Composer Buffer A", width, height, format),
            FrameBuffer::new(device, "Composer Buffer B", width, height, format),
        ]
    }

    /// Append a pass to the chain.
    pub fn add_pass(&mut self, pass: Box<dyn ScreenPass>) {
        log::debug!("composer: added {} pass", pass.label());
        self.passes.push(pass);
    }

    /// Number of passes in the chain.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Mutable access to the chain, in render order.
    pub fn passes_mut(&mut self) -> &mut [Box<dyn ScreenPass>] {
        &mut self.passes
    }

    /// Current buffer size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize both buffers and every pass.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Config`] for a zero-sized target, before
    /// anything is changed, or the first pass error.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed("composer"));
        }
        validate_size(width, height)?;
        if (width, height) != (self.width, self.height) {
            for buffer in &self.buffers {
                buffer.destroy();
            }
            self.buffers =
                Self::create_buffers(&context.device, width, height, self.format);
            self.width = width;
            self.height = height;
        }
        for pass in &mut self.passes {
            pass.resize(context, width, height)?;
        }
        log::debug!("composer: resized to {width}x{height}");
        Ok(())
    }

    /// Run every pass; the last one renders into `final_view`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing pass and returns its error.
    pub fn render(
        &mut self,
        frame: &mut FrameContext<'_>,
        final_view: &wgpu::TextureView,
    ) -> Result<(), InklineError> {
        if self.disposed {
            return Err(InklineError::PassDisposed("composer"));
        }
        let last = self.passes.len().saturating_sub(1);
        for (i, pass) in self.passes.iter_mut().enumerate() {
            let (read, write) = ping_pong(&mut self.buffers, self.read_index);
            pass.render(
                frame,
                PassBuffers {
                    write,
                    read,
                    destination: (i == last).then_some(final_view),
                },
            )?;
            if pass.needs_swap() {
                self.read_index = 1 - self.read_index;
            }
        }
        Ok(())
    }

    /// Dispose every pass and release both buffers. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for pass in &mut self.passes {
            pass.dispose();
        }
        for buffer in &self.buffers {
            buffer.destroy();
        }
        self.disposed = true;
        log::debug!("composer: disposed {} passes", self.passes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_alternates_slots() {
        let mut slots = [10, 20];
        let (read, write) = ping_pong(&mut slots, 0);
        assert_eq!(*read, 10);
        *write += 1;
        let (read, write) = ping_pong(&mut slots, 1);
        assert_eq!(*read, 21);
        assert_eq!(*write, 10);
    }
}
