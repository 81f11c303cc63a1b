mod drawing_pass;
mod tracing_pass;

use glam::UVec2;
use rand::Rng;

use self::drawing_pass::*;
use self::tracing_pass::*;
use crate::buffers::{MappedUniformBuffer, Texture};
use crate::{gpu, Engine, Frame, FrameInput, RenderState};

/// One renderable view: the accumulation image, the per-frame params and the
/// two passes operating on them.
///
/// Per frame: [`Self::prepare()`] runs the state machine and rebuilds
/// resources on resize, [`Self::flush()`] uploads dirty params,
/// [`Self::render()`] records dispatch + blit into one encoder.
pub struct Viewport {
    state: RenderState,
    format: wgpu::TextureFormat,
    params: MappedUniformBuffer<gpu::Params>,
    image: Texture,
    tracing_pass: TracingPass,
    drawing_pass: DrawingPass,
}

impl Viewport {
    pub(crate) fn new(
        engine: &Engine,
        device: &wgpu::Device,
        size: UVec2,
        format: wgpu::TextureFormat,
        input: FrameInput,
    ) -> Self {
        log::info!("Creating viewport; size={size}, format={format:?}");

        assert!(size.x > 0);
        assert!(size.y > 0);

        let state = RenderState::new(FrameInput {
            viewport: size,
            ..input
        });

        let params = MappedUniformBuffer::new(
            device,
            "lumo_params",
            gpu::Params::default(),
        );

        let image = Texture::new(device, "lumo_image", size);
        let tracing_pass = TracingPass::new(engine, device, &params, &image);

        let drawing_pass =
            DrawingPass::new(engine, device, format, &image);

        Self {
            state,
            format,
            params,
            image,
            tracing_pass,
            drawing_pass,
        }
    }

    pub fn size(&self) -> UVec2 {
        self.state.viewport()
    }

    /// Steps the accumulation state machine for this frame; recreates the
    /// image (and the passes bound to it) when the viewport got resized.
    pub fn prepare(
        &mut self,
        engine: &Engine,
        device: &wgpu::Device,
        input: FrameInput,
    ) -> Frame {
        let frame = self.state.step(input);

        if let Some(size) = frame.resized {
            self.resize(engine, device, size);
        }

        *self.params = gpu::Params::new(
            self.state.viewport(),
            frame.samples,
            input.origin,
            input.cursor,
            rand::thread_rng().gen(),
        );

        frame
    }

    fn resize(&mut self, engine: &Engine, device: &wgpu::Device, size: UVec2) {
        log::debug!("Viewport resized; size={size} - rebuilding image");

        self.image = Texture::new(device, "lumo_image", size);

        self.tracing_pass =
            TracingPass::new(engine, device, &self.params, &self.image);

        self.drawing_pass =
            DrawingPass::new(engine, device, self.format, &self.image);
    }

    pub fn flush(&mut self, queue: &wgpu::Queue) {
        self.params.flush(queue);
    }

    /// Records this frame's work: the tracing dispatch, then the blit.
    ///
    /// Both land in the same encoder with the compute pass ended before the
    /// render pass begins; that boundary is where wgpu fences the kernel's
    /// image writes against the drawing pass's sampled read, so the blit
    /// never observes a half-written accumulation image.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        self.tracing_pass.run(self.state.viewport(), encoder);
        self.drawing_pass.run(encoder, target);
    }
}

impl Drop for Viewport {
    fn drop(&mut self) {
        log::info!("Releasing viewport; size={}", self.state.viewport());
    }
}
