//! Host-side orchestration for a progressive, compute-shader path tracer.
//!
//! The interesting work happens on the GPU; this crate's job is to feed it
//! correctly: upload the triangle soup once, dispatch the kernel over the
//! viewport every frame, keep the sample counter honest when the camera or
//! the window changes, and make sure the kernel's image writes are fenced
//! before the blit samples them.

pub mod bindings;
mod buffers;
mod camera;
pub mod gpu;
mod material;
mod scene;
mod shaders;
mod state;
mod triangle;
mod viewport;

use glam::UVec2;

use self::buffers::StorageBuffer;
pub use self::camera::*;
pub use self::material::*;
pub use self::scene::*;
use self::shaders::Shaders;
pub use self::state::*;
pub use self::triangle::*;
pub use self::viewport::*;

pub struct Engine {
    pub(crate) shaders: Shaders,
    pub(crate) triangles: StorageBuffer<Vec<gpu::Triangle>>,
}

impl Engine {
    /// Compiles the shaders and allocates the scene's storage buffer; the
    /// buffer is sized exactly to the scene, uploads are one-shot.
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        log::info!("Initializing");

        let shaders = Shaders::new(device);

        // At least one record, so even an empty scene yields a bindable
        // buffer
        let triangles = StorageBuffer::new(
            device,
            "lumo_triangles",
            scene.triangles().len().max(1)
                * std::mem::size_of::<gpu::Triangle>(),
        );

        Self { shaders, triangles }
    }

    /// Serializes the scene into the GPU buffer; after this the host-side
    /// triangle data is no longer needed.
    pub fn write_scene(&self, queue: &wgpu::Queue, scene: &Scene) {
        self.triangles.write(queue, &scene.serialize());
    }

    pub fn create_viewport(
        &self,
        device: &wgpu::Device,
        size: UVec2,
        format: wgpu::TextureFormat,
        input: FrameInput,
    ) -> Viewport {
        Viewport::new(self, device, size, format, input)
    }
}
