use glam::UVec2;

use crate::buffers::{DescriptorSet, MappedUniformBuffer, Texture};
use crate::{bindings, gpu, Engine};

pub struct TracingPass {
    ds0: DescriptorSet,
    ds1: DescriptorSet,
    pipeline: wgpu::ComputePipeline,
}

impl TracingPass {
    pub fn new(
        engine: &Engine,
        device: &wgpu::Device,
        params: &MappedUniformBuffer<gpu::Params>,
        image: &Texture,
    ) -> Self {
        log::debug!("Initializing pass: tracing");

        let ds0 = DescriptorSet::builder("lumo_tracing_ds0")
            .add_at(bindings::TRIANGLES, &engine.triangles)
            .build(device);

        let ds1 = DescriptorSet::builder("lumo_tracing_ds1")
            .add_at(bindings::PARAMS, params)
            .add_at(bindings::IMAGE, &image.writable())
            .build(device);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lumo_tracing_pipeline_layout"),
                bind_group_layouts: &[
                    ds0.bind_group_layout(),
                    ds1.bind_group_layout(),
                ],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("lumo_tracing_pipeline"),
                layout: Some(&pipeline_layout),
                module: &engine.shaders.tracing,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });

        Self { ds0, ds1, pipeline }
    }

    pub fn run(&self, size: UVec2, encoder: &mut wgpu::CommandEncoder) {
        let grid = dispatch_grid(size);

        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("lumo_tracing_pass"),
                timestamp_writes: None,
            });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(bindings::SCENE_GROUP, self.ds0.bind_group(), &[]);
        pass.set_bind_group(bindings::FRAME_GROUP, self.ds1.bind_group(), &[]);
        pass.dispatch_workgroups(grid.x, grid.y, 1);
    }
}

/// Work-group grid covering `size` pixels with [`bindings::TILE`]-shaped
/// groups.
///
/// Rounds up, so viewports that aren't exact multiples of the tile size still
/// get every pixel dispatched; the kernel bounds-checks the overhang.
pub(crate) fn dispatch_grid(size: UVec2) -> UVec2 {
    (size + bindings::TILE - UVec2::ONE) / bindings::TILE
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn grid_covers_every_pixel() {
        for (size, expected) in [
            (uvec2(800, 600), uvec2(25, 75)),
            (uvec2(801, 600), uvec2(26, 75)),
            (uvec2(800, 601), uvec2(25, 76)),
            (uvec2(1, 1), uvec2(1, 1)),
            (uvec2(32, 8), uvec2(1, 1)),
            (uvec2(33, 9), uvec2(2, 2)),
        ] {
            let grid = dispatch_grid(size);

            assert_eq!(expected, grid, "size={size}");
            assert!(grid.x * bindings::TILE.x >= size.x);
            assert!(grid.y * bindings::TILE.y >= size.y);
        }
    }
}
