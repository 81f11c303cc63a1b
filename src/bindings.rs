//! Binding-slot manifest shared between the host and the kernel.
//!
//! The slot numbers below are a convention between our pipelines and the
//! `@group` / `@binding` declarations inside the shaders - a mismatch is not a
//! type error, it's a silently wrong image, so the tests at the bottom check
//! the WGSL sources against these constants.

use glam::UVec2;

/// Bind group holding scene data; owned by [`crate::Engine`].
pub const SCENE_GROUP: u32 = 0;

/// Triangle storage buffer, within [`SCENE_GROUP`].
pub const TRIANGLES: u32 = 3;

/// Bind group holding per-viewport data; owned by [`crate::Viewport`].
pub const FRAME_GROUP: u32 = 1;

/// Params uniform buffer, within [`FRAME_GROUP`].
pub const PARAMS: u32 = 0;

/// Accumulation image (storage view), within [`FRAME_GROUP`].
pub const IMAGE: u32 = 1;

/// Per-workgroup invocation shape of the tracing kernel; the dispatch grid is
/// derived from this, so it has to match the kernel's `@workgroup_size`.
pub const TILE: UVec2 = UVec2::new(32, 8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::{DRAWING_SRC, TRACING_SRC};

    fn declares(src: &str, group: u32, binding: u32) -> bool {
        src.contains(&format!("@group({group}) @binding({binding})"))
    }

    #[test]
    fn tracing_kernel_slots() {
        assert!(declares(TRACING_SRC, SCENE_GROUP, TRIANGLES));
        assert!(declares(TRACING_SRC, FRAME_GROUP, PARAMS));
        assert!(declares(TRACING_SRC, FRAME_GROUP, IMAGE));
    }

    #[test]
    fn tracing_kernel_tile() {
        assert!(TRACING_SRC
            .contains(&format!("@workgroup_size({}, {})", TILE.x, TILE.y)));
    }

    #[test]
    fn drawing_shader_slots() {
        // The drawing pass binds the accumulation image as a sampled texture
        // at bindings 0 (view) and 1 (sampler) of its only group.
        assert!(declares(DRAWING_SRC, 0, 0));
        assert!(declares(DRAWING_SRC, 0, 1));
    }
}
