//! Types shared between the host and the kernel.
//!
//! Everything here is `#[repr(C)]` and `Pod`, laid out the way the WGSL side
//! declares it: vector members sit in 16-byte lanes, with the `w` component
//! either carrying packed scalars or padding.

use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

/// A single triangle record as the kernel reads it from the storage buffer.
///
/// 5 x vec4 = 80 bytes per record; the fourth lane of each vector is padding
/// required by the storage-buffer layout rules.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub a: Vec4,
    pub b: Vec4,
    pub c: Vec4,
    pub color: Vec4,
    pub intensity: Vec4,
}

impl Triangle {
    pub fn new(
        positions: [Vec3; 3],
        color: Vec3,
        intensity: Vec3,
    ) -> Self {
        Self {
            a: positions[0].extend(0.0),
            b: positions[1].extend(0.0),
            c: positions[2].extend(0.0),
            color: color.extend(0.0),
            intensity: intensity.extend(0.0),
        }
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.a.xyz(), self.b.xyz(), self.c.xyz()]
    }

    pub fn color(&self) -> Vec3 {
        self.color.xyz()
    }

    pub fn intensity(&self) -> Vec3 {
        self.intensity.xyz()
    }
}

/// Per-frame kernel parameters, uploaded as a uniform buffer.
///
/// Scalars are packed into the spare vector lanes:
/// `screen = (width, height, samples, _)` and
/// `cursor = (x, y, seed, _)`, with `samples` and `seed` stored through
/// `f32::from_bits()`.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Pod, Zeroable)]
pub struct Params {
    pub screen: Vec4,
    pub origin: Vec4,
    pub cursor: Vec4,
}

impl Params {
    pub fn new(
        viewport: UVec2,
        samples: u32,
        origin: Vec3,
        cursor: Vec2,
        seed: u32,
    ) -> Self {
        Self {
            screen: Vec4::new(
                viewport.x as f32,
                viewport.y as f32,
                f32::from_bits(samples),
                0.0,
            ),
            origin: origin.extend(0.0),
            cursor: Vec4::new(
                cursor.x,
                cursor.y,
                f32::from_bits(seed),
                0.0,
            ),
        }
    }

    pub fn viewport(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    pub fn samples(&self) -> u32 {
        self.screen.z.to_bits()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin.xyz()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor.xy()
    }

    pub fn seed(&self) -> u32 {
        self.cursor.z.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use glam::{uvec2, vec2, vec3};

    use super::*;

    #[test]
    fn triangle_stride() {
        assert_eq!(80, mem::size_of::<Triangle>());
    }

    #[test]
    fn triangle_lanes() {
        let tri = Triangle::new(
            [
                vec3(130.0, 130.0, 200.0),
                vec3(30.0, 130.0, 200.0),
                vec3(30.0, 30.0, 200.0),
            ],
            vec3(0.5, 0.25, 0.125),
            vec3(1.0, 2.0, 3.0),
        );

        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&tri));

        assert_eq!(&[130.0, 130.0, 200.0, 0.0], &floats[0..4]);
        assert_eq!(&[30.0, 130.0, 200.0, 0.0], &floats[4..8]);
        assert_eq!(&[30.0, 30.0, 200.0, 0.0], &floats[8..12]);
        assert_eq!(&[0.5, 0.25, 0.125, 0.0], &floats[12..16]);
        assert_eq!(&[1.0, 2.0, 3.0, 0.0], &floats[16..20]);
    }

    #[test]
    fn params_size() {
        assert_eq!(48, mem::size_of::<Params>());
    }

    #[test]
    fn params_packing() {
        let params = Params::new(
            uvec2(800, 600),
            123,
            vec3(0.0, 300.0, 950.0),
            vec2(400.0, 300.0),
            0xdeadbeef,
        );

        assert_eq!(uvec2(800, 600), params.viewport());
        assert_eq!(123, params.samples());
        assert_eq!(vec3(0.0, 300.0, 950.0), params.origin());
        assert_eq!(vec2(400.0, 300.0), params.cursor());
        assert_eq!(0xdeadbeef, params.seed());
    }
}
