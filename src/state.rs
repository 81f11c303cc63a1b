use glam::{UVec2, Vec2, Vec3};

/// Everything observed by the dispatch controller this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInput {
    pub viewport: UVec2,
    pub origin: Vec3,
    pub cursor: Vec2,
}

/// What the current frame has to do, as decided by [`RenderState::step()`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub samples: u32,

    /// `Some(new_size)` when the accumulation image has to be recreated
    pub resized: Option<UVec2>,
}

/// Accumulation state cached between frames.
///
/// The accumulation image is only valid as a running average over exactly
/// [`Self::samples()`] dispatches since the last reset; any change to the
/// camera, cursor or viewport invalidates it.
#[derive(Clone, Debug)]
pub struct RenderState {
    samples: u32,
    viewport: UVec2,
    origin: Vec3,
    cursor: Vec2,
}

impl RenderState {
    pub fn new(input: FrameInput) -> Self {
        // Zero = no dispatch has run yet; the first step() yields 1 so the
        // kernel's very first dispatch overwrites instead of blending
        Self {
            samples: 0,
            viewport: input.viewport,
            origin: input.origin,
            cursor: input.cursor,
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Compares `input` against the previous frame and advances the state:
    ///
    /// - viewport changed: reset to one sample and request a new image,
    /// - camera origin or cursor changed: reset to one sample,
    /// - nothing changed: accumulate one more sample.
    pub fn step(&mut self, input: FrameInput) -> Frame {
        let resized = if input.viewport != self.viewport {
            self.viewport = input.viewport;

            Some(input.viewport)
        } else {
            None
        };

        let moved = input.origin != self.origin || input.cursor != self.cursor;

        self.origin = input.origin;
        self.cursor = input.cursor;

        if resized.is_some() || moved {
            self.samples = 1;
        } else {
            self.samples += 1;
        }

        Frame {
            samples: self.samples,
            resized,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec2, vec3};

    use super::*;

    fn input() -> FrameInput {
        FrameInput {
            viewport: uvec2(800, 600),
            origin: vec3(0.0, 300.0, 950.0),
            cursor: vec2(400.0, 300.0),
        }
    }

    #[test]
    fn unchanged_input_accumulates() {
        let mut state = RenderState::new(input());

        for expected in 1..=10 {
            let frame = state.step(input());

            assert_eq!(expected, frame.samples);
            assert_eq!(None, frame.resized);
        }
    }

    #[test]
    fn first_step_yields_one_sample() {
        let mut state = RenderState::new(input());

        assert_eq!(1, state.step(input()).samples);

        // A change on the very first frame also starts at one
        let mut state = RenderState::new(input());

        let frame = state.step(FrameInput {
            origin: vec3(50.0, 300.0, 950.0),
            ..input()
        });

        assert_eq!(1, frame.samples);
    }

    #[test]
    fn origin_change_resets() {
        let mut state = RenderState::new(input());

        state.step(input());
        state.step(input());

        let frame = state.step(FrameInput {
            origin: vec3(50.0, 300.0, 950.0),
            ..input()
        });

        assert_eq!(1, frame.samples);
        assert_eq!(None, frame.resized);

        // .. and accumulation restarts from there
        let frame = state.step(FrameInput {
            origin: vec3(50.0, 300.0, 950.0),
            ..input()
        });

        assert_eq!(2, frame.samples);
    }

    #[test]
    fn cursor_change_resets() {
        let mut state = RenderState::new(input());

        state.step(input());

        let frame = state.step(FrameInput {
            cursor: vec2(401.0, 300.0),
            ..input()
        });

        assert_eq!(1, frame.samples);
        assert_eq!(None, frame.resized);
    }

    #[test]
    fn resize_resets_and_requests_new_image() {
        let mut state = RenderState::new(input());

        state.step(input());
        state.step(input());

        let frame = state.step(FrameInput {
            viewport: uvec2(1024, 768),
            ..input()
        });

        assert_eq!(1, frame.samples);
        assert_eq!(Some(uvec2(1024, 768)), frame.resized);
        assert_eq!(uvec2(1024, 768), state.viewport());
    }

    #[test]
    fn consecutive_identical_frames_count_n_then_n_plus_one() {
        let mut state = RenderState::new(input());

        let a = state.step(input());
        let b = state.step(input());

        assert_eq!(a.samples + 1, b.samples);
    }
}
