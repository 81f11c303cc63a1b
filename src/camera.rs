use fxhash::FxHashSet;
use glam::{Vec2, Vec3};
use winit::keyboard::KeyCode;

/// World units per frame for a held movement key
const MOVE_STEP: f32 = 50.0;

const DEFAULT_ORIGIN: Vec3 = Vec3::new(0.0, 300.0, 950.0);

/// Maps keyboard and cursor input onto the camera parameters fed to the
/// kernel.
///
/// Movement keys are polled, not edge-triggered: a held key translates the
/// origin once per call to [`Self::step()`], i.e. once per frame.
#[derive(Debug)]
pub struct CameraController {
    origin: Vec3,
    cursor: Vec2,
    held: FxHashSet<KeyCode>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            cursor: Vec2::ZERO,
            held: Default::default(),
        }
    }

    pub fn key(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(code);
        } else {
            self.held.remove(&code);
        }
    }

    pub fn cursor(&mut self, pos: Vec2) {
        self.cursor = pos;
    }

    /// Applies one translation step for every key currently held.
    pub fn step(&mut self) {
        for key in &self.held {
            match key {
                KeyCode::KeyW => self.origin.z -= MOVE_STEP,
                KeyCode::KeyS => self.origin.z += MOVE_STEP,
                KeyCode::KeyA => self.origin.x -= MOVE_STEP,
                KeyCode::KeyD => self.origin.x += MOVE_STEP,
                _ => (),
            }
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn cursor_pos(&self) -> Vec2 {
        self.cursor
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn held_key_steps_every_frame() {
        let mut camera = CameraController::new();

        camera.key(KeyCode::KeyW, true);
        camera.step();
        camera.step();

        assert_eq!(DEFAULT_ORIGIN + vec3(0.0, 0.0, -100.0), camera.origin());

        camera.key(KeyCode::KeyW, false);
        camera.step();

        assert_eq!(DEFAULT_ORIGIN + vec3(0.0, 0.0, -100.0), camera.origin());
    }

    #[test]
    fn strafing() {
        let mut camera = CameraController::new();

        camera.key(KeyCode::KeyA, true);
        camera.step();
        camera.key(KeyCode::KeyA, false);
        camera.key(KeyCode::KeyD, true);
        camera.step();
        camera.step();

        assert_eq!(DEFAULT_ORIGIN + vec3(50.0, 0.0, 0.0), camera.origin());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut camera = CameraController::new();

        camera.key(KeyCode::KeyQ, true);
        camera.step();

        assert_eq!(DEFAULT_ORIGIN, camera.origin());
    }
}
