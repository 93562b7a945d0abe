use glam::{Vec2, Vec3};
use winit::keyboard::KeyCode;

use super::Camera;
use crate::input::Input;

/// Pitch never reaches the poles, where the view basis would flip.
pub(crate) const PITCH_LIMIT: f32 = 89.0;

/// Scales drag-dolly input relative to scroll zoom.
const DOLLY_FACTOR: f32 = 0.05;

/// What a pointer drag is currently doing to the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// No drag in progress.
    #[default]
    Idle,
    /// Rotating around the target.
    Orbiting,
    /// Sliding target and position across the view plane (Shift held).
    Panning,
    /// Moving toward or away from the target (Ctrl held).
    Dollying,
}

impl Camera {
    /// One frame of mouse, keyboard and scroll handling.
    pub(super) fn process_input(&mut self, input: &Input, dt: f32) {
        self.process_mouse(input);
        self.process_keyboard(input, dt);
        self.process_scroll(input);
    }

    fn process_mouse(&mut self, input: &Input) {
        let button = self.settings.control_button;

        if !input.mouse_down(button) {
            if self.captured {
                log::debug!("camera {:?} released the pointer", self.name);
            }
            self.captured = false;
            self.control = ControlMode::Idle;
            return;
        }

        // Motion from the press frame happened before the drag began.
        let just_captured =
            input.mouse_pressed(button) && !self.captured && self.is_cursor_in_viewport(input);
        if just_captured {
            log::debug!("camera {:?} captured the pointer", self.name);
            self.captured = true;
        }

        if !self.captured || !self.mouse_movement_active {
            self.control = ControlMode::Idle;
            return;
        }

        self.control = if input.shift_down() {
            ControlMode::Panning
        } else if input.ctrl_down() {
            ControlMode::Dollying
        } else {
            ControlMode::Orbiting
        };

        let limit = Vec2::splat(self.settings.mouse_clamp_delta);
        let delta = input.mouse_delta().clamp(-limit, limit);
        if just_captured || delta == Vec2::ZERO {
            return;
        }

        match self.control {
            ControlMode::Orbiting => self.orbit(delta),
            ControlMode::Panning => self.pan(delta),
            ControlMode::Dollying => self.zoom(delta.y * self.settings.zoom_speed * DOLLY_FACTOR),
            ControlMode::Idle => {}
        }
    }

    fn process_keyboard(&mut self, input: &Input, dt: f32) {
        let forward = self.forward();
        let right = self.right();
        let bindings = [
            (KeyCode::ArrowUp, forward),
            (KeyCode::ArrowDown, -forward),
            (KeyCode::ArrowRight, right),
            (KeyCode::ArrowLeft, -right),
            (KeyCode::PageUp, self.up),
            (KeyCode::PageDown, -self.up),
        ];

        let movement: Vec3 = bindings
            .iter()
            .filter(|(key, _)| input.key_down(*key))
            .map(|(_, direction)| *direction)
            .sum();

        if movement.length_squared() > 0.0 {
            let step = movement.normalize() * self.settings.keyboard_speed * dt;
            self.position += step;
            self.target += step;
            self.refresh_view();
        }
    }

    fn process_scroll(&mut self, input: &Input) {
        let scroll = input.scroll_delta().y;
        if scroll != 0.0 && (self.captured || self.is_cursor_in_viewport(input)) {
            self.zoom(scroll);
        }
    }

    /// Orbit around the target by a pointer delta in pixels.
    ///
    /// Horizontal motion turns yaw, vertical motion turns pitch, which stays
    /// within ±89°.
    pub fn orbit(&mut self, delta: Vec2) {
        let speed = self.settings.orbit_speed;
        self.yaw += delta.x * speed;
        self.pitch = (self.pitch - delta.y * speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_position_from_angles();
    }

    /// Slide the target (and with it the camera) across the view plane by a
    /// pointer delta in pixels. Farther cameras pan faster.
    pub fn pan(&mut self, delta: Vec2) {
        let speed = self.settings.pan_speed * self.distance;
        let right = self.right();
        let up = self.camera_up();
        self.target -= right * delta.x * speed;
        self.target -= up * delta.y * speed;
        self.update_position_from_angles();
    }

    /// Move toward (positive `delta`) or away from the target.
    ///
    /// The requested distance is clamped to the configured limits and the
    /// live distance eases toward it, so repeated calls converge instead of
    /// jumping.
    pub fn zoom(&mut self, delta: f32) {
        let settings = &self.settings;
        let speed = 1.0 + 0.1 * delta.abs();
        let goal = (self.distance - delta * speed).clamp(settings.min_distance, settings.max_distance);
        self.distance += (goal - self.distance) * settings.zoom_smoothing;
        self.update_position_from_angles();
    }
}
