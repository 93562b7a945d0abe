use winit::event::MouseButton;

/// Tuning knobs for interactive camera control.
///
/// Every camera owns a copy, so two viewports can feel different.
///
/// # Example
/// ```
/// use orbitview::{CameraSettings, MouseButton};
///
/// let settings = CameraSettings::new()
///     .orbit_speed(0.5)
///     .distance_limits(1.0, 50.0)
///     .control_button(MouseButton::Right);
/// assert_eq!(settings.min_distance, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Degrees of yaw/pitch per pixel of drag.
    pub orbit_speed: f32,
    /// Pan distance per pixel, multiplied by the orbit distance.
    pub pan_speed: f32,
    /// Scale applied to drag-dolly input.
    pub zoom_speed: f32,
    /// Closest the camera may zoom to its target.
    pub min_distance: f32,
    /// Farthest the camera may zoom from its target.
    pub max_distance: f32,
    /// Per-frame mouse deltas are clamped to this many pixels on each axis.
    pub mouse_clamp_delta: f32,
    /// Arrow-key movement in units per second.
    pub keyboard_speed: f32,
    /// Fraction of the remaining distance covered by each zoom step.
    pub zoom_smoothing: f32,
    /// Button that starts orbit/pan/dolly drags.
    pub control_button: MouseButton,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_speed: 0.3,
            pan_speed: 0.002,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 100.0,
            mouse_clamp_delta: 22.0,
            keyboard_speed: 5.0,
            zoom_smoothing: 0.18,
            control_button: MouseButton::Middle,
        }
    }
}

impl CameraSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orbit_speed(mut self, degrees_per_pixel: f32) -> Self {
        self.orbit_speed = degrees_per_pixel;
        self
    }

    pub fn pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }

    pub fn zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Set distance limits. Swapped bounds are put back in order.
    pub fn distance_limits(mut self, min: f32, max: f32) -> Self {
        if min > max {
            log::warn!("distance limits {min} > {max}, swapping");
        }
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
        self
    }

    pub fn mouse_clamp_delta(mut self, pixels: f32) -> Self {
        self.mouse_clamp_delta = pixels.abs();
        self
    }

    pub fn keyboard_speed(mut self, units_per_second: f32) -> Self {
        self.keyboard_speed = units_per_second;
        self
    }

    /// Set zoom smoothing, clamped to `(0, 1]`; 1 snaps straight to the target distance.
    pub fn zoom_smoothing(mut self, smoothing: f32) -> Self {
        self.zoom_smoothing = smoothing.clamp(f32::EPSILON, 1.0);
        self
    }

    pub fn control_button(mut self, button: MouseButton) -> Self {
        self.control_button = button;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = CameraSettings::default();
        assert_eq!(settings.orbit_speed, 0.3);
        assert_eq!(settings.min_distance, 0.5);
        assert_eq!(settings.max_distance, 100.0);
        assert_eq!(settings.control_button, MouseButton::Middle);
    }

    #[test]
    fn builder_sanitizes_values() {
        let settings = CameraSettings::new()
            .distance_limits(20.0, 2.0)
            .mouse_clamp_delta(-10.0)
            .zoom_smoothing(3.0);
        assert_eq!((settings.min_distance, settings.max_distance), (2.0, 20.0));
        assert_eq!(settings.mouse_clamp_delta, 10.0);
        assert_eq!(settings.zoom_smoothing, 1.0);
    }
}
