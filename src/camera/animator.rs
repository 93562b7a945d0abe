use std::fmt;

use glam::Vec3;

/// Shortest allowed animation, in seconds.
const MIN_DURATION: f32 = 0.1;

/// Easing functions for camera moves.
///
/// These control the acceleration curve of the interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    #[default]
    EaseInOut,
    /// Quadratic in-out with a symmetric second half.
    EaseInOutQuad,
    /// Cubic in-out.
    EaseInOutCubic,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Runs once when an animation reaches its end pose.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Pose produced by one [`CameraAnimator::update`] call.
pub enum AnimationFrame {
    /// Interpolated pose; apply it without re-deriving orbit angles.
    InFlight { position: Vec3, target: Vec3 },
    /// The exact end pose. The callback must be invoked once it is applied.
    Finished {
        position: Vec3,
        target: Vec3,
        on_complete: Option<CompletionCallback>,
    },
}

/// One-shot position/target interpolation for a camera.
///
/// The animator does not hold the camera: [`CameraAnimator::update`] hands
/// back a pose and the owning camera applies it. Starting a new move while
/// one is running replaces it; nothing is queued.
#[derive(Default)]
pub struct CameraAnimator {
    start_position: Vec3,
    start_target: Vec3,
    end_position: Vec3,
    end_target: Vec3,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    active: bool,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for CameraAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraAnimator")
            .field("end_position", &self.end_position)
            .field("end_target", &self.end_target)
            .field("elapsed", &self.elapsed)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("active", &self.active)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin interpolating from the current pose to the end pose.
    ///
    /// `duration` is clamped to at least 0.1 seconds. Any move already in
    /// flight is dropped together with its callback.
    pub fn start(
        &mut self,
        from: (Vec3, Vec3),
        to: (Vec3, Vec3),
        duration: f32,
        on_complete: Option<CompletionCallback>,
    ) {
        (self.start_position, self.start_target) = from;
        (self.end_position, self.end_target) = to;
        self.elapsed = 0.0;
        self.duration = duration.max(MIN_DURATION);
        self.active = true;
        self.on_complete = on_complete;
        log::debug!(
            "camera animation to {:?} (target {:?}) over {:.2}s",
            self.end_position,
            self.end_target,
            self.duration
        );
    }

    /// Cancel the move in flight. The completion callback is dropped, not called.
    pub fn stop(&mut self) {
        if self.active {
            log::debug!("camera animation stopped at {:.0}%", self.progress() * 100.0);
        }
        self.active = false;
        self.on_complete = None;
    }

    pub fn is_animating(&self) -> bool {
        self.active
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Linear progress of the current move, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Advance by `dt` seconds. Returns `None` when idle.
    pub fn update(&mut self, dt: f32) -> Option<AnimationFrame> {
        if !self.active {
            return None;
        }

        self.elapsed += dt.max(0.0);
        let t = self.elapsed / self.duration;

        if t >= 1.0 {
            self.active = false;
            log::debug!("camera animation finished");
            return Some(AnimationFrame::Finished {
                position: self.end_position,
                target: self.end_target,
                on_complete: self.on_complete.take(),
            });
        }

        let eased = self.easing.apply(t);
        Some(AnimationFrame::InFlight {
            position: self.start_position.lerp(self.end_position, eased),
            target: self.start_target.lerp(self.end_target, eased),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInOutQuad,
        Easing::EaseInOutCubic,
    ];

    #[test]
    fn easing_endpoints_and_clamping() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn easing_midpoints() {
        assert_abs_diff_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_abs_diff_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_abs_diff_eq!(Easing::EaseOut.apply(0.5), 0.75);
        assert_abs_diff_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_abs_diff_eq!(Easing::EaseInOut.apply(0.75), 0.875);
        assert_abs_diff_eq!(Easing::EaseInOutQuad.apply(0.75), 0.875);
        assert_abs_diff_eq!(Easing::EaseInOutCubic.apply(0.25), 0.0625);
        assert_abs_diff_eq!(Easing::EaseInOutCubic.apply(0.75), 0.9375);
    }

    #[test]
    fn idle_animator_yields_nothing() {
        let mut animator = CameraAnimator::new();
        assert!(!animator.is_animating());
        assert!(animator.update(1.0).is_none());
    }

    #[test]
    fn interpolates_then_snaps_to_end() {
        let mut animator = CameraAnimator::new();
        animator.set_easing(Easing::Linear);
        animator.start((Vec3::ZERO, Vec3::ZERO), (Vec3::new(10.0, 0.0, 0.0), Vec3::Y), 1.0, None);

        match animator.update(0.25) {
            Some(AnimationFrame::InFlight { position, target }) => {
                assert!(position.abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), 1e-5));
                assert!(target.abs_diff_eq(Vec3::new(0.0, 0.25, 0.0), 1e-5));
            }
            _ => panic!("expected an in-flight frame"),
        }

        match animator.update(5.0) {
            Some(AnimationFrame::Finished { position, target, .. }) => {
                assert_eq!(position, Vec3::new(10.0, 0.0, 0.0));
                assert_eq!(target, Vec3::Y);
            }
            _ => panic!("expected the final frame"),
        }
        assert!(!animator.is_animating());
        assert!(animator.update(0.1).is_none());
    }

    #[test]
    fn duration_has_a_floor() {
        let mut animator = CameraAnimator::new();
        animator.start((Vec3::ZERO, Vec3::ZERO), (Vec3::X, Vec3::ZERO), 0.0, None);
        assert!(matches!(animator.update(0.05), Some(AnimationFrame::InFlight { .. })));
        assert_abs_diff_eq!(animator.progress(), 0.5, epsilon = 1e-6);
        assert!(matches!(animator.update(0.06), Some(AnimationFrame::Finished { .. })));
    }

    #[test]
    fn restart_replaces_callback_and_stop_drops_it() {
        let fired = Rc::new(Cell::new(0));
        let mut animator = CameraAnimator::new();

        let first = fired.clone();
        animator.start(
            (Vec3::ZERO, Vec3::ZERO),
            (Vec3::X, Vec3::ZERO),
            1.0,
            Some(Box::new(move || first.set(first.get() + 1))),
        );
        animator.start((Vec3::ZERO, Vec3::ZERO), (Vec3::Y, Vec3::ZERO), 1.0, None);
        match animator.update(2.0) {
            Some(AnimationFrame::Finished { on_complete, .. }) => assert!(on_complete.is_none()),
            _ => panic!("expected the final frame"),
        }

        let second = fired.clone();
        animator.start(
            (Vec3::ZERO, Vec3::ZERO),
            (Vec3::X, Vec3::ZERO),
            1.0,
            Some(Box::new(move || second.set(second.get() + 1))),
        );
        animator.stop();
        assert!(!animator.is_animating());
        assert!(animator.update(2.0).is_none());
        assert_eq!(fired.get(), 0);
    }
}
