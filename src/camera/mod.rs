//! Orbit cameras with perspective or orthographic projection.
//!
//! A [`Camera`] keeps two views of the same orientation in sync: a Cartesian
//! pose (position, target, up) and orbit parameters (yaw, pitch, distance
//! around the target). Direct pose edits re-derive the angles; per-frame
//! input edits the angles and re-derives the pose.
//!
//! # Example
//!
//! ```
//! use orbitview::{Camera, CameraKind, Input, MouseButton, Vec2, Viewport};
//!
//! let mut camera = Camera::create(CameraKind::Perspective, "editor", 1.0, 0.1, 100.0);
//! camera.set_viewport_bounds(Viewport::new(0.0, 0.0, 800.0, 800.0));
//!
//! // Middle-drag 10 px to the right: 3 degrees of yaw at the default speed.
//! let mut input = Input::new();
//! input.move_cursor(Vec2::new(400.0, 400.0));
//! input.press_button(MouseButton::Middle);
//! camera.update(&input, 1.0 / 60.0);
//!
//! input.begin_frame();
//! input.move_cursor(Vec2::new(410.0, 400.0));
//! camera.update(&input, 1.0 / 60.0);
//! assert!((camera.yaw() - (-87.0)).abs() < 1e-4);
//! ```

mod animator;
mod controls;
mod projection;
mod settings;
mod uniforms;

pub use animator::{AnimationFrame, CameraAnimator, CompletionCallback, Easing};
pub use controls::ControlMode;
pub use projection::{CameraKind, Projection};
pub use settings::CameraSettings;
pub use uniforms::CameraUniforms;

use glam::{Mat4, Vec3};

use crate::input::{Input, Viewport};
use crate::math::MatrixExt;
use crate::picking::Ray;

const DEFAULT_NAME: &str = "Camera";
const DEFAULT_DISTANCE: f32 = 3.0;
const DEFAULT_YAW: f32 = -90.0;
/// Below this orbit distance the angles cannot be recovered and are left alone.
const MIN_ANGLE_DISTANCE: f32 = 1e-6;

/// An orbit camera bound to one viewport.
#[derive(Debug)]
pub struct Camera {
    name: String,
    projection: Projection,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    /// Degrees.
    yaw: f32,
    /// Degrees.
    pitch: f32,
    distance: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    viewport: Viewport,
    settings: CameraSettings,
    input_enabled: bool,
    mouse_movement_active: bool,
    captured: bool,
    control: ControlMode,
    animator: CameraAnimator,
}

impl Default for Camera {
    fn default() -> Self {
        Self::create(CameraKind::Perspective, DEFAULT_NAME, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a camera of the given kind.
    ///
    /// The camera starts 3 units from the origin on -Z, looking at the origin,
    /// with a 45° field of view or an orthographic half-height of 10. An empty
    /// name becomes `"Camera"`.
    pub fn create(kind: CameraKind, name: &str, aspect: f32, near: f32, far: f32) -> Self {
        let name = if name.is_empty() { DEFAULT_NAME } else { name };
        let mut camera = Self {
            name: name.to_owned(),
            projection: Projection::for_kind(kind),
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            distance: DEFAULT_DISTANCE,
            aspect,
            near,
            far,
            view: Mat4::IDENTITY,
            viewport: Viewport::default(),
            settings: CameraSettings::default(),
            input_enabled: true,
            mouse_movement_active: true,
            captured: false,
            control: ControlMode::Idle,
            animator: CameraAnimator::new(),
        };
        camera.update_position_from_angles();
        log::debug!("created {} camera {:?}", kind.type_name(), camera.name);
        camera
    }

    /// Perspective camera with a custom field of view in degrees.
    pub fn perspective(name: &str, fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self::create(CameraKind::Perspective, name, aspect, near, far);
        camera.projection = Projection::perspective(fov);
        camera
    }

    /// Orthographic camera showing `size` world units above and below the center.
    pub fn orthographic(name: &str, size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self::create(CameraKind::Orthographic, name, aspect, near, far);
        camera.projection = Projection::orthographic(size);
        camera
    }

    pub fn with_settings(mut self, settings: CameraSettings) -> Self {
        self.settings = settings;
        self
    }

    // --- Identity and projection ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> CameraKind {
        self.projection.kind()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Field of view in degrees, for perspective cameras.
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov } => Some(fov),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Set the vertical field of view in degrees, clamped to `[1, 179]`.
    ///
    /// Ignored by orthographic cameras.
    pub fn set_fov(&mut self, fov: f32) {
        match &mut self.projection {
            Projection::Perspective { fov: current } => *current = projection::clamp_fov(fov),
            Projection::Orthographic { .. } => {
                log::warn!("camera {:?} is orthographic, ignoring field of view", self.name);
            }
        }
    }

    /// Half-height of the view volume, for orthographic cameras.
    pub fn orthographic_size(&self) -> Option<f32> {
        match self.projection {
            Projection::Orthographic { size } => Some(size),
            Projection::Perspective { .. } => None,
        }
    }

    /// Set the orthographic half-height, at least 0.1.
    ///
    /// Ignored by perspective cameras.
    pub fn set_orthographic_size(&mut self, size: f32) {
        match &mut self.projection {
            Projection::Orthographic { size: current } => {
                *current = projection::clamp_ortho_size(size)
            }
            Projection::Perspective { .. } => {
                log::warn!("camera {:?} is perspective, ignoring orthographic size", self.name);
            }
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_clipping_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    // --- Pose ---

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The up hint passed to the view matrix. See [`Camera::camera_up`] for
    /// the orthonormal one.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_angles_from_position();
        self.refresh_view();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_angles_from_position();
        self.refresh_view();
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.refresh_view();
    }

    /// Set the whole pose at once and re-derive the orbit angles.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
        self.update_angles_from_position();
        self.refresh_view();
    }

    /// Re-target the orbit on `position`, keeping angles and distance.
    pub fn focus_on_object(&mut self, position: Vec3) {
        self.target = position;
        self.update_position_from_angles();
    }

    /// Direction from the camera toward its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or(Vec3::X)
    }

    /// Up vector made perpendicular to [`Camera::forward`] and [`Camera::right`].
    pub fn camera_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Place the camera on its orbit sphere from yaw, pitch and distance.
    pub fn update_position_from_angles(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let offset = Vec3::new(
            self.distance * yaw.cos() * pitch.cos(),
            self.distance * pitch.sin(),
            self.distance * yaw.sin() * pitch.cos(),
        );
        self.position = self.target + offset;
        self.refresh_view();
    }

    /// Recover distance, yaw and pitch from the current position and target.
    ///
    /// When the camera sits on its target only the distance changes.
    pub fn update_angles_from_position(&mut self) {
        let offset = self.position - self.target;
        self.distance = offset.length();
        if self.distance < MIN_ANGLE_DISTANCE {
            return;
        }
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin().to_degrees();
        self.yaw = offset.z.atan2(offset.x).to_degrees();
    }

    /// Camera-to-world matrix: columns are right, up, back (-forward) and position.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols(
            self.right().extend(0.0),
            self.camera_up().extend(0.0),
            (-self.forward()).extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// Place the camera from a camera-to-world matrix, keeping the orbit distance.
    pub fn set_transform(&mut self, transform: Mat4) {
        let forward = (-transform.z_axis.truncate()).normalize_or(Vec3::NEG_Z);
        let distance = self.distance.max(MIN_ANGLE_DISTANCE);
        self.position = transform.w_axis.truncate();
        self.target = self.position + forward * distance;
        self.up = transform.y_axis.truncate().normalize_or(Vec3::Y);
        self.update_angles_from_position();
        self.refresh_view();
    }

    // --- Matrices and rays ---

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.aspect, self.near, self.far)
    }

    /// Projection times view: world space to clip space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view
    }

    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms::new(self.view, self.projection_matrix(), self.position)
    }

    /// World-space ray through a pixel, given in viewport-relative coordinates.
    ///
    /// Perspective rays start at the camera and fan out; orthographic rays
    /// all point along [`Camera::forward`] and start on the near plane. Before
    /// the viewport size is known the ray is simply `position → forward`.
    pub fn screen_to_world_ray(&self, screen_x: f32, screen_y: f32) -> Ray {
        if self.viewport.is_empty() {
            return Ray::new(self.position, self.forward());
        }

        let ndc_x = 2.0 * screen_x / self.viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / self.viewport.height;

        match self.projection {
            Projection::Perspective { fov } => {
                let tan_half_fov = (fov.to_radians() * 0.5).tan();
                let view_dir = Vec3::new(ndc_x * tan_half_fov * self.aspect, ndc_y * tan_half_fov, -1.0);
                let world_dir = self.view.inverse_or_identity().transform_vector3(view_dir.normalize());
                Ray::new(self.position, world_dir)
            }
            Projection::Orthographic { size } => {
                let forward = self.forward();
                let half_width = size * self.aspect;
                let origin = self.position
                    + forward * self.near
                    + self.right() * (ndc_x * half_width)
                    + self.camera_up() * (ndc_y * size);
                Ray::new(origin, forward)
            }
        }
    }

    // --- Viewport and input ---

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_bounds(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_cursor_in_viewport(&self, input: &Input) -> bool {
        self.viewport.contains(input.mouse_position())
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CameraSettings) {
        self.settings = settings;
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    /// Drags may capture the pointer but move nothing while this is off.
    pub fn set_mouse_movement_active(&mut self, active: bool) {
        self.mouse_movement_active = active;
    }

    /// True while a drag owns the pointer; hosts typically hide the cursor.
    pub fn cursor_captured(&self) -> bool {
        self.captured
    }

    pub fn control_mode(&self) -> ControlMode {
        self.control
    }

    /// Advance one frame.
    ///
    /// A running animation takes the whole frame: input is ignored and the
    /// orbit angles are not re-applied, so the animated pose is exact.
    /// Otherwise, when input is enabled, pointer/keyboard/scroll input is
    /// applied and the position is re-derived from the orbit angles.
    pub fn update(&mut self, input: &Input, dt: f32) {
        if let Some(frame) = self.animator.update(dt) {
            match frame {
                AnimationFrame::InFlight { position, target } => self.apply_pose(position, target),
                AnimationFrame::Finished {
                    position,
                    target,
                    on_complete,
                } => {
                    self.apply_pose(position, target);
                    self.update_angles_from_position();
                    if let Some(on_complete) = on_complete {
                        on_complete();
                    }
                }
            }
            return;
        }

        if self.input_enabled {
            self.process_input(input, dt);
            self.update_position_from_angles();
        }
    }

    // --- Animation ---

    /// Animate to a new pose over `duration` seconds.
    pub fn move_to(&mut self, position: Vec3, target: Vec3, duration: f32) {
        self.start_animation(position, target, duration, None);
    }

    /// [`Camera::move_to`], calling `on_complete` once the end pose is reached.
    ///
    /// The callback is dropped without running if the move is stopped or
    /// replaced.
    pub fn move_to_then(
        &mut self,
        position: Vec3,
        target: Vec3,
        duration: f32,
        on_complete: impl FnOnce() + 'static,
    ) {
        self.start_animation(position, target, duration, Some(Box::new(on_complete)));
    }

    /// Animate the target onto `position`, keeping the viewing direction and distance.
    pub fn focus_on_object_smooth(&mut self, position: Vec3, duration: f32) {
        let offset = self.position - self.target;
        let direction = offset.normalize_or(Vec3::NEG_Z);
        self.move_to(position + direction * offset.length(), position, duration);
    }

    pub fn stop_animation(&mut self) {
        self.animator.stop();
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn easing(&self) -> Easing {
        self.animator.easing()
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.animator.set_easing(easing);
    }

    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    fn start_animation(
        &mut self,
        position: Vec3,
        target: Vec3,
        duration: f32,
        on_complete: Option<CompletionCallback>,
    ) {
        self.animator
            .start((self.position, self.target), (position, target), duration, on_complete);
    }

    /// Set position and target without touching the orbit angles.
    fn apply_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = Mat4::look_at(self.position, self.target, self.up);
    }
}
