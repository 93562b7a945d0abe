//! # Orbitview
//!
//! **The camera and picking core of an interactive 3D scene editor.**
//!
//! Turn pointer input into orbit/pan/zoom camera motion, turn a pixel into a
//! world-space ray, and turn that ray into a selected scene object.
//!
//! ## Quick Start
//!
//! ```
//! use orbitview::*;
//!
//! // One camera per viewport.
//! let mut camera = Camera::create(CameraKind::Perspective, "main", 16.0 / 9.0, 0.1, 1000.0);
//! let viewport = Viewport::new(0.0, 0.0, 1280.0, 720.0);
//! camera.set_viewport_bounds(viewport);
//!
//! // A scene with a single clickable cube at the origin.
//! let mut scene = Scene::new();
//! let cube = scene.add_object(SceneObject::new("cube").with_mesh(MeshData::cube(1.0)));
//!
//! // Once per frame:
//! let input = Input::new();
//! camera.update(&input, 1.0 / 60.0);
//!
//! // Click in the middle of the viewport.
//! let picked = scene.select_at_cursor(&camera, Vec2::new(640.0, 360.0));
//! assert_eq!(picked.map(|hit| hit.object), Some(cube));
//! assert_eq!(scene.selected(), Some(cube));
//! ```
//!
//! ## Layout
//!
//! - **Math**: glam vectors and matrices plus [`MatrixExt`] and [`Aabb`].
//! - **[`Transform`]**: position, Euler rotation, scale and pivot with a cached model matrix.
//! - **[`Ray`]**: sphere, box, triangle and mesh intersection.
//! - **[`Camera`]**: perspective or orthographic orbit camera with smooth focus animation.
//! - **[`Scene`]**: object storage and two-phase (box, then triangles) picking.

mod camera;
mod input;
mod math;
mod mesh;
mod picking;
mod scene;
mod transform;

pub use camera::{
    AnimationFrame, Camera, CameraAnimator, CameraKind, CameraSettings, CameraUniforms,
    CompletionCallback, ControlMode, Easing, Projection,
};
pub use input::{Input, Viewport};
pub use math::{Aabb, MatrixExt};
pub use mesh::{MeshData, MeshError, VertexLayout};
pub use picking::{PickHit, PickResult, Pickable, Ray, pick};
pub use scene::{ObjectId, Scene, SceneObject};
pub use transform::Transform;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
