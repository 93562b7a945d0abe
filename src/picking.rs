//! Ray casting and object picking.
//!
//! This module turns a ray into "what is under the cursor". It includes:
//!
//! - [`Ray`]: origin plus normalized direction, with sphere, box, triangle and mesh tests
//! - [`Pickable`]: what an object must expose to take part in picking
//! - [`pick`]: two-phase nearest-hit search (bounding box first, then triangles)
//!
//! Every intersection test returns `Option<f32>`: `None` means "tested, no
//! hit", `Some(t)` is the distance along the ray. Degenerate input (zero
//! direction, singular transforms, malformed meshes) yields `None` or a
//! meaningless but finite answer, never a panic.
//!
//! # Example
//!
//! ```
//! use orbitview::{MeshData, Ray, Scene, SceneObject, Transform, Vec3};
//!
//! let mut scene = Scene::new();
//! let near = scene.add_object(
//!     SceneObject::new("near")
//!         .with_mesh(MeshData::cube(1.0))
//!         .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -3.0))),
//! );
//! scene.add_object(
//!     SceneObject::new("far")
//!         .with_mesh(MeshData::cube(1.0))
//!         .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -8.0))),
//! );
//!
//! let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
//! let hit = scene.pick(&ray).unwrap();
//! assert_eq!(hit.object, near);
//! assert!((hit.distance - 2.5).abs() < 1e-5);
//! ```

use glam::{Mat4, Vec3, Vec4};

use crate::math::{Aabb, MatrixExt};
use crate::mesh::{MeshData, VertexLayout, triangle_at};
use crate::scene::ObjectId;

/// Tolerance for parallel rays, barycentric edges and self-hits.
const TRIANGLE_EPSILON: f32 = 1e-6;

/// A ray in 3D space, used for raycasting and picking.
///
/// A ray has an origin point and a normalized direction. It represents
/// an infinite half-line starting at the origin.
///
/// # Example
///
/// ```
/// use orbitview::{Ray, Vec3};
///
/// let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
/// assert_eq!(ray.direction, Vec3::NEG_Z);
/// assert_eq!(ray.point_at(10.0), Vec3::new(0.0, 1.0, -5.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the ray.
    pub origin: Vec3,
    /// The normalized direction of the ray, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

impl Ray {
    /// Create a new ray with the given origin and direction.
    ///
    /// The direction is normalized. A zero direction stays zero and the ray
    /// then misses everything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray through a pixel by unprojecting it with camera matrices.
    ///
    /// Works with any OpenGL-style projection: the pixel is unprojected onto
    /// the near (NDC z = -1) and far (NDC z = +1) planes and the ray runs
    /// between the two points. Pixel `(0, 0)` is the top-left corner.
    ///
    /// # Arguments
    ///
    /// * `screen_x`, `screen_y` - Pixel position relative to the viewport
    /// * `width`, `height` - Viewport size in pixels
    /// * `view`, `projection` - Camera matrices
    pub fn from_screen(
        screen_x: f32,
        screen_y: f32,
        width: f32,
        height: f32,
        view: Mat4,
        projection: Mat4,
    ) -> Self {
        let (ndc_x, ndc_y) = if width > 0.0 && height > 0.0 {
            (2.0 * screen_x / width - 1.0, 1.0 - 2.0 * screen_y / height)
        } else {
            (0.0, 0.0)
        };

        let inv_view_proj = (projection * view).inverse_or_identity();
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_point = near.truncate() / near.w;
        let far_point = far.truncate() / far.w;

        Self::new(near_point, far_point - near_point)
    }

    /// Get a point along the ray at the given distance from the origin.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO || !self.direction.is_finite() || !self.origin.is_finite()
    }

    /// Test intersection with a sphere.
    ///
    /// Returns the nearest positive root of `|O + tD - C|² = r²`, so a ray
    /// starting outside reports the entry point and a ray starting inside
    /// reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        let oc = self.origin - center;
        let a = self.direction.dot(self.direction);
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }

    /// Test intersection with an axis-aligned bounding box (slab method).
    ///
    /// An axis the ray runs parallel to clips nothing when the origin lies
    /// strictly between its slab planes and misses otherwise, so rays lying in
    /// a face plane and boxes collapsed to a point or a segment give no hit.
    /// Boxes flat on a single axis are still hit head-on. Returns the entry
    /// distance, or the exit distance when the origin is inside the box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            if self.direction[axis] == 0.0 {
                if origin <= min[axis] || origin >= max[axis] {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / self.direction[axis];
            let t1 = (min[axis] - origin) * inv_dir;
            let t2 = (max[axis] - origin) * inv_dir;

            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        }

        if t_exit < t_enter || t_exit <= 0.0 {
            return None;
        }

        Some(if t_enter > 0.0 { t_enter } else { t_exit })
    }

    /// Test intersection with a box.
    pub fn intersect_bounds(&self, bounds: &Aabb) -> Option<f32> {
        self.intersect_aabb(bounds.min, bounds.max)
    }

    /// Test intersection with a triangle (Möller–Trumbore).
    ///
    /// Both faces count as hits. Barycentric coordinates get a small
    /// tolerance so a ray through an edge shared by two triangles hits at
    /// least one of them.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < TRIANGLE_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);
        if !(-TRIANGLE_EPSILON..=1.0 + TRIANGLE_EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);
        if v < -TRIANGLE_EPSILON || u + v > 1.0 + TRIANGLE_EPSILON {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > TRIANGLE_EPSILON).then_some(t)
    }

    /// Nearest hit against a mesh in its own (local) space.
    pub fn intersect_mesh(&self, mesh: &MeshData) -> Option<f32> {
        self.intersect_triangles(mesh.vertices(), mesh.indices(), mesh.layout())
    }

    /// Nearest hit against untagged vertex/index buffers.
    ///
    /// The vertex layout is detected from the buffer length, see
    /// [`VertexLayout::detect`].
    pub fn intersect_mesh_raw(&self, vertices: &[f32], indices: &[u32]) -> Option<f32> {
        self.intersect_triangles(vertices, indices, VertexLayout::detect(vertices.len()))
    }

    /// Nearest hit against a mesh placed in the world by `model`.
    ///
    /// The ray is moved into mesh space with the inverse model matrix, tested
    /// there, and the hit point is carried back to world space. The returned
    /// distance is measured in world space from this ray's origin, so
    /// non-uniform scale does not distort it.
    pub fn intersect_mesh_transformed(&self, mesh: &MeshData, model: &Mat4) -> Option<f32> {
        self.intersect_local(model, |local| local.intersect_mesh(mesh))
    }

    /// [`Ray::intersect_mesh_transformed`] for untagged buffers.
    pub fn intersect_mesh_raw_transformed(
        &self,
        vertices: &[f32],
        indices: &[u32],
        model: &Mat4,
    ) -> Option<f32> {
        self.intersect_local(model, |local| local.intersect_mesh_raw(vertices, indices))
    }

    fn intersect_triangles(
        &self,
        vertices: &[f32],
        indices: &[u32],
        layout: VertexLayout,
    ) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        (0..indices.len() / 3)
            .filter_map(|i| triangle_at(vertices, indices, layout, i))
            .filter_map(|[v0, v1, v2]| self.intersect_triangle(v0, v1, v2))
            .fold(None, |closest: Option<f32>, t| match closest {
                Some(best) if best <= t => Some(best),
                _ => Some(t),
            })
    }

    fn intersect_local(&self, model: &Mat4, test: impl FnOnce(&Ray) -> Option<f32>) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        let inverse = model.inverse_or_identity();
        let local = Ray::new(
            inverse.transform_point3(self.origin),
            inverse.transform_vector3(self.direction),
        );

        let local_t = test(&local)?;
        let world_point = model.transform_point3(local.point_at(local_t));
        Some((world_point - self.origin).length())
    }
}

/// An object that can be hit by [`pick`].
///
/// Objects without a mesh are still pickable through their bounding box,
/// so empty placeholders remain selectable.
pub trait Pickable {
    /// Local-to-world matrix.
    fn model_matrix(&self) -> Mat4;

    /// Triangle data in local space, if the object has any.
    fn mesh_data(&self) -> Option<&MeshData>;

    /// World-space bounds: the eight local-bound corners pushed through the
    /// model matrix. Objects without a mesh use a unit cube.
    fn world_bounds(&self) -> Aabb {
        self.mesh_data()
            .map(MeshData::local_bounds)
            .unwrap_or(Aabb::UNIT)
            .transformed(&self.model_matrix())
    }
}

/// Information about a ray-object intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    /// The object that was hit.
    pub object: ObjectId,
    /// Distance from ray origin to the hit point.
    pub distance: f32,
    /// World-space position of the hit point.
    pub point: Vec3,
}

/// Result of a pick: the closest hit, if any.
pub type PickResult = Option<PickHit>;

/// Find the object closest along `ray`.
///
/// Each candidate's world bounds are tested first and candidates whose box
/// the ray misses are skipped without touching their triangles. Survivors
/// with a mesh are tested triangle by triangle under their model matrix;
/// survivors without one use the box distance. Equal distances resolve to
/// the lowest [`ObjectId`], so the result does not depend on iteration
/// order.
pub fn pick<'a, P>(ray: &Ray, candidates: impl IntoIterator<Item = (ObjectId, &'a P)>) -> PickResult
where
    P: Pickable + ?Sized + 'a,
{
    let mut closest: PickResult = None;

    for (id, object) in candidates {
        let Some(box_distance) = ray.intersect_bounds(&object.world_bounds()) else {
            continue;
        };

        let distance = match object.mesh_data() {
            Some(mesh) => match ray.intersect_mesh_transformed(mesh, &object.model_matrix()) {
                Some(t) => t,
                None => continue,
            },
            None => box_distance,
        };

        let is_closer = closest.is_none_or(|best| {
            distance < best.distance || (distance == best.distance && id < best.object)
        });
        if is_closer {
            closest = Some(PickHit {
                object: id,
                distance,
                point: ray.point_at(distance),
            });
        }
    }

    match &closest {
        Some(hit) => log::trace!("pick hit {:?} at distance {:.4}", hit.object, hit.distance),
        None => log::trace!("pick missed"),
    }
    closest
}
