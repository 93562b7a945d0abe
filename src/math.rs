//! Matrix helpers and bounding boxes on top of glam.
//!
//! glam provides the vector and matrix value types. This module adds the few
//! operations the camera and picking code need with exact, documented
//! behaviour:
//!
//! - [`MatrixExt`]: singular-safe inversion and OpenGL-style view/projection constructors
//! - [`Aabb`]: an axis-aligned bounding box that can be pushed through a model matrix
//!
//! All matrices are column-major (`Mat4::default()` is the identity) and all
//! constructors follow the right-handed OpenGL clip-space convention where the
//! far plane maps to NDC z = +1.

use glam::{Mat4, Vec3, Vec4};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-12;

/// Extra constructors and operations for [`Mat4`].
///
/// # Example
///
/// ```
/// use orbitview::{Mat4, MatrixExt, Vec3};
///
/// let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
/// let eye_in_view = view.transform_point3(Vec3::new(0.0, 0.0, 5.0));
/// assert!(eye_in_view.length() < 1e-5);
///
/// // Singular matrices invert to the identity instead of NaNs.
/// let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
/// assert_eq!(flat.inverse_or_identity(), Mat4::IDENTITY);
/// ```
pub trait MatrixExt: Sized {
    /// Inverts the matrix, or returns the identity when it is singular.
    fn inverse_or_identity(&self) -> Self;

    /// Right-handed view matrix looking from `eye` towards `center`.
    fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self;

    /// OpenGL-style perspective projection. `fov_y` is in radians.
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self;

    /// OpenGL-style orthographic projection.
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self;

    /// Rotation about the X axis, in radians.
    fn rotation_x(angle: f32) -> Self;

    /// Rotation about the Y axis, in radians.
    fn rotation_y(angle: f32) -> Self;

    /// Rotation about the Z axis, in radians.
    fn rotation_z(angle: f32) -> Self;
}

impl MatrixExt for Mat4 {
    fn inverse_or_identity(&self) -> Self {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Mat4::IDENTITY;
        }
        self.inverse()
    }

    fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let f = (center - eye).normalize_or(Vec3::NEG_Z);
        let s = f.cross(up).normalize_or(Vec3::X);
        let u = s.cross(f);

        Mat4::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
        )
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let tan_half_fov = (fov_y * 0.5).tan();
        let depth = far - near;

        Mat4::from_cols(
            Vec4::new(1.0 / (aspect * tan_half_fov), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0 / tan_half_fov, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -(far + near) / depth, -1.0),
            Vec4::new(0.0, 0.0, -(2.0 * far * near) / depth, 0.0),
        )
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        Mat4::from_cols(
            Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / depth, 0.0),
            Vec4::new(
                -(right + left) / width,
                -(top + bottom) / height,
                -(far + near) / depth,
                1.0,
            ),
        )
    }

    fn rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Mat4::from_cols(
            Vec4::X,
            Vec4::new(0.0, cos, sin, 0.0),
            Vec4::new(0.0, -sin, cos, 0.0),
            Vec4::W,
        )
    }

    fn rotation_y(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Mat4::from_cols(
            Vec4::new(cos, 0.0, -sin, 0.0),
            Vec4::Y,
            Vec4::new(sin, 0.0, cos, 0.0),
            Vec4::W,
        )
    }

    fn rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Mat4::from_cols(
            Vec4::new(cos, sin, 0.0, 0.0),
            Vec4::new(-sin, cos, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }
}

/// An axis-aligned bounding box.
///
/// Used as the cheap first phase of picking: a ray that misses an object's
/// box can never hit its triangles.
///
/// # Example
///
/// ```
/// use orbitview::{Aabb, Mat4, Vec3};
///
/// let local = Aabb::UNIT;
/// let world = local.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
/// assert_eq!(world.center(), Vec3::new(10.0, 0.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Aabb {
    /// A unit cube centered at the origin, spanning -0.5 to 0.5 on all axes.
    pub const UNIT: Self = Self {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |aabb, p| Self {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of this box after transforming all eight corners by `matrix`.
    ///
    /// The result is axis-aligned in the target space, so a rotated box
    /// grows to enclose the rotated corners.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let [first, rest @ ..] = self.corners().map(|c| matrix.transform_point3(c));
        rest.into_iter().fold(Self::new(first, first), |aabb, p| Self {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        })
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_mat_eq(a: Mat4, b: Mat4, eps: f32) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = eps);
        }
    }

    #[test]
    fn default_matrix_is_identity() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn double_inverse_returns_original() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::rotation_y(0.7)
            * Mat4::rotation_x(-0.3)
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 1.5));
        assert_mat_eq(m.inverse_or_identity().inverse_or_identity(), m, 1e-4);
        assert_mat_eq(m * m.inverse_or_identity(), Mat4::IDENTITY, 1e-5);
    }

    #[test]
    fn singular_inverse_falls_back_to_identity() {
        let m = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(m.inverse_or_identity(), Mat4::IDENTITY);
        assert_eq!(Mat4::ZERO.inverse_or_identity(), Mat4::IDENTITY);
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye = Vec3::new(3.0, 4.0, -2.0);
        let forward = Vec3::new(-1.0, 0.2, 0.5).normalize();
        let view = Mat4::look_at(eye, eye + forward, Vec3::Y);
        assert!(view.transform_point3(eye).length() < 1e-5);

        // Forward lands on -Z in view space.
        let ahead = view.transform_point3(eye + forward * 2.0);
        assert_abs_diff_eq!(ahead.z, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_matches_glam() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let center = Vec3::new(-2.0, 0.5, 0.0);
        assert_mat_eq(
            Mat4::look_at(eye, center, Vec3::Y),
            Mat4::look_at_rh(eye, center, Vec3::Y),
            1e-6,
        );
    }

    #[test]
    fn projections_match_opengl_conventions() {
        let fov = 60f32.to_radians();
        assert_mat_eq(
            Mat4::perspective(fov, 1.5, 0.1, 100.0),
            Mat4::perspective_rh_gl(fov, 1.5, 0.1, 100.0),
            1e-5,
        );
        assert_mat_eq(
            Mat4::orthographic(-4.0, 4.0, -3.0, 3.0, 0.1, 50.0),
            Mat4::orthographic_rh_gl(-4.0, 4.0, -3.0, 3.0, 0.1, 50.0),
            1e-6,
        );

        // A point on the far plane ends up at NDC z = +1.
        let proj = Mat4::perspective(fov, 1.0, 0.1, 100.0);
        let clip = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_abs_diff_eq!(clip.z / clip.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn axis_rotations_match_glam() {
        let angle = 0.9;
        assert_mat_eq(Mat4::rotation_x(angle), Mat4::from_rotation_x(angle), 1e-6);
        assert_mat_eq(Mat4::rotation_y(angle), Mat4::from_rotation_y(angle), 1e-6);
        assert_mat_eq(Mat4::rotation_z(angle), Mat4::from_rotation_z(angle), 1e-6);
    }

    #[test]
    fn aabb_from_points_and_transform() {
        assert!(Aabb::from_points(std::iter::empty::<Vec3>()).is_none());

        let aabb = Aabb::from_points([
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(aabb.contains_point(Vec3::ZERO));
        assert!(!aabb.contains_point(Vec3::new(0.0, 0.0, 1.0)));

        // A 45 degree spin around Y grows the box to enclose the corners.
        let rotated = Aabb::UNIT.transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let half_diagonal = 0.5 * std::f32::consts::SQRT_2;
        assert_abs_diff_eq!(rotated.max.x, half_diagonal, epsilon = 1e-5);
        assert_abs_diff_eq!(rotated.max.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn aabb_union_encloses_both() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);
        assert_eq!(u.size(), Vec3::splat(2.0));
    }
}
