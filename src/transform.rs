//! Object placement: position, Euler rotation, scale and a pivot point.

use glam::{Mat4, Vec3};

use crate::math::MatrixExt;

/// Position, rotation and scale of a scene object, with an optional pivot.
///
/// Rotation is stored as Euler angles in **degrees** and applied in
/// Z·Y·X order. Rotation and scale happen about the pivot, which is the
/// mesh center plus a relative offset, so a mesh whose vertices are not
/// centered at the origin still spins in place.
///
/// The model matrix is
///
/// ```text
/// Translate(position) · Translate(pivot) · Rotate(rotation) · Scale(scale) · Translate(-pivot)
/// ```
///
/// Both the matrix and its inverse are cached. Every mutator rebuilds them
/// immediately, so reads never mutate.
///
/// # Example
///
/// ```
/// use orbitview::{Transform, Vec3};
///
/// let transform = Transform::new()
///     .with_position(Vec3::new(0.0, 2.0, -5.0))
///     .with_rotation(Vec3::new(0.0, 90.0, 0.0))
///     .with_uniform_scale(2.0);
///
/// let world = transform.matrix().transform_point3(Vec3::X);
/// assert!((world - Vec3::new(0.0, 2.0, -7.0)).length() < 1e-5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    relative_pivot: Vec3,
    mesh_center: Vec3,
    matrix: Mat4,
    inverse: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            relative_pivot: Vec3::ZERO,
            mesh_center: Vec3::ZERO,
            matrix: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates an identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    pub fn from_position(position: Vec3) -> Self {
        Self::new().with_position(position)
    }

    /// Creates a transform from position, Euler rotation in degrees, and scale.
    pub fn from_trs(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            ..Default::default()
        };
        transform.rebuild();
        transform
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Sets the Euler rotation in degrees.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.set_scale(Vec3::splat(scale));
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler rotation in degrees.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Pivot offset relative to the mesh center.
    pub fn relative_pivot(&self) -> Vec3 {
        self.relative_pivot
    }

    /// Mesh center hint, in local space.
    pub fn mesh_center(&self) -> Vec3 {
        self.mesh_center
    }

    /// The point rotation and scale happen about, in local space.
    pub fn pivot(&self) -> Vec3 {
        self.mesh_center + self.relative_pivot
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild();
    }

    /// Sets the Euler rotation in degrees.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.rebuild();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.rebuild();
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec3::splat(scale));
    }

    /// Sets the pivot offset relative to the mesh center.
    pub fn set_pivot(&mut self, relative_pivot: Vec3) {
        self.relative_pivot = relative_pivot;
        self.rebuild();
    }

    pub fn set_mesh_center(&mut self, mesh_center: Vec3) {
        self.mesh_center = mesh_center;
        self.rebuild();
    }

    /// Sets the mesh center and the pivot offset from it in one step.
    pub fn set_relative_pivot(&mut self, mesh_center: Vec3, relative_pivot: Vec3) {
        self.mesh_center = mesh_center;
        self.relative_pivot = relative_pivot;
        self.rebuild();
    }

    /// Moves by `translation` in world space.
    pub fn translate(&mut self, translation: Vec3) {
        self.set_position(self.position + translation);
    }

    /// Adds `rotation` (degrees) to the current Euler angles.
    pub fn rotate(&mut self, rotation: Vec3) {
        self.set_rotation(self.rotation + rotation);
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, scale: Vec3) {
        self.set_scale(self.scale * scale);
    }

    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale_by(Vec3::splat(factor));
    }

    /// Moves along the object's own axes.
    pub fn translate_local(&mut self, local: Vec3) {
        let world = self.rotation_matrix().transform_vector3(local);
        self.translate(world);
    }

    /// The object's +X axis in world space.
    pub fn local_right(&self) -> Vec3 {
        self.rotation_matrix().transform_vector3(Vec3::X).normalize_or(Vec3::X)
    }

    /// The object's +Y axis in world space.
    pub fn local_up(&self) -> Vec3 {
        self.rotation_matrix().transform_vector3(Vec3::Y).normalize_or(Vec3::Y)
    }

    /// The object's +Z axis in world space.
    pub fn local_forward(&self) -> Vec3 {
        self.rotation_matrix().transform_vector3(Vec3::Z).normalize_or(Vec3::Z)
    }

    /// Local-to-world model matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// World-to-local matrix. Falls back to the identity for zero scale.
    pub fn inverse_matrix(&self) -> Mat4 {
        self.inverse
    }

    /// Back to identity, clearing the pivot and mesh center.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn rotation_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::rotation_z(r.z.to_radians())
            * Mat4::rotation_y(r.y.to_radians())
            * Mat4::rotation_x(r.x.to_radians())
    }

    fn rebuild(&mut self) {
        let pivot = self.pivot();
        self.matrix = Mat4::from_translation(self.position)
            * Mat4::from_translation(pivot)
            * self.rotation_matrix()
            * Mat4::from_scale(self.scale)
            * Mat4::from_translation(-pivot);
        self.inverse = self.matrix.inverse_or_identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = Transform::new();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert_eq!(t.inverse_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = Transform::from_trs(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::splat(2.0));
        let m = t.matrix().to_cols_array();
        assert_abs_diff_eq!(m[12], 1.0);
        assert_abs_diff_eq!(m[13], 2.0);
        assert_abs_diff_eq!(m[14], 3.0);
        assert_abs_diff_eq!(m[0], 2.0);
        assert_abs_diff_eq!(m[5], 2.0);
        assert_abs_diff_eq!(m[10], 2.0);
    }

    #[test]
    fn setters_invalidate_cached_matrix() {
        let mut t = Transform::new();
        t.set_position(Vec3::new(0.0, 0.0, -4.0));
        assert_vec_eq(t.matrix().transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -4.0));

        t.set_uniform_scale(3.0);
        assert_vec_eq(t.matrix().transform_point3(Vec3::X), Vec3::new(3.0, 0.0, -4.0));

        t.set_rotation(Vec3::new(0.0, 0.0, 90.0));
        assert_vec_eq(t.matrix().transform_point3(Vec3::X), Vec3::new(0.0, 3.0, -4.0));
    }

    #[test]
    fn rotation_happens_about_the_pivot() {
        let mut t = Transform::new();
        // Mesh centered at (2, 0, 0): spinning it should leave the center fixed.
        t.set_mesh_center(Vec3::new(2.0, 0.0, 0.0));
        t.set_rotation(Vec3::new(0.0, 180.0, 0.0));
        assert_vec_eq(t.matrix().transform_point3(Vec3::new(2.0, 0.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
        assert_vec_eq(t.matrix().transform_point3(Vec3::new(3.0, 0.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));

        // A relative pivot shifts the fixed point away from the mesh center.
        t.set_relative_pivot(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_vec_eq(t.pivot(), Vec3::new(3.0, 0.0, 0.0));
        assert_vec_eq(t.matrix().transform_point3(Vec3::new(3.0, 0.0, 0.0)), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn inverse_undoes_matrix() {
        let mut t = Transform::from_trs(
            Vec3::new(4.0, -1.0, 2.0),
            Vec3::new(30.0, 45.0, 10.0),
            Vec3::new(1.0, 2.0, 0.5),
        );
        t.set_pivot(Vec3::new(0.5, 0.0, 0.0));
        let p = Vec3::new(0.3, -0.7, 1.1);
        let roundtrip = t.inverse_matrix().transform_point3(t.matrix().transform_point3(p));
        assert_vec_eq(roundtrip, p);
    }

    #[test]
    fn zero_scale_inverse_is_identity() {
        let t = Transform::new().with_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(t.inverse_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn accumulating_operations() {
        let mut t = Transform::new();
        t.translate(Vec3::X);
        t.translate(Vec3::Y);
        t.rotate(Vec3::new(0.0, 10.0, 0.0));
        t.rotate(Vec3::new(0.0, 20.0, 0.0));
        t.scale_by(Vec3::new(2.0, 1.0, 1.0));
        t.scale_uniform(0.5);

        assert_eq!(t.position(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(t.rotation(), Vec3::new(0.0, 30.0, 0.0));
        assert_eq!(t.scale(), Vec3::new(1.0, 0.5, 0.5));
    }

    #[test]
    fn local_axes_follow_rotation() {
        let mut t = Transform::new().with_rotation(Vec3::new(0.0, 90.0, 0.0));
        assert_vec_eq(t.local_right(), Vec3::NEG_Z);
        assert_vec_eq(t.local_forward(), Vec3::X);
        assert_vec_eq(t.local_up(), Vec3::Y);

        t.translate_local(Vec3::new(0.0, 0.0, 2.0));
        assert_vec_eq(t.position(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = Transform::from_trs(Vec3::ONE, Vec3::ONE, Vec3::splat(3.0));
        t.set_pivot(Vec3::ONE);
        t.reset();
        assert_eq!(t, Transform::new());
    }
}
