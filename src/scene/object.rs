use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};

use crate::math::Aabb;
use crate::mesh::MeshData;
use crate::picking::Pickable;
use crate::transform::Transform;

/// Stable handle to an object in a [`Scene`](super::Scene).
///
/// Ids are handed out in insertion order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something placed in the scene: a transform, an optional mesh and editor flags.
///
/// Meshes are shared through [`Arc`], so many objects can reuse one buffer.
/// Rotation and scale pivot around the mesh center (plus any relative pivot)
/// rather than the raw origin.
///
/// # Example
///
/// ```
/// use orbitview::{MeshData, SceneObject, Transform, Vec3};
///
/// let crate_box = SceneObject::new("crate")
///     .with_mesh(MeshData::cube(2.0))
///     .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
/// assert_eq!(crate_box.world_bounds().min, Vec3::new(-1.0, 0.0, -1.0));
/// ```
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    /// Hidden objects are skipped by picking.
    pub visible: bool,
    /// RGBA tint for the renderer.
    pub color: Vec4,
    transform: Transform,
    mesh: Option<Arc<MeshData>>,
    selected: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            color: Vec4::ONE,
            transform: Transform::new(),
            mesh: None,
            selected: false,
        }
    }

    pub fn with_mesh(mut self, mesh: impl Into<Arc<MeshData>>) -> Self {
        self.set_mesh(Some(mesh.into()));
        self
    }

    /// Replace the transform, keeping this object's mesh center as its pivot base.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn mesh(&self) -> Option<&Arc<MeshData>> {
        self.mesh.as_ref()
    }

    /// Swap the mesh. The transform's pivot base follows the new mesh center.
    pub fn set_mesh(&mut self, mesh: Option<Arc<MeshData>>) {
        let center = mesh.as_deref().map_or(Vec3::ZERO, MeshData::center);
        self.transform.set_mesh_center(center);
        self.mesh = mesh;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        let center = self.transform.mesh_center();
        self.transform = transform;
        self.transform.set_mesh_center(center);
    }

    /// Pivot offset relative to the mesh center.
    pub fn set_relative_pivot(&mut self, pivot: Vec3) {
        self.transform.set_pivot(pivot);
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    pub fn world_bounds(&self) -> Aabb {
        Pickable::world_bounds(self)
    }

    /// World-space center of the bounds, a good point to focus a camera on.
    pub fn world_center(&self) -> Vec3 {
        self.world_bounds().center()
    }
}

impl Pickable for SceneObject {
    fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    fn mesh_data(&self) -> Option<&MeshData> {
        self.mesh.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_center_follows_mesh() {
        let offset_triangle = MeshData::from_untagged(
            vec![2.0, 0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 2.0, 0.0],
            vec![0, 1, 2],
        );
        let mut object = SceneObject::new("tri").with_mesh(offset_triangle);
        assert_eq!(object.transform().mesh_center(), Vec3::new(3.0, 1.0, 0.0));

        object.set_mesh(Some(Arc::new(MeshData::cube(1.0))));
        assert_eq!(object.transform().mesh_center(), Vec3::ZERO);

        object.set_mesh(None);
        assert!(object.mesh().is_none());
    }

    #[test]
    fn replacing_transform_keeps_mesh_center() {
        let mesh = MeshData::from_untagged(
            vec![2.0, 0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 2.0, 0.0],
            vec![0, 1, 2],
        );
        let object = SceneObject::new("tri")
            .with_mesh(mesh)
            .with_transform(Transform::new().with_rotation(Vec3::new(0.0, 0.0, 180.0)));

        // Rotating 180° about the mesh center leaves the bounds in place.
        let bounds = object.world_bounds();
        assert!(bounds.min.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert!(bounds.max.abs_diff_eq(Vec3::new(4.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn placeholder_bounds_are_unit_cube() {
        let object = SceneObject::new("empty")
            .with_transform(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0));
        let bounds = object.world_bounds();
        assert!(bounds.min.abs_diff_eq(Vec3::new(0.0, 1.0, 2.0), 1e-6));
        assert!(bounds.max.abs_diff_eq(Vec3::new(2.0, 3.0, 4.0), 1e-6));
        assert_eq!(object.world_center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn display_id() {
        assert_eq!(ObjectId(42).to_string(), "#42");
    }
}
