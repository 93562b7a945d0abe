//! CPU-side triangle mesh data used for picking.
//!
//! A [`MeshData`] is the flat vertex/index pair a renderer would upload,
//! kept on the CPU so rays can be tested against real triangles. The vertex
//! buffer is interpreted through an explicit [`VertexLayout`]:
//!
//! | Layout              | Floats per vertex | Contents                        |
//! |---------------------|-------------------|---------------------------------|
//! | `Position`          | 3                 | position                        |
//! | `PositionNormalUv`  | 8                 | position, normal, texture coord |
//!
//! Only the first three floats of each vertex (the position) are read.

use glam::Vec3;
use thiserror::Error;

use crate::math::Aabb;

/// Errors reported by [`MeshData::try_new`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The vertex buffer length is not a multiple of the layout stride.
    #[error("vertex buffer has {len} floats, not a multiple of the {stride}-float stride")]
    VertexCount { len: usize, stride: usize },
    /// The index buffer does not describe whole triangles.
    #[error("index buffer has {0} indices, not a multiple of 3")]
    IndexCount(usize),
    /// An index points past the last vertex.
    #[error("index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
}

/// How a flat `f32` vertex buffer is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// Three floats per vertex: position only.
    Position,
    /// Eight floats per vertex: position, normal and texture coordinates.
    #[default]
    PositionNormalUv,
}

impl VertexLayout {
    /// Number of floats per vertex.
    pub const fn stride(self) -> usize {
        match self {
            VertexLayout::Position => 3,
            VertexLayout::PositionNormalUv => 8,
        }
    }

    /// Guess the layout of an untagged buffer from its length.
    ///
    /// Buffers whose length is a multiple of 8 are read as full vertices,
    /// otherwise a multiple of 3 is read as positions only. Anything else
    /// falls back to full vertices. A length divisible by both (24, 48, ...)
    /// is ambiguous and resolves to full vertices; prefer tagging the buffer.
    pub const fn detect(len: usize) -> Self {
        if len % 8 != 0 && len % 3 == 0 {
            VertexLayout::Position
        } else {
            VertexLayout::PositionNormalUv
        }
    }
}

/// Triangle mesh geometry on the CPU.
///
/// # Example
///
/// ```
/// use orbitview::{MeshData, Vec3, VertexLayout};
///
/// let quad = MeshData::try_new(
///     vec![
///         -1.0, -1.0, 0.0,
///          1.0, -1.0, 0.0,
///          1.0,  1.0, 0.0,
///         -1.0,  1.0, 0.0,
///     ],
///     vec![0, 1, 2, 2, 3, 0],
///     VertexLayout::Position,
/// )
/// .unwrap();
///
/// assert_eq!(quad.triangle_count(), 2);
/// assert_eq!(quad.center(), Vec3::ZERO);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    vertices: Vec<f32>,
    indices: Vec<u32>,
    layout: VertexLayout,
}

impl MeshData {
    /// Builds a mesh after checking that every index refers to a vertex.
    pub fn try_new(
        vertices: Vec<f32>,
        indices: Vec<u32>,
        layout: VertexLayout,
    ) -> Result<Self, MeshError> {
        let stride = layout.stride();
        if vertices.len() % stride != 0 {
            return Err(MeshError::VertexCount {
                len: vertices.len(),
                stride,
            });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }

        let vertex_count = vertices.len() / stride;
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }

        Ok(Self {
            vertices,
            indices,
            layout,
        })
    }

    /// Wraps buffers without validation.
    ///
    /// Triangles with out-of-range indices are skipped by every query, and a
    /// trailing partial triangle is ignored.
    pub fn from_raw(vertices: Vec<f32>, indices: Vec<u32>, layout: VertexLayout) -> Self {
        Self {
            vertices,
            indices,
            layout,
        }
    }

    /// Wraps an untagged buffer, detecting the layout from its length.
    pub fn from_untagged(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        let layout = VertexLayout::detect(vertices.len());
        Self::from_raw(vertices, indices, layout)
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.stride()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `index`, or `None` if it is out of range.
    pub fn position(&self, index: u32) -> Option<Vec3> {
        vertex_position(&self.vertices, self.layout, index)
    }

    /// All vertex positions in buffer order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(self.layout.stride())
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    /// Corners of triangle `i`, or `None` if any index is out of range.
    pub fn triangle(&self, i: usize) -> Option<[Vec3; 3]> {
        triangle_at(&self.vertices, &self.indices, self.layout, i)
    }

    /// Iterates over every well-formed triangle in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i))
    }

    /// Local-space bounds. An empty mesh reports [`Aabb::UNIT`].
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_points(self.positions()).unwrap_or(Aabb::UNIT)
    }

    /// Center of the local-space bounds.
    pub fn center(&self) -> Vec3 {
        self.local_bounds().center()
    }

    /// Creates an axis-aligned cube of edge length `size` centered at the origin.
    ///
    /// Each face has its own four vertices with flat normals, matching the
    /// layout a renderer expects.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24 * 8);
        let mut indices = Vec::with_capacity(36);
        for (face, (normal, u, v)) in faces.into_iter().enumerate() {
            for (cu, cv) in corners {
                let p = (normal + u * cu + v * cv) * h;
                vertices.extend_from_slice(&[p.x, p.y, p.z, normal.x, normal.y, normal.z]);
                vertices.extend_from_slice(&[(cu + 1.0) * 0.5, (cv + 1.0) * 0.5]);
            }
            let base = face as u32 * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::from_raw(vertices, indices, VertexLayout::PositionNormalUv)
    }

    /// Creates a flat square on the XZ plane, `size` units per side, facing +Y.
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        #[rustfmt::skip]
        let vertices = vec![
            -h, 0.0,  h,  0.0, 1.0, 0.0,  0.0, 0.0,
             h, 0.0,  h,  0.0, 1.0, 0.0,  1.0, 0.0,
             h, 0.0, -h,  0.0, 1.0, 0.0,  1.0, 1.0,
            -h, 0.0, -h,  0.0, 1.0, 0.0,  0.0, 1.0,
        ];
        Self::from_raw(vertices, vec![0, 1, 2, 2, 3, 0], VertexLayout::PositionNormalUv)
    }

    /// The single triangle `(0,0,0), (1,0,0), (0,1,0)`, positions only.
    pub fn triangle_xy() -> Self {
        Self::from_raw(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
            VertexLayout::Position,
        )
    }
}

pub(crate) fn vertex_position(vertices: &[f32], layout: VertexLayout, index: u32) -> Option<Vec3> {
    let start = (index as usize).checked_mul(layout.stride())?;
    let p = vertices.get(start..start.checked_add(3)?)?;
    Some(Vec3::new(p[0], p[1], p[2]))
}

pub(crate) fn triangle_at(
    vertices: &[f32],
    indices: &[u32],
    layout: VertexLayout,
    i: usize,
) -> Option<[Vec3; 3]> {
    let tri = indices.get(i * 3..i * 3 + 3)?;
    Some([
        vertex_position(vertices, layout, tri[0])?,
        vertex_position(vertices, layout, tri[1])?,
        vertex_position(vertices, layout, tri[2])?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_detection() {
        assert_eq!(VertexLayout::detect(9), VertexLayout::Position);
        assert_eq!(VertexLayout::detect(16), VertexLayout::PositionNormalUv);
        // Divisible by both: full vertices win.
        assert_eq!(VertexLayout::detect(24), VertexLayout::PositionNormalUv);
        // Divisible by neither.
        assert_eq!(VertexLayout::detect(10), VertexLayout::PositionNormalUv);
    }

    #[test]
    fn try_new_rejects_malformed_buffers() {
        assert_eq!(
            MeshData::try_new(vec![0.0; 10], vec![], VertexLayout::Position),
            Err(MeshError::VertexCount { len: 10, stride: 3 })
        );
        assert_eq!(
            MeshData::try_new(vec![0.0; 9], vec![0, 1], VertexLayout::Position),
            Err(MeshError::IndexCount(2))
        );
        assert_eq!(
            MeshData::try_new(vec![0.0; 9], vec![0, 1, 3], VertexLayout::Position),
            Err(MeshError::IndexOutOfRange {
                index: 3,
                position: 2,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn error_messages_are_readable() {
        let err = MeshError::IndexCount(4);
        assert_eq!(err.to_string(), "index buffer has 4 indices, not a multiple of 3");
    }

    #[test]
    fn raw_mesh_skips_out_of_range_triangles() {
        let mesh = MeshData::from_raw(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 1, 7, 2],
            VertexLayout::Position,
        );
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.triangle(1).is_none());
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn position_reads_stride_aware() {
        let tri = MeshData::triangle_xy();
        assert_eq!(tri.position(1), Some(Vec3::X));
        assert_eq!(tri.position(3), None);

        // Normals and texcoords between positions are skipped.
        let plane = MeshData::plane(2.0);
        assert_eq!(plane.layout(), VertexLayout::PositionNormalUv);
        let first = plane.position(0).unwrap();
        assert_eq!(first.y, 0.0);
        assert_eq!(first.x.abs(), 1.0);
        assert_eq!(plane.position(4), None);
    }

    #[test]
    fn cube_bounds_and_center() {
        let cube = MeshData::cube(2.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);

        let bounds = cube.local_bounds();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(1.0));
        assert_eq!(cube.center(), Vec3::ZERO);
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = MeshData::cube(1.0);
        for [a, b, c] in cube.triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn empty_mesh_reports_unit_bounds() {
        let mesh = MeshData::default();
        assert_eq!(mesh.local_bounds(), Aabb::UNIT);
        assert_eq!(mesh.positions().count(), 0);
    }
}
