use glam::{Mat4, Vec3};

/// Camera data laid out for a GPU uniform buffer.
///
/// Matrices are column-major, matching both glam and WGSL/GLSL `mat4x4`.
/// The trailing padding keeps the struct a multiple of 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix for transforming world positions to clip space.
    pub view_proj: [[f32; 4]; 4],
    /// View matrix (world to camera space transformation).
    pub view: [[f32; 4]; 4],
    /// Projection matrix (camera to clip space transformation).
    pub proj: [[f32; 4]; 4],
    /// Camera position in world space, useful for lighting calculations.
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniforms {
    pub fn new(view: Mat4, proj: Mat4, camera_pos: Vec3) -> Self {
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            _padding: 0.0,
        }
    }

    /// Raw bytes ready for `queue.write_buffer`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_uniform_friendly() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 3 * 64 + 16);

        let uniforms = CameraUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(uniforms.as_bytes().len(), 208);
        assert_eq!(uniforms.camera_pos, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn view_proj_is_projection_times_view() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let proj = Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0));
        let uniforms = CameraUniforms::new(view, proj, Vec3::ZERO);
        assert_eq!(uniforms.view_proj, (proj * view).to_cols_array_2d());
    }
}
