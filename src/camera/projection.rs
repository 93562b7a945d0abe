use glam::Mat4;

use crate::math::MatrixExt;

pub(crate) const DEFAULT_FOV: f32 = 45.0;
pub(crate) const DEFAULT_ORTHO_SIZE: f32 = 10.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 179.0;
const MIN_ORTHO_SIZE: f32 = 0.1;

/// Which projection a camera is created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraKind {
    #[default]
    Perspective,
    Orthographic,
}

impl CameraKind {
    /// Parse a kind by name, case-insensitively.
    ///
    /// Anything unrecognised becomes [`CameraKind::Perspective`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "perspective" => CameraKind::Perspective,
            "orthographic" | "ortho" => CameraKind::Orthographic,
            other => {
                log::warn!("unknown camera kind {other:?}, using perspective");
                CameraKind::Perspective
            }
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            CameraKind::Perspective => "Perspective",
            CameraKind::Orthographic => "Orthographic",
        }
    }
}

/// Projection parameters. The variant is fixed when the camera is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Vertical field of view in degrees, kept within `[1, 179]`.
    Perspective { fov: f32 },
    /// Half of the visible height in world units, at least 0.1.
    Orthographic { size: f32 },
}

impl Projection {
    pub fn perspective(fov_degrees: f32) -> Self {
        Projection::Perspective {
            fov: clamp_fov(fov_degrees),
        }
    }

    pub fn orthographic(size: f32) -> Self {
        Projection::Orthographic {
            size: clamp_ortho_size(size),
        }
    }

    pub fn for_kind(kind: CameraKind) -> Self {
        match kind {
            CameraKind::Perspective => Projection::perspective(DEFAULT_FOV),
            CameraKind::Orthographic => Projection::orthographic(DEFAULT_ORTHO_SIZE),
        }
    }

    pub fn kind(&self) -> CameraKind {
        match self {
            Projection::Perspective { .. } => CameraKind::Perspective,
            Projection::Orthographic { .. } => CameraKind::Orthographic,
        }
    }

    pub fn matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        match *self {
            Projection::Perspective { fov } => {
                Mat4::perspective(fov.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { size } => {
                let half_width = size * aspect;
                Mat4::orthographic(-half_width, half_width, -size, size, near, far)
            }
        }
    }
}

pub(crate) fn clamp_fov(fov_degrees: f32) -> f32 {
    fov_degrees.clamp(MIN_FOV, MAX_FOV)
}

pub(crate) fn clamp_ortho_size(size: f32) -> f32 {
    size.max(MIN_ORTHO_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn kind_from_name() {
        assert_eq!(CameraKind::from_name("Orthographic"), CameraKind::Orthographic);
        assert_eq!(CameraKind::from_name(" perspective "), CameraKind::Perspective);
        assert_eq!(CameraKind::from_name("fisheye"), CameraKind::Perspective);
        assert_eq!(CameraKind::Orthographic.type_name(), "Orthographic");
    }

    #[test]
    fn constructors_clamp() {
        assert_eq!(Projection::perspective(0.0), Projection::Perspective { fov: 1.0 });
        assert_eq!(Projection::perspective(500.0), Projection::Perspective { fov: 179.0 });
        assert_eq!(Projection::orthographic(-3.0), Projection::Orthographic { size: 0.1 });
    }

    #[test]
    fn orthographic_extent_follows_aspect() {
        let proj = Projection::orthographic(5.0).matrix(2.0, 0.1, 100.0);
        // The top-right corner of the view volume lands on NDC (1, 1).
        let corner = proj * Vec4::new(10.0, 5.0, -1.0, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-6);
        assert!((corner.y - 1.0).abs() < 1e-6);
    }
}
