/// Viewport and perspective projection utilities
use nalgebra::{Matrix4, Point3};

use crate::error::{Error, Result};

/// Drawable surface size in pixels (or cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Map a normalized device coordinate to surface space (origin top-left)
    pub fn to_screen(&self, ndc: &Point3<f32>) -> (f32, f32, f32) {
        let x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        (x, y, ndc.z)
    }
}

/// Symmetric perspective frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if !fov_y.is_finite() || fov_y <= 0.0 {
            return Err(Error::InvalidConfig("fov_y must be positive"));
        }
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(Error::InvalidConfig("aspect ratio must be positive"));
        }
        if !near.is_finite() || !far.is_finite() || near <= 0.0 || far <= near {
            return Err(Error::InvalidConfig("near/far planes must satisfy 0 < near < far"));
        }
        Ok(Self {
            fov_y,
            aspect,
            near,
            far,
        })
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_viewport_aspect() {
        let viewport = Viewport::new(800, 600);
        assert_relative_eq!(viewport.aspect(), 800.0 / 600.0);
        assert_eq!(Viewport::new(0, 0), Viewport::new(1, 1));
    }

    #[test]
    fn test_screen_mapping() {
        let viewport = Viewport::new(80, 40);
        let (x, y, z) = viewport.to_screen(&Point3::new(-1.0, 1.0, 0.5));
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
        assert_relative_eq!(z, 0.5);
        let (x, y, _) = viewport.to_screen(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(x, 40.0);
        assert_relative_eq!(y, 20.0);
    }

    #[test]
    fn test_perspective_matrix() {
        let perspective = Perspective::new(0.75, 2.0, 0.1, 100.0).unwrap();
        let m = perspective.matrix();
        let f = 1.0 / (0.75f32 / 2.0).tan();
        assert_relative_eq!(m[(0, 0)], f / 2.0, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 1)], f, epsilon = 1e-6);
        assert_relative_eq!(m[(3, 2)], -1.0);
        assert_relative_eq!(m[(2, 2)], (100.0 + 0.1) / (0.1 - 100.0), epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_rejects_bad_planes() {
        assert!(Perspective::new(0.75, 1.0, 0.0, 100.0).is_err());
        assert!(Perspective::new(0.75, 1.0, 10.0, 1.0).is_err());
        assert!(Perspective::new(0.0, 1.0, 0.1, 100.0).is_err());
    }
}
