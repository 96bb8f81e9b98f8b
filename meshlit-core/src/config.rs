/// Scene constants fixed at initialization
use nalgebra::Vector3;

use crate::error::{Error, Result};
use crate::projection::{Perspective, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Initial model offset; pushes the mesh in front of the camera
    pub model_translation: Vector3<f32>,
    pub clear_colour: [f32; 4],
    pub ambient_light_colour: Vector3<f32>,
    /// Light direction uploaded before the first frame
    pub initial_light: Vector3<f32>,
    pub material_specular: Vector3<f32>,
    /// Angle numerator of the per-frame rotation, divided by the frame gap in ms
    pub rotation_per_frame: f32,
    /// Frame gaps shorter than this are treated as this long
    pub min_frame_millis: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_y: 0.75,
            near: 0.1,
            far: 100.0,
            model_translation: Vector3::new(0.0, 0.0, -4.0),
            clear_colour: [0.0, 0.0, 0.0, 0.0],
            ambient_light_colour: Vector3::new(0.2, 0.2, 0.2),
            initial_light: Vector3::new(-0.5, 0.5, 0.5),
            material_specular: Vector3::new(0.5, 0.5, 0.5),
            rotation_per_frame: std::f32::consts::PI / 8.0,
            min_frame_millis: 1.0,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.rotation_per_frame.is_finite() {
            return Err(Error::InvalidConfig("rotation_per_frame must be finite"));
        }
        if !self.min_frame_millis.is_finite() || self.min_frame_millis <= 0.0 {
            return Err(Error::InvalidConfig("min_frame_millis must be positive"));
        }
        Perspective::new(self.fov_y, 1.0, self.near, self.far)?;
        Ok(())
    }

    pub fn perspective(&self, viewport: Viewport) -> Result<Perspective> {
        Perspective::new(self.fov_y, viewport.aspect(), self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_frame_floor() {
        let config = SceneConfig {
            min_frame_millis: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_perspective_uses_viewport_aspect() {
        let perspective = SceneConfig::default()
            .perspective(Viewport::new(640, 480))
            .unwrap();
        assert!((perspective.aspect - 640.0 / 480.0).abs() < 1e-6);
        assert_eq!(perspective.fov_y, 0.75);
    }
}
