/// Slider values sampled once per frame
use nalgebra::Vector3;

/// Light slider value that maps to a zero component
pub const LIGHT_MIDPOINT: f32 = 50.0;
pub const LIGHT_SCALE: f32 = 10.0;
/// Rotation slider value that maps to a zero axis component
pub const AXIS_MIDPOINT: f32 = 5.0;
pub const AXIS_SCALE: f32 = 10.0;

/// Element ids of the light sliders, x/y/z
pub const LIGHT_INPUT_IDS: [&str; 3] = ["light-x", "light-y", "light-z"];
/// Element ids of the rotation sliders, x/y/z
pub const ROTATE_INPUT_IDS: [&str; 3] = ["rotate-x", "rotate-y", "rotate-z"];

/// Raw control values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub light: [f32; 3],
    pub rotate: [f32; 3],
}

impl InputSnapshot {
    pub fn new(light: [f32; 3], rotate: [f32; 3]) -> Self {
        Self { light, rotate }
    }

    /// Directional light vector, `(value - 50) / 10` per axis
    pub fn light_direction(&self) -> Vector3<f32> {
        Vector3::from_iterator(
            self.light
                .iter()
                .map(|value| (value - LIGHT_MIDPOINT) / LIGHT_SCALE),
        )
    }

    /// Rotation axis, `(value - 5) / 10` per axis
    pub fn rotation_axis(&self) -> Vector3<f32> {
        Vector3::from_iterator(
            self.rotate
                .iter()
                .map(|value| (value - AXIS_MIDPOINT) / AXIS_SCALE),
        )
    }
}

impl Default for InputSnapshot {
    /// Every slider at its midpoint: no light, no rotation
    fn default() -> Self {
        Self {
            light: [LIGHT_MIDPOINT; 3],
            rotate: [AXIS_MIDPOINT; 3],
        }
    }
}
