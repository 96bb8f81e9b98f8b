/// Model/view/projection state and the normal matrix derived from it
use nalgebra::{Matrix3, Matrix4, Unit, Vector3};

use crate::projection::Perspective;

/// Transform matrices owned by the render loop.
///
/// Only the model matrix changes after construction. The normal matrix is
/// never stored; [`TransformState::normal_matrix`] derives it from the model
/// and view matrices on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
}

impl TransformState {
    pub fn init(translation: Vector3<f32>, perspective: &Perspective) -> Self {
        Self {
            model: Matrix4::new_translation(&translation),
            view: Matrix4::identity(),
            projection: perspective.matrix(),
        }
    }

    /// Rotate the model in its local frame by `delta_angle` radians about `axis`.
    ///
    /// The axis is normalized first; a zero-length axis leaves the model unchanged.
    pub fn update(&mut self, delta_angle: f32, axis: &Vector3<f32>) {
        let Some(axis) = Unit::try_new(*axis, f32::EPSILON) else {
            return;
        };
        self.model *= Matrix4::from_axis_angle(&axis, delta_angle);
    }

    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    /// Inverse-transpose of the upper-left 3x3 of `model * view`.
    /// Falls back to identity when that block is singular.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let model_view = self.model * self.view;
        model_view
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix3::identity)
    }
}

/// Rotation angle for a frame that arrived `elapsed_millis` after the previous one.
///
/// Returns `None` when no time has passed (or the clock went backwards) so the
/// caller can skip the rotation. Gaps shorter than `min_frame_millis` are clamped
/// up to it, bounding the largest single-frame rotation.
pub fn frame_delta_angle(
    rotation_per_frame: f32,
    elapsed_millis: f64,
    min_frame_millis: f64,
) -> Option<f32> {
    if !elapsed_millis.is_finite() || elapsed_millis <= 0.0 {
        return None;
    }
    let elapsed = elapsed_millis.max(min_frame_millis);
    Some((rotation_per_frame as f64 / elapsed) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn state() -> TransformState {
        let perspective = Perspective::new(0.75, 4.0 / 3.0, 0.1, 100.0).unwrap();
        TransformState::init(Vector3::new(0.0, 0.0, -4.0), &perspective)
    }

    #[test]
    fn test_init_translates_model() {
        let state = state();
        assert_eq!(state.view_matrix(), &Matrix4::identity());
        assert_relative_eq!(state.model_matrix()[(2, 3)], -4.0);
        assert_relative_eq!(state.model_matrix()[(0, 0)], 1.0);
    }

    #[test]
    fn test_zero_axis_is_noop() {
        let mut state = state();
        let before = *state.model_matrix();
        state.update(1.3, &Vector3::zeros());
        assert_eq!(state.model_matrix(), &before);
    }

    #[test]
    fn test_rotations_compose() {
        let axis = Vector3::new(0.3, -0.1, 0.7);
        let mut twice = state();
        twice.update(0.2, &axis);
        twice.update(0.2, &axis);

        let mut once = state();
        once.update(0.4, &axis);

        assert_relative_eq!(twice.model_matrix(), once.model_matrix(), epsilon = 1e-5);
    }

    #[test]
    fn test_axis_length_does_not_change_speed() {
        let mut short = state();
        short.update(0.5, &Vector3::new(0.0, 0.1, 0.0));
        let mut long = state();
        long.update(0.5, &Vector3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(short.model_matrix(), long.model_matrix(), epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_keeps_translation() {
        let mut state = state();
        state.update(PI / 3.0, &Vector3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(state.model_matrix()[(2, 3)], -4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_matrix_tracks_model() {
        let mut state = state();
        state.update(0.9, &Vector3::new(0.2, 1.0, -0.4));

        let upper = (state.model_matrix() * state.view_matrix())
            .fixed_view::<3, 3>(0, 0)
            .into_owned();
        let expected = upper.try_inverse().unwrap().transpose();
        assert_relative_eq!(state.normal_matrix(), expected, epsilon = 1e-6);

        // pure rotation: inverse-transpose equals the rotation itself
        assert_relative_eq!(state.normal_matrix(), upper, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_matrix_recomputed_after_update() {
        let mut state = state();
        let first = state.normal_matrix();
        state.update(0.5, &Vector3::z());
        assert!((state.normal_matrix() - first).norm() > 1e-3);
    }

    #[test]
    fn test_delta_angle() {
        let angle = frame_delta_angle(PI / 8.0, 16.0, 1.0).unwrap();
        assert_relative_eq!(angle, PI / 8.0 / 16.0, epsilon = 1e-7);
    }

    #[test]
    fn test_delta_angle_skips_zero_and_negative_gaps() {
        assert_eq!(frame_delta_angle(PI / 8.0, 0.0, 1.0), None);
        assert_eq!(frame_delta_angle(PI / 8.0, -3.0, 1.0), None);
        assert_eq!(frame_delta_angle(PI / 8.0, f64::NAN, 1.0), None);
    }

    #[test]
    fn test_delta_angle_clamps_tiny_gaps() {
        let angle = frame_delta_angle(PI / 8.0, 1e-6, 1.0).unwrap();
        assert_relative_eq!(angle, PI / 8.0, epsilon = 1e-7);
    }
}
