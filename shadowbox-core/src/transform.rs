/// Model and shadow transformation matrices
use nalgebra::{Matrix4, Unit, Vector3};

/// Transform builder for the animated model and its silhouette
pub struct Transform;

impl Transform {
    /// Rotation of `degrees` about `axis`. A zero axis yields the identity.
    pub fn rotation_matrix(degrees: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(*axis, 1e-6) {
            Some(axis) => Matrix4::from_axis_angle(&axis, degrees.to_radians()),
            None => Matrix4::identity(),
        }
    }

    /// Model matrix: `spin` degrees about +Y, then `tilt` degrees about +X.
    pub fn model_matrix(tilt: f32, spin: f32) -> Matrix4<f32> {
        Self::rotation_matrix(tilt, &Vector3::x()) * Self::rotation_matrix(spin, &Vector3::y())
    }

    /// Flatten the rotated model onto the shadow plane.
    ///
    /// The model rotation is applied first so the silhouette turns with the model.
    pub fn shadow_model(shadow: &Matrix4<f32>, model: &Matrix4<f32>) -> Matrix4<f32> {
        shadow * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::{Plane, ShadowProjector};
    use nalgebra::{Point3, Vector4};

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::model_matrix(0.0, 0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);

        let degenerate = Transform::rotation_matrix(45.0, &Vector3::zeros());
        assert_eq!(degenerate, Matrix4::identity());
    }

    #[test]
    fn test_model_matrix_spins_about_y() {
        let matrix = Transform::model_matrix(0.0, 90.0);
        let rotated = matrix.transform_point(&Point3::new(1.0, 2.0, 0.0));
        assert!((rotated - Point3::new(0.0, 2.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_tilt_applies_after_spin() {
        let matrix = Transform::model_matrix(90.0, 90.0);
        // Spin takes +X to -Z, tilt about X then takes -Z to +Y.
        let rotated = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((rotated - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_shadow_turns_with_model() {
        let light = Vector4::new(0.0, 10.0, 0.0, 1.0);
        let shadow = ShadowProjector::project_plane(&light, &Plane::ground(-1.0));
        let model = Transform::model_matrix(0.0, 90.0);
        let combined = Transform::shadow_model(&shadow, &model);

        let vertex = Point3::new(1.0, 0.0, 0.0);
        let direct = ShadowProjector::project_point(&combined, &vertex).unwrap();
        let stepwise =
            ShadowProjector::project_point(&shadow, &model.transform_point(&vertex)).unwrap();
        assert!((direct - stepwise).norm() < 1e-5);
        assert!((direct.y + 1.0).abs() < 1e-5);
    }
}
