/// Planar shadow projection
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::ShadowError;

/// Normals shorter than this are rejected.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// A receiving plane with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Point3<f32>,
    normal: Vector3<f32>,
}

impl Plane {
    /// Build a plane through `point`, normalising `normal`.
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Result<Self, ShadowError> {
        let invalid = || ShadowError::InvalidPlane {
            x: normal.x,
            y: normal.y,
            z: normal.z,
        };
        if !normal.iter().all(|c| c.is_finite()) {
            return Err(invalid());
        }
        let normal = normal.try_normalize(MIN_NORMAL_LENGTH).ok_or_else(invalid)?;
        Ok(Self { point, normal })
    }

    /// Horizontal ground plane at height `y`, facing up.
    pub fn ground(y: f32) -> Self {
        Self {
            point: Point3::new(0.0, y, 0.0),
            normal: Vector3::y(),
        }
    }

    pub fn point(&self) -> Point3<f32> {
        self.point
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Plane coefficients `(a, b, c, d)` with `ax + by + cz + d = 0`.
    pub fn coefficients(&self) -> Vector4<f32> {
        let d = -self.normal.dot(&self.point.coords);
        Vector4::new(self.normal.x, self.normal.y, self.normal.z, d)
    }
}

/// Derives the matrix that flattens geometry onto a plane as seen from a light.
pub struct ShadowProjector;

impl ShadowProjector {
    /// Shadow matrix for a homogeneous light position (`w = 1` point light,
    /// `w = 0` directional light) and a plane given by point and normal.
    pub fn project(
        light: &Vector4<f32>,
        plane_point: &Point3<f32>,
        plane_normal: &Vector3<f32>,
    ) -> Result<Matrix4<f32>, ShadowError> {
        let plane = Plane::new(*plane_point, *plane_normal)?;
        Ok(Self::project_plane(light, &plane))
    }

    /// Shadow matrix for an already validated plane.
    pub fn project_plane(light: &Vector4<f32>, plane: &Plane) -> Matrix4<f32> {
        let p = plane.coefficients();
        let dot = p.dot(light);
        // S = dot * I - L * P^T
        Matrix4::identity() * dot - light * p.transpose()
    }

    /// Apply a shadow matrix to a point and return its flattened position.
    ///
    /// Returns `None` when the point projects to infinity, i.e. it sits level
    /// with a point light.
    pub fn project_point(shadow: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point3<f32>> {
        let h = shadow * point.to_homogeneous();
        if h.w.abs() < 1e-6 {
            return None;
        }
        Point3::from_homogeneous(h)
    }
}
