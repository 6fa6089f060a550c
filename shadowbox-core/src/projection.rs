/// View and perspective projection for the renderer
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::camera::OrbitalCamera;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }
}

/// Eye, target and lens used to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub perspective: Perspective,
}

impl ViewCamera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vector3::y(),
            perspective: Perspective::new(aspect),
        }
    }

    /// Snapshot the current pose of an orbital camera.
    pub fn from_orbit(camera: &OrbitalCamera, aspect: f32) -> Self {
        Self::new(camera.eye(), camera.center(), aspect)
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.perspective.matrix()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Map a point through a full model-view-projection matrix to
/// `(screen_x, screen_y, depth)`.
///
/// Returns `None` for points behind the eye or outside the view volume.
pub fn to_screen(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Behind the eye, or too close to divide safely
    if clip.w < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
        return None;
    }
    Some(clip_to_screen(&clip, width, height))
}

/// Perspective divide and viewport mapping of a clip-space position.
///
/// `clip.w` must be positive; results may lie outside the viewport.
pub fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> (f32, f32, f32) {
    let ndc = clip.xyz() / clip.w;
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
    (screen_x, screen_y, ndc.z)
}

/// Signed distance to the near plane in clip space, non-negative when in front.
fn near_distance(clip: &Vector4<f32>) -> f32 {
    clip.z + clip.w
}

fn near_intersection(a: &Vector4<f32>, b: &Vector4<f32>) -> Vector4<f32> {
    let (da, db) = (near_distance(a), near_distance(b));
    a + (b - a) * (da / (da - db))
}

/// Clip a convex clip-space polygon against the near plane.
///
/// Returns the part in front of the eye, which is empty or has at least
/// three corners for a triangle input.
pub fn clip_near(polygon: &[Vector4<f32>]) -> Vec<Vector4<f32>> {
    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (inside, next_inside) = (near_distance(current) >= 0.0, near_distance(next) >= 0.0);
        if inside {
            clipped.push(*current);
        }
        if inside != next_inside {
            clipped.push(near_intersection(current, next));
        }
    }
    clipped
}

/// Clip a clip-space segment against the near plane.
pub fn clip_segment_near(
    a: &Vector4<f32>,
    b: &Vector4<f32>,
) -> Option<(Vector4<f32>, Vector4<f32>)> {
    match (near_distance(a) >= 0.0, near_distance(b) >= 0.0) {
        (true, true) => Some((*a, *b)),
        (true, false) => Some((*a, near_intersection(a, b))),
        (false, true) => Some((near_intersection(a, b), *b)),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ViewCamera {
        ViewCamera::new(Point3::new(0.0, 0.0, 8.0), Point3::origin(), 1.0)
    }

    #[test]
    fn test_center_maps_to_middle() {
        let (x, y, depth) =
            to_screen(&camera().view_projection(), &Point3::origin(), 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_points_behind_eye_are_rejected() {
        let behind = Point3::new(0.0, 0.0, 12.0);
        assert!(to_screen(&camera().view_projection(), &behind, 80, 40).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let vp = camera().view_projection();
        let near = to_screen(&vp, &Point3::new(0.0, 0.0, 1.0), 80, 40).unwrap();
        let far = to_screen(&vp, &Point3::new(0.0, 0.0, -1.0), 80, 40).unwrap();
        assert!(near.2 < far.2);
    }

    #[test]
    fn test_off_screen_point_still_maps() {
        let vp = camera().view_projection();
        let wide = Point3::new(20.0, 0.0, 0.0);
        assert!(to_screen(&vp, &wide, 80, 40).is_none());

        let (x, _, _) = clip_to_screen(&(vp * wide.to_homogeneous()), 80, 40);
        assert!(x > 80.0);
    }

    #[test]
    fn test_clip_near_keeps_front_part() {
        let vp = camera().view_projection();
        let corners = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 20.0),
        ]
        .map(|p| vp * p.to_homogeneous());

        let clipped = clip_near(&corners);
        assert_eq!(clipped.len(), 4);
        for corner in &clipped {
            assert!(corner.z + corner.w >= -1e-4);
            assert!(corner.w > 0.0);
        }

        let behind = [
            Point3::new(0.0, 0.0, 9.0),
            Point3::new(1.0, 0.0, 10.0),
            Point3::new(0.0, 1.0, 11.0),
        ]
        .map(|p| vp * p.to_homogeneous());
        assert!(clip_near(&behind).is_empty());
        assert_eq!(clip_near(&corners[..2]).len(), 2);
    }

    #[test]
    fn test_clip_segment_near() {
        let vp = camera().view_projection();
        let front = vp * Point3::new(0.0, 0.0, 0.0).to_homogeneous();
        let back = vp * Point3::new(0.0, 0.0, 20.0).to_homogeneous();

        let (a, b) = clip_segment_near(&front, &back).unwrap();
        assert_eq!(a, front);
        assert!((b.z + b.w).abs() < 1e-4);
        assert!(clip_segment_near(&back, &back).is_none());
    }

    #[test]
    fn test_from_orbit_uses_eye() {
        let orbit = OrbitalCamera::default();
        let camera = ViewCamera::from_orbit(&orbit, 2.0);
        assert_eq!(camera.eye, orbit.eye());
        assert!(camera.view_matrix().norm() > 0.0);
    }
}
