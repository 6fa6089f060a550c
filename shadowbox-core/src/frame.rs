/// Per-frame orchestration: clock, camera, animation, shadow
use std::time::Instant;

use nalgebra::{Matrix4, Point3, Vector2};

use crate::animation::AnimationEngine;
use crate::camera::{wrap_degrees, ControlSet, OrbitalCamera};
use crate::clock::FrameClock;
use crate::config::{AnimationConfig, CameraConfig};
use crate::shadow::{Plane, ShadowProjector};
use crate::transform::Transform;

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    pub dt: f32,
    pub eye: Point3<f32>,
    pub model_rotation: f32,
    /// Animated spin combined with the user's drag rotation.
    pub model: Matrix4<f32>,
    pub light_position: Point3<f32>,
    /// Flattens world-space geometry onto the ground plane.
    pub shadow: Matrix4<f32>,
    /// `shadow` composed with the model rotation, for drawing the silhouette.
    pub shadow_model: Matrix4<f32>,
}

/// Owns the engine components and advances them in a fixed order:
/// clock, camera, animation, then the shadow projection of the updated light.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    clock: FrameClock,
    camera: OrbitalCamera,
    animation: AnimationEngine,
    ground: Plane,
    /// User rotation in degrees about X (tilt) and Y (spin), on top of the animation.
    drag: Vector2<f32>,
}

impl FrameDriver {
    pub fn new(camera: CameraConfig, animation: AnimationConfig, ground: Plane) -> Self {
        Self {
            clock: FrameClock::new(),
            camera: OrbitalCamera::new(camera),
            animation: AnimationEngine::new(animation),
            ground,
            drag: Vector2::zeros(),
        }
    }

    /// Sample the wall clock and advance one frame.
    pub fn advance(&mut self, controls: &ControlSet, turbo: bool) -> FrameOutput {
        self.advance_at(Instant::now(), controls, turbo)
    }

    pub fn advance_at(&mut self, now: Instant, controls: &ControlSet, turbo: bool) -> FrameOutput {
        let dt = self.clock.tick_at(now);
        self.step(dt, controls, turbo)
    }

    /// Advance camera and animation by an explicit delta.
    pub fn step(&mut self, dt: f32, controls: &ControlSet, turbo: bool) -> FrameOutput {
        let eye = self.camera.update(dt, controls, turbo);
        let animation = self.animation.update(dt);

        let light = animation.light_position.to_homogeneous();
        let shadow = ShadowProjector::project_plane(&light, &self.ground);
        let spin = wrap_degrees(self.drag.y + animation.model_rotation);
        let model = Transform::model_matrix(self.drag.x, spin);

        FrameOutput {
            frame: self.clock.frame_count(),
            dt,
            eye,
            model_rotation: animation.model_rotation,
            model,
            light_position: animation.light_position,
            shadow,
            shadow_model: Transform::shadow_model(&shadow, &model),
        }
    }

    /// Add a user rotation of the model, in degrees.
    pub fn rotate_model(&mut self, tilt: f32, spin: f32) {
        self.drag.x = wrap_degrees(self.drag.x + tilt);
        self.drag.y = wrap_degrees(self.drag.y + spin);
    }

    /// User rotation as `(tilt, spin)` degrees.
    pub fn model_pose(&self) -> (f32, f32) {
        (self.drag.x, self.drag.y)
    }

    pub fn reset_model_pose(&mut self) {
        self.drag = Vector2::zeros();
    }

    pub fn camera(&self) -> &OrbitalCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitalCamera {
        &mut self.camera
    }

    pub fn animation(&self) -> &AnimationEngine {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationEngine {
        &mut self.animation
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn ground(&self) -> &Plane {
        &self.ground
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(
            CameraConfig::default(),
            AnimationConfig::default(),
            Plane::ground(-3.0),
        )
    }
}
