/// Orbital camera with velocity-based smoothing
use std::collections::HashSet;

use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

use crate::config::CameraConfig;

/// Seconds over which smoothing relaxes from the active value to the idle value.
const IDLE_BLEND_WINDOW: f32 = 0.2;
/// One-pole rate for moving the smoothing factor while a control is held.
const ACTIVE_SMOOTHING_RATE: f32 = 0.15;
/// One-pole rate for moving the smoothing factor while idle.
const IDLE_SMOOTHING_RATE: f32 = 0.25;

/// Directional controls understood by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraControl {
    OrbitLeft,
    OrbitRight,
    PitchUp,
    PitchDown,
    ZoomIn,
    ZoomOut,
}

/// The controls held down during a frame.
pub type ControlSet = HashSet<CameraControl>;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Camera parameterised by yaw, pitch and distance around a fixed center.
///
/// Only the angles and distance are integrated each frame; the eye position is
/// always derived from them.
#[derive(Debug, Clone)]
pub struct OrbitalCamera {
    config: CameraConfig,
    yaw: f32,
    pitch: f32,
    distance: f32,
    /// Yaw rate and pitch rate in degrees per second.
    angular_velocity: Vector2<f32>,
    zoom_velocity: f32,
    smoothing: f32,
    /// Sum of all deltas seen, used as the camera's notion of "now".
    elapsed: f64,
    last_input_at: Option<f64>,
    eye: Point3<f32>,
}

impl OrbitalCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 0.0,
            angular_velocity: Vector2::zeros(),
            zoom_velocity: 0.0,
            smoothing: config.initial_smoothing,
            elapsed: 0.0,
            last_input_at: None,
            eye: config.center,
            config,
        };
        camera.reset();
        camera
    }

    /// Advance one frame and return the new eye position.
    ///
    /// Non-finite or negative deltas are treated as zero.
    pub fn update(&mut self, dt: f32, controls: &ControlSet, turbo: bool) -> Point3<f32> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt as f64;

        let has_input = !controls.is_empty();
        if has_input {
            self.last_input_at = Some(self.elapsed);
        }
        self.update_smoothing(has_input, turbo);

        let target = self.target_velocity(controls, turbo);
        let s = self.smoothing;
        self.angular_velocity = self.angular_velocity * s + target.xy() * (1.0 - s);
        self.zoom_velocity = self.zoom_velocity * s + target.z * (1.0 - s);

        self.integrate(dt);
        self.eye = self.compute_eye();
        self.eye
    }

    /// Restore the startup pose and drop all motion.
    pub fn reset(&mut self) {
        self.yaw = wrap_degrees(self.config.initial_yaw);
        self.pitch = self
            .config
            .initial_pitch
            .clamp(-self.config.pitch_limit, self.config.pitch_limit);
        self.distance = self
            .config
            .initial_distance
            .clamp(self.config.min_distance, self.config.max_distance);
        self.angular_velocity = Vector2::zeros();
        self.zoom_velocity = 0.0;
        self.smoothing = self.config.initial_smoothing;
        self.elapsed = 0.0;
        self.last_input_at = None;
        self.eye = self.compute_eye();
        debug!(
            "camera reset: yaw {:.1} pitch {:.1} distance {:.2}",
            self.yaw, self.pitch, self.distance
        );
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn eye(&self) -> Point3<f32> {
        self.eye
    }

    pub fn center(&self) -> Point3<f32> {
        self.config.center
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing
    }

    /// Current (yaw rate, pitch rate) in degrees per second.
    pub fn angular_velocity(&self) -> Vector2<f32> {
        self.angular_velocity
    }

    pub fn zoom_velocity(&self) -> f32 {
        self.zoom_velocity
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn update_smoothing(&mut self, has_input: bool, turbo: bool) {
        let config = &self.config;
        let current_speed = config.base_speed * if turbo { config.turbo_multiplier } else { 1.0 };
        let active = if current_speed > config.fast_threshold || turbo {
            config.fast_smoothing
        } else {
            config.input_smoothing
        };

        let target = if has_input {
            active
        } else {
            match self.last_input_at {
                Some(at) => {
                    let since = (self.elapsed - at) as f32;
                    if since < IDLE_BLEND_WINDOW {
                        let blend = since / IDLE_BLEND_WINDOW;
                        active + (config.idle_smoothing - active) * blend
                    } else {
                        config.idle_smoothing
                    }
                }
                None => config.idle_smoothing,
            }
        };

        let rate = if has_input {
            ACTIVE_SMOOTHING_RATE
        } else {
            IDLE_SMOOTHING_RATE
        };
        self.smoothing += (target - self.smoothing) * rate;
    }

    /// Target (yaw rate, pitch rate, zoom rate) for the held controls.
    /// Opposing controls cancel out.
    fn target_velocity(&self, controls: &ControlSet, turbo: bool) -> Vector3<f32> {
        let config = &self.config;
        let boost = if turbo { config.turbo_multiplier } else { 1.0 };
        let orbit = config.orbit_speed * config.orbit_multiplier * boost;
        let pitch = config.pitch_speed * config.pitch_multiplier * boost;
        let zoom = config.zoom_speed * config.zoom_multiplier * boost;

        let mut target = Vector3::zeros();
        for control in controls {
            match control {
                CameraControl::OrbitRight => target.x += orbit,
                CameraControl::OrbitLeft => target.x -= orbit,
                CameraControl::PitchUp => target.y += pitch,
                CameraControl::PitchDown => target.y -= pitch,
                CameraControl::ZoomIn => target.z -= zoom,
                CameraControl::ZoomOut => target.z += zoom,
            }
        }
        target
    }

    fn integrate(&mut self, dt: f32) {
        self.yaw = wrap_degrees(self.yaw + self.angular_velocity.x * dt);

        // Hitting a limit also kills the rate pushing into it, so releasing
        // the control does not have to bleed off speed against the clamp.
        let limit = self.config.pitch_limit;
        let pitch = self.pitch + self.angular_velocity.y * dt;
        if pitch >= limit {
            self.pitch = limit;
            self.angular_velocity.y = self.angular_velocity.y.min(0.0);
        } else if pitch <= -limit {
            self.pitch = -limit;
            self.angular_velocity.y = self.angular_velocity.y.max(0.0);
        } else {
            self.pitch = pitch;
        }

        let distance = self.distance + self.zoom_velocity * dt;
        if distance >= self.config.max_distance {
            self.distance = self.config.max_distance;
            self.zoom_velocity = self.zoom_velocity.min(0.0);
        } else if distance <= self.config.min_distance {
            self.distance = self.config.min_distance;
            self.zoom_velocity = self.zoom_velocity.max(0.0);
        } else {
            self.distance = distance;
        }
    }

    fn compute_eye(&self) -> Point3<f32> {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.config.center
            + Vector3::new(
                pitch.cos() * yaw.sin(),
                pitch.sin(),
                pitch.cos() * yaw.cos(),
            ) * self.distance
    }
}

impl Default for OrbitalCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
