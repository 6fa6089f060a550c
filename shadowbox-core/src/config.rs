/// Tunable parameters for the camera and animation engine
use nalgebra::Point3;

/// Orbital camera tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Look-at point the camera orbits.
    pub center: Point3<f32>,
    pub initial_yaw: f32,
    pub initial_pitch: f32,
    pub initial_distance: f32,

    /// Yaw rate in degrees per second.
    pub orbit_speed: f32,
    /// Pitch rate in degrees per second.
    pub pitch_speed: f32,
    /// Zoom rate in units per second.
    pub zoom_speed: f32,
    pub orbit_multiplier: f32,
    pub pitch_multiplier: f32,
    pub zoom_multiplier: f32,

    /// Nominal movement speed, compared against `fast_threshold`.
    pub base_speed: f32,
    pub turbo_multiplier: f32,
    pub fast_threshold: f32,

    pub input_smoothing: f32,
    pub idle_smoothing: f32,
    pub fast_smoothing: f32,
    /// Smoothing factor at startup and after a reset.
    pub initial_smoothing: f32,

    pub pitch_limit: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            initial_yaw: 0.0,
            initial_pitch: 0.0,
            initial_distance: 8.0,
            orbit_speed: 100.0,
            pitch_speed: 70.0,
            zoom_speed: 3.5,
            orbit_multiplier: 1.3,
            pitch_multiplier: 1.6,
            zoom_multiplier: 1.3,
            base_speed: 7.0,
            turbo_multiplier: 3.0,
            fast_threshold: 15.0,
            input_smoothing: 0.15,
            idle_smoothing: 0.88,
            fast_smoothing: 0.08,
            initial_smoothing: 0.82,
            pitch_limit: 89.0,
            min_distance: 2.0,
            max_distance: 50.0,
        }
    }
}

/// Animation engine tuning. Speeds here are the values restored by a full reset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Light position when no channel moves it.
    pub default_light: Point3<f32>,

    /// Model spin in degrees per second.
    pub model_speed: f32,
    pub easing_enabled: bool,
    pub easing_factor: f32,

    pub orbit_center: Point3<f32>,
    pub orbit_radius: f32,
    /// Orbit rate in degrees per second.
    pub orbit_speed: f32,

    pub bobbing_amplitude: f32,
    /// Bobbing frequency in cycles per second.
    pub bobbing_speed: f32,

    pub path_scale: f32,
    pub path_speed: f32,

    /// Distance moved by one manual light nudge.
    pub light_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_light: Point3::new(5.0, 5.0, 5.0),
            model_speed: 30.0,
            easing_enabled: true,
            easing_factor: 0.1,
            orbit_center: Point3::new(0.0, 3.0, 0.0),
            orbit_radius: 6.0,
            orbit_speed: 45.0,
            bobbing_amplitude: 1.5,
            bobbing_speed: 2.0,
            path_scale: 4.0,
            path_speed: 1.0,
            light_step: 1.5,
        }
    }
}
