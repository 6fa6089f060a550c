/// Multi-channel animation of the model and the light
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};

use crate::camera::wrap_degrees;
use crate::config::AnimationConfig;
use crate::error::UnknownChannel;
use crate::preset::{Preset, PresetId, DEFAULT_PRESET};

pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;
pub const MAX_SPEED_MULTIPLIER: f32 = 5.0;
pub const COARSE_SPEED_STEP: f32 = 0.5;
pub const FINE_SPEED_STEP: f32 = 0.1;

/// Lowest world Y the animated light may reach.
pub const LIGHT_FLOOR: f32 = 0.5;
/// Lowest Y a manual nudge may move the base light position to.
const MANUAL_LIGHT_FLOOR: f32 = 0.1;
/// Resuming a model whose speed is at or below this restores the configured speed.
const STALLED_MODEL_SPEED: f32 = 0.1;

/// Independently toggleable animation channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationChannel {
    /// Model spin. "Enabled" means not paused.
    Model,
    Orbit,
    Bobbing,
    Path,
}

impl AnimationChannel {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationChannel::Model => "model",
            AnimationChannel::Orbit => "orbit",
            AnimationChannel::Bobbing => "bobbing",
            AnimationChannel::Path => "path",
        }
    }
}

impl fmt::Display for AnimationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "rotation" => Ok(AnimationChannel::Model),
            "orbit" => Ok(AnimationChannel::Orbit),
            "bobbing" | "bob" => Ok(AnimationChannel::Bobbing),
            "path" => Ok(AnimationChannel::Path),
            _ => Err(UnknownChannel(s.to_string())),
        }
    }
}

/// Directions for nudging the light's base position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightDirection {
    Left,
    Right,
    Forward,
    Back,
    Up,
    Down,
}

/// Model spin state.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelChannel {
    /// Degrees, always in `[0, 360)`.
    pub rotation_angle: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub paused: bool,
    pub easing_enabled: bool,
}

/// Light channels and the composed light position.
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    pub base_position: Point3<f32>,
    pub orbit_angle: f32,
    pub orbit_speed: f32,
    pub bobbing_offset: f32,
    pub bobbing_speed: f32,
    pub path_phase: f64,
    pub orbit_enabled: bool,
    pub bobbing_enabled: bool,
    pub path_enabled: bool,
    /// World position after composing every enabled channel.
    pub position: Point3<f32>,
}

/// What the renderer needs from one animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub model_rotation: f32,
    pub light_position: Point3<f32>,
}

/// Owns every animation channel plus global time and speed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEngine {
    config: AnimationConfig,
    model: ModelChannel,
    light: LightState,
    /// Scaled seconds since start, advanced only while not globally paused.
    total_time: f64,
    speed_multiplier: f32,
    paused: bool,
    active_preset: PresetId,
}

impl AnimationEngine {
    pub fn new(config: AnimationConfig) -> Self {
        let mut engine = Self {
            model: ModelChannel {
                rotation_angle: 0.0,
                rotation_speed: config.model_speed,
                paused: false,
                easing_enabled: config.easing_enabled,
            },
            light: LightState {
                base_position: config.default_light,
                orbit_angle: 0.0,
                orbit_speed: config.orbit_speed,
                bobbing_offset: 0.0,
                bobbing_speed: config.bobbing_speed,
                path_phase: 0.0,
                orbit_enabled: false,
                bobbing_enabled: false,
                path_enabled: false,
                position: config.default_light,
            },
            total_time: 0.0,
            speed_multiplier: 1.0,
            paused: false,
            active_preset: DEFAULT_PRESET,
            config,
        };
        engine.compose_light();
        engine
    }

    /// Advance every channel by `dt` seconds of wall time.
    pub fn update(&mut self, dt: f32) -> AnimationFrame {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if !self.paused && dt > 0.0 {
            let step = dt * self.speed_multiplier;
            self.total_time += step as f64;
            self.advance_model(step);
            if self.light.orbit_enabled {
                self.light.orbit_angle =
                    wrap_degrees(self.light.orbit_angle + self.light.orbit_speed * step);
            }
        }
        self.compose_light();
        self.frame()
    }

    pub fn frame(&self) -> AnimationFrame {
        AnimationFrame {
            model_rotation: self.model.rotation_angle,
            light_position: self.light.position,
        }
    }

    /// Flip a channel and return whether it is now running.
    pub fn toggle_channel(&mut self, channel: AnimationChannel) -> bool {
        let enabled = match channel {
            AnimationChannel::Model => {
                self.model.paused = !self.model.paused;
                if !self.model.paused && self.model.rotation_speed <= STALLED_MODEL_SPEED {
                    self.model.rotation_speed = self.config.model_speed;
                }
                !self.model.paused
            }
            AnimationChannel::Orbit => {
                self.light.orbit_enabled = !self.light.orbit_enabled;
                self.light.orbit_enabled
            }
            AnimationChannel::Bobbing => {
                self.light.bobbing_enabled = !self.light.bobbing_enabled;
                self.light.bobbing_enabled
            }
            AnimationChannel::Path => {
                self.light.path_enabled = !self.light.path_enabled;
                self.light.path_enabled
            }
        };
        self.compose_light();
        info!("{} animation {}", channel, if enabled { "on" } else { "off" });
        enabled
    }

    pub fn is_enabled(&self, channel: AnimationChannel) -> bool {
        match channel {
            AnimationChannel::Model => !self.model.paused,
            AnimationChannel::Orbit => self.light.orbit_enabled,
            AnimationChannel::Bobbing => self.light.bobbing_enabled,
            AnimationChannel::Path => self.light.path_enabled,
        }
    }

    pub fn toggle_easing(&mut self) -> bool {
        self.model.easing_enabled = !self.model.easing_enabled;
        debug!("easing {}", self.model.easing_enabled);
        self.model.easing_enabled
    }

    /// Pause or resume global time. Returns true when now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!("animation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Change the global speed multiplier by `delta`, clamped to
    /// `[MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER]`. Returns the new value.
    pub fn adjust_global_speed(&mut self, delta: f32) -> f32 {
        let old = self.speed_multiplier;
        self.speed_multiplier =
            (self.speed_multiplier + delta).clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
        info!("speed {:.2}x -> {:.2}x", old, self.speed_multiplier);
        self.speed_multiplier
    }

    /// Overwrite channel rates and flags from a preset. Phases and time are kept.
    ///
    /// Returns false, changing nothing, when `id` is not a known preset.
    pub fn apply_preset(&mut self, id: PresetId) -> bool {
        let Some(preset) = Preset::by_id(id) else {
            warn!("ignoring unknown preset {}", id);
            return false;
        };

        self.model.rotation_speed = preset.model_speed;
        self.model.paused = preset.model_paused;
        self.light.orbit_enabled = preset.orbit_enabled;
        self.light.orbit_speed = preset.orbit_speed;
        self.light.bobbing_enabled = preset.bobbing_enabled;
        self.light.bobbing_speed = preset.bobbing_speed;
        self.light.path_enabled = preset.path_enabled;
        self.speed_multiplier = preset.global_speed;
        self.active_preset = preset.id;
        self.compose_light();

        info!("preset {} '{}' applied", preset.id, preset.name);
        true
    }

    /// Restore every flag, rate and phase to its startup value.
    pub fn reset_all(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
        info!("all animations reset");
    }

    /// Nudge the base light position by one configured step.
    pub fn move_light(&mut self, direction: LightDirection) -> Point3<f32> {
        let step = self.config.light_step;
        let base = &mut self.light.base_position;
        match direction {
            LightDirection::Left => base.x -= step,
            LightDirection::Right => base.x += step,
            LightDirection::Forward => base.z -= step,
            LightDirection::Back => base.z += step,
            LightDirection::Up => base.y += step,
            LightDirection::Down => base.y = (base.y - step).max(MANUAL_LIGHT_FLOOR),
        }
        self.compose_light();
        debug!("light base moved to {:?}", self.light.base_position);
        self.light.base_position
    }

    pub fn model_rotation(&self) -> f32 {
        self.model.rotation_angle
    }

    pub fn light_position(&self) -> Point3<f32> {
        self.light.position
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn active_preset(&self) -> PresetId {
        self.active_preset
    }

    pub fn model(&self) -> &ModelChannel {
        &self.model
    }

    pub fn light(&self) -> &LightState {
        &self.light
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    fn advance_model(&mut self, step: f32) {
        if self.model.paused {
            return;
        }
        let mut delta = self.model.rotation_speed * step;
        if self.model.easing_enabled {
            // Rate modulation only; the angle itself stays continuous.
            delta *= 1.0 + self.config.easing_factor * (self.total_time * 0.5).sin() as f32;
        }
        self.model.rotation_angle = wrap_degrees(self.model.rotation_angle + delta);
    }

    /// Recompute the light position. Bobbing and path are functions of total
    /// time, so they resume in phase whenever they are switched back on.
    fn compose_light(&mut self) {
        let light = &mut self.light;
        let config = &self.config;

        let mut position = if light.orbit_enabled {
            let angle = light.orbit_angle.to_radians();
            config.orbit_center
                + Vector3::new(
                    config.orbit_radius * angle.cos(),
                    0.0,
                    config.orbit_radius * angle.sin(),
                )
        } else {
            light.base_position
        };

        if light.bobbing_enabled {
            let phase = TAU * light.bobbing_speed as f64 * self.total_time;
            light.bobbing_offset = config.bobbing_amplitude * phase.sin() as f32;
            position.y += light.bobbing_offset;
        }

        if light.path_enabled {
            light.path_phase = self.total_time * config.path_speed as f64;
            let phase = light.path_phase;
            position.x += config.path_scale * phase.sin() as f32;
            position.z += config.path_scale * (2.0 * phase).sin() as f32 / 2.0;
        }

        position.y = position.y.max(LIGHT_FLOOR);
        light.position = position;
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn no_easing() -> AnimationEngine {
        AnimationEngine::new(AnimationConfig {
            easing_enabled: false,
            ..AnimationConfig::default()
        })
    }

    fn run(engine: &mut AnimationEngine, frames: usize) {
        for _ in 0..frames {
            engine.update(DT);
        }
    }

    #[test]
    fn test_model_rotation_accumulates() {
        let mut engine = no_easing();
        run(&mut engine, 60);
        assert!((engine.model_rotation() - 30.0).abs() < 1e-2);
        assert!((engine.total_time() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut engine = no_easing();
        engine.adjust_global_speed(4.0);
        run(&mut engine, 60 * 4);
        // 30 deg/s * 5x * 4 s = 600 deg
        assert!((engine.model_rotation() - 240.0).abs() < 0.1);
        assert!(engine.model_rotation() < 360.0);
    }

    #[test]
    fn test_easing_toggle_keeps_angle_continuous() {
        let mut engine = AnimationEngine::default();
        run(&mut engine, 90);
        let before = engine.model_rotation();
        assert!(!engine.toggle_easing());
        assert_eq!(engine.model_rotation(), before);
        engine.update(DT);
        let step = engine.model_rotation() - before;
        assert!((step - 30.0 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_paused_model_holds_angle() {
        let mut engine = no_easing();
        run(&mut engine, 30);
        assert!(!engine.toggle_channel(AnimationChannel::Model));
        let angle = engine.model_rotation();
        run(&mut engine, 30);
        assert_eq!(engine.model_rotation(), angle);
        assert!(engine.total_time() > 0.9);
    }

    #[test]
    fn test_resume_restores_stalled_speed() {
        let mut engine = AnimationEngine::default();
        assert!(engine.apply_preset(3));
        assert!(engine.toggle_channel(AnimationChannel::Model));
        assert_eq!(engine.model().rotation_speed, 30.0);
    }

    #[test]
    fn test_global_pause_freezes_time() {
        let mut engine = AnimationEngine::default();
        engine.toggle_channel(AnimationChannel::Orbit);
        run(&mut engine, 10);
        assert!(engine.toggle_pause());
        let snapshot = engine.clone();
        run(&mut engine, 50);
        assert_eq!(engine.total_time(), snapshot.total_time());
        assert_eq!(engine.frame(), snapshot.frame());
        assert!(!engine.toggle_pause());
    }

    #[test]
    fn test_speed_multiplier_clamps() {
        let mut engine = AnimationEngine::default();
        for _ in 0..20 {
            engine.adjust_global_speed(COARSE_SPEED_STEP);
        }
        assert_eq!(engine.speed_multiplier(), MAX_SPEED_MULTIPLIER);
        for _ in 0..100 {
            engine.adjust_global_speed(-FINE_SPEED_STEP);
        }
        assert_eq!(engine.speed_multiplier(), MIN_SPEED_MULTIPLIER);
        let speed = engine.adjust_global_speed(FINE_SPEED_STEP);
        assert!((speed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_light_orbit_position() {
        let mut engine = no_easing();
        assert!(engine.toggle_channel(AnimationChannel::Orbit));
        // 45 deg/s for 2 s
        run(&mut engine, 120);
        assert!((engine.light().orbit_angle - 90.0).abs() < 0.05);
        let light = engine.light_position();
        assert!((light - Point3::new(0.0, 3.0, 6.0)).norm() < 0.01);
    }

    #[test]
    fn test_disabled_orbit_freezes_phase() {
        let mut engine = no_easing();
        engine.toggle_channel(AnimationChannel::Orbit);
        run(&mut engine, 60);
        let angle = engine.light().orbit_angle;

        engine.toggle_channel(AnimationChannel::Orbit);
        run(&mut engine, 60);
        assert_eq!(engine.light().orbit_angle, angle);
        assert_eq!(engine.light_position(), Point3::new(5.0, 5.0, 5.0));

        engine.toggle_channel(AnimationChannel::Orbit);
        engine.update(DT);
        assert!((engine.light().orbit_angle - angle - 45.0 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_path_offsets() {
        let mut engine = no_easing();
        assert!(engine.toggle_channel(AnimationChannel::Path));
        run(&mut engine, 75);

        // scale 4, speed 1, around the base light at (5, 5, 5)
        let t = engine.total_time();
        assert_eq!(engine.light().path_phase, t);
        let light = engine.light_position();
        assert!((light.x - (5.0 + 4.0 * t.sin() as f32)).abs() < 1e-4);
        assert!((light.z - (5.0 + 2.0 * (2.0 * t).sin() as f32)).abs() < 1e-4);
        assert_eq!(light.y, 5.0);
        // t = 1.25: x = 5 + 4 sin(1.25), z = 5 + 2 sin(2.5)
        assert!((light.x - 8.7960).abs() < 1e-3);
        assert!((light.z - 6.1969).abs() < 1e-3);
    }

    #[test]
    fn test_easing_modulates_rate() {
        let mut engine = AnimationEngine::default();
        run(&mut engine, 180);
        let before = engine.model_rotation();
        engine.update(DT);

        // 30 deg/s * (1 + 0.1 sin(t / 2)) with t just past 3 s
        let t = engine.total_time();
        let expected = 30.0 * DT * (1.0 + 0.1 * (t * 0.5).sin() as f32);
        let step = engine.model_rotation() - before;
        assert!((step - expected).abs() < 1e-4);
        assert!(step - 30.0 * DT > 0.04);
    }

    #[test]
    fn test_toggled_channels_stay_in_phase() {
        let mut steady = no_easing();
        let mut toggled = no_easing();
        for engine in [&mut steady, &mut toggled] {
            engine.toggle_channel(AnimationChannel::Bobbing);
            engine.toggle_channel(AnimationChannel::Path);
        }

        run(&mut steady, 40);
        run(&mut toggled, 10);
        toggled.toggle_channel(AnimationChannel::Bobbing);
        toggled.toggle_channel(AnimationChannel::Path);
        run(&mut toggled, 20);
        toggled.toggle_channel(AnimationChannel::Bobbing);
        toggled.toggle_channel(AnimationChannel::Path);
        run(&mut toggled, 10);

        assert_eq!(steady.total_time(), toggled.total_time());
        assert_eq!(steady.light().bobbing_offset, toggled.light().bobbing_offset);
        assert_eq!(steady.light_position(), toggled.light_position());
    }

    #[test]
    fn test_bobbing_follows_total_time() {
        let mut engine = no_easing();
        engine.toggle_channel(AnimationChannel::Bobbing);
        // 2 Hz: a quarter period is 0.125 s
        for _ in 0..8 {
            engine.update(0.015625);
        }
        assert!((engine.light().bobbing_offset - 1.5).abs() < 1e-3);
        assert!((engine.light_position().y - 6.5).abs() < 1e-3);
    }

    #[test]
    fn test_light_never_below_floor() {
        let mut engine = AnimationEngine::new(AnimationConfig {
            orbit_center: Point3::new(0.0, 0.0, 0.0),
            bobbing_amplitude: 10.0,
            ..AnimationConfig::default()
        });
        engine.toggle_channel(AnimationChannel::Orbit);
        engine.toggle_channel(AnimationChannel::Bobbing);
        for _ in 0..600 {
            let frame = engine.update(DT);
            assert!(frame.light_position.y >= LIGHT_FLOOR);
        }
    }

    #[test]
    fn test_presets_keep_phase() {
        let mut engine = AnimationEngine::default();
        engine.apply_preset(1);
        run(&mut engine, 75);
        let angle = engine.model_rotation();
        let time = engine.total_time();
        let orbit = engine.light().orbit_angle;

        assert!(engine.apply_preset(4));
        assert!(engine.apply_preset(5));

        assert_eq!(engine.model_rotation(), angle);
        assert_eq!(engine.total_time(), time);
        assert_eq!(engine.light().orbit_angle, orbit);
        assert_eq!(engine.active_preset(), 5);
        assert_eq!(engine.speed_multiplier(), 0.3);
        assert_eq!(engine.model().rotation_speed, 10.0);
        assert!(engine.is_enabled(AnimationChannel::Bobbing));
        assert!(!engine.is_enabled(AnimationChannel::Path));
    }

    #[test]
    fn test_unknown_preset_is_a_no_op() {
        let mut engine = AnimationEngine::default();
        engine.apply_preset(2);
        run(&mut engine, 12);
        let before = engine.clone();
        assert!(!engine.apply_preset(9));
        assert!(!engine.apply_preset(0));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_reset_all() {
        let mut engine = AnimationEngine::default();
        engine.apply_preset(4);
        engine.move_light(LightDirection::Up);
        engine.toggle_easing();
        run(&mut engine, 100);

        engine.reset_all();
        assert_eq!(engine.model_rotation(), 0.0);
        assert_eq!(engine.model().rotation_speed, 30.0);
        assert_eq!(engine.light().orbit_angle, 0.0);
        assert_eq!(engine.light().bobbing_offset, 0.0);
        assert_eq!(engine.total_time(), 0.0);
        assert_eq!(engine.speed_multiplier(), 1.0);
        assert_eq!(engine.active_preset(), DEFAULT_PRESET);
        assert_eq!(engine.light_position(), Point3::new(5.0, 5.0, 5.0));
        assert!(engine.model().easing_enabled);
        for channel in [
            AnimationChannel::Orbit,
            AnimationChannel::Bobbing,
            AnimationChannel::Path,
        ] {
            assert!(!engine.is_enabled(channel));
        }
    }

    #[test]
    fn test_move_light() {
        let mut engine = AnimationEngine::default();
        engine.move_light(LightDirection::Left);
        engine.move_light(LightDirection::Forward);
        assert_eq!(engine.light_position(), Point3::new(3.5, 5.0, 3.5));

        for _ in 0..10 {
            engine.move_light(LightDirection::Down);
        }
        assert_eq!(engine.light().base_position.y, 0.1);
        assert_eq!(engine.light_position().y, LIGHT_FLOOR);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!("Orbit".parse::<AnimationChannel>(), Ok(AnimationChannel::Orbit));
        assert_eq!(" bobbing ".parse::<AnimationChannel>(), Ok(AnimationChannel::Bobbing));
        assert_eq!("model".parse::<AnimationChannel>(), Ok(AnimationChannel::Model));
        assert!("spin".parse::<AnimationChannel>().is_err());
        assert_eq!(AnimationChannel::Path.to_string(), "path");
    }
}
