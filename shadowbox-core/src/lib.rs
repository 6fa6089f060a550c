/// Shadowbox Core Library - camera, animation and shadow engine
///
/// This library provides the frame-driven core of the shadowbox viewer:
/// a smoothed frame clock, an orbital camera, the multi-channel animation
/// engine, planar shadow projection, and the OBJ loading they render.

pub mod animation;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod obj;
pub mod preset;
pub mod projection;
pub mod shadow;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationChannel, AnimationEngine, AnimationFrame, LightDirection};
pub use camera::{CameraControl, ControlSet, OrbitalCamera};
pub use clock::FrameClock;
pub use config::{AnimationConfig, CameraConfig};
pub use error::{LoadError, ShadowError, UnknownChannel};
pub use frame::{FrameDriver, FrameOutput};
pub use geometry::{Mesh, Triangle, Vertex};
pub use preset::{Preset, PresetId};
pub use projection::{Perspective, ViewCamera};
pub use shadow::{Plane, ShadowProjector};
pub use transform::Transform;
