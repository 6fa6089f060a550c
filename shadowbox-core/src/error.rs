//! Error types for the shadowbox core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while deriving a planar shadow projection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShadowError {
    /// The receiving plane's normal cannot be normalised.
    #[error("invalid shadow plane: normal ({x}, {y}, {z}) has no usable direction")]
    InvalidPlane { x: f32, y: f32, z: f32 },
}

/// An animation channel name that does not match any channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown animation channel '{0}' (expected model, orbit, bobbing or path)")]
pub struct UnknownChannel(pub String);

/// Errors raised while loading a model file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the OBJ file could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A face refers to a vertex that does not exist.
    #[error("line {line}: face index {index} is out of range ({count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        count: usize,
    },

    /// The file parsed but contains no drawable triangles.
    #[error("model contains no faces")]
    EmptyModel,
}
