//! Error types for the scatter engine.

use thiserror::Error;

/// Errors raised by configuration loading, image decoding and replay export.
///
/// Sampling never fails with an error: an unavailable raster yields an empty
/// particle set instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration JSON could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds values the simulation cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Source image bytes could not be decoded
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Export was asked to embed an empty image payload
    #[error("Image payload is empty")]
    EmptyPayload,

    /// Payload bytes are not in any image format the exporter recognizes
    #[error("Image payload is not a recognized image format")]
    UnrecognizedImage,

    /// Export was given an empty runtime script or module
    #[error("Replay runtime is missing its {0}")]
    MissingRuntime(&'static str),

    /// An artifact did not contain the expected embedded section
    #[error("Artifact has no embedded {0}")]
    PayloadNotFound(&'static str),

    /// An embedded section was not valid base64
    #[error("Embedded payload is not valid base64: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
