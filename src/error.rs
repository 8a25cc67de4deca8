//! Error type for the water simulation.
//!
//! Almost everything in the core is infallible: numeric parameters have no
//! invalid ranges and invariant breaches are asserted. What remains are the
//! edges where data enters or leaves the process.

/// Errors surfaced by topology validation, preset loading and export.
#[derive(thiserror::Error, Debug)]
pub enum WaterError {
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Preset error: {0}")]
    Preset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl WaterError {
    pub fn invalid_topology<T: ToString>(msg: T) -> Self {
        WaterError::InvalidTopology(msg.to_string())
    }

    pub fn preset<T: ToString>(msg: T) -> Self {
        WaterError::Preset(msg.to_string())
    }
}

/// Result type alias for fallible water operations
pub type WaterResult<T> = Result<T, WaterError>;
