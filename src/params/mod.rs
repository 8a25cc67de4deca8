//! Parameter definitions with physical units and documented semantics.
//!
//! Defaults match the stock control panel values. Every struct derives serde so
//! a whole `SimulationParameters` can be loaded from a RON preset.

mod foam;
mod mesh;
mod wave;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WaterError, WaterResult};

// Re-export all types
pub use foam::FoamParams;
pub use mesh::MeshConfig;
pub use wave::WaveParams;

/// Everything the core reads each tick, grouped by consumer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub wave: WaveParams,
    pub foam: FoamParams,
    pub mesh: MeshConfig,
}

impl SimulationParameters {
    /// Parse a RON preset; omitted fields keep their defaults
    pub fn from_ron(text: &str) -> WaterResult<Self> {
        ron::de::from_str(text).map_err(WaterError::preset)
    }

    /// Load a RON preset from disk
    pub fn load(path: impl AsRef<Path>) -> WaterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let params = Self::from_ron(&text)?;
        log::info!("Loaded preset {}", path.display());
        Ok(params)
    }
}
