//! Plane mesh configuration.

use serde::{Deserialize, Serialize};

/// Subdivided plane used as the water topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Edge length of the square plane (units)
    pub size: f32,

    /// Segments per side; changing it rebuilds all per-face state
    pub detail: usize,

    /// Upper bound of the random rest height added to each vertex (units)
    pub rest_jitter: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            detail: 30,
            rest_jitter: 0.02,
        }
    }
}

impl MeshConfig {
    /// Triangles in the non-indexed plane: two per cell
    pub fn face_count(&self) -> usize {
        self.detail * self.detail * 2
    }
}
