//! Foam lifecycle and surface color parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stochastic foam spawning and flat face coloring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamParams {
    /// Spawn rate per idle face (events per second, scaled by the tick delta)
    pub spawn_chance: f32,

    /// Mean foam lifetime (seconds)
    pub duration: f32,

    /// Full width of the uniform jitter around `duration` (seconds)
    pub duration_variance: f32,

    /// Upper bound on simultaneously foaming faces
    pub max_foam_count: usize,

    /// Linear RGB of foaming faces
    pub foam_color: Vec3,

    /// Linear RGB of idle water
    pub water_color: Vec3,

    pub foam_opacity: f32,
    pub water_opacity: f32,
}

impl Default for FoamParams {
    fn default() -> Self {
        Self {
            spawn_chance: 0.01,
            duration: 2.0,
            duration_variance: 1.0,
            max_foam_count: 50,
            foam_color: Vec3::new(1.0, 1.0, 1.0),
            // dodgerblue
            water_color: Vec3::new(0.118, 0.565, 1.0),
            foam_opacity: 1.0,
            water_opacity: 0.8,
        }
    }
}

impl FoamParams {
    /// RGBA written to every vertex of a face in the given state
    pub fn face_color(&self, is_foam: bool) -> [f32; 4] {
        if is_foam {
            self.foam_color.extend(self.foam_opacity).to_array()
        } else {
            self.water_color.extend(self.water_opacity).to_array()
        }
    }
}
