//! Wave displacement parameters.

use serde::{Deserialize, Serialize};

/// Periodic wave and noise settings for the height field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Spatial frequency along X (radians per unit)
    pub frequency_x: f32,

    /// Spatial frequency along Y (radians per unit)
    pub frequency_y: f32,

    /// Time scale applied before any waveform is evaluated
    pub speed: f32,

    /// Height of each periodic term (units)
    pub amplitude: f32,

    /// Noise spatial frequency; 0 disables the noise layer entirely
    pub noise_frequency: f32,

    /// Height of the noise layer (units)
    pub noise_amplitude: f32,

    /// Add sin((x + y) * 0.1 + 0.3 * wave_time) * amplitude / 2
    pub diagonal_term: bool,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency_x: 0.5,
            frequency_y: 0.3,
            speed: 1.0,
            amplitude: 0.1,
            noise_frequency: 0.2,
            noise_amplitude: 0.05,
            diagonal_term: true,
        }
    }
}

impl WaveParams {
    /// Flat water: every term contributes zero height
    pub fn calm() -> Self {
        Self {
            amplitude: 0.0,
            noise_amplitude: 0.0,
            ..Self::default()
        }
    }
}
