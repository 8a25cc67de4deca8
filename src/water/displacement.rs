//! Height field: periodic waves plus a simplex noise layer.
//!
//! Every vertex is evaluated on its own, so the whole buffer is a parallel map.

use glam::Vec3;
use rayon::prelude::*;

use crate::noise::SimplexNoise;
use crate::params::WaveParams;

/// Height of the water surface at rest position (x, y) and time `time_s`
pub fn height_at(noise: &SimplexNoise, time_s: f32, x: f32, y: f32, wave: &WaveParams) -> f32 {
    let wave_time = time_s * wave.speed;
    let amplitude = wave.amplitude;

    let mut base = (x * wave.frequency_x + wave_time).sin() * amplitude
        + (y * wave.frequency_y + wave_time * 0.7).cos() * amplitude;
    if wave.diagonal_term {
        base += ((x + y) * 0.1 + wave_time * 0.3).sin() * amplitude * 0.5;
    }

    let detail = if wave.noise_frequency > 0.0 {
        noise.sample(
            (x * wave.noise_frequency) as f64,
            (y * wave.noise_frequency) as f64,
            (wave_time * 0.2) as f64,
        ) as f32
            * wave.noise_amplitude
    } else {
        0.0
    };

    base + detail
}

/// One height per rest position, same order
pub fn compute_heights(
    noise: &SimplexNoise,
    time_s: f32,
    rest_positions: &[Vec3],
    wave: &WaveParams,
) -> Vec<f32> {
    rest_positions
        .par_iter()
        .map(|p| height_at(noise, time_s, p.x, p.y, wave))
        .collect()
}

/// Like `compute_heights`, reusing a caller-owned buffer
pub fn compute_heights_into(
    noise: &SimplexNoise,
    time_s: f32,
    rest_positions: &[Vec3],
    wave: &WaveParams,
    out: &mut [f32],
) {
    assert_eq!(out.len(), rest_positions.len(), "height buffer length");

    out.par_iter_mut()
        .zip(rest_positions.par_iter())
        .for_each(|(height, p)| *height = height_at(noise, time_s, p.x, p.y, wave));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec3> {
        let mut points = Vec::new();
        for y in -10..=10 {
            for x in -10..=10 {
                points.push(Vec3::new(x as f32 * 1.7, y as f32 * 2.3, 0.01));
            }
        }
        points
    }

    #[test]
    fn test_calm_water_is_flat() {
        let noise = SimplexNoise::new(42u32);
        let wave = WaveParams::calm();

        for time in [0.0, 1.5, 1000.0] {
            let heights = compute_heights(&noise, time, &grid(), &wave);
            assert!(heights.iter().all(|&h| h == 0.0));
        }
    }

    #[test]
    fn test_heights_are_pure() {
        let noise = SimplexNoise::new(42u32);
        let wave = WaveParams::default();
        let points = grid();

        let first = compute_heights(&noise, 3.25, &points, &wave);
        let second = compute_heights(&noise, 3.25, &points, &wave);
        assert_eq!(first, second);
        assert_eq!(first.len(), points.len());
    }

    #[test]
    fn test_into_matches_collect() {
        let noise = SimplexNoise::new(9u32);
        let wave = WaveParams::default();
        let points = grid();

        let mut out = vec![f32::NAN; points.len()];
        compute_heights_into(&noise, 0.5, &points, &wave, &mut out);
        assert_eq!(out, compute_heights(&noise, 0.5, &points, &wave));
    }

    #[test]
    fn test_origin_at_time_zero() {
        // sin(0) + cos(0) + sin(0): only the cosine term survives
        let noise = SimplexNoise::new(1u32);
        let wave = WaveParams {
            amplitude: 0.4,
            noise_frequency: 0.0,
            ..WaveParams::default()
        };
        assert!((height_at(&noise, 0.0, 0.0, 0.0, &wave) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zero_noise_frequency_disables_noise() {
        let noise = SimplexNoise::new(1u32);
        let loud = WaveParams {
            amplitude: 0.0,
            noise_frequency: 0.0,
            noise_amplitude: 10.0,
            ..WaveParams::default()
        };
        assert_eq!(height_at(&noise, 2.0, 3.0, 4.0, &loud), 0.0);
    }

    #[test]
    fn test_diagonal_term_toggle() {
        let noise = SimplexNoise::new(1u32);
        let with = WaveParams {
            noise_frequency: 0.0,
            ..WaveParams::default()
        };
        let without = WaveParams {
            diagonal_term: false,
            ..with.clone()
        };

        let (x, y, t) = (3.0, 4.0, 1.0);
        let expected = ((x + y) * 0.1 + t * 0.3_f32).sin() * with.amplitude * 0.5;
        let delta = height_at(&noise, t, x, y, &with) - height_at(&noise, t, x, y, &without);
        assert!((delta - expected).abs() < 1e-6);
    }
}
