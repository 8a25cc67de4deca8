//! Grayscale heightmap export.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::noise::SimplexNoise;
use crate::params::{MeshConfig, WaveParams};
use crate::water::height_at;

/// Sample the height field on a `size` x `size` grid spanning the plane
///
/// Heights are normalized to the sampled min..max so calm water still
/// produces a visible image.
pub fn render_heightmap(
    noise: &SimplexNoise,
    time_s: f32,
    wave: &WaveParams,
    mesh: &MeshConfig,
    size: u32,
) -> GrayImage {
    let half_size = mesh.size / 2.0;
    let step = if size > 1 {
        mesh.size / (size - 1) as f32
    } else {
        0.0
    };

    let side = size as usize;
    let heights: Vec<f32> = (0..side * side)
        .map(|i| {
            let x = (i % side) as f32 * step - half_size;
            let y = half_size - (i / side) as f32 * step;
            height_at(noise, time_s, x, y, wave)
        })
        .collect();

    let (min, max) = heights
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        });
    let range = (max - min).max(f32::EPSILON);

    GrayImage::from_fn(size, size, |x, y| {
        let h = heights[y as usize * side + x as usize];
        Luma([(((h - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

/// Render and save a heightmap PNG
pub fn write_heightmap(
    path: impl AsRef<Path>,
    noise: &SimplexNoise,
    time_s: f32,
    wave: &WaveParams,
    mesh: &MeshConfig,
    size: u32,
) -> crate::error::WaterResult<()> {
    let image = render_heightmap(noise, time_s, wave, mesh, size);
    image.save(path.as_ref())?;
    log::info!("Heightmap written to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_spans_full_range() {
        let noise = SimplexNoise::new(42u32);
        let image = render_heightmap(
            &noise,
            1.0,
            &WaveParams::default(),
            &MeshConfig::default(),
            32,
        );

        assert_eq!(image.dimensions(), (32, 32));
        let values: Vec<u8> = image.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values.iter().min(), Some(&0));
        assert_eq!(values.iter().max(), Some(&255));
    }

    #[test]
    fn test_degenerate_sizes() {
        let noise = SimplexNoise::new(42u32);
        let wave = WaveParams::default();
        let mesh = MeshConfig::default();

        assert_eq!(render_heightmap(&noise, 0.0, &wave, &mesh, 0).dimensions(), (0, 0));
        assert_eq!(render_heightmap(&noise, 0.0, &wave, &mesh, 1).dimensions(), (1, 1));
    }

    #[test]
    fn test_calm_heightmap_is_uniform() {
        let noise = SimplexNoise::new(42u32);
        let image = render_heightmap(
            &noise,
            0.0,
            &WaveParams::calm(),
            &MeshConfig::default(),
            8,
        );
        assert!(image.pixels().all(|p| p.0[0] == 0));
    }
}
