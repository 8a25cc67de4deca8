//! Non-indexed triangle topology for the water surface.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::error::{WaterError, WaterResult};
use crate::params::MeshConfig;

/// Vertex data for water mesh (displaced position + RGBA)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Rest positions grouped into faces of three unshared vertices
#[derive(Clone, Debug)]
pub struct MeshTopology {
    rest_positions: Arc<[Vec3]>,
}

impl MeshTopology {
    /// Wrap externally built rest positions
    pub fn new(rest_positions: Vec<Vec3>) -> WaterResult<Self> {
        if rest_positions.len() % 3 != 0 {
            return Err(WaterError::invalid_topology(format!(
                "vertex count {} is not a multiple of 3",
                rest_positions.len()
            )));
        }
        Ok(Self {
            rest_positions: rest_positions.into(),
        })
    }

    /// Build a square XY plane split into `detail` x `detail` cells, two faces each
    ///
    /// Rows run from +Y down to -Y. Every vertex gets a small random rest
    /// height in `[0, rest_jitter)` so the flat shading never degenerates.
    pub fn plane<R: Rng + ?Sized>(config: &MeshConfig, rng: &mut R) -> Self {
        let segments = config.detail;
        let cell = if segments > 0 {
            config.size / segments as f32
        } else {
            0.0
        };
        let half_size = config.size / 2.0;

        let corner = |x: usize, y: usize| {
            Vec3::new(
                x as f32 * cell - half_size,
                half_size - y as f32 * cell,
                0.0,
            )
        };

        let mut rest_positions = Vec::with_capacity(config.face_count() * 3);

        // Counter-clockwise winding seen from +Z
        for y in 0..segments {
            for x in 0..segments {
                let top_left = corner(x, y);
                let top_right = corner(x + 1, y);
                let bottom_left = corner(x, y + 1);
                let bottom_right = corner(x + 1, y + 1);

                rest_positions.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    bottom_left,
                    bottom_right,
                    top_right,
                ]);
            }
        }

        for position in &mut rest_positions {
            position.z = rng.gen::<f32>() * config.rest_jitter;
        }

        Self {
            rest_positions: rest_positions.into(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.rest_positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.rest_positions.len() / 3
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// Immutable handle to the rest buffer, safe to hand to another thread
    pub fn snapshot(&self) -> Arc<[Vec3]> {
        Arc::clone(&self.rest_positions)
    }

    /// Interleave rest XY, the given heights and per-vertex colors for upload
    pub fn vertices(&self, heights: &[f32], colors: &[[f32; 4]]) -> Vec<WaterVertex> {
        assert_eq!(heights.len(), self.vertex_count(), "height buffer length");
        assert_eq!(colors.len(), self.vertex_count(), "color buffer length");

        self.rest_positions
            .iter()
            .zip(heights)
            .zip(colors)
            .map(|((rest, &z), &color)| WaterVertex {
                position: [rest.x, rest.y, z],
                color,
            })
            .collect()
    }
}
