//! Per-tick water pipeline: heights and foam colors for one topology.

use std::sync::Arc;

use rand::Rng;

use super::displacement::compute_heights;
use super::foam::FoamField;
use super::mesh::{MeshTopology, WaterVertex};
use crate::noise::SimplexNoise;
use crate::params::SimulationParameters;

/// Output of one tick, aligned to the topology's vertex order
#[derive(Debug, Clone)]
pub struct WaterFrame {
    pub heights: Vec<f32>,
    pub colors: Vec<[f32; 4]>,
}

/// High-level water system owning topology, foam state and parameters
pub struct WaterSystem {
    noise: Arc<SimplexNoise>,
    topology: MeshTopology,
    foam: FoamField,
    params: SimulationParameters,
}

impl WaterSystem {
    /// Create a water system over an existing topology
    pub fn new(
        noise: Arc<SimplexNoise>,
        topology: MeshTopology,
        params: SimulationParameters,
    ) -> Self {
        let foam = FoamField::new(topology.face_count());
        Self {
            noise,
            topology,
            foam,
            params,
        }
    }

    /// Create a water system over a plane built from `params.mesh`
    pub fn with_plane<R: Rng + ?Sized>(
        noise: Arc<SimplexNoise>,
        params: SimulationParameters,
        rng: &mut R,
    ) -> Self {
        let topology = MeshTopology::plane(&params.mesh, rng);
        Self::new(noise, topology, params)
    }

    /// Swap in a new topology; all foam state starts over idle
    pub fn set_topology(&mut self, topology: MeshTopology) {
        log::info!(
            "Rebuilding water topology: {} faces -> {} faces",
            self.topology.face_count(),
            topology.face_count()
        );
        self.foam = FoamField::new(topology.face_count());
        self.topology = topology;
    }

    /// Change the plane subdivision; no-op when unchanged
    pub fn set_detail<R: Rng + ?Sized>(&mut self, detail: usize, rng: &mut R) -> bool {
        if detail == self.params.mesh.detail {
            return false;
        }
        self.params.mesh.detail = detail;
        self.set_topology(MeshTopology::plane(&self.params.mesh, rng));
        true
    }

    pub fn topology(&self) -> &MeshTopology {
        &self.topology
    }

    pub fn foam(&self) -> &FoamField {
        &self.foam
    }

    pub fn noise(&self) -> &Arc<SimplexNoise> {
        &self.noise
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Mutable parameters; topology changes go through `set_detail`
    pub fn params_mut(&mut self) -> &mut SimulationParameters {
        &mut self.params
    }

    /// Heights for every vertex at `time_s`
    pub fn compute_heights(&self, time_s: f32) -> Vec<f32> {
        compute_heights(
            &self.noise,
            time_s,
            self.topology.rest_positions(),
            &self.params.wave,
        )
    }

    /// Advance foam state by one tick
    pub fn advance_foam<R: Rng + ?Sized>(&mut self, time_s: f32, delta_s: f32, rng: &mut R) {
        assert_eq!(
            self.foam.face_count(),
            self.topology.face_count(),
            "foam state out of sync with topology"
        );
        self.foam.advance(time_s, delta_s, &self.params.foam, rng);
    }

    /// Advance foam state by one tick across the rayon pool
    ///
    /// The per-face streams are seeded from one draw of `rng`, so a seeded
    /// `rng` reproduces the sweep as long as the cap is not contended.
    pub fn advance_foam_par<R: Rng + ?Sized>(&mut self, time_s: f32, delta_s: f32, rng: &mut R) {
        assert_eq!(
            self.foam.face_count(),
            self.topology.face_count(),
            "foam state out of sync with topology"
        );
        let tick_seed = rng.gen::<u64>();
        self.foam
            .advance_par(time_s, delta_s, &self.params.foam, tick_seed);
    }

    /// Per-vertex RGBA for the current foam state
    pub fn vertex_colors(&self) -> Vec<[f32; 4]> {
        self.foam.vertex_colors(&self.params.foam)
    }

    /// Run one full tick: displacement and foam side by side
    pub fn tick<R: Rng + Send + ?Sized>(
        &mut self,
        time_s: f32,
        delta_s: f32,
        rng: &mut R,
    ) -> WaterFrame {
        assert_eq!(
            self.foam.face_count(),
            self.topology.face_count(),
            "foam state out of sync with topology"
        );

        let Self {
            noise,
            topology,
            foam,
            params,
        } = self;
        let noise: &SimplexNoise = noise;
        let rest_positions = topology.rest_positions();
        let wave = &params.wave;
        let foam_params = &params.foam;

        // Heights never touch foam state, so the two halves run concurrently
        let (heights, colors) = rayon::join(
            || compute_heights(noise, time_s, rest_positions, wave),
            || {
                foam.advance(time_s, delta_s, foam_params, rng);
                foam.vertex_colors(foam_params)
            },
        );

        WaterFrame { heights, colors }
    }

    /// GPU-ready vertices for a frame of this topology
    pub fn vertices(&self, frame: &WaterFrame) -> Vec<WaterVertex> {
        self.topology.vertices(&frame.heights, &frame.colors)
    }
}
