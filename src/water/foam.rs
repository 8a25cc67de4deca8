//! Per-face foam lifecycle with a global cap on concurrent foam.
//!
//! Faces live in a flat array indexed by face id. Each tick a face either
//! expires (foaming -> idle) or, while the cap has room, rolls for a spawn
//! (idle -> foaming). The shared counter is an atomic with compare-and-cap
//! acquisition so the same step function serves the sequential sweep and the
//! rayon sweep.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::params::FoamParams;

/// Foam state of one triangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceState {
    pub is_foam: bool,
    /// Simulation time at which foaming began (seconds)
    pub foam_age: f32,
    /// How long the foam persists once started (seconds)
    pub foam_lifespan: f32,
}

/// Count of foaming faces, never allowed past the cap
#[derive(Debug, Default)]
pub struct FoamCounter(AtomicUsize);

impl FoamCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    /// Take one slot if fewer than `cap` are in use
    pub fn try_acquire(&self, cap: usize) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < cap).then_some(n + 1)
            })
            .is_ok()
    }

    pub fn release(&self) {
        let released = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        assert!(released.is_ok(), "foam counter released below zero");
    }
}

/// Foam state for every face of one topology
#[derive(Debug, Default)]
pub struct FoamField {
    faces: Vec<FaceState>,
    counter: FoamCounter,
}

impl FoamField {
    /// All-idle state for `face_count` faces
    pub fn new(face_count: usize) -> Self {
        Self {
            faces: vec![FaceState::default(); face_count],
            counter: FoamCounter::default(),
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[FaceState] {
        &self.faces
    }

    /// Faces currently foaming
    pub fn foam_count(&self) -> usize {
        self.counter.get()
    }

    /// Advance every face once, in index order, drawing from `rng`
    ///
    /// The spawn chance is a per-second rate scaled by `delta_s`, which is
    /// only a fair approximation for small steps.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        current_time_s: f32,
        delta_s: f32,
        params: &FoamParams,
        rng: &mut R,
    ) {
        let threshold = params.spawn_chance * delta_s;
        for face in &mut self.faces {
            step_face(face, &self.counter, current_time_s, threshold, params, || {
                rng.gen::<f32>()
            });
        }
        self.check_counter();
    }

    /// Parallel sweep; each face draws from its own stream derived from `tick_seed`
    ///
    /// Which faces win the remaining slots depends on scheduling, but the cap
    /// holds.
    pub fn advance_par(
        &mut self,
        current_time_s: f32,
        delta_s: f32,
        params: &FoamParams,
        tick_seed: u64,
    ) {
        let threshold = params.spawn_chance * delta_s;
        let counter = &self.counter;

        self.faces
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, face)| {
                let mut rng = SmallRng::seed_from_u64(
                    tick_seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
                );
                step_face(face, counter, current_time_s, threshold, params, || {
                    rng.gen::<f32>()
                });
            });
        self.check_counter();
    }

    /// Start foam on one face regardless of the spawn roll
    ///
    /// Returns false when the cap is already reached. Re-forcing a foaming
    /// face only restarts its clock.
    pub fn force_foam(
        &mut self,
        face: usize,
        start_time_s: f32,
        lifespan_s: f32,
        params: &FoamParams,
    ) -> bool {
        let state = &mut self.faces[face];
        if !state.is_foam && !self.counter.try_acquire(params.max_foam_count) {
            return false;
        }
        *state = FaceState {
            is_foam: true,
            foam_age: start_time_s,
            foam_lifespan: lifespan_s,
        };
        true
    }

    /// Flat per-face RGBA, duplicated to the three vertices of each face
    pub fn vertex_colors(&self, params: &FoamParams) -> Vec<[f32; 4]> {
        let mut colors = vec![[0.0; 4]; self.faces.len() * 3];
        self.write_vertex_colors(params, &mut colors);
        colors
    }

    pub fn write_vertex_colors(&self, params: &FoamParams, out: &mut [[f32; 4]]) {
        assert_eq!(out.len(), self.faces.len() * 3, "color buffer length");

        let foam = params.face_color(true);
        let water = params.face_color(false);
        for (face, vertices) in self.faces.iter().zip(out.chunks_exact_mut(3)) {
            vertices.fill(if face.is_foam { foam } else { water });
        }
    }

    fn check_counter(&self) {
        debug_assert_eq!(
            self.counter.get(),
            self.faces.iter().filter(|f| f.is_foam).count(),
            "foam counter out of sync with face states"
        );
    }
}

fn step_face(
    face: &mut FaceState,
    counter: &FoamCounter,
    now: f32,
    threshold: f32,
    params: &FoamParams,
    mut uniform: impl FnMut() -> f32,
) {
    if face.is_foam {
        // Zero or negative lifespans expire on the first tick after spawning
        if now - face.foam_age > face.foam_lifespan {
            face.is_foam = false;
            counter.release();
        }
    } else if counter.get() < params.max_foam_count
        && uniform() < threshold
        && counter.try_acquire(params.max_foam_count)
    {
        face.is_foam = true;
        face.foam_age = now;
        face.foam_lifespan = params.duration + (uniform() - 0.5) * params.duration_variance;
    }
}
