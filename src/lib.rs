//! Low-poly water library - procedural wave heights and per-face foam

pub mod cli;
pub mod error;
pub mod export;
pub mod noise;
pub mod params;
pub mod water;
