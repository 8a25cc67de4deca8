//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::WaterResult;
use crate::noise::NoiseSeed;
use crate::params::SimulationParameters;

/// Largest accepted heightmap edge (pixels)
pub const MAX_HEIGHTMAP_SIZE: i64 = 8192;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lowpoly-water")]
#[command(about = "Headless low-poly water surface simulator", long_about = None)]
pub struct Args {
    /// RON preset with simulation parameters (missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Plane subdivision per side (overrides preset)
    #[arg(long, value_name = "SEGMENTS")]
    pub detail: Option<usize>,

    /// Maximum concurrently foaming faces (overrides preset)
    #[arg(long, value_name = "COUNT")]
    pub max_foam: Option<usize>,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,

    /// Tick length in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Noise seed (number or text); random when omitted
    #[arg(long)]
    pub seed: Option<String>,

    /// Seed for foam spawning and rest jitter; random when omitted
    #[arg(long, value_name = "SEED")]
    pub foam_seed: Option<u64>,

    /// Sweep foam faces in parallel instead of in index order
    #[arg(long)]
    pub parallel_foam: bool,

    /// Write the final height field as a grayscale PNG
    #[arg(long, value_name = "PNG")]
    pub heightmap: Option<PathBuf>,

    /// Heightmap width and height in pixels
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 256,
        value_parser = clap::value_parser!(u32).range(1..=MAX_HEIGHTMAP_SIZE)
    )]
    pub heightmap_size: u32,
}

impl Args {
    /// Resolve preset file and command-line overrides
    pub fn simulation_parameters(&self) -> WaterResult<SimulationParameters> {
        let mut params = match &self.preset {
            Some(path) => SimulationParameters::load(path)?,
            None => SimulationParameters::default(),
        };

        if let Some(detail) = self.detail {
            params.mesh.detail = detail;
        }
        if let Some(max_foam) = self.max_foam {
            params.foam.max_foam_count = max_foam;
        }
        Ok(params)
    }

    pub fn noise_seed(&self) -> NoiseSeed {
        self.seed.clone().into()
    }

    pub fn foam_rng(&self) -> StdRng {
        match self.foam_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from(["lowpoly-water", "--detail", "12", "--max-foam", "3"]);
        let params = args.simulation_parameters().unwrap();

        assert_eq!(params.mesh.detail, 12);
        assert_eq!(params.foam.max_foam_count, 3);
        assert_eq!(params.wave, SimulationParameters::default().wave);
    }

    #[test]
    fn test_seed_parsing() {
        let args = Args::parse_from(["lowpoly-water", "--seed", "tide"]);
        assert_eq!(args.noise_seed(), NoiseSeed::Text("tide".to_string()));

        let args = Args::parse_from(["lowpoly-water"]);
        assert_eq!(args.noise_seed(), NoiseSeed::Entropy);
    }

    #[test]
    fn test_heightmap_size_is_bounded() {
        let args = Args::parse_from(["lowpoly-water", "--heightmap-size", "8192"]);
        assert_eq!(args.heightmap_size, 8192);

        assert!(Args::try_parse_from(["lowpoly-water", "--heightmap-size", "65536"]).is_err());
        assert!(Args::try_parse_from(["lowpoly-water", "--heightmap-size", "0"]).is_err());
    }

    #[test]
    fn test_missing_preset_is_io_error() {
        let args = Args::parse_from(["lowpoly-water", "--preset", "/nonexistent/water.ron"]);
        assert!(matches!(
            args.simulation_parameters(),
            Err(crate::error::WaterError::Io(_))
        ));
    }
}
