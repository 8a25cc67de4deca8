//! Low-poly water - headless driver for the water surface simulation
//!
//! Heights are computed on a background worker while foam advances on the
//! main thread, the way a render loop would consume them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use lowpoly_water::cli::Args;
use lowpoly_water::export;
use lowpoly_water::noise::SimplexNoise;
use lowpoly_water::water::{HeightWorker, WaterSystem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.simulation_parameters()?;
    let mut rng = args.foam_rng();

    let noise = Arc::new(SimplexNoise::new(args.noise_seed()));
    let mut system = WaterSystem::with_plane(Arc::clone(&noise), params, &mut rng);
    let mut worker = HeightWorker::spawn(Arc::clone(&noise))?;

    log::info!(
        "Water mesh: detail {} -> {} faces, {} vertices",
        system.params().mesh.detail,
        system.topology().face_count(),
        system.topology().vertex_count()
    );

    let rest = system.topology().snapshot();
    let start = Instant::now();
    let mut last_request = None;
    let mut frames_received = 0u32;
    let mut peak_foam = 0;

    for tick in 0..args.ticks {
        let time_s = tick as f32 * args.dt;

        last_request = Some(worker.submit(time_s, Arc::clone(&rest), &system.params().wave));

        if args.parallel_foam {
            system.advance_foam_par(time_s, args.dt, &mut rng);
        } else {
            system.advance_foam(time_s, args.dt, &mut rng);
        }
        peak_foam = peak_foam.max(system.foam().foam_count());

        if worker.poll() {
            frames_received += 1;
        }

        if tick % 60 == 0 {
            log::debug!(
                "t={:.2}s foam={} heights=#{:?}",
                time_s,
                system.foam().foam_count(),
                worker.applied_id()
            );
        }
    }

    let final_time = args.ticks.saturating_sub(1) as f32 * args.dt;
    if let Some(id) = last_request {
        if !worker.wait_for(id, Duration::from_secs(5)) {
            log::warn!("Final height buffer did not arrive, showing the last one received");
        }
    }
    let heights = match worker.heights() {
        Some(heights) => heights.to_vec(),
        None => system.compute_heights(final_time),
    };

    let (min, max) = heights
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        });

    log::info!(
        "Ran {} ticks in {:.2}ms ({} height frames received)",
        args.ticks,
        start.elapsed().as_secs_f64() * 1000.0,
        frames_received
    );
    log::info!("Height range: {:.4} .. {:.4}", min, max);
    log::info!(
        "Foam: {} faces now, peak {} (cap {})",
        system.foam().foam_count(),
        peak_foam,
        system.params().foam.max_foam_count
    );

    if let Some(path) = &args.heightmap {
        export::write_heightmap(
            path,
            &noise,
            final_time,
            &system.params().wave,
            &system.params().mesh,
            args.heightmap_size,
        )?;
    }

    Ok(())
}
