//! Headless simulation command

use anyhow::{bail, Result};
use ember_core::Sampler;
use ember_particles::{Emitter, EmitterStats};
use serde::Serialize;

use crate::file::EmitterFile;

pub struct SimulateArgs {
    pub file: String,
    pub frames: u32,
    pub dt: f64,
    pub seed: Option<u64>,
    pub format: String,
}

/// Summary of one headless run
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub frames: u32,
    pub simulated_seconds: f64,
    pub loops_completed: u32,
    pub expired: bool,
    /// Frame on which the emitter expired, if it did
    pub expired_at_frame: Option<u32>,
    pub live_particles: usize,
    pub peak_particles: usize,
    #[serde(flatten)]
    pub stats: EmitterStats,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if !args.dt.is_finite() || args.dt < 0.0 {
        bail!("--dt must be a non-negative number of seconds, got {}", args.dt);
    }

    let file = EmitterFile::load(&args.file)?;
    let mut emitter = file.build_seeded(args.seed)?;
    log::info!(
        "Loaded {} with {} module(s); running {} frame(s) of {}s",
        args.file,
        emitter.module_count(),
        args.frames,
        args.dt
    );

    let report = run_frames(&mut emitter, args.frames, args.dt);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&args.file, &report),
    }
    Ok(())
}

/// Tick `emitter` for `frames` frames of `dt` seconds each
pub fn run_frames<S: Sampler>(emitter: &mut Emitter<S>, frames: u32, dt: f64) -> SimulationReport {
    let mut peak = emitter.particle_count();
    let mut expired_at_frame = None;

    for frame in 0..frames {
        emitter.tick(dt);
        peak = peak.max(emitter.particle_count());
        if expired_at_frame.is_none() && emitter.is_expired() {
            expired_at_frame = Some(frame);
        }
    }

    SimulationReport {
        frames,
        simulated_seconds: frames as f64 * dt,
        loops_completed: emitter.current_loop(),
        expired: emitter.is_expired(),
        expired_at_frame,
        live_particles: emitter.particle_count(),
        peak_particles: peak,
        stats: emitter.stats(),
    }
}

fn print_text(path: &str, report: &SimulationReport) {
    println!("Simulated {} ({} frame(s), {:.2}s)", path, report.frames, report.simulated_seconds);
    println!("  Loops completed: {}", report.loops_completed);
    match report.expired_at_frame {
        Some(frame) => println!("  Expired:         yes (frame {})", frame),
        None => println!("  Expired:         no"),
    }
    println!("  Live particles:  {}", report.live_particles);
    println!("  Peak particles:  {}", report.peak_particles);
    println!("  Spawned:         {}", report.stats.spawned);
    println!("  Despawned:       {}", report.stats.despawned);
    println!("  Evicted:         {}", report.stats.evicted);
    if report.stats.skipped > 0 {
        println!("  Skipped:         {}", report.stats.skipped);
    }
    if report.stats.capped_ticks > 0 {
        println!("  Capped ticks:    {}", report.stats.capped_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ConstantSampler;

    const FOUNTAIN: &str = include_str!("../../../../demos/fountain.toml");

    #[test]
    fn fountain_expires_after_three_loops() {
        let file = EmitterFile::parse(FOUNTAIN).unwrap();
        let mut emitter = file.build(ConstantSampler(0.5)).unwrap();

        // 0.25s frames: 8 frames per 2s loop, third rollover on frame 23
        let report = run_frames(&mut emitter, 40, 0.25);

        assert!(report.expired);
        assert_eq!(report.loops_completed, 3);
        assert_eq!(report.expired_at_frame, Some(23));
        assert!(report.peak_particles <= 400);
        assert!(report.stats.spawned > 0);
    }

    #[test]
    fn zero_frames_reports_initial_state() {
        let mut emitter = Emitter::new();
        let report = run_frames(&mut emitter, 0, 0.1);
        assert_eq!(report.frames, 0);
        assert!(!report.expired);
        assert_eq!(report.live_particles, 0);
        assert_eq!(report.stats, EmitterStats::default());
    }

    #[test]
    fn report_serializes_flat() {
        let mut emitter = Emitter::new();
        let report = run_frames(&mut emitter, 30, 1.0 / 30.0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("spawned").is_some());
        assert!(json.get("capped_ticks").is_some());
        assert!(json.get("stats").is_none());
    }
}
