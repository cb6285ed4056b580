//! `routesim` CLI: scene generation, offline validation, headless playback.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use route_sim::playback::{Playback, PlaybackConfig, WarningEvent};
use route_sim::replay::{load_scene, save_json, save_scene};
use route_sim::scenario::{generate_from_markup, SceneConfig};
use route_sim::validate::{validate_dataset, ValidationReport, DEFAULT_SWEEP_TICK_S};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "routesim", about = "Route playback simulator with hazard proximity warnings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene from a KML route and write the dataset JSON.
    Generate {
        /// Path to the KML route file
        #[arg(long)]
        input: PathBuf,
        /// Output dataset file
        #[arg(long, default_value = "scene.json")]
        output: PathBuf,
        /// Number of hazards to place (clamped by route length)
        #[arg(long, default_value_t = 10)]
        hazards: usize,
        /// Warning distance (m)
        #[arg(long, default_value_t = 80.0)]
        warning: f64,
        /// Random seed for hazard placement; drawn from entropy if omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Vehicle speed (m/s)
        #[arg(long, default_value_t = 6.0)]
        speed: f64,
        /// Maximum spacing between resampled points (m)
        #[arg(long, default_value_t = 6.0)]
        max_segment: f64,
    },
    /// Check a dataset with the offline proximity sweep.
    Validate {
        /// Path to dataset JSON
        input: PathBuf,
        /// Tick length of the playback pass (s)
        #[arg(long, default_value_t = DEFAULT_SWEEP_TICK_S)]
        tick: f64,
    },
    /// Play a dataset to completion and report warnings.
    Play {
        /// Path to dataset JSON
        input: PathBuf,
        /// Tick length in wall-clock seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        tick: f64,
        /// Simulation seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
        /// Save the playback summary to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            hazards,
            warning,
            seed,
            speed,
            max_segment,
        } => {
            let config = SceneConfig {
                max_segment_m: max_segment,
                speed_mps: speed,
                warning_distance_m: warning,
                hazard_count: hazards,
                seed,
            };
            run_generate(&input, &output, &config)?;
        }
        Commands::Validate { input, tick } => {
            run_validate(&input, tick)?;
        }
        Commands::Play {
            input,
            tick,
            rate,
            output,
        } => {
            let config = PlaybackConfig { tick_s: tick, rate };
            run_play(&input, &config, output.as_deref())?;
        }
    }

    Ok(())
}

fn run_generate(input: &Path, output: &Path, config: &SceneConfig) -> Result<()> {
    if !input.exists() {
        bail!("KML file not found: {}", input.display());
    }
    tracing::debug!(?config, input = %input.display(), "generating scene");
    let markup = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let generated = generate_from_markup(&markup, config)
        .with_context(|| format!("cannot build a route from {}", input.display()))?;
    let scene = &generated.scene;
    let dataset = scene.dataset();

    let report = validate_dataset(&dataset, DEFAULT_SWEEP_TICK_S)?;
    if !report.is_ok() {
        bail!(
            "generated scene failed validation: hazards never warned during playback {:?}, off-route hazards {:?}",
            report.unreachable_hazards,
            report.off_route_hazards
        );
    }

    save_scene(&dataset, output)?;

    println!(
        "Extracted {} waypoints ({:?}, {} malformed tokens skipped)",
        generated.waypoint_count, generated.encoding, generated.skipped_tokens
    );
    println!(
        "Route: {} points, {:.0} m, {:.1} s at {:.1} m/s",
        scene.route().len(),
        scene.total_length_m(),
        scene.total_duration_s(),
        scene.speed_mps(),
    );
    println!(
        "Hazards: {} placed (seed={}), warning at {:.0} m",
        scene.hazard_indices().len(),
        scene.seed(),
        scene.warning_distance_m(),
    );
    println!("Scene written to {}", output.display());
    Ok(())
}

fn run_validate(input: &Path, tick_s: f64) -> Result<()> {
    let dataset = load_scene(input)?;
    let report = validate_dataset(&dataset, tick_s)?;
    print_report(&report);
    if !report.is_ok() {
        bail!("{} failed validation", input.display());
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!(
        "Route: {} points, {:.0} m, {:.1} s",
        report.route_points, report.total_length_m, report.total_duration_s
    );
    println!(
        "Hazards: {} ({} never warned during playback, {} off route)",
        report.hazards,
        report.unreachable_hazards.len(),
        report.off_route_hazards.len()
    );
    match report.min_hazard_separation_m {
        Some(d) => println!("Closest hazard pair: {d:.1} m"),
        None => println!("Closest hazard pair: n/a"),
    }
    println!(
        "Warning active at {} of {} route points ({:.1}%)",
        report.warning_points,
        report.route_points,
        report.warning_fraction() * 100.0
    );
}

fn run_play(input: &Path, config: &PlaybackConfig, output: Option<&Path>) -> Result<()> {
    let dataset = load_scene(input)?;
    println!(
        "Playing {} ({} points, {} hazards, rate x{})...",
        input.display(),
        dataset.route.len(),
        dataset.hazards.len(),
        config.rate
    );

    let start = std::time::Instant::now();
    let mut playback = Playback::new(&dataset);
    let summary = playback.run_to_end(config)?;
    let elapsed = start.elapsed();

    for event in &summary.events {
        match event {
            WarningEvent::Raised {
                time,
                hazard,
                distance_m,
            } => println!("  t={time:>8.1}s  WARNING hazard #{hazard} ahead: {distance_m:.0} m"),
            WarningEvent::Cleared { time } => println!("  t={time:>8.1}s  clear"),
        }
    }
    println!(
        "Done: {} ticks, {:.1} s simulated, {} warnings, {:.1} s under warning, elapsed={:.2}s",
        summary.ticks,
        summary.sim_time_s,
        summary.warnings_raised,
        summary.warning_time_s,
        elapsed.as_secs_f64(),
    );

    if let Some(path) = output {
        save_json(&summary, path)?;
        println!("Summary saved to {}", path.display());
    }
    Ok(())
}
