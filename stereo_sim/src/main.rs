//! Stereo Agent CLI
//!
//! Runs the color pass and then the depth pass of the stereo demo against
//! the procedural simulator, optionally showing each composite frame.

use clap::Parser;
use stereo_core::StereoError;
use stereo_env::{Action, DisplaySink, Resolution};
use stereo_sim::{run_stereo_demo, DemoConfig, DemoReport, ProceduralBackend, ProceduralConfig};
use tracing::{error, info, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Stereo sensor rig demo
#[derive(Parser, Debug)]
#[command(name = "stereo-agent")]
#[command(about = "Drive a stereo camera rig through a simulated scene", long_about = None)]
struct Args {
    /// Show composite frames in a window (press 'q' to end a pass).
    /// Needs a build with the 'highgui' (OpenCV window) or 'visualization'
    /// (Rerun viewer) feature; the default build only runs headless.
    #[arg(long)]
    display: bool,

    /// Scene to load (rotunda, atrium)
    #[arg(long, default_value = "rotunda")]
    scene: String,

    /// Steps per pass
    #[arg(long, default_value = "100")]
    steps: u64,

    /// Per-sensor resolution, "512" or "640x480"
    #[arg(short, long, default_value = "512", value_parser = parse_resolution)]
    resolution: Resolution,

    /// Distance between the two sensors in meters
    #[arg(long, default_value = "0.5")]
    separation: f64,

    /// Action repeated every step (turn_right, turn_left, move_forward)
    #[arg(short, long, default_value = "turn_right")]
    action: Action,

    /// Seed for simulated depth noise
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Depth noise standard deviation in meters (0 = none)
    #[arg(long, default_value = "0.0")]
    depth_noise: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the run report as JSON on stdout (logs go to stderr)
    #[arg(long)]
    json: bool,
}

fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid resolution '{}': {}", s, e))
    };
    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok(Resolution::new(parse(w)?, parse(h)?)),
        None => Ok(Resolution::square(parse(s)?)),
    }
}

/// Picks the display backend compiled into this binary.
fn make_sink(display: bool) -> Result<Option<Box<dyn DisplaySink>>, StereoError> {
    if !display {
        return Ok(None);
    }

    #[cfg(feature = "highgui")]
    {
        Ok(Some(Box::new(stereo_sim::highgui::HighGuiSink::new())))
    }

    #[cfg(all(feature = "visualization", not(feature = "highgui")))]
    {
        let sink = stereo_core::visualization::RerunSink::new("stereo_agent")?;
        Ok(Some(Box::new(sink)))
    }

    #[cfg(not(any(feature = "highgui", feature = "visualization")))]
    {
        Err(StereoError::config(
            "--display needs a build with the 'highgui' or 'visualization' feature",
        ))
    }
}

/// Log filter: `RUST_LOG` when set, otherwise INFO (DEBUG with `--verbose`).
fn log_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
}

/// Formatting subscriber writing to `writer`, keeping stdout free for the report.
fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

fn report_json(report: &DemoReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn run(args: &Args) -> Result<DemoReport, StereoError> {
    let backend = ProceduralBackend::new(ProceduralConfig {
        seed: args.seed,
        depth_noise_std: args.depth_noise,
        ..Default::default()
    });

    let config = DemoConfig {
        scene_id: args.scene.clone(),
        resolution: args.resolution,
        separation: args.separation,
        step_limit: args.steps,
        action: args.action,
        ..Default::default()
    };

    let mut sink = make_sink(args.display)?;
    run_stereo_demo(
        &backend,
        &config,
        sink.as_mut().map(|s| &mut **s as &mut dyn DisplaySink),
    )
}

fn main() {
    let args = Args::parse();

    // Initialize logging (RUST_LOG overrides --verbose)
    let subscriber = log_subscriber(log_filter(args.verbose), std::io::stderr);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Stereo Agent v0.1.0");
        info!(
            "scene={} resolution={} steps={} display={}",
            args.scene, args.resolution, args.steps, args.display
        );
    }

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            error!("✗ Stereo demo failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match report_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for pass in &report.passes {
        info!(
            "✓ {} pass: {} frames ({:?}), session {}",
            pass.modality, pass.frames_composed, pass.stop_reason, pass.session
        );
    }
    info!("Done: {} frames across {} passes", report.total_frames(), report.passes.len());
}
