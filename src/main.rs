//! Motion Pattern CLI: replay recorded frames or a synthetic session through the
//! detector and print every nod or shake it reports.
//!
//! Usage:
//!   motion_pattern detect <DIR>   Replay image files from a directory, in name order
//!   motion_pattern demo           Run a scripted nod/shake session on synthetic frames
//!   motion_pattern config         Print the default configuration as JSON

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use motion_pattern::core_modules::frame_source;
use motion_pattern::{DetectorWorker, MotionConfig, PatternType, logging, synthetic};

#[derive(Parser)]
#[command(
    name = "motion_pattern",
    about = "Detect nods and shakes in a stream of video frames",
    version
)]
struct Cli {
    /// JSON configuration file; defaults are used for anything it omits
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit structured JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay image files from a directory
    Detect {
        /// Directory of frames (png, jpg, bmp, pgm)
        frames: PathBuf,
    },

    /// Run a scripted session on synthetic frames
    Demo {
        /// Frame width after downsampling
        #[arg(long, default_value = "96")]
        width: usize,

        /// Frame height after downsampling
        #[arg(long, default_value = "72")]
        height: usize,

        /// Pixels moved per frame during a gesture
        #[arg(long, default_value = "3")]
        step: isize,

        /// Still frames between gestures
        #[arg(long, default_value = "20")]
        pause: usize,
    },

    /// Print the configuration as JSON
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MotionConfig::load_from(path)?,
        None => MotionConfig::default(),
    };
    if cli.json_logs {
        config.logging.json = true;
    }
    if cli.verbose {
        config.logging.level = "motion_pattern=debug,info".to_string();
    }
    logging::init_logging(&config.logging);

    match cli.command {
        Commands::Detect { frames } => detect(&config, frames).await,
        Commands::Demo {
            width,
            height,
            step,
            pause,
        } => demo(&config, width, height, step, pause).await,
        Commands::Config { output } => {
            match output {
                Some(path) => {
                    config.save_to(&path)?;
                    println!("Configuration written to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
            Ok(())
        }
    }
}

async fn detect(config: &MotionConfig, dir: PathBuf) -> anyhow::Result<()> {
    let paths = frame_source::list_frames(&dir)?;
    println!("Replaying {} frames from {}", paths.len(), dir.display());

    let (worker, mut events) = DetectorWorker::spawn(config)?;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("frame {:>6}: {}", event.frame_index, event.pattern);
        }
    });

    for path in paths {
        match frame_source::load_frame(&path, config.capture.downsample) {
            Ok(frame) => worker.submit(frame).await?,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable frame");
                worker.capture_gap().await?;
            }
        }
    }

    let summary = worker.shutdown().await?;
    printer.await?;
    println!(
        "Done: {} frames, {} estimated, {} dropped pairs, {} patterns",
        summary.frames_received,
        summary.frames_estimated,
        summary.pairs_dropped,
        summary.patterns_detected
    );
    Ok(())
}

async fn demo(
    config: &MotionConfig,
    width: usize,
    height: usize,
    step: isize,
    pause: usize,
) -> anyhow::Result<()> {
    let script = [PatternType::Nod, PatternType::Shake, PatternType::Up, PatternType::Nod];
    let frames_per_leg = (config.classifier.threshold / step.max(1) as f64).ceil() as usize + 1;
    let frames = synthetic::session(width, height, &script, step, frames_per_leg, pause)?;
    println!(
        "Scripted session: {} ({} frames of {}x{})",
        script.map(|p| p.to_string()).join(", "),
        frames.len(),
        width,
        height
    );

    let (worker, mut events) = DetectorWorker::spawn(config)?;
    for frame in frames {
        worker.submit(frame).await?;
    }
    let summary = worker.shutdown().await?;

    while let Some(event) = events.recv().await {
        println!("frame {:>4}: {}", event.frame_index, event.pattern);
    }
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
