//! Motion CLI - Command-line interface for Synheart Motion
//!
//! Commands:
//! - analyze: Analyze landmarks of one recording and print a motion report
//! - compare: Print the motion ratio of one landmark across several recordings
//! - weights: Print the resolved averaging weight vector

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use synheart_motion::encoder::MotionReportEncoder;
use synheart_motion::types::MotionReport;
use synheart_motion::{
    MotionAnalyzer, MotionCounter, MotionError, PipelineConfig, Recording, SmoothedMotionPipeline,
    WeightScheme, MOTION_VERSION,
};

/// Motion - On-device motion quantification for tracked landmarks
#[derive(Parser)]
#[command(name = "motion")]
#[command(author = "Synheart AI Inc")]
#[command(version = MOTION_VERSION)]
#[command(about = "Quantify landmark motion in pose recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct AnalysisArgs {
    /// Landmark indices to analyze (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    landmark: Vec<usize>,

    /// Displacement above which a transition counts as motion
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Smooth with a weighted moving average before counting
    #[arg(long)]
    smooth: bool,

    /// Averaging window size in frames
    #[arg(long)]
    window: Option<usize>,

    /// Weights: uniform, tiered, tiered:<levels>, or a comma separated list
    #[arg(long)]
    weights: Option<String>,

    /// Load pipeline configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze landmarks of one recording
    Analyze {
        /// Input recording path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output format (defaults to text on a terminal, json otherwise)
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Compare motion ratios across recordings
    Compare {
        /// Recording paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Print the resolved weight vector
    Weights {
        /// Averaging window size in frames
        #[arg(long, default_value = "50")]
        window: usize,

        /// Weights: uniform, tiered, tiered:<levels>, or a comma separated list
        #[arg(long, default_value = "tiered")]
        weights: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MotionCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            analysis,
            format,
        } => cmd_analyze(&input, &analysis, format),
        Commands::Compare { inputs, analysis } => cmd_compare(&inputs, &analysis),
        Commands::Weights { window, weights } => cmd_weights(window, &weights),
    }
}

fn cmd_analyze(
    input: &Path,
    args: &AnalysisArgs,
    format: Option<OutputFormat>,
) -> Result<(), MotionCliError> {
    let analyzer = build_analyzer(args)?;
    let recording = read_recording(input)?;

    let encoder = MotionReportEncoder::new();
    let report = encoder.encode(
        analyzer.as_ref(),
        &recording,
        &input.to_string_lossy(),
        &args.landmark,
    )?;

    let format = format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    });

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn cmd_compare(inputs: &[PathBuf], args: &AnalysisArgs) -> Result<(), MotionCliError> {
    let analyzer = build_analyzer(args)?;

    for input in inputs {
        let recording = read_recording(input)?;
        let results = analyzer.analyze_landmarks(&recording, &args.landmark)?;

        for result in results {
            println!(
                "{} landmark {} move: {:.2} %",
                input.display(),
                result.landmark,
                result.summary.motion_ratio
            );
        }
    }

    Ok(())
}

fn cmd_weights(window: usize, weights: &str) -> Result<(), MotionCliError> {
    let resolved = parse_weight_scheme(weights)?.resolve(window)?;
    println!("{}", serde_json::to_string(&resolved)?);
    Ok(())
}

// Helper functions

fn build_analyzer(args: &AnalysisArgs) -> Result<Box<dyn MotionAnalyzer>, MotionCliError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => {
            let threshold = args.threshold.ok_or(MotionCliError::MissingThreshold)?;
            PipelineConfig::with_threshold(threshold)
        }
    };

    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(window) = args.window {
        config.window_size = window;
    }
    if let Some(weights) = &args.weights {
        config.weights = parse_weight_scheme(weights)?;
    }

    if args.smooth {
        Ok(Box::new(SmoothedMotionPipeline::new(&config)?))
    } else {
        Ok(Box::new(MotionCounter::new(config.threshold)?))
    }
}

fn read_recording(input: &Path) -> Result<Recording, MotionCliError> {
    let data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    tracing::debug!(input = %input.display(), bytes = data.len(), "read recording");
    Ok(Recording::from_json(&data)?)
}

fn parse_weight_scheme(spec: &str) -> Result<WeightScheme, MotionCliError> {
    let spec = spec.trim();
    match spec {
        "uniform" => Ok(WeightScheme::Uniform),
        "tiered" => Ok(WeightScheme::default()),
        _ => {
            if let Some(levels) = spec.strip_prefix("tiered:") {
                Ok(WeightScheme::Tiered {
                    levels: parse_number_list(levels)?,
                })
            } else {
                Ok(WeightScheme::Explicit {
                    values: parse_number_list(spec)?,
                })
            }
        }
    }
}

fn parse_number_list(list: &str) -> Result<Vec<f64>, MotionCliError> {
    list.split(',')
        .map(|item| {
            item.trim()
                .parse::<f64>()
                .map_err(|_| MotionCliError::InvalidWeights(item.trim().to_string()))
        })
        .collect()
}

fn print_report(report: &MotionReport) {
    println!("Motion Report");
    println!("=============");
    println!("Source:     {}", report.provenance.source);
    println!("Frames:     {}", report.provenance.frame_count);
    println!("Landmarks:  {}", report.provenance.landmark_count);
    match report.parameters.window_size {
        Some(window) => println!(
            "Threshold:  {} (smoothed, window {})",
            report.parameters.threshold, window
        ),
        None => println!("Threshold:  {} (raw)", report.parameters.threshold),
    }

    println!("\nResults:");
    for entry in &report.landmarks {
        let summary = &entry.summary;
        println!(
            "  Landmark {}: {} of {} frames moving ({:.2}%), longest still run {} frames{}",
            entry.landmark,
            summary.motion_count,
            summary.frames_scanned,
            summary.motion_ratio,
            summary.longest_inactive_streak,
            if summary.inactivity_alarm { " [still at end]" } else { "" }
        );
    }
}

// Error types

#[derive(Debug)]
enum MotionCliError {
    Io(io::Error),
    Motion(MotionError),
    Json(serde_json::Error),
    MissingThreshold,
    InvalidWeights(String),
}

impl From<io::Error> for MotionCliError {
    fn from(e: io::Error) -> Self {
        MotionCliError::Io(e)
    }
}

impl From<MotionError> for MotionCliError {
    fn from(e: MotionError) -> Self {
        MotionCliError::Motion(e)
    }
}

impl From<serde_json::Error> for MotionCliError {
    fn from(e: serde_json::Error) -> Self {
        MotionCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MotionCliError> for CliError {
    fn from(e: MotionCliError) -> Self {
        match e {
            MotionCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MotionCliError::Motion(e) => {
                let (code, hint) = match &e {
                    MotionError::InvalidInput(_) => (
                        "INVALID_INPUT",
                        "Recordings are frames x landmarks x [x, y, z, ...] arrays",
                    ),
                    MotionError::InvalidWeights(_) => (
                        "INVALID_WEIGHTS",
                        "Provide one non-negative weight per window slot",
                    ),
                    MotionError::Configuration(_) => (
                        "CONFIGURATION_ERROR",
                        "Threshold and window size must be positive",
                    ),
                    MotionError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            MotionCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MotionCliError::MissingThreshold => CliError {
                code: "MISSING_THRESHOLD".to_string(),
                message: "No distance threshold given".to_string(),
                hint: Some("Pass --threshold or a --config file with a threshold".to_string()),
            },
            MotionCliError::InvalidWeights(item) => CliError {
                code: "INVALID_WEIGHTS".to_string(),
                message: format!("Cannot parse weight '{}'", item),
                hint: Some("Use uniform, tiered, tiered:1,5,25 or 1,2,3".to_string()),
            },
        }
    }
}
