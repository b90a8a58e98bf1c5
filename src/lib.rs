//! Synheart Motion - On-device motion quantification for tracked landmarks
//!
//! Motion turns per-frame 3D landmark positions into motion counts and ratios
//! through a deterministic pipeline: landmark track → weighted moving average
//! → displacement thresholding → motion summary.
//!
//! ## Modules
//!
//! - **Counter**: Count frame-to-frame transitions above a distance threshold
//! - **Averager**: Weighted moving average over a trailing window
//! - **Pipeline**: Raw and smoothed analysis over landmark recordings

pub mod averager;
pub mod config;
pub mod counter;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod recording;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use averager::{weighted_moving_average, WeightedWindowAverager, WindowWeights};
pub use config::{PipelineConfig, WeightScheme};
pub use counter::{count_motion, MotionCounter};
pub use error::MotionError;
pub use pipeline::{analyze, analyze_raw, MotionAnalyzer, SmoothedMotionPipeline};
pub use recording::Recording;
pub use types::{MotionSummary, Point3};

/// Motion version embedded in all reports
pub const MOTION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "synheart-motion";
