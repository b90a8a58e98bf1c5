//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Motion. It wires the
//! stages together: landmark track → (optional) weighted moving average →
//! motion counting → motion summary.

use crate::averager::{WeightedWindowAverager, WindowWeights};
use crate::config::PipelineConfig;
use crate::counter::MotionCounter;
use crate::error::MotionError;
use crate::recording::Recording;
use crate::types::{LandmarkMotion, MotionSummary, Point3, ReportParameters};

/// Common interface for raw and smoothed motion analysis
pub trait MotionAnalyzer {
    /// Analyze a single landmark sequence
    fn analyze(&self, frames: &[Point3]) -> Result<MotionSummary, MotionError>;

    /// Parameters reported alongside results
    fn parameters(&self) -> ReportParameters;

    /// Analyze each requested landmark of a recording independently
    fn analyze_landmarks(
        &self,
        recording: &Recording,
        landmarks: &[usize],
    ) -> Result<Vec<LandmarkMotion>, MotionError> {
        landmarks
            .iter()
            .map(|&landmark| {
                let track = recording.landmark_track(landmark)?;
                let summary = self.analyze(&track)?;
                Ok(LandmarkMotion { landmark, summary })
            })
            .collect()
    }
}

impl MotionAnalyzer for MotionCounter {
    fn analyze(&self, frames: &[Point3]) -> Result<MotionSummary, MotionError> {
        self.scan(frames).map(MotionSummary::from)
    }

    fn parameters(&self) -> ReportParameters {
        ReportParameters {
            threshold: self.threshold(),
            smoothed: false,
            window_size: None,
            weights: None,
        }
    }
}

/// Smoothing followed by motion counting.
///
/// The pipeline holds configuration only. Every [`analyze`](Self::analyze)
/// call starts from a fresh zero-filled window, so one pipeline can be reused
/// across independent sequences.
#[derive(Debug, Clone)]
pub struct SmoothedMotionPipeline {
    counter: MotionCounter,
    weights: WindowWeights,
}

impl SmoothedMotionPipeline {
    /// Build a pipeline from validated configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, MotionError> {
        let weights = config.validate()?;
        Self::with_weights(config.threshold, weights)
    }

    /// Build a pipeline whose window size matches `weights`
    pub fn with_weights(threshold: f64, weights: WindowWeights) -> Result<Self, MotionError> {
        Ok(Self {
            counter: MotionCounter::new(threshold)?,
            weights,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.counter.threshold()
    }

    pub fn window_size(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &WindowWeights {
        &self.weights
    }

    /// Weighted moving average of `frames`, one output point per frame
    pub fn smooth(&self, frames: &[Point3]) -> Result<Vec<Point3>, MotionError> {
        let mut averager = WeightedWindowAverager::new(self.window_size())?;
        averager.smooth(frames, &self.weights)
    }
}

impl MotionAnalyzer for SmoothedMotionPipeline {
    fn analyze(&self, frames: &[Point3]) -> Result<MotionSummary, MotionError> {
        if frames.is_empty() {
            return Err(MotionError::InvalidInput(
                "frame sequence must contain at least one frame".to_string(),
            ));
        }

        tracing::debug!(
            frames = frames.len(),
            window = self.window_size(),
            threshold = self.threshold(),
            "running smoothed motion analysis"
        );

        let smoothed = self.smooth(frames)?;
        self.counter.scan(&smoothed).map(MotionSummary::from)
    }

    fn parameters(&self) -> ReportParameters {
        ReportParameters {
            threshold: self.threshold(),
            smoothed: true,
            window_size: Some(self.window_size()),
            weights: Some(self.weights.as_slice().to_vec()),
        }
    }
}

/// Smooth `frames` with `weights`, then count motion above `threshold`.
///
/// # Example
/// ```ignore
/// let weights = WindowWeights::recency_tiers(50)?;
/// let summary = analyze(&track, 1.0, &weights)?;
/// println!("moving {:.1}% of frames", summary.motion_ratio);
/// ```
pub fn analyze(
    frames: &[Point3],
    threshold: f64,
    weights: &WindowWeights,
) -> Result<MotionSummary, MotionError> {
    SmoothedMotionPipeline::with_weights(threshold, weights.clone())?.analyze(frames)
}

/// Count motion on the raw sequence, without smoothing
pub fn analyze_raw(frames: &[Point3], threshold: f64) -> Result<MotionSummary, MotionError> {
    MotionCounter::new(threshold)?.analyze(frames)
}
