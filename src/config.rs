//! Pipeline configuration
//!
//! Configuration is plain JSON. The distance threshold has no default: raw
//! and smoothed sequences move at very different scales, so callers must
//! always pick one.

use crate::averager::{WindowWeights, DEFAULT_TIER_LEVELS, DEFAULT_WINDOW_SIZE};
use crate::counter::validate_threshold;
use crate::error::MotionError;
use serde::{Deserialize, Serialize};

/// How the averaging weight vector is built for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum WeightScheme {
    /// Equal weight on every slot
    Uniform,
    /// Levels spread in equal consecutive blocks, oldest block first
    Tiered { levels: Vec<f64> },
    /// One weight per slot, oldest first
    Explicit { values: Vec<f64> },
}

impl Default for WeightScheme {
    fn default() -> Self {
        WeightScheme::Tiered {
            levels: DEFAULT_TIER_LEVELS.to_vec(),
        }
    }
}

impl WeightScheme {
    /// Resolve the scheme into a weight vector for a window of `window_size` slots
    pub fn resolve(&self, window_size: usize) -> Result<WindowWeights, MotionError> {
        match self {
            WeightScheme::Uniform => WindowWeights::uniform(window_size),
            WeightScheme::Tiered { levels } => WindowWeights::tiered(window_size, levels),
            WeightScheme::Explicit { values } => {
                if values.len() != window_size {
                    return Err(MotionError::InvalidWeights(format!(
                        "expected {window_size} weights for the window, got {}",
                        values.len()
                    )));
                }
                WindowWeights::new(values.clone())
            }
        }
    }
}

/// Configuration for the smoothed motion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Displacement above which a transition counts as motion
    pub threshold: f64,
    /// Trailing window size in frames
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub weights: WeightScheme,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl PipelineConfig {
    /// Config with the default window and recency tiers
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            window_size: DEFAULT_WINDOW_SIZE,
            weights: WeightScheme::default(),
        }
    }

    /// Check threshold and window size, then resolve the weight vector
    pub fn validate(&self) -> Result<WindowWeights, MotionError> {
        validate_threshold(self.threshold)?;
        if self.window_size == 0 {
            return Err(MotionError::Configuration(
                "window size must be at least 1".to_string(),
            ));
        }
        self.weights.resolve(self.window_size)
    }

    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, MotionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, MotionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
