//! Weighted moving average over a trailing window of landmark positions
//!
//! The window always holds exactly `capacity` points. It starts filled with
//! the origin, so the first `capacity - 1` averages are biased toward zero
//! (warm-up bias). Pushing a point evicts the oldest slot.
//!
//! Weights align positionally with the window: the first weight applies to the
//! oldest slot, the last weight to the newest.

use crate::error::MotionError;
use crate::types::Point3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default trailing window size in frames
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Default recency tiers, oldest block first
pub const DEFAULT_TIER_LEVELS: [f64; 5] = [1.0, 5.0, 25.0, 50.0, 100.0];

/// A validated weight vector: every weight finite and non-negative, positive sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct WindowWeights {
    values: Vec<f64>,
    sum: f64,
}

impl WindowWeights {
    pub fn new(values: Vec<f64>) -> Result<Self, MotionError> {
        let sum = validate_weights(&values)?;
        Ok(Self { values, sum })
    }

    /// Equal weight on every slot (plain arithmetic mean)
    pub fn uniform(len: usize) -> Result<Self, MotionError> {
        Self::new(vec![1.0; len])
    }

    /// Spread `levels` across `len` slots in equal consecutive blocks.
    ///
    /// Slot `j` takes `levels[ceil((j + 1) * levels.len() / len) - 1]`, so the
    /// newest slot always gets the last level. With 50 slots and the default
    /// levels this gives slots 0-9 weight 1, 10-19 weight 5, and so on up to
    /// weight 100 on the newest ten slots. Windows shorter than `levels` skip
    /// the older levels.
    pub fn tiered(len: usize, levels: &[f64]) -> Result<Self, MotionError> {
        if levels.is_empty() {
            return Err(MotionError::InvalidWeights(
                "tier levels must not be empty".to_string(),
            ));
        }
        let values = (0..len)
            .map(|j| levels[((j + 1) * levels.len()).div_ceil(len) - 1])
            .collect();
        Self::new(values)
    }

    /// Default recency tiers for a window of `len` slots
    pub fn recency_tiers(len: usize) -> Result<Self, MotionError> {
        Self::tiered(len, &DEFAULT_TIER_LEVELS)
    }

    /// All weight on the newest slot
    pub fn newest_only(len: usize) -> Result<Self, MotionError> {
        let mut values = vec![0.0; len];
        if let Some(last) = values.last_mut() {
            *last = 1.0;
        }
        Self::new(values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }
}

impl TryFrom<Vec<f64>> for WindowWeights {
    type Error = MotionError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<WindowWeights> for Vec<f64> {
    fn from(weights: WindowWeights) -> Self {
        weights.values
    }
}

/// Fixed-capacity trailing window with weighted averaging.
///
/// The window is owned and mutated only by this averager.
#[derive(Debug, Clone)]
pub struct WeightedWindowAverager {
    window: VecDeque<Point3>,
    capacity: usize,
}

impl WeightedWindowAverager {
    /// Create an averager with a zero-filled window of `capacity` slots
    pub fn new(capacity: usize) -> Result<Self, MotionError> {
        if capacity == 0 {
            return Err(MotionError::Configuration(
                "window capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window: VecDeque::from(vec![Point3::ZERO; capacity]),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window contents, oldest first
    pub fn window(&self) -> impl ExactSizeIterator<Item = &Point3> + '_ {
        self.window.iter()
    }

    /// Evict the oldest slot and append `point` as the newest
    pub fn push(&mut self, point: Point3) {
        self.window.pop_front();
        self.window.push_back(point);
    }

    /// Per-axis weighted mean of the window.
    ///
    /// `weights` must have exactly `capacity` entries, each finite and
    /// non-negative, with a positive sum.
    pub fn current_average(&self, weights: &[f64]) -> Result<Point3, MotionError> {
        self.check_len(weights.len())?;
        let sum = validate_weights(weights)?;
        Ok(self.weighted_mean(weights, sum))
    }

    /// Per-axis weighted mean using pre-validated weights
    pub fn current_weighted_average(&self, weights: &WindowWeights) -> Result<Point3, MotionError> {
        self.check_len(weights.len())?;
        Ok(self.weighted_mean(weights.as_slice(), weights.sum()))
    }

    /// Push each frame and collect the average after every push.
    ///
    /// The output has one point per input frame. Weights are checked before
    /// any frame is pushed.
    pub fn smooth(
        &mut self,
        frames: &[Point3],
        weights: &WindowWeights,
    ) -> Result<Vec<Point3>, MotionError> {
        self.check_len(weights.len())?;

        let warm_up = frames.len().min(self.capacity.saturating_sub(1));
        if warm_up > 0 {
            tracing::trace!(
                warm_up,
                capacity = self.capacity,
                "leading averages include zero-filled slots"
            );
        }

        let smoothed = frames
            .iter()
            .map(|&frame| {
                self.push(frame);
                self.weighted_mean(weights.as_slice(), weights.sum())
            })
            .collect();

        Ok(smoothed)
    }

    fn check_len(&self, len: usize) -> Result<(), MotionError> {
        if len != self.capacity {
            return Err(MotionError::InvalidWeights(format!(
                "expected {} weights for the window, got {}",
                self.capacity, len
            )));
        }
        Ok(())
    }

    fn weighted_mean(&self, weights: &[f64], sum: f64) -> Point3 {
        let (x, y, z) = self.window.iter().zip(weights).fold(
            (0.0, 0.0, 0.0),
            |(x, y, z), (point, &w)| (x + point.x * w, y + point.y * w, z + point.z * w),
        );
        Point3::new(x / sum, y / sum, z / sum)
    }
}

/// Weighted moving average of `frames` using a fresh window sized to `weights`
pub fn weighted_moving_average(
    frames: &[Point3],
    weights: &WindowWeights,
) -> Result<Vec<Point3>, MotionError> {
    let mut averager = WeightedWindowAverager::new(weights.len())?;
    averager.smooth(frames, weights)
}

/// Check every weight is finite and non-negative and return the positive sum
fn validate_weights(weights: &[f64]) -> Result<f64, MotionError> {
    if let Some((index, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(MotionError::InvalidWeights(format!(
            "weight {index} must be finite and non-negative, got {w}"
        )));
    }

    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(MotionError::InvalidWeights(
            "weights must have a positive sum".to_string(),
        ));
    }
    if !sum.is_finite() {
        return Err(MotionError::InvalidWeights(
            "weight sum overflows".to_string(),
        ));
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn px(x: f64) -> Point3 {
        Point3::new(x, 0.0, 0.0)
    }

    fn assert_close(a: Point3, b: Point3) {
        assert!(
            a.distance_to(&b) < 1e-9,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_uniform_average_scenario() {
        let mut averager = WeightedWindowAverager::new(3).unwrap();
        let weights = [1.0, 1.0, 1.0];

        averager.push(px(0.0));
        averager.push(px(3.0));
        averager.push(px(6.0));
        assert_close(averager.current_average(&weights).unwrap(), px(3.0));

        averager.push(px(9.0));
        let window: Vec<Point3> = averager.window().copied().collect();
        assert_eq!(window, vec![px(3.0), px(6.0), px(9.0)]);
        assert_close(averager.current_average(&weights).unwrap(), px(6.0));
    }

    #[test]
    fn test_window_fifo_order() {
        let mut averager = WeightedWindowAverager::new(4).unwrap();
        let points: Vec<Point3> = (1..=5).map(|i| Point3::new(i as f64, -(i as f64), 0.5)).collect();

        for p in &points[..4] {
            averager.push(*p);
        }
        let window: Vec<Point3> = averager.window().copied().collect();
        assert_eq!(window, points[..4].to_vec());

        averager.push(points[4]);
        let window: Vec<Point3> = averager.window().copied().collect();
        assert_eq!(window, points[1..].to_vec());
    }

    #[test]
    fn test_window_starts_zero_filled() {
        let averager = WeightedWindowAverager::new(5).unwrap();
        assert_eq!(averager.window().len(), 5);
        assert!(averager.window().all(|p| *p == Point3::ZERO));
    }

    #[test]
    fn test_uniform_weights_equal_arithmetic_mean() {
        let mut averager = WeightedWindowAverager::new(3).unwrap();
        averager.push(Point3::new(1.0, 2.0, 3.0));
        averager.push(Point3::new(4.0, 8.0, -3.0));
        averager.push(Point3::new(7.0, 2.0, 6.0));

        let weights = WindowWeights::uniform(3).unwrap();
        let avg = averager.current_weighted_average(&weights).unwrap();
        assert_close(avg, Point3::new(4.0, 4.0, 2.0));
    }

    #[test]
    fn test_newest_only_weights_return_latest_point() {
        let mut averager = WeightedWindowAverager::new(4).unwrap();
        averager.push(Point3::new(1.0, 1.0, 1.0));
        averager.push(Point3::new(-2.5, 7.0, 3.25));

        let weights = WindowWeights::newest_only(4).unwrap();
        let avg = averager.current_weighted_average(&weights).unwrap();
        assert_eq!(avg, Point3::new(-2.5, 7.0, 3.25));
    }

    #[test]
    fn test_average_is_idempotent() {
        let mut averager = WeightedWindowAverager::new(3).unwrap();
        averager.push(Point3::new(1.0, 2.0, 3.0));
        let weights = [1.0, 2.0, 3.0];

        let first = averager.current_average(&weights).unwrap();
        let second = averager.current_average(&weights).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_warm_up_bias_toward_origin() {
        let mut averager = WeightedWindowAverager::new(4).unwrap();
        averager.push(px(8.0));
        let avg = averager.current_average(&[1.0; 4]).unwrap();
        // three zero slots still in the window
        assert_close(avg, px(2.0));
    }

    #[test]
    fn test_weight_length_mismatch() {
        let averager = WeightedWindowAverager::new(3).unwrap();
        let result = averager.current_average(&[1.0, 1.0]);
        assert!(matches!(result, Err(MotionError::InvalidWeights(_))));
    }

    #[test]
    fn test_invalid_weight_values() {
        let averager = WeightedWindowAverager::new(3).unwrap();
        assert!(matches!(
            averager.current_average(&[0.0, 0.0, 0.0]),
            Err(MotionError::InvalidWeights(_))
        ));
        assert!(matches!(
            averager.current_average(&[1.0, -1.0, 1.0]),
            Err(MotionError::InvalidWeights(_))
        ));
        assert!(matches!(
            averager.current_average(&[1.0, f64::NAN, 1.0]),
            Err(MotionError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_overflowing_weight_sum_rejected() {
        let result = WindowWeights::new(vec![f64::MAX, f64::MAX]);
        assert!(matches!(result, Err(MotionError::InvalidWeights(_))));

        let averager = WeightedWindowAverager::new(2).unwrap();
        assert!(matches!(
            averager.current_average(&[f64::MAX, f64::MAX]),
            Err(MotionError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            WeightedWindowAverager::new(0),
            Err(MotionError::Configuration(_))
        ));
    }

    #[test]
    fn test_recency_tiers_for_default_window() {
        let weights = WindowWeights::recency_tiers(DEFAULT_WINDOW_SIZE).unwrap();
        let values = weights.as_slice();

        assert_eq!(values.len(), 50);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[9], 1.0);
        assert_eq!(values[10], 5.0);
        assert_eq!(values[29], 25.0);
        assert_eq!(values[30], 50.0);
        assert_eq!(values[49], 100.0);
        assert_eq!(weights.sum(), 10.0 * (1.0 + 5.0 + 25.0 + 50.0 + 100.0));
    }

    #[test]
    fn test_short_window_keeps_top_tier_on_newest_slot() {
        let weights = WindowWeights::recency_tiers(3).unwrap();
        assert_eq!(weights.as_slice(), &[5.0, 50.0, 100.0]);

        let single = WindowWeights::recency_tiers(1).unwrap();
        assert_eq!(single.as_slice(), &[100.0]);

        let exact = WindowWeights::recency_tiers(5).unwrap();
        assert_eq!(exact.as_slice(), &DEFAULT_TIER_LEVELS);
    }

    #[test]
    fn test_smooth_emits_one_point_per_frame() {
        let frames: Vec<Point3> = [0.0, 3.0, 6.0, 9.0].iter().map(|&x| px(x)).collect();
        let weights = WindowWeights::uniform(3).unwrap();

        let smoothed = weighted_moving_average(&frames, &weights).unwrap();
        assert_eq!(smoothed.len(), frames.len());
        assert_close(smoothed[0], px(0.0));
        assert_close(smoothed[1], px(1.0));
        assert_close(smoothed[2], px(3.0));
        assert_close(smoothed[3], px(6.0));
    }

    #[test]
    fn test_smooth_rejects_mismatched_weights_before_pushing() {
        let mut averager = WeightedWindowAverager::new(3).unwrap();
        let weights = WindowWeights::uniform(4).unwrap();

        let result = averager.smooth(&[px(1.0)], &weights);
        assert!(matches!(result, Err(MotionError::InvalidWeights(_))));
        assert!(averager.window().all(|p| *p == Point3::ZERO));
    }

    #[test]
    fn test_weights_deserialize_with_validation() {
        let weights: WindowWeights = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(weights.sum(), 6.0);

        let invalid = serde_json::from_str::<WindowWeights>("[0.0, 0.0]");
        assert!(invalid.is_err());
    }
}
