//! Motion counting
//!
//! Counts frame-to-frame transitions of a single landmark whose Euclidean
//! displacement strictly exceeds a distance threshold.
//!
//! Frame `i` is compared against frame `max(i - 1, 0)`, so the first frame is
//! compared against itself and can never count as motion. Counts therefore lie
//! in `[0, len - 1]`.

use crate::error::MotionError;
use crate::types::{MotionScan, Point3};

/// Threshold-based motion counter for one landmark sequence.
///
/// The counter holds configuration only. All running state lives inside a
/// single [`MotionCounter::scan`] call, so one counter can be shared across
/// independent sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCounter {
    threshold: f64,
}

impl MotionCounter {
    /// Create a counter with the given distance threshold.
    ///
    /// The threshold must be finite and strictly positive.
    pub fn new(threshold: f64) -> Result<Self, MotionError> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Count transitions whose displacement exceeds the threshold
    pub fn count_motion(&self, frames: &[Point3]) -> Result<usize, MotionError> {
        self.scan(frames).map(|scan| scan.motion_count)
    }

    /// Scan a sequence, counting motion and tracking inactivity streaks.
    ///
    /// A transition at or below the threshold extends the inactivity streak
    /// (the first frame's self-comparison included); motion resets it.
    pub fn scan(&self, frames: &[Point3]) -> Result<MotionScan, MotionError> {
        if frames.is_empty() {
            return Err(MotionError::InvalidInput(
                "frame sequence must contain at least one frame".to_string(),
            ));
        }

        let mut motion_count = 0;
        let mut inactive_streak = 0;
        let mut longest_inactive_streak = 0;

        for (i, current) in frames.iter().enumerate() {
            let previous = &frames[i.saturating_sub(1)];

            if current.distance_to(previous) > self.threshold {
                motion_count += 1;
                inactive_streak = 0;
            } else {
                inactive_streak += 1;
                longest_inactive_streak = longest_inactive_streak.max(inactive_streak);
            }
        }

        tracing::debug!(
            frames = frames.len(),
            threshold = self.threshold,
            motion_count,
            inactive_streak,
            "motion scan complete"
        );

        Ok(MotionScan {
            motion_count,
            frames_scanned: frames.len(),
            inactive_streak,
            longest_inactive_streak,
        })
    }
}

/// Count motion transitions in `frames` with an explicit threshold
pub fn count_motion(frames: &[Point3], threshold: f64) -> Result<usize, MotionError> {
    MotionCounter::new(threshold)?.count_motion(frames)
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<(), MotionError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(MotionError::Configuration(format!(
            "distance threshold must be a positive finite number, got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f64]) -> Vec<Point3> {
        xs.iter().map(|&x| Point3::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_step_sequence() {
        let frames = line(&[0.0, 0.0, 10.0, 10.0]);
        let scan = MotionCounter::new(5.0).unwrap().scan(&frames).unwrap();

        assert_eq!(scan.motion_count, 1);
        assert_eq!(scan.frames_scanned, 4);
        assert!((scan.motion_ratio() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let result = count_motion(&[], 5.0);
        assert!(matches!(result, Err(MotionError::InvalidInput(_))));
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        assert!(matches!(
            MotionCounter::new(0.0),
            Err(MotionError::Configuration(_))
        ));
        assert!(matches!(
            MotionCounter::new(-1.0),
            Err(MotionError::Configuration(_))
        ));
        assert!(matches!(
            MotionCounter::new(f64::NAN),
            Err(MotionError::Configuration(_))
        ));
    }

    #[test]
    fn test_identical_points_have_no_motion() {
        let frames = vec![Point3::new(1.5, -2.0, 3.0); 25];
        assert_eq!(count_motion(&frames, 0.1).unwrap(), 0);
    }

    #[test]
    fn test_single_frame_never_moves() {
        let frames = line(&[1000.0]);
        let scan = MotionCounter::new(1.0).unwrap().scan(&frames).unwrap();
        assert_eq!(scan.motion_count, 0);
        assert_eq!(scan.inactive_streak, 1);
    }

    #[test]
    fn test_equal_to_threshold_is_not_motion() {
        let frames = line(&[0.0, 5.0, 10.0]);
        assert_eq!(count_motion(&frames, 5.0).unwrap(), 0);
        assert_eq!(count_motion(&frames, 4.999).unwrap(), 2);
    }

    #[test]
    fn test_count_bounded_by_transitions() {
        // every transition moves far
        let frames = line(&[0.0, 100.0, 0.0, 100.0, 0.0]);
        let count = count_motion(&frames, 1.0).unwrap();
        assert_eq!(count, frames.len() - 1);
    }

    #[test]
    fn test_monotonic_in_threshold() {
        let frames = line(&[0.0, 1.0, 3.0, 6.0, 10.0, 15.0, 21.0]);
        let mut last = usize::MAX;
        for threshold in [0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5] {
            let count = count_motion(&frames, threshold).unwrap();
            assert!(count <= last);
            last = count;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_first_frame_is_self_compared() {
        // A far-away first frame contributes nothing by itself
        let frames = vec![Point3::new(50.0, 50.0, 50.0), Point3::new(50.0, 50.0, 50.0)];
        assert_eq!(count_motion(&frames, 1.0).unwrap(), 0);
    }

    #[test]
    fn test_inactive_streak_tracking() {
        let frames = line(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let scan = MotionCounter::new(5.0).unwrap().scan(&frames).unwrap();

        assert_eq!(scan.motion_count, 1);
        // f0..f2 inactive (3), motion at f3, f4..f7 inactive (4)
        assert_eq!(scan.inactive_streak, 4);
        assert_eq!(scan.longest_inactive_streak, 4);
    }

    #[test]
    fn test_scans_do_not_share_state() {
        let counter = MotionCounter::new(5.0).unwrap();
        let moving = line(&[0.0, 10.0, 20.0]);
        let still = line(&[0.0, 0.0, 0.0]);

        assert_eq!(counter.count_motion(&moving).unwrap(), 2);
        assert_eq!(counter.count_motion(&still).unwrap(), 0);
        assert_eq!(counter.count_motion(&moving).unwrap(), 2);
    }
}
