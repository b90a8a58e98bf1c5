//! Core types for the Synheart Motion pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: landmark points, counter scans, per-landmark summaries, and the
//! encoded report.

use serde::{Deserialize, Serialize};

/// Consecutive inactive transitions after which the inactivity streak is flagged.
///
/// The flag is reported only; no action is attached to it.
pub const INACTIVITY_ALARM_FRAMES: usize = 30;

/// A single 3D landmark position. Units are whatever the capture source uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin, used to pre-fill averaging windows
    pub const ZERO: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// Result of one full-sequence pass of the motion counter.
///
/// Every field is produced fresh by a single scan; nothing carries over
/// between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionScan {
    /// Transitions whose distance strictly exceeded the threshold
    pub motion_count: usize,
    /// Number of frames compared (including the first frame's self-comparison)
    pub frames_scanned: usize,
    /// Consecutive inactive transitions at the end of the sequence
    pub inactive_streak: usize,
    /// Longest run of consecutive inactive transitions seen during the scan
    pub longest_inactive_streak: usize,
}

impl MotionScan {
    /// Motion count as a percentage of frames scanned
    pub fn motion_ratio(&self) -> f64 {
        if self.frames_scanned == 0 {
            return 0.0;
        }
        self.motion_count as f64 / self.frames_scanned as f64 * 100.0
    }

    /// Whether the trailing inactivity streak ran past [`INACTIVITY_ALARM_FRAMES`]
    pub fn exceeds_alarm_window(&self) -> bool {
        self.inactive_streak > INACTIVITY_ALARM_FRAMES
    }
}

/// Motion summary for one landmark sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSummary {
    pub motion_count: usize,
    pub frames_scanned: usize,
    /// Motion count / frames scanned, as a percentage (0-100)
    pub motion_ratio: f64,
    pub inactive_streak: usize,
    pub longest_inactive_streak: usize,
    pub inactivity_alarm: bool,
}

impl From<MotionScan> for MotionSummary {
    fn from(scan: MotionScan) -> Self {
        Self {
            motion_count: scan.motion_count,
            frames_scanned: scan.frames_scanned,
            motion_ratio: scan.motion_ratio(),
            inactive_streak: scan.inactive_streak,
            longest_inactive_streak: scan.longest_inactive_streak,
            inactivity_alarm: scan.exceeds_alarm_window(),
        }
    }
}

/// Motion summary tagged with the landmark it was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkMotion {
    pub landmark: usize,
    #[serde(flatten)]
    pub summary: MotionSummary,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report provenance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProvenance {
    /// Recording label (usually the input file name)
    pub source: String,
    pub frame_count: usize,
    pub landmark_count: usize,
    pub computed_at_utc: String,
}

/// Parameters the analysis ran with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportParameters {
    pub threshold: f64,
    pub smoothed: bool,
    /// Averaging window size, present only for smoothed runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<usize>,
    /// Resolved averaging weights, oldest slot first; smoothed runs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

/// Complete motion report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub parameters: ReportParameters,
    pub landmarks: Vec<LandmarkMotion>,
}
