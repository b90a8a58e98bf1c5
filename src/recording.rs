//! Landmark recordings
//!
//! A recording is a `frames × landmarks × coordinates` array as produced by a
//! pose tracker. Each landmark carries at least `x, y, z`; any extra channels
//! (confidence, visibility) are ignored when slicing tracks.

use crate::error::MotionError;
use crate::types::Point3;
use serde::{Deserialize, Serialize};

/// Validated multi-landmark recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<f64>>>", into = "Vec<Vec<Vec<f64>>>")]
pub struct Recording {
    frames: Vec<Vec<Vec<f64>>>,
    landmark_count: usize,
}

impl Recording {
    /// Build a recording from raw nested frames.
    ///
    /// Requires at least one frame, the same number of landmarks in every
    /// frame, at least three finite coordinates per landmark.
    pub fn new(frames: Vec<Vec<Vec<f64>>>) -> Result<Self, MotionError> {
        let landmark_count = match frames.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => {
                return Err(MotionError::InvalidInput(
                    "frames must contain at least one landmark".to_string(),
                ))
            }
            None => {
                return Err(MotionError::InvalidInput(
                    "recording must contain at least one frame".to_string(),
                ))
            }
        };

        for (frame_index, frame) in frames.iter().enumerate() {
            if frame.len() != landmark_count {
                return Err(MotionError::InvalidInput(format!(
                    "frame {frame_index} has {} landmarks, expected {landmark_count}",
                    frame.len()
                )));
            }
            for (landmark, coords) in frame.iter().enumerate() {
                if coords.len() < 3 {
                    return Err(MotionError::InvalidInput(format!(
                        "frame {frame_index} landmark {landmark} has {} coordinates, need at least 3",
                        coords.len()
                    )));
                }
                if coords[..3].iter().any(|c| !c.is_finite()) {
                    return Err(MotionError::InvalidInput(format!(
                        "frame {frame_index} landmark {landmark} has a non-finite coordinate"
                    )));
                }
            }
        }

        Ok(Self {
            frames,
            landmark_count,
        })
    }

    /// Parse a recording from a JSON nested array
    pub fn from_json(json: &str) -> Result<Self, MotionError> {
        let frames: Vec<Vec<Vec<f64>>> = serde_json::from_str(json)?;
        Self::new(frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn landmark_count(&self) -> usize {
        self.landmark_count
    }

    /// One landmark's `(x, y, z)` per frame, in frame order
    pub fn landmark_track(&self, landmark: usize) -> Result<Vec<Point3>, MotionError> {
        if landmark >= self.landmark_count {
            return Err(MotionError::InvalidInput(format!(
                "landmark {landmark} out of range, recording has {} landmarks",
                self.landmark_count
            )));
        }

        Ok(self
            .frames
            .iter()
            .map(|frame| {
                let coords = &frame[landmark];
                Point3::new(coords[0], coords[1], coords[2])
            })
            .collect())
    }
}

impl TryFrom<Vec<Vec<Vec<f64>>>> for Recording {
    type Error = MotionError;

    fn try_from(frames: Vec<Vec<Vec<f64>>>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl From<Recording> for Vec<Vec<Vec<f64>>> {
    fn from(recording: Recording) -> Self {
        recording.frames
    }
}
