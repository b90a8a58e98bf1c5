//! Report encoding
//!
//! This module wraps per-landmark motion summaries into a self-describing
//! JSON report with producer and provenance metadata.

use crate::error::MotionError;
use crate::pipeline::MotionAnalyzer;
use crate::recording::Recording;
use crate::types::{MotionReport, ReportProducer, ReportProvenance};
use crate::{MOTION_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report encoder for producing motion report payloads
pub struct MotionReportEncoder {
    instance_id: String,
}

impl Default for MotionReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Analyze the requested landmarks of `recording` and build a report
    pub fn encode(
        &self,
        analyzer: &dyn MotionAnalyzer,
        recording: &Recording,
        source: &str,
        landmarks: &[usize],
    ) -> Result<MotionReport, MotionError> {
        let results = analyzer.analyze_landmarks(recording, landmarks)?;

        Ok(MotionReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: MOTION_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                source: source.to_string(),
                frame_count: recording.frame_count(),
                landmark_count: recording.landmark_count(),
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            parameters: analyzer.parameters(),
            landmarks: results,
        })
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        analyzer: &dyn MotionAnalyzer,
        recording: &Recording,
        source: &str,
        landmarks: &[usize],
    ) -> Result<String, MotionError> {
        let report = self.encode(analyzer, recording, source, landmarks)?;
        serde_json::to_string_pretty(&report).map_err(MotionError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::counter::MotionCounter;
    use crate::pipeline::SmoothedMotionPipeline;

    fn sample_recording() -> Recording {
        Recording::from_json(
            r#"[
                [[0, 0, 0, 1], [5, 5, 5, 1]],
                [[0, 0, 0, 1], [5, 5, 5, 1]],
                [[10, 0, 0, 1], [5, 5, 5, 1]],
                [[10, 0, 0, 1], [5, 5, 5, 1]]
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_raw_report() {
        let encoder = MotionReportEncoder::with_instance_id("test-instance".to_string());
        let counter = MotionCounter::new(5.0).unwrap();

        let json = encoder
            .encode_to_json(&counter, &sample_recording(), "sleeping.json", &[0, 1])
            .unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["report_version"], REPORT_VERSION);
        assert_eq!(payload["producer"]["name"], "synheart-motion");
        assert_eq!(payload["producer"]["instance_id"], "test-instance");
        assert_eq!(payload["provenance"]["source"], "sleeping.json");
        assert_eq!(payload["provenance"]["frame_count"], 4);
        assert_eq!(payload["parameters"]["smoothed"], false);
        assert!(payload["parameters"].get("window_size").is_none());
        assert!(payload["parameters"].get("weights").is_none());

        assert_eq!(payload["landmarks"][0]["motion_count"], 1);
        assert_eq!(payload["landmarks"][0]["motion_ratio"], 25.0);
        assert_eq!(payload["landmarks"][1]["motion_count"], 0);
    }

    #[test]
    fn test_encode_smoothed_parameters() {
        let encoder = MotionReportEncoder::new();
        let pipeline = SmoothedMotionPipeline::new(&PipelineConfig::with_threshold(1.0)).unwrap();

        let report = encoder
            .encode(&pipeline, &sample_recording(), "-", &[0])
            .unwrap();

        assert!(report.parameters.smoothed);
        assert_eq!(report.parameters.window_size, Some(50));
        assert_eq!(
            report.parameters.weights.as_deref(),
            Some(pipeline.weights().as_slice())
        );
        assert_eq!(report.landmarks.len(), 1);
        assert!(!report.producer.instance_id.is_empty());
    }

    #[test]
    fn test_encode_propagates_landmark_errors() {
        let encoder = MotionReportEncoder::new();
        let counter = MotionCounter::new(5.0).unwrap();
        let result = encoder.encode(&counter, &sample_recording(), "-", &[7]);
        assert!(matches!(result, Err(MotionError::InvalidInput(_))));
    }
}
