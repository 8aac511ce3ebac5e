//! Data contracts shared by the parser, the MCP façade and the CLI.
//!
//! Everything here is plain serde data. Field names follow the camelCase
//! shape consumed by API explorer front ends.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse phase of a parse run, reported with every progress event.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    Initialization,
    Parsing,
    Assembling,
    Complete,
}

impl ProgressStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Parsing => "parsing",
            Self::Assembling => "assembling",
            Self::Complete => "complete",
        }
    }
}

/// Progress notification emitted by the stream orchestrator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ProgressEvent {
    /// Percentage in `[0, 100]`, non-decreasing within one run.
    pub percentage: f64,
    pub stage: ProgressStage,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(stage: ProgressStage, percentage: f64, message: impl Into<String>) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
            stage,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.stage == ProgressStage::Complete
    }
}

/// Bookkeeping attached to every parse result.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    /// Input size in bytes.
    pub total_size: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub parse_time: f64,
    pub chunks_processed: usize,
    /// Peak estimate of scanner buffer plus retained section bytes.
    pub memory_used: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(default)]
    pub sections_evicted: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Machine-readable error body returned by tool surfaces.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_event_has_exact_wire_shape() {
        let event = ProgressEvent::new(ProgressStage::Parsing, 42.5, "Parsed 3 chunks");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "percentage": 42.5,
                "stage": "parsing",
                "message": "Parsed 3 chunks"
            })
        );
    }

    #[test]
    fn progress_percentage_is_clamped() {
        assert_eq!(ProgressEvent::new(ProgressStage::Complete, 140.0, "").percentage, 100.0);
        assert_eq!(ProgressEvent::new(ProgressStage::Initialization, -3.0, "").percentage, 0.0);
    }

    #[test]
    fn metadata_uses_camel_case_and_omits_missing_ratio() {
        let meta = ParseMetadata {
            total_size: 10,
            parse_time: 1.5,
            chunks_processed: 2,
            memory_used: 64,
            ..Default::default()
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["totalSize"], 10);
        assert_eq!(value["chunksProcessed"], 2);
        assert!(value.get("compressionRatio").is_none());
    }

    #[test]
    fn error_envelope_hint_is_optional() {
        let plain = serialize_json(&ErrorEnvelope::new("io", "boom")).unwrap();
        assert_eq!(plain, r#"{"code":"io","message":"boom"}"#);

        let hinted = ErrorEnvelope::new("no_spec_loaded", "nothing loaded")
            .with_hint("call load_openapi_spec first");
        assert!(serialize_json(&hinted).unwrap().contains("\"hint\""));
    }
}
