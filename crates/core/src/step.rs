//! Pipeline step catalogue and per-step outcome types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::DomainError;

/// One named unit of work within a pipeline run - Value Object
///
/// The variant order is the fixed global execution order. A run may skip
/// steps but never reorders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    ClinicalNote,
    PatientSummary,
    CodingReview,
    FollowUp,
    Research,
}

impl StepKind {
    /// Fixed global execution order.
    pub const ORDERED: [StepKind; 5] = [
        StepKind::ClinicalNote,
        StepKind::PatientSummary,
        StepKind::CodingReview,
        StepKind::FollowUp,
        StepKind::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::ClinicalNote => "clinical_note",
            StepKind::PatientSummary => "patient_summary",
            StepKind::CodingReview => "coding_review",
            StepKind::FollowUp => "follow_up",
            StepKind::Research => "research",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clinical_note" => Ok(StepKind::ClinicalNote),
            "patient_summary" => Ok(StepKind::PatientSummary),
            "coding_review" => Ok(StepKind::CodingReview),
            "follow_up" => Ok(StepKind::FollowUp),
            "research" => Ok(StepKind::Research),
            _ => Err(DomainError::UnknownStep(s.to_string())),
        }
    }
}

/// Named output values produced by one step, keyed by artifact name.
pub type StepArtifacts = Map<String, Value>;

/// Execution metrics reported by the agent executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTelemetry {
    pub duration_ms: u64,
    pub tool_invocations: u32,
}

/// Result of one step attempt (success flag, artifacts, error, telemetry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub success: bool,
    pub artifacts: Option<StepArtifacts>,
    pub error_message: Option<String>,
    pub telemetry: StepTelemetry,
}

impl StepOutcome {
    /// An unsuccessful outcome carrying only an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            artifacts: None,
            error_message: Some(message.into()),
            telemetry: StepTelemetry::default(),
        }
    }
}
