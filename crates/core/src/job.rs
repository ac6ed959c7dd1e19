//! Pipeline Job Domain Entity
//!
//! This module contains the `PipelineJob` aggregate root: the mutable state
//! threaded through one pipeline run, from creation to terminal status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{DomainError, Result};
use crate::step::{StepKind, StepOutcome};

/// Job identifier - Value Object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current status of a pipeline job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one attempted step. The containing vec's order is the
/// execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: StepKind,
    pub outcome: StepOutcome,
}

/// A recorded step failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepError {
    pub step: StepKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields accumulated from step artifacts over a run.
///
/// Scalar fields are overwritten by later steps; list fields only ever grow.
/// See [`crate::merge`] for the key-by-key rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    pub note_id: Option<String>,
    pub note: Option<Value>,
    pub patient_summary: Option<Value>,
    pub assessment_id: Option<String>,
    pub assessment: Option<Value>,
    pub research_findings: Option<Value>,
    pub appointments: Vec<Value>,
    pub claims: Vec<Value>,
    pub lab_orders: Vec<Value>,
}

/// Pipeline job aggregate root
///
/// Identity fields and the transcript are immutable after creation;
/// `step_results` and `errors` are append-only; `status` moves forward only
/// (`Running` to `Completed` or `Failed`, never back).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineJob {
    pub id: JobId,
    pub patient_id: String,
    pub clinician_id: String,
    pub transcript: String,
    pub step_results: Vec<StepResult>,
    pub errors: Vec<StepError>,
    pub derived: DerivedState,
    pub status: JobStatus,
    pub current_step: Option<StepKind>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PipelineJob {
    /// Create a new job in `Running` status, stamped with the current time.
    pub fn new(patient_id: String, clinician_id: String, transcript: String) -> Self {
        Self {
            id: JobId::new(),
            patient_id,
            clinician_id,
            transcript,
            step_results: Vec::new(),
            errors: Vec::new(),
            derived: DerivedState::default(),
            status: JobStatus::Running,
            current_step: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record the outcome of an attempted step.
    pub fn record_step(&mut self, step: StepKind, outcome: StepOutcome) {
        self.step_results.push(StepResult { step, outcome });
    }

    /// Record a step failure with the current timestamp.
    pub fn record_error(&mut self, step: StepKind, message: impl Into<String>) {
        self.errors.push(StepError {
            step,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    /// The recorded outcome for `step`, if it was attempted.
    pub fn step_result(&self, step: StepKind) -> Option<&StepOutcome> {
        self.step_results
            .iter()
            .find(|result| result.step == step)
            .map(|result| &result.outcome)
    }

    /// Transition to `Completed` (terminal)
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if the job is already terminal
    pub fn complete(&mut self) -> Result<()> {
        self.finalize(JobStatus::Completed)
    }

    /// Transition to `Failed` (terminal)
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if the job is already terminal
    pub fn fail(&mut self) -> Result<()> {
        self.finalize(JobStatus::Failed)
    }

    fn finalize(&mut self, status: JobStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state_transition(
                &self.status.to_string(),
                &status.to_string(),
            ));
        }
        self.status = status;
        self.current_step = None;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
