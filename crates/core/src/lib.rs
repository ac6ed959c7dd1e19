//! Scribe core domain
//!
//! Entities and value objects for the clinical documentation pipeline:
//! the `PipelineJob` aggregate threaded through one run, the fixed step
//! catalogue, and the merge rules that fold step artifacts into a job's
//! derived state.

pub mod error;
pub mod job;
pub mod merge;
pub mod step;

pub use crate::error::{DomainError, Result};
pub use crate::job::{DerivedState, JobId, JobStatus, PipelineJob, StepError, StepResult};
pub use crate::step::{StepArtifacts, StepKind, StepOutcome, StepTelemetry};
