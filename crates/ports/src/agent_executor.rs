//! Agent Executor Port
//!
//! Defines the interface to the hosted agent runtime that carries out one
//! pipeline step. The runtime's internal reasoning and tool use are opaque
//! here; it only reports a settled [`StepOutcome`].

use async_trait::async_trait;

use scribe_core::{PipelineJob, StepKind, StepOutcome};

/// Contextual state handed to the executor alongside the instruction text.
#[derive(Debug, Clone)]
pub struct AgentContext<'a> {
    pub patient_id: &'a str,
    pub clinician_id: &'a str,
    pub job: &'a PipelineJob,
}

/// Agent executor port
///
/// The orchestrator imposes its own per-step timeout and drops the returned
/// future when it fires, which cancels the invocation at its next await
/// point. Implementations that spawn detached tasks escape that cancellation
/// and must bound such work themselves.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Run one step to settlement and report its outcome.
    ///
    /// A reported failure (`success == false`) belongs in the returned
    /// outcome; `Err` is reserved for the invocation itself going wrong.
    async fn execute(
        &self,
        step: StepKind,
        instruction: &str,
        ctx: AgentContext<'_>,
    ) -> Result<StepOutcome, AgentExecutorError>;
}

/// Agent executor error
#[derive(thiserror::Error, Debug)]
pub enum AgentExecutorError {
    #[error("agent runtime unavailable: {0}")]
    Unavailable(String),

    #[error("malformed agent response: {0}")]
    InvalidResponse(String),

    #[error("agent execution failed: {0}")]
    Execution(String),
}
