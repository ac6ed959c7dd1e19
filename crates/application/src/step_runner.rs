//! Single step execution
//!
//! Runs one agent step to settlement: renders its instruction, invokes the
//! executor, and races the invocation against the configured timeout.
//! Losing the race drops the executor future, cancelling the in-flight
//! invocation at its next await point.

use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use scribe_core::{PipelineJob, StepKind, StepOutcome};
use scribe_ports::{AgentContext, AgentExecutor, AgentExecutorError};

use crate::prompts;

/// Run `step` against `job`. Never errors: timeouts and executor failures
/// come back as unsuccessful outcomes.
pub(crate) async fn run_step(
    executor: &dyn AgentExecutor,
    step: StepKind,
    job: &PipelineJob,
    step_timeout: Duration,
) -> StepOutcome {
    let instruction = prompts::instruction_for(step, job);
    let ctx = AgentContext {
        patient_id: &job.patient_id,
        clinician_id: &job.clinician_id,
        job,
    };

    match timeout(step_timeout, executor.execute(step, &instruction, ctx)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            warn!(step = %step, error = %err, "agent step failed");
            StepOutcome::failure(classify(step, &err))
        }
        Err(_) => {
            warn!(
                step = %step,
                timeout_secs = step_timeout.as_secs(),
                "agent step timed out"
            );
            StepOutcome::failure(format!(
                "step {} timed out after {}s",
                step,
                step_timeout.as_secs()
            ))
        }
    }
}

/// Map an executor error to a caller-safe message. Timeout-flavored
/// messages pass through unchanged; everything else is reported generically
/// so runtime internals never reach the job record.
fn classify(step: StepKind, err: &AgentExecutorError) -> String {
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("timed out") || lowered.contains("timeout") {
        message
    } else {
        format!("internal error running step {step}")
    }
}
