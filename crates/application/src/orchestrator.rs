//! Pipeline Orchestrator
//!
//! Drives the ordered agent steps over one job record: evicts the store,
//! creates and inserts the record, runs each step under a timeout, folds
//! artifacts into the derived state, and finalizes status under the
//! critical-step policy. Step-level problems are recorded on the job, never
//! surfaced as errors to the caller.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use scribe_adapters::InMemoryJobStore;
use scribe_core::{
    DerivedState, DomainError, JobId, PipelineJob, Result, StepKind, StepOutcome,
};
use scribe_ports::AgentExecutor;

use crate::config::PipelineConfig;
use crate::step_runner;

/// Request to run the pipeline over one visit transcript.
#[derive(Debug, Clone)]
pub struct PipelineRunRequest {
    pub patient_id: String,
    pub clinician_id: String,
    pub transcript: String,
    /// Optional subset of steps to run. The global order is always kept;
    /// callers can omit steps, never reorder them.
    pub steps: Option<Vec<StepKind>>,
}

/// Pipeline orchestrator service
pub struct PipelineOrchestrator {
    store: Arc<InMemoryJobStore>,
    executor: Arc<dyn AgentExecutor>,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<InMemoryJobStore>,
        executor: Arc<dyn AgentExecutor>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// Run the whole pipeline, returning only once the job is terminal.
    ///
    /// Non-critical step failures degrade the result (recorded in `errors`,
    /// later steps still run); a critical step failure fails the job and
    /// skips the remaining steps. Either way the caller gets the final
    /// record back, not an error.
    ///
    /// # Errors
    /// Returns `DomainError::Validation` if the transcript is empty.
    pub async fn run_pipeline(&self, request: PipelineRunRequest) -> Result<PipelineJob> {
        if request.transcript.trim().is_empty() {
            return Err(DomainError::Validation(
                "transcript must not be empty".to_string(),
            ));
        }

        self.store.evict(Utc::now()).await;

        let steps = resolve_steps(request.steps.as_deref());
        let mut job = PipelineJob::new(
            request.patient_id,
            request.clinician_id,
            request.transcript,
        );
        info!(job_id = %job.id, steps = steps.len(), "starting pipeline run");
        self.store.insert(job.clone()).await;

        for step in steps {
            job.current_step = Some(step);
            self.store.insert(job.clone()).await;

            let outcome = step_runner::run_step(
                self.executor.as_ref(),
                step,
                &job,
                self.config.step_timeout,
            )
            .await;

            self.apply_outcome(&mut job, step, outcome)?;
            self.store.insert(job.clone()).await;

            if job.status.is_terminal() {
                break;
            }
        }

        if !job.status.is_terminal() {
            job.complete()?;
        }
        self.store.insert(job.clone()).await;

        info!(
            job_id = %job.id,
            status = %job.status,
            errors = job.errors.len(),
            "pipeline run finished"
        );
        Ok(job)
    }

    /// Run exactly one step against a transient record built from the
    /// caller's input and optional prior derived state. The shared store is
    /// never touched.
    pub async fn run_single_step(
        &self,
        step: StepKind,
        patient_id: String,
        clinician_id: String,
        transcript: String,
        prior: Option<DerivedState>,
    ) -> StepOutcome {
        let mut job = PipelineJob::new(patient_id, clinician_id, transcript);
        if let Some(derived) = prior {
            job.derived = derived;
        }
        job.current_step = Some(step);

        step_runner::run_step(self.executor.as_ref(), step, &job, self.config.step_timeout).await
    }

    /// Current state of one job, if still retained.
    pub async fn get_status(&self, id: &JobId) -> Option<PipelineJob> {
        self.store.get(id).await
    }

    /// All retained jobs, most recently started first.
    pub async fn list_jobs(&self) -> Vec<PipelineJob> {
        self.store.list_all().await
    }

    /// Record a settled step on the job and apply the continue-or-abort
    /// policy.
    fn apply_outcome(&self, job: &mut PipelineJob, step: StepKind, outcome: StepOutcome) -> Result<()> {
        let succeeded = outcome.success;

        if succeeded {
            if let Some(artifacts) = &outcome.artifacts {
                if !artifacts.is_empty() {
                    job.derived.merge(artifacts);
                }
            }
        } else {
            let message = outcome
                .error_message
                .clone()
                .unwrap_or_else(|| format!("step {step} failed"));
            job.record_error(step, message);
        }
        job.record_step(step, outcome);

        if !succeeded && self.config.critical_steps.contains(&step) {
            warn!(job_id = %job.id, step = %step, "critical step failed, aborting run");
            job.fail()?;
        }
        Ok(())
    }
}

/// The global order filtered to the requested subset.
fn resolve_steps(subset: Option<&[StepKind]>) -> Vec<StepKind> {
    match subset {
        Some(requested) => StepKind::ORDERED
            .iter()
            .copied()
            .filter(|step| requested.contains(step))
            .collect(),
        None => StepKind::ORDERED.to_vec(),
    }
}
