//! Orchestrator configuration

use std::time::Duration;

use scribe_core::StepKind;

/// Configuration for the pipeline orchestrator
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Ceiling on one step's wall-clock time.
    pub step_timeout: Duration,
    /// Steps whose failure aborts the whole run instead of being recorded
    /// and skipped past. Which steps are critical is explicit configuration,
    /// never inferred from position.
    pub critical_steps: Vec<StepKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_millis(180_000),
            critical_steps: vec![StepKind::ClinicalNote],
        }
    }
}
