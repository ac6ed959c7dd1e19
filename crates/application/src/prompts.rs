//! Step instruction templating
//!
//! Pure rendering of each step's instruction text from job state. Later
//! steps reference fields merged in by earlier ones, which is why the
//! pipeline must run them in order.

use serde_json::Value;

use scribe_core::{PipelineJob, StepKind};

/// Render the instruction for `step` against the job's current state.
pub fn instruction_for(step: StepKind, job: &PipelineJob) -> String {
    match step {
        StepKind::ClinicalNote => format!(
            "Write a structured clinical note (subjective, objective, assessment, plan) \
             for this visit.\n\nTranscript:\n{}",
            job.transcript
        ),
        StepKind::PatientSummary => format!(
            "Rewrite the clinical note below as a plain-language summary addressed to \
             the patient.\n\nNote:\n{}",
            render(job.derived.note.as_ref(), &job.transcript)
        ),
        StepKind::CodingReview => format!(
            "Review the clinical note (document {}) and propose billing codes and \
             claims.\n\nNote:\n{}",
            job.derived.note_id.as_deref().unwrap_or("unsaved"),
            render(job.derived.note.as_ref(), &job.transcript)
        ),
        StepKind::FollowUp => format!(
            "From the note and coding assessment, list follow-up appointments and any \
             lab orders to schedule.\n\nNote:\n{}\n\nAssessment:\n{}",
            render(job.derived.note.as_ref(), &job.transcript),
            render(job.derived.assessment.as_ref(), "none recorded")
        ),
        StepKind::Research => format!(
            "Find current clinical guidance relevant to this visit's assessment and \
             summarize the findings.\n\nNote:\n{}\n\nAssessment:\n{}",
            render(job.derived.note.as_ref(), &job.transcript),
            render(job.derived.assessment.as_ref(), "none recorded")
        ),
    }
}

/// Compact JSON for structured fields, with a fallback when the producing
/// step has not run.
fn render(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(value) => value.to_string(),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job_with_transcript() -> PipelineJob {
        PipelineJob::new(
            "patient-1".to_string(),
            "clinician-1".to_string(),
            "Patient reports mild headache for two days.".to_string(),
        )
    }

    #[test]
    fn test_note_instruction_embeds_transcript() {
        let job = job_with_transcript();
        let instruction = instruction_for(StepKind::ClinicalNote, &job);
        assert!(instruction.contains("mild headache"));
    }

    #[test]
    fn test_later_steps_reference_merged_note() {
        let mut job = job_with_transcript();
        job.derived.note = Some(json!({"assessment": "tension headache"}));
        job.derived.note_id = Some("note-42".to_string());

        let instruction = instruction_for(StepKind::CodingReview, &job);
        assert!(instruction.contains("tension headache"));
        assert!(instruction.contains("note-42"));
    }

    #[test]
    fn test_missing_note_falls_back_to_transcript() {
        let job = job_with_transcript();
        let instruction = instruction_for(StepKind::PatientSummary, &job);
        assert!(instruction.contains("mild headache"));
    }
}
