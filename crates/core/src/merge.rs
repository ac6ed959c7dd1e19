//! Artifact merge rules
//!
//! Every artifact key a step can produce maps to exactly one rule here.
//! Scalar fields are overwritten by later steps, list fields only ever
//! grow. Keys without a table row are ignored, so executors may emit new
//! artifact kinds before the orchestrator understands them.

use serde_json::Value;

use crate::job::DerivedState;
use crate::step::StepArtifacts;

/// Scalar text fields of [`DerivedState`].
#[derive(Debug, Clone, Copy)]
enum TextField {
    NoteId,
    AssessmentId,
}

/// Structured fields of [`DerivedState`].
#[derive(Debug, Clone, Copy)]
enum ValueField {
    Note,
    PatientSummary,
    Assessment,
    ResearchFindings,
}

/// List fields of [`DerivedState`].
#[derive(Debug, Clone, Copy)]
enum ListField {
    Appointments,
    Claims,
    LabOrders,
}

/// How one artifact key folds into the derived state.
#[derive(Debug, Clone, Copy)]
enum MergeRule {
    /// Replace a text field. Non-string values are ignored.
    OverwriteText(TextField),
    /// Replace a structured field.
    Overwrite(ValueField),
    /// Extend a list field. A non-array value appends as one element.
    Append(ListField),
}

/// Artifact key table. Adding a new artifact kind is one row here.
const MERGE_RULES: &[(&str, MergeRule)] = &[
    ("note_id", MergeRule::OverwriteText(TextField::NoteId)),
    ("note", MergeRule::Overwrite(ValueField::Note)),
    ("patient_summary", MergeRule::Overwrite(ValueField::PatientSummary)),
    ("assessment_id", MergeRule::OverwriteText(TextField::AssessmentId)),
    ("assessment", MergeRule::Overwrite(ValueField::Assessment)),
    ("research_findings", MergeRule::Overwrite(ValueField::ResearchFindings)),
    ("appointments", MergeRule::Append(ListField::Appointments)),
    ("claims", MergeRule::Append(ListField::Claims)),
    ("lab_orders", MergeRule::Append(ListField::LabOrders)),
];

fn rule_for(key: &str) -> Option<MergeRule> {
    MERGE_RULES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rule)| *rule)
}

impl DerivedState {
    /// Fold a successful step's artifacts into the derived state.
    ///
    /// Prior list elements are never removed or reordered, only appended to.
    pub fn merge(&mut self, artifacts: &StepArtifacts) {
        for (key, value) in artifacts {
            let Some(rule) = rule_for(key) else {
                continue;
            };
            match rule {
                MergeRule::OverwriteText(field) => {
                    if let Value::String(text) = value {
                        *self.text_mut(field) = Some(text.clone());
                    }
                }
                MergeRule::Overwrite(field) => {
                    *self.value_mut(field) = Some(value.clone());
                }
                MergeRule::Append(field) => {
                    let list = self.list_mut(field);
                    match value {
                        Value::Array(items) => list.extend(items.iter().cloned()),
                        other => list.push(other.clone()),
                    }
                }
            }
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut Option<String> {
        match field {
            TextField::NoteId => &mut self.note_id,
            TextField::AssessmentId => &mut self.assessment_id,
        }
    }

    fn value_mut(&mut self, field: ValueField) -> &mut Option<Value> {
        match field {
            ValueField::Note => &mut self.note,
            ValueField::PatientSummary => &mut self.patient_summary,
            ValueField::Assessment => &mut self.assessment,
            ValueField::ResearchFindings => &mut self.research_findings,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<Value> {
        match field {
            ListField::Appointments => &mut self.appointments,
            ListField::Claims => &mut self.claims,
            ListField::LabOrders => &mut self.lab_orders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifacts(entries: &[(&str, Value)]) -> StepArtifacts {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_scalars_overwrite() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[
            ("note_id", json!("note-1")),
            ("note", json!({"subjective": "headache"})),
        ]));
        derived.merge(&artifacts(&[
            ("note_id", json!("note-2")),
            ("patient_summary", json!({"text": "plain language summary"})),
        ]));

        assert_eq!(derived.note_id.as_deref(), Some("note-2"));
        assert_eq!(derived.note, Some(json!({"subjective": "headache"})));
        assert_eq!(
            derived.patient_summary,
            Some(json!({"text": "plain language summary"}))
        );
    }

    #[test]
    fn test_assessment_pair_overwrites_both() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[
            ("assessment_id", json!("assessment-7")),
            ("assessment", json!({"codes": ["R51.9"]})),
        ]));

        assert_eq!(derived.assessment_id.as_deref(), Some("assessment-7"));
        assert_eq!(derived.assessment, Some(json!({"codes": ["R51.9"]})));
    }

    #[test]
    fn test_lists_append_across_merges() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[(
            "appointments",
            json!([{"reason": "follow-up", "in_days": 14}]),
        )]));
        derived.merge(&artifacts(&[
            ("appointments", json!([{"reason": "labs", "in_days": 7}])),
            ("claims", json!([{"code": "99213"}])),
        ]));

        assert_eq!(derived.appointments.len(), 2);
        assert_eq!(derived.appointments[0]["reason"], json!("follow-up"));
        assert_eq!(derived.claims.len(), 1);
    }

    #[test]
    fn test_bare_value_appends_as_single_element() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[("lab_orders", json!({"test": "CBC"}))]));

        assert_eq!(derived.lab_orders, vec![json!({"test": "CBC"})]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[
            ("vitals", json!({"bp": "120/80"})),
            ("note_id", json!("note-1")),
        ]));

        assert_eq!(derived.note_id.as_deref(), Some("note-1"));
        assert_eq!(derived, DerivedState {
            note_id: Some("note-1".to_string()),
            ..DerivedState::default()
        });
    }

    #[test]
    fn test_non_string_id_ignored() {
        let mut derived = DerivedState::default();
        derived.merge(&artifacts(&[("note_id", json!(42))]));

        assert!(derived.note_id.is_none());
    }

    #[test]
    fn test_every_rule_key_is_unique() {
        for (index, (key, _)) in MERGE_RULES.iter().enumerate() {
            assert!(
                !MERGE_RULES[index + 1..].iter().any(|(other, _)| other == key),
                "duplicate merge rule for {key}"
            );
        }
    }
}
