//! Pre-filled tracker link — hands a guide to the external interview-log form.

use reqwest::Url;

use crate::errors::AppError;
use crate::guide::models::{ActionRow, StayGuide};

pub const TRACKER_FORM_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSdStayInterviewTrackerLog/viewform";

const OPENING_SCRIPT_FIELD: &str = "entry.1184920311";
const ACTION_MATRIX_FIELD: &str = "entry.2077358964";

/// One form field per question slot, in question order.
/// Questions past the last slot are dropped.
pub const QUESTION_FIELDS: &[&str] = &[
    "entry.405719462",
    "entry.1517346081",
    "entry.883401275",
    "entry.1962218833",
    "entry.290761654",
    "entry.1733097410",
    "entry.664028199",
];

pub fn build_handoff_url(guide: &StayGuide) -> Result<Url, AppError> {
    let action_matrix = format_action_matrix(&guide.action_matrix);

    let mut params: Vec<(&str, &str)> = vec![
        ("usp", "pp_url"),
        (OPENING_SCRIPT_FIELD, guide.opening_script.as_str()),
    ];
    params.extend(QUESTION_FIELDS.iter().copied().zip(guide.flattened_questions()));
    params.push((ACTION_MATRIX_FIELD, action_matrix.as_str()));

    Url::parse_with_params(TRACKER_FORM_URL, &params)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid tracker form URL: {e}")))
}

fn format_action_matrix(rows: &[ActionRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{} | Manager: {} | Escalate: {}",
                row.insight, row.controllable, row.uncontrollable
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::models::fixtures::guide_with_questions;

    fn param_names(url: &Url) -> Vec<String> {
        url.query_pairs().map(|(k, _)| k.into_owned()).collect()
    }

    fn value_of(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_seven_questions_all_attach() {
        let url = build_handoff_url(&guide_with_questions(7)).unwrap();
        for (i, field) in QUESTION_FIELDS.iter().enumerate() {
            assert_eq!(
                value_of(&url, field).as_deref(),
                Some(format!("Question {}?", i + 1).as_str())
            );
        }
        assert_eq!(param_names(&url).len(), 2 + QUESTION_FIELDS.len() + 1);
    }

    #[test]
    fn test_extra_questions_are_dropped() {
        let seven = build_handoff_url(&guide_with_questions(7)).unwrap();
        let eight = build_handoff_url(&guide_with_questions(8)).unwrap();

        assert_eq!(param_names(&seven).len(), param_names(&eight).len());
        assert!(!eight.as_str().contains("Question+8"));
        assert!(!eight.as_str().contains("Question%208"));
    }

    #[test]
    fn test_fewer_questions_leave_slots_empty() {
        let url = build_handoff_url(&guide_with_questions(4)).unwrap();
        assert_eq!(param_names(&url).len(), 2 + 4 + 1);
        assert!(value_of(&url, QUESTION_FIELDS[4]).is_none());
    }

    #[test]
    fn test_script_and_matrix_are_encoded() {
        let guide = guide_with_questions(7);
        let url = build_handoff_url(&guide).unwrap();

        assert!(url.as_str().starts_with(TRACKER_FORM_URL));
        assert_eq!(value_of(&url, "usp").as_deref(), Some("pp_url"));
        assert_eq!(
            value_of(&url, OPENING_SCRIPT_FIELD),
            Some(guide.opening_script.clone())
        );
        let matrix = value_of(&url, ACTION_MATRIX_FIELD).unwrap();
        assert!(matrix.starts_with("Wants more ownership | Manager: Assign"));
    }
}
