//! Wizard answers and the generated guide.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Selector value that defers to the paired free-text field.
pub const OTHER: &str = "Other";

/// Everything the manager answered in the wizard.
///
/// Selectors set to [`OTHER`] must carry non-empty custom text before the
/// config can be submitted for generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub custom_trigger: String,
    #[serde(default, rename = "type")]
    pub interview_type: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub custom_persona: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub custom_sentiment: String,
}

/// Partial update sent by one wizard step. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersPatch {
    pub trigger: Option<String>,
    pub custom_trigger: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub persona: Option<String>,
    pub custom_persona: Option<String>,
    pub sentiment: Option<String>,
    pub custom_sentiment: Option<String>,
}

impl GenerationConfig {
    pub fn apply(&mut self, patch: AnswersPatch) {
        let fields = [
            (&mut self.trigger, patch.trigger),
            (&mut self.custom_trigger, patch.custom_trigger),
            (&mut self.interview_type, patch.interview_type),
            (&mut self.persona, patch.persona),
            (&mut self.custom_persona, patch.custom_persona),
            (&mut self.sentiment, patch.sentiment),
            (&mut self.custom_sentiment, patch.custom_sentiment),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    /// Step 1 is complete once trigger and interview type are usable.
    pub fn context_complete(&self) -> bool {
        selector_complete(&self.trigger, &self.custom_trigger)
            && !self.interview_type.trim().is_empty()
    }

    pub fn persona_complete(&self) -> bool {
        selector_complete(&self.persona, &self.custom_persona)
    }

    pub fn sentiment_complete(&self) -> bool {
        selector_complete(&self.sentiment, &self.custom_sentiment)
    }

    pub fn is_complete(&self) -> bool {
        self.context_complete() && self.persona_complete() && self.sentiment_complete()
    }

    /// Rejects configs that cannot be sent downstream, naming the first offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        check_selector("trigger", &self.trigger, "customTrigger", &self.custom_trigger)?;
        if self.interview_type.trim().is_empty() {
            return Err(AppError::Validation("type cannot be empty".to_string()));
        }
        check_selector("persona", &self.persona, "customPersona", &self.custom_persona)?;
        check_selector(
            "sentiment",
            &self.sentiment,
            "customSentiment",
            &self.custom_sentiment,
        )
    }
}

fn selector_complete(value: &str, custom: &str) -> bool {
    match value.trim() {
        "" => false,
        OTHER => !custom.trim().is_empty(),
        _ => true,
    }
}

fn check_selector(name: &str, value: &str, custom_name: &str, custom: &str) -> Result<(), AppError> {
    match value.trim() {
        "" => Err(AppError::Validation(format!("{name} cannot be empty"))),
        OTHER if custom.trim().is_empty() => Err(AppError::Validation(format!(
            "{custom_name} is required when {name} is \"{OTHER}\""
        ))),
        _ => Ok(()),
    }
}

/// One named group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTier {
    pub category: String,
    pub questions: Vec<String>,
}

/// One row of the action matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRow {
    pub insight: String,
    /// What the manager can do directly.
    pub controllable: String,
    /// What has to be escalated.
    pub uncontrollable: String,
}

/// The generated coaching guide.
///
/// CRITICAL: all three top-level fields are required. A model response
/// missing any of them fails deserialization and the whole call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayGuide {
    pub opening_script: String,
    pub tiered_questions: Vec<QuestionTier>,
    pub action_matrix: Vec<ActionRow>,
}

impl StayGuide {
    /// All questions across categories, in order.
    pub fn flattened_questions(&self) -> impl Iterator<Item = &str> {
        self.tiered_questions
            .iter()
            .flat_map(|tier| tier.questions.iter().map(String::as_str))
    }

    pub fn question_count(&self) -> usize {
        self.tiered_questions.iter().map(|t| t.questions.len()).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_config_uses_camel_case_wire_names() {
        let json = r#"{
            "trigger": "Other",
            "customTrigger": "Competing offer rumor",
            "type": "Flight Risk Intervention",
            "persona": "New Hire",
            "sentiment": "Frustrated"
        }"#;
        let config: GenerationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.custom_trigger, "Competing offer rumor");
        assert_eq!(config.interview_type, "Flight Risk Intervention");
        assert!(config.custom_persona.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_other_without_custom_text_is_rejected() {
        let mut config = config();
        config.persona = OTHER.to_string();
        config.custom_persona = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("customPersona"));
        assert!(!config.persona_complete());
    }

    #[test]
    fn test_empty_selector_is_rejected() {
        let mut config = config();
        config.sentiment = String::new();
        assert!(config.validate().is_err());
        assert!(!config.is_complete());
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut config = config();
        config.apply(AnswersPatch {
            sentiment: Some(OTHER.to_string()),
            custom_sentiment: Some("Quietly checked out".to_string()),
            ..Default::default()
        });
        assert_eq!(config.trigger, "Annual Review Cycle");
        assert_eq!(config.sentiment, OTHER);
        assert!(config.sentiment_complete());
    }

    #[test]
    fn test_stay_guide_requires_action_matrix() {
        let json = r#"{
            "openingScript": "Hi",
            "tieredQuestions": [{"category": "Growth", "questions": ["Q1"]}]
        }"#;
        let result: Result<StayGuide, _> = serde_json::from_str(json);
        assert!(
            result.is_err(),
            "StayGuide without actionMatrix must fail deserialization"
        );
    }

    #[test]
    fn test_flattened_questions_preserve_order() {
        let guide = guide_with_questions(5);
        let flat: Vec<&str> = guide.flattened_questions().collect();
        assert_eq!(flat.len(), 5);
        assert_eq!(flat[0], "Question 1?");
        assert_eq!(flat[4], "Question 5?");
        assert_eq!(guide.question_count(), 5);
    }
}
