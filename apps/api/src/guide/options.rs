//! Selector choices offered by each wizard step.

use serde::Serialize;

use crate::guide::models::OTHER;

pub const TRIGGERS: &[&str] = &[
    "Annual Retention Check-in",
    "Recent Resignation on the Team",
    "Post-Promotion or Role Change",
    "Reorganization or Leadership Change",
    "Observed Disengagement",
    OTHER,
];

pub const INTERVIEW_TYPES: &[&str] = &[
    "Standard Stay Interview",
    "New Hire Check-in (90 Days)",
    "High-Risk Retention Conversation",
    "Skip-Level Stay Interview",
];

pub const PERSONAS: &[&str] = &[
    "High Performer",
    "Steady Contributor",
    "New Hire",
    "Long-Tenured Expert",
    "Recently Promoted",
    OTHER,
];

pub const SENTIMENTS: &[&str] = &["Positive", "Neutral", "Frustrated", "Burned Out", OTHER];

#[derive(Debug, Serialize)]
pub struct WizardStep {
    pub step: u8,
    pub title: &'static str,
    pub fields: Vec<WizardField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardField {
    pub name: &'static str,
    pub choices: &'static [&'static str],
    /// Free-text field shown when the `Other` choice is picked.
    pub custom_field: Option<&'static str>,
}

/// The three input steps, in order.
pub fn wizard_steps() -> Vec<WizardStep> {
    vec![
        WizardStep {
            step: 1,
            title: "Context",
            fields: vec![
                WizardField {
                    name: "trigger",
                    choices: TRIGGERS,
                    custom_field: Some("customTrigger"),
                },
                WizardField {
                    name: "type",
                    choices: INTERVIEW_TYPES,
                    custom_field: None,
                },
            ],
        },
        WizardStep {
            step: 2,
            title: "Persona",
            fields: vec![WizardField {
                name: "persona",
                choices: PERSONAS,
                custom_field: Some("customPersona"),
            }],
        },
        WizardStep {
            step: 3,
            title: "Sentiment",
            fields: vec![WizardField {
                name: "sentiment",
                choices: SENTIMENTS,
                custom_field: Some("customSentiment"),
            }],
        },
    ]
}
