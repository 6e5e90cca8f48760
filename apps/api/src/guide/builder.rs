//! Guide request builder — turns wizard answers into a provider request.
//!
//! Pure: no I/O, no clocks, no randomness. The same config always yields the
//! same payload bytes.

use serde::Serialize;
use serde_json::{json, Value};

use crate::guide::models::{GenerationConfig, OTHER};
use crate::guide::prompts::{guide_response_schema, GUIDE_PROMPT_TEMPLATE, GUIDE_SYSTEM_ROLE};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Everything the provider needs to generate one guide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideRequestPayload {
    pub prompt: String,
    pub system_instruction: String,
    pub response_schema: Value,
}

impl GuideRequestPayload {
    /// Renders the `generateContent` request body.
    pub fn to_request_body(&self) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.prompt }]
            }],
            "systemInstruction": {
                "parts": [{ "text": self.system_instruction }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": self.response_schema
            }
        })
    }
}

/// Resolves an `Other` selector to its custom text; anything else passes through verbatim.
pub fn resolve_field<'a>(value: &'a str, custom: &'a str) -> &'a str {
    if value.trim() == OTHER {
        custom.trim()
    } else {
        value
    }
}

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are copied verbatim and never rescanned. Braces that do not
/// name a known placeholder (the JSON examples in the template) are kept as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match known {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the request payload for a (validated) config.
pub fn build_request(config: &GenerationConfig) -> GuideRequestPayload {
    let prompt = fill_template(
        GUIDE_PROMPT_TEMPLATE,
        &[
            ("trigger", resolve_field(&config.trigger, &config.custom_trigger)),
            ("interview_type", config.interview_type.as_str()),
            ("persona", resolve_field(&config.persona, &config.custom_persona)),
            (
                "sentiment",
                resolve_field(&config.sentiment, &config.custom_sentiment),
            ),
        ],
    );

    GuideRequestPayload {
        prompt,
        system_instruction: format!("{GUIDE_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}"),
        response_schema: guide_response_schema(),
    }
}
