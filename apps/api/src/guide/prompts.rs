// All LLM prompt constants for the Guide module.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

/// Role framing sent as the system instruction. JSON_ONLY_SYSTEM is appended by the builder.
pub const GUIDE_SYSTEM_ROLE: &str = "You are an expert HR business partner and leadership coach \
    who prepares managers for stay interviews: structured, retention-focused conversations \
    with employees the company wants to keep. Your guidance is warm, specific and practical.";

/// Guide prompt template.
/// Replace: {trigger}, {interview_type}, {persona}, {sentiment}
pub const GUIDE_PROMPT_TEMPLATE: &str = r#"Prepare a stay interview guide for a manager.

INTERVIEW CONTEXT:
- Why this conversation is happening: {trigger}
- Interview format: {interview_type}
- Employee persona: {persona}
- Employee's current sentiment: {sentiment}

Return a JSON object with exactly these fields:
1. "openingScript": a short script (3-5 sentences) the manager reads to open the conversation,
   setting a safe, non-judgmental tone suited to the persona and sentiment above.
2. "tieredQuestions": EXACTLY 7 questions in total, grouped into named categories that move from
   rapport-building to deeper retention topics. Each item is {"category": "...", "questions": ["..."]}.
3. "actionMatrix": an action-plan table. Each row is
   {"insight": "what the manager might hear", "controllable": "what the manager can do directly",
    "uncontrollable": "what must be escalated or acknowledged as outside the manager's control"}.

HARD RULES:
1. Exactly 7 questions across all categories — never more, never fewer
2. Questions must be open-ended and tailored to the context above
3. Provide at least 3 action matrix rows
4. Do NOT promise compensation or promotion outcomes in any script or response"#;

/// Fixed output contract with the provider, in its OpenAPI-subset schema dialect.
/// Must stay in sync with `StayGuide`.
pub fn guide_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "openingScript": { "type": "STRING" },
            "tieredQuestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "questions": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["category", "questions"]
                }
            },
            "actionMatrix": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "insight": { "type": "STRING" },
                        "controllable": { "type": "STRING" },
                        "uncontrollable": { "type": "STRING" }
                    },
                    "required": ["insight", "controllable", "uncontrollable"]
                }
            }
        },
        "required": ["openingScript", "tieredQuestions", "actionMatrix"]
    })
}
