// Stay interview guide: wizard answers in, coaching guide out.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod builder;
pub mod export;
pub mod handlers;
pub mod handoff;
pub mod models;
pub mod options;
pub mod orchestrator;
pub mod prompts;
