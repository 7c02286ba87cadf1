// Generation sections: campaign strategy, sales pitch, lead advisory.
// All LLM calls go through llm_client, never straight to Gemini.

pub mod forms;
pub mod handlers;
pub mod prompts;
