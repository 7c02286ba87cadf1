use std::sync::Arc;

use crate::generation::prompts::PromptTemplates;
use crate::llm_client::ResilientGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Generation entry point with primary/secondary credential failover.
    pub llm: ResilientGenerator,
    /// Intent → prompt template mapping (built-ins, optionally overridden from JSON).
    pub templates: Arc<PromptTemplates>,
}
