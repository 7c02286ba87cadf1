//! Credential failover around a `TextGenerator`.
//!
//! Flow: primary key → (quota error + secondary configured) → secondary key, once.
//! Every path ends in displayable text; nothing is thrown to the caller.
//! The credential is chosen per call, so a failover never outlives the call that made it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{LlmError, TextGenerator};

/// Which configured credential produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    Primary,
    Secondary,
}

/// Outcome of a resilient generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { text: String, credential: Credential },
    Failure { message: String },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn credential(&self) -> Option<Credential> {
        match self {
            GenerationResult::Success { credential, .. } => Some(*credential),
            GenerationResult::Failure { .. } => None,
        }
    }

    /// The text to show the user: model output, or the formatted error.
    pub fn into_text(self) -> String {
        match self {
            GenerationResult::Success { text, .. } => text,
            GenerationResult::Failure { message } => message,
        }
    }
}

/// Quota / rate-limit detection on the error's textual form.
pub fn is_quota_error(err: &LlmError) -> bool {
    let description = err.to_string().to_lowercase();
    description.contains("429") || description.contains("quota")
}

fn failure_text(err: &LlmError) -> String {
    format!("Error generating response: {err}")
}

/// Generation entry point used by every handler.
#[derive(Clone)]
pub struct ResilientGenerator {
    generator: Arc<dyn TextGenerator>,
    primary_key: String,
    secondary_key: Option<String>,
}

impl ResilientGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        primary_key: String,
        secondary_key: Option<String>,
    ) -> Self {
        Self {
            generator,
            primary_key,
            secondary_key,
        }
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary_key.is_some()
    }

    /// Generates text for `prompt`, failing over to the secondary key once on quota errors.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        let primary_err = match self.generator.generate(prompt, &self.primary_key).await {
            Ok(text) => {
                return GenerationResult::Success {
                    text,
                    credential: Credential::Primary,
                }
            }
            Err(e) => e,
        };

        if !is_quota_error(&primary_err) {
            warn!("Generation failed: {primary_err}");
            return GenerationResult::Failure {
                message: failure_text(&primary_err),
            };
        }

        let Some(secondary_key) = self.secondary_key.as_deref() else {
            warn!("Primary key hit its quota and no secondary key is configured");
            return GenerationResult::Failure {
                message: failure_text(&primary_err),
            };
        };

        info!("Primary key hit its quota, retrying with secondary key");

        match self.generator.generate(prompt, secondary_key).await {
            Ok(text) => GenerationResult::Success {
                text,
                credential: Credential::Secondary,
            },
            Err(secondary_err) => {
                warn!("Secondary key also failed: {secondary_err}");
                GenerationResult::Failure {
                    message: failure_text(&primary_err),
                }
            }
        }
    }
}
