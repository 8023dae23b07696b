//! Generative text service used for tips and the alternate plan path.

mod external;
mod gemini;
mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use external::{parse_external_plan, ExternalDay, ExternalItem, ExternalMeal, ExternalPlan};
pub use gemini::GeminiClient;
pub use prompt::{plan_prompt, tips_prompt};

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("empty response from text service")]
    EmptyResponse,
    #[error("malformed external plan: {0}")]
    MalformedExternalPlan(String),
    #[error("text service not configured")]
    NotConfigured,
}

/// Given a prompt, return free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    fn provider_name(&self) -> &'static str;
}
