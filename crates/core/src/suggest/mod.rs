//! # Similar-Item Suggestions
//!
//! Boundary to the hosted text-generation service. One attempt per request,
//! bounded by a timeout; every failure comes back as `SwapError::Service` and
//! leaves session state alone.

pub mod llm_helpers;

use crate::config::SwitchdConfig;
use crate::error::{Result, SwapError};
use crate::models::ModelConfig;
use crate::run_llm_function;
use async_trait::async_trait;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Free-text suggestions of secondhand items similar to `description`
    async fn suggest_similar(&self, description: &str) -> Result<String>;
}

/// Build the service for `config`. Without a provider key, every request
/// fails with a service error instead of reaching the network.
pub fn from_config(config: &SwitchdConfig) -> Arc<dyn SuggestionService> {
    if config.model.has_api_key() {
        Arc::new(LlmSuggestionService::new(
            config.model.clone(),
            Duration::from_secs(config.suggestion_timeout_secs),
        ))
    } else {
        tracing::warn!(
            env_var = config.model.provider.api_key_env(),
            "No API key provided, suggestions are disabled"
        );
        Arc::new(DisabledSuggestionService::new(format!(
            "no API key provided (set {})",
            config.model.provider.api_key_env()
        )))
    }
}

/// Structured reply from the model
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct SimilarItems {
    /// Short list of similar secondhand items, as readable text
    pub suggestions: String,
}

pub struct LlmSuggestionService {
    config: ModelConfig,
    timeout: Duration,
}

impl LlmSuggestionService {
    pub fn new(config: ModelConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    async fn invoke(&self, prompt: String) -> anyhow::Result<SimilarItems> {
        run_llm_function!(&self.config, SimilarItems, SYSTEM_PROMPT, prompt)
    }
}

pub fn suggestion_prompt(description: &str) -> String {
    format!("Suggest secondhand items similar to: {}", description)
}

#[async_trait]
impl SuggestionService for LlmSuggestionService {
    #[tracing::instrument(skip(self), fields(model = %self.config.model))]
    async fn suggest_similar(&self, description: &str) -> Result<String> {
        let prompt = suggestion_prompt(description);

        let reply = match tokio::time::timeout(self.timeout, self.invoke(prompt)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!("Suggestion request failed: {}", e);
                return Err(SwapError::service(e.to_string()));
            }
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Suggestion request timed out");
                return Err(SwapError::service(format!(
                    "no answer within {} seconds",
                    self.timeout.as_secs()
                )));
            }
        };

        let text = reply.suggestions.trim();
        if text.is_empty() {
            return Err(SwapError::service("empty response from model"));
        }
        Ok(text.to_string())
    }
}

/// Stand-in used when no provider key is configured
pub struct DisabledSuggestionService {
    reason: String,
}

impl DisabledSuggestionService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SuggestionService for DisabledSuggestionService {
    async fn suggest_similar(&self, _description: &str) -> Result<String> {
        Err(SwapError::service(self.reason.clone()))
    }
}

const SYSTEM_PROMPT: &str = r#"You help people on a secondhand clothing and accessories swap app.

Given a description of an item, suggest 3 to 5 similar secondhand items the
user might also like. For each, give a short name and one line on why it is
similar (style, material, season or use).

Keep it brief and practical. Do not invent prices or sellers."#;
