//! # Config API
//!
//! Read and patch runtime settings. A patch is saved to `config.json` and
//! the suggestion service is rebuilt so the new provider applies at once.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use switchd_core::config::{ConfigPatch, SwitchdConfig};
use switchd_core::models::{LlmProvider, ModelConfig};
use switchd_core::{suggest, SwapError};
use utoipa::ToSchema;

use super::{ApiResult, ErrorResponse};
use crate::SharedState;

const MAX_PICKUP_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigBody {
    /// openai, anthropic, gemini, openrouter, grok or deepseek
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub item_price: u64,
    pub pickup_window_days: u32,
    pub suggestion_timeout_secs: u64,
}

impl From<&SwitchdConfig> for ConfigBody {
    fn from(config: &SwitchdConfig) -> Self {
        Self {
            provider: provider_key(config.model.provider),
            model: config.model.model.clone(),
            base_url: config.model.base_url.clone(),
            item_price: config.item_price,
            pickup_window_days: config.pickup_window_days,
            suggestion_timeout_secs: config.suggestion_timeout_secs,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub config: ConfigBody,
    pub defaults: ConfigBody,
    /// Whether the configured provider has an API key in the environment
    pub suggestions_enabled: bool,
}

impl ConfigResponse {
    fn new(config: &SwitchdConfig) -> Self {
        Self {
            config: config.into(),
            defaults: (&SwitchdConfig::default()).into(),
            suggestions_enabled: config.model.has_api_key(),
        }
    }
}

/// Partial update; omitted fields keep their current value
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ConfigUpdateRequest {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub item_price: Option<u64>,
    pub pickup_window_days: Option<u32>,
    pub suggestion_timeout_secs: Option<u64>,
}

impl ConfigUpdateRequest {
    /// Resolve against `current`, rejecting values the session cannot use
    fn into_patch(self, current: &SwitchdConfig) -> Result<ConfigPatch, SwapError> {
        let model = if self.provider.is_some() || self.model.is_some() || self.base_url.is_some() {
            let mut model: ModelConfig = current.model.clone();
            if let Some(provider) = self.provider {
                model.provider = parse_provider(&provider)?;
            }
            if let Some(name) = self.model {
                if name.trim().is_empty() {
                    return Err(SwapError::validation("model name must not be empty"));
                }
                model.model = name;
            }
            if let Some(url) = self.base_url {
                model.base_url = Some(url).filter(|u| !u.trim().is_empty());
            }
            Some(model)
        } else {
            None
        };

        if let Some(days) = self.pickup_window_days {
            if !(1..=MAX_PICKUP_WINDOW_DAYS).contains(&days) {
                return Err(SwapError::validation(format!(
                    "pickup window must be between 1 and {} days",
                    MAX_PICKUP_WINDOW_DAYS
                )));
            }
        }
        if let Some(price) = self.item_price {
            if i64::try_from(price).is_err() {
                return Err(SwapError::validation(format!(
                    "item price must be at most {}",
                    i64::MAX
                )));
            }
        }
        if self.suggestion_timeout_secs == Some(0) {
            return Err(SwapError::validation("suggestion timeout must be at least one second"));
        }

        Ok(ConfigPatch {
            model,
            item_price: self.item_price,
            pickup_window_days: self.pickup_window_days,
            suggestion_timeout_secs: self.suggestion_timeout_secs,
        })
    }
}

fn provider_key(provider: LlmProvider) -> String {
    serde_json::to_value(provider)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| provider.display_name().to_lowercase())
}

fn parse_provider(name: &str) -> Result<LlmProvider, SwapError> {
    serde_json::from_value(serde_json::Value::String(name.trim().to_lowercase()))
        .map_err(|_| SwapError::validation(format!("unknown provider '{}'", name)))
}

/// Get current configuration and defaults
#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "config",
    responses(
        (status = 200, description = "Current configuration", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    let session = state.session.lock().await;
    Json(ConfigResponse::new(session.config()))
}

/// Update configuration (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/config",
    tag = "config",
    request_body = ConfigUpdateRequest,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigResponse),
        (status = 422, description = "Unknown provider or out-of-range value", body = ErrorResponse),
        (status = 500, description = "Config could not be saved", body = ErrorResponse)
    )
)]
pub async fn update_config(
    State(state): State<SharedState>,
    Json(req): Json<ConfigUpdateRequest>,
) -> ApiResult<ConfigResponse> {
    let mut session = state.session.lock().await;
    let mut config = session.config().clone();
    config.merge(req.into_patch(&config)?);

    if let Err(e) = config.save(&state.runtime_dir).await {
        tracing::error!("Failed to save config: {:#}", e);
        return Err(SwapError::Config(format!("failed to save config: {}", e)).into());
    }

    let suggester = suggest::from_config(&config);
    session.reconfigure(config.clone(), suggester);
    tracing::info!(
        provider = config.model.provider.display_name(),
        model = %config.model.model,
        "Configuration updated"
    );

    Ok(Json(ConfigResponse::new(&config)))
}
