//! # LLM Helpers
//!
//! Provider dispatch for one-shot LLM functions. Each provider client is
//! built from its environment key, so the match lives in one place.

/// Run an `LlmFunction` producing `$output_type` with whichever provider the
/// `ModelConfig` names. Must be expanded inside an async fn returning
/// `anyhow::Result`.
#[macro_export]
macro_rules! run_llm_function {
    (@call $llm:expr, $output_type:ty, $system_prompt:expr, $input:expr) => {
        radkit::agent::LlmFunction::<$output_type>::new_with_system_instructions(
            $llm,
            $system_prompt,
        )
        .run($input)
        .await
        .map_err(Into::into)
    };
    ($config:expr, $output_type:ty, $system_prompt:expr, $input:expr) => {{
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config = $config;
        let result: anyhow::Result<$output_type> = match config.provider {
            LlmProvider::OpenAI => {
                let mut llm = OpenAILlm::from_env(&config.model)?;
                if let Some(base_url) = &config.base_url {
                    llm = llm.with_base_url(base_url);
                }
                $crate::run_llm_function!(@call llm, $output_type, $system_prompt, $input)
            }
            LlmProvider::Anthropic => $crate::run_llm_function!(
                @call AnthropicLlm::from_env(&config.model)?, $output_type, $system_prompt, $input
            ),
            LlmProvider::Gemini => $crate::run_llm_function!(
                @call GeminiLlm::from_env(&config.model)?, $output_type, $system_prompt, $input
            ),
            LlmProvider::OpenRouter => $crate::run_llm_function!(
                @call OpenRouterLlm::from_env(&config.model)?, $output_type, $system_prompt, $input
            ),
            LlmProvider::Grok => $crate::run_llm_function!(
                @call GrokLlm::from_env(&config.model)?, $output_type, $system_prompt, $input
            ),
            LlmProvider::DeepSeek => $crate::run_llm_function!(
                @call DeepSeekLlm::from_env(&config.model)?, $output_type, $system_prompt, $input
            ),
        };
        result
    }};
}

pub use run_llm_function;
