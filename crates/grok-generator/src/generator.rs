//! GrokGenerator implementation using xAI API.

use alarm_core::{
    async_trait, description_prompt, hash_prompt, DescriptionRequest, GeneratorError,
    TextGenerator, DEFAULT_SYSTEM_PROMPT,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::GrokGeneratorConfig;

/// A text generator that uses xAI's Grok API to draft alarm descriptions.
///
/// Each request is independent; no conversation state is kept between alarms.
pub struct GrokGenerator {
    client: Client,
    config: GrokGeneratorConfig,
    system_prompt_hash: String,
}

impl GrokGenerator {
    /// Create a new GrokGenerator with the given configuration.
    pub fn new(config: GrokGeneratorConfig) -> Result<Self, GeneratorError> {
        if config.api_key.trim().is_empty() {
            return Err(GeneratorError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GeneratorError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let system_prompt_hash = hash_prompt(system_prompt(&config));
        info!(
            "GrokGenerator initialized with model: {}, system prompt fingerprint: {}",
            config.model, system_prompt_hash
        );

        Ok(Self {
            client,
            config,
            system_prompt_hash,
        })
    }

    /// Create a GrokGenerator from environment variables.
    ///
    /// See [`GrokGeneratorConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, GeneratorError> {
        let config = GrokGeneratorConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GrokGeneratorConfig {
        &self.config
    }

    /// Get the system prompt fingerprint.
    pub fn system_prompt_hash(&self) -> &str {
        &self.system_prompt_hash
    }

    /// Build the chat completion request for one alarm.
    fn build_request(&self, request: &DescriptionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt(&self.config)),
                ChatMessage::user(description_prompt(request)),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for GrokGenerator {
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError> {
        debug!(alarm = %request.alarm_name, model = %self.config.model, "Requesting description");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection(status.as_u16(), &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::GenerationFailed(format!("unreadable completion: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                alarm = %request.alarm_name,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        extract_text(completion)
    }

    fn name(&self) -> &str {
        "GrokGenerator"
    }
}

fn system_prompt(config: &GrokGeneratorConfig) -> &str {
    config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Error for a non-success response. The API's own message is used when the
/// body carries one.
fn rejection(status: u16, body: &str) -> GeneratorError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    GeneratorError::GenerationFailed(format!("xAI API returned {}: {}", status, message))
}

/// Pull the first non-empty answer out of a completion.
fn extract_text(completion: ChatCompletionResponse) -> Result<String, GeneratorError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(GeneratorError::EmptyResponse)
}
