//! Configuration for GrokGenerator.

use alarm_core::GeneratorError;
use std::env;
use std::time::Duration;

/// Configuration for GrokGenerator.
#[derive(Debug, Clone)]
pub struct GrokGeneratorConfig {
    /// xAI API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Optional system prompt. The crate default is used when unset.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for GrokGeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.x.ai".to_string(),
            api_key: String::new(),
            model: "grok-4-1-fast".to_string(),
            system_prompt: None,
            max_tokens: Some(200),
            temperature: Some(0.2),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GrokGeneratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GROK_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GROK_API_URL` - API URL (default: https://api.x.ai)
    /// - `GROK_MODEL` - Model name (default: grok-4-1-fast)
    /// - `GROK_SYSTEM_PROMPT` - System prompt (default: built-in alarm prompt)
    /// - `GROK_MAX_TOKENS` - Max tokens (default: 200)
    /// - `GROK_TEMPERATURE` - Temperature (default: 0.2)
    /// - `GROK_TIMEOUT_SECS` - HTTP timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, GeneratorError> {
        let defaults = Self::default();

        let api_key = env::var("GROK_API_KEY")
            .map_err(|_| GeneratorError::Configuration("GROK_API_KEY not set".to_string()))?;

        let api_url = env::var("GROK_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("GROK_MODEL").unwrap_or(defaults.model);

        let system_prompt = env::var("GROK_SYSTEM_PROMPT")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let max_tokens = env::var("GROK_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("GROK_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let request_timeout = env::var("GROK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            request_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GrokGeneratorConfigBuilder {
        GrokGeneratorConfigBuilder::default()
    }
}

/// Builder for GrokGeneratorConfig.
#[derive(Debug, Default)]
pub struct GrokGeneratorConfigBuilder {
    config: GrokGeneratorConfig,
}

impl GrokGeneratorConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GrokGeneratorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GrokGeneratorConfig::default();

        assert_eq!(config.api_url, "https://api.x.ai");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "grok-4-1-fast");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, Some(200));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_all_options() {
        let config = GrokGeneratorConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("grok-4")
            .system_prompt("Describe alarms")
            .max_tokens(64)
            .temperature(0.5)
            .request_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "grok-4");
        assert_eq!(config.system_prompt, Some("Describe alarms".to_string()));
        assert_eq!(config.max_tokens, Some(64));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_grok_vars() {
            for var in [
                "GROK_API_KEY",
                "GROK_API_URL",
                "GROK_MODEL",
                "GROK_SYSTEM_PROMPT",
                "GROK_MAX_TOKENS",
                "GROK_TEMPERATURE",
                "GROK_TIMEOUT_SECS",
            ] {
                std::env::remove_var(var);
            }
        }

        // Missing API key should error
        clear_all_grok_vars();
        match GrokGeneratorConfig::from_env() {
            Err(GeneratorError::Configuration(msg)) => assert!(msg.contains("GROK_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        clear_all_grok_vars();
        std::env::set_var("GROK_API_KEY", "test-env-key");
        let config = GrokGeneratorConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.model, "grok-4-1-fast");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, Some(200));

        // All vars set
        std::env::set_var("GROK_API_URL", "https://test.api.com");
        std::env::set_var("GROK_MODEL", "grok-4");
        std::env::set_var("GROK_SYSTEM_PROMPT", "Test prompt");
        std::env::set_var("GROK_MAX_TOKENS", "80");
        std::env::set_var("GROK_TEMPERATURE", "0.9");
        std::env::set_var("GROK_TIMEOUT_SECS", "7");
        let config = GrokGeneratorConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "grok-4");
        assert_eq!(config.system_prompt, Some("Test prompt".to_string()));
        assert_eq!(config.max_tokens, Some(80));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.request_timeout, Duration::from_secs(7));

        clear_all_grok_vars();
    }
}
