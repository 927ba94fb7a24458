//! Description suggestions.

use std::sync::Arc;
use std::time::Duration;

use alarm_core::{async_trait, Alarm, DescriptionRequest, GeneratorError, TextGenerator};
use tracing::{debug, info, warn};

/// Suggested text stored when generation fails.
pub const GENERATION_FAILED: &str = "Description could not be generated.";

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// The alarm's own description, passed through.
    Existing,
    /// Drafted by the text generator.
    Generated,
    /// Generation failed; the text is [`GENERATION_FAILED`].
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub source: SuggestionSource,
}

/// Produces a suggested description for one alarm.
///
/// Never fails: generator errors and timeouts are logged and replaced by
/// [`GENERATION_FAILED`].
#[derive(Clone)]
pub struct DescriptionSuggester {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl DescriptionSuggester {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: Duration::from_secs(30),
        }
    }

    /// Bound every generation call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Whether the generator can take requests. Logs a warning when it
    /// cannot, since every missing description will then fall back.
    pub async fn check_ready(&self) -> bool {
        let ready = self.generator.is_ready().await;
        if ready {
            info!(generator = self.generator.name(), "Text generator ready");
        } else {
            warn!(
                generator = self.generator.name(),
                "Text generator not ready, missing descriptions will use the fallback text"
            );
        }
        ready
    }

    /// The suggested description text.
    pub async fn suggest(&self, alarm: &Alarm) -> String {
        self.suggestion(alarm).await.text
    }

    /// The suggestion together with its source.
    pub async fn suggestion(&self, alarm: &Alarm) -> Suggestion {
        if alarm.has_description() {
            return Suggestion {
                text: alarm.description.clone(),
                source: SuggestionSource::Existing,
            };
        }

        let request = DescriptionRequest::from_alarm(alarm);
        let result = match tokio::time::timeout(self.timeout, self.generator.generate(&request)).await {
            Ok(result) => result,
            Err(_) => Err(GeneratorError::Timeout),
        };

        match result {
            Ok(text) => {
                debug!(alarm = %alarm.name, "Generated description");
                Suggestion {
                    text,
                    source: SuggestionSource::Generated,
                }
            }
            Err(e) => {
                warn!(
                    alarm = %alarm.name,
                    generator = self.generator.name(),
                    error = %e,
                    "Description generation failed"
                );
                Suggestion {
                    text: GENERATION_FAILED.to_string(),
                    source: SuggestionSource::Fallback,
                }
            }
        }
    }
}

/// Generator used when text generation is switched off.
#[derive(Debug, Default, Clone)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _request: &DescriptionRequest) -> Result<String, GeneratorError> {
        Err(GeneratorError::Unavailable("text generation is disabled".to_string()))
    }

    fn name(&self) -> &str {
        "disabled"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}
