//! The text generation capability used to draft alarm descriptions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::alarm::{Alarm, AlarmKind};
use crate::error::GeneratorError;

/// The alarm fields a generator may look at.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionRequest {
    pub alarm_name: String,
    pub kind: AlarmKind,
    pub metric_name: Option<String>,
    pub namespace: Option<String>,
    pub threshold: Option<f64>,
    pub comparison_operator: Option<String>,
    pub alarm_rule: Option<String>,
}

impl DescriptionRequest {
    /// Build a request from an alarm definition.
    pub fn from_alarm(alarm: &Alarm) -> Self {
        Self {
            alarm_name: alarm.name.clone(),
            kind: alarm.kind,
            metric_name: alarm.metric_name.clone(),
            namespace: alarm.namespace.clone(),
            threshold: alarm.threshold,
            comparison_operator: alarm.comparison_operator.clone(),
            alarm_rule: alarm.alarm_rule.clone(),
        }
    }
}

/// A trait for producing a short description of an alarm.
///
/// Implementations can range from canned test stubs to hosted language
/// models. This trait is object-safe and can be used with `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a description for the alarm in `request`.
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError>;

    /// Get a human-readable name for this generator implementation.
    fn name(&self) -> &str;

    /// Check if the generator is ready to take requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}

#[async_trait]
impl<G: TextGenerator + ?Sized> TextGenerator for Arc<G> {
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError> {
        (**self).generate(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn is_ready(&self) -> bool {
        (**self).is_ready().await
    }
}
