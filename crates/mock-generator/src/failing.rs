//! Failing generator implementation - never produces text.

use std::sync::atomic::{AtomicUsize, Ordering};

use alarm_core::{async_trait, DescriptionRequest, GeneratorError, TextGenerator};

/// A generator that answers every request with `GeneratorError::Unavailable`.
///
/// An optional name filter makes it fail only for matching alarms, so tests
/// can check that one failure does not affect the others.
#[derive(Debug, Default)]
pub struct FailingGenerator {
    only_for: Option<String>,
    calls: AtomicUsize,
}

impl FailingGenerator {
    /// Create a generator that fails every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that fails only for `alarm_name` and echoes the
    /// name back for every other alarm.
    pub fn only_for(alarm_name: impl Into<String>) -> Self {
        Self {
            only_for: Some(alarm_name.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.only_for {
            Some(name) if *name != request.alarm_name => {
                Ok(format!("Generated for {}", request.alarm_name))
            }
            _ => Err(GeneratorError::Unavailable("mock generator offline".to_string())),
        }
    }

    fn name(&self) -> &str {
        "FailingGenerator"
    }

    async fn is_ready(&self) -> bool {
        self.only_for.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarm_core::{Alarm, AlarmHistory};

    fn request(name: &str) -> DescriptionRequest {
        let now = chrono::Utc::now();
        DescriptionRequest::from_alarm(&Alarm::metric(name, AlarmHistory::empty(now, now)))
    }

    #[tokio::test]
    async fn test_always_fails() {
        let generator = FailingGenerator::new();
        let result = generator.generate(&request("cpu")).await;

        assert!(matches!(result, Err(GeneratorError::Unavailable(_))));
        assert_eq!(generator.calls(), 1);
        assert!(!generator.is_ready().await);
    }

    #[tokio::test]
    async fn test_fails_only_for_named_alarm() {
        let generator = FailingGenerator::only_for("bad");

        assert!(generator.generate(&request("bad")).await.is_err());
        assert_eq!(
            generator.generate(&request("good")).await.unwrap(),
            "Generated for good"
        );
        assert_eq!(generator.calls(), 2);
    }
}
