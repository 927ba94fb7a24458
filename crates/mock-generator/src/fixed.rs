//! Fixed generator implementation - answers from a template.

use std::sync::atomic::{AtomicUsize, Ordering};

use alarm_core::{async_trait, DescriptionRequest, GeneratorError, TextGenerator};

/// A generator that fills `{name}` in a template with the alarm name.
///
/// Useful for testing the pipeline without any model endpoint.
#[derive(Debug, Default)]
pub struct FixedGenerator {
    template: String,
    calls: AtomicUsize,
}

impl FixedGenerator {
    /// Create a generator answering with `template`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_generator::FixedGenerator;
    ///
    /// let generator = FixedGenerator::new("Suggested for {name}");
    /// // Will respond with "Suggested for <alarm name>"
    /// ```
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.template.replace("{name}", &request.alarm_name))
    }

    fn name(&self) -> &str {
        "FixedGenerator"
    }
}
