//! Error types for text generation.

use thiserror::Error;

/// Errors that can occur while generating a description.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator is temporarily unavailable.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The generator is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the generator.
    #[error("network error: {0}")]
    Network(String),

    /// The generator answered with an error.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The generator answered without any text.
    #[error("generator returned an empty response")]
    EmptyResponse,

    /// A timeout occurred during generation.
    #[error("generation timed out")]
    Timeout,
}
