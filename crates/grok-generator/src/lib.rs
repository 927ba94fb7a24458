//! xAI Grok-based description generator.
//!
//! This crate provides a [`TextGenerator`] that asks an OpenAI-compatible
//! chat completion endpoint (xAI by default) to draft a description for an
//! alarm that has none.
//!
//! # Usage
//!
//! ```rust,no_run
//! use grok_generator::GrokGenerator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GrokGenerator::from_env()?;
//!     // Hand the generator to the description suggester...
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod generator;

pub use config::{GrokGeneratorConfig, GrokGeneratorConfigBuilder};
pub use generator::GrokGenerator;

// Re-export alarm-core types for convenience
pub use alarm_core::{async_trait, DescriptionRequest, GeneratorError, TextGenerator};
