//! Core types and traits for the alarm health report.
//!
//! This crate provides the shared vocabulary between the evaluation job and
//! the dashboard widgets. It defines:
//!
//! - [`Alarm`] - An alarm definition together with its observed state history
//! - [`IssueTag`] - The closed taxonomy of alarm health issues and their labels
//! - [`TextGenerator`] - The trait external description generators implement
//! - [`GeneratorError`] - Error types for text generation
//!
//! # Example
//!
//! ```rust
//! use alarm_core::{async_trait, DescriptionRequest, GeneratorError, TextGenerator};
//!
//! struct CannedGenerator;
//!
//! #[async_trait]
//! impl TextGenerator for CannedGenerator {
//!     async fn generate(&self, request: &DescriptionRequest) -> Result<String, GeneratorError> {
//!         Ok(format!("Watches {}", request.alarm_name))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedGenerator"
//!     }
//! }
//! ```

mod alarm;
mod error;
mod generator;
mod issue;
mod prompt;

pub use alarm::{Alarm, AlarmEpisode, AlarmHistory, AlarmKind, AlarmState, StateTransition};
pub use error::GeneratorError;
pub use generator::{DescriptionRequest, TextGenerator};
pub use issue::{IssueTag, UnknownIssueTag};
pub use prompt::{description_prompt, hash_prompt, DEFAULT_SYSTEM_PROMPT};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
