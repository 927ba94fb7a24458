//! Mock text generators for the alarm description pipeline.
//!
//! This crate provides mock implementations of the `TextGenerator` trait for testing:
//! - `FixedGenerator` - Answers with a template filled in with the alarm name
//! - `FailingGenerator` - Always fails, for exercising fallback paths
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! Every mock counts the requests it receives so tests can assert on
//! whether the external capability was called at all.
//!
//! For real descriptions, use the `grok-generator` crate instead.
//!
//! # Example
//!
//! ```rust
//! use alarm_core::{Alarm, AlarmHistory, DescriptionRequest};
//! use mock_generator::{FixedGenerator, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_generator::GeneratorError> {
//!     let generator = FixedGenerator::new("Watches {name}");
//!     let now = chrono::Utc::now();
//!     let alarm = Alarm::metric("cpu-high", AlarmHistory::empty(now, now));
//!
//!     let text = generator.generate(&DescriptionRequest::from_alarm(&alarm)).await?;
//!     assert_eq!(text, "Watches cpu-high");
//!     Ok(())
//! }
//! ```

mod delayed;
mod failing;
mod fixed;

// Re-export alarm-core types for convenience
pub use alarm_core::{async_trait, DescriptionRequest, GeneratorError, TextGenerator};

// Export mock implementations
pub use delayed::DelayedGenerator;
pub use failing::FailingGenerator;
pub use fixed::FixedGenerator;
