//! Alarm health evaluation.
//!
//! Reads every alarm and its recent state history from an [`AlarmSource`],
//! classifies each alarm against the issue taxonomy, drafts descriptions for
//! alarms that lack one and publishes the result to a report store.
//!
//! ```text
//! AlarmSource ──► AlarmMetadataReader ──► IssueClassifier ─┐
//!                                                          ├─► ReportAssembler ──► ReportStore
//!                             DescriptionSuggester ────────┘
//! ```

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod job;
pub mod source;
pub mod suggester;

pub use assembler::{Assembly, ReportAssembler};
pub use classifier::IssueClassifier;
pub use config::{ClassifierConfig, ConfigError, DescriptionScope, EvaluatorConfig, GeneratorBackend};
pub use job::{EvaluationError, EvaluationJob, RunSummary};
pub use source::{AlarmMetadataReader, AlarmSource, CloudWatchSource, SourceError, StaticAlarmSource};
pub use suggester::{DescriptionSuggester, DisabledGenerator, Suggestion, SuggestionSource, GENERATION_FAILED};
