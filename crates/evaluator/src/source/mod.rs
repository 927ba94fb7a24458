//! Alarm definitions and state history.
//!
//! [`AlarmSource`] is the seam to the monitoring service. The evaluator only
//! ever talks to it through [`AlarmMetadataReader`], which pairs every
//! definition with its history over the configured window.

mod cloudwatch;
mod history;
mod rule;

use std::collections::HashSet;
use std::sync::Arc;

use alarm_core::{async_trait, Alarm, AlarmHistory, AlarmKind, StateTransition};
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, info};

pub use cloudwatch::CloudWatchSource;
pub use history::decode_history_data;
pub use rule::rule_references;

/// Errors raised while reading from the alarm source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{operation} failed: {code}: {message}")]
    Api {
        operation: &'static str,
        code: String,
        message: String,
    },

    #[error("Alarm returned without a name")]
    MissingName,

    #[error("Unknown alarm: {0}")]
    UnknownAlarm(String),
}

/// Read access to alarm definitions and their state history.
#[async_trait]
pub trait AlarmSource: Send + Sync {
    /// Every metric and composite alarm in the region.
    ///
    /// The returned alarms carry an empty history; the reader fills it in.
    async fn describe_alarms(&self) -> Result<Vec<Alarm>, SourceError>;

    /// State transitions of one alarm between `start` and `end`.
    async fn state_history(
        &self,
        alarm_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransition>, SourceError>;
}

#[async_trait]
impl<S: AlarmSource + ?Sized> AlarmSource for Arc<S> {
    async fn describe_alarms(&self) -> Result<Vec<Alarm>, SourceError> {
        (**self).describe_alarms().await
    }

    async fn state_history(
        &self,
        alarm_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransition>, SourceError> {
        (**self).state_history(alarm_name, start, end).await
    }
}

/// Assembles complete [`Alarm`] values from an [`AlarmSource`].
pub struct AlarmMetadataReader<S> {
    source: S,
    history_window: Duration,
    concurrency: usize,
}

impl<S: AlarmSource> AlarmMetadataReader<S> {
    pub fn new(source: S, history_window: Duration) -> Self {
        Self {
            source,
            history_window,
            concurrency: 4,
        }
    }

    /// Limit concurrent history reads.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Read every alarm with its history over the window ending at `now`.
    ///
    /// Any source failure aborts the whole read; a partial alarm list is
    /// never returned.
    pub async fn read_all(&self, now: DateTime<Utc>) -> Result<Vec<Alarm>, SourceError> {
        let window_start = now - self.history_window;
        let mut alarms = self.source.describe_alarms().await?;
        mark_composite_children(&mut alarms);

        info!(
            alarms = alarms.len(),
            since = %window_start,
            "Read alarm definitions, fetching history"
        );

        let histories: Vec<Vec<StateTransition>> = stream::iter(alarms.iter())
            .map(|alarm| self.source.state_history(&alarm.name, window_start, now))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        for (alarm, transitions) in alarms.iter_mut().zip(histories) {
            debug!(alarm = %alarm.name, transitions = transitions.len(), "History read");
            alarm.history = AlarmHistory::new(window_start, now, transitions);
        }

        Ok(alarms)
    }
}

/// Flag alarms that appear in some composite alarm's rule.
pub fn mark_composite_children(alarms: &mut [Alarm]) {
    let referenced: HashSet<String> = alarms
        .iter()
        .filter(|alarm| alarm.kind == AlarmKind::Composite)
        .filter_map(|alarm| alarm.alarm_rule.as_deref())
        .flat_map(rule_references)
        .collect();

    for alarm in alarms.iter_mut() {
        alarm.composite_child = referenced.contains(&alarm.name);
    }
}

/// An in-memory alarm source.
///
/// Useful for dry runs and tests: alarms are returned as given and their
/// history is clipped to the requested window.
#[derive(Debug, Clone, Default)]
pub struct StaticAlarmSource {
    alarms: Vec<Alarm>,
    fail_history_for: Option<String>,
}

impl StaticAlarmSource {
    pub fn new(alarms: Vec<Alarm>) -> Self {
        Self {
            alarms,
            fail_history_for: None,
        }
    }

    /// Make history reads for `alarm_name` fail.
    pub fn failing_history_for(mut self, alarm_name: impl Into<String>) -> Self {
        self.fail_history_for = Some(alarm_name.into());
        self
    }
}

#[async_trait]
impl AlarmSource for StaticAlarmSource {
    async fn describe_alarms(&self) -> Result<Vec<Alarm>, SourceError> {
        Ok(self.alarms.clone())
    }

    async fn state_history(
        &self,
        alarm_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransition>, SourceError> {
        if self.fail_history_for.as_deref() == Some(alarm_name) {
            return Err(SourceError::Api {
                operation: "DescribeAlarmHistory",
                code: "Throttling".to_string(),
                message: "Rate exceeded".to_string(),
            });
        }

        let alarm = self
            .alarms
            .iter()
            .find(|alarm| alarm.name == alarm_name)
            .ok_or_else(|| SourceError::UnknownAlarm(alarm_name.to_string()))?;

        Ok(alarm
            .history
            .transitions
            .iter()
            .filter(|t| t.timestamp >= start && t.timestamp <= end)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarm_core::AlarmState;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn alarm_with(name: &str, transitions: Vec<StateTransition>) -> Alarm {
        Alarm::metric(name, AlarmHistory::new(now(), now(), transitions))
    }

    #[tokio::test]
    async fn test_reader_attaches_windowed_history() {
        let inside = StateTransition::new(now() - Duration::days(1), AlarmState::Ok, AlarmState::Alarm);
        let outside = StateTransition::new(now() - Duration::days(30), AlarmState::Ok, AlarmState::Alarm);
        let source = StaticAlarmSource::new(vec![
            alarm_with("a", vec![inside.clone(), outside]),
            alarm_with("b", vec![]),
        ]);

        let reader = AlarmMetadataReader::new(source, Duration::days(14));
        let alarms = reader.read_all(now()).await.unwrap();

        assert_eq!(alarms.len(), 2);
        assert_eq!(alarms[0].name, "a");
        assert_eq!(alarms[0].history.transitions, vec![inside]);
        assert_eq!(alarms[0].history.window_start, now() - Duration::days(14));
        assert_eq!(alarms[0].history.window_end, now());
        assert!(alarms[1].history.transitions.is_empty());
    }

    #[tokio::test]
    async fn test_reader_attaches_composite_history() {
        let onset = StateTransition::new(now() - Duration::hours(2), AlarmState::Ok, AlarmState::Alarm);
        let mut composite = Alarm::composite(
            "api-degraded",
            r#"ALARM("api-errors")"#,
            AlarmHistory::new(now(), now(), vec![onset.clone()]),
        );
        composite.state = AlarmState::Alarm;
        let source = StaticAlarmSource::new(vec![composite]);

        let alarms = AlarmMetadataReader::new(source, Duration::days(14))
            .read_all(now())
            .await
            .unwrap();

        assert_eq!(alarms[0].history.transitions, vec![onset]);
        let episodes = alarms[0].history.episodes(alarms[0].state);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].start, now() - Duration::hours(2));
        assert!(!episodes[0].truncated);
    }

    #[tokio::test]
    async fn test_reader_fails_fast() {
        let source = StaticAlarmSource::new(vec![alarm_with("a", vec![]), alarm_with("b", vec![])])
            .failing_history_for("b");

        let reader = AlarmMetadataReader::new(source, Duration::days(14)).with_concurrency(1);
        let err = reader.read_all(now()).await.unwrap_err();
        assert!(matches!(err, SourceError::Api { operation: "DescribeAlarmHistory", .. }));
    }

    #[test]
    fn test_mark_composite_children() {
        let empty = AlarmHistory::empty(now(), now());
        let mut alarms = vec![
            Alarm::metric("api-errors", empty.clone()),
            Alarm::metric("api-latency", empty.clone()),
            Alarm::metric("db-cpu", empty.clone()),
            Alarm::composite(
                "api-degraded",
                r#"ALARM("api-errors") OR ALARM(api-latency)"#,
                empty,
            ),
        ];

        mark_composite_children(&mut alarms);

        let children: Vec<_> = alarms
            .iter()
            .filter(|a| a.composite_child)
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(children, vec!["api-errors", "api-latency"]);
    }
}
