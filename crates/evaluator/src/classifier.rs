//! Issue classification.
//!
//! Every rule is a pure function of one alarm and the thresholds in
//! [`ClassifierConfig`]. Rules are independent: an alarm can match any
//! subset of [`IssueTag::ALL`]. Time is measured against the end of the
//! alarm's history window, never the wall clock.

use std::collections::BTreeSet;

use alarm_core::{Alarm, AlarmKind, AlarmState, IssueTag};
use chrono::{DateTime, NaiveDate, Utc};

use crate::config::ClassifierConfig;

/// Applies the issue rules to alarms.
#[derive(Debug, Clone, Default)]
pub struct IssueClassifier {
    config: ClassifierConfig,
}

impl IssueClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Every tag `alarm` matches.
    pub fn classify(&self, alarm: &Alarm) -> BTreeSet<IssueTag> {
        IssueTag::ALL
            .into_iter()
            .filter(|tag| self.matches(*tag, alarm))
            .collect()
    }

    /// Whether `alarm` matches a single tag.
    pub fn matches(&self, tag: IssueTag, alarm: &Alarm) -> bool {
        match tag {
            IssueTag::NoDescription => !alarm.has_description(),
            IssueTag::NoActions => self.has_no_actions(alarm),
            IssueTag::LongLivedAlarmCount => self.is_long_lived(alarm),
            IssueTag::HighDataPoints => alarm
                .required_datapoints()
                .is_some_and(|n| n > self.config.max_datapoints_to_alarm),
            IssueTag::RecurringIn12HoursCount => self.is_recurring(alarm),
            IssueTag::LongTermIssueCount => self.is_long_term(alarm),
            IssueTag::ShortAlarmCount => self.has_short_episode(alarm),
            IssueTag::HighThreshold => self.never_fires(alarm),
        }
    }

    fn has_no_actions(&self, alarm: &Alarm) -> bool {
        if self.config.exempt_composite_children && alarm.composite_child {
            return false;
        }
        alarm.actions.is_empty()
    }

    /// The most recent episode lasted longer than the long-lived threshold.
    /// A still open episode is measured up to the end of the window.
    fn is_long_lived(&self, alarm: &Alarm) -> bool {
        alarm
            .history
            .episodes(alarm.state)
            .last()
            .is_some_and(|episode| {
                episode.duration(alarm.history.window_end) > self.config.long_lived_after
            })
    }

    /// At least `recurrence_min_count` onsets fit inside one recurrence window.
    fn is_recurring(&self, alarm: &Alarm) -> bool {
        let onsets: Vec<DateTime<Utc>> = alarm.history.alarm_onsets().collect();
        let needed = self.config.recurrence_min_count.max(1);

        onsets
            .windows(needed)
            .any(|w| w[needed - 1] - w[0] <= self.config.recurrence_window)
    }

    /// Onsets on each of the last `long_term_days` UTC calendar days. The run
    /// ends on the window's final day, or on the day before while the final
    /// day is still in progress.
    fn is_long_term(&self, alarm: &Alarm) -> bool {
        let needed = self.config.long_term_days.max(1);
        let days: BTreeSet<NaiveDate> = alarm
            .history
            .alarm_onsets()
            .map(|ts| ts.date_naive())
            .collect();

        let last_day = alarm.history.window_end.date_naive();
        [Some(last_day), last_day.pred_opt()]
            .into_iter()
            .flatten()
            .any(|end| {
                std::iter::successors(Some(end), NaiveDate::pred_opt)
                    .take(needed as usize)
                    .all(|day| days.contains(&day))
            })
    }

    /// Some episode fully observed in the window resolved to `OK` quickly.
    fn has_short_episode(&self, alarm: &Alarm) -> bool {
        alarm
            .history
            .episodes(alarm.state)
            .iter()
            .filter(|episode| !episode.truncated && episode.resolved_ok())
            .any(|episode| {
                episode.duration(alarm.history.window_end) < self.config.short_alarm_under
            })
    }

    /// A metric alarm old enough to have fired that spent no time in `ALARM`
    /// during the window. Alarms with an unknown configuration age count as
    /// old enough.
    fn never_fires(&self, alarm: &Alarm) -> bool {
        if alarm.kind != AlarmKind::Metric || alarm.state == AlarmState::Alarm {
            return false;
        }
        if !alarm.history.episodes(alarm.state).is_empty() {
            return false;
        }

        let age = alarm
            .configuration_updated
            .map(|updated| alarm.history.window_end - updated);
        age.map_or(true, |age| age >= self.config.high_threshold_min_age)
    }
}
