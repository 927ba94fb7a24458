//! Alarm definitions and their observed state history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The state an alarm can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Ok,
    Alarm,
    InsufficientData,
}

impl AlarmState {
    /// The wire name used by CloudWatch (`OK`, `ALARM`, `INSUFFICIENT_DATA`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Ok => "OK",
            AlarmState::Alarm => "ALARM",
            AlarmState::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(AlarmState::Ok),
            "ALARM" => Ok(AlarmState::Alarm),
            "INSUFFICIENT_DATA" => Ok(AlarmState::InsufficientData),
            other => Err(format!("unknown alarm state: {}", other)),
        }
    }
}

/// Whether an alarm watches a metric or combines other alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    Metric,
    Composite,
}

/// A single state change of an alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// State before the change, when the source reports it.
    pub from: Option<AlarmState>,
    /// State after the change.
    pub to: AlarmState,
}

impl StateTransition {
    /// Create a transition between two known states.
    pub fn new(timestamp: DateTime<Utc>, from: AlarmState, to: AlarmState) -> Self {
        Self {
            timestamp,
            from: Some(from),
            to,
        }
    }
}

/// One continuous stretch of time an alarm spent in `ALARM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmEpisode {
    /// Start of the episode, or the window start if it began earlier.
    pub start: DateTime<Utc>,
    /// End of the episode, `None` if the alarm is still firing.
    pub end: Option<DateTime<Utc>>,
    /// State the alarm left `ALARM` for.
    pub resolved_to: Option<AlarmState>,
    /// True when the onset happened before the observed window.
    pub truncated: bool,
}

impl AlarmEpisode {
    /// Time spent in `ALARM`, measuring open episodes up to `until`.
    pub fn duration(&self, until: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(until) - self.start
    }

    /// Whether the episode closed with a transition back to `OK`.
    pub fn resolved_ok(&self) -> bool {
        self.resolved_to == Some(AlarmState::Ok)
    }
}

/// State transitions observed for one alarm over a bounded window.
///
/// Transitions are kept in ascending timestamp order regardless of the order
/// the source returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmHistory {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub transitions: Vec<StateTransition>,
}

impl AlarmHistory {
    pub fn new(
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        mut transitions: Vec<StateTransition>,
    ) -> Self {
        transitions.sort_by_key(|t| t.timestamp);
        Self {
            window_start,
            window_end,
            transitions,
        }
    }

    /// A history with no recorded transitions.
    pub fn empty(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self::new(window_start, window_end, Vec::new())
    }

    /// Timestamps at which the alarm entered `ALARM`.
    pub fn alarm_onsets(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.transitions
            .iter()
            .filter(|t| t.to == AlarmState::Alarm && t.from != Some(AlarmState::Alarm))
            .map(|t| t.timestamp)
    }

    /// Split the history into `ALARM` episodes.
    ///
    /// `current` is the alarm's present state; it only matters when the window
    /// holds no transitions at all, in which case an alarm currently firing is
    /// treated as having fired for the whole window.
    pub fn episodes(&self, current: AlarmState) -> Vec<AlarmEpisode> {
        let mut episodes = Vec::new();

        let Some(first) = self.transitions.first() else {
            if current == AlarmState::Alarm {
                episodes.push(AlarmEpisode {
                    start: self.window_start,
                    end: None,
                    resolved_to: None,
                    truncated: true,
                });
            }
            return episodes;
        };

        let mut open: Option<(DateTime<Utc>, bool)> = None;
        if first.from == Some(AlarmState::Alarm) && first.to != AlarmState::Alarm {
            open = Some((self.window_start, true));
        }

        for transition in &self.transitions {
            match (open, transition.to) {
                (None, AlarmState::Alarm) => open = Some((transition.timestamp, false)),
                (Some((start, truncated)), to) if to != AlarmState::Alarm => {
                    episodes.push(AlarmEpisode {
                        start,
                        end: Some(transition.timestamp),
                        resolved_to: Some(to),
                        truncated,
                    });
                    open = None;
                }
                _ => {}
            }
        }

        if let Some((start, truncated)) = open {
            episodes.push(AlarmEpisode {
                start,
                end: None,
                resolved_to: None,
                truncated,
            });
        }

        episodes
    }
}

/// An alarm definition as read from the alarm source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    /// Alarm name, unique within a region.
    pub name: String,
    /// Alarm ARN, when known.
    pub arn: Option<String>,
    /// Region the alarm lives in.
    pub region: Option<String>,
    pub kind: AlarmKind,
    /// Description, possibly empty.
    pub description: String,
    /// Actions triggered on transition to `ALARM`.
    pub actions: Vec<String>,
    pub evaluation_periods: Option<u32>,
    pub datapoints_to_alarm: Option<u32>,
    pub threshold: Option<f64>,
    pub comparison_operator: Option<String>,
    pub metric_name: Option<String>,
    pub namespace: Option<String>,
    /// Rule expression of a composite alarm.
    pub alarm_rule: Option<String>,
    /// Current state.
    pub state: AlarmState,
    /// Last time the alarm configuration changed.
    pub configuration_updated: Option<DateTime<Utc>>,
    /// True when some composite alarm's rule references this alarm.
    pub composite_child: bool,
    pub history: AlarmHistory,
}

impl Alarm {
    /// Create a metric alarm with no description, actions or thresholds.
    pub fn metric(name: impl Into<String>, history: AlarmHistory) -> Self {
        Self {
            name: name.into(),
            arn: None,
            region: None,
            kind: AlarmKind::Metric,
            description: String::new(),
            actions: Vec::new(),
            evaluation_periods: None,
            datapoints_to_alarm: None,
            threshold: None,
            comparison_operator: None,
            metric_name: None,
            namespace: None,
            alarm_rule: None,
            state: AlarmState::Ok,
            configuration_updated: None,
            composite_child: false,
            history,
        }
    }

    /// Create a composite alarm from its rule expression.
    pub fn composite(name: impl Into<String>, rule: impl Into<String>, history: AlarmHistory) -> Self {
        Self {
            kind: AlarmKind::Composite,
            alarm_rule: Some(rule.into()),
            ..Self::metric(name, history)
        }
    }

    /// Whether the description holds anything besides whitespace.
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Datapoints that must breach before the alarm fires.
    ///
    /// CloudWatch falls back to the evaluation period count when
    /// `DatapointsToAlarm` is not set.
    pub fn required_datapoints(&self) -> Option<u32> {
        self.datapoints_to_alarm.or(self.evaluation_periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, hour, minute, 0).unwrap()
    }

    fn history(transitions: Vec<StateTransition>) -> AlarmHistory {
        AlarmHistory::new(at(0, 0), at(23, 0), transitions)
    }

    #[test]
    fn test_state_round_trip_names() {
        for state in [AlarmState::Ok, AlarmState::Alarm, AlarmState::InsufficientData] {
            assert_eq!(state.as_str().parse::<AlarmState>().unwrap(), state);
        }
        assert!("BROKEN".parse::<AlarmState>().is_err());
    }

    #[test]
    fn test_history_sorts_transitions() {
        let h = history(vec![
            StateTransition::new(at(5, 0), AlarmState::Alarm, AlarmState::Ok),
            StateTransition::new(at(4, 0), AlarmState::Ok, AlarmState::Alarm),
        ]);
        assert_eq!(h.transitions[0].timestamp, at(4, 0));
        assert_eq!(h.alarm_onsets().collect::<Vec<_>>(), vec![at(4, 0)]);
    }

    #[test]
    fn test_episodes_closed_and_open() {
        let h = history(vec![
            StateTransition::new(at(1, 0), AlarmState::Ok, AlarmState::Alarm),
            StateTransition::new(at(1, 1), AlarmState::Alarm, AlarmState::Ok),
            StateTransition::new(at(6, 0), AlarmState::Ok, AlarmState::Alarm),
        ]);

        let episodes = h.episodes(AlarmState::Alarm);
        assert_eq!(episodes.len(), 2);
        assert!(episodes[0].resolved_ok());
        assert_eq!(episodes[0].duration(h.window_end), Duration::minutes(1));
        assert_eq!(episodes[1].end, None);
        assert_eq!(episodes[1].duration(h.window_end), Duration::hours(17));
    }

    #[test]
    fn test_episode_started_before_window_is_truncated() {
        let h = history(vec![StateTransition::new(
            at(3, 0),
            AlarmState::Alarm,
            AlarmState::Ok,
        )]);

        let episodes = h.episodes(AlarmState::Ok);
        assert_eq!(episodes.len(), 1);
        assert!(episodes[0].truncated);
        assert_eq!(episodes[0].start, h.window_start);
    }

    #[test]
    fn test_firing_without_transitions_spans_window() {
        let h = history(vec![]);
        assert!(h.episodes(AlarmState::Ok).is_empty());

        let episodes = h.episodes(AlarmState::Alarm);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].duration(h.window_end), Duration::hours(23));
    }

    #[test]
    fn test_description_and_datapoints() {
        let mut alarm = Alarm::metric("cpu-high", history(vec![]));
        assert!(!alarm.has_description());
        alarm.description = "  \n ".to_string();
        assert!(!alarm.has_description());
        alarm.description = "CPU above 80%".to_string();
        assert!(alarm.has_description());

        assert_eq!(alarm.required_datapoints(), None);
        alarm.evaluation_periods = Some(5);
        assert_eq!(alarm.required_datapoints(), Some(5));
        alarm.datapoints_to_alarm = Some(3);
        assert_eq!(alarm.required_datapoints(), Some(3));
    }
}
