//! The closed taxonomy of alarm health issues.
//!
//! [`IssueTag`] is the only place tags and their dashboard labels are
//! defined. The classifier produces tags, the store keys records by
//! [`IssueTag::as_str`], and the widgets look labels up through
//! [`IssueTag::label`], so the three can never drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single alarm quality problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueTag {
    NoDescription,
    NoActions,
    LongLivedAlarmCount,
    HighDataPoints,
    #[serde(rename = "recurring_in_12_hours_count")]
    RecurringIn12HoursCount,
    LongTermIssueCount,
    ShortAlarmCount,
    HighThreshold,
}

impl IssueTag {
    /// Every tag, in dashboard row order.
    pub const ALL: [IssueTag; 8] = [
        IssueTag::NoDescription,
        IssueTag::NoActions,
        IssueTag::LongLivedAlarmCount,
        IssueTag::HighDataPoints,
        IssueTag::RecurringIn12HoursCount,
        IssueTag::LongTermIssueCount,
        IssueTag::ShortAlarmCount,
        IssueTag::HighThreshold,
    ];

    /// Stable identifier, used as the persisted record id.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueTag::NoDescription => "no_description",
            IssueTag::NoActions => "no_actions",
            IssueTag::LongLivedAlarmCount => "long_lived_alarm_count",
            IssueTag::HighDataPoints => "high_data_points",
            IssueTag::RecurringIn12HoursCount => "recurring_in_12_hours_count",
            IssueTag::LongTermIssueCount => "long_term_issue_count",
            IssueTag::ShortAlarmCount => "short_alarm_count",
            IssueTag::HighThreshold => "high_threshold",
        }
    }

    /// Human readable label shown in the issues widget.
    pub fn label(&self) -> &'static str {
        match self {
            IssueTag::NoDescription => "Alarms without a description",
            IssueTag::NoActions => "Alarms without actions",
            IssueTag::LongLivedAlarmCount => "Long-lived alarms",
            IssueTag::HighDataPoints => "Alarms requiring many datapoints",
            IssueTag::RecurringIn12HoursCount => "Alarms recurring within 12 hours",
            IssueTag::LongTermIssueCount => "Alarms firing on consecutive days",
            IssueTag::ShortAlarmCount => "Short-lived alarms",
            IssueTag::HighThreshold => "Alarms that never fire (threshold too high?)",
        }
    }
}

impl fmt::Display for IssueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known tag identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown issue tag: {0}")]
pub struct UnknownIssueTag(pub String);

impl FromStr for IssueTag {
    type Err = UnknownIssueTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownIssueTag(s.to_string()))
    }
}
