//! Report records.
//!
//! Field names are serialized exactly as the widgets expect them
//! (`id`, `alarm_list`, `AlarmName`, ...), so any reader of the JSON form
//! agrees with the evaluator without sharing code.

use alarm_core::{Alarm, IssueTag};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::StoreError;

/// An alarm reference inside an issue group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRef {
    #[serde(rename = "AlarmName")]
    pub alarm_name: String,
    #[serde(rename = "AlarmArn", default, skip_serializing_if = "Option::is_none")]
    pub alarm_arn: Option<String>,
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl AlarmRef {
    /// Reference an alarm by name only.
    pub fn named(alarm_name: impl Into<String>) -> Self {
        Self {
            alarm_name: alarm_name.into(),
            alarm_arn: None,
            region: None,
        }
    }
}

impl From<&Alarm> for AlarmRef {
    fn from(alarm: &Alarm) -> Self {
        Self {
            alarm_name: alarm.name.clone(),
            alarm_arn: alarm.arn.clone(),
            region: alarm.region.clone(),
        }
    }
}

/// All alarms matching one issue tag in the latest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueGroupRecord {
    /// The issue tag, also the primary key.
    pub id: IssueTag,
    /// Matching alarms in evaluation order.
    pub alarm_list: Vec<AlarmRef>,
}

impl IssueGroupRecord {
    /// An issue group without any alarms.
    pub fn empty(id: IssueTag) -> Self {
        Self {
            id,
            alarm_list: Vec::new(),
        }
    }
}

/// A description suggestion for one alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DescriptionRecord {
    /// The alarm name, also the primary key.
    pub id: String,
    #[serde(rename = "AlarmName")]
    pub alarm_name: String,
    /// Current description, possibly empty.
    #[serde(rename = "AlarmDescription")]
    pub alarm_description: String,
    #[serde(rename = "SuggestedDescription")]
    pub suggested_description: String,
}

impl DescriptionRecord {
    pub fn new(
        alarm_name: impl Into<String>,
        alarm_description: impl Into<String>,
        suggested_description: impl Into<String>,
    ) -> Self {
        let alarm_name = alarm_name.into();
        Self {
            id: alarm_name.clone(),
            alarm_name,
            alarm_description: alarm_description.into(),
            suggested_description: suggested_description.into(),
        }
    }
}

/// Everything one evaluation run publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub issue_groups: Vec<IssueGroupRecord>,
    pub descriptions: Vec<DescriptionRecord>,
}

impl Report {
    /// The group for `tag`, if present.
    pub fn group(&self, tag: IssueTag) -> Option<&IssueGroupRecord> {
        self.issue_groups.iter().find(|group| group.id == tag)
    }
}

/// Raw `issue_groups` row; the alarm list is stored as JSON text.
#[derive(Debug, FromRow)]
pub(crate) struct IssueGroupRow {
    pub id: String,
    pub alarm_list: String,
}

impl TryFrom<IssueGroupRow> for IssueGroupRecord {
    type Error = StoreError;

    fn try_from(row: IssueGroupRow) -> Result<Self, Self::Error> {
        let malformed = |reason: String| StoreError::Malformed {
            entity: "IssueGroup",
            id: row.id.clone(),
            reason,
        };

        let id = row
            .id
            .parse::<IssueTag>()
            .map_err(|e| malformed(e.to_string()))?;
        let alarm_list = serde_json::from_str(&row.alarm_list)
            .map_err(|e| malformed(format!("invalid alarm_list: {}", e)))?;

        Ok(Self { id, alarm_list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_group_field_names() {
        let record = IssueGroupRecord {
            id: IssueTag::NoActions,
            alarm_list: vec![AlarmRef {
                alarm_name: "svc/errors".to_string(),
                alarm_arn: None,
                region: Some("eu-west-1".to_string()),
            }],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "no_actions",
                "alarm_list": [{ "AlarmName": "svc/errors", "Region": "eu-west-1" }]
            })
        );
    }

    #[test]
    fn test_description_field_names() {
        let record = DescriptionRecord::new("cpu", "", "Fires when CPU is high.");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "cpu",
                "AlarmName": "cpu",
                "AlarmDescription": "",
                "SuggestedDescription": "Fires when CPU is high."
            })
        );
    }

    #[test]
    fn test_row_decoding() {
        let row = IssueGroupRow {
            id: "short_alarm_count".to_string(),
            alarm_list: r#"[{"AlarmName": "a"}, {"AlarmName": "b", "Extra": 1}]"#.to_string(),
        };
        let record = IssueGroupRecord::try_from(row).unwrap();
        assert_eq!(record.id, IssueTag::ShortAlarmCount);
        assert_eq!(record.alarm_list, vec![AlarmRef::named("a"), AlarmRef::named("b")]);

        let bad_tag = IssueGroupRow {
            id: "flapping".to_string(),
            alarm_list: "[]".to_string(),
        };
        assert!(matches!(
            IssueGroupRecord::try_from(bad_tag),
            Err(StoreError::Malformed { .. })
        ));

        let bad_list = IssueGroupRow {
            id: "no_actions".to_string(),
            alarm_list: "{not json".to_string(),
        };
        assert!(matches!(
            IssueGroupRecord::try_from(bad_list),
            Err(StoreError::Malformed { .. })
        ));
    }
}
