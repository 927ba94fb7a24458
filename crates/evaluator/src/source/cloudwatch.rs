//! Amazon CloudWatch alarm source.

use alarm_core::{async_trait, Alarm, AlarmHistory, AlarmState, StateTransition};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::error::ProvideErrorMetadata;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{AlarmType, CompositeAlarm, HistoryItemType, MetricAlarm, StateValue};
use aws_sdk_cloudwatch::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::history::decode_history_data;
use super::{AlarmSource, SourceError};

/// Alarm types requested from both DescribeAlarms and DescribeAlarmHistory.
/// DescribeAlarmHistory returns metric alarms only when none are given.
const ALARM_TYPES: [AlarmType; 2] = [AlarmType::MetricAlarm, AlarmType::CompositeAlarm];

/// Reads alarms from the CloudWatch API of one region.
#[derive(Clone)]
pub struct CloudWatchSource {
    client: Client,
    region: String,
}

impl CloudWatchSource {
    /// Build a client from the default credential chain for `region`.
    pub async fn from_region(region: impl Into<String>) -> Self {
        let region = region.into();
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        info!("Using CloudWatch in region {}", region);

        Self {
            client: Client::new(&config),
            region,
        }
    }

    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

fn metric_alarm(alarm: &MetricAlarm, region: &str) -> Result<Alarm, SourceError> {
    let name = alarm.alarm_name().ok_or(SourceError::MissingName)?;

    let mut converted = Alarm::metric(name, placeholder_history());
    converted.arn = alarm.alarm_arn().map(str::to_string);
    converted.region = Some(region.to_string());
    converted.description = alarm.alarm_description().unwrap_or_default().to_string();
    converted.actions = alarm.alarm_actions().to_vec();
    converted.evaluation_periods = alarm.evaluation_periods().and_then(non_negative);
    converted.datapoints_to_alarm = alarm.datapoints_to_alarm().and_then(non_negative);
    converted.threshold = alarm.threshold();
    converted.comparison_operator = alarm.comparison_operator().map(|op| op.as_str().to_string());
    converted.metric_name = alarm.metric_name().map(str::to_string);
    converted.namespace = alarm.namespace().map(str::to_string);
    converted.state = alarm.state_value().map(convert_state).unwrap_or(AlarmState::InsufficientData);
    converted.configuration_updated = alarm
        .alarm_configuration_updated_timestamp()
        .and_then(to_chrono);

    Ok(converted)
}

fn composite_alarm(alarm: &CompositeAlarm, region: &str) -> Result<Alarm, SourceError> {
    let name = alarm.alarm_name().ok_or(SourceError::MissingName)?;

    let mut converted = Alarm::composite(
        name,
        alarm.alarm_rule().unwrap_or_default(),
        placeholder_history(),
    );
    converted.arn = alarm.alarm_arn().map(str::to_string);
    converted.region = Some(region.to_string());
    converted.description = alarm.alarm_description().unwrap_or_default().to_string();
    converted.actions = alarm.alarm_actions().to_vec();
    converted.state = alarm.state_value().map(convert_state).unwrap_or(AlarmState::InsufficientData);
    converted.configuration_updated = alarm
        .alarm_configuration_updated_timestamp()
        .and_then(to_chrono);

    Ok(converted)
}

#[async_trait]
impl AlarmSource for CloudWatchSource {
    async fn describe_alarms(&self) -> Result<Vec<Alarm>, SourceError> {
        let mut alarms = Vec::new();
        let mut pages = self
            .client
            .describe_alarms()
            .set_alarm_types(Some(ALARM_TYPES.to_vec()))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| api_error("DescribeAlarms", e))?;

            for alarm in page.metric_alarms() {
                alarms.push(metric_alarm(alarm, &self.region)?);
            }
            for alarm in page.composite_alarms() {
                alarms.push(composite_alarm(alarm, &self.region)?);
            }
        }

        Ok(alarms)
    }

    async fn state_history(
        &self,
        alarm_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransition>, SourceError> {
        let mut transitions = Vec::new();
        let mut pages = self
            .client
            .describe_alarm_history()
            .alarm_name(alarm_name)
            .set_alarm_types(Some(ALARM_TYPES.to_vec()))
            .history_item_type(HistoryItemType::StateUpdate)
            .start_date(to_aws(start))
            .end_date(to_aws(end))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| api_error("DescribeAlarmHistory", e))?;

            for item in page.alarm_history_items() {
                let (Some(timestamp), Some(data)) =
                    (item.timestamp().and_then(to_chrono), item.history_data())
                else {
                    debug!("{}: skipping history item without timestamp or data", alarm_name);
                    continue;
                };

                if let Some(transition) = decode_history_data(timestamp, data) {
                    transitions.push(transition);
                }
            }
        }

        Ok(transitions)
    }
}

fn api_error<E: ProvideErrorMetadata>(operation: &'static str, e: E) -> SourceError {
    SourceError::Api {
        operation,
        code: e.code().unwrap_or("unknown").to_string(),
        message: e.message().unwrap_or("no message").to_string(),
    }
}

fn convert_state(state: &StateValue) -> AlarmState {
    state
        .as_str()
        .parse()
        .unwrap_or(AlarmState::InsufficientData)
}

fn non_negative(value: i32) -> Option<u32> {
    u32::try_from(value).ok()
}

fn to_chrono(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn to_aws(timestamp: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_millis(timestamp.timestamp_millis())
}

fn placeholder_history() -> AlarmHistory {
    let now = Utc::now();
    AlarmHistory::empty(now, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarm_core::AlarmKind;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_conversion() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 15).unwrap();
        let aws = to_aws(ts);
        assert_eq!(aws.secs(), ts.timestamp());
        assert_eq!(to_chrono(&aws), Some(ts));
    }

    #[test]
    fn test_requests_cover_composite_alarms() {
        assert!(ALARM_TYPES.contains(&AlarmType::MetricAlarm));
        assert!(ALARM_TYPES.contains(&AlarmType::CompositeAlarm));
    }

    #[test]
    fn test_convert_state() {
        assert_eq!(convert_state(&StateValue::Alarm), AlarmState::Alarm);
        assert_eq!(convert_state(&StateValue::Ok), AlarmState::Ok);
        assert_eq!(convert_state(&StateValue::InsufficientData), AlarmState::InsufficientData);
    }

    #[test]
    fn test_metric_alarm_conversion() {
        let alarm = MetricAlarm::builder()
            .alarm_name("svc/errors")
            .alarm_arn("arn:aws:cloudwatch:eu-west-1:123456789012:alarm:svc/errors")
            .alarm_actions("arn:aws:sns:eu-west-1:123456789012:oncall")
            .evaluation_periods(5)
            .datapoints_to_alarm(3)
            .threshold(10.0)
            .metric_name("Errors")
            .namespace("Svc")
            .state_value(StateValue::Alarm)
            .build();

        let converted = metric_alarm(&alarm, "eu-west-1").unwrap();
        assert_eq!(converted.name, "svc/errors");
        assert_eq!(converted.region.as_deref(), Some("eu-west-1"));
        assert_eq!(converted.actions.len(), 1);
        assert_eq!(converted.required_datapoints(), Some(3));
        assert_eq!(converted.state, AlarmState::Alarm);
        assert!(!converted.has_description());

        let nameless = MetricAlarm::builder().build();
        assert!(matches!(metric_alarm(&nameless, "eu-west-1"), Err(SourceError::MissingName)));
    }

    #[test]
    fn test_composite_alarm_conversion() {
        let alarm = CompositeAlarm::builder()
            .alarm_name("api-degraded")
            .alarm_arn("arn:aws:cloudwatch:eu-west-1:123456789012:alarm:api-degraded")
            .alarm_rule(r#"ALARM("svc/errors") OR ALARM("svc/latency")"#)
            .alarm_description("API error rate or latency degraded")
            .state_value(StateValue::Ok)
            .build();

        let converted = composite_alarm(&alarm, "eu-west-1").unwrap();
        assert_eq!(converted.name, "api-degraded");
        assert_eq!(converted.kind, AlarmKind::Composite);
        assert_eq!(
            converted.alarm_rule.as_deref(),
            Some(r#"ALARM("svc/errors") OR ALARM("svc/latency")"#)
        );
        assert_eq!(converted.region.as_deref(), Some("eu-west-1"));
        assert_eq!(converted.state, AlarmState::Ok);
        assert!(converted.actions.is_empty());
        assert!(converted.has_description());
        assert_eq!(converted.required_datapoints(), None);

        let nameless = CompositeAlarm::builder().build();
        assert!(matches!(composite_alarm(&nameless, "eu-west-1"), Err(SourceError::MissingName)));
    }
}
