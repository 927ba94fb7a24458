//! Configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;

/// Thresholds for the issue classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// `high_data_points` fires above this many required datapoints.
    pub max_datapoints_to_alarm: u32,
    /// `long_lived_alarm_count` fires when the latest episode lasts longer.
    pub long_lived_after: Duration,
    /// Rolling window for `recurring_in_12_hours_count`.
    pub recurrence_window: Duration,
    /// Onsets needed inside the recurrence window.
    pub recurrence_min_count: usize,
    /// Consecutive calendar days with an onset for `long_term_issue_count`.
    pub long_term_days: u32,
    /// `short_alarm_count` fires when an episode resolves faster than this.
    pub short_alarm_under: Duration,
    /// Minimum configuration age before `high_threshold` applies.
    pub high_threshold_min_age: Duration,
    /// Skip `no_actions` for alarms referenced by a composite alarm.
    pub exempt_composite_children: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_datapoints_to_alarm: 10,
            long_lived_after: Duration::hours(24),
            recurrence_window: Duration::hours(12),
            recurrence_min_count: 2,
            long_term_days: 3,
            short_alarm_under: Duration::minutes(2),
            high_threshold_min_age: Duration::days(14),
            exempt_composite_children: false,
        }
    }
}

impl ClassifierConfig {
    /// Load thresholds from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ALARM_HEALTH_MAX_DATAPOINTS` | Datapoint ceiling | `10` |
    /// | `ALARM_HEALTH_LONG_LIVED_HOURS` | Long-lived episode length | `24` |
    /// | `ALARM_HEALTH_RECURRENCE_WINDOW_HOURS` | Recurrence window | `12` |
    /// | `ALARM_HEALTH_RECURRENCE_MIN_COUNT` | Onsets inside the window | `2` |
    /// | `ALARM_HEALTH_LONG_TERM_DAYS` | Consecutive days | `3` |
    /// | `ALARM_HEALTH_SHORT_ALARM_SECS` | Short episode length | `120` |
    /// | `ALARM_HEALTH_HIGH_THRESHOLD_MIN_AGE_DAYS` | Minimum alarm age | `14` |
    /// | `ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN` | Composite child exemption | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            max_datapoints_to_alarm: parse_var("ALARM_HEALTH_MAX_DATAPOINTS")?
                .unwrap_or(defaults.max_datapoints_to_alarm),
            long_lived_after: duration_var("ALARM_HEALTH_LONG_LIVED_HOURS", Duration::try_hours)?
                .unwrap_or(defaults.long_lived_after),
            recurrence_window: duration_var("ALARM_HEALTH_RECURRENCE_WINDOW_HOURS", Duration::try_hours)?
                .unwrap_or(defaults.recurrence_window),
            recurrence_min_count: parse_var("ALARM_HEALTH_RECURRENCE_MIN_COUNT")?
                .unwrap_or(defaults.recurrence_min_count),
            long_term_days: parse_var("ALARM_HEALTH_LONG_TERM_DAYS")?
                .unwrap_or(defaults.long_term_days),
            short_alarm_under: duration_var("ALARM_HEALTH_SHORT_ALARM_SECS", Duration::try_seconds)?
                .unwrap_or(defaults.short_alarm_under),
            high_threshold_min_age: duration_var(
                "ALARM_HEALTH_HIGH_THRESHOLD_MIN_AGE_DAYS",
                Duration::try_days,
            )?
            .unwrap_or(defaults.high_threshold_min_age),
            exempt_composite_children: parse_bool("ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN")?
                .unwrap_or(defaults.exempt_composite_children),
        })
    }
}

/// Which alarms get a description record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionScope {
    /// Only alarms classified `no_description`.
    #[default]
    MissingOnly,
    /// Every alarm; described alarms pass their description through.
    All,
}

impl FromStr for DescriptionScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "missing" | "missing_only" => Ok(DescriptionScope::MissingOnly),
            "all" => Ok(DescriptionScope::All),
            _ => Err(ConfigError::Invalid {
                var: "ALARM_DESCRIPTION_SCOPE",
                value: s.to_string(),
            }),
        }
    }
}

/// Which text generator drafts missing descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorBackend {
    /// xAI Grok chat completions.
    #[default]
    Grok,
    /// No generator; every suggestion falls back to the sentinel text.
    None,
}

impl FromStr for GeneratorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grok" => Ok(GeneratorBackend::Grok),
            "none" | "off" => Ok(GeneratorBackend::None),
            _ => Err(ConfigError::Invalid {
                var: "ALARM_TEXT_GENERATOR",
                value: s.to_string(),
            }),
        }
    }
}

/// Evaluation job configuration.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// AWS region whose alarms are evaluated.
    pub region: String,
    /// SQLite database URL of the report store.
    pub database_url: String,
    /// How far back state history is read.
    pub history_window: Duration,
    /// Concurrent history reads against the alarm source.
    pub history_concurrency: usize,
    pub description_scope: DescriptionScope,
    /// Concurrent text generation calls.
    pub suggestion_concurrency: usize,
    /// Budget for a single text generation call.
    pub generation_timeout: StdDuration,
    pub generator: GeneratorBackend,
    pub classifier: ClassifierConfig,
}

impl EvaluatorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `AWS_REGION` | Region to evaluate | (required) |
    /// | `ALARM_REPORT_DB` | SQLite database URL | `sqlite:alarm-report.db?mode=rwc` |
    /// | `ALARM_HISTORY_DAYS` | History window in days | `14` |
    /// | `ALARM_HISTORY_CONCURRENCY` | Concurrent history reads | `4` |
    /// | `ALARM_DESCRIPTION_SCOPE` | `missing` or `all` | `missing` |
    /// | `ALARM_SUGGESTION_CONCURRENCY` | Concurrent generation calls | `4` |
    /// | `ALARM_GENERATION_TIMEOUT_SECS` | Per-call generation budget | `30` |
    /// | `ALARM_TEXT_GENERATOR` | `grok` or `none` | `grok` |
    ///
    /// Classifier thresholds are read by [`ClassifierConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_region(None)
    }

    /// Like [`EvaluatorConfig::from_env`], with `region` taking precedence
    /// over `AWS_REGION`.
    pub fn from_env_with_region(region: Option<String>) -> Result<Self, ConfigError> {
        let region = region
            .or_else(|| env::var("AWS_REGION").ok())
            .filter(|r| !r.trim().is_empty())
            .ok_or(ConfigError::MissingRegion)?;

        let database_url = env::var("ALARM_REPORT_DB")
            .unwrap_or_else(|_| "sqlite:alarm-report.db?mode=rwc".to_string());

        let history_window = match parse_var("ALARM_HISTORY_DAYS")? {
            Some(days) => history_window_days("ALARM_HISTORY_DAYS", days)?,
            None => Duration::days(14),
        };

        let history_concurrency = parse_var("ALARM_HISTORY_CONCURRENCY")?.unwrap_or(4);

        let description_scope = parse_var("ALARM_DESCRIPTION_SCOPE")?.unwrap_or_default();

        let suggestion_concurrency = parse_var("ALARM_SUGGESTION_CONCURRENCY")?.unwrap_or(4);

        let generation_timeout = parse_var("ALARM_GENERATION_TIMEOUT_SECS")?
            .map(StdDuration::from_secs)
            .unwrap_or(StdDuration::from_secs(30));

        let generator = parse_var("ALARM_TEXT_GENERATOR")?.unwrap_or_default();

        Ok(Self {
            region,
            database_url,
            history_window,
            history_concurrency,
            description_scope,
            suggestion_concurrency,
            generation_timeout,
            generator,
            classifier: ClassifierConfig::from_env()?,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AWS_REGION environment variable is required")]
    MissingRegion,

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        _ => Ok(None),
    }
}

fn parse_bool(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => match value.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid { var, value }),
        },
        _ => Ok(None),
    }
}

/// A non-negative duration read as a whole number of `unit`s.
fn duration_var(
    var: &'static str,
    unit: fn(i64) -> Option<Duration>,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = parse_var::<i64>(var)? else {
        return Ok(None);
    };
    (raw >= 0)
        .then(|| unit(raw))
        .flatten()
        .map(Some)
        .ok_or(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        })
}

/// History window of `days` days; must be positive.
pub fn history_window_days(var: &'static str, days: i64) -> Result<Duration, ConfigError> {
    (days > 0)
        .then(|| Duration::try_days(days))
        .flatten()
        .ok_or(ConfigError::Invalid {
            var,
            value: days.to_string(),
        })
}

/// Period between runs in periodic mode; zero is raised to one hour.
pub fn run_interval(hours: u64) -> Result<StdDuration, ConfigError> {
    hours
        .max(1)
        .checked_mul(3600)
        .map(StdDuration::from_secs)
        .ok_or(ConfigError::Invalid {
            var: "--interval-hours",
            value: hours.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope_and_backend() {
        assert_eq!("missing".parse::<DescriptionScope>().unwrap(), DescriptionScope::MissingOnly);
        assert_eq!("ALL".parse::<DescriptionScope>().unwrap(), DescriptionScope::All);
        assert!("some".parse::<DescriptionScope>().is_err());

        assert_eq!("grok".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::Grok);
        assert_eq!("none".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::None);
        assert!("gpt".parse::<GeneratorBackend>().is_err());
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        const VARS: &[&str] = &[
            "AWS_REGION",
            "ALARM_REPORT_DB",
            "ALARM_HISTORY_DAYS",
            "ALARM_HISTORY_CONCURRENCY",
            "ALARM_DESCRIPTION_SCOPE",
            "ALARM_SUGGESTION_CONCURRENCY",
            "ALARM_GENERATION_TIMEOUT_SECS",
            "ALARM_TEXT_GENERATOR",
            "ALARM_HEALTH_MAX_DATAPOINTS",
            "ALARM_HEALTH_LONG_LIVED_HOURS",
            "ALARM_HEALTH_SHORT_ALARM_SECS",
            "ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN",
        ];
        let clear = || VARS.iter().for_each(|v| env::remove_var(v));

        // Missing region
        clear();
        assert!(matches!(EvaluatorConfig::from_env(), Err(ConfigError::MissingRegion)));

        // Explicit region without the variable
        let config = EvaluatorConfig::from_env_with_region(Some("us-east-2".to_string())).unwrap();
        assert_eq!(config.region, "us-east-2");

        // Defaults
        env::set_var("AWS_REGION", "eu-west-1");
        let config = EvaluatorConfig::from_env().unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.database_url, "sqlite:alarm-report.db?mode=rwc");
        assert_eq!(config.history_window, Duration::days(14));
        assert_eq!(config.description_scope, DescriptionScope::MissingOnly);
        assert_eq!(config.generator, GeneratorBackend::Grok);
        assert_eq!(config.classifier, ClassifierConfig::default());

        // Overrides
        env::set_var("ALARM_HISTORY_DAYS", "7");
        env::set_var("ALARM_DESCRIPTION_SCOPE", "all");
        env::set_var("ALARM_TEXT_GENERATOR", "none");
        env::set_var("ALARM_HEALTH_MAX_DATAPOINTS", "15");
        env::set_var("ALARM_HEALTH_LONG_LIVED_HOURS", "48");
        env::set_var("ALARM_HEALTH_SHORT_ALARM_SECS", "90");
        env::set_var("ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN", "true");
        let config = EvaluatorConfig::from_env().unwrap();
        assert_eq!(config.history_window, Duration::days(7));
        assert_eq!(config.description_scope, DescriptionScope::All);
        assert_eq!(config.generator, GeneratorBackend::None);
        assert_eq!(config.classifier.max_datapoints_to_alarm, 15);
        assert_eq!(config.classifier.long_lived_after, Duration::hours(48));
        assert_eq!(config.classifier.short_alarm_under, Duration::seconds(90));
        assert!(config.classifier.exempt_composite_children);

        // Invalid number
        env::set_var("ALARM_HEALTH_MAX_DATAPOINTS", "many");
        assert!(matches!(
            EvaluatorConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HEALTH_MAX_DATAPOINTS", .. })
        ));

        // Out of range and negative durations
        env::set_var("ALARM_HEALTH_MAX_DATAPOINTS", "15");
        env::set_var("ALARM_HEALTH_LONG_LIVED_HOURS", "9999999999999");
        assert!(matches!(
            ClassifierConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HEALTH_LONG_LIVED_HOURS", .. })
        ));
        env::set_var("ALARM_HEALTH_LONG_LIVED_HOURS", "-1");
        assert!(matches!(
            ClassifierConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HEALTH_LONG_LIVED_HOURS", .. })
        ));
        env::remove_var("ALARM_HEALTH_LONG_LIVED_HOURS");

        env::set_var("ALARM_HEALTH_SHORT_ALARM_SECS", "9223372036854775807");
        assert!(matches!(
            ClassifierConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HEALTH_SHORT_ALARM_SECS", .. })
        ));
        env::remove_var("ALARM_HEALTH_SHORT_ALARM_SECS");

        env::set_var("ALARM_HISTORY_DAYS", "-7");
        assert!(matches!(
            EvaluatorConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HISTORY_DAYS", .. })
        ));
        env::set_var("ALARM_HISTORY_DAYS", "9999999999999");
        assert!(matches!(
            EvaluatorConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HISTORY_DAYS", .. })
        ));
        env::set_var("ALARM_HISTORY_DAYS", "7");

        // Unrecognized boolean
        env::set_var("ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN", "yes");
        assert!(matches!(
            ClassifierConfig::from_env(),
            Err(ConfigError::Invalid { var: "ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN", .. })
        ));
        env::set_var("ALARM_HEALTH_EXEMPT_COMPOSITE_CHILDREN", "0");
        assert!(!ClassifierConfig::from_env().unwrap().exempt_composite_children);

        clear();
    }

    #[test]
    fn test_history_window_days() {
        assert_eq!(history_window_days("--history-days", 30).unwrap(), Duration::days(30));
        assert!(history_window_days("--history-days", 0).is_err());
        assert!(history_window_days("--history-days", -3).is_err());
        assert!(history_window_days("--history-days", i64::MAX).is_err());
    }

    #[test]
    fn test_run_interval() {
        assert_eq!(run_interval(0).unwrap(), StdDuration::from_secs(3600));
        assert_eq!(run_interval(6).unwrap(), StdDuration::from_secs(6 * 3600));
        assert!(matches!(
            run_interval(u64::MAX),
            Err(ConfigError::Invalid { var: "--interval-hours", .. })
        ));
    }
}
