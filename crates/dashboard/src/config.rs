//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL of the report store.
    pub database_url: String,
    /// Console domain used in alarm deep links.
    pub console_domain: String,
    /// Budget for rendering a single widget.
    pub widget_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DASHBOARD_ADDR` | Server bind address | `127.0.0.1:8789` |
    /// | `ALARM_REPORT_DB` | SQLite database URL | `sqlite:alarm-report.db?mode=rwc` |
    /// | `CONSOLE_DOMAIN` | Console domain for deep links | `aws.amazon.com` |
    /// | `WIDGET_TIMEOUT_SECS` | Per-widget render budget | `30` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("DASHBOARD_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8789".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("ALARM_REPORT_DB")
            .unwrap_or_else(|_| "sqlite:alarm-report.db?mode=rwc".to_string());

        let console_domain = env::var("CONSOLE_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "aws.amazon.com".to_string());

        let widget_timeout = match env::var("WIDGET_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout(value))?,
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            addr,
            database_url,
            console_domain,
            widget_timeout,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid DASHBOARD_ADDR format")]
    InvalidAddr,

    #[error("Invalid WIDGET_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        let clear = || {
            for var in ["DASHBOARD_ADDR", "ALARM_REPORT_DB", "CONSOLE_DOMAIN", "WIDGET_TIMEOUT_SECS"] {
                env::remove_var(var);
            }
        };

        // Defaults
        clear();
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8789");
        assert_eq!(config.console_domain, "aws.amazon.com");
        assert_eq!(config.widget_timeout, Duration::from_secs(30));

        // Overrides
        env::set_var("DASHBOARD_ADDR", "0.0.0.0:9000");
        env::set_var("CONSOLE_DOMAIN", "amazonaws-us-gov.com");
        env::set_var("WIDGET_TIMEOUT_SECS", "5");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.console_domain, "amazonaws-us-gov.com");
        assert_eq!(config.widget_timeout, Duration::from_secs(5));

        // Invalid values
        env::set_var("WIDGET_TIMEOUT_SECS", "soon");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidTimeout(_))));
        env::set_var("DASHBOARD_ADDR", "not an address");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear();
    }
}
