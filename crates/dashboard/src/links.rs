//! CloudWatch console deep links.

/// Builds alarm deep links for one console domain.
#[derive(Debug, Clone)]
pub struct ConsoleLinks {
    domain: String,
}

impl ConsoleLinks {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Deep link to the alarm detail page.
    pub fn alarm_url(&self, alarm_name: &str) -> String {
        format!(
            "https://console.{}/cloudwatch/home#alarmsV2:alarm/{}",
            self.domain,
            escape_alarm_name(alarm_name)
        )
    }
}

impl Default for ConsoleLinks {
    fn default() -> Self {
        Self::new("aws.amazon.com")
    }
}

/// Escape an alarm name the way the console does in its own URLs.
///
/// Every byte outside `A-Z a-z 0-9 - _ . ~` is percent-encoded and the `%`
/// replaced by `$`, so `/` becomes `$2F` and the result never contains a
/// character that could end the URL fragment.
pub fn escape_alarm_name(name: &str) -> String {
    urlencoding::encode(name).replace('%', "$")
}
