use std::env;
use std::time::Duration;

/// Default ceiling for a webhook body (1 MiB).
pub const DEFAULT_MAX_SIZE: usize = 1024 * 1024;

/// Default maximum webhook age.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60);

/// Limits applied to every inbound delivery.
///
/// ```
/// use std::time::Duration;
/// use webhook::WebhookConfig;
///
/// let cfg = WebhookConfig::default().with_max_age(Duration::from_secs(300));
/// assert_eq!(cfg.max_size, 1024 * 1024);
/// assert_eq!(cfg.max_age.as_secs(), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookConfig {
    pub max_size: usize,
    pub max_age: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl WebhookConfig {
    /// Reads `PACHCA_WEBHOOK_MAX_SIZE` (bytes) and `PACHCA_WEBHOOK_MAX_AGE`
    /// (seconds). Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let max_size = env::var("PACHCA_WEBHOOK_MAX_SIZE")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_SIZE);
        let max_age = env::var("PACHCA_WEBHOOK_MAX_AGE")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_MAX_AGE);

        Self { max_size, max_age }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}
