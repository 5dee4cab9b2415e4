use std::io;
use std::time::Duration;

/// Terminal outcome of reading or decoding a single webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("request is nil")]
    NilRequest,
    #[error("webhook is nil")]
    NilWebhook,
    #[error("webhook has no data")]
    EmptyData,
    #[error("webhook has invalid signature")]
    InvalidSignature,
    #[error("webhook has no signature")]
    NoSignature,
    #[error("can't read webhook data: {0}")]
    Read(#[source] io::Error),
    #[error("webhook payload is larger than {limit} bytes")]
    TooLarge { limit: usize },
    #[error("webhook is too old ({age:?} > {max_age:?})")]
    TooOld { age: Duration, max_age: Duration },
    #[error("can't parse webhook JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("unsupported webhook type {0:?}")]
    UnsupportedType(String),
    #[error("can't decode webhook data: {0}")]
    Data(#[source] serde_json::Error),
}

impl WebhookError {
    /// Short machine-readable reason, used for log fields and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            WebhookError::NilRequest => "nil_request",
            WebhookError::NilWebhook => "nil_webhook",
            WebhookError::EmptyData => "empty_data",
            WebhookError::InvalidSignature => "invalid_signature",
            WebhookError::NoSignature => "no_signature",
            WebhookError::Read(_) => "read",
            WebhookError::TooLarge { .. } => "too_large",
            WebhookError::TooOld { .. } => "too_old",
            WebhookError::Parse(_) => "parse",
            WebhookError::UnsupportedType(_) => "unsupported_type",
            WebhookError::Data(_) => "data",
        }
    }

    /// True for failures caused by a missing or wrong signature.
    pub fn is_signature(&self) -> bool {
        matches!(
            self,
            WebhookError::NoSignature | WebhookError::InvalidSignature
        )
    }
}
