use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use webhook::WebhookError;

#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("can't read request body: {0}")]
    Body(axum::Error),
}

impl IngressError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngressError::Webhook(err) if err.is_signature() => StatusCode::UNAUTHORIZED,
            IngressError::Webhook(WebhookError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            IngressError::Webhook(_) | IngressError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            IngressError::Webhook(err) => err.reason(),
            IngressError::Body(_) => "body_read",
        }
    }
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            IngressError::from(WebhookError::InvalidSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            IngressError::from(WebhookError::NoSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            IngressError::from(WebhookError::TooLarge { limit: 10 }).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            IngressError::from(WebhookError::TooOld {
                age: Duration::from_secs(90),
                max_age: Duration::from_secs(60),
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IngressError::from(WebhookError::UnsupportedType("poll".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn reason_comes_from_webhook_error() {
        assert_eq!(
            IngressError::from(WebhookError::NoSignature).reason(),
            WebhookError::NoSignature.reason()
        );
    }
}
