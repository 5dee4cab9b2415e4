use tracing::Span;

const RECEIVED_COUNTER: &str = "pachca_webhooks_received";
const REJECTED_COUNTER: &str = "pachca_webhooks_rejected";
const WEBHOOK_SPAN_NAME: &str = "ingress.handle";

/// Counts an accepted webhook by its type.
pub fn record_received(kind: &'static str) {
    ::metrics::counter!(RECEIVED_COUNTER, "type" => kind).increment(1);
}

/// Counts a rejected delivery by reason.
pub fn record_rejected(reason: &'static str) {
    ::metrics::counter!(REJECTED_COUNTER, "reason" => reason).increment(1);
}

/// Span wrapping the handling of one delivery; `kind` and `user_id` are
/// recorded once the payload is decoded.
pub fn webhook_span(request_id: &str) -> Span {
    tracing::info_span!(
        WEBHOOK_SPAN_NAME,
        request_id = %request_id,
        kind = tracing::field::Empty,
        user_id = tracing::field::Empty
    )
}

pub fn with_webhook_fields(span: &Span, kind: &str, user_id: Option<u64>) {
    span.record("kind", tracing::field::display(kind));
    if let Some(user_id) = user_id {
        span.record("user_id", user_id);
    }
}
