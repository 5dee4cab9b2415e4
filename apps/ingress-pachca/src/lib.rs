//! Pachca webhook ingress.
//!
//! Exposes `POST /pachca/webhook`, which bounds the body, checks the
//! `Pachca-Signature` when a secret is configured, and decodes the payload
//! into a typed [`Webhook`]. Rejections answer with a JSON error body.

pub mod config;
mod error;
mod reqid;

use axum::{
    Extension, Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http_body_util::LengthLimitError;
use pachca_telemetry::{record_received, record_rejected, webhook_span, with_webhook_fields};
use serde_json::json;
use tracing::Instrument;
use webhook::{Decoder, SIGNATURE_HEADER, Webhook, WebhookError, WebhookEvent};

pub use config::IngressConfig;
pub use error::IngressError;
pub use reqid::{REQUEST_ID_HEADER, RequestId, with_request_id};

#[derive(Clone)]
pub struct AppState {
    decoder: Decoder,
    secret: Option<String>,
}

impl AppState {
    pub fn new(decoder: Decoder, secret: Option<String>) -> Self {
        Self { decoder, secret }
    }

    pub fn from_config(config: &IngressConfig) -> Self {
        Self::new(Decoder::new(config.webhook), config.secret.clone())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pachca/webhook", post(handle))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(with_request_id))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn handle(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let span = webhook_span(&request_id.0);
    let result = receive(&state, &headers, body).instrument(span.clone()).await;

    span.in_scope(|| match result {
        Ok(webhook) => {
            let kind = webhook.kind().as_str();
            with_webhook_fields(&span, kind, user_id(&webhook));
            record_received(kind);
            tracing::info!(age = ?webhook.age(), "pachca webhook accepted");
            Json(json!({ "ok": true, "type": kind })).into_response()
        }
        Err(err) => {
            record_rejected(err.reason());
            tracing::warn!(error = %err, reason = err.reason(), "pachca webhook rejected");
            err.into_response()
        }
    })
}

async fn receive(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<Webhook, IngressError> {
    let max_size = state.decoder.config().max_size;
    let data = read_body(body, max_size).await?;

    let webhook = match state.secret.as_deref() {
        Some(secret) => {
            let signature = headers.get(SIGNATURE_HEADER).map(HeaderValue::as_bytes);
            state.decoder.decode_signed(&data, signature, secret)?
        }
        None => state.decoder.decode(&data)?,
    };
    Ok(webhook)
}

async fn read_body(body: Body, max_size: usize) -> Result<Bytes, IngressError> {
    to_bytes(body, max_size).await.map_err(|err| {
        let inner = err.into_inner();
        if inner.is::<LengthLimitError>() {
            IngressError::Webhook(WebhookError::TooLarge { limit: max_size })
        } else {
            IngressError::Body(axum::Error::new(inner))
        }
    })
}

fn user_id(webhook: &Webhook) -> Option<u64> {
    match webhook {
        Webhook::Message(m) => Some(m.user_id),
        Webhook::Reaction(r) => Some(r.user_id),
        Webhook::Button(b) => Some(b.user_id),
        Webhook::View(v) => Some(v.user_id),
        Webhook::ChatMember(_) | Webhook::OrgMember(_) => None,
    }
}
