use serde::de::DeserializeOwned;

use crate::clock::{Clock, SystemClock};
use crate::config::WebhookConfig;
use crate::envelope::{Envelope, WebhookType};
use crate::error::WebhookError;
use crate::events::{Button, ChatMember, Message, OrgMember, Reaction, View, Webhook, WebhookEvent};
use crate::reader::{InboundRequest, read_limited};
use crate::signature::{SIGNATURE_HEADER, verify_signature};

/// Reads, verifies, and decodes webhook deliveries.
///
/// A decoder holds only read-only settings and can be shared between
/// concurrent requests.
///
/// ```
/// use webhook::{Decoder, FixedClock, WebhookConfig, WebhookEvent, WebhookType};
///
/// let clock = FixedClock::at_unix(1755117410).unwrap();
/// let decoder = Decoder::with_clock(WebhookConfig::default(), clock);
/// let webhook = decoder
///     .decode(br#"{"type":"reaction","webhook_timestamp":1755117405}"#)
///     .unwrap();
/// assert!(webhook.is(WebhookType::Reaction));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder<C = SystemClock> {
    config: WebhookConfig,
    clock: C,
}

impl Decoder {
    pub fn new(config: WebhookConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Decoder<C> {
    pub fn with_clock(config: WebhookConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Reads an unsigned delivery from `request`.
    pub fn read<R>(&self, request: Option<&mut R>) -> Result<Webhook, WebhookError>
    where
        R: InboundRequest + ?Sized,
    {
        self.read_unsigned(request).inspect_err(log_rejection)
    }

    /// Reads a delivery and checks its `Pachca-Signature` against `secret`
    /// before decoding.
    pub fn read_signed<R>(
        &self,
        request: Option<&mut R>,
        secret: &str,
    ) -> Result<Webhook, WebhookError>
    where
        R: InboundRequest + ?Sized,
    {
        self.read_verified(request, secret)
            .inspect_err(log_rejection)
    }

    /// Decodes raw webhook JSON.
    pub fn decode(&self, data: &[u8]) -> Result<Webhook, WebhookError> {
        self.decode_payload(data).inspect_err(log_rejection)
    }

    /// Checks `signature`, the raw header value, against the raw `data` and
    /// decodes it. For callers that already hold the body bytes, such as
    /// HTTP frameworks.
    pub fn decode_signed(
        &self,
        data: &[u8],
        signature: Option<&[u8]>,
        secret: &str,
    ) -> Result<Webhook, WebhookError> {
        let signature = signature.unwrap_or_default();
        self.check_size(data)
            .and_then(|_| verify_signature(secret, data, signature))
            .and_then(|_| self.decode_payload(data))
            .inspect_err(log_rejection)
    }

    fn read_unsigned<R>(&self, request: Option<&mut R>) -> Result<Webhook, WebhookError>
    where
        R: InboundRequest + ?Sized,
    {
        let request = request.ok_or(WebhookError::NilRequest)?;
        let body = request.body_reader().ok_or(WebhookError::NilRequest)?;
        let data = read_limited(body, self.config.max_size)?;
        self.decode_payload(&data)
    }

    fn read_verified<R>(
        &self,
        request: Option<&mut R>,
        secret: &str,
    ) -> Result<Webhook, WebhookError>
    where
        R: InboundRequest + ?Sized,
    {
        let request = request.ok_or(WebhookError::NilRequest)?;
        let signature = request.header(SIGNATURE_HEADER).map(<[u8]>::to_vec);
        let body = request.body_reader().ok_or(WebhookError::NilRequest)?;
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::NoSignature)?;

        let data = read_limited(body, self.config.max_size)?;
        verify_signature(secret, &data, &signature)?;
        self.decode_payload(&data)
    }

    fn check_size(&self, data: &[u8]) -> Result<(), WebhookError> {
        if data.len() > self.config.max_size {
            return Err(WebhookError::TooLarge {
                limit: self.config.max_size,
            });
        }
        Ok(())
    }

    fn check_freshness(&self, envelope: &Envelope) -> Result<(), WebhookError> {
        let age = envelope.age_at(self.clock.now());
        if age > self.config.max_age {
            return Err(WebhookError::TooOld {
                age,
                max_age: self.config.max_age,
            });
        }
        Ok(())
    }

    fn decode_payload(&self, data: &[u8]) -> Result<Webhook, WebhookError> {
        let envelope = Envelope::parse(data)?;
        self.check_freshness(&envelope)?;

        let kind = envelope
            .webhook_type()
            .ok_or_else(|| WebhookError::UnsupportedType(envelope.kind.clone()))?;

        let webhook = match kind {
            WebhookType::Message => Webhook::Message(parse::<Message>(data)?),
            WebhookType::Reaction => Webhook::Reaction(parse::<Reaction>(data)?),
            WebhookType::Button => Webhook::Button(parse::<Button>(data)?),
            WebhookType::ChatMember => Webhook::ChatMember(parse::<ChatMember>(data)?),
            WebhookType::OrgMember => Webhook::OrgMember(parse::<OrgMember>(data)?),
            WebhookType::View => Webhook::View(parse::<View>(data)?),
        };

        debug_assert_eq!(webhook.kind(), kind);

        tracing::debug!(
            kind = %kind,
            timestamp = envelope.timestamp,
            "webhook decoded"
        );
        Ok(webhook)
    }
}

fn parse<T: DeserializeOwned>(data: &[u8]) -> Result<T, WebhookError> {
    serde_json::from_slice(data).map_err(WebhookError::Parse)
}

fn log_rejection(err: &WebhookError) {
    tracing::debug!(reason = err.reason(), error = %err, "webhook rejected");
}

/// Reads an unsigned delivery with the default limits.
pub fn read<R>(request: Option<&mut R>) -> Result<Webhook, WebhookError>
where
    R: InboundRequest + ?Sized,
{
    Decoder::new(WebhookConfig::default()).read(request)
}

/// Reads a signed delivery with the default limits.
pub fn read_signed<R>(request: Option<&mut R>, secret: &str) -> Result<Webhook, WebhookError>
where
    R: InboundRequest + ?Sized,
{
    Decoder::new(WebhookConfig::default()).read_signed(request, secret)
}

/// Decodes raw webhook JSON with the default limits.
pub fn decode(data: &[u8]) -> Result<Webhook, WebhookError> {
    Decoder::new(WebhookConfig::default()).decode(data)
}
