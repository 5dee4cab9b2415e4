use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

use crate::error::WebhookError;

/// Closed set of webhook discriminators (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookType {
    Message,
    Reaction,
    Button,
    ChatMember,
    #[serde(rename = "company_member")]
    OrgMember,
    View,
}

impl WebhookType {
    pub const ALL: [WebhookType; 6] = [
        WebhookType::Message,
        WebhookType::Reaction,
        WebhookType::Button,
        WebhookType::ChatMember,
        WebhookType::OrgMember,
        WebhookType::View,
    ];

    /// Wire string used in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookType::Message => "message",
            WebhookType::Reaction => "reaction",
            WebhookType::Button => "button",
            WebhookType::ChatMember => "chat_member",
            WebhookType::OrgMember => "company_member",
            WebhookType::View => "view",
        }
    }

    /// Maps a wire string onto the closed set.
    ///
    /// ```
    /// use webhook::WebhookType;
    ///
    /// assert_eq!(WebhookType::from_wire("company_member"), Some(WebhookType::OrgMember));
    /// assert_eq!(WebhookType::from_wire("unknown"), None);
    /// ```
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-event carried in the `event` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    New,
    Update,
    Delete,
    Add,
    Remove,
    Invite,
    Confirm,
    Suspend,
    Activate,
    LinkShared,
    Submit,
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::New => "new",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
            EventKind::Add => "add",
            EventKind::Remove => "remove",
            EventKind::Invite => "invite",
            EventKind::Confirm => "confirm",
            EventKind::Suspend => "suspend",
            EventKind::Activate => "activate",
            EventKind::LinkShared => "link_shared",
            EventKind::Submit => "submit",
            EventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal shared fields, decoded before the concrete shape is chosen.
///
/// The discriminator stays a raw string so unsupported values can be
/// reported verbatim. Every other field in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
}

impl Envelope {
    pub fn parse(data: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(data).map_err(WebhookError::Parse)
    }

    pub fn webhook_type(&self) -> Option<WebhookType> {
        WebhookType::from_wire(&self.kind)
    }

    pub fn age_at(&self, now: OffsetDateTime) -> Duration {
        age_between(self.timestamp, now)
    }
}

/// Whole seconds elapsed between `timestamp` and `now`; future timestamps
/// have zero age.
pub(crate) fn age_between(timestamp: i64, now: OffsetDateTime) -> Duration {
    let secs = now.unix_timestamp().saturating_sub(timestamp);
    if secs <= 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(secs as u64)
    }
}

/// Treats an explicit JSON `null` like an absent field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// RFC 3339 timestamps such as `2025-08-13T20:36:45.000Z`.
pub(crate) fn optional_rfc3339<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use time::format_description::well_known::Rfc3339;

    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => OffsetDateTime::parse(&raw, &Rfc3339)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ignores_variant_fields() {
        let env = Envelope::parse(
            br#"{"type":"message","webhook_timestamp":1755117405,"content":"hi","id":7}"#,
        )
        .expect("envelope");
        assert_eq!(env.kind, "message");
        assert_eq!(env.timestamp, 1755117405);
        assert_eq!(env.webhook_type(), Some(WebhookType::Message));
    }

    #[test]
    fn envelope_keeps_unknown_discriminator() {
        let env = Envelope::parse(br#"{"type":"poll","webhook_timestamp":1}"#).expect("envelope");
        assert_eq!(env.kind, "poll");
        assert_eq!(env.webhook_type(), None);
    }

    #[test]
    fn envelope_requires_shared_fields() {
        assert!(matches!(
            Envelope::parse(br#"{"type":"message"}"#),
            Err(WebhookError::Parse(_))
        ));
        assert!(matches!(
            Envelope::parse(br#"{"webhook_timestamp":1}"#),
            Err(WebhookError::Parse(_))
        ));
        assert!(matches!(
            Envelope::parse(br#"{"type":"message","webhook_timestamp":"soon"}"#),
            Err(WebhookError::Parse(_))
        ));
        assert!(matches!(
            Envelope::parse(br#"[1,2]"#),
            Err(WebhookError::Parse(_))
        ));
    }

    #[test]
    fn age_is_clamped_for_future_timestamps() {
        let now = OffsetDateTime::from_unix_timestamp(1_000).unwrap();
        assert_eq!(age_between(940, now), Duration::from_secs(60));
        assert_eq!(age_between(1_000, now), Duration::ZERO);
        assert_eq!(age_between(2_000, now), Duration::ZERO);
        assert_eq!(age_between(i64::MIN, now).as_secs(), i64::MAX as u64);
    }

    #[test]
    fn wire_strings_round_trip_through_from_wire() {
        for kind in WebhookType::ALL {
            assert_eq!(WebhookType::from_wire(kind.as_str()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn unknown_sub_events_do_not_fail() {
        let kind: EventKind = serde_json::from_str(r#""pinned""#).unwrap();
        assert_eq!(kind, EventKind::Unknown);
        let kind: EventKind = serde_json::from_str(r#""link_shared""#).unwrap();
        assert_eq!(kind, EventKind::LinkShared);
    }
}
