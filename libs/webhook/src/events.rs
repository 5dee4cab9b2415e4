use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use time::OffsetDateTime;

use crate::envelope::{EventKind, WebhookType, age_between, nullable, optional_rfc3339};
use crate::error::WebhookError;

/// Behaviour shared by every webhook shape.
pub trait WebhookEvent {
    fn kind(&self) -> WebhookType;

    /// Unix seconds at which the origin emitted the webhook.
    fn timestamp(&self) -> i64;

    fn is(&self, kind: WebhookType) -> bool {
        self.kind() == kind
    }

    fn age_at(&self, now: OffsetDateTime) -> Duration {
        age_between(self.timestamp(), now)
    }

    fn age(&self) -> Duration {
        self.age_at(OffsetDateTime::now_utc())
    }
}

/// Kind of entity a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Discussion,
    Thread,
    User,
    #[serde(other)]
    Unknown,
}

/// Thread a message was posted to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    #[serde(default, deserialize_with = "nullable")]
    pub message_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub message_chat_id: u64,
}

/// Link in a message the origin asks us to build a preview for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnfurlLink {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub domain: String,
}

/// New, updated, or deleted message; also link-unfurl requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(rename = "id", default, deserialize_with = "nullable")]
    pub message_id: u64,
    #[serde(default)]
    pub event: Option<EventKind>,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default, deserialize_with = "nullable")]
    pub entity_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub chat_id: u64,
    #[serde(default)]
    pub parent_message_id: Option<u64>,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub thread: Option<Thread>,
    #[serde(default, deserialize_with = "nullable")]
    pub links: Vec<UnfurlLink>,
}

impl Message {
    pub fn is_event(&self, event: EventKind) -> bool {
        self.event == Some(event)
    }

    pub fn is_new(&self) -> bool {
        self.is_event(EventKind::New)
    }

    pub fn is_update(&self) -> bool {
        self.is_event(EventKind::Update)
    }

    pub fn is_delete(&self) -> bool {
        self.is_event(EventKind::Delete)
    }

    /// Leading slash command and its arguments, see [`crate::parse_command`].
    pub fn command(&self) -> (&str, Vec<String>) {
        crate::command::parse_command(&self.content)
    }
}

/// Reaction added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reaction {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(default)]
    pub event: Option<EventKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub message_id: u64,
    /// Emoji of the reaction.
    #[serde(default, deserialize_with = "nullable")]
    pub code: String,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
}

/// Click on a message button.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub data: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub message_id: u64,
    /// Correlates a later view opened in response to the click.
    #[serde(default, deserialize_with = "nullable")]
    pub trigger_id: String,
}

/// Members added to or removed from a chat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMember {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(default)]
    pub event: Option<EventKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub chat_id: u64,
    #[serde(default)]
    pub thread_id: Option<u64>,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_ids: Vec<u64>,
}

/// Changes to the organization's member list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgMember {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(default)]
    pub event: Option<EventKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_ids: Vec<u64>,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
}

/// Submitted view form. `data` is kept undecoded; its shape is defined by
/// the form that was opened, see [`View::unmarshal_data`].
#[derive(Debug, Clone, Deserialize)]
pub struct View {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(rename = "webhook_timestamp")]
    pub timestamp: i64,
    #[serde(default)]
    pub event: Option<EventKind>,
    #[serde(rename = "private_metadata", default, deserialize_with = "nullable")]
    pub metadata: String,
    #[serde(default, deserialize_with = "nullable")]
    pub callback_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: u64,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl View {
    /// Decodes the submitted form data into `T`.
    ///
    /// ```
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Form {
    ///     info: String,
    /// }
    ///
    /// let view: webhook::View = serde_json::from_str(
    ///     r#"{"type":"view","webhook_timestamp":0,"data":{"info":"x"}}"#,
    /// )
    /// .unwrap();
    /// let form: Form = view.unmarshal_data().unwrap();
    /// assert_eq!(form.info, "x");
    /// ```
    pub fn unmarshal_data<T: DeserializeOwned>(&self) -> Result<T, WebhookError> {
        unmarshal_view_data(Some(self))
    }

    /// Raw JSON text of the form data, if any.
    pub fn raw_data(&self) -> Option<&str> {
        self.data.as_deref().map(RawValue::get)
    }
}

/// Decodes view form data, telling an absent view apart from one without
/// data.
///
/// ```
/// use webhook::{WebhookError, unmarshal_view_data};
///
/// let err = unmarshal_view_data::<serde_json::Value>(None).unwrap_err();
/// assert!(matches!(err, WebhookError::NilWebhook));
/// ```
pub fn unmarshal_view_data<T: DeserializeOwned>(view: Option<&View>) -> Result<T, WebhookError> {
    let view = view.ok_or(WebhookError::NilWebhook)?;
    let raw = view
        .data
        .as_deref()
        .map(RawValue::get)
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(WebhookError::EmptyData)?;

    serde_json::from_str(raw).map_err(WebhookError::Data)
}

macro_rules! webhook_event {
    ($($shape:ident),+ $(,)?) => {
        $(
            impl WebhookEvent for $shape {
                fn kind(&self) -> WebhookType {
                    self.kind
                }

                fn timestamp(&self) -> i64 {
                    self.timestamp
                }
            }

            impl fmt::Display for $shape {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.kind.as_str())
                }
            }
        )+
    };
}

webhook_event!(Message, Reaction, Button, ChatMember, OrgMember, View);

/// A decoded webhook of any supported type.
#[derive(Debug, Clone)]
pub enum Webhook {
    Message(Message),
    Reaction(Reaction),
    Button(Button),
    ChatMember(ChatMember),
    OrgMember(OrgMember),
    View(View),
}

impl Webhook {
    fn as_event(&self) -> &dyn WebhookEvent {
        match self {
            Webhook::Message(w) => w,
            Webhook::Reaction(w) => w,
            Webhook::Button(w) => w,
            Webhook::ChatMember(w) => w,
            Webhook::OrgMember(w) => w,
            Webhook::View(w) => w,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Webhook::Message(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&Reaction> {
        match self {
            Webhook::Reaction(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Webhook::Button(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_chat_member(&self) -> Option<&ChatMember> {
        match self {
            Webhook::ChatMember(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_org_member(&self) -> Option<&OrgMember> {
        match self {
            Webhook::OrgMember(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Webhook::View(w) => Some(w),
            _ => None,
        }
    }
}

impl WebhookEvent for Webhook {
    fn kind(&self) -> WebhookType {
        self.as_event().kind()
    }

    fn timestamp(&self) -> i64 {
        self.as_event().timestamp()
    }
}

impl fmt::Display for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())
    }
}
