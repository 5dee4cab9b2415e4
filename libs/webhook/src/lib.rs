//! Pachca webhook reader and decoder.
//!
//! A delivery goes through a bounded body read, an optional
//! `Pachca-Signature` check over the raw bytes, an envelope decode
//! (`type` + `webhook_timestamp`), a freshness check, and finally a full
//! decode into the shape selected by `type`.
//!
//! ```
//! use webhook::{Decoder, FixedClock, Webhook, WebhookConfig, WebhookEvent};
//!
//! let decoder = Decoder::with_clock(
//!     WebhookConfig::default(),
//!     FixedClock::at_unix(1755117405).unwrap(),
//! );
//! let body = br#"{"type":"message","webhook_timestamp":1755117405,"content":"/help"}"#;
//! match decoder.decode(body).unwrap() {
//!     Webhook::Message(message) => assert_eq!(message.command().0, "/help"),
//!     other => panic!("unexpected {other}"),
//! }
//! ```
pub mod clock;
pub mod command;
pub mod config;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod events;
pub mod reader;
pub mod signature;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::parse_command;
pub use config::{DEFAULT_MAX_AGE, DEFAULT_MAX_SIZE, WebhookConfig};
pub use decoder::{Decoder, decode, read, read_signed};
pub use envelope::{Envelope, EventKind, WebhookType};
pub use error::WebhookError;
pub use events::{
    Button, ChatMember, EntityType, Message, OrgMember, Reaction, Thread, UnfurlLink, View,
    Webhook, WebhookEvent, unmarshal_view_data,
};
pub use reader::{InboundRequest, read_limited};
pub use signature::{SIGNATURE_HEADER, sign, verify_signature};
