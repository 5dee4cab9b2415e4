use std::io::Read;
use std::time::Duration;

use blocks::data::{FormDate, FormFiles, FormOptions, FormTime};
use rand::RngCore;
use serde::Deserialize;
use tracing_test::traced_test;
use webhook::{
    Decoder, FixedClock, InboundRequest, SIGNATURE_HEADER, Webhook, WebhookConfig, WebhookError,
    WebhookEvent, WebhookType, sign, unmarshal_view_data,
};

const TS: i64 = 1755117405;
const SECRET: &str = "pachca_wh_WDZVF7cqjjJNHfhkWRtP5ZtK6QNVJFFSalnBqKmwlvXaIs8tAujAiWua0ChJgDTt";
const REACTION: &str = r#"{"event":"new","type":"reaction","webhook_timestamp":1755117405}"#;
const REACTION_SIGNATURE: &str = "158ea77bf7072f0d709df018429975c5df09f0485f0fc742c40b10fae3a6768f";

fn decoder() -> Decoder<FixedClock> {
    Decoder::with_clock(WebhookConfig::default(), FixedClock::at_unix(TS + 1).unwrap())
}

fn request<'a>(body: &'a str, signature: Option<&str>) -> http::Request<&'a [u8]> {
    let mut builder = http::Request::builder()
        .method("POST")
        .uri("https://webhook.example/pachca");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(body.as_bytes()).expect("request")
}

fn random_secret() -> String {
    let mut buf = [0u8; 32];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

struct Bodiless;

impl InboundRequest for Bodiless {
    fn header(&self, _name: &str) -> Option<&[u8]> {
        Some(b"deadbeef")
    }

    fn body_reader(&mut self) -> Option<&mut dyn Read> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct ViewData {
    info: String,
}

#[test]
fn read_decodes_unsigned_delivery() {
    let mut req = request(REACTION, None);
    let webhook = decoder().read(Some(&mut req)).expect("webhook");
    assert!(webhook.is(WebhookType::Reaction));
}

#[test]
fn read_signed_accepts_known_signature() {
    let mut req = request(REACTION, Some(REACTION_SIGNATURE));
    let webhook = decoder()
        .read_signed(Some(&mut req), SECRET)
        .expect("webhook");
    assert!(matches!(webhook, Webhook::Reaction(_)));
}

#[test]
fn read_signed_accepts_fresh_signature() {
    let secret = random_secret();
    let body = r#"{"type":"button","webhook_timestamp":1755117405,"data":"ok","trigger_id":"t-1"}"#;
    let signature = sign(&secret, body.as_bytes()).unwrap();
    let mut req = request(body, Some(&signature));

    let webhook = decoder()
        .read_signed(Some(&mut req), &secret)
        .expect("webhook");
    let button = webhook.as_button().expect("button");
    assert_eq!(button.data, "ok");
    assert_eq!(button.trigger_id, "t-1");
}

#[test]
fn any_flipped_byte_breaks_the_signature() {
    let decoder = decoder();

    for i in 0..REACTION.len() {
        let mut body = REACTION.as_bytes().to_vec();
        body[i] ^= 0x01;
        assert!(
            matches!(
                decoder.decode_signed(&body, Some(REACTION_SIGNATURE.as_bytes()), SECRET),
                Err(WebhookError::InvalidSignature)
            ),
            "body byte {i}"
        );
    }

    for i in 0..REACTION_SIGNATURE.len() {
        let mut sig = REACTION_SIGNATURE.as_bytes().to_vec();
        sig[i] = if sig[i] == b'0' { b'1' } else { b'0' };
        assert!(
            matches!(
                decoder.decode_signed(REACTION.as_bytes(), Some(sig.as_slice()), SECRET),
                Err(WebhookError::InvalidSignature)
            ),
            "signature char {i}"
        );
    }
}

#[test]
fn missing_and_wrong_signatures_are_distinct() {
    let mut req = request(REACTION, None);
    let err = decoder().read_signed(Some(&mut req), "test").unwrap_err();
    assert!(matches!(err, WebhookError::NoSignature));

    let mut req = request(REACTION, Some(""));
    let err = decoder().read_signed(Some(&mut req), "test").unwrap_err();
    assert!(matches!(err, WebhookError::NoSignature));

    let mut req = request(REACTION, Some("0000"));
    let err = decoder().read_signed(Some(&mut req), "xxxx").unwrap_err();
    assert!(matches!(err, WebhookError::InvalidSignature));
}

#[test]
fn non_text_signature_is_a_mismatch() {
    let mut req = request(REACTION, None);
    req.headers_mut().insert(
        http::HeaderName::from_bytes(SIGNATURE_HEADER.as_bytes()).unwrap(),
        http::HeaderValue::from_bytes(b"\xffbad").unwrap(),
    );
    let err = decoder().read_signed(Some(&mut req), SECRET).unwrap_err();
    assert!(matches!(err, WebhookError::InvalidSignature));

    let err = decoder()
        .decode_signed(REACTION.as_bytes(), Some(&b"\xffbad"[..]), SECRET)
        .unwrap_err();
    assert!(matches!(err, WebhookError::InvalidSignature));
}

#[test]
fn absent_request_or_body_fails_before_reading() {
    let err = decoder()
        .read::<http::Request<&[u8]>>(None)
        .unwrap_err();
    assert!(matches!(err, WebhookError::NilRequest));

    let err = decoder()
        .read_signed::<http::Request<&[u8]>>(None, "test")
        .unwrap_err();
    assert!(matches!(err, WebhookError::NilRequest));

    assert!(matches!(
        decoder().read(Some(&mut Bodiless)),
        Err(WebhookError::NilRequest)
    ));
    assert!(matches!(
        decoder().read_signed(Some(&mut Bodiless), "test"),
        Err(WebhookError::NilRequest)
    ));
}

#[test]
fn oversized_body_is_rejected() {
    let decoder = Decoder::with_clock(
        WebhookConfig::default().with_max_size(16),
        FixedClock::at_unix(TS).unwrap(),
    );
    let mut req = request(REACTION, None);
    assert!(matches!(
        decoder.read(Some(&mut req)),
        Err(WebhookError::TooLarge { limit: 16 })
    ));
}

#[test]
fn every_discriminator_dispatches_to_its_shape() {
    let decoder = decoder();
    let cases = [
        ("message", "new", WebhookType::Message),
        ("reaction", "new", WebhookType::Reaction),
        ("button", "", WebhookType::Button),
        ("chat_member", "add", WebhookType::ChatMember),
        ("company_member", "invite", WebhookType::OrgMember),
        ("view", "submit", WebhookType::View),
    ];

    for (wire, event, kind) in cases {
        let body = format!(r#"{{"event":"{event}","type":"{wire}","webhook_timestamp":{TS}}}"#);
        let webhook = decoder.decode(body.as_bytes()).expect(wire);
        assert!(webhook.is(kind), "{body}");
        assert_eq!(webhook.kind(), kind);
        assert_eq!(webhook.to_string(), kind.as_str());
        assert_eq!(webhook.timestamp(), TS);

        let variant_matches = match (&webhook, kind) {
            (Webhook::Message(_), WebhookType::Message)
            | (Webhook::Reaction(_), WebhookType::Reaction)
            | (Webhook::Button(_), WebhookType::Button)
            | (Webhook::ChatMember(_), WebhookType::ChatMember)
            | (Webhook::OrgMember(_), WebhookType::OrgMember)
            | (Webhook::View(_), WebhookType::View) => true,
            _ => false,
        };
        assert!(variant_matches, "{body}");
    }
}

#[test]
fn message_age_is_measured_from_the_clock() {
    let decoder = Decoder::with_clock(
        WebhookConfig::default(),
        FixedClock::at_unix(TS + 42).unwrap(),
    );
    let webhook = decoder
        .decode(br#"{"event":"new","type":"message","webhook_timestamp":1755117405}"#)
        .unwrap();
    let now = time::OffsetDateTime::from_unix_timestamp(TS + 42).unwrap();
    assert_eq!(webhook.age_at(now), Duration::from_secs(42));
    assert!(webhook.age() > Duration::ZERO);
}

#[test]
fn unsupported_type_is_named() {
    let err = decoder()
        .decode(br#"{"event":"new","type":"unknown","webhook_timestamp":1755117405}"#)
        .unwrap_err();
    match err {
        WebhookError::UnsupportedType(kind) => assert_eq!(kind, "unknown"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    for body in ["{", "", "null", "not json", r#"{"type":"message""#] {
        let err = decoder().decode(body.as_bytes()).unwrap_err();
        assert!(matches!(err, WebhookError::Parse(_)), "{body:?}");
        assert!(err.to_string().starts_with("can't parse webhook JSON"));
    }
}

#[test]
fn stale_webhook_reports_age_and_limit() {
    let decoder = Decoder::with_clock(
        WebhookConfig::default().with_max_age(Duration::from_secs(1)),
        FixedClock::at_unix(TS + 120).unwrap(),
    );
    let err = decoder
        .decode(br#"{"event":"new","type":"message","webhook_timestamp":1755117405}"#)
        .unwrap_err();
    match err {
        WebhookError::TooOld { age, max_age } => {
            assert_eq!(age, Duration::from_secs(120));
            assert_eq!(max_age, Duration::from_secs(1));
        }
        other => panic!("unexpected error: {other}"),
    }

    let fresh = Decoder::with_clock(
        WebhookConfig::default().with_max_age(Duration::from_secs(1)),
        FixedClock::at_unix(TS + 1).unwrap(),
    );
    assert!(
        fresh
            .decode(br#"{"event":"new","type":"message","webhook_timestamp":1755117405}"#)
            .is_ok()
    );
}

#[test]
fn current_timestamp_passes_default_decoder() {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let body = format!(r#"{{"type":"reaction","webhook_timestamp":{now}}}"#);
    let webhook = webhook::decode(body.as_bytes()).expect("webhook");
    assert!(webhook.is(WebhookType::Reaction));
    assert!(webhook.as_reaction().is_some());
}

#[test]
fn view_data_decodes_into_caller_shape() {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let body = format!(r#"{{"type":"view","webhook_timestamp":{now},"data":{{"info":"x"}}}}"#);
    let webhook = webhook::decode(body.as_bytes()).expect("webhook");

    let data: ViewData = webhook.as_view().expect("view").unmarshal_data().unwrap();
    assert_eq!(data.info, "x");
}

#[test]
fn view_data_errors_are_distinguishable() {
    let webhook = decoder()
        .decode(br#"{"event":"submit","type":"view","webhook_timestamp":1755117405}"#)
        .unwrap();
    assert!(matches!(
        webhook.as_view().unwrap().unmarshal_data::<ViewData>(),
        Err(WebhookError::EmptyData)
    ));

    assert!(matches!(
        unmarshal_view_data::<ViewData>(None),
        Err(WebhookError::NilWebhook)
    ));

    let message = decoder()
        .decode(br#"{"type":"message","webhook_timestamp":1755117405}"#)
        .unwrap();
    assert!(matches!(
        unmarshal_view_data::<ViewData>(message.as_view()),
        Err(WebhookError::NilWebhook)
    ));
}

#[test]
fn view_form_submission_uses_form_types() {
    #[derive(Debug, Deserialize)]
    struct Vacation {
        start: FormDate,
        until: FormDate,
        call_at: FormTime,
        kinds: FormOptions,
        documents: FormFiles,
    }

    let webhook = decoder()
        .decode(
            br#"{
                "type": "view",
                "webhook_timestamp": 1755117405,
                "event": "submit",
                "callback_id": "vacation",
                "private_metadata": "{\"team\":7}",
                "user_id": 12,
                "data": {
                    "start": "2025-08-20",
                    "until": "31.08.2025",
                    "call_at": "09:30",
                    "kinds": ["paid", "remote"],
                    "documents": [{"name": "a.pdf", "url": "https://files.example/a.pdf", "size": 1024}]
                }
            }"#,
        )
        .unwrap();
    let view = webhook.as_view().unwrap();
    assert_eq!(view.callback_id, "vacation");
    assert_eq!(view.metadata, r#"{"team":7}"#);

    let form: Vacation = view.unmarshal_data().unwrap();
    assert_eq!(form.start.to_string(), "2025-08-20");
    assert_eq!(form.until.to_string(), "2025-08-31");
    assert_eq!(form.call_at.to_string(), "09:30");
    assert!(form.kinds.has("remote"));
    assert!(!form.kinds.has("sick"));
    assert_eq!(form.documents.get(0).map(|f| f.size), Some(1024));
    assert!(form.documents.get(1).is_none());
}

#[test]
fn chat_and_org_members_carry_user_lists() {
    let decoder = decoder();
    let chat = decoder
        .decode(
            br#"{"type":"chat_member","event":"remove","webhook_timestamp":1755117405,
                 "chat_id":99,"thread_id":null,"user_ids":[1,2,3],
                 "created_at":"2025-08-13T20:36:45.000Z"}"#,
        )
        .unwrap();
    let chat = chat.as_chat_member().unwrap();
    assert_eq!(chat.event, Some(webhook::EventKind::Remove));
    assert_eq!(chat.user_ids, vec![1, 2, 3]);
    assert_eq!(chat.thread_id, None);

    let org = decoder
        .decode(
            br#"{"type":"company_member","event":"suspend","webhook_timestamp":1755117405,"user_ids":[5]}"#,
        )
        .unwrap();
    let org = org.as_org_member().unwrap();
    assert_eq!(org.event, Some(webhook::EventKind::Suspend));
    assert_eq!(org.user_ids, vec![5]);
    assert!(org.created_at.is_none());
}

#[test]
fn link_shared_message_lists_unfurl_candidates() {
    let webhook = decoder()
        .decode(
            br#"{"type":"message","event":"link_shared","webhook_timestamp":1755117405,
                 "chat_id":3,"id":44,
                 "links":[{"url":"https://a.example/x","domain":"a.example"},
                          {"url":"https://b.example/y","domain":"b.example"}]}"#,
        )
        .unwrap();
    let message = webhook.as_message().unwrap();
    assert!(message.is_event(webhook::EventKind::LinkShared));
    let domains: Vec<_> = message.links.iter().map(|l| l.domain.as_str()).collect();
    assert_eq!(domains, ["a.example", "b.example"]);
}

#[test]
fn message_command_extraction() {
    let decoder = decoder();
    let command = |content: &str| {
        let body = serde_json::json!({
            "type": "message",
            "webhook_timestamp": TS,
            "content": content,
        })
        .to_string();
        let webhook = decoder.decode(body.as_bytes()).unwrap();
        let (cmd, args) = webhook.as_message().unwrap().command();
        (cmd.to_string(), args)
    };

    assert_eq!(command(""), (String::new(), vec![]));
    assert_eq!(command("test"), (String::new(), vec![]));
    assert_eq!(command("/test"), ("/test".to_string(), vec![]));
    assert_eq!(
        command(r#"/test "John Doe" 123"#),
        ("/test".to_string(), vec!["John Doe".to_string(), "123".to_string()])
    );
}

#[test]
#[traced_test]
fn rejections_are_logged_with_reason() {
    let _ = decoder().decode(br#"{"type":"poll","webhook_timestamp":1755117405}"#);
    assert!(logs_contain("webhook rejected"));
    assert!(logs_contain("unsupported_type"));
}
