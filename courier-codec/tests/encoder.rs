use courier_codec::serde_json::{self, Value, json};
use courier_codec::{
    Body, EncodeError, EncoderConfig, ErrorKind, InputFile, Request, RequestEncoder, StreamError,
    Upload, bot_method, json_object, tagged_union, wire_enum,
};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

wire_enum! {
    pub enum ParseMode {
        Html => "HTML",
        MarkdownV2 => "MarkdownV2",
    }
}

wire_enum! {
    pub enum MediaKind {
        Photo => "photo",
        Document => "document",
    }
}

json_object! {
    #[derive(Debug)]
    pub struct MediaPhoto {
        pub media: InputFile,
        pub caption: Option<String>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct MediaDocument {
        pub media: InputFile,
    }
}

tagged_union! {
    #[derive(Debug)]
    pub enum Media : MediaKind as "type" {
        Photo(MediaPhoto) => Photo,
        Document(MediaDocument) => Document,
    }
}

bot_method! {
    pub struct SendMessage => "sendMessage" -> Value {
        required chat_id: i64,
        required text: String,
        optional parse_mode: ParseMode,
        optional disable_notification: bool,
    }
}

bot_method! {
    pub struct SendPhoto => "sendPhoto" -> Value {
        required chat_id: i64,
        required photo: InputFile,
        optional caption: String,
        optional disable_notification: bool,
    }
}

bot_method! {
    pub struct SendMediaGroup => "sendMediaGroup" -> Value {
        required chat_id: i64,
        required media: Vec<Media>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct Holder {
        pub b: InputFile,
    }
}

bot_method! {
    pub struct SendLookalikes => "sendLookalikes" -> Value {
        required a: Vec<Holder>,
        optional a_0_b: InputFile,
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    content: String,
}

fn param(head: &str, key: &str) -> Option<String> {
    let needle = format!("{key}=\"");
    let start = head.find(&needle)? + needle.len();
    let end = head[start..].find('"')? + start;
    Some(head[start..end].to_owned())
}

fn boundary_of(body: &Body) -> String {
    body.content_type()
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type")
        .to_owned()
}

fn parse_multipart(body: &[u8], boundary: &str) -> Vec<Part> {
    let body = std::str::from_utf8(body).unwrap();
    let closing = format!("--{boundary}--\r\n");
    assert!(body.ends_with(&closing), "body must end with the closing delimiter");
    let body = &body[..body.len() - closing.len()];

    body.split(&format!("--{boundary}"))
        .skip(1)
        .map(|chunk| {
            let chunk = chunk.strip_prefix("\r\n").unwrap().strip_suffix("\r\n").unwrap();
            let (head, content) = chunk.split_once("\r\n\r\n").unwrap();
            Part {
                name: param(head, "name").unwrap(),
                filename: param(head, "filename"),
                content_type: head
                    .lines()
                    .find_map(|l| l.strip_prefix("Content-Type: "))
                    .map(str::to_owned),
                content: content.to_owned(),
            }
        })
        .collect()
}

// ── JSON bodies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_without_uploads_is_json() {
    let req = SendMessage::default()
        .chat_id(42)
        .text("hi *there*")
        .parse_mode(ParseMode::MarkdownV2);
    let body = RequestEncoder::default().encode(req).unwrap();
    assert!(!body.is_multipart());
    assert_eq!(body.content_type(), "application/json");

    let bytes = body.collect().await.unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"{"chat_id":42,"text":"hi *there*","parse_mode":"MarkdownV2"}"#
    );
}

#[tokio::test]
async fn file_references_and_urls_stay_json() {
    let req = SendPhoto::default()
        .chat_id(1)
        .photo("AgACAgIAAxkBAAI")
        .caption("again");
    let body = RequestEncoder::default().encode(req).unwrap();
    assert!(!body.is_multipart());
    let v: Value = serde_json::from_slice(&body.collect().await.unwrap()).unwrap();
    assert_eq!(v, json!({ "chat_id": 1, "photo": "AgACAgIAAxkBAAI", "caption": "again" }));

    let req = SendPhoto::default().chat_id(1).photo("https://example.org/cat.jpg");
    assert!(!RequestEncoder::default().encode(req).unwrap().is_multipart());
}

#[test]
fn missing_required_field_is_reported_before_sending() {
    let err = RequestEncoder::default()
        .encode(SendMessage::default().chat_id(1))
        .unwrap_err();
    assert!(matches!(err, EncodeError::MissingRequiredField { field: "text" }));
}

#[test]
fn sentinel_enum_fails_encoding_with_its_path() {
    let req = SendMessage::default()
        .chat_id(1)
        .text("x")
        .parse_mode(ParseMode::Unspecified);
    match RequestEncoder::default().encode(req).unwrap_err() {
        EncodeError::Codec(e) => {
            assert!(matches!(e.kind(), ErrorKind::UnmappableVariant { enum_name: "ParseMode", .. }));
            assert_eq!(e.path().to_string(), "parse_mode");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn declared_fields_follow_schema_order() {
    let names: Vec<_> = SendPhoto::FIELDS.iter().map(|f| (f.name, f.required)).collect();
    assert_eq!(
        names,
        [("chat_id", true), ("photo", true), ("caption", false), ("disable_notification", false)]
    );
    assert_eq!(SendPhoto::METHOD, "sendPhoto");
}

// ── Multipart bodies ──────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_switches_to_multipart() {
    let req = SendPhoto::default()
        .chat_id(42)
        .photo(Upload::from_bytes(&b"PNG fake image"[..], "cat.png"))
        .caption("say \"cheese\"")
        .disable_notification(true);
    let body = RequestEncoder::default().encode(req).unwrap();
    assert!(body.is_multipart());
    if let Body::Multipart(m) = &body {
        assert_eq!(m.part_names(), ["chat_id", "photo", "caption", "disable_notification"]);
        assert_eq!(m.upload_count(), 1);
    }

    let boundary = boundary_of(&body);
    let parts = parse_multipart(&body.collect().await.unwrap(), &boundary);
    assert_eq!(parts.len(), 4);

    assert_eq!(parts[0].name, "chat_id");
    assert_eq!(parts[0].content, "42");
    assert_eq!(parts[0].filename, None);

    assert_eq!(parts[1].name, "photo");
    assert_eq!(parts[1].filename.as_deref(), Some("cat.png"));
    assert_eq!(parts[1].content_type.as_deref(), Some("image/png"));
    assert_eq!(parts[1].content, "PNG fake image");

    // strings go in raw, everything else as compact JSON
    assert_eq!(parts[2].content, "say \"cheese\"");
    assert_eq!(parts[3].content, "true");
}

#[tokio::test]
async fn nested_uploads_become_attach_references() {
    let req = SendMediaGroup::default().chat_id(-100).media(vec![
        Media::from(MediaPhoto {
            media: Upload::from_bytes(&b"first"[..], "a.jpg").into(),
            caption: Some("one".into()),
        }),
        Media::from(MediaPhoto { media: "https://example.org/b.jpg".into(), caption: None }),
        Media::from(MediaDocument { media: Upload::from_bytes(&b"third"[..], "c.txt").into() }),
    ]);
    let body = RequestEncoder::default().encode(req).unwrap();
    let boundary = boundary_of(&body);
    let parts = parse_multipart(&body.collect().await.unwrap(), &boundary);

    let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["chat_id", "media", "media[0].media", "media[2].media"]);

    let media: Value = serde_json::from_str(&parts[1].content).unwrap();
    assert_eq!(
        media,
        json!([
            { "type": "photo", "media": "attach://media[0].media", "caption": "one" },
            { "type": "photo", "media": "https://example.org/b.jpg" },
            { "type": "document", "media": "attach://media[2].media" }
        ])
    );
    assert_eq!(parts[2].filename.as_deref(), Some("a.jpg"));
    assert_eq!(parts[2].content, "first");
    assert_eq!(parts[3].content_type.as_deref(), Some("text/plain"));
    assert_eq!(parts[3].content, "third");
}

#[tokio::test]
async fn reader_uploads_stream_in_bounded_chunks() {
    let payload: Vec<u8> = (0..5000).map(|i| b'a' + (i % 26) as u8).collect();
    let req = SendPhoto::default()
        .chat_id(1)
        .photo(Upload::from_reader(std::io::Cursor::new(payload.clone()), "letters.txt"));
    let encoder = RequestEncoder::new(EncoderConfig { chunk_size: 1024 });
    let body = encoder.encode(req).unwrap();
    let boundary = boundary_of(&body);

    let chunks: Vec<_> = body
        .into_stream(CancellationToken::new())
        .map(|c| c.unwrap())
        .collect()
        .await;
    assert!(chunks.iter().all(|c| c.len() <= 1024));

    let bytes: Vec<u8> = chunks.concat();
    let parts = parse_multipart(&bytes, &boundary);
    assert_eq!(parts[1].content.as_bytes(), &payload[..]);
}

#[test]
fn disposed_upload_is_unavailable() {
    let upload = Upload::from_bytes(&b"gone"[..], "a.bin");
    upload.dispose();
    assert!(!upload.is_available());

    let err = RequestEncoder::default()
        .encode(SendPhoto::default().chat_id(1).photo(upload))
        .unwrap_err();
    match err {
        EncodeError::StreamUnavailable { path, .. } => assert_eq!(path.to_string(), "photo"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_file_is_unavailable() {
    let req = SendPhoto::default()
        .chat_id(1)
        .photo(Upload::from_path("/definitely/not/here.jpg"));
    let err = RequestEncoder::default().encode(req).unwrap_err();
    assert!(matches!(err, EncodeError::StreamUnavailable { .. }));
}

#[tokio::test]
async fn cancellation_ends_the_stream_with_an_error() {
    let req = SendPhoto::default()
        .chat_id(1)
        .photo(Upload::from_bytes(vec![7u8; 10_000], "big.bin"));
    let body = RequestEncoder::new(EncoderConfig { chunk_size: 1024 }).encode(req).unwrap();

    let cancel = CancellationToken::new();
    let mut stream = body.into_stream(cancel.clone());
    assert!(stream.next().await.unwrap().is_ok());
    cancel.cancel();
    assert!(matches!(stream.next().await, Some(Err(StreamError::Cancelled))));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn boundary_inside_streamed_upload_fails_the_body() {
    let (mut tx, rx) = tokio::io::duplex(4096);
    let req = SendPhoto::default()
        .chat_id(1)
        .photo(Upload::from_reader(rx, "evil.bin"));
    let body = RequestEncoder::default().encode(req).unwrap();
    let boundary = boundary_of(&body);

    // split the delimiter so it straddles two reads
    let evil = format!("prefix--{boundary}suffix");
    let (first, second) = evil.split_at(12);
    tx.write_all(first.as_bytes()).await.unwrap();
    let second = second.to_owned();
    tokio::spawn(async move {
        tokio::task::yield_now().await;
        tx.write_all(second.as_bytes()).await.unwrap();
    });

    let err = body.collect().await.unwrap_err();
    assert!(matches!(err, StreamError::BoundaryCollision { part } if part == "photo"));
}

#[tokio::test]
async fn exhausted_reader_fails_instead_of_sending_an_empty_part() {
    let mut cursor = std::io::Cursor::new(b"already read".to_vec());
    std::io::Read::read_to_end(&mut cursor, &mut Vec::new()).unwrap();

    let req = SendPhoto::default().chat_id(1).photo(Upload::from_reader(cursor, "a.jpg"));
    let body = RequestEncoder::default().encode(req).unwrap();
    let err = body.collect().await.unwrap_err();
    assert!(matches!(err, StreamError::Exhausted { part } if part == "photo"));
}

#[tokio::test]
async fn empty_in_memory_upload_is_still_sent() {
    let req = SendPhoto::default().chat_id(1).photo(Upload::from_bytes(Vec::<u8>::new(), "empty.txt"));
    let body = RequestEncoder::default().encode(req).unwrap();
    let boundary = boundary_of(&body);
    let parts = parse_multipart(&body.collect().await.unwrap(), &boundary);
    assert_eq!(parts[1].content, "");
}

#[test]
fn nested_part_names_never_collide_with_top_level_fields() {
    let req = SendLookalikes::default()
        .a(vec![Holder { b: Upload::from_bytes(&b"nested"[..], "n.bin").into() }])
        .a_0_b(Upload::from_bytes(&b"top"[..], "t.bin"));
    let body = RequestEncoder::default().encode(req).unwrap();
    let Body::Multipart(m) = &body else { panic!("expected multipart") };
    assert_eq!(m.part_names(), ["a", "a[0].b", "a_0_b"]);
}

#[tokio::test]
async fn declared_mime_type_overrides_the_guess() {
    let upload = Upload::from_bytes(&b"a,b"[..], "data.bin").with_mime_type("text/csv");
    let body = RequestEncoder::default()
        .encode(SendPhoto::default().chat_id(1).photo(upload))
        .unwrap();
    let boundary = boundary_of(&body);
    let parts = parse_multipart(&body.collect().await.unwrap(), &boundary);
    assert_eq!(parts[1].content_type.as_deref(), Some("text/csv"));
}

#[test]
fn declared_mime_type_cannot_inject_headers() {
    let upload = Upload::from_bytes(&b"x"[..], "x.bin").with_mime_type("text/plain\r\nX-Injected: 1");
    let err = RequestEncoder::default()
        .encode(SendPhoto::default().chat_id(1).photo(upload))
        .unwrap_err();
    match err {
        EncodeError::Codec(e) => {
            assert!(matches!(e.kind(), ErrorKind::InvalidMimeType { .. }));
            assert_eq!(e.path().to_string(), "photo");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let upload = Upload::from_bytes(&b"x"[..], "x.bin").with_mime_type("not a mime");
    assert!(RequestEncoder::default().encode(SendPhoto::default().chat_id(1).photo(upload)).is_err());
}
