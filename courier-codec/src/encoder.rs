//! Request encoding: a JSON document, or a multipart body when any field
//! carries an upload.
//!
//! Encoding itself is synchronous and touches no shared state; every
//! required-field, enum and union check happens here, before a single byte
//! is handed to a transport. Only streaming the multipart body suspends.

use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::attachment::PendingUpload;
use crate::error::{EncodeError, StreamError};
use crate::json::{Context, ToJson};
use crate::multipart::{self, MultipartBody};
use crate::request::Request;

/// Content type of JSON-only bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Default read size for upload streams (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
/// Smallest accepted read size.
pub const MIN_CHUNK_SIZE: usize = 1024;

/// A body as a stream of chunks, ready for a transport.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Encoder configuration.
#[derive(Clone, Debug)]
pub struct EncoderConfig {
    /// How many bytes of an upload are read per chunk.
    pub chunk_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE }
    }
}

// ─── FieldWriter ─────────────────────────────────────────────────────────────

pub(crate) enum Entry {
    Text { name: &'static str, value: Value },
    Upload(PendingUpload),
}

/// Receives a request's fields from [`Request::write_fields`].
pub struct FieldWriter<'a> {
    ctx: &'a mut Context,
    entries: Vec<Entry>,
}

impl FieldWriter<'_> {
    /// Record one field. `None` is skipped for optional fields and an
    /// error for required ones.
    pub fn field<T: ToJson + ?Sized>(
        &mut self,
        name: &'static str,
        required: bool,
        value: Option<&T>,
    ) -> Result<(), EncodeError> {
        let Some(value) = value else {
            if required {
                return Err(EncodeError::MissingRequiredField { field: name });
            }
            return Ok(());
        };

        let before = self.ctx.upload_count();
        let json = self.ctx.field(name, |ctx| value.to_json(ctx))?;
        let mut uploads = self.ctx.drain_uploads(before);

        // A top-level attachment is the part itself; anything nested stays
        // in the JSON as an `attach://` reference next to its own parts.
        if uploads.len() == 1 && uploads[0].part == name {
            self.entries.extend(uploads.pop().map(Entry::Upload));
            return Ok(());
        }
        if !json.is_null() {
            self.entries.push(Entry::Text { name, value: json });
        }
        self.entries.extend(uploads.into_iter().map(Entry::Upload));
        Ok(())
    }
}

// ─── RequestEncoder ──────────────────────────────────────────────────────────

/// Turns typed requests into wire bodies.
#[derive(Clone, Debug, Default)]
pub struct RequestEncoder {
    config: EncoderConfig,
}

impl RequestEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig { &self.config }

    /// Encode `request`, consuming it: its upload streams move into the
    /// returned body, so the same value cannot be encoded twice.
    pub fn encode<R: Request>(&self, request: R) -> Result<Body, EncodeError> {
        let mut ctx = Context::collecting();
        let mut writer = FieldWriter { ctx: &mut ctx, entries: Vec::new() };
        request.write_fields(&mut writer)?;
        let entries = writer.entries;

        if !entries.iter().any(|e| matches!(e, Entry::Upload(_))) {
            let mut map = Map::with_capacity(entries.len());
            for entry in entries {
                if let Entry::Text { name, value } = entry {
                    map.insert(name.to_owned(), value);
                }
            }
            let body = Bytes::from(Value::Object(map).to_string());
            tracing::debug!(method = R::METHOD, bytes = body.len(), "encoded JSON request");
            return Ok(Body::Json(body));
        }

        let chunk_size = self.config.chunk_size.max(MIN_CHUNK_SIZE);
        let body = MultipartBody::new(entries, chunk_size)?;
        tracing::debug!(
            method = R::METHOD,
            parts = body.part_count(),
            uploads = body.upload_count(),
            boundary = body.boundary(),
            "encoded multipart request",
        );
        Ok(Body::Multipart(body))
    }
}

// ─── Body ────────────────────────────────────────────────────────────────────

/// An encoded request body.
#[derive(Debug)]
pub enum Body {
    Json(Bytes),
    Multipart(MultipartBody),
}

impl Body {
    /// The value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        match self {
            Self::Json(_) => JSON_CONTENT_TYPE.to_owned(),
            Self::Multipart(m) => m.content_type(),
        }
    }

    pub fn is_multipart(&self) -> bool { matches!(self, Self::Multipart(_)) }

    /// The body as a chunk stream. Triggering `cancel` makes the stream
    /// yield [`StreamError::Cancelled`] and end; nothing already yielded is
    /// taken back.
    pub fn into_stream(self, cancel: CancellationToken) -> BodyStream {
        let inner: BodyStream = match self {
            Self::Json(bytes) => Box::pin(stream::once(async move { Ok(bytes) })),
            Self::Multipart(m) => m.into_stream(),
        };
        Box::pin(multipart::cancellable(inner, cancel))
    }

    /// Drain the whole body into memory.
    pub async fn collect(self) -> Result<Bytes, StreamError> {
        let mut stream = self.into_stream(CancellationToken::new());
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(out))
    }
}
