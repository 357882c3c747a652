//! Attachment fields: a file the server already has, a URL it should fetch,
//! or local content to upload.
//!
//! Only uploads carry bytes. Their source is a move-only handle that the
//! encoder takes out exactly once; a second take reports
//! [`ErrorKind::StreamUnavailable`] instead of silently sending nothing.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use bytes::Bytes;
use serde_json::Value;
use tokio::io::AsyncRead;

use crate::error::{ErrorKind, Result};
use crate::json::{Context, FromJson, ToJson, invalid_type};

/// Prefix that points a JSON field at a multipart part.
pub const ATTACH_PREFIX: &str = "attach://";

/// An async byte source owned by an upload.
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

// ─── AttachmentKind ──────────────────────────────────────────────────────────

/// The three attachment states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    /// An opaque id of a previously uploaded file.
    Reference,
    /// A URL the server downloads itself.
    Remote,
    /// Local content sent as a multipart part.
    Upload,
}

impl AttachmentKind {
    /// Classify a string value: `http://` / `https://` means [`Remote`](Self::Remote),
    /// anything else is a [`Reference`](Self::Reference).
    pub fn of_str(value: &str) -> Self {
        let has_scheme = |scheme: &str| {
            value.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        };
        if has_scheme("http://") || has_scheme("https://") {
            Self::Remote
        } else {
            Self::Reference
        }
    }
}

// ─── InputFile ───────────────────────────────────────────────────────────────

/// The value of an attachment field in a request.
pub enum InputFile {
    Reference(String),
    Remote(String),
    Upload(Upload),
}

impl InputFile {
    /// Wrap a string, classifying it as a URL or a file id.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        match AttachmentKind::of_str(&value) {
            AttachmentKind::Remote => Self::Remote(value),
            _ => Self::Reference(value),
        }
    }

    pub fn reference(file_id: impl Into<String>) -> Self { Self::Reference(file_id.into()) }

    pub fn remote(url: impl Into<String>) -> Self { Self::Remote(url.into()) }

    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::Reference(_) => AttachmentKind::Reference,
            Self::Remote(_)    => AttachmentKind::Remote,
            Self::Upload(_)    => AttachmentKind::Upload,
        }
    }

    pub fn is_upload(&self) -> bool { matches!(self, Self::Upload(_)) }
}

/// Classify an attachment value.
pub fn classify(file: &InputFile) -> AttachmentKind {
    file.kind()
}

impl From<&str> for InputFile {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for InputFile {
    fn from(value: String) -> Self { Self::new(value) }
}

impl From<Upload> for InputFile {
    fn from(upload: Upload) -> Self { Self::Upload(upload) }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(id) => f.debug_tuple("Reference").field(id).finish(),
            Self::Remote(url)   => f.debug_tuple("Remote").field(url).finish(),
            Self::Upload(u)     => f.debug_tuple("Upload").field(u).finish(),
        }
    }
}

impl ToJson for InputFile {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> {
        match self {
            Self::Reference(s) | Self::Remote(s) => Ok(Value::String(s.clone())),
            Self::Upload(upload) => upload.attach(ctx),
        }
    }
}

/// Only strings can come back from the server; they are classified again.
impl FromJson for InputFile {
    fn from_json(value: &Value) -> Result<Self> {
        value.as_str().map(Self::new).ok_or_else(|| invalid_type("file id or URL", value))
    }
}

// ─── Upload ──────────────────────────────────────────────────────────────────

enum Source {
    Memory(Bytes),
    Reader(BoxReader),
    Path(PathBuf),
}

/// Local content to upload, with the filename reported to the server.
pub struct Upload {
    filename: String,
    mime_type: Option<String>,
    source: Mutex<Option<Source>>,
}

impl Upload {
    fn with_source(source: Source, filename: impl Into<String>) -> Self {
        Self { filename: filename.into(), mime_type: None, source: Mutex::new(Some(source)) }
    }

    /// Upload an in-memory buffer.
    pub fn from_bytes(data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self::with_source(Source::Memory(data.into()), filename)
    }

    /// Upload whatever `reader` yields; it is read once, in order, in
    /// bounded chunks.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static, filename: impl Into<String>) -> Self {
        Self::with_source(Source::Reader(Box::new(reader)), filename)
    }

    /// Upload a file from disk; it is opened when the request is encoded.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());
        Self::with_source(Source::Path(path), filename)
    }

    /// Declare the part's content type instead of guessing it from the filename.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn filename(&self) -> &str { &self.filename }

    /// The declared content type, or one guessed from the filename
    /// (`application/octet-stream` when nothing matches).
    pub fn mime_type(&self) -> String {
        match &self.mime_type {
            Some(m) => m.clone(),
            None => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_owned(),
        }
    }

    /// The content type to put in the part header. A declared type must
    /// parse as a MIME type and carry no control characters.
    fn checked_mime_type(&self) -> std::result::Result<String, ErrorKind> {
        let Some(declared) = &self.mime_type else {
            return Ok(self.mime_type());
        };
        if declared.chars().any(char::is_control) {
            return Err(ErrorKind::InvalidMimeType { value: declared.clone() });
        }
        declared
            .parse::<mime_guess::mime::Mime>()
            .map(|m| m.to_string())
            .map_err(|_| ErrorKind::InvalidMimeType { value: declared.clone() })
    }

    /// `false` once the source has been taken or disposed.
    pub fn is_available(&self) -> bool {
        self.with_slot(|slot| slot.is_some())
    }

    /// Drop the source; encoding this upload afterwards fails.
    pub fn dispose(&self) {
        self.with_slot(|slot| slot.take());
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<Source>) -> T) -> T {
        match self.source.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn take_payload(&self) -> std::result::Result<Payload, String> {
        match self.with_slot(Option::take) {
            Some(Source::Memory(data)) => Ok(Payload::Memory(data)),
            Some(Source::Reader(reader)) => Ok(Payload::Reader(reader)),
            Some(Source::Path(path)) => {
                let file = std::fs::File::open(&path)
                    .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
                Ok(Payload::Reader(Box::new(tokio::fs::File::from_std(file))))
            }
            None => Err("stream already consumed or disposed".to_owned()),
        }
    }

    /// Move the source into `ctx` as a pending part named after the
    /// current path and return the `attach://` reference to it.
    fn attach(&self, ctx: &mut Context) -> Result<Value> {
        if !ctx.accepts_uploads() {
            return Err(ctx.error(ErrorKind::UnexpectedUpload));
        }
        let mime_type = self.checked_mime_type().map_err(|kind| ctx.error(kind))?;
        let payload = self
            .take_payload()
            .map_err(|reason| ctx.error(ErrorKind::StreamUnavailable { reason }))?;
        let part = ctx.path().part_name();
        let reference = format!("{ATTACH_PREFIX}{part}");
        ctx.push_upload(PendingUpload {
            part,
            filename: self.filename.clone(),
            mime_type,
            payload,
        });
        Ok(Value::String(reference))
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("available", &self.is_available())
            .finish()
    }
}

// ─── PendingUpload ───────────────────────────────────────────────────────────

pub(crate) enum Payload {
    Memory(Bytes),
    Reader(BoxReader),
}

/// An upload taken out of its request, waiting to be streamed as a part.
pub struct PendingUpload {
    pub(crate) part: String,
    pub(crate) filename: String,
    pub(crate) mime_type: String,
    pub(crate) payload: Payload,
}

impl PendingUpload {
    pub fn part_name(&self) -> &str { &self.part }

    pub fn filename(&self) -> &str { &self.filename }

    pub fn mime_type(&self) -> &str { &self.mime_type }
}

impl fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUpload")
            .field("part", &self.part)
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}
