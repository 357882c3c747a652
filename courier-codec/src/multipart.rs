//! `multipart/form-data` bodies built from encoded request fields.
//!
//! Text parts hold each non-upload field's JSON (strings go in raw, the way
//! form fields are read by the server); file parts stream their source in
//! bounded chunks. The boundary is random and checked against everything
//! known up front; streamed content is scanned on the fly and the body
//! fails with [`StreamError::BoundaryCollision`] rather than emit a
//! corrupted envelope.

use std::fmt;
use std::fmt::Write as _;

use bytes::Bytes;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::attachment::{Payload, PendingUpload};
use crate::encoder::{BodyStream, Entry};
use crate::error::{EncodeError, StreamError};

const BOUNDARY_ATTEMPTS: usize = 4;

enum Part {
    Text { name: &'static str, value: String },
    File(PendingUpload),
}

impl Part {
    fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } => *name,
            Self::File(upload) => upload.part.as_str(),
        }
    }

    fn head(&self, boundary: &str) -> String {
        match self {
            Self::Text { name, .. } => format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
                quote(name),
            ),
            Self::File(upload) => format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                quote(&upload.part),
                quote(&upload.filename),
                upload.mime_type,
            ),
        }
    }

    /// Content known before streaming starts.
    fn known_content(&self) -> Option<&[u8]> {
        match self {
            Self::Text { value, .. } => Some(value.as_bytes()),
            Self::File(PendingUpload { payload: Payload::Memory(data), .. }) => Some(&data[..]),
            Self::File(_) => None,
        }
    }
}

/// Escape a header parameter value the way browsers do for form data.
fn quote(value: &str) -> String {
    value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn random_boundary() -> Result<String, EncodeError> {
    let mut raw = [0u8; 16];
    getrandom::getrandom(&mut raw).map_err(|e| EncodeError::Boundary(e.to_string()))?;
    let mut boundary = String::from("courier-");
    for byte in raw {
        let _ = write!(boundary, "{byte:02x}");
    }
    Ok(boundary)
}

// ─── MultipartBody ───────────────────────────────────────────────────────────

/// A multipart body whose file parts have not been read yet.
pub struct MultipartBody {
    boundary: String,
    parts: Vec<Part>,
    chunk_size: usize,
}

impl MultipartBody {
    pub(crate) fn new(entries: Vec<Entry>, chunk_size: usize) -> Result<Self, EncodeError> {
        let parts: Vec<Part> = entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Text { name, value: Value::String(s) } => Part::Text { name, value: s },
                Entry::Text { name, value } => Part::Text { name, value: value.to_string() },
                Entry::Upload(upload) => Part::File(upload),
            })
            .collect();

        for _ in 0..BOUNDARY_ATTEMPTS {
            let boundary = random_boundary()?;
            let delimiter = format!("--{boundary}");
            let clashes = parts
                .iter()
                .filter_map(Part::known_content)
                .any(|content| contains(content, delimiter.as_bytes()));
            if !clashes {
                return Ok(Self { boundary, parts, chunk_size });
            }
            tracing::debug!(boundary = %boundary, "boundary occurs in part content, choosing another");
        }
        Err(EncodeError::Boundary("every candidate occurs in the content".to_owned()))
    }

    pub fn boundary(&self) -> &str { &self.boundary }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Part names in emission order.
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(Part::name).collect()
    }

    pub fn part_count(&self) -> usize { self.parts.len() }

    /// Number of binary (file) parts.
    pub fn upload_count(&self) -> usize {
        self.parts.iter().filter(|p| matches!(p, Part::File(_))).count()
    }

    pub(crate) fn into_stream(self) -> BodyStream {
        let delimiter = Bytes::from(format!("--{}", self.boundary));
        let mut segments: Vec<BodyStream> = Vec::with_capacity(self.parts.len() * 3 + 1);
        for part in self.parts {
            segments.push(ready(Bytes::from(part.head(&self.boundary))));
            match part {
                Part::Text { value, .. } => segments.push(ready(Bytes::from(value))),
                Part::File(upload) => segments.push(file_stream(upload, delimiter.clone(), self.chunk_size)),
            }
            segments.push(ready(Bytes::from_static(b"\r\n")));
        }
        segments.push(ready(Bytes::from(format!("--{}--\r\n", self.boundary))));
        Box::pin(stream::iter(segments).flatten())
    }
}

impl fmt::Debug for MultipartBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartBody")
            .field("boundary", &self.boundary)
            .field("parts", &self.part_names())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

// ─── Streams ─────────────────────────────────────────────────────────────────

fn ready(bytes: Bytes) -> BodyStream {
    Box::pin(stream::once(future::ready(Ok(bytes))))
}

fn file_stream(upload: PendingUpload, delimiter: Bytes, chunk_size: usize) -> BodyStream {
    let part = upload.part.clone();
    let chunks: BodyStream = match upload.payload {
        Payload::Memory(data) => {
            let pieces: Vec<Result<Bytes, StreamError>> = (0..data.len())
                .step_by(chunk_size)
                .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
                .collect();
            Box::pin(stream::iter(pieces))
        }
        Payload::Reader(reader) => {
            let io_part = part.clone();
            let chunks = ReaderStream::with_capacity(reader, chunk_size)
                .map(move |r| r.map_err(|source| StreamError::Io { part: io_part.clone(), source }));
            non_empty(Box::pin(chunks), part.clone())
        }
    };
    guard_boundary(chunks, delimiter, part)
}

/// Fail with [`StreamError::Exhausted`] when `chunks` ends before yielding
/// any data: a reader handed over at end of input.
fn non_empty(chunks: BodyStream, part: String) -> BodyStream {
    Box::pin(stream::unfold(Some((chunks, false)), move |state| {
        let part = part.clone();
        async move {
            let (mut chunks, seen) = state?;
            match chunks.next().await {
                Some(Ok(chunk)) => Some((Ok(chunk), Some((chunks, true)))),
                Some(Err(e)) => Some((Err(e), None)),
                None if seen => None,
                None => Some((Err(StreamError::Exhausted { part }), None)),
            }
        }
    }))
}

/// Pass chunks through, failing once the delimiter shows up in the data,
/// including across chunk edges.
fn guard_boundary(chunks: BodyStream, delimiter: Bytes, part: String) -> BodyStream {
    let overlap = delimiter.len().saturating_sub(1);
    Box::pin(chunks.scan((Vec::<u8>::new(), false), move |state, item| {
        let (tail, failed) = state;
        if *failed {
            return future::ready(None);
        }
        let out = match item {
            Ok(chunk) => {
                let mut window = std::mem::take(tail);
                window.extend_from_slice(&chunk);
                if contains(&window, &delimiter) {
                    *failed = true;
                    Err(StreamError::BoundaryCollision { part: part.clone() })
                } else {
                    *tail = window.split_off(window.len().saturating_sub(overlap));
                    tracing::trace!(part = %part, bytes = chunk.len(), "streamed upload chunk");
                    Ok(chunk)
                }
            }
            Err(e) => {
                *failed = true;
                Err(e)
            }
        };
        future::ready(Some(out))
    }))
}

/// End `inner` with [`StreamError::Cancelled`] as soon as `cancel` fires.
pub(crate) fn cancellable(
    inner: BodyStream,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Bytes, StreamError>> + Send {
    stream::unfold(Some((inner, cancel)), |state| async move {
        let (mut inner, cancel) = state?;
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = inner.next() => Some(item),
        };
        match next {
            None => {
                tracing::debug!("request body cancelled mid-stream");
                Some((Err(StreamError::Cancelled), None))
            }
            Some(Some(Ok(chunk))) => Some((Ok(chunk), Some((inner, cancel)))),
            Some(Some(Err(e))) => Some((Err(e), None)),
            Some(None) => None,
        }
    })
}
