//! Error types for courier-client.

use std::io;

use courier_codec::{EncodeError, StreamError};

// ─── ApiError ─────────────────────────────────────────────────────────────────

/// An error returned by the Bot API in a `"ok": false` response.
///
/// # Example
/// `{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 5","parameters":{"retry_after":5}}`
/// → `ApiError { code: 429, retry_after: Some(5), .. }`
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("API {code}: {description}")]
pub struct ApiError {
    /// HTTP-like status code.
    pub code:               i32,
    /// Human-readable description, e.g. `Bad Request: chat not found`.
    pub description:        String,
    /// Seconds the server asks to wait before repeating the request.
    /// Reported as is; the client never sleeps on it by itself.
    pub retry_after:        Option<u64>,
    /// The group was upgraded to a supergroup with this id.
    pub migrate_to_chat_id: Option<i64>,
}

impl ApiError {
    /// Match on the description, with optional wildcard prefix/suffix `'*'`.
    ///
    /// # Examples
    /// - `err.is("Forbidden: bot was blocked by the user")`: exact match
    /// - `err.is("Bad Request: *")`: starts-with match
    /// - `err.is("*not found")`: ends-with match
    pub fn is(&self, pattern: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('*') {
            self.description.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.description.ends_with(suffix)
        } else {
            self.description == pattern
        }
    }
}

// ─── TransportError ───────────────────────────────────────────────────────────

/// A failure while moving bytes to or from the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request body failed while it was being streamed.
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// An error from the HTTP client in use.
    #[error("HTTP error: {0}")]
    Http(Box<dyn std::error::Error + Send + Sync>),
}

// ─── InvocationError ──────────────────────────────────────────────────────────

/// The error type returned from any [`Bot`](crate::Bot) call.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// The server rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The request could not be encoded; nothing was sent.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// The response did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] courier_codec::Error),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<StreamError> for InvocationError {
    fn from(e: StreamError) -> Self { Self::Transport(TransportError::Stream(e)) }
}

impl InvocationError {
    /// Returns `true` if this is an API error whose description matches
    /// `pattern` (supports `'*'` wildcards).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Api(e) => e.is(pattern),
            _            => false,
        }
    }

    /// `true` when the body stream was cancelled mid-send.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Stream(StreamError::Cancelled)))
    }

    /// `true` for failures of the connection itself, where sending the same
    /// request again may succeed.
    ///
    /// Answers from the server never are, nor is a body that was cancelled
    /// or failed to encode.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::Io(_) | TransportError::Http(_))
                | Self::Transport(TransportError::Stream(StreamError::Io { .. }))
        )
    }
}
