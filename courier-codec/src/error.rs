//! Error types shared by the encode and decode paths.

use std::fmt;
use std::io;

// ─── FieldPath ───────────────────────────────────────────────────────────────

/// One step from a document root towards a nested value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named object field.
    Field(&'static str),
    /// A position inside an array.
    Index(usize),
}

/// The location of a value inside a request or response document.
///
/// Displayed as `media[1].type`; an empty path displays as `<root>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn new() -> Self { Self::default() }

    pub fn segments(&self) -> &[PathSegment] { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn push(&mut self, segment: PathSegment) { self.0.push(segment); }

    pub fn pop(&mut self) -> Option<PathSegment> { self.0.pop() }

    fn prepend(&mut self, segment: PathSegment) { self.0.insert(0, segment); }

    /// Multipart part name derived from this path.
    ///
    /// A top-level field keeps its own name (`photo`); nested positions use
    /// the display form (`media[0].media`). Wire names never contain `[` or
    /// `.`, so two distinct paths never share a part name.
    pub fn part_name(&self) -> String {
        if self.0.is_empty() {
            return "file".to_owned();
        }
        self.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

// ─── ErrorKind / Error ───────────────────────────────────────────────────────

/// What went wrong while converting between typed values and JSON.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// An enum value with no wire token (the sentinel, or an undeclared value).
    #[error("{enum_name} value {value} has no wire token")]
    UnmappableVariant { enum_name: &'static str, value: i32 },
    /// A union discriminator that names no registered member.
    #[error("unknown {family} member `{tag}`")]
    UnknownUnionMember { family: &'static str, tag: String },
    /// A required field is not present in the incoming document.
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },
    /// The JSON value has the wrong shape for the target type.
    #[error("invalid type: expected {expected}, found {found}")]
    InvalidType { expected: &'static str, found: &'static str },
    /// A JSON number that does not fit the target integer type.
    #[error("number {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    /// An upload stream that was already taken or cannot be opened.
    #[error("upload stream unavailable: {reason}")]
    StreamUnavailable { reason: String },
    /// A caller-declared content type that is not a valid MIME type.
    #[error("invalid MIME type {value:?}")]
    InvalidMimeType { value: String },
    /// An upload met outside of request encoding, where it cannot become a part.
    #[error("uploads can only be encoded as part of a request")]
    UnexpectedUpload,
    /// The input bytes are not JSON at all.
    #[error("malformed JSON: {0}")]
    Syntax(String),
}

/// A codec failure together with the path of the offending field.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    path: FieldPath,
}

/// Specialized `Result` for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, path: FieldPath::new() }
    }

    /// An error located at `path`.
    pub fn at(kind: ErrorKind, path: &FieldPath) -> Self {
        Self { kind, path: path.clone() }
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }

    pub fn path(&self) -> &FieldPath { &self.path }

    pub fn into_kind(self) -> ErrorKind { self.kind }

    /// Prefix the path with an enclosing field name.
    pub fn in_field(mut self, name: &'static str) -> Self {
        self.path.prepend(PathSegment::Field(name));
        self
    }

    /// Prefix the path with an enclosing array position.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(PathSegment::Index(index));
        self
    }

    pub fn is_unknown_union_member(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownUnionMember { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

// ─── EncodeError ─────────────────────────────────────────────────────────────

/// Failures detected while encoding a request, before any byte is sent.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },
    #[error("upload at `{path}` is unavailable: {reason}")]
    StreamUnavailable { path: FieldPath, reason: String },
    #[error("cannot generate multipart boundary: {0}")]
    Boundary(String),
    #[error(transparent)]
    Codec(Error),
}

impl From<Error> for EncodeError {
    fn from(e: Error) -> Self {
        match e.kind {
            ErrorKind::StreamUnavailable { reason } => Self::StreamUnavailable { path: e.path, reason },
            kind => Self::Codec(Error { kind, path: e.path }),
        }
    }
}

// ─── StreamError ─────────────────────────────────────────────────────────────

/// Failures while a multipart body is being streamed to the transport.
///
/// Bytes already handed to the transport are not rolled back; the whole
/// send must be treated as failed.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("reading upload `{part}` failed: {source}")]
    Io {
        part: String,
        #[source]
        source: io::Error,
    },
    /// The reader of an upload was already at end of input.
    #[error("upload `{part}` has no data left to send")]
    Exhausted { part: String },
    #[error("body stream cancelled")]
    Cancelled,
    #[error("upload `{part}` contains the multipart boundary")]
    BoundaryCollision { part: String },
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io { source, .. } => source,
            StreamError::Cancelled => io::Error::new(io::ErrorKind::Interrupted, e),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

// ─── CatalogueError ──────────────────────────────────────────────────────────

/// Inconsistencies in a token table or a union family declaration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error("{enum_name}: value {value} has an empty token")]
    EmptyToken { enum_name: &'static str, value: i32 },
    #[error("{enum_name}: token `{token}` is used more than once")]
    DuplicateToken { enum_name: &'static str, token: &'static str },
    #[error("{enum_name}: token `unknown` is reserved for the sentinel")]
    ReservedToken { enum_name: &'static str },
    #[error("{family}: discriminator `{token}` has no member")]
    MissingMember { family: &'static str, token: &'static str },
    #[error("{family}: discriminator `{token}` is claimed by more than one member")]
    DuplicateMember { family: &'static str, token: &'static str },
    #[error("{family}: a member is registered for the unspecified discriminator")]
    UnspecifiedMember { family: &'static str },
}
