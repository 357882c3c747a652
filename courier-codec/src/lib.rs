//! Wire codec for the Bot API: enums, tagged unions, attachments and request bodies.
//!
//! # Overview
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`wire_enum`]   | Enum ↔ token mapping and [`wire_enum!`]                   |
//! | [`union`]       | Discriminated unions and [`tagged_union!`]                |
//! | [`object`]      | Plain objects and [`json_object!`]                        |
//! | [`attachment`]  | [`InputFile`] / [`Upload`] and their classification       |
//! | [`encoder`]     | [`RequestEncoder`]: JSON or multipart [`Body`]            |
//! | [`multipart`]   | Streamed `multipart/form-data` bodies                     |
//!
//! # Encoding a request
//!
//! ```rust,ignore
//! use courier_codec::{RequestEncoder, InputFile, Upload};
//!
//! let req = SendPhoto::new(chat_id, Upload::from_path("cat.jpg")).caption("hi");
//! let body = RequestEncoder::default().encode(req)?;
//! assert!(body.is_multipart());
//! // Hand `body.content_type()` and `body.into_stream(cancel)` to a transport…
//! ```
//!
//! A request without uploads always encodes to a single JSON document;
//! one with at least one upload always becomes a multipart body.

#![deny(unsafe_code)]

pub mod attachment;
pub mod encoder;
mod error;
mod json;
mod lossy;
pub mod multipart;
pub mod object;
mod request;
pub mod union;
pub mod wire_enum;

pub use serde;
pub use serde_json;

pub use attachment::{ATTACH_PREFIX, AttachmentKind, InputFile, PendingUpload, Upload, classify};
pub use encoder::{
    Body, BodyStream, DEFAULT_CHUNK_SIZE, EncoderConfig, FieldWriter, JSON_CONTENT_TYPE,
    MIN_CHUNK_SIZE, RequestEncoder,
};
pub use error::{
    CatalogueError, EncodeError, Error, ErrorKind, FieldPath, PathSegment, Result, StreamError,
};
pub use json::{Context, FromJson, ToJson, kind_of};
pub use lossy::LossyVec;
pub use multipart::MultipartBody;
pub use request::{FieldSpec, Request};
pub use union::{TaggedUnion, check_family};
pub use wire_enum::{UNKNOWN_TOKEN, WireEnum, check_table};
