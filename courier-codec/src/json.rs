//! The [`ToJson`] / [`FromJson`] traits and their impls for primitive types.
//!
//! Every catalogue type converts through `serde_json::Value` rather than
//! serde's data model so that failures stay typed ([`ErrorKind`]) and carry
//! the path of the field that caused them.

use serde_json::Value;

use crate::attachment::PendingUpload;
use crate::error::{Error, ErrorKind, FieldPath, PathSegment, Result};

// ─── Context ─────────────────────────────────────────────────────────────────

/// State threaded through a [`ToJson`] walk: the current field path and,
/// during request encoding, the uploads collected so far.
pub struct Context {
    path: FieldPath,
    uploads: Option<Vec<PendingUpload>>,
}

impl Context {
    /// A context for plain documents; meeting an upload is an error.
    pub fn detached() -> Self {
        Self { path: FieldPath::new(), uploads: None }
    }

    /// A context that turns uploads into pending multipart parts.
    pub(crate) fn collecting() -> Self {
        Self { path: FieldPath::new(), uploads: Some(Vec::new()) }
    }

    pub fn path(&self) -> &FieldPath { &self.path }

    /// An error located at the current path.
    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, &self.path)
    }

    /// Run `f` with `name` pushed onto the path.
    pub fn field<T>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(PathSegment::Field(name));
        let out = f(self);
        self.path.pop();
        out
    }

    /// Run `f` with `index` pushed onto the path.
    pub fn index<T>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(PathSegment::Index(index));
        let out = f(self);
        self.path.pop();
        out
    }

    pub(crate) fn accepts_uploads(&self) -> bool { self.uploads.is_some() }

    pub(crate) fn push_upload(&mut self, upload: PendingUpload) {
        if let Some(uploads) = self.uploads.as_mut() {
            uploads.push(upload);
        }
    }

    pub(crate) fn upload_count(&self) -> usize {
        self.uploads.as_ref().map_or(0, Vec::len)
    }

    /// Remove and return the uploads collected after the first `from`.
    pub(crate) fn drain_uploads(&mut self, from: usize) -> Vec<PendingUpload> {
        match self.uploads.as_mut() {
            Some(uploads) if from < uploads.len() => uploads.drain(from..).collect(),
            _ => Vec::new(),
        }
    }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Convert `self` into its JSON wire representation.
pub trait ToJson {
    fn to_json(&self, ctx: &mut Context) -> Result<Value>;

    /// Convenience: convert outside of request encoding.
    fn to_value(&self) -> Result<Value> {
        self.to_json(&mut Context::detached())
    }

    /// Convenience: convert to compact JSON text.
    fn to_json_string(&self) -> Result<String> {
        self.to_value().map(|v| v.to_string())
    }
}

/// Build `Self` from its JSON wire representation.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Result<Self>;

    /// The value to use when the field is missing from its object, or `None`
    /// when a missing field is an error.
    fn absent() -> Option<Self> { None }

    /// Convenience: parse raw bytes and convert.
    fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::new(ErrorKind::Syntax(e.to_string())))?;
        Self::from_json(&value)
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn invalid_type(expected: &'static str, found: &Value) -> Error {
    Error::new(ErrorKind::InvalidType { expected, found: kind_of(found) })
}

// ─── bool / strings ──────────────────────────────────────────────────────────

impl ToJson for bool {
    fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(Value::Bool(*self)) }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| invalid_type("boolean", value))
    }
}

impl ToJson for String {
    fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(Value::String(self.clone())) }
}

impl ToJson for str {
    fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(Value::String(self.to_owned())) }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_owned).ok_or_else(|| invalid_type("string", value))
    }
}

// ─── numbers ─────────────────────────────────────────────────────────────────

macro_rules! signed_int {
    ($($t:ty),*) => {$(
        impl ToJson for $t {
            fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(Value::from(*self)) }
        }

        impl FromJson for $t {
            fn from_json(value: &Value) -> Result<Self> {
                let n = value.as_i64().ok_or_else(|| match value {
                    Value::Number(n) => Error::new(ErrorKind::OutOfRange {
                        value: n.to_string(), target: stringify!($t),
                    }),
                    other => invalid_type("integer", other),
                })?;
                <$t>::try_from(n).map_err(|_| Error::new(ErrorKind::OutOfRange {
                    value: n.to_string(), target: stringify!($t),
                }))
            }
        }
    )*};
}

macro_rules! unsigned_int {
    ($($t:ty),*) => {$(
        impl ToJson for $t {
            fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(Value::from(*self)) }
        }

        impl FromJson for $t {
            fn from_json(value: &Value) -> Result<Self> {
                let n = value.as_u64().ok_or_else(|| match value {
                    Value::Number(n) => Error::new(ErrorKind::OutOfRange {
                        value: n.to_string(), target: stringify!($t),
                    }),
                    other => invalid_type("unsigned integer", other),
                })?;
                <$t>::try_from(n).map_err(|_| Error::new(ErrorKind::OutOfRange {
                    value: n.to_string(), target: stringify!($t),
                }))
            }
        }
    )*};
}

signed_int!(i32, i64);
unsigned_int!(u32, u64);

impl ToJson for f64 {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> {
        serde_json::Number::from_f64(*self)
            .map(Value::Number)
            .ok_or_else(|| ctx.error(ErrorKind::OutOfRange { value: self.to_string(), target: "JSON number" }))
    }
}

impl FromJson for f64 {
    fn from_json(value: &Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| invalid_type("number", value))
    }
}

// ─── passthrough ─────────────────────────────────────────────────────────────

impl ToJson for Value {
    fn to_json(&self, _: &mut Context) -> Result<Value> { Ok(self.clone()) }
}

impl FromJson for Value {
    fn from_json(value: &Value) -> Result<Self> { Ok(value.clone()) }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> { (**self).to_json(ctx) }
}

impl<T: FromJson> FromJson for Box<T> {
    fn from_json(value: &Value) -> Result<Self> { T::from_json(value).map(Box::new) }
}

// ─── Option ──────────────────────────────────────────────────────────────────

/// `None` becomes `null`, which object writers drop: absent optional fields
/// never reach the wire.
impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> {
        match self {
            Some(v) => v.to_json(ctx),
            None    => Ok(Value::Null),
        }
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v           => T::from_json(v).map(Some),
        }
    }

    fn absent() -> Option<Self> { Some(None) }
}

// ─── arrays ──────────────────────────────────────────────────────────────────

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> {
        let mut out = Vec::with_capacity(self.len());
        for (i, item) in self.iter().enumerate() {
            out.push(ctx.index(i, |ctx| item.to_json(ctx))?);
        }
        Ok(Value::Array(out))
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> { self.as_slice().to_json(ctx) }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| invalid_type("array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_json(item).map_err(|e| e.at_index(i)))
            .collect()
    }
}
