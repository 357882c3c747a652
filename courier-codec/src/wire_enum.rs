//! Enum ↔ wire token mapping.
//!
//! Decoding is total: a token the client doesn't know becomes the
//! `Unspecified` sentinel, so a server that grows new variants never breaks
//! an otherwise valid document. Encoding is partial: the sentinel (outside
//! the `"unknown"` allow-list) and undeclared values are rejected.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde_json::Value;

use crate::error::{CatalogueError, ErrorKind, Result};
use crate::json::{Context, invalid_type};

/// Token the sentinel encodes to for allow-listed enums.
pub const UNKNOWN_TOKEN: &str = "unknown";

/// A closed enum with a wire token for every declared variant.
///
/// Implemented by [`wire_enum!`](crate::wire_enum!); the numeric value of
/// `UNSPECIFIED` is always `0`.
pub trait WireEnum: Copy + Eq + fmt::Debug + 'static {
    /// Type name used in diagnostics.
    const NAME: &'static str;
    /// Whether `UNSPECIFIED` round-trips as [`UNKNOWN_TOKEN`].
    const ALLOW_UNKNOWN: bool;
    const UNSPECIFIED: Self;
    /// Every declared variant with its token, sentinel excluded.
    const TOKENS: &'static [(Self, &'static str)];

    /// The variant's numeric value.
    fn value(self) -> i32;

    /// The wire token for `self`.
    fn encode(self) -> std::result::Result<&'static str, ErrorKind> {
        if self == Self::UNSPECIFIED {
            return if Self::ALLOW_UNKNOWN {
                Ok(UNKNOWN_TOKEN)
            } else {
                Err(unmappable::<Self>(self.value()))
            };
        }
        Self::TOKENS
            .iter()
            .find(|(v, _)| *v == self)
            .map(|(_, token)| *token)
            .ok_or_else(|| unmappable::<Self>(self.value()))
    }

    /// The variant whose token equals `token` exactly, or `UNSPECIFIED`.
    fn decode(token: &str) -> Self {
        Self::TOKENS
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(v, _)| *v)
            .unwrap_or(Self::UNSPECIFIED)
    }

    /// The variant with numeric value `value`.
    fn from_value(value: i32) -> std::result::Result<Self, ErrorKind> {
        if value == Self::UNSPECIFIED.value() {
            return Ok(Self::UNSPECIFIED);
        }
        Self::TOKENS
            .iter()
            .map(|(v, _)| *v)
            .find(|v| v.value() == value)
            .ok_or_else(|| unmappable::<Self>(value))
    }

    /// Encode a raw numeric value, as found in untyped callers.
    fn encode_value(value: i32) -> std::result::Result<&'static str, ErrorKind> {
        Self::from_value(value)?.encode()
    }
}

fn unmappable<E: WireEnum>(value: i32) -> ErrorKind {
    ErrorKind::UnmappableVariant { enum_name: E::NAME, value }
}

/// Verify that a token table is non-empty per entry and injective, and that
/// no declared variant steals the sentinel's `"unknown"` token.
pub fn check_table<E: WireEnum>() -> std::result::Result<(), CatalogueError> {
    for (i, (variant, token)) in E::TOKENS.iter().enumerate() {
        if token.is_empty() {
            return Err(CatalogueError::EmptyToken { enum_name: E::NAME, value: variant.value() });
        }
        if *token == UNKNOWN_TOKEN {
            return Err(CatalogueError::ReservedToken { enum_name: E::NAME });
        }
        if E::TOKENS[..i].iter().any(|(_, t)| t == token) {
            return Err(CatalogueError::DuplicateToken { enum_name: E::NAME, token });
        }
    }
    Ok(())
}

// ─── JSON glue used by `wire_enum!` ──────────────────────────────────────────

pub fn to_json<E: WireEnum>(value: E, ctx: &Context) -> Result<Value> {
    value
        .encode()
        .map(|token| Value::String(token.to_owned()))
        .map_err(|kind| ctx.error(kind))
}

/// Only JSON strings are accepted; ordinals are rejected outright.
pub fn from_json<E: WireEnum>(value: &Value) -> Result<E> {
    match value {
        Value::String(token) => Ok(E::decode(token)),
        other => Err(invalid_type("string token", other)),
    }
}

// ─── serde glue used by `wire_enum!` ─────────────────────────────────────────

pub fn serialize<E: WireEnum, S: Serializer>(value: E, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let token = value.encode().map_err(<S::Error as ser::Error>::custom)?;
    serializer.serialize_str(token)
}

pub fn deserialize<'de, E: WireEnum, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<E, D::Error> {
    deserializer.deserialize_str(TokenVisitor::<E>(PhantomData))
}

struct TokenVisitor<E>(PhantomData<E>);

impl<E: WireEnum> Visitor<'_> for TokenVisitor<E> {
    type Value = E;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} wire token", E::NAME)
    }

    fn visit_str<Er: de::Error>(self, token: &str) -> std::result::Result<E, Er> {
        Ok(E::decode(token))
    }
}

pub fn display<E: WireEnum>(value: E, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.encode() {
        Ok(token) => f.write_str(token),
        Err(_) => write!(f, "{}::Unspecified", E::NAME),
    }
}

// ─── Macro ───────────────────────────────────────────────────────────────────

/// Declare a wire enum: a `#[repr(i32)]` enum whose first variant is the
/// `Unspecified` sentinel (value `0`), followed by the declared variants and
/// their tokens.
///
/// ```
/// courier_codec::wire_enum! {
///     /// Text formatting mode.
///     pub enum ParseMode {
///         Html => "HTML",
///         MarkdownV2 => "MarkdownV2",
///     }
/// }
///
/// use courier_codec::WireEnum;
/// assert_eq!(ParseMode::Html.encode(), Ok("HTML"));
/// assert_eq!(ParseMode::decode("BBCode"), ParseMode::Unspecified);
/// ```
///
/// Writing `enum Name with unknown { … }` puts the type on the allow-list
/// where `Unspecified` round-trips as `"unknown"`.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident with unknown {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $crate::wire_enum!(@define [$(#[$meta])*] $vis $name true {
            $( [$(#[$vmeta])*] $variant => $token ),+
        });
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $crate::wire_enum!(@define [$(#[$meta])*] $vis $name false {
            $( [$(#[$vmeta])*] $variant => $token ),+
        });
    };
    (@define [$($meta:tt)*] $vis:vis $name:ident $allow:literal {
        $( [$($vmeta:tt)*] $variant:ident => $token:literal ),+
    }) => {
        $($meta)*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            /// No known wire token.
            #[default]
            Unspecified = 0,
            $( $($vmeta)* $variant, )+
        }

        impl $crate::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const ALLOW_UNKNOWN: bool = $allow;
            const UNSPECIFIED: Self = Self::Unspecified;
            const TOKENS: &'static [(Self, &'static str)] = &[ $( (Self::$variant, $token), )+ ];

            fn value(self) -> i32 { self as i32 }
        }

        impl $crate::ToJson for $name {
            fn to_json(&self, ctx: &mut $crate::Context) -> $crate::Result<$crate::serde_json::Value> {
                $crate::wire_enum::to_json(*self, ctx)
            }
        }

        impl $crate::FromJson for $name {
            fn from_json(value: &$crate::serde_json::Value) -> $crate::Result<Self> {
                $crate::wire_enum::from_json(value)
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S: $crate::serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                $crate::wire_enum::serialize(*self, serializer)
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
                $crate::wire_enum::deserialize(deserializer)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $crate::wire_enum::display(*self, f)
            }
        }
    };
}
