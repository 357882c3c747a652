//! Tagged unions: polymorphic objects told apart by a discriminator field.
//!
//! A family is a closed Rust enum whose variants each wrap one member
//! struct. Writing derives the discriminator from the variant with an
//! exhaustive `match`; reading decodes the discriminator through the
//! companion [`WireEnum`] and fails with
//! [`ErrorKind::UnknownUnionMember`] when nothing is registered for it,
//! including tokens that decode to the sentinel.

use serde_json::{Map, Value};

use crate::error::{CatalogueError, Error, ErrorKind, Result};
use crate::json::{Context, kind_of};
use crate::wire_enum::WireEnum;

/// A family of member types sharing one discriminator field.
///
/// Implemented by [`tagged_union!`](crate::tagged_union!).
pub trait TaggedUnion: Sized {
    /// The companion enum holding the discriminator tokens.
    type Tag: WireEnum;
    /// Family name used in diagnostics.
    const FAMILY: &'static str;
    /// Name of the discriminator field, usually `type`.
    const TAG_FIELD: &'static str;
    /// Discriminators of the declared members, in declaration order.
    const MEMBERS: &'static [Self::Tag];

    /// The discriminator of this instance's member.
    fn tag(&self) -> Self::Tag;
}

/// Read and validate the discriminator of an incoming object.
pub fn read_tag<U: TaggedUnion>(map: &Map<String, Value>) -> Result<U::Tag> {
    let raw = map
        .get(U::TAG_FIELD)
        .ok_or_else(|| Error::new(ErrorKind::MissingField { field: U::TAG_FIELD }))?;
    let token = raw.as_str().ok_or_else(|| {
        Error::new(ErrorKind::InvalidType { expected: "string token", found: kind_of(raw) })
            .in_field(U::TAG_FIELD)
    })?;

    let tag = U::Tag::decode(token);
    if tag == U::Tag::UNSPECIFIED || !U::MEMBERS.contains(&tag) {
        return Err(unknown_member::<U>(token));
    }
    Ok(tag)
}

pub fn unknown_member<U: TaggedUnion>(token: &str) -> Error {
    Error::new(ErrorKind::UnknownUnionMember { family: U::FAMILY, tag: token.to_owned() })
}

/// Put the discriminator of `value` in front of its member's fields.
pub fn write_envelope<U: TaggedUnion>(value: &U, fields: Value, ctx: &mut Context) -> Result<Value> {
    let token = ctx.field(U::TAG_FIELD, |ctx| value.tag().encode().map_err(|kind| ctx.error(kind)))?;
    let fields = match fields {
        Value::Object(map) => map,
        other => {
            return Err(ctx.error(ErrorKind::InvalidType { expected: "object", found: kind_of(&other) }));
        }
    };

    let mut out = Map::with_capacity(fields.len() + 1);
    out.insert(U::TAG_FIELD.to_owned(), Value::String(token.to_owned()));
    out.extend(fields.into_iter().filter(|(k, _)| k != U::TAG_FIELD));
    Ok(Value::Object(out))
}

/// Check that the members of `U` are in bijection with the declared
/// variants of its tag enum, sentinel excluded.
pub fn check_family<U: TaggedUnion>() -> std::result::Result<(), CatalogueError> {
    if U::MEMBERS.contains(&U::Tag::UNSPECIFIED) {
        return Err(CatalogueError::UnspecifiedMember { family: U::FAMILY });
    }
    for &(tag, token) in U::Tag::TOKENS {
        match U::MEMBERS.iter().filter(|m| **m == tag).count() {
            0 => return Err(CatalogueError::MissingMember { family: U::FAMILY, token }),
            1 => {}
            _ => return Err(CatalogueError::DuplicateMember { family: U::FAMILY, token }),
        }
    }
    Ok(())
}

// ─── Macro ───────────────────────────────────────────────────────────────────

/// Declare a union family.
///
/// ```ignore
/// tagged_union! {
///     pub enum ReactionType: ReactionTypeKind as "type" {
///         Emoji(ReactionTypeEmoji) => Emoji,
///         CustomEmoji(ReactionTypeCustomEmoji) => CustomEmoji,
///     }
/// }
/// ```
///
/// Each arm names the variant, the member struct (which must implement
/// `ToJson` and `FromJson` as an object) and the tag variant it answers to.
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $tag_ty:ident as $tag_field:literal {
            $( $(#[$vmeta:meta])* $variant:ident($member:ty) => $tag:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($member), )+
        }

        impl $crate::TaggedUnion for $name {
            type Tag = $tag_ty;
            const FAMILY: &'static str = stringify!($name);
            const TAG_FIELD: &'static str = $tag_field;
            const MEMBERS: &'static [$tag_ty] = &[ $( $tag_ty::$tag, )+ ];

            fn tag(&self) -> $tag_ty {
                match self {
                    $( Self::$variant(_) => $tag_ty::$tag, )+
                }
            }
        }

        impl $crate::ToJson for $name {
            fn to_json(&self, ctx: &mut $crate::Context) -> $crate::Result<$crate::serde_json::Value> {
                let fields = match self {
                    $( Self::$variant(inner) => $crate::ToJson::to_json(inner, ctx)?, )+
                };
                $crate::union::write_envelope(self, fields, ctx)
            }
        }

        impl $crate::FromJson for $name {
            fn from_json(value: &$crate::serde_json::Value) -> $crate::Result<Self> {
                let map = $crate::object::expect_object(value)?;
                let tag = $crate::union::read_tag::<Self>(map)?;
                $(
                    if tag == $tag_ty::$tag {
                        return <$member as $crate::FromJson>::from_json(value).map(Self::$variant);
                    }
                )+
                Err($crate::union::unknown_member::<Self>(&tag.to_string()))
            }
        }

        $(
            impl ::core::convert::From<$member> for $name {
                fn from(member: $member) -> Self { Self::$variant(member) }
            }
        )+
    };
}
