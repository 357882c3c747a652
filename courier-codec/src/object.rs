//! Plain JSON objects: field writing/reading helpers and [`json_object!`](crate::json_object!).

use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};
use crate::json::{Context, FromJson, ToJson, invalid_type};

/// Collects an object's fields in declaration order, dropping `null`s.
pub struct ObjectWriter<'a> {
    ctx: &'a mut Context,
    map: Map<String, Value>,
}

impl<'a> ObjectWriter<'a> {
    pub fn new(ctx: &'a mut Context) -> Self {
        Self { ctx, map: Map::new() }
    }

    pub fn field<T: ToJson + ?Sized>(&mut self, name: &'static str, value: &T) -> Result<()> {
        let json = self.ctx.field(name, |ctx| value.to_json(ctx))?;
        if !json.is_null() {
            self.map.insert(name.to_owned(), json);
        }
        Ok(())
    }

    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

pub fn expect_object(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| invalid_type("object", value))
}

/// Read field `name`, falling back to [`FromJson::absent`] when missing.
pub fn read_field<T: FromJson>(map: &Map<String, Value>, name: &'static str) -> Result<T> {
    match map.get(name) {
        Some(value) => T::from_json(value).map_err(|e| e.in_field(name)),
        None => T::absent().ok_or_else(|| Error::new(ErrorKind::MissingField { field: name })),
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_name {
    ($field:ident) => { stringify!($field) };
    ($field:ident, $wire:literal) => { $wire };
}

/// Declare a JSON object type.
///
/// Fields are written in declaration order; `Option` fields are omitted
/// when `None` and may be missing on input. Incoming fields the type does
/// not declare are ignored. `field as "wire"` renames a field on the wire.
///
/// ```
/// courier_codec::json_object! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct PhotoSize {
///         pub file_id: String,
///         pub width: i64,
///         pub height: i64,
///         pub file_size: Option<i64>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! json_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident $(as $wire:literal)? : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $crate::ToJson for $name {
            #[allow(unused_mut)]
            fn to_json(&self, ctx: &mut $crate::Context) -> $crate::Result<$crate::serde_json::Value> {
                let mut writer = $crate::object::ObjectWriter::new(ctx);
                $( writer.field($crate::__wire_name!($field $(, $wire)?), &self.$field)?; )*
                Ok(writer.finish())
            }
        }

        impl $crate::FromJson for $name {
            #[allow(unused_variables)]
            fn from_json(value: &$crate::serde_json::Value) -> $crate::Result<Self> {
                let map = $crate::object::expect_object(value)?;
                Ok(Self {
                    $( $field: $crate::object::read_field(map, $crate::__wire_name!($field $(, $wire)?))?, )*
                })
            }
        }
    };
}
