//! API method requests and their static field catalogue.

use crate::encoder::FieldWriter;
use crate::error::EncodeError;
use crate::json::FromJson;

/// Static metadata of one request field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

/// A typed API call.
///
/// Implemented by [`bot_method!`](crate::bot_method!).
pub trait Request {
    /// The method name appended to the endpoint URL.
    const METHOD: &'static str;
    /// The declared fields in schema order.
    const FIELDS: &'static [FieldSpec];
    /// The `result` the server answers with.
    type Response: FromJson;

    /// Feed every declared field, in schema order, to `out`.
    fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), EncodeError>;
}

#[doc(hidden)]
#[macro_export]
macro_rules! __is_required {
    (required) => { true };
    (optional) => { false };
}

/// Declare an API method request.
///
/// Every field is stored as an `Option` and gets a fluent setter; whether it
/// must be present is checked when the request is encoded.
///
/// ```ignore
/// bot_method! {
///     /// Send a text message.
///     pub struct SendMessage => "sendMessage" -> Message {
///         required chat_id: ChatId,
///         required text: String,
///         optional parse_mode: ParseMode,
///     }
/// }
/// ```
#[macro_export]
macro_rules! bot_method {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $method:literal -> $response:ty {
            $( $(#[$fmeta:meta])* $presence:ident $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: ::core::option::Option<$ty>, )*
        }

        impl $name {
            $(
                #[doc = concat!("Set `", stringify!($field), "`.")]
                pub fn $field(mut self, value: impl ::core::convert::Into<$ty>) -> Self {
                    self.$field = ::core::option::Option::Some(value.into());
                    self
                }
            )*
        }

        impl $crate::Request for $name {
            const METHOD: &'static str = $method;
            const FIELDS: &'static [$crate::FieldSpec] = &[
                $( $crate::FieldSpec { name: stringify!($field), required: $crate::__is_required!($presence) }, )*
            ];
            type Response = $response;

            #[allow(unused_variables)]
            fn write_fields(&self, out: &mut $crate::FieldWriter<'_>) -> ::core::result::Result<(), $crate::EncodeError> {
                $( out.field(stringify!($field), $crate::__is_required!($presence), self.$field.as_ref())?; )*
                Ok(())
            }
        }
    };
}
