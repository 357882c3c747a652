//! The `{"ok": …, "result": …}` envelope around every Bot API response.

use courier_codec::serde_json::Value;
use courier_codec::{FromJson, json_object};

use crate::errors::{ApiError, InvocationError};

json_object! {
    /// Extra information attached to some failed responses.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ResponseParameters {
        pub migrate_to_chat_id: Option<i64>,
        pub retry_after: Option<u64>,
    }
}

json_object! {
    struct Envelope {
        ok: bool,
        result: Option<Value>,
        error_code: Option<i32>,
        description: Option<String>,
        parameters: Option<ResponseParameters>,
    }
}

/// Decode a raw response into the call's result or an [`ApiError`].
pub fn decode_response<T: FromJson>(bytes: &[u8]) -> Result<T, InvocationError> {
    let envelope = Envelope::from_slice(bytes)?;
    if !envelope.ok {
        let parameters = envelope.parameters.unwrap_or_default();
        return Err(ApiError {
            code:               envelope.error_code.unwrap_or_default(),
            description:        envelope.description.unwrap_or_default(),
            retry_after:        parameters.retry_after,
            migrate_to_chat_id: parameters.migrate_to_chat_id,
        }
        .into());
    }
    let result = envelope.result.unwrap_or(Value::Null);
    T::from_json(&result).map_err(|e| e.in_field("result").into())
}
