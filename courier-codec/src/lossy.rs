//! Lists that tolerate members the client has never heard of.

use std::ops::Deref;

use serde_json::Value;

use crate::error::Result;
use crate::json::{Context, FromJson, ToJson, invalid_type};

/// A list of union values that skips items whose discriminator is unknown.
///
/// Servers add new union members over time; an update listing reactions of
/// a kind this client predates should still decode with the known ones.
/// Every other failure (a malformed known member, a wrong type) still
/// fails the whole list. A missing field decodes as an empty list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LossyVec<T>(pub Vec<T>);

impl<T> LossyVec<T> {
    pub fn into_inner(self) -> Vec<T> { self.0 }
}

impl<T> Deref for LossyVec<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { &self.0 }
}

impl<T> From<Vec<T>> for LossyVec<T> {
    fn from(items: Vec<T>) -> Self { Self(items) }
}

impl<T> FromIterator<T> for LossyVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl<T: ToJson> ToJson for LossyVec<T> {
    fn to_json(&self, ctx: &mut Context) -> Result<Value> { self.0.to_json(ctx) }
}

impl<T: FromJson> FromJson for LossyVec<T> {
    fn from_json(value: &Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| invalid_type("array", value))?;
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match T::from_json(item) {
                Ok(v) => out.push(v),
                Err(e) if e.is_unknown_union_member() => {
                    tracing::warn!(index = i, error = %e, "skipping list item of unknown kind");
                }
                Err(e) => return Err(e.at_index(i)),
            }
        }
        Ok(Self(out))
    }

    fn absent() -> Option<Self> { Some(Self(Vec::new())) }
}
