//! Context values
//!
//! `ContextValue` is the recursive sum type every context source produces and
//! both renderers consume. `ContextMap` is its ordered mapping form: keys are
//! unique and keep their first-insertion position when overwritten.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Upper bound on chained `to_structured` conversions for one value.
const MAX_RESOLVE_STEPS: usize = 8;

/// A value that is not a primitive, mapping or sequence.
///
/// Every object has a textual representation. Objects that also know how to
/// describe themselves as structured data return it from `to_structured`;
/// renderers prefer that form and fall back to the text otherwise.
///
/// Both forms are produced while the emitter's sinks are being rendered. They
/// may emit through the same emitter, but must not add sinks or register
/// formatter params on it.
pub trait ContextObject: fmt::Display + fmt::Debug + Send + Sync {
    fn to_structured(&self) -> Option<ContextValue> {
        None
    }
}

impl ContextObject for DateTime<Utc> {
    fn to_structured(&self) -> Option<ContextValue> {
        Some(ContextValue::Str(
            self.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        ))
    }
}

impl ContextObject for DateTime<FixedOffset> {
    fn to_structured(&self) -> Option<ContextValue> {
        Some(ContextValue::Str(
            self.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        ))
    }
}

impl ContextObject for NaiveDateTime {
    fn to_structured(&self) -> Option<ContextValue> {
        Some(ContextValue::Str(
            self.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        ))
    }
}

/// Recursive context value.
#[derive(Debug, Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Mapping(ContextMap),
    Sequence(Vec<ContextValue>),
    Object(Arc<dyn ContextObject>),
}

impl ContextValue {
    /// Wrap a non-primitive value.
    pub fn object(value: impl ContextObject + 'static) -> Self {
        ContextValue::Object(Arc::new(value))
    }

    /// Scalars are strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ContextValue::Null
                | ContextValue::Bool(_)
                | ContextValue::Int(_)
                | ContextValue::UInt(_)
                | ContextValue::Float(_)
                | ContextValue::Str(_)
        )
    }

    /// Apply `to_structured` conversions until the value is no longer an
    /// object or the object has no structured form.
    pub fn resolved(&self) -> Cow<'_, ContextValue> {
        let mut current = Cow::Borrowed(self);
        for _ in 0..MAX_RESOLVE_STEPS {
            let next = match current.as_ref() {
                ContextValue::Object(object) => object.to_structured(),
                _ => None,
            };
            match next {
                Some(value) => current = Cow::Owned(value),
                None => break,
            }
        }
        current
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ContextMap> {
        match self {
            ContextValue::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        use ContextValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Int(a), UInt(b)) | (UInt(b), Int(a)) => u64::try_from(*a).map_or(false, |a| a == *b),
            (Float(a), Float(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Mapping(a), Mapping(b)) => a == b,
            (Sequence(a), Sequence(b)) => a == b,
            (Object(a), Object(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<&String> for ContextValue {
    fn from(value: &String) -> Self {
        ContextValue::Str(value.clone())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for ContextValue {
            fn from(value: $t) -> Self {
                ContextValue::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for ContextValue {
            fn from(value: $t) -> Self {
                ContextValue::UInt(u64::from(value))
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<usize> for ContextValue {
    fn from(value: usize) -> Self {
        ContextValue::UInt(value as u64)
    }
}

impl From<f32> for ContextValue {
    fn from(value: f32) -> Self {
        ContextValue::Float(f64::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<ContextMap> for ContextValue {
    fn from(value: ContextMap) -> Self {
        ContextValue::Mapping(value)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(value: Vec<T>) -> Self {
        ContextValue::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ContextValue::Null, Into::into)
    }
}

impl From<DateTime<Utc>> for ContextValue {
    fn from(value: DateTime<Utc>) -> Self {
        ContextValue::object(value)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContextValue::Null,
            serde_json::Value::Bool(b) => ContextValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ContextValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ContextValue::UInt(u)
                } else {
                    ContextValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => ContextValue::Str(s),
            serde_json::Value::Array(items) => {
                ContextValue::Sequence(items.into_iter().map(ContextValue::from).collect())
            }
            serde_json::Value::Object(map) => ContextValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ContextValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Ordered mapping from unique names to context values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMap(IndexMap<String, ContextValue>);

impl ContextMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a key, shifting later keys up so order is kept.
    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ContextValue> {
        self.0.iter()
    }

    /// Overlay `other` on top of `self` with stable-key, latest-value semantics.
    pub fn extend_from(&mut self, other: &ContextMap) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for ContextMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ContextMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>, V: Into<ContextValue>, const N: usize> From<[(K, V); N]> for ContextMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for ContextMap {
    type Item = (String, ContextValue);
    type IntoIter = indexmap::map::IntoIter<String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContextMap {
    type Item = (&'a String, &'a ContextValue);
    type IntoIter = indexmap::map::Iter<'a, String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
