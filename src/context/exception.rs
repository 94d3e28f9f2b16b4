//! Exception metadata captured on failure paths.

use std::any::Any;
use std::borrow::Cow;

pub const ERROR_TYPE_KEY: &str = "error_type";
pub const ERROR_VALUE_KEY: &str = "error_value";

/// Error kind and textual payload of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub kind: String,
    pub value: String,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Kind is the short type name of `E`, value its `Display` text.
    pub fn from_error<E: std::error::Error + ?Sized + 'static>(err: &E) -> Self {
        Self::new(short_type_name(std::any::type_name::<E>()), err.to_string())
    }

    /// Metadata for a scope unwound by a panic.
    pub fn panic(payload: Option<&(dyn Any + Send)>) -> Self {
        let value = payload
            .and_then(|p| {
                p.downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| p.downcast_ref::<String>().cloned())
            })
            .unwrap_or_else(|| "panicked".to_string());
        Self::new("panic", value)
    }
}

/// `alloc::vec::Vec<u8>` -> `Vec`, `my_crate::errors::ValueError` -> `ValueError`.
///
/// A bare `Error` keeps its nearest meaningful module:
/// `std::io::error::Error` -> `io::Error`.
fn short_type_name(full: &str) -> Cow<'_, str> {
    let without_generics = full.split('<').next().unwrap_or(full);
    let mut segments = without_generics.rsplit("::");
    let last = segments.next().unwrap_or(without_generics);
    if last != "Error" {
        return Cow::Borrowed(last);
    }
    match segments.find(|segment| *segment != "error") {
        Some(module) => Cow::Owned(format!("{}::{}", module, last)),
        None => Cow::Borrowed(last),
    }
}
