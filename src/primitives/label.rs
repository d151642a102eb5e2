//! Option labels - how a selected value becomes display text.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Field looked up when no label key is configured.
pub const DEFAULT_LABEL_KEY: &str = "label";

/// How to derive a label from a selected value.
pub enum LabelKey<T> {
    /// Look up a named field of the serialized value.
    Field(String),
    /// Compute the label.
    Func(Rc<dyn Fn(&T) -> String>),
}

impl<T> LabelKey<T> {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        Self::Func(Rc::new(f))
    }
}

impl<T> Default for LabelKey<T> {
    fn default() -> Self {
        Self::Field(DEFAULT_LABEL_KEY.to_string())
    }
}

impl<T> Clone for LabelKey<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(name) => Self::Field(name.clone()),
            Self::Func(f) => Self::Func(f.clone()),
        }
    }
}

impl<T> fmt::Debug for LabelKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Get the display label of `option`.
///
/// A function key always wins. Otherwise a value that serializes to a
/// plain string is its own label, and anything else must carry a string
/// field under the key.
pub fn option_label<T: Serialize>(option: &T, label_key: &LabelKey<T>) -> Result<String> {
    let key = match label_key {
        LabelKey::Func(f) => return Ok(f(option)),
        LabelKey::Field(key) => key,
    };

    match serde_json::to_value(option)? {
        Value::String(label) => Ok(label),
        Value::Object(map) => match map.get(key) {
            Some(Value::String(label)) => Ok(label.clone()),
            Some(_) => Err(Error::InvalidLabel { key: key.clone() }),
            None => Err(Error::MissingLabel { key: key.clone() }),
        },
        _ => Err(Error::MissingLabel { key: key.clone() }),
    }
}
