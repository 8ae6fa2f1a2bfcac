//! Actor attributes and flag values.
//!
//! Tokens carry host-owned actor data ("skills.prc.passive", "skills.ste.total")
//! that visibility systems read but never write. The same value type is used
//! for the namespaced flags systems write back onto tokens.
//!
//! ## AttributeValue Types
//!
//! - `Int`: Numbers (passive perception, stealth totals)
//! - `Bool`: Flags (condition markers)
//! - `Text`: Strings (sense descriptions, labels)

use std::borrow::Borrow;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Key for accessing actor attributes.
///
/// Keys are dotted paths as the host exposes them, e.g. `"skills.prc.passive"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeKey(pub String);

impl AttributeKey {
    /// Create a new attribute key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttributeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Value for an actor attribute or a token flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Integer value (perception, stealth, distances).
    Int(i64),
    /// Boolean flag (condition present).
    Bool(bool),
    /// Text value.
    Text(String),
}

impl AttributeValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v as i64)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// Collection of actor attributes.
pub type Attributes = FxHashMap<AttributeKey, AttributeValue>;

/// Read an integer attribute, ignoring values of any other type.
#[must_use]
pub fn int_attribute(attrs: &Attributes, key: &str) -> Option<i64> {
    attrs.get(key).and_then(AttributeValue::as_int)
}
