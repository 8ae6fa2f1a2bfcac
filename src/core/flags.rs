//! Namespaced flag storage attached to tokens.
//!
//! Each visibility system writes only into the namespace named by its
//! `game_system_id()`. Flags are held in `im` persistent maps so a system can
//! stage a change on an O(1) copy and commit it only if every step succeeded.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::attributes::AttributeValue;

/// Flags within a single namespace.
pub type FlagNamespace = ImHashMap<String, AttributeValue>;

/// All flags on a token, keyed by namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFlags {
    namespaces: ImHashMap<String, FlagNamespace>,
}

impl TokenFlags {
    /// Create an empty flag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a flag value.
    #[must_use]
    pub fn get(&self, namespace: &str, key: &str) -> Option<&AttributeValue> {
        self.namespaces.get(namespace).and_then(|ns| ns.get(key))
    }

    /// Check whether a boolean flag is set to `true`.
    #[must_use]
    pub fn is_set(&self, namespace: &str, key: &str) -> bool {
        self.get(namespace, key)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    /// Set a flag value.
    pub fn set(&mut self, namespace: &str, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.namespaces
            .entry(namespace.to_string())
            .or_insert_with(FlagNamespace::new)
            .insert(key.into(), value.into());
    }

    /// Remove a flag, returning its previous value.
    pub fn unset(&mut self, namespace: &str, key: &str) -> Option<AttributeValue> {
        let ns = self.namespaces.get_mut(namespace)?;
        let removed = ns.remove(key);
        if ns.is_empty() {
            self.namespaces.remove(namespace);
        }
        removed
    }

    /// Get a whole namespace.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&FlagNamespace> {
        self.namespaces.get(namespace)
    }

    /// Replace a whole namespace. An empty namespace is removed.
    pub fn replace_namespace(&mut self, namespace: &str, flags: FlagNamespace) {
        if flags.is_empty() {
            self.namespaces.remove(namespace);
        } else {
            self.namespaces.insert(namespace.to_string(), flags);
        }
    }

    /// Check if no flags are set in any namespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
