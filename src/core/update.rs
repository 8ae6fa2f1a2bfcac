//! Token update payloads.
//!
//! A `TokenUpdate` carries only the fields that changed. The host applies it
//! to the token with [`Token::apply`](super::Token::apply) and then hands the
//! same update to the active visibility system.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{AttributeKey, AttributeValue, Attributes};
use super::token::{Senses, Sight};

/// The changed subset of a token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Complete new list of active effect icons.
    #[serde(default)]
    pub effects: Option<SmallVec<[String; 4]>>,

    /// New token vision.
    #[serde(default)]
    pub sight: Option<Sight>,

    /// New actor senses.
    #[serde(default)]
    pub senses: Option<Senses>,

    /// Changed actor attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl TokenUpdate {
    /// Create an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the complete list of active effects (builder pattern).
    #[must_use]
    pub fn with_effects<I, S>(mut self, icons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = Some(icons.into_iter().map(Into::into).collect());
        self
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set token vision (builder pattern).
    #[must_use]
    pub fn with_sight(mut self, sight: Sight) -> Self {
        self.sight = Some(sight);
        self
    }

    /// Set actor senses (builder pattern).
    #[must_use]
    pub fn with_senses(mut self, senses: Senses) -> Self {
        self.senses = Some(senses);
        self
    }

    /// Change one actor attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<AttributeKey>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Does this update change the active effects?
    #[must_use]
    pub fn touches_effects(&self) -> bool {
        self.effects.is_some()
    }

    /// Check if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.effects.is_none()
            && self.sight.is_none()
            && self.senses.is_none()
            && self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update() {
        let update = TokenUpdate::new();
        assert!(update.is_empty());
        assert!(!update.touches_effects());
    }

    #[test]
    fn test_cleared_effects_still_touch_effects() {
        let update = TokenUpdate::new().with_effects(Vec::<String>::new());
        assert!(update.touches_effects());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_partial_json_payload() {
        let update: TokenUpdate =
            serde_json::from_str(r#"{"effects":["icons/moon.svg"]}"#).unwrap();

        assert_eq!(update.effects.as_ref().map(|e| e.len()), Some(1));
        assert!(update.sight.is_none());
        assert!(update.attributes.is_empty());
    }
}
