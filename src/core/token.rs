//! Tokens: placed game pieces owned by the host.
//!
//! A token carries everything the visibility systems read:
//! - Active status-effect icons (toggled from the HUD)
//! - Token vision (`Sight`) and actor senses (`Senses`)
//! - Actor attributes (perception, stealth, ...)
//!
//! and one thing they write: namespaced `flags`.
//!
//! ## Usage
//!
//! ```
//! use conditional_visibility::core::{Senses, Token, TokenId};
//!
//! let scout = Token::new(TokenId::new(1), "Scout")
//!     .with_senses(Senses::default().with_darkvision(60))
//!     .with_attr("skills.prc.passive", 15i32);
//!
//! assert_eq!(scout.senses.darkvision, 60);
//! assert!(scout.effects.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{AttributeKey, AttributeValue, Attributes};
use super::flags::TokenFlags;
use super::update::TokenUpdate;

/// Unique identifier for a token within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Create a new token ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for TokenId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// Token vision radii, in feet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sight {
    /// Dim vision radius. A non-zero value lets the token see in darkness.
    pub dim: u32,
    /// Bright vision radius.
    pub bright: u32,
}

impl Sight {
    #[must_use]
    pub const fn new(dim: u32, bright: u32) -> Self {
        Self { dim, bright }
    }
}

/// Special senses of the actor behind a token. Ranges are in feet; 0 = none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Senses {
    pub darkvision: u32,
    pub blindsight: u32,
    pub tremorsense: u32,
    pub truesight: u32,
    /// Granted by spells or items rather than by range.
    pub see_invisible: bool,
}

impl Senses {
    #[must_use]
    pub fn with_darkvision(mut self, range: u32) -> Self {
        self.darkvision = range;
        self
    }

    #[must_use]
    pub fn with_blindsight(mut self, range: u32) -> Self {
        self.blindsight = range;
        self
    }

    #[must_use]
    pub fn with_tremorsense(mut self, range: u32) -> Self {
        self.tremorsense = range;
        self
    }

    #[must_use]
    pub fn with_truesight(mut self, range: u32) -> Self {
        self.truesight = range;
        self
    }

    #[must_use]
    pub fn with_see_invisible(mut self) -> Self {
        self.see_invisible = true;
        self
    }
}

/// A placed game piece.
///
/// Everything except `flags` is host data; visibility systems only write
/// `flags`, and only under their own namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier within the scene.
    pub id: TokenId,

    /// Display name.
    pub name: String,

    /// Icons of the currently active status effects.
    pub effects: SmallVec<[String; 4]>,

    /// Token vision.
    pub sight: Sight,

    /// Actor senses.
    pub senses: Senses,

    /// Actor data (skills, passive scores).
    #[serde(default)]
    pub attributes: Attributes,

    /// Flags written by visibility systems.
    #[serde(default)]
    pub flags: TokenFlags,
}

impl Token {
    /// Create a token with no effects, senses, or attributes.
    pub fn new(id: TokenId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            effects: SmallVec::new(),
            sight: Sight::default(),
            senses: Senses::default(),
            attributes: Attributes::default(),
            flags: TokenFlags::new(),
        }
    }

    /// Set token vision (builder pattern).
    #[must_use]
    pub fn with_sight(mut self, sight: Sight) -> Self {
        self.sight = sight;
        self
    }

    /// Set actor senses (builder pattern).
    #[must_use]
    pub fn with_senses(mut self, senses: Senses) -> Self {
        self.senses = senses;
        self
    }

    /// Add an actor attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<AttributeKey>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add an active effect icon (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, icon: impl Into<String>) -> Self {
        let icon = icon.into();
        if !self.has_effect(&icon) {
            self.effects.push(icon);
        }
        self
    }

    /// Check whether an effect icon is active.
    #[must_use]
    pub fn has_effect(&self, icon: &str) -> bool {
        self.effects.iter().any(|e| e == icon)
    }

    /// Apply the host-owned fields of an update.
    ///
    /// Flags are never touched here; recalculating them is the job of the
    /// active visibility system.
    pub fn apply(&mut self, update: &TokenUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(effects) = &update.effects {
            self.effects = effects.clone();
        }
        if let Some(sight) = update.sight {
            self.sight = sight;
        }
        if let Some(senses) = update.senses {
            self.senses = senses;
        }
        for (key, value) in &update.attributes {
            self.attributes.insert(key.clone(), value.clone());
        }
    }
}
