//! Status effect definitions.

use serde::{Deserialize, Serialize};

/// A named, icon-represented condition that can be toggled on a token.
///
/// `id` is the condition name a system uses as its flag key (`"hidden"`),
/// `label` is what the HUD shows (`"Hidden"`), and `icon` is the icon
/// reference stored in a token's active effects.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: String,
    pub label: String,
    pub icon: String,
}

impl StatusEffect {
    /// Create a status effect.
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }
}
