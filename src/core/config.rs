//! Session configuration.
//!
//! The host configures a visibility session at startup:
//! - Which game system is active
//! - Whether an unknown system falls back to `"default"`
//! - Whether the GM sees every token
//! - The seed for HUD rolls
//!
//! Configuration is built in code or parsed from JSON; every field has a
//! default so a partial document is valid.

use serde::{Deserialize, Serialize};

use crate::error::VisibilityError;

/// Identifier of the system used when nothing else is configured.
pub const DEFAULT_SYSTEM_ID: &str = "default";

/// Visibility session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Active rule system id (e.g. "dnd5e").
    pub game_system: String,

    /// Use the `"default"` system when `game_system` is not registered.
    pub fallback_to_default: bool,

    /// The GM viewer sees every token regardless of conditions.
    pub gm_sees_all: bool,

    /// Seed for HUD dice.
    pub roll_seed: u64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            game_system: DEFAULT_SYSTEM_ID.to_string(),
            fallback_to_default: true,
            gm_sees_all: true,
            roll_seed: 0,
        }
    }
}

impl VisibilityConfig {
    /// Create a configuration for a game system.
    pub fn new(game_system: impl Into<String>) -> Self {
        Self {
            game_system: game_system.into(),
            ..Self::default()
        }
    }

    /// Fail instead of falling back when the system is unknown.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.fallback_to_default = false;
        self
    }

    /// Make the GM subject to the same rules as players.
    #[must_use]
    pub fn gm_restricted(mut self) -> Self {
        self.gm_sees_all = false;
        self
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_roll_seed(mut self, seed: u64) -> Self {
        self.roll_seed = seed;
        self
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, VisibilityError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VisibilityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values no session can start with.
    pub fn validate(&self) -> Result<(), VisibilityError> {
        if self.game_system.trim().is_empty() {
            return Err(VisibilityError::Config("game_system must not be empty".to_string()));
        }
        Ok(())
    }
}
