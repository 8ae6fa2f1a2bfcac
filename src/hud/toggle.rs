//! Toggle handlers and the HUD that runs them.

use smallvec::SmallVec;

use crate::core::{RollRng, RollRngState, Token, TokenUpdate};
use crate::effects::{StatusEffect, StatusEffectRegistry};
use crate::error::VisibilityError;

/// Context handed to each toggle handler.
pub struct EffectToggle<'a> {
    /// Staged copy of the token being toggled.
    pub token: &'a mut Token,
    /// The effect being toggled.
    pub effect: &'a StatusEffect,
    /// `true` if the effect is being switched on.
    pub active: bool,
    /// Value entered alongside the toggle (e.g. a stealth result typed by the user).
    pub value: Option<i64>,
    /// HUD dice.
    pub dice: &'a mut RollRng,
}

/// Callback run when an effect is toggled.
pub type ToggleHandler = Box<dyn FnMut(&mut EffectToggle<'_>) -> Result<(), VisibilityError>>;

/// The effect-toggle HUD.
///
/// Handlers are keyed by owner so wiring the same system twice replaces its
/// handler instead of running it twice.
pub struct TokenHud {
    handlers: Vec<(String, ToggleHandler)>,
    dice: RollRng,
}

impl TokenHud {
    /// Create a HUD with seeded dice.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            handlers: Vec::new(),
            dice: RollRng::new(seed),
        }
    }

    /// Register a toggle handler for `owner`.
    ///
    /// Returns `true` if an earlier handler of the same owner was replaced.
    pub fn on_toggle(&mut self, owner: impl Into<String>, handler: ToggleHandler) -> bool {
        let owner = owner.into();
        if let Some(slot) = self.handlers.iter_mut().find(|(o, _)| *o == owner) {
            slot.1 = handler;
            return true;
        }
        self.handlers.push((owner, handler));
        false
    }

    /// Remove the handler of `owner`. Returns `true` if one was registered.
    pub fn remove_handler(&mut self, owner: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(o, _)| o != owner);
        self.handlers.len() != before
    }

    /// Check whether `owner` has a handler registered.
    #[must_use]
    pub fn has_handler(&self, owner: &str) -> bool {
        self.handlers.iter().any(|(o, _)| o == owner)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dice position, for saving a session.
    #[must_use]
    pub fn dice_state(&self) -> RollRngState {
        self.dice.state()
    }

    /// Continue rolling from a saved dice position.
    pub fn restore_dice(&mut self, state: &RollRngState) {
        self.dice = RollRng::from_state(state);
    }

    /// Toggle a status effect on a token.
    ///
    /// On success the token holds whatever the handlers wrote and the returned
    /// update carries the new effect list. On failure the token is unchanged.
    pub fn toggle_effect(
        &mut self,
        registry: &StatusEffectRegistry,
        token: &mut Token,
        icon: &str,
        value: Option<i64>,
    ) -> Result<TokenUpdate, VisibilityError> {
        let effect = registry
            .by_icon(icon)
            .ok_or_else(|| VisibilityError::UnknownEffect(icon.to_string()))?;
        let active = !token.has_effect(icon);

        tracing::debug!(
            "Toggling '{}' {} on {}",
            effect.id,
            if active { "on" } else { "off" },
            token.id
        );

        let mut staged = token.clone();
        let mut toggle = EffectToggle {
            token: &mut staged,
            effect,
            active,
            value,
            dice: &mut self.dice,
        };
        for (owner, handler) in self.handlers.iter_mut() {
            if let Err(err) = handler(&mut toggle) {
                tracing::warn!("Toggle handler '{}' failed for {}: {}", owner, token.id, err);
                return Err(err);
            }
        }

        let mut effects: SmallVec<[String; 4]> =
            token.effects.iter().filter(|e| *e != icon).cloned().collect();
        if active {
            effects.push(icon.to_string());
        }

        *token = staged;
        Ok(TokenUpdate::new().with_effects(effects))
    }
}

impl std::fmt::Debug for TokenHud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHud")
            .field("handlers", &self.handlers.iter().map(|(o, _)| o).collect::<Vec<_>>())
            .field("dice", &self.dice)
            .finish()
    }
}
