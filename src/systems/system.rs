//! The visibility system trait.
//!
//! Each supported tabletop rule system implements `ConditionalVisibilitySystem`
//! to define:
//! - Which status effects exist and what they are called
//! - How a token update turns into condition flags
//! - What a set of observers can perceive
//! - Whether those observers can see a given token
//!
//! The host calls into the active system but never interprets
//! rule-system concepts directly.

use crate::core::{FlagNamespace, Token, TokenUpdate};
use crate::effects::{EffectCatalog, StatusEffectRegistry};
use crate::error::VisibilityError;
use crate::hud::TokenHud;
use crate::vision::VisionCapabilities;

/// Visibility rules of one tabletop rule system.
///
/// ## Implementation Notes
///
/// - `game_system_id`: Stable and non-empty; doubles as the flag namespace
/// - `recalculate_visible_status`: Idempotent; a failed call leaves flags untouched
/// - `get_vision_capabilities`: Empty input yields [`VisionCapabilities::none`]
/// - `can_see`: Deterministic for a given target state and capabilities
///
/// Rendering code should call [`is_visible`](Self::is_visible) and
/// [`vision_capabilities_or_none`](Self::vision_capabilities_or_none), which
/// turn errors into reduced visibility.
pub trait ConditionalVisibilitySystem {
    /// Identifier of the rule system this implementation serves.
    fn game_system_id(&self) -> &str;

    /// Icon → condition name catalog of this system's status effects.
    fn effects(&self) -> &EffectCatalog;

    /// Register this system's status effects with the host.
    ///
    /// Default implementation registers every catalog entry; registering
    /// twice is a no-op.
    fn initialize_status_effects(
        &self,
        registry: &mut StatusEffectRegistry,
    ) -> Result<(), VisibilityError> {
        let added = registry.register_catalog(self.effects())?;
        tracing::info!(
            "Registered {} status effects for '{}' ({} total)",
            added,
            self.game_system_id(),
            registry.len()
        );
        Ok(())
    }

    /// Derive condition flags from a token update and store them on the token.
    fn recalculate_visible_status(
        &self,
        token: &mut Token,
        update: &TokenUpdate,
    ) -> Result<(), VisibilityError>;

    /// Aggregate the vision of a set of observing tokens.
    fn get_vision_capabilities(
        &self,
        sources: &[&Token],
    ) -> Result<VisionCapabilities, VisibilityError>;

    /// Can observers with `capabilities` perceive `target`?
    fn can_see(
        &self,
        target: &Token,
        capabilities: &VisionCapabilities,
    ) -> Result<bool, VisibilityError>;

    /// Wire this system's toggle handlers into the HUD.
    fn initialize_on_toggle_effect(&self, hud: &mut TokenHud) -> Result<(), VisibilityError>;

    // === Convenience Methods ===

    /// This system's flags on a token, if any were written.
    fn condition_flags<'a>(&self, token: &'a Token) -> Option<&'a FlagNamespace> {
        token.flags.namespace(self.game_system_id())
    }

    /// Check whether a condition flag is set on a token.
    fn has_condition(&self, token: &Token, condition: &str) -> bool {
        token.flags.is_set(self.game_system_id(), condition)
    }

    /// [`get_vision_capabilities`](Self::get_vision_capabilities) that degrades
    /// to no vision advantage on error.
    fn vision_capabilities_or_none(&self, sources: &[&Token]) -> VisionCapabilities {
        match self.get_vision_capabilities(sources) {
            Ok(caps) => caps,
            Err(err) => {
                tracing::warn!(
                    "'{}' could not compute vision for {} observers: {}",
                    self.game_system_id(),
                    sources.len(),
                    err
                );
                VisionCapabilities::none()
            }
        }
    }

    /// [`can_see`](Self::can_see) that degrades to "cannot see" on error.
    fn is_visible(&self, target: &Token, capabilities: &VisionCapabilities) -> bool {
        match self.can_see(target, capabilities) {
            Ok(visible) => visible,
            Err(err) => {
                tracing::warn!(
                    "'{}' could not decide visibility of {}: {}",
                    self.game_system_id(),
                    target.id,
                    err
                );
                false
            }
        }
    }
}
