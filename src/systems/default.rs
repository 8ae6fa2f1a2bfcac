//! Rule-system-agnostic visibility.
//!
//! Used when the active game system has no dedicated implementation:
//! - Invisible targets need truesight or see-invisibility
//! - Obscured targets need blindsight or tremorsense
//! - Targets in darkness need darkvision, truesight, or dim vision
//!
//! There is no stealth and no HUD behavior.

use crate::core::{Token, TokenUpdate, DEFAULT_SYSTEM_ID};
use crate::effects::EffectCatalog;
use crate::error::VisibilityError;
use crate::hud::TokenHud;
use crate::vision::VisionCapabilities;

use super::conditions::{blocked_by_senses, sense_capabilities, sense_effects, stage_conditions};
use super::system::ConditionalVisibilitySystem;

/// Visibility rules for systems without their own implementation.
#[derive(Clone, Debug)]
pub struct DefaultSystem {
    catalog: EffectCatalog,
}

impl DefaultSystem {
    pub const ID: &'static str = DEFAULT_SYSTEM_ID;

    #[must_use]
    pub fn new() -> Self {
        let catalog = EffectCatalog::from_effects(sense_effects())
            .expect("built-in default catalog is valid");
        Self { catalog }
    }
}

impl Default for DefaultSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionalVisibilitySystem for DefaultSystem {
    fn game_system_id(&self) -> &str {
        Self::ID
    }

    fn effects(&self) -> &EffectCatalog {
        &self.catalog
    }

    fn recalculate_visible_status(
        &self,
        token: &mut Token,
        update: &TokenUpdate,
    ) -> Result<(), VisibilityError> {
        let Some(icons) = &update.effects else {
            return Ok(());
        };

        let staged = stage_conditions(&self.catalog, token.flags.namespace(Self::ID), icons);
        token.flags.replace_namespace(Self::ID, staged);

        tracing::debug!("Recalculated '{}' conditions for {}", Self::ID, token.id);
        Ok(())
    }

    fn get_vision_capabilities(
        &self,
        sources: &[&Token],
    ) -> Result<VisionCapabilities, VisibilityError> {
        Ok(sources
            .iter()
            .fold(VisionCapabilities::none(), |acc, token| acc.merge(&sense_capabilities(token))))
    }

    fn can_see(
        &self,
        target: &Token,
        capabilities: &VisionCapabilities,
    ) -> Result<bool, VisibilityError> {
        Ok(match target.flags.namespace(Self::ID) {
            Some(flags) => !blocked_by_senses(flags, capabilities),
            None => true,
        })
    }

    fn initialize_on_toggle_effect(&self, hud: &mut TokenHud) -> Result<(), VisibilityError> {
        // Nothing to roll; drop anything a previous wiring left behind.
        hud.remove_handler(Self::ID);
        Ok(())
    }
}
