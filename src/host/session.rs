//! A running visibility session.
//!
//! ## Lifecycle
//!
//! 1. `start`: resolve the configured system, register its status effects,
//!    wire its HUD handlers
//! 2. `update_token` / `toggle_effect`: token update events
//! 3. `visible_tokens`: sight layer refreshes

use super::scene::Scene;
use super::sight::{SightLayer, Viewer};
use crate::core::{TokenId, TokenUpdate, VisibilityConfig};
use crate::effects::StatusEffectRegistry;
use crate::error::VisibilityError;
use crate::hud::TokenHud;
use crate::systems::{ConditionalVisibilitySystem, SystemRegistry};

/// The active visibility system together with the host state it hooks into.
pub struct VisibilitySession {
    config: VisibilityConfig,
    system: Box<dyn ConditionalVisibilitySystem>,
    status_effects: StatusEffectRegistry,
    hud: TokenHud,
}

impl VisibilitySession {
    /// Start a session with an empty status effect registry.
    pub fn start(
        systems: SystemRegistry,
        config: VisibilityConfig,
    ) -> Result<Self, VisibilityError> {
        Self::start_with_effects(systems, config, StatusEffectRegistry::new())
    }

    /// Start a session on top of status effects the host already registered.
    pub fn start_with_effects(
        systems: SystemRegistry,
        config: VisibilityConfig,
        mut status_effects: StatusEffectRegistry,
    ) -> Result<Self, VisibilityError> {
        config.validate()?;
        let system = systems.resolve(&config.game_system, config.fallback_to_default)?;

        system.initialize_status_effects(&mut status_effects)?;
        let mut hud = TokenHud::new(config.roll_seed);
        system.initialize_on_toggle_effect(&mut hud)?;

        tracing::info!(
            "Visibility session started with '{}' (configured '{}')",
            system.game_system_id(),
            config.game_system
        );

        Ok(Self {
            config,
            system,
            status_effects,
            hud,
        })
    }

    /// The active system.
    #[must_use]
    pub fn system(&self) -> &dyn ConditionalVisibilitySystem {
        self.system.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    #[must_use]
    pub fn status_effects(&self) -> &StatusEffectRegistry {
        &self.status_effects
    }

    #[must_use]
    pub fn hud(&self) -> &TokenHud {
        &self.hud
    }

    /// Handle a token update event: apply host fields, then recalculate flags.
    ///
    /// If recalculation fails the host fields stay applied and the token's
    /// visibility flags keep their previous values.
    pub fn update_token(
        &self,
        scene: &mut Scene,
        id: TokenId,
        update: &TokenUpdate,
    ) -> Result<(), VisibilityError> {
        let token = scene.get_mut(id).ok_or(VisibilityError::UnknownToken(id))?;
        token.apply(update);
        self.system
            .recalculate_visible_status(token, update)
            .inspect_err(|err| {
                tracing::warn!("Keeping previous visibility flags on {}: {}", id, err);
            })
    }

    /// Handle an effect toggle from the HUD and the update it produces.
    pub fn toggle_effect(
        &mut self,
        scene: &mut Scene,
        id: TokenId,
        icon: &str,
        value: Option<i64>,
    ) -> Result<TokenUpdate, VisibilityError> {
        let token = scene.get_mut(id).ok_or(VisibilityError::UnknownToken(id))?;
        let update = self
            .hud
            .toggle_effect(&self.status_effects, token, icon, value)?;
        token.apply(&update);
        self.system.recalculate_visible_status(token, &update)?;
        Ok(update)
    }

    /// Sight layer for the active system.
    #[must_use]
    pub fn sight_layer(&self) -> SightLayer<'_> {
        SightLayer::new(self.system.as_ref(), self.config.gm_sees_all)
    }

    /// Ids of every token the viewer can see.
    #[must_use]
    pub fn visible_tokens(&self, scene: &Scene, viewer: &Viewer) -> Vec<TokenId> {
        self.sight_layer().visible_tokens(scene, viewer)
    }
}

impl std::fmt::Debug for VisibilitySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilitySession")
            .field("system", &self.system.game_system_id())
            .field("config", &self.config)
            .field("status_effects", &self.status_effects.len())
            .field("hud", &self.hud)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::StatusEffect;

    #[test]
    fn test_start_registers_effects_and_handlers() {
        let session =
            VisibilitySession::start(SystemRegistry::with_builtin(), VisibilityConfig::new("dnd5e"))
                .unwrap();

        assert_eq!(session.system().game_system_id(), "dnd5e");
        assert_eq!(session.status_effects().len(), 4);
        assert!(session.hud().has_handler("dnd5e"));
    }

    #[test]
    fn test_start_falls_back() {
        let session =
            VisibilitySession::start(SystemRegistry::with_builtin(), VisibilityConfig::new("swade"))
                .unwrap();
        assert_eq!(session.system().game_system_id(), "default");
    }

    #[test]
    fn test_start_strict_unknown() {
        let err = VisibilitySession::start(
            SystemRegistry::with_builtin(),
            VisibilityConfig::new("swade").strict(),
        )
        .err();
        assert_eq!(err, Some(VisibilityError::UnknownSystem("swade".to_string())));
    }

    #[test]
    fn test_start_keeps_host_effects() {
        let mut effects = StatusEffectRegistry::new();
        effects
            .register(StatusEffect::new("poisoned", "Poisoned", "icons/svg/poison.svg"))
            .unwrap();

        let session = VisibilitySession::start_with_effects(
            SystemRegistry::with_builtin(),
            VisibilityConfig::default(),
            effects,
        )
        .unwrap();

        assert_eq!(session.status_effects().len(), 4);
        assert_eq!(session.status_effects().iter().next().map(|e| e.id.as_str()), Some("poisoned"));
    }

    #[test]
    fn test_unknown_token() {
        let session =
            VisibilitySession::start(SystemRegistry::with_builtin(), VisibilityConfig::default())
                .unwrap();
        let mut scene = Scene::new();

        let err = session
            .update_token(&mut scene, TokenId::new(4), &TokenUpdate::new())
            .unwrap_err();
        assert_eq!(err, VisibilityError::UnknownToken(TokenId::new(4)));
    }
}
