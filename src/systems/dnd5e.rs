//! D&D 5th edition visibility.
//!
//! Adds stealth and perception to the sense-based rules of the default system:
//! - A hidden token stores its stealth result as a flag
//! - Observers pool their senses and use their best passive perception
//! - A hidden token is seen only when that perception meets its stealth
//!
//! Toggling Hidden from the HUD rolls `d20 + skills.ste.total` unless the user
//! supplied a value. A token marked hidden without a roll uses passive stealth,
//! recomputed from the sheet on every update.

use crate::core::{int_attribute, AttributeValue, Token, TokenUpdate};
use crate::effects::EffectCatalog;
use crate::error::VisibilityError;
use crate::hud::{EffectToggle, TokenHud};
use crate::vision::VisionCapabilities;

use super::conditions::{
    blocked_by_senses, flag, hidden_effect, int_flag, sense_capabilities, sense_effects,
    stage_conditions, HIDDEN, STEALTH, STEALTH_ROLLED,
};
use super::system::ConditionalVisibilitySystem;

pub const PASSIVE_PERCEPTION: &str = "skills.prc.passive";
pub const PERCEPTION_TOTAL: &str = "skills.prc.total";
pub const PASSIVE_STEALTH: &str = "skills.ste.passive";
pub const STEALTH_TOTAL: &str = "skills.ste.total";

/// Passive scores are 10 + modifier when the sheet does not provide one.
const PASSIVE_BASE: i64 = 10;

/// D&D 5e visibility rules.
#[derive(Clone, Debug)]
pub struct Dnd5eSystem {
    catalog: EffectCatalog,
}

impl Dnd5eSystem {
    pub const ID: &'static str = "dnd5e";

    #[must_use]
    pub fn new() -> Self {
        let mut effects = sense_effects();
        effects.push(hidden_effect());
        let catalog =
            EffectCatalog::from_effects(effects).expect("built-in dnd5e catalog is valid");
        Self { catalog }
    }

    /// Passive perception of a token.
    #[must_use]
    pub fn passive_perception(token: &Token) -> i64 {
        passive_score(token, PASSIVE_PERCEPTION, PERCEPTION_TOTAL)
    }

    /// Passive stealth of a token.
    #[must_use]
    pub fn passive_stealth(token: &Token) -> i64 {
        passive_score(token, PASSIVE_STEALTH, STEALTH_TOTAL)
    }
}

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn passive_score(token: &Token, passive_key: &str, total_key: &str) -> i64 {
    int_attribute(&token.attributes, passive_key).unwrap_or_else(|| {
        PASSIVE_BASE.saturating_add(int_attribute(&token.attributes, total_key).unwrap_or(0))
    })
}

/// Roll stealth when Hidden is switched on; forget it when switched off.
fn roll_stealth_on_hide(toggle: &mut EffectToggle<'_>) -> Result<(), VisibilityError> {
    if toggle.effect.id != HIDDEN {
        return Ok(());
    }

    if toggle.active {
        let stealth = match toggle.value {
            Some(value) => value,
            None => toggle
                .dice
                .d20()
                .saturating_add(int_attribute(&toggle.token.attributes, STEALTH_TOTAL).unwrap_or(0)),
        };
        tracing::debug!("{} hides with stealth {}", toggle.token.id, stealth);
        toggle.token.flags.set(Dnd5eSystem::ID, STEALTH, stealth);
        toggle.token.flags.set(Dnd5eSystem::ID, STEALTH_ROLLED, true);
    } else {
        toggle.token.flags.unset(Dnd5eSystem::ID, STEALTH);
        toggle.token.flags.unset(Dnd5eSystem::ID, STEALTH_ROLLED);
    }
    Ok(())
}

impl ConditionalVisibilitySystem for Dnd5eSystem {
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

        let mut staged = stage_conditions(&self.catalog, token.flags.namespace(Self::ID), icons);
        if flag(&staged, HIDDEN) {
            // A rolled value sticks; passive stealth follows the sheet.
            let rolled = if flag(&staged, STEALTH_ROLLED) {
                int_flag(&staged, Self::ID, STEALTH)?
            } else {
                None
            };
            let stealth = match rolled {
                Some(rolled) => rolled,
                None => {
                    staged.remove(STEALTH_ROLLED);
                    Self::passive_stealth(token)
                }
            };
            staged.insert(STEALTH.to_string(), AttributeValue::Int(stealth));
        } else {
            staged.remove(STEALTH);
            staged.remove(STEALTH_ROLLED);
        }
        token.flags.replace_namespace(Self::ID, staged);

        tracing::debug!("Recalculated '{}' conditions for {}", Self::ID, token.id);
        Ok(())
    }

    fn get_vision_capabilities(
        &self,
        sources: &[&Token],
    ) -> Result<VisionCapabilities, VisibilityError> {
        Ok(sources.iter().fold(VisionCapabilities::none(), |acc, token| {
            let own = sense_capabilities(token).with_perception(Self::passive_perception(token));
            acc.merge(&own)
        }))
    }

    fn can_see(
        &self,
        target: &Token,
        capabilities: &VisionCapabilities,
    ) -> Result<bool, VisibilityError> {
        let Some(flags) = target.flags.namespace(Self::ID) else {
            return Ok(true);
        };
        if blocked_by_senses(flags, capabilities) {
            return Ok(false);
        }
        if !flag(flags, HIDDEN) {
            return Ok(true);
        }

        let stealth = int_flag(flags, Self::ID, STEALTH)?.ok_or_else(|| {
            VisibilityError::InvalidFlag {
                namespace: Self::ID.to_string(),
                key: STEALTH.to_string(),
                found: "nothing".to_string(),
            }
        })?;
        Ok(capabilities
            .passive_perception
            .is_some_and(|perception| perception >= stealth))
    }

    fn initialize_on_toggle_effect(&self, hud: &mut TokenHud) -> Result<(), VisibilityError> {
        let replaced = hud.on_toggle(Self::ID, Box::new(roll_stealth_on_hide));
        tracing::debug!("Wired '{}' stealth rolls into the HUD (replaced: {})", Self::ID, replaced);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Senses, TokenId};
    use crate::effects::StatusEffectRegistry;
    use crate::systems::conditions::INVISIBLE;

    fn hidden_icon(system: &Dnd5eSystem) -> String {
        system.effects().icon_for(HIDDEN).unwrap().to_string()
    }

    fn hide(system: &Dnd5eSystem, token: &mut Token) {
        let update = TokenUpdate::new().with_effects([hidden_icon(system)]);
        token.apply(&update);
        system.recalculate_visible_status(token, &update).unwrap();
    }

    #[test]
    fn test_catalog_includes_hidden() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.effects().len(), 4);
        assert_eq!(system.effects().name(&hidden_icon(&system)), Some("Hidden"));
    }

    #[test]
    fn test_passive_scores() {
        let sheet = Token::new(TokenId::new(1), "Sheet").with_attr(PASSIVE_PERCEPTION, 17i32);
        assert_eq!(Dnd5eSystem::passive_perception(&sheet), 17);

        let modifier = Token::new(TokenId::new(2), "Modifier").with_attr(STEALTH_TOTAL, 6i32);
        assert_eq!(Dnd5eSystem::passive_stealth(&modifier), 16);

        let blank = Token::new(TokenId::new(3), "Blank");
        assert_eq!(Dnd5eSystem::passive_perception(&blank), 10);
    }

    #[test]
    fn test_hidden_uses_passive_stealth_without_roll() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue").with_attr(STEALTH_TOTAL, 5i32);
        hide(&system, &mut rogue);

        assert!(system.has_condition(&rogue, HIDDEN));
        assert_eq!(
            rogue.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(15)
        );
    }

    #[test]
    fn test_perception_against_stealth() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue");
        rogue.flags.set(Dnd5eSystem::ID, STEALTH, 14i64);
        rogue.flags.set(Dnd5eSystem::ID, STEALTH_ROLLED, true);
        hide(&system, &mut rogue);

        let guard = Token::new(TokenId::new(2), "Guard").with_attr(PASSIVE_PERCEPTION, 13i32);
        let captain = Token::new(TokenId::new(3), "Captain").with_attr(PASSIVE_PERCEPTION, 14i32);

        let caps = system.get_vision_capabilities(&[&guard]).unwrap();
        assert!(!system.can_see(&rogue, &caps).unwrap());

        // Ties go to the observer
        let caps = system.get_vision_capabilities(&[&guard, &captain]).unwrap();
        assert!(system.can_see(&rogue, &caps).unwrap());

        // No observers, no perception
        let caps = system.get_vision_capabilities(&[]).unwrap();
        assert!(!system.can_see(&rogue, &caps).unwrap());
    }

    #[test]
    fn test_senses_checked_before_stealth() {
        let system = Dnd5eSystem::new();
        let mut target = Token::new(TokenId::new(1), "Wizard");
        let update = TokenUpdate::new()
            .with_effects([system.effects().icon_for(INVISIBLE).unwrap().to_string()]);
        system.recalculate_visible_status(&mut target, &update).unwrap();

        let sharp = Token::new(TokenId::new(2), "Sharp Eyes").with_attr(PASSIVE_PERCEPTION, 30i32);
        let caps = system.get_vision_capabilities(&[&sharp]).unwrap();
        assert!(!system.can_see(&target, &caps).unwrap());

        let seer = Token::new(TokenId::new(3), "Seer")
            .with_senses(Senses::default().with_see_invisible());
        let caps = system.get_vision_capabilities(&[&seer]).unwrap();
        assert!(system.can_see(&target, &caps).unwrap());
    }

    #[test]
    fn test_invalid_stealth_keeps_prior_flags() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue");
        rogue.flags.set(Dnd5eSystem::ID, STEALTH, "very sneaky");
        rogue.flags.set(Dnd5eSystem::ID, STEALTH_ROLLED, true);
        let before = rogue.flags.clone();

        let update = TokenUpdate::new().with_effects([hidden_icon(&system)]);
        let err = system.recalculate_visible_status(&mut rogue, &update).unwrap_err();

        assert!(matches!(err, VisibilityError::InvalidFlag { .. }));
        assert_eq!(rogue.flags, before);
    }

    #[test]
    fn test_hidden_without_stealth_is_not_visible() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue");
        rogue.flags.set(Dnd5eSystem::ID, HIDDEN, true);

        let caps = VisionCapabilities::none().with_perception(30);
        assert!(system.can_see(&rogue, &caps).is_err());
        assert!(!system.is_visible(&rogue, &caps));
    }

    #[test]
    fn test_unhiding_forgets_stealth() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue");
        hide(&system, &mut rogue);

        let update = TokenUpdate::new().with_effects(Vec::<String>::new());
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert!(rogue.flags.get(Dnd5eSystem::ID, STEALTH).is_none());
    }

    #[test]
    fn test_hud_rolls_stealth() {
        let system = Dnd5eSystem::new();
        let mut registry = StatusEffectRegistry::new();
        system.initialize_status_effects(&mut registry).unwrap();
        let mut hud = TokenHud::new(11);
        system.initialize_on_toggle_effect(&mut hud).unwrap();
        system.initialize_on_toggle_effect(&mut hud).unwrap();
        assert_eq!(hud.handler_count(), 1);

        let mut rogue = Token::new(TokenId::new(1), "Rogue").with_attr(STEALTH_TOTAL, 7i32);
        let icon = hidden_icon(&system);
        let update = hud.toggle_effect(&registry, &mut rogue, &icon, None).unwrap();
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();

        let stealth = rogue
            .flags
            .get(Dnd5eSystem::ID, STEALTH)
            .and_then(|v| v.as_int())
            .unwrap();
        assert!((8..=27).contains(&stealth), "stealth {}", stealth);
        assert!(system.has_condition(&rogue, HIDDEN));
    }

    #[test]
    fn test_hud_uses_entered_value() {
        let system = Dnd5eSystem::new();
        let mut registry = StatusEffectRegistry::new();
        system.initialize_status_effects(&mut registry).unwrap();
        let mut hud = TokenHud::new(11);
        system.initialize_on_toggle_effect(&mut hud).unwrap();

        let mut rogue = Token::new(TokenId::new(1), "Rogue");
        let icon = hidden_icon(&system);
        let update = hud.toggle_effect(&registry, &mut rogue, &icon, Some(22)).unwrap();
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert_eq!(
            rogue.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(22)
        );

        // Toggling off clears the roll
        let update = hud.toggle_effect(&registry, &mut rogue, &icon, None).unwrap();
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert!(!system.has_condition(&rogue, HIDDEN));
        assert!(rogue.flags.get(Dnd5eSystem::ID, STEALTH).is_none());
    }

    #[test]
    fn test_passive_stealth_follows_sheet_while_hidden() {
        let system = Dnd5eSystem::new();
        let mut rogue = Token::new(TokenId::new(1), "Rogue").with_attr(STEALTH_TOTAL, 2i32);
        hide(&system, &mut rogue);
        assert_eq!(
            rogue.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(12)
        );

        let update = TokenUpdate::new()
            .with_effects([hidden_icon(&system)])
            .with_attr(STEALTH_TOTAL, 9i32);
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert_eq!(
            rogue.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(19)
        );
        assert!(!system.has_condition(&rogue, STEALTH_ROLLED));
    }

    #[test]
    fn test_rolled_stealth_survives_sheet_changes() {
        let system = Dnd5eSystem::new();
        let mut registry = StatusEffectRegistry::new();
        system.initialize_status_effects(&mut registry).unwrap();
        let mut hud = TokenHud::new(3);
        system.initialize_on_toggle_effect(&mut hud).unwrap();

        let mut rogue = Token::new(TokenId::new(1), "Rogue").with_attr(STEALTH_TOTAL, 2i32);
        let icon = hidden_icon(&system);
        let update = hud.toggle_effect(&registry, &mut rogue, &icon, Some(21)).unwrap();
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert!(system.has_condition(&rogue, STEALTH_ROLLED));

        let update = TokenUpdate::new().with_effects([icon]).with_attr(STEALTH_TOTAL, 9i32);
        rogue.apply(&update);
        system.recalculate_visible_status(&mut rogue, &update).unwrap();
        assert_eq!(
            rogue.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(21)
        );
    }

    #[test]
    fn test_extreme_perception_total_does_not_overflow() {
        let system = Dnd5eSystem::new();
        let watcher = Token::new(TokenId::new(1), "Oracle").with_attr(PERCEPTION_TOTAL, i64::MAX);

        let caps = system.vision_capabilities_or_none(&[&watcher]);
        assert_eq!(caps.passive_perception, Some(i64::MAX));
    }

    #[test]
    fn test_extreme_stealth_total_does_not_overflow() {
        let system = Dnd5eSystem::new();
        let mut shadow = Token::new(TokenId::new(1), "Shadow").with_attr(STEALTH_TOTAL, i64::MAX);
        hide(&system, &mut shadow);
        assert_eq!(
            shadow.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(i64::MAX)
        );

        let mut registry = StatusEffectRegistry::new();
        system.initialize_status_effects(&mut registry).unwrap();
        let mut hud = TokenHud::new(5);
        system.initialize_on_toggle_effect(&mut hud).unwrap();

        let mut ghost = Token::new(TokenId::new(2), "Ghost").with_attr(STEALTH_TOTAL, i64::MAX);
        hud.toggle_effect(&registry, &mut ghost, &hidden_icon(&system), None)
            .unwrap();
        assert_eq!(
            ghost.flags.get(Dnd5eSystem::ID, STEALTH).and_then(|v| v.as_int()),
            Some(i64::MAX)
        );
    }
}
