//! Host-global status effect registry.
//!
//! The `StatusEffectRegistry` holds every status effect the HUD can toggle.
//! The active visibility system adds its catalog here once at session start.

use rustc_hash::FxHashMap;

use super::catalog::EffectCatalog;
use super::status::StatusEffect;
use crate::error::VisibilityError;

/// Registry of toggleable status effects, in registration order.
///
/// ## Example
///
/// ```
/// use conditional_visibility::effects::{StatusEffect, StatusEffectRegistry};
///
/// let mut registry = StatusEffectRegistry::new();
///
/// let hidden = StatusEffect::new("hidden", "Hidden", "icons/newspaper.svg");
/// assert!(registry.register(hidden.clone()).unwrap());
///
/// // Registering the same effect again is a no-op
/// assert!(!registry.register(hidden).unwrap());
///
/// let found = registry.get("hidden").unwrap();
/// assert_eq!(found.label, "Hidden");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatusEffectRegistry {
    effects: Vec<StatusEffect>,
    by_id: FxHashMap<String, usize>,
    by_icon: FxHashMap<String, usize>,
}

impl StatusEffectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a status effect.
    ///
    /// Returns `Ok(true)` if the effect was added and `Ok(false)` if an
    /// identical effect was already present. An id or icon already bound to
    /// a different effect is a conflict.
    pub fn register(&mut self, effect: StatusEffect) -> Result<bool, VisibilityError> {
        if let Some(&idx) = self.by_id.get(&effect.id) {
            let existing = &self.effects[idx];
            if existing.icon == effect.icon {
                return Ok(false);
            }
            return Err(VisibilityError::ConflictingStatusEffect {
                id: effect.id,
                existing: existing.icon.clone(),
                icon: effect.icon,
            });
        }
        if let Some(&idx) = self.by_icon.get(&effect.icon) {
            return Err(VisibilityError::ConflictingStatusEffect {
                id: effect.id,
                existing: self.effects[idx].id.clone(),
                icon: effect.icon,
            });
        }

        let idx = self.effects.len();
        self.by_id.insert(effect.id.clone(), idx);
        self.by_icon.insert(effect.icon.clone(), idx);
        self.effects.push(effect);
        Ok(true)
    }

    /// Register every effect of a catalog.
    ///
    /// All effects are checked before any is added, so a conflict leaves the
    /// registry unchanged. Returns how many effects were newly added.
    pub fn register_catalog(&mut self, catalog: &EffectCatalog) -> Result<usize, VisibilityError> {
        let mut staged = self.clone();
        let mut added = 0;
        for effect in catalog.iter() {
            if staged.register(effect.clone())? {
                added += 1;
            }
        }
        *self = staged;
        Ok(added)
    }

    /// Get a status effect by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StatusEffect> {
        self.by_id.get(id).map(|&idx| &self.effects[idx])
    }

    /// Get a status effect by icon.
    #[must_use]
    pub fn by_icon(&self, icon: &str) -> Option<&StatusEffect> {
        self.by_icon.get(icon).map(|&idx| &self.effects[idx])
    }

    /// Check if an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Get the number of registered effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over effects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }
}
