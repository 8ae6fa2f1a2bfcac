//! Effect catalogs: the icon → condition name mapping a system defines.
//!
//! A catalog is read-only once built. Construction rejects duplicate icons,
//! duplicate ids, and empty names so every system hands the host a clean map.

use rustc_hash::FxHashMap;

use super::status::StatusEffect;
use crate::error::VisibilityError;

/// Ordered, read-only set of status effects indexed by icon.
///
/// ## Example
///
/// ```
/// use conditional_visibility::effects::{EffectCatalog, StatusEffect};
///
/// let catalog = EffectCatalog::from_effects([
///     StatusEffect::new("invisible", "Invisible", "icons/unknown.svg"),
///     StatusEffect::new("obscured", "Obscured", "icons/foggy.svg"),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.name("icons/foggy.svg"), Some("Obscured"));
/// assert_eq!(catalog.condition_id("icons/unknown.svg"), Some("invisible"));
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    effects: Vec<StatusEffect>,
    by_icon: FxHashMap<String, usize>,
}

impl EffectCatalog {
    /// Build a catalog, validating uniqueness and names.
    pub fn from_effects(
        effects: impl IntoIterator<Item = StatusEffect>,
    ) -> Result<Self, VisibilityError> {
        let mut catalog = Self::default();

        for effect in effects {
            if effect.id.is_empty() || effect.label.trim().is_empty() || effect.icon.is_empty() {
                return Err(VisibilityError::InvalidCatalog(format!(
                    "status effect {:?} has an empty field",
                    effect
                )));
            }
            if catalog.by_icon.contains_key(&effect.icon) {
                return Err(VisibilityError::InvalidCatalog(format!(
                    "icon '{}' is used twice",
                    effect.icon
                )));
            }
            if catalog.effects.iter().any(|e| e.id == effect.id) {
                return Err(VisibilityError::InvalidCatalog(format!(
                    "condition '{}' is defined twice",
                    effect.id
                )));
            }

            catalog.by_icon.insert(effect.icon.clone(), catalog.effects.len());
            catalog.effects.push(effect);
        }

        Ok(catalog)
    }

    /// Get the status effect for an icon.
    #[must_use]
    pub fn get(&self, icon: &str) -> Option<&StatusEffect> {
        self.by_icon.get(icon).map(|&idx| &self.effects[idx])
    }

    /// Human-readable condition name for an icon.
    #[must_use]
    pub fn name(&self, icon: &str) -> Option<&str> {
        self.get(icon).map(|e| e.label.as_str())
    }

    /// Condition id (flag key) for an icon.
    #[must_use]
    pub fn condition_id(&self, icon: &str) -> Option<&str> {
        self.get(icon).map(|e| e.id.as_str())
    }

    /// Find a status effect by condition id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Icon for a condition id.
    #[must_use]
    pub fn icon_for(&self, id: &str) -> Option<&str> {
        self.by_id(id).map(|e| e.icon.as_str())
    }

    /// Check if an icon belongs to this catalog.
    #[must_use]
    pub fn contains_icon(&self, icon: &str) -> bool {
        self.by_icon.contains_key(icon)
    }

    /// Iterate over status effects in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Iterate over `(icon, name)` pairs in definition order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.effects.iter().map(|e| (e.icon.as_str(), e.label.as_str()))
    }

    /// Number of effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<StatusEffect> {
        vec![
            StatusEffect::new("invisible", "Invisible", "icons/unknown.svg"),
            StatusEffect::new("obscured", "Obscured", "icons/foggy.svg"),
            StatusEffect::new("indarkness", "In Darkness", "icons/moon.svg"),
        ]
    }

    #[test]
    fn test_lookup() {
        let catalog = EffectCatalog::from_effects(sample()).unwrap();

        assert_eq!(catalog.name("icons/moon.svg"), Some("In Darkness"));
        assert_eq!(catalog.condition_id("icons/moon.svg"), Some("indarkness"));
        assert_eq!(catalog.icon_for("obscured"), Some("icons/foggy.svg"));
        assert!(catalog.get("icons/poison.svg").is_none());
        assert!(!catalog.contains_icon("icons/poison.svg"));
    }

    #[test]
    fn test_definition_order_is_kept() {
        let catalog = EffectCatalog::from_effects(sample()).unwrap();
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["invisible", "obscured", "indarkness"]);

        let pairs: Vec<_> = catalog.pairs().collect();
        assert_eq!(pairs[0], ("icons/unknown.svg", "Invisible"));
    }

    #[test]
    fn test_duplicate_icon_rejected() {
        let mut effects = sample();
        effects.push(StatusEffect::new("hidden", "Hidden", "icons/moon.svg"));

        let err = EffectCatalog::from_effects(effects).unwrap_err();
        assert!(matches!(err, VisibilityError::InvalidCatalog(_)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut effects = sample();
        effects.push(StatusEffect::new("obscured", "Fogged", "icons/fog2.svg"));

        assert!(EffectCatalog::from_effects(effects).is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        let effects = vec![StatusEffect::new("hidden", " ", "icons/newspaper.svg")];
        assert!(EffectCatalog::from_effects(effects).is_err());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = EffectCatalog::from_effects(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
