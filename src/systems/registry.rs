//! Registry of available visibility systems.
//!
//! The host registers every implementation it ships, then resolves the one
//! matching the active rule system once at session start.

use rustc_hash::FxHashMap;

use super::default::DefaultSystem;
use super::dnd5e::Dnd5eSystem;
use super::system::ConditionalVisibilitySystem;
use crate::core::DEFAULT_SYSTEM_ID;
use crate::error::VisibilityError;

/// Map from game system id to implementation.
///
/// ## Example
///
/// ```
/// use conditional_visibility::systems::{ConditionalVisibilitySystem, SystemRegistry};
///
/// let registry = SystemRegistry::with_builtin();
/// assert_eq!(registry.ids(), vec!["default", "dnd5e"]);
///
/// let system = registry.resolve("pf2e", true).unwrap();
/// assert_eq!(system.game_system_id(), "default");
/// ```
#[derive(Default)]
pub struct SystemRegistry {
    systems: FxHashMap<String, Box<dyn ConditionalVisibilitySystem>>,
}

impl SystemRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled systems.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut systems: FxHashMap<String, Box<dyn ConditionalVisibilitySystem>> =
            FxHashMap::default();
        systems.insert(DefaultSystem::ID.to_string(), Box::new(DefaultSystem::new()));
        systems.insert(Dnd5eSystem::ID.to_string(), Box::new(Dnd5eSystem::new()));
        Self { systems }
    }

    /// Register an implementation under its own id.
    pub fn register(
        &mut self,
        system: Box<dyn ConditionalVisibilitySystem>,
    ) -> Result<(), VisibilityError> {
        let id = system.game_system_id().to_string();
        if id.is_empty() {
            return Err(VisibilityError::Config("game system id must not be empty".to_string()));
        }
        if self.systems.contains_key(&id) {
            return Err(VisibilityError::DuplicateSystem(id));
        }
        self.systems.insert(id, system);
        Ok(())
    }

    /// Get an implementation by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn ConditionalVisibilitySystem> {
        self.systems.get(id).map(|system| system.as_ref())
    }

    /// Check if an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.systems.contains_key(id)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.systems.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Take the implementation for `id`, consuming the registry.
    ///
    /// With `fallback_to_default`, an unknown id resolves to the `"default"`
    /// system if one is registered.
    pub fn resolve(
        mut self,
        id: &str,
        fallback_to_default: bool,
    ) -> Result<Box<dyn ConditionalVisibilitySystem>, VisibilityError> {
        if let Some(system) = self.systems.remove(id) {
            return Ok(system);
        }
        if fallback_to_default {
            if let Some(system) = self.systems.remove(DEFAULT_SYSTEM_ID) {
                tracing::warn!(
                    "No visibility system for '{}', falling back to '{}'",
                    id,
                    DEFAULT_SYSTEM_ID
                );
                return Ok(system);
            }
        }
        Err(VisibilityError::UnknownSystem(id.to_string()))
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRegistry").field("systems", &self.ids()).finish()
    }
}
