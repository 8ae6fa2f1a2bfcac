//! Status effects: definitions, per-system catalogs, and the host registry.
//!
//! ## Key Types
//!
//! - `StatusEffect`: id, label, icon of one toggleable condition
//! - `EffectCatalog`: the icon → condition name map a system defines
//! - `StatusEffectRegistry`: every effect the HUD can toggle

pub mod catalog;
pub mod registry;
pub mod status;

pub use catalog::EffectCatalog;
pub use registry::StatusEffectRegistry;
pub use status::StatusEffect;
