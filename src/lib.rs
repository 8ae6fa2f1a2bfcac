//! # conditional-visibility
//!
//! Per-game-system token visibility for a virtual tabletop.
//!
//! ## Design Principles
//!
//! 1. **System-Agnostic Host**: The host never interprets rule-system
//!    concepts. Each game system implements `ConditionalVisibilitySystem`
//!    and the host resolves exactly one per session.
//!
//! 2. **Namespaced Flags**: A system writes condition flags only under its
//!    own `game_system_id`, so systems never clobber each other.
//!
//! 3. **Fail Safe**: A system error reduces visibility. It never reveals a
//!    token and never breaks a sight refresh.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Flags and scenes use `im-rs`, so a
//!   recalculation stages on an O(1) copy and commits only on success.
//!
//! - **Deterministic Dice**: HUD rolls use a seeded ChaCha8 stream.
//!
//! ## Modules
//!
//! - `core`: Tokens, updates, attributes, flags, dice, configuration
//! - `effects`: Status effects, per-system catalogs, the host registry
//! - `vision`: Vision capability descriptors
//! - `systems`: The visibility trait, bundled systems, system registry
//! - `hud`: Effect-toggle HUD and toggle handlers
//! - `host`: Scene, sight layer, session wiring
//! - `error`: Error type

pub mod core;
pub mod effects;
pub mod error;
pub mod host;
pub mod hud;
pub mod systems;
pub mod vision;

// Re-export commonly used types
pub use crate::core::{
    AttributeKey, AttributeValue, Attributes,
    FlagNamespace, TokenFlags,
    RollRng, RollRngState,
    Senses, Sight, Token, TokenId,
    TokenUpdate,
    VisibilityConfig, DEFAULT_SYSTEM_ID,
};

pub use crate::effects::{EffectCatalog, StatusEffect, StatusEffectRegistry};

pub use crate::error::VisibilityError;

pub use crate::host::{Scene, SightLayer, Viewer, VisibilitySession};

pub use crate::hud::{EffectToggle, ToggleHandler, TokenHud};

pub use crate::systems::{
    ConditionalVisibilitySystem, DefaultSystem, Dnd5eSystem, SystemRegistry,
};

pub use crate::vision::VisionCapabilities;
