//! Visibility systems: the per-rule-system trait and its implementations.
//!
//! Rule systems implement `ConditionalVisibilitySystem` to define:
//! - Their status effects
//! - How token updates become condition flags
//! - How observers' senses combine
//! - Whether a token can be seen
//!
//! The host selects one implementation per session through `SystemRegistry`
//! and never interprets rule-system concepts directly.

pub mod conditions;
pub mod default;
pub mod dnd5e;
pub mod registry;
pub mod system;

pub use default::DefaultSystem;
pub use dnd5e::Dnd5eSystem;
pub use registry::SystemRegistry;
pub use system::ConditionalVisibilitySystem;
