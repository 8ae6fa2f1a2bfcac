//! Core types: tokens, updates, attributes, flags, dice, configuration.
//!
//! These model the host-owned data that visibility systems read and the
//! namespaced flags they write. Nothing here is specific to a rule system.

pub mod attributes;
pub mod config;
pub mod flags;
pub mod rng;
pub mod token;
pub mod update;

pub use attributes::{int_attribute, AttributeKey, AttributeValue, Attributes};
pub use config::{VisibilityConfig, DEFAULT_SYSTEM_ID};
pub use flags::{FlagNamespace, TokenFlags};
pub use rng::{RollRng, RollRngState};
pub use token::{Senses, Sight, Token, TokenId};
pub use update::TokenUpdate;
