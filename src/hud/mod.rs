//! Effect-toggle HUD.
//!
//! The HUD is where a user switches status effects on a token. Visibility
//! systems hook into it with toggle handlers (e.g. rolling stealth when a
//! token becomes hidden).
//!
//! ## Toggle Flow
//!
//! 1. Look up the clicked icon in the status effect registry
//! 2. Run every handler against a staged copy of the token
//! 3. Commit the staged token only if all handlers succeeded
//! 4. Return the `TokenUpdate` with the new effect list for the host to apply

mod toggle;

pub use toggle::{EffectToggle, ToggleHandler, TokenHud};
