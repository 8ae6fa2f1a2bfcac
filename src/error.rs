//! Error type shared by every visibility system and host collaborator.
//!
//! Operations that can fail return `Result<_, VisibilityError>`. The
//! rendering-path operations (`get_vision_capabilities`, `can_see`) are
//! wrapped by fallbacks on the system trait, so an error there degrades to
//! reduced visibility instead of reaching the renderer.

use crate::core::TokenId;

/// Errors surfaced by visibility systems, registries, and the host session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VisibilityError {
    #[error("unknown game system '{0}'")]
    UnknownSystem(String),

    #[error("game system '{0}' is already registered")]
    DuplicateSystem(String),

    #[error("status effect '{id}' is already registered with icon '{existing}' (got '{icon}')")]
    ConflictingStatusEffect {
        id: String,
        existing: String,
        icon: String,
    },

    #[error("unknown status effect icon '{0}'")]
    UnknownEffect(String),

    #[error("invalid effect catalog: {0}")]
    InvalidCatalog(String),

    #[error("flag '{namespace}.{key}' holds an unexpected value: {found}")]
    InvalidFlag {
        namespace: String,
        key: String,
        found: String,
    },

    #[error("unknown token {0}")]
    UnknownToken(TokenId),

    #[error("toggle handler '{owner}' failed: {reason}")]
    HandlerFailed { owner: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
