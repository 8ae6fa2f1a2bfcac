//! Scene: the tokens placed on the current map.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::{Token, TokenId};

/// Ordered token storage.
///
/// Backed by `im::OrdMap` so iteration order is stable and copying a scene
/// for a what-if pass is O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    tokens: OrdMap<TokenId, Token>,
    /// Next id to allocate; one past `u32::MAX` once ids run out.
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a plain token and return its id.
    ///
    /// Returns `None` once every id up to `u32::MAX` has been handed out.
    pub fn spawn(&mut self, name: impl Into<String>) -> Option<TokenId> {
        let Ok(raw) = u32::try_from(self.next_id) else {
            tracing::warn!("Scene has run out of token ids");
            return None;
        };
        let id = TokenId::new(raw);
        self.insert(Token::new(id, name));
        Some(id)
    }

    /// Place a token, replacing any token with the same id.
    pub fn insert(&mut self, token: Token) -> Option<Token> {
        self.next_id = self.next_id.max(u64::from(token.id.raw()) + 1);
        self.tokens.insert(token.id, token)
    }

    /// Remove a token.
    pub fn remove(&mut self, id: TokenId) -> Option<Token> {
        self.tokens.remove(&id)
    }

    /// Get a token.
    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    /// Get a token mutably.
    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.get_mut(&id)
    }

    /// Iterate over tokens in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Token ids in order.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens.keys().copied()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
