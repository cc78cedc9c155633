//! Ordered line of tokens
//!
//! The line only grows at the tail. Tokens leave it through `remove_by_id`,
//! which shifts every follower down by one; nothing else reorders it. Lookups
//! are linear scans, the line stays in the tens of tokens.

use shared::{Color, PlayerId, Token, TokenId};

/// A token taken out of the line together with the index it used to occupy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedToken {
    pub index: usize,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct LineStore {
    tokens: Vec<Token>,
    next_token_id: TokenId,
}

impl LineStore {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            next_token_id: 1,
        }
    }

    /// Creates a token with the next id and pushes it to the tail
    pub fn append(&mut self, color: Color, owner: PlayerId) -> Token {
        let token = Token::new(self.next_token_id, color, owner);
        self.next_token_id += 1;
        self.tokens.push(token.clone());
        token
    }

    pub fn remove_by_id(&mut self, id: TokenId) -> Option<RemovedToken> {
        let index = self.index_of_id(id)?;
        let token = self.tokens.remove(index);
        Some(RemovedToken { index, token })
    }

    pub fn update_by_id(&mut self, id: TokenId, color: Color, owner: PlayerId) -> Option<Token> {
        let token = self.tokens.iter_mut().find(|token| token.id == id)?;
        token.color = color;
        token.owner = owner;
        Some(token.clone())
    }

    pub fn index_of_id(&self, id: TokenId) -> Option<usize> {
        self.tokens.iter().position(|token| token.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}
