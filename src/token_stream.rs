//! [`TokenStream`]: the lexer's output and the parser's input.

use crate::{
    error::LexErrorKind,
    token::{Token, TokenKind},
};

/// An ordered sequence of tokens plus a sticky lex error (§3.2, §6.2).
/// `error == LexErrorKind::NoLexError` means the lex succeeded and `tokens`
/// satisfies the invariants in §3.2; otherwise `tokens` holds whatever was
/// produced before the failure and must not be handed to the parser.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub error: LexErrorKind,
    pub failure_offset: usize,
}

impl TokenStream {
    pub fn ok(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            error: LexErrorKind::NoLexError,
            failure_offset: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error == LexErrorKind::NoLexError
    }

    pub fn kind_at(&self, index: usize) -> Option<&TokenKind> {
        self.tokens.get(index).map(|t| &t.kind)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
