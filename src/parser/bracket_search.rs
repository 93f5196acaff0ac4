//! `find_bracketed` (§4.2): the one primitive every lookahead in the parser
//! is built from. A linear scan over a token index range that ignores
//! anything nested inside a bracket pair, returning the first or last
//! top-level occurrence of a target kind.
//!
//! Grounded on `original_source/parse.cc`'s `find_bracketed_any`, which
//! drives its nesting stack from `is_open_bracket_token`/
//! `get_closing_bracket_token_type`/`token_requires_opener`
//! (`original_source/lex.cc`). Two nesting families besides `()`/`[]`/`{}`
//! fall out of that table and matter here:
//! - `Indent` opens, `Dedent` closes — so a search that spans a whole suite
//!   (e.g. finding a compound statement's closing `Dedent`) correctly skips
//!   over any nested suites inside it.
//! - `Lambda` opens, `Colon` closes — so a lambda's parameter list keeps its
//!   own commas (and any other punctuation up to its colon) hidden from an
//!   enclosing search, the same way a real bracket would. A `Colon` on its
//!   own (suite header, dict item) is not itself required to have an
//!   opener, so this never misfires on an ordinary `if ...:` or `{k: v}`.

use crate::{
    error::{ParseError, ParseErrorKind},
    token::{Token, TokenKind},
};

/// The closer a parser-level "opener" token expects, or `None` if `kind`
/// doesn't open anything in this wider sense.
fn opens(kind: &TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        TokenKind::LBrace => Some(TokenKind::RBrace),
        TokenKind::Indent => Some(TokenKind::Dedent),
        TokenKind::Lambda => Some(TokenKind::Colon),
        _ => None,
    }
}

/// True for closing tokens that are an error if encountered with nothing
/// open to match them. `Colon` is deliberately excluded: a bare colon
/// (suite header, dict item, slice) is not itself a bracketing error.
fn requires_opener(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Dedent
    )
}

/// Scans `tokens[range.0..range.1)` for a token whose kind is one of
/// `targets`, ignoring anything nested inside `()`/`[]`/`{}`, an indented
/// suite, or a lambda's parameter list. Returns the first match unless
/// `last` is set, in which case it returns the last. `Ok(None)` means no
/// top-level match was found. A closing token with nothing open to match
/// it is a [`ParseErrorKind::BracketingError`].
pub fn find_bracketed(
    tokens: &[Token],
    range: (usize, usize),
    targets: &[TokenKind],
    last: bool,
) -> Result<Option<usize>, ParseError> {
    let (start, end) = range;
    let mut stack: Vec<TokenKind> = Vec::new();
    let mut found = None;

    for i in start..end.min(tokens.len()) {
        let kind = &tokens[i].kind;

        if stack.is_empty() && targets.iter().any(|t| t == kind) {
            found = Some(i);
            if !last {
                return Ok(found);
            }
        }

        if stack.last() == Some(kind) {
            stack.pop();
        } else if let Some(closer) = opens(kind) {
            stack.push(closer);
        } else if requires_opener(kind) {
            return Err(ParseError::new(
                ParseErrorKind::BracketingError,
                i,
                "found a closing token with no matching open token",
            ));
        }
    }

    Ok(found)
}
