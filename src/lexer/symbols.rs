//! Static lookup tables for reserved words and symbolic tokens.
//!
//! Grounded on the teacher's `LexMap` (`examples/H1ghBre4k3r-y-lang/src/lexer/mod.rs`
//! + `lexmap.rs`): a small map from literal text to a token kind, used by the
//! scanner to resolve the longest match at the current position. The teacher
//! builds the map once behind `lazy_static`; we use `once_cell::sync::Lazy`
//! instead, since `once_cell` (not `lazy_static`) is the dependency the
//! teacher's own `Cargo.toml` actually declares.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::token::TokenKind;

/// Reserved words, keyed by their exact spelling. Anything alphanumeric
/// that doesn't appear here becomes a `Dynamic` token (§4.1 rule 3).
pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    HashMap::from([
        ("print", Print),
        ("del", Del),
        ("pass", Pass),
        ("break", Break),
        ("continue", Continue),
        ("return", Return),
        ("raise", Raise),
        ("import", Import),
        ("from", From),
        ("as", As),
        ("def", Def),
        ("global", Global),
        ("exec", Exec),
        ("assert", Assert),
        ("if", If),
        ("else", Else),
        ("elif", Elif),
        ("with", With),
        ("while", While),
        ("for", For),
        ("in", In),
        ("not", Not),
        ("and", And),
        ("or", Or),
        ("try", Try),
        ("except", Except),
        ("finally", Finally),
        ("lambda", Lambda),
        ("class", Class),
        ("yield", Yield),
        ("is", Is),
    ])
});

/// Symbolic (punctuation/operator) tokens, ordered longest-pattern-first so
/// that a greedy left-to-right scan picks composites like `<<=` over their
/// prefixes `<<` and `<` (§4.1 rule 7). `!=` and `<>` both resolve to
/// `NotEq` (§6.1).
pub static SYMBOLS: Lazy<Vec<(&'static str, TokenKind)>> = Lazy::new(|| {
    use TokenKind::*;
    vec![
        // three-character
        ("<<=", LShiftEq),
        (">>=", RShiftEq),
        ("**=", DoubleStarEq),
        ("//=", DoubleSlashEq),
        // two-character
        ("<<", LShift),
        (">>", RShift),
        ("**", DoubleStar),
        ("//", DoubleSlash),
        ("==", EqEq),
        (">=", GtEq),
        ("<=", LtEq),
        ("!=", NotEq),
        ("<>", NotEq),
        ("+=", PlusEq),
        ("-=", MinusEq),
        ("*=", StarEq),
        ("/=", SlashEq),
        ("%=", PercentEq),
        ("&=", AmpEq),
        ("|=", PipeEq),
        ("^=", CaretEq),
        // one-character
        (":", Colon),
        ("@", At),
        ("(", LParen),
        (")", RParen),
        ("=", Eq),
        (",", Comma),
        ("*", Star),
        (";", Semicolon),
        (".", Dot),
        ("+", Plus),
        ("-", Minus),
        ("/", Slash),
        ("<", Lt),
        (">", Gt),
        ("|", Pipe),
        ("^", Caret),
        ("&", Amp),
        ("%", Percent),
        ("~", Tilde),
        ("[", LBracket),
        ("]", RBracket),
        ("{", LBrace),
        ("}", RBrace),
        ("`", Backtick),
    ]
});

/// Find the longest entry in [`SYMBOLS`] whose text is a prefix of
/// `remaining`. Returns the matched text and its kind.
pub fn match_symbol(remaining: &str) -> Option<(&'static str, TokenKind)> {
    SYMBOLS
        .iter()
        .filter(|(text, _)| remaining.starts_with(text))
        .max_by_key(|(text, _)| text.len())
        .map(|(text, kind)| (*text, kind.clone()))
}
