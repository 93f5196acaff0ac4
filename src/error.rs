//! Closed error-kind enumerations for the lexer and parser, plus the small
//! carrier structs that pair a kind with where it happened.
//!
//! Both the lexer and the parser implement a "sticky error" discipline: the
//! first failure recorded survives, and every later call that would
//! overwrite it is a no-op. The stickiness lives on the `Lexer`/`Parser`
//! structs themselves (see `Lexer::set_error` in `lexer/mod.rs` and the
//! analogous helper in `parser/mod.rs`); these types are just the inert
//! values they record.

use std::fmt::Display;

/// Failure kinds a lex pass can report. `NoLexError` doubles as the "no
/// failure occurred" sentinel used directly in [`crate::token_stream::TokenStream`]
/// rather than wrapping the field in `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum LexErrorKind {
    #[default]
    NoLexError,
    UnmatchedParenthesis,
    UnmatchedBrace,
    UnmatchedBracket,
    MisalignedUnindent,
    BadToken,
    UnterminatedStringConstant,
    BadScientificNotation,
    IncompleteLexing,
}

impl Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LexErrorKind::NoLexError => "no error",
            LexErrorKind::UnmatchedParenthesis => "unmatched parenthesis",
            LexErrorKind::UnmatchedBrace => "unmatched brace",
            LexErrorKind::UnmatchedBracket => "unmatched bracket",
            LexErrorKind::MisalignedUnindent => "misaligned unindent",
            LexErrorKind::BadToken => "unrecognized token",
            LexErrorKind::UnterminatedStringConstant => "unterminated string constant",
            LexErrorKind::BadScientificNotation => "malformed scientific notation",
            LexErrorKind::IncompleteLexing => "comment not followed by a newline",
        };
        f.write_str(text)
    }
}

impl std::error::Error for LexErrorKind {}

/// A recorded lex failure: what went wrong, and the byte offset into the
/// source buffer where it happened (never a token index — see SPEC_FULL.md
/// §7 for why `IncompleteLexing` in particular is pinned to a byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

impl std::error::Error for LexError {}

/// Failure kinds a parse pass can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ParseErrorKind {
    #[default]
    NoParseError,
    UnimplementedFeature,
    InvalidIndentationChange,
    InvalidStartingTokenType,
    ExtraDataAfterLine,
    UnbalancedImportStatement,
    InvalidDynamicList,
    SyntaxError,
    UnexpectedEndOfStream,
    BracketingError,
    IncompleteParsing,
    IncompleteTernaryOperator,
    IncompleteLambdaDefinition,
    IncompleteGeneratorExpression,
    IncompleteExpressionParsing,
    IncompleteDictItem,
    TooManyArguments,
    InvalidAssignment,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ParseErrorKind {}

/// A recorded parse failure. `offset` is a token index into the stream that
/// was being parsed (never a byte offset — that is the lexer's currency).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub explanation: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at token {}: {}", self.kind, self.offset, self.explanation)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize, explanation: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            explanation: explanation.into(),
        }
    }
}
