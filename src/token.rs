//! The token model: a closed [`TokenKind`] enumeration, the [`Token`]
//! envelope that pairs a kind with its source span, and [`Span`], the byte
//! range a token (or, later, an AST node) occupies in the source buffer.

use std::fmt::Display;

/// A byte range into the source buffer: `[offset, offset + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Span covering everything from `self`'s start through `other`'s end.
    /// Used to widen a node's span to include a trailing clause.
    pub fn merge(&self, other: &Span) -> Span {
        let end = other.end().max(self.end());
        Span {
            offset: self.offset,
            len: end - self.offset,
        }
    }

    /// Render `msg` underneath the offending slice of `source`, colorizing
    /// the span red. Used by the CLI driver; not needed by the library
    /// itself, which only ever reports byte/token offsets.
    pub fn render(&self, source: &str, msg: impl Display) -> String {
        use colored::Colorize;

        let before = &source[..self.offset.min(source.len())];
        let line_no = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = source[self.offset.min(source.len())..]
            .find('\n')
            .map(|i| self.offset + i)
            .unwrap_or(source.len());
        let line = &source[line_start..line_end];
        let col = self.offset.saturating_sub(line_start);
        let underline_len = self.len.max(1).min(line.len().saturating_sub(col).max(1));

        format!(
            "{:>4} | {}\n     | {}{}\n     = {}",
            line_no + 1,
            line,
            " ".repeat(col),
            "^".repeat(underline_len).to_string().red(),
            msg
        )
    }
}

/// The closed set of token kinds the lexer produces. Payload-bearing
/// variants carry their decoded value directly; everything else is a unit
/// variant distinguished only by its discriminant (mirrors §3.1: "other
/// kinds carry no payload").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    // --- structural ---
    Dynamic(String),
    StringConstant(String),
    Integer(i64),
    Float(f64),
    Indent,
    Dedent,
    Comment,
    Newline,
    BackslashNewline,
    InvalidToken,

    // --- reserved words ---
    Print,
    Del,
    Pass,
    Break,
    Continue,
    Return,
    Raise,
    Import,
    From,
    As,
    Def,
    Global,
    Exec,
    Assert,
    If,
    Else,
    Elif,
    With,
    While,
    For,
    In,
    Not,
    And,
    Or,
    Try,
    Except,
    Finally,
    Lambda,
    Class,
    Yield,
    Is,

    // --- fused composites (lexer post-pass only) ---
    NotIn,
    IsNot,

    // --- symbols ---
    Colon,
    At,
    LParen,
    RParen,
    Eq,
    Comma,
    Star,
    DoubleStar,
    Semicolon,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LShiftEq,
    RShiftEq,
    DoubleStarEq,
    DoubleSlashEq,
    LShift,
    RShift,
    Dot,
    Plus,
    Minus,
    Slash,
    Lt,
    Gt,
    EqEq,
    GtEq,
    LtEq,
    NotEq,
    Pipe,
    Caret,
    Amp,
    Percent,
    DoubleSlash,
    Tilde,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Backtick,
}

impl TokenKind {
    /// True only for `Newline`.
    pub fn is_newline(&self) -> bool {
        matches!(self, TokenKind::Newline)
    }

    pub fn is_open_bracket(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    pub fn is_close_bracket(&self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// The closer that matches this opener, or `None` if `self` is not an
    /// opener. The spec's "closer's ordinal equals opener + 1" is an
    /// implementation detail of the reference enum layout; we express the
    /// same family relation as an explicit match instead of relying on
    /// discriminant arithmetic.
    pub fn matching_closer(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An immutable, positioned token. Produced only by the lexer; never
/// mutated once created (§3.1).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
