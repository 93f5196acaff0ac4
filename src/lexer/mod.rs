//! The hand-written character scanner (§4.1). Grounded on the teacher's
//! char-by-char `Lexer` in `examples/H1ghBre4k3r-y-lang/src/lexer/mod.rs`:
//! a cursor over the raw bytes, a longest-match lookup against a static
//! table for everything that isn't an identifier/literal, and a single
//! pass that both tokenizes and tracks the bracket/indentation state needed
//! to emit `Indent`/`Dedent` and catch unbalanced brackets as they happen.
//!
//! Unlike the teacher, this scanner also owns the indentation stack (the
//! teacher's source language is not indentation-sensitive) and a post-pass
//! stage (see [`postprocess`]) that cleans up comments, stray newlines and
//! multi-token composites after the main scan completes.

mod postprocess;
pub mod symbols;

use crate::{
    error::{LexError, LexErrorKind},
    token::{Span, Token, TokenKind},
    token_stream::TokenStream,
};
use symbols::{match_symbol, KEYWORDS};

/// Scans `source` into a [`TokenStream`]. Always succeeds as a function
/// call; failure is reported through `TokenStream::error`, never a `Result`,
/// so that partial output remains inspectable (§6.2).
pub fn lex(source: &str) -> TokenStream {
    let mut lexer = Lexer::new(source.as_bytes());
    lexer.run();

    if let Some(err) = lexer.error {
        return TokenStream {
            tokens: Vec::new(),
            error: err.kind,
            failure_offset: err.offset,
        };
    }

    match postprocess::postprocess(lexer.tokens, &mut lexer.indent_stack, lexer.pos) {
        Ok(tokens) => TokenStream::ok(tokens),
        Err(err) => TokenStream {
            tokens: Vec::new(),
            error: err.kind,
            failure_offset: err.offset,
        },
    }
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    indent_stack: Vec<usize>,
    paren_stack: Vec<(TokenKind, usize)>,
    error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            indent_stack: vec![0],
            paren_stack: Vec::new(),
            error: None,
        }
    }

    fn byte_at(&self, i: usize) -> Option<u8> {
        self.input.get(i).copied()
    }

    /// Length of the line terminator starting at `p`, if any.
    fn line_terminator_len(&self, p: usize) -> Option<usize> {
        match (self.byte_at(p), self.byte_at(p + 1)) {
            (Some(b'\r'), Some(b'\n')) => Some(2),
            (Some(b'\n'), _) => Some(1),
            _ => None,
        }
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }

    fn set_error(&mut self, kind: LexErrorKind, offset: usize) {
        if self.error.is_none() {
            self.error = Some(LexError { kind, offset });
        }
    }

    fn run(&mut self) {
        while self.error.is_none() {
            let Some(b) = self.byte_at(self.pos) else {
                break;
            };
            match b {
                b' ' => self.pos += 1,
                b'#' => self.scan_comment(),
                b'\r' | b'\n' if self.line_terminator_len(self.pos).is_some() => {
                    self.scan_newline()
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),
                b'\'' | b'"' => self.scan_string(),
                b'0'..=b'9' => self.scan_number(),
                b'.' if self.byte_at(self.pos + 1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number()
                }
                _ => self.scan_symbol_or_special(),
            }
        }

        if self.error.is_none() {
            if let Some((opener, offset)) = self.paren_stack.first() {
                let err_kind = match opener {
                    TokenKind::LParen => LexErrorKind::UnmatchedParenthesis,
                    TokenKind::LBracket => LexErrorKind::UnmatchedBracket,
                    TokenKind::LBrace => LexErrorKind::UnmatchedBrace,
                    _ => unreachable!("only opening-bracket kinds are ever pushed"),
                };
                self.set_error(err_kind, *offset);
            }
        }
    }

    fn scan_comment(&mut self) {
        let start = self.pos;
        let mut p = start + 1;
        while self.byte_at(p).is_some_and(|b| b != b'\n' && b != b'\r') {
            p += 1;
        }
        self.push(TokenKind::Comment, Span::new(start, p - start));
        self.pos = p;
    }

    fn scan_newline(&mut self) {
        let offset = self.pos;
        let len = self.line_terminator_len(offset).expect("checked by caller");
        self.pos += len;
        if !self.paren_stack.is_empty() {
            // A newline nested inside brackets is a continuation: consumed,
            // but no token is emitted and indentation is not re-measured.
            return;
        }
        self.push(TokenKind::Newline, Span::new(offset, len));
        self.handle_indentation();
    }

    /// Skips blank lines, measures the indentation of the next content
    /// line, and emits whatever `Indent`/`Dedent` tokens that implies.
    fn handle_indentation(&mut self) {
        loop {
            let line_start = self.pos;
            let mut p = line_start;
            while self.byte_at(p) == Some(b' ') {
                p += 1;
            }
            match self.line_terminator_len(p) {
                Some(n) => self.pos = p + n,
                None => break,
            }
        }

        let mut p = self.pos;
        while self.byte_at(p) == Some(b' ') {
            p += 1;
        }
        let next_indent = p - self.pos;
        let top = *self.indent_stack.last().unwrap();

        if next_indent > top {
            self.indent_stack.push(next_indent);
            self.push(TokenKind::Indent, Span::new(self.pos, 0));
        } else {
            while next_indent < *self.indent_stack.last().unwrap() {
                self.indent_stack.pop();
                self.push(TokenKind::Dedent, Span::new(self.pos, 0));
            }
            if *self.indent_stack.last().unwrap() != next_indent {
                self.set_error(LexErrorKind::MisalignedUnindent, self.pos);
                return;
            }
        }
        self.pos += next_indent;
    }

    fn scan_identifier(&mut self) {
        let start = self.pos;
        let mut p = start;
        while self
            .byte_at(p)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            p += 1;
        }
        let text = std::str::from_utf8(&self.input[start..p]).expect("ascii-checked above");
        let kind = KEYWORDS
            .get(text)
            .cloned()
            .unwrap_or_else(|| TokenKind::Dynamic(text.to_string()));
        self.push(kind, Span::new(start, p - start));
        self.pos = p;
    }

    /// Single- or triple-quoted string literal. No escape processing is
    /// performed: the body is copied verbatim between the delimiters
    /// (§4.1 rule 4), so a backslash has no special meaning here.
    fn scan_string(&mut self) {
        let start = self.pos;
        let quote = self.input[start];
        let is_triple =
            self.byte_at(start + 1) == Some(quote) && self.byte_at(start + 2) == Some(quote);

        if is_triple {
            let mut p = start + 3;
            loop {
                if self.byte_at(p) == Some(quote)
                    && self.byte_at(p + 1) == Some(quote)
                    && self.byte_at(p + 2) == Some(quote)
                {
                    let body = String::from_utf8_lossy(&self.input[start + 3..p]).into_owned();
                    self.push(TokenKind::StringConstant(body), Span::new(start, p + 3 - start));
                    self.pos = p + 3;
                    return;
                }
                if p >= self.input.len() {
                    self.set_error(LexErrorKind::UnterminatedStringConstant, start);
                    return;
                }
                p += 1;
            }
        } else {
            let mut p = start + 1;
            loop {
                match self.byte_at(p) {
                    None | Some(b'\n') | Some(b'\r') => {
                        self.set_error(LexErrorKind::UnterminatedStringConstant, start);
                        return;
                    }
                    Some(b) if b == quote => {
                        let body =
                            String::from_utf8_lossy(&self.input[start + 1..p]).into_owned();
                        self.push(TokenKind::StringConstant(body), Span::new(start, p + 1 - start));
                        self.pos = p + 1;
                        return;
                    }
                    _ => p += 1,
                }
            }
        }
    }

    /// Integer, float, or hex-integer literal, including the leading-dot
    /// float form (`.5`) and scientific notation (§4.1 rule 5 + rule 6).
    fn scan_number(&mut self) {
        let start = self.pos;

        if self.byte_at(start) == Some(b'0')
            && matches!(self.byte_at(start + 1), Some(b'x') | Some(b'X'))
            && self.byte_at(start + 2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            let mut p = start + 2;
            while self.byte_at(p).is_some_and(|b| b.is_ascii_hexdigit()) {
                p += 1;
            }
            let text = std::str::from_utf8(&self.input[start + 2..p]).expect("hex-checked above");
            // Overflow wraps rather than erroring: parse as u64, reinterpret
            // the bits as i64 (resolves an open question; see SPEC_FULL.md §9).
            let value = u64::from_str_radix(text, 16).unwrap_or(0) as i64;
            self.push(TokenKind::Integer(value), Span::new(start, p - start));
            self.pos = p;
            return;
        }

        if self.byte_at(start) == Some(b'.') && self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
            let mut p = start + 1;
            while self.byte_at(p).is_some_and(|b| b.is_ascii_digit()) {
                p += 1;
            }
            match self.scan_exponent(p) {
                Ok(new_p) => p = new_p,
                Err(()) => {
                    self.set_error(LexErrorKind::BadScientificNotation, start);
                    return;
                }
            }
            let text = std::str::from_utf8(&self.input[start..p]).expect("digit-checked above");
            let value: f64 = text.parse().unwrap_or(0.0);
            self.push(TokenKind::Float(value), Span::new(start, p - start));
            self.pos = p;
            return;
        }

        let mut p = start;
        while self.byte_at(p).is_some_and(|b| b.is_ascii_digit()) {
            p += 1;
        }
        let mut is_float = false;
        if self.byte_at(p) == Some(b'.') {
            is_float = true;
            p += 1;
            while self.byte_at(p).is_some_and(|b| b.is_ascii_digit()) {
                p += 1;
            }
        }
        if matches!(self.byte_at(p), Some(b'e') | Some(b'E')) {
            match self.scan_exponent(p) {
                Ok(new_p) => {
                    is_float = true;
                    p = new_p;
                }
                Err(()) => {
                    self.set_error(LexErrorKind::BadScientificNotation, start);
                    return;
                }
            }
        }

        let text = std::str::from_utf8(&self.input[start..p]).expect("digit-checked above");
        if is_float {
            let value: f64 = text.parse().unwrap_or(0.0);
            self.push(TokenKind::Float(value), Span::new(start, p - start));
        } else {
            let value = text
                .parse::<i64>()
                .unwrap_or_else(|_| text.parse::<u64>().map(|v| v as i64).unwrap_or(0));
            self.push(TokenKind::Integer(value), Span::new(start, p - start));
        }
        self.pos = p;
    }

    /// If an exponent marker sits at `p`, consumes it plus optional sign and
    /// its required digit run, returning the new position. Returns `Err`
    /// when `e`/`E` is present but no digit follows (malformed exponent).
    /// When no exponent marker is present at all, returns `Ok(p)` unchanged.
    fn scan_exponent(&self, p: usize) -> Result<usize, ()> {
        if !matches!(self.byte_at(p), Some(b'e') | Some(b'E')) {
            return Ok(p);
        }
        let mut q = p + 1;
        if matches!(self.byte_at(q), Some(b'+') | Some(b'-')) {
            q += 1;
        }
        if !self.byte_at(q).is_some_and(|b| b.is_ascii_digit()) {
            return Err(());
        }
        while self.byte_at(q).is_some_and(|b| b.is_ascii_digit()) {
            q += 1;
        }
        Ok(q)
    }

    /// Everything not handled above: line-continuation backslashes and the
    /// symbol table, including the bracket push/pop bookkeeping (§4.1
    /// rule 7, §4.2).
    fn scan_symbol_or_special(&mut self) {
        let start = self.pos;

        if self.byte_at(start) == Some(b'\\') {
            if let Some(n) = self.line_terminator_len(start + 1) {
                self.push(TokenKind::BackslashNewline, Span::new(start, 1 + n));
                self.pos = start + 1 + n;
                return;
            }
        }

        let remaining = std::str::from_utf8(&self.input[start..]).unwrap_or("");
        let Some((text, kind)) = match_symbol(remaining) else {
            self.set_error(LexErrorKind::BadToken, start);
            return;
        };
        let len = text.len();

        if kind.is_open_bracket() {
            self.paren_stack.push((kind.clone(), start));
        } else if kind.is_close_bracket() {
            let opener = self.paren_stack.pop();
            let matches = opener
                .as_ref()
                .and_then(|(k, _)| TokenKind::matching_closer(k))
                .is_some_and(|expected| expected == kind);
            if !matches {
                let err_kind = match &kind {
                    TokenKind::RParen => LexErrorKind::UnmatchedParenthesis,
                    TokenKind::RBracket => LexErrorKind::UnmatchedBracket,
                    TokenKind::RBrace => LexErrorKind::UnmatchedBrace,
                    _ => unreachable!("is_close_bracket guarantees one of the above"),
                };
                self.set_error(err_kind, start);
                return;
            }
        }

        self.push(kind, Span::new(start, len));
        self.pos = start + len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let stream = lex(src);
        assert!(stream.is_ok(), "unexpected lex error: {:?}", stream.error);
        stream.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_a_single_newline() {
        assert_eq!(kinds(""), vec![TokenKind::Newline]);
    }

    #[test]
    fn whitespace_only_input_is_a_single_newline() {
        assert_eq!(kinds("   \n   \n"), vec![TokenKind::Newline]);
    }

    #[test]
    fn trailing_comment_with_no_newline_is_dropped() {
        assert_eq!(kinds("x = 1\n# trailing, no newline"), vec![
            TokenKind::Dynamic("x".into()),
            TokenKind::Eq,
            TokenKind::Integer(1),
            TokenKind::Newline,
        ]);
    }

    #[test]
    fn simple_indent_and_dedent() {
        assert_eq!(
            kinds("if x:\n    pass\ny = 1\n"),
            vec![
                TokenKind::If,
                TokenKind::Dynamic("x".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Pass,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Dynamic("y".into()),
                TokenKind::Eq,
                TokenKind::Integer(1),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn misaligned_unindent_is_an_error() {
        let stream = lex("if x:\n    pass\n   y = 1\n");
        assert_eq!(stream.error, LexErrorKind::MisalignedUnindent);
    }

    #[test]
    fn semicolons_become_newlines() {
        assert_eq!(
            kinds("x = 1; y = 2\n"),
            vec![
                TokenKind::Dynamic("x".into()),
                TokenKind::Eq,
                TokenKind::Integer(1),
                TokenKind::Newline,
                TokenKind::Dynamic("y".into()),
                TokenKind::Eq,
                TokenKind::Integer(2),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn newline_inside_brackets_is_not_emitted() {
        assert_eq!(
            kinds("x = (1,\n2)\n"),
            vec![
                TokenKind::Dynamic("x".into()),
                TokenKind::Eq,
                TokenKind::LParen,
                TokenKind::Integer(1),
                TokenKind::Comma,
                TokenKind::Integer(2),
                TokenKind::RParen,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn unmatched_close_paren_is_an_error() {
        let stream = lex("x = (1, 2))\n");
        assert_eq!(stream.error, LexErrorKind::UnmatchedParenthesis);
    }

    #[test]
    fn is_not_and_not_in_fuse() {
        assert_eq!(
            kinds("a is not b\nc not in d\n"),
            vec![
                TokenKind::Dynamic("a".into()),
                TokenKind::IsNot,
                TokenKind::Dynamic("b".into()),
                TokenKind::Newline,
                TokenKind::Dynamic("c".into()),
                TokenKind::NotIn,
                TokenKind::Dynamic("d".into()),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn leading_dot_float_and_hex_literal() {
        assert_eq!(
            kinds("x = .5\ny = 0xFF\n"),
            vec![
                TokenKind::Dynamic("x".into()),
                TokenKind::Eq,
                TokenKind::Float(0.5),
                TokenKind::Newline,
                TokenKind::Dynamic("y".into()),
                TokenKind::Eq,
                TokenKind::Integer(255),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn malformed_scientific_notation_is_an_error() {
        let stream = lex("x = 1e\n");
        assert_eq!(stream.error, LexErrorKind::BadScientificNotation);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let stream = lex("x = 'abc\n");
        assert_eq!(stream.error, LexErrorKind::UnterminatedStringConstant);
    }

    #[test]
    fn triple_quoted_string_spans_newlines() {
        assert_eq!(
            kinds("x = \"\"\"a\nb\"\"\"\n"),
            vec![
                TokenKind::Dynamic("x".into()),
                TokenKind::Eq,
                TokenKind::StringConstant("a\nb".into()),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn comment_followed_by_code_without_newline_is_incomplete_lexing() {
        // Constructed directly since the scanner itself never produces a
        // Comment token immediately followed by non-newline content other
        // than EOF; this exercises the post-pass guard in isolation.
        let tokens = vec![
            Token::new(TokenKind::Comment, Span::new(0, 3)),
            Token::new(TokenKind::Dynamic("x".into()), Span::new(4, 1)),
        ];
        let mut indents = vec![0];
        let err = postprocess::postprocess(tokens, &mut indents, 5).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::IncompleteLexing);
    }

    #[test]
    fn bad_token_on_tab_character() {
        let stream = lex("x\t= 1\n");
        assert_eq!(stream.error, LexErrorKind::BadToken);
    }
}
