//! The four ordered post-passes applied to the raw token vector once the
//! character scan finishes (§4.1 "Post-passes"). Kept separate from the
//! scanning loop itself, mirroring how the teacher keeps lexing concerns
//! (`lexer/mod.rs`) and lookup-table concerns (`lexer/lexmap.rs`) in their
//! own files rather than one monolithic function.

use crate::{
    error::{LexError, LexErrorKind},
    token::{Span, Token, TokenKind},
};

/// Applies, in order: comment deletion, leading-newline stripping,
/// composite-token fusion + semicolon/newline collapsing, and finally the
/// trailing-newline + close-all-indents cleanup. `indent_stack` is the
/// lexer's still-open indentation levels at end of input; `eof_offset` is
/// the byte offset one past the last character scanned, used as the span
/// for any synthesized `Newline`/`Dedent` tokens.
pub fn postprocess(
    tokens: Vec<Token>,
    indent_stack: &mut Vec<usize>,
    eof_offset: usize,
) -> Result<Vec<Token>, LexError> {
    let tokens = delete_comments(tokens)?;
    let tokens = strip_leading_newlines(tokens);
    let mut tokens = fuse_and_collapse(tokens);

    if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Newline)) {
        tokens.push(Token::new(TokenKind::Newline, Span::new(eof_offset, 0)));
    }
    while *indent_stack.last().unwrap_or(&0) > 0 {
        indent_stack.pop();
        tokens.push(Token::new(TokenKind::Dedent, Span::new(eof_offset, 0)));
    }

    Ok(tokens)
}

fn delete_comments(tokens: Vec<Token>) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if matches!(tokens[i].kind, TokenKind::Comment) {
            let at_end = i + 1 >= tokens.len();
            let followed_by_newline =
                matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Newline));
            if !at_end && !followed_by_newline {
                return Err(LexError {
                    kind: LexErrorKind::IncompleteLexing,
                    offset: tokens[i].span.offset,
                });
            }
            // comment consumed silently, whether or not a newline follows
            i += 1;
            continue;
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    Ok(out)
}

fn strip_leading_newlines(mut tokens: Vec<Token>) -> Vec<Token> {
    while matches!(tokens.first().map(|t| &t.kind), Some(TokenKind::Newline)) {
        tokens.remove(0);
    }
    tokens
}

fn fuse_and_collapse(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let cur = &tokens[i];
        match &cur.kind {
            TokenKind::Is if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Not)) => {
                let span = cur.span.merge(&tokens[i + 1].span);
                out.push(Token::new(TokenKind::IsNot, span));
                i += 2;
            }
            TokenKind::Not if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::In)) => {
                let span = cur.span.merge(&tokens[i + 1].span);
                out.push(Token::new(TokenKind::NotIn, span));
                i += 2;
            }
            TokenKind::Semicolon => {
                if !matches!(out.last().map(|t| &t.kind), Some(TokenKind::Newline)) {
                    out.push(Token::new(TokenKind::Newline, cur.span));
                }
                i += 1;
            }
            TokenKind::Newline => {
                if !matches!(out.last().map(|t| &t.kind), Some(TokenKind::Newline)) {
                    out.push(cur.clone());
                }
                i += 1;
            }
            _ => {
                out.push(cur.clone());
                i += 1;
            }
        }
    }
    out
}
