//! Lexer and parser front end for a Python 2 syntax subset, producing a
//! fully typed AST (§1).
//!
//! The pipeline is two calls: [`lexer::lex`] turns source text into a
//! [`token_stream::TokenStream`], and [`parser::parse`] turns that stream
//! into an [`ast::Ast`]. Both always return a value — failures are
//! reported through a sticky error field rather than `Result`, so a partial
//! token stream or partial AST remains inspectable even after the first
//! error (§6.2).

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod source;
pub mod token;
pub mod token_stream;

pub use ast::Ast;
pub use lexer::lex;
pub use parser::parse;
pub use source::SourceFile;
pub use token_stream::TokenStream;

/// Lexes and parses `source` in one call.
pub fn compile(source: &str) -> Ast {
    parse(&lex(source))
}
