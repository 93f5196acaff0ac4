//! The typed AST produced by the parser (§3.3, §6.2): a closed family of
//! [`Expression`] and [`Statement`] nodes rooted at a single `Module`
//! statement, plus the sticky [`crate::error::ParseErrorKind`] the parse
//! invocation recorded.

pub mod expression;
pub mod statement;
pub mod unpacking;

pub use expression::{Argument, BinaryOperator, Expression, Param, ParamMode, UnaryOperator};
pub use statement::{ImportName, Statement, WithItem};
pub use unpacking::UnpackingFormat;

use crate::error::ParseErrorKind;

/// The parser's output: a `Module` statement owning the whole tree, plus
/// the sticky error slot. `error == NoParseError` is the only condition
/// under which `root` should be treated as complete (§4.5, §7).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ast {
    pub root: Statement,
    pub error: ParseErrorKind,
    pub failure_offset: usize,
    pub failure_explanation: String,
}

impl Ast {
    pub fn is_ok(&self) -> bool {
        self.error == ParseErrorKind::NoParseError
    }
}
