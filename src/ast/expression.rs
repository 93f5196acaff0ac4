//! [`Expression`]: the closed sum-type of expression nodes (§3.3), plus the
//! operator enumerations and call-argument/parameter shapes it is built
//! from. Modeled on the teacher's one-node-per-file layout
//! (`examples/H1ghBre4k3r-y-lang/src/ast/binary_expr.rs`,
//! `postfix_expr.rs`, `prefix_expr.rs`) collapsed into a single closed enum,
//! since here the variants are a fixed, specification-defined family rather
//! than an open grammar grown one pest rule at a time.

use crate::{ast::unpacking::UnpackingFormat, token::Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnaryOperator {
    Not,
    Plus,
    Minus,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    In,
    NotIn,
    Is,
    IsNot,
    BitOr,
    BitXor,
    BitAnd,
    LShift,
    RShift,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// One formal parameter of a `def`/`lambda`, tagged with how it binds
/// (§8 scenario 2: "Default, Default-with-value, ArgList, KeywordArgList").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParamMode {
    /// A plain required parameter, e.g. `a`.
    Default,
    /// A parameter with a default value, e.g. `b=2`.
    DefaultWithValue(Expression),
    /// `*args`-style catch-all for excess positional arguments.
    ArgList,
    /// `**kwargs`-style catch-all for excess keyword arguments.
    KeywordArgList,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    pub name: String,
    pub mode: ParamMode,
    pub span: Span,
}

/// One element of a call's argument list, tagged by how it's passed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Argument {
    Positional(Expression),
    Star(Expression),
    DoubleStar(Expression),
    Keyword { name: String, value: Expression },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Expression {
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
        span: Span,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        span: Span,
    },

    ListConstructor {
        items: Vec<Expression>,
        span: Span,
    },
    SetConstructor {
        items: Vec<Expression>,
        span: Span,
    },
    TupleConstructor {
        items: Vec<Expression>,
        span: Span,
    },
    DictConstructor {
        items: Vec<(Expression, Expression)>,
        span: Span,
    },

    ListComprehension {
        item_pattern: Box<Expression>,
        variables: UnpackingFormat,
        source_data: Box<Expression>,
        predicate: Option<Box<Expression>>,
        span: Span,
    },
    SetComprehension {
        item_pattern: Box<Expression>,
        variables: UnpackingFormat,
        source_data: Box<Expression>,
        predicate: Option<Box<Expression>>,
        span: Span,
    },
    DictComprehension {
        key_pattern: Box<Expression>,
        value_pattern: Box<Expression>,
        variables: UnpackingFormat,
        source_data: Box<Expression>,
        predicate: Option<Box<Expression>>,
        span: Span,
    },

    Lambda {
        params: Vec<Param>,
        body: Box<Expression>,
        span: Span,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Argument>,
        span: Span,
    },
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
        span: Span,
    },
    Slice {
        target: Box<Expression>,
        start: Option<Box<Expression>>,
        stop: Option<Box<Expression>>,
        span: Span,
    },
    AttributeLookup {
        target: Box<Expression>,
        // Narrowed to a plain identifier string, the only legal right-hand
        // form (see SPEC_FULL.md §9, resolving an ambiguity in the original).
        attribute: String,
        span: Span,
    },

    Integer(i64, Span),
    Float(f64, Span),
    Str(String, Span),
    True(Span),
    False(Span),
    None(Span),
    VariableLookup(String, Span),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Unary { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Ternary { span, .. }
            | Expression::ListConstructor { span, .. }
            | Expression::SetConstructor { span, .. }
            | Expression::TupleConstructor { span, .. }
            | Expression::DictConstructor { span, .. }
            | Expression::ListComprehension { span, .. }
            | Expression::SetComprehension { span, .. }
            | Expression::DictComprehension { span, .. }
            | Expression::Lambda { span, .. }
            | Expression::Call { span, .. }
            | Expression::Index { span, .. }
            | Expression::Slice { span, .. }
            | Expression::AttributeLookup { span, .. }
            | Expression::Integer(_, span)
            | Expression::Float(_, span)
            | Expression::Str(_, span)
            | Expression::True(span)
            | Expression::False(span)
            | Expression::None(span)
            | Expression::VariableLookup(_, span) => *span,
        }
    }

    /// True for the expression shapes the parser accepts as an assignment
    /// target: variable lookup, attribute lookup, array index, and a
    /// non-empty tuple constructor whose every element is itself an lvalue.
    pub fn is_valid_lvalue(&self) -> bool {
        match self {
            Expression::VariableLookup(..) => true,
            Expression::AttributeLookup { .. } => true,
            Expression::Index { .. } => true,
            Expression::TupleConstructor { items, .. } => {
                !items.is_empty() && items.iter().all(Expression::is_valid_lvalue)
            }
            _ => false,
        }
    }
}
