//! The precedence-climbing expression parser (§4.3): one function per
//! precedence level, lowest first, each trying to split the range on its
//! own operator before falling through to the next level. Grounded
//! directly on `original_source/parse.cc`'s `parse_expression` — the
//! level order, the rightmost-match convention (`find_last = true` almost
//! everywhere), and the `+`/`-` binary-vs-unary disambiguation are all
//! carried over verbatim from that function rather than reconstructed from
//! the distilled precedence table, since the table alone under-specifies a
//! few edge cases (see the ternary and parenthesized-tuple notes below).

use crate::{
    ast::{Argument, BinaryOperator, Expression, Param, ParamMode, UnpackingFormat, UnaryOperator},
    error::ParseErrorKind,
    token::TokenKind,
};

use super::Parser;

impl<'a> Parser<'a> {
    /// `parse_expression(range) → Expression` (§4.3 contract): consumes all
    /// tokens in `[start, end)`. Every recursive call below re-enters here
    /// rather than calling the next precedence level directly, mirroring
    /// the teacher algorithm: each level is only valid to skip if the
    /// *whole* original range lacked that operator at top level, and
    /// re-running the full chain on a sub-range is how that gets checked.
    pub(super) fn parse_expression(&mut self, start: usize, end: usize) -> Expression {
        if self.has_error() {
            return self.error_expr(start.min(end));
        }
        if start >= end {
            self.set_error(
                ParseErrorKind::IncompleteExpressionParsing,
                start,
                "expected an expression but found none",
            );
            return self.error_expr(start);
        }
        self.parse_lambda(start, end)
    }

    fn error_expr(&self, offset: usize) -> Expression {
        Expression::None(self.span(offset))
    }

    fn make_binary(&mut self, op: BinaryOperator, start: usize, oper_idx: usize, end: usize) -> Expression {
        let left = self.parse_expression(start, oper_idx);
        let right = self.parse_expression(oper_idx + 1, end);
        let span = left.span().merge(&right.span());
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    fn make_unary(&mut self, op: UnaryOperator, start: usize, end: usize) -> Expression {
        let operand = self.parse_expression(start + 1, end);
        let span = self.span(start).merge(&operand.span());
        Expression::Unary {
            op,
            operand: Box::new(operand),
            span,
        }
    }

    // 1. lambda ARGS : EXPR (prefix, body extends to end of range)
    fn parse_lambda(&mut self, start: usize, end: usize) -> Expression {
        if !matches!(self.kind(start), TokenKind::Lambda) {
            return self.parse_ternary(start, end);
        }
        match self.find_bracketed(start + 1, end, &[TokenKind::Colon], false) {
            Some(colon) if colon < end => {
                let params = self.parse_param_list(start + 1, colon);
                let body = self.parse_expression(colon + 1, end);
                let span = self.span(start).merge(&body.span());
                Expression::Lambda {
                    params,
                    body: Box::new(body),
                    span,
                }
            }
            _ => {
                self.set_error(
                    ParseErrorKind::IncompleteLambdaDefinition,
                    start,
                    "lambda has no colon",
                );
                self.error_expr(start)
            }
        }
    }

    // 2. A if B else C (right-associative; the FIRST top-level `if`, then
    // the first top-level `else` after it, so a chain like
    // `a if b else c if d else e` re-parses its tail `c if d else e` as the
    // nested `if_false` rather than grouping `a if b else c` first).
    fn parse_ternary(&mut self, start: usize, end: usize) -> Expression {
        if let Some(if_idx) = self.find_bracketed(start, end, &[TokenKind::If], false) {
            if if_idx > start {
                let else_idx = self.find_bracketed(if_idx + 1, end, &[TokenKind::Else], false);
                return match else_idx {
                    Some(else_idx) if else_idx > if_idx && else_idx < end => {
                        let if_true = self.parse_expression(start, if_idx);
                        let condition = self.parse_expression(if_idx + 1, else_idx);
                        let if_false = self.parse_expression(else_idx + 1, end);
                        let span = if_true.span().merge(&if_false.span());
                        Expression::Ternary {
                            condition: Box::new(condition),
                            if_true: Box::new(if_true),
                            if_false: Box::new(if_false),
                            span,
                        }
                    }
                    _ => {
                        self.set_error(
                            ParseErrorKind::IncompleteTernaryOperator,
                            if_idx,
                            "ternary `if` has no matching `else`",
                        );
                        self.error_expr(if_idx)
                    }
                };
            }
        }
        self.parse_or(start, end)
    }

    // 3. or
    fn parse_or(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::Or], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::Or, start, idx, end);
            }
        }
        self.parse_and(start, end)
    }

    // 4. and
    fn parse_and(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::And], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::And, start, idx, end);
            }
        }
        self.parse_not(start, end)
    }

    // 5. not (prefix)
    fn parse_not(&mut self, start: usize, end: usize) -> Expression {
        if matches!(self.kind(start), TokenKind::Not) {
            return self.make_unary(UnaryOperator::Not, start, end);
        }
        self.parse_comparison(start, end)
    }

    // 6. comparison chain
    fn parse_comparison(&mut self, start: usize, end: usize) -> Expression {
        let kinds = [
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::In,
            TokenKind::NotIn,
            TokenKind::Is,
            TokenKind::IsNot,
        ];
        if let Some(idx) = self.find_bracketed(start, end, &kinds, true) {
            if idx > start {
                let op = match self.kind(idx) {
                    TokenKind::Lt => BinaryOperator::Lt,
                    TokenKind::LtEq => BinaryOperator::LtEq,
                    TokenKind::Gt => BinaryOperator::Gt,
                    TokenKind::GtEq => BinaryOperator::GtEq,
                    TokenKind::EqEq => BinaryOperator::Eq,
                    TokenKind::NotEq => BinaryOperator::NotEq,
                    TokenKind::In => BinaryOperator::In,
                    TokenKind::NotIn => BinaryOperator::NotIn,
                    TokenKind::Is => BinaryOperator::Is,
                    TokenKind::IsNot => BinaryOperator::IsNot,
                    _ => unreachable!("find_bracketed only returns indices matching `kinds`"),
                };
                return self.make_binary(op, start, idx, end);
            }
        }
        self.parse_bitor(start, end)
    }

    // 7. |
    fn parse_bitor(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::Pipe], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::BitOr, start, idx, end);
            }
        }
        self.parse_bitxor(start, end)
    }

    // 8. ^
    fn parse_bitxor(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::Caret], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::BitXor, start, idx, end);
            }
        }
        self.parse_bitand(start, end)
    }

    // 9. &
    fn parse_bitand(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::Amp], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::BitAnd, start, idx, end);
            }
        }
        self.parse_shift(start, end)
    }

    // 10. <<, >>
    fn parse_shift(&mut self, start: usize, end: usize) -> Expression {
        let kinds = [TokenKind::LShift, TokenKind::RShift];
        if let Some(idx) = self.find_bracketed(start, end, &kinds, true) {
            if idx > start {
                let op = if matches!(self.kind(idx), TokenKind::LShift) {
                    BinaryOperator::LShift
                } else {
                    BinaryOperator::RShift
                };
                return self.make_binary(op, start, idx, end);
            }
        }
        self.parse_additive(start, end)
    }

    // 11. +, - (binary only when the preceding token isn't itself an
    // operator — otherwise it's a unary sign handled at level 13).
    fn parse_additive(&mut self, start: usize, end: usize) -> Expression {
        let kinds = [TokenKind::Plus, TokenKind::Minus];
        if let Some(idx) = self.find_bracketed(start, end, &kinds, true) {
            if idx > start && !Self::is_operator_token(self.kind(idx - 1)) {
                let op = if matches!(self.kind(idx), TokenKind::Plus) {
                    BinaryOperator::Add
                } else {
                    BinaryOperator::Sub
                };
                return self.make_binary(op, start, idx, end);
            }
        }
        self.parse_multiplicative(start, end)
    }

    // 12. *, /, //, %
    fn parse_multiplicative(&mut self, start: usize, end: usize) -> Expression {
        let kinds = [
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::DoubleSlash,
            TokenKind::Percent,
        ];
        if let Some(idx) = self.find_bracketed(start, end, &kinds, true) {
            if idx > start {
                let op = match self.kind(idx) {
                    TokenKind::Star => BinaryOperator::Mul,
                    TokenKind::Slash => BinaryOperator::Div,
                    TokenKind::DoubleSlash => BinaryOperator::FloorDiv,
                    TokenKind::Percent => BinaryOperator::Mod,
                    _ => unreachable!("find_bracketed only returns indices matching `kinds`"),
                };
                return self.make_binary(op, start, idx, end);
            }
        }
        self.parse_unary(start, end)
    }

    // 13. +x, -x, ~x (prefix)
    fn parse_unary(&mut self, start: usize, end: usize) -> Expression {
        match self.kind(start) {
            TokenKind::Plus => self.make_unary(UnaryOperator::Plus, start, end),
            TokenKind::Minus => self.make_unary(UnaryOperator::Minus, start, end),
            TokenKind::Tilde => self.make_unary(UnaryOperator::Invert, start, end),
            _ => self.parse_power(start, end),
        }
    }

    // 14. ** (binds less tightly than unary on its right: `2 ** -1` parses
    // as `2 ** (-1)` because level 13 runs before this one ever recurses
    // into the right-hand side).
    fn parse_power(&mut self, start: usize, end: usize) -> Expression {
        if let Some(idx) = self.find_bracketed(start, end, &[TokenKind::DoubleStar], true) {
            if idx > start {
                return self.make_binary(BinaryOperator::Pow, start, idx, end);
            }
        }
        self.parse_postfix(start, end)
    }

    // 15. x[y] / x[y:z], x(...), x.name — chosen by the last top-level
    // occurrence of `[`, `(`, or `.` in the range, whichever is rightmost.
    fn parse_postfix(&mut self, start: usize, end: usize) -> Expression {
        let bracket_idx = self.find_bracketed(start, end, &[TokenKind::LBracket], true);
        let paren_idx = self.find_bracketed(start, end, &[TokenKind::LParen], true);
        let dot_idx = self.find_bracketed(start, end, &[TokenKind::Dot], true);

        let effective = [bracket_idx, paren_idx, dot_idx].into_iter().flatten().max();

        if let Some(effective) = effective {
            if effective > start {
                if Some(effective) == bracket_idx {
                    return self.parse_index_or_slice(start, effective, end);
                }
                if Some(effective) == paren_idx {
                    return self.parse_call(start, effective, end);
                }
                if Some(effective) == dot_idx {
                    return self.parse_attribute(start, effective, end);
                }
            }
        }
        self.parse_primary(start, end)
    }

    fn parse_index_or_slice(&mut self, start: usize, bracket_idx: usize, end: usize) -> Expression {
        let array = self.parse_expression(start, bracket_idx);
        let bracket_end = self.find_bracketed(bracket_idx + 1, end, &[TokenKind::RBracket], false);
        let Some(bracket_end) = bracket_end.filter(|&b| b > bracket_idx && b < end) else {
            self.set_error(ParseErrorKind::BracketingError, bracket_idx, "index has no closing bracket");
            return self.error_expr(bracket_idx);
        };

        let colon_idx = self
            .find_bracketed(bracket_idx + 1, bracket_end, &[TokenKind::Colon], false)
            .filter(|&c| c > bracket_idx && c < bracket_end);

        let span = array.span().merge(&self.span(bracket_end));
        match colon_idx {
            Some(colon_idx) => {
                let slice_start = if colon_idx > bracket_idx + 1 {
                    Some(Box::new(self.parse_expression(bracket_idx + 1, colon_idx)))
                } else {
                    None
                };
                let slice_stop = if colon_idx < bracket_end - 1 {
                    Some(Box::new(self.parse_expression(colon_idx + 1, bracket_end)))
                } else {
                    None
                };
                Expression::Slice {
                    target: Box::new(array),
                    start: slice_start,
                    stop: slice_stop,
                    span,
                }
            }
            None => {
                let index = self.parse_expression(bracket_idx + 1, bracket_end);
                Expression::Index {
                    target: Box::new(array),
                    index: Box::new(index),
                    span,
                }
            }
        }
    }

    fn parse_call(&mut self, start: usize, paren_idx: usize, end: usize) -> Expression {
        let callee = self.parse_expression(start, paren_idx);
        let paren_end = self
            .find_bracketed(paren_idx + 1, end, &[TokenKind::RParen], false)
            .filter(|&p| p > paren_idx && p < end);
        let Some(paren_end) = paren_end else {
            self.set_error(ParseErrorKind::BracketingError, paren_idx, "call has no closing parenthesis");
            return self.error_expr(paren_idx);
        };
        let args = self.parse_call_arguments(paren_idx + 1, paren_end);
        let span = callee.span().merge(&self.span(paren_end));
        Expression::Call {
            callee: Box::new(callee),
            args,
            span,
        }
    }

    // Narrowed to a plain identifier, the only legal right-hand form (see
    // SPEC_FULL.md §9, resolving the original's "arbitrary expression" laxity).
    fn parse_attribute(&mut self, start: usize, dot_idx: usize, end: usize) -> Expression {
        let target = self.parse_expression(start, dot_idx);
        if dot_idx + 2 == end {
            if let TokenKind::Dynamic(name) = self.kind(dot_idx + 1).clone() {
                let span = target.span().merge(&self.span(dot_idx + 1));
                return Expression::AttributeLookup {
                    target: Box::new(target),
                    attribute: name,
                    span,
                };
            }
        }
        self.set_error(
            ParseErrorKind::SyntaxError,
            dot_idx + 1,
            "attribute lookup must be followed by a single identifier",
        );
        self.error_expr(dot_idx)
    }

    // 16. primary: parenthesized/list/set/dict constructs, comprehensions,
    // literals, identifiers.
    fn parse_primary(&mut self, start: usize, end: usize) -> Expression {
        let bracket_idx = self.find_bracketed(start, end, &[TokenKind::LBracket], true);
        let brace_idx = self.find_bracketed(start, end, &[TokenKind::LBrace], true);
        let paren_idx = self.find_bracketed(start, end, &[TokenKind::LParen], true);

        if bracket_idx == Some(start) {
            return self.parse_list(start, end);
        }
        if brace_idx == Some(start) {
            return self.parse_brace(start, end);
        }
        if paren_idx == Some(start) {
            return self.parse_paren(start, end);
        }

        if end == start + 1 {
            match self.kind(start).clone() {
                TokenKind::Integer(v) => return Expression::Integer(v, self.span(start)),
                TokenKind::Float(v) => return Expression::Float(v, self.span(start)),
                TokenKind::StringConstant(s) => return Expression::Str(s, self.span(start)),
                TokenKind::Dynamic(name) => {
                    let span = self.span(start);
                    return match name.as_str() {
                        "True" => Expression::True(span),
                        "False" => Expression::False(span),
                        "None" => Expression::None(span),
                        _ => Expression::VariableLookup(name, span),
                    };
                }
                _ => {}
            }
        }

        self.set_error(
            ParseErrorKind::IncompleteExpressionParsing,
            start,
            "no expression parsing rules matched",
        );
        self.error_expr(start)
    }

    // [expr, ...] / [pattern for vars in source if pred]. An empty `[]`
    // is the empty list; a top-level `for` (first occurrence) makes it a
    // comprehension instead of a constructor.
    fn parse_list(&mut self, start: usize, end: usize) -> Expression {
        if !matches!(self.kind(end - 1), TokenKind::RBracket) {
            self.set_error(
                ParseErrorKind::IncompleteParsing,
                end.saturating_sub(1),
                "list is missing its closing bracket",
            );
            return self.error_expr(start);
        }
        let span = self.span(start).merge(&self.span(end - 1));
        let inner_start = start + 1;
        let inner_end = end - 1;

        if inner_start == inner_end {
            return Expression::ListConstructor { items: Vec::new(), span };
        }

        if let Some(for_idx) = self.find_bracketed(inner_start, inner_end, &[TokenKind::For], false) {
            let item_pattern = self.parse_expression(inner_start, for_idx);
            let Some(in_idx) = self.find_bracketed(for_idx + 1, inner_end, &[TokenKind::In], false) else {
                self.set_error(
                    ParseErrorKind::IncompleteGeneratorExpression,
                    for_idx,
                    "comprehension `for` has no `in`",
                );
                return self.error_expr(start);
            };
            let variables = self.parse_unpacking_format(for_idx + 1, in_idx);
            let if_idx = self.find_bracketed(in_idx + 1, inner_end, &[TokenKind::If], false);
            let source_end = if_idx.unwrap_or(inner_end);
            let source_data = self.parse_expression(in_idx + 1, source_end);
            let predicate = if_idx.map(|idx| Box::new(self.parse_expression(idx + 1, inner_end)));
            return Expression::ListComprehension {
                item_pattern: Box::new(item_pattern),
                variables,
                source_data: Box::new(source_data),
                predicate,
                span,
            };
        }

        let items = self.parse_expression_list(inner_start, inner_end);
        Expression::ListConstructor { items, span }
    }

    // {key: value, ...} / {expr, ...} / comprehension forms. Dict vs. set
    // is decided by a top-level colon; the `for`/`in` search here uses the
    // *last* occurrence (unlike the list form's first), carried over as-is
    // from the teacher algorithm.
    fn parse_brace(&mut self, start: usize, end: usize) -> Expression {
        if !matches!(self.kind(end - 1), TokenKind::RBrace) {
            self.set_error(
                ParseErrorKind::IncompleteParsing,
                end.saturating_sub(1),
                "brace construct is missing its closing brace",
            );
            return self.error_expr(start);
        }
        let span = self.span(start).merge(&self.span(end - 1));
        let inner_start = start + 1;
        let inner_end = end - 1;

        if inner_start == inner_end {
            return Expression::DictConstructor { items: Vec::new(), span };
        }

        let colon_idx = self.find_bracketed(inner_start, inner_end, &[TokenKind::Colon], false);
        let is_dict = colon_idx.is_some();

        if let Some(for_idx) = self.find_bracketed(inner_start, inner_end, &[TokenKind::For], true) {
            let Some(in_idx) = self.find_bracketed(for_idx + 1, inner_end, &[TokenKind::In], true) else {
                self.set_error(
                    ParseErrorKind::IncompleteGeneratorExpression,
                    for_idx,
                    "comprehension `for` has no `in`",
                );
                return self.error_expr(start);
            };

            let key_pattern = colon_idx.map(|colon_idx| self.parse_expression(inner_start, colon_idx));
            let item_start = colon_idx.map(|c| c + 1).unwrap_or(inner_start);
            let item_pattern = self.parse_expression(item_start, for_idx);
            let variables = self.parse_unpacking_format(for_idx + 1, in_idx);
            let if_idx = self.find_bracketed(in_idx + 1, inner_end, &[TokenKind::If], false);
            let source_end = if_idx.unwrap_or(inner_end);
            let source_data = self.parse_expression(in_idx + 1, source_end);
            let predicate = if_idx.map(|idx| Box::new(self.parse_expression(idx + 1, inner_end)));

            return if is_dict {
                Expression::DictComprehension {
                    key_pattern: Box::new(key_pattern.expect("is_dict implies colon_idx is Some")),
                    value_pattern: Box::new(item_pattern),
                    variables,
                    source_data: Box::new(source_data),
                    predicate,
                    span,
                }
            } else {
                Expression::SetComprehension {
                    item_pattern: Box::new(item_pattern),
                    variables,
                    source_data: Box::new(source_data),
                    predicate,
                    span,
                }
            };
        }

        if is_dict {
            let items = self.parse_dict_item_list(inner_start, inner_end);
            Expression::DictConstructor { items, span }
        } else {
            let items = self.parse_expression_list(inner_start, inner_end);
            Expression::SetConstructor { items, span }
        }
    }

    // (expr, ...): every parenthesized group becomes a tuple constructor in
    // this grammar, even a single bare `(x)` with no comma — the teacher
    // never special-cases "just grouping", and since parsing is
    // unconditional here too, the round-trip property (§8) still holds:
    // the printer always emits parens as a tuple, so there's no form that
    // means "grouping, not a tuple" to round-trip against.
    fn parse_paren(&mut self, start: usize, end: usize) -> Expression {
        if !matches!(self.kind(end - 1), TokenKind::RParen) {
            self.set_error(
                ParseErrorKind::IncompleteParsing,
                end.saturating_sub(1),
                "parenthesized expression is missing its closing parenthesis",
            );
            return self.error_expr(start);
        }
        let span = self.span(start).merge(&self.span(end - 1));
        let items = self.parse_expression_list(start + 1, end - 1);
        Expression::TupleConstructor { items, span }
    }

    fn parse_dict_item_list(&mut self, start: usize, end: usize) -> Vec<(Expression, Expression)> {
        let mut items = Vec::new();
        let mut cursor = start;
        while cursor < end && !self.has_error() {
            let comma = self.find_bracketed(cursor, end, &[TokenKind::Comma], false).unwrap_or(end);
            let colon = self
                .find_bracketed(cursor, comma, &[TokenKind::Colon], false)
                .filter(|&c| c > cursor && c < comma);
            match colon {
                Some(colon) => {
                    let key = self.parse_expression(cursor, colon);
                    let value = self.parse_expression(colon + 1, comma);
                    items.push((key, value));
                }
                None => {
                    self.set_error(
                        ParseErrorKind::IncompleteDictItem,
                        cursor,
                        "dict item does not contain a colon",
                    );
                    return items;
                }
            }
            cursor = if comma < end { comma + 1 } else { end };
        }
        items
    }

    /// Parameter *definitions* for `def`/`lambda`: plain names, `name=value`
    /// defaults, `*args`, `**kwargs`.
    pub(super) fn parse_param_list(&mut self, start: usize, end: usize) -> Vec<Param> {
        let mut params = Vec::new();
        let mut cursor = start;
        while cursor < end && !self.has_error() {
            let comma = self.find_bracketed(cursor, end, &[TokenKind::Comma], false).unwrap_or(end);

            let star_mode = match self.kind(cursor) {
                TokenKind::Star => Some(ParamMode::ArgList),
                TokenKind::DoubleStar => Some(ParamMode::KeywordArgList),
                _ => None,
            };

            if let Some(mode) = star_mode {
                let name_idx = cursor + 1;
                let span_head = self.span(cursor);
                if !matches!(self.kind(name_idx), TokenKind::Dynamic(_)) {
                    self.set_error(
                        ParseErrorKind::SyntaxError,
                        name_idx,
                        "expected a parameter name after `*`/`**`",
                    );
                    return params;
                }
                let name = match self.kind(name_idx).clone() {
                    TokenKind::Dynamic(n) => n,
                    _ => unreachable!(),
                };
                let span = span_head.merge(&self.span(name_idx));
                params.push(Param { name, mode, span });
            } else {
                if !matches!(self.kind(cursor), TokenKind::Dynamic(_)) {
                    self.set_error(ParseErrorKind::SyntaxError, cursor, "expected a parameter name");
                    return params;
                }
                let name = match self.kind(cursor).clone() {
                    TokenKind::Dynamic(n) => n,
                    _ => unreachable!(),
                };
                let mut span = self.span(cursor);
                let after_name = cursor + 1;
                let mode = if after_name < comma && matches!(self.kind(after_name), TokenKind::Eq) {
                    let value = self.parse_expression(after_name + 1, comma);
                    span = span.merge(&value.span());
                    ParamMode::DefaultWithValue(value)
                } else {
                    ParamMode::Default
                };
                params.push(Param { name, mode, span });
            }

            cursor = if comma < end { comma + 1 } else { end };
        }
        params
    }

    /// Call-site *arguments*: positional, `*expr`, `**expr`, `name=expr`.
    pub(super) fn parse_call_arguments(&mut self, start: usize, end: usize) -> Vec<Argument> {
        let mut args = Vec::new();
        let mut cursor = start;
        while cursor < end && !self.has_error() {
            let comma = self.find_bracketed(cursor, end, &[TokenKind::Comma], false).unwrap_or(end);

            let mut star = false;
            let mut double_star = false;
            match self.kind(cursor) {
                TokenKind::Star => {
                    star = true;
                    cursor += 1;
                }
                TokenKind::DoubleStar => {
                    double_star = true;
                    cursor += 1;
                }
                _ => {}
            }

            let eq_idx = self
                .find_bracketed(cursor, comma, &[TokenKind::Eq], false)
                .filter(|&e| e > cursor && e < comma);

            if let Some(eq_idx) = eq_idx {
                if star || double_star || eq_idx != cursor + 1 {
                    self.set_error(
                        ParseErrorKind::SyntaxError,
                        eq_idx,
                        "`=` must immediately follow a single parameter name",
                    );
                    return args;
                }
                let name = match self.kind(cursor).clone() {
                    TokenKind::Dynamic(n) => n,
                    _ => {
                        self.set_error(ParseErrorKind::SyntaxError, cursor, "expected a parameter name before `=`");
                        return args;
                    }
                };
                let value = self.parse_expression(eq_idx + 1, comma);
                args.push(Argument::Keyword { name, value });
            } else {
                let value = self.parse_expression(cursor, comma);
                if star {
                    args.push(Argument::Star(value));
                } else if double_star {
                    args.push(Argument::DoubleStar(value));
                } else {
                    args.push(Argument::Positional(value));
                }
            }

            cursor = if comma < end { comma + 1 } else { end };
        }
        args
    }

    /// A single identifier, or a parenthesized recursive pattern of them,
    /// separated by top-level commas (§3.3 `UnpackingFormat`).
    pub(super) fn parse_unpacking_format(&mut self, start: usize, end: usize) -> UnpackingFormat {
        let comma = self.find_bracketed(start, end, &[TokenKind::Comma], false);

        if comma.is_none() {
            if end == start + 1 {
                if let TokenKind::Dynamic(name) = self.kind(start).clone() {
                    return UnpackingFormat::Variable { name, span: self.span(start) };
                }
            }
            self.set_error(
                ParseErrorKind::SyntaxError,
                start,
                "unpacking format has a non-identifier or too many tokens",
            );
            return UnpackingFormat::Variable {
                name: String::new(),
                span: self.span(start),
            };
        }

        let mut elements = Vec::new();
        let mut cursor = start;
        while cursor < end && !self.has_error() {
            let comma = self.find_bracketed(cursor, end, &[TokenKind::Comma], false).unwrap_or(end);

            if matches!(self.kind(cursor), TokenKind::LParen) {
                if comma == 0 || !matches!(self.kind(comma - 1), TokenKind::RParen) {
                    self.set_error(
                        ParseErrorKind::BracketingError,
                        cursor,
                        "nested unpacking tuple does not cover its whole segment",
                    );
                    break;
                }
                let nested = self.parse_unpacking_format(cursor + 1, comma - 1);
                elements.push(nested);
            } else if comma == cursor + 1 {
                match self.kind(cursor).clone() {
                    TokenKind::Dynamic(name) => {
                        elements.push(UnpackingFormat::Variable { name, span: self.span(cursor) });
                    }
                    _ => {
                        self.set_error(
                            ParseErrorKind::SyntaxError,
                            cursor,
                            "expected an identifier in unpacking format",
                        );
                        break;
                    }
                }
            } else {
                self.set_error(
                    ParseErrorKind::SyntaxError,
                    cursor,
                    "expected a single identifier before the comma",
                );
                break;
            }

            cursor = if comma < end { comma + 1 } else { end };
        }

        let span = self.span(start).merge(&self.span(end.saturating_sub(1).max(start)));
        UnpackingFormat::Tuple { elements, span }
    }

    fn is_operator_token(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::In
                | TokenKind::NotIn
                | TokenKind::Not
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Star
                | TokenKind::DoubleStar
                | TokenKind::LShift
                | TokenKind::RShift
                | TokenKind::Dot
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::EqEq
                | TokenKind::GtEq
                | TokenKind::LtEq
                | TokenKind::NotEq
                | TokenKind::Is
                | TokenKind::IsNot
                | TokenKind::Pipe
                | TokenKind::Caret
                | TokenKind::Amp
                | TokenKind::Percent
                | TokenKind::DoubleSlash
                | TokenKind::Tilde
        )
    }
}
