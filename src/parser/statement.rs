//! The block-oriented statement parser (§4.4): groups indented suites and
//! binds trailing `elif`/`else`/`except`/`finally` clauses to the heading
//! statement they continue. Grounded on `original_source/parse.cc`'s
//! `parse_compound_statement_suite`/`parse_simple_statement` dispatch and its
//! `LocalParserState` clause-tracking struct, reworked here as a small local
//! value (`ClauseState`) scoped to one call of [`Parser::parse_suite`] rather
//! than a mutable field threaded everywhere.

use crate::{
    ast::{BinaryOperator, Expression, ImportName, Statement, WithItem},
    error::ParseErrorKind,
    token::TokenKind,
};

use super::Parser;

/// Per-indentation-level state: which clause-owning statement (if any) a
/// following `elif`/`else`/`except`/`finally` would bind to, and the stack
/// of `@decorator` expressions waiting for a `def`/`class`.
#[derive(Default)]
struct ClauseState {
    owner: Option<usize>,
    decorators: Vec<Expression>,
}

impl<'a> Parser<'a> {
    /// Appends parsed statements into `body` for tokens in `[start, end)`,
    /// returning the cursor position after the last statement consumed.
    /// One statement is parsed per iteration; compound statements consume
    /// their own trailing `Newline`/`Dedent`, everything else expects one
    /// immediately after (§4.4 contract).
    pub(super) fn parse_suite(&mut self, start: usize, end: usize, body: &mut Vec<Statement>) -> usize {
        let mut cursor = start;
        let mut state = ClauseState::default();

        while cursor < end && !self.has_error() {
            if matches!(self.kind(cursor), TokenKind::Newline) {
                cursor += 1;
                continue;
            }

            let head = self.kind(cursor).clone();

            if matches!(
                head,
                TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::Dedent
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::Eq
            ) {
                self.set_error(
                    ParseErrorKind::InvalidStartingTokenType,
                    cursor,
                    "this token cannot begin a statement",
                );
                return end;
            }

            let line_end = self
                .find_bracketed(cursor, end, &[TokenKind::Newline], false)
                .unwrap_or(end);

            let is_owner_head = matches!(
                head,
                TokenKind::If | TokenKind::For | TokenKind::While | TokenKind::Try
            );
            let is_continuation = matches!(
                head,
                TokenKind::Elif | TokenKind::Else | TokenKind::Except | TokenKind::Finally
            );
            let is_decorator = matches!(head, TokenKind::At);
            let is_def_or_class = matches!(head, TokenKind::Def | TokenKind::Class);

            cursor = match head {
                TokenKind::At => self.parse_decorator(cursor, line_end, end, &mut state),
                TokenKind::Def => {
                    let decorators = state.decorators.drain(..).collect();
                    let (stmt, next) = self.parse_function_definition(cursor, end, decorators);
                    body.push(stmt);
                    next
                }
                TokenKind::Class => {
                    let decorators = state.decorators.drain(..).collect();
                    let (stmt, next) = self.parse_class_definition(cursor, end, decorators);
                    body.push(stmt);
                    next
                }
                TokenKind::If => {
                    let (stmt, next) = self.parse_if(cursor, end);
                    body.push(stmt);
                    next
                }
                TokenKind::Elif => self.parse_elif(cursor, end, body, &mut state),
                TokenKind::Else => self.parse_else(cursor, end, body, &mut state),
                TokenKind::For => {
                    let (stmt, next) = self.parse_for(cursor, end);
                    body.push(stmt);
                    next
                }
                TokenKind::While => {
                    let (stmt, next) = self.parse_while(cursor, end);
                    body.push(stmt);
                    next
                }
                TokenKind::Try => {
                    let (stmt, next) = self.parse_try(cursor, end);
                    body.push(stmt);
                    next
                }
                TokenKind::Except => self.parse_except(cursor, end, body, &mut state),
                TokenKind::Finally => self.parse_finally(cursor, end, body, &mut state),
                TokenKind::With => {
                    let (stmt, next) = self.parse_with(cursor, end);
                    body.push(stmt);
                    next
                }
                _ => {
                    let stmt = self.parse_simple_statement(cursor, line_end);
                    body.push(stmt);
                    if line_end < end { line_end + 1 } else { end }
                }
            };

            if is_owner_head {
                state.owner = Some(body.len() - 1);
            } else if !is_continuation && !is_decorator {
                state.owner = None;
            }
            if !is_decorator && !is_def_or_class {
                state.decorators.clear();
            }
        }

        cursor
    }

    fn error_stmt(&self, offset: usize) -> Statement {
        Statement::Pass { span: self.span(offset) }
    }

    fn tail_span(&self, head: usize, line_end: usize) -> crate::token::Span {
        self.span(head).merge(&self.span(line_end.saturating_sub(1).max(head)))
    }

    /// `:` followed either by a `Newline`+`Indent`...`Dedent` block, or by a
    /// single same-line statement up to the next `Newline` (§4.4
    /// "suite-from-colon"). Returns the cursor just past the suite.
    fn parse_suite_from_colon(&mut self, colon: usize, end: usize, body: &mut Vec<Statement>) -> usize {
        if matches!(self.kind(colon + 1), TokenKind::Newline) && matches!(self.kind(colon + 2), TokenKind::Indent) {
            let indent_idx = colon + 2;
            let Some(dedent_idx) = self.find_bracketed(indent_idx + 1, end, &[TokenKind::Dedent], false) else {
                self.set_error(
                    ParseErrorKind::UnexpectedEndOfStream,
                    indent_idx,
                    "indented suite never dedents",
                );
                return end;
            };
            self.parse_suite(indent_idx + 1, dedent_idx, body);
            dedent_idx + 1
        } else {
            let stmt_end = self
                .find_bracketed(colon + 1, end, &[TokenKind::Newline], false)
                .unwrap_or(end);
            let stmt = self.parse_simple_statement(colon + 1, stmt_end);
            body.push(stmt);
            if stmt_end < end { stmt_end + 1 } else { end }
        }
    }

    fn parse_decorator(&mut self, cursor: usize, line_end: usize, end: usize, state: &mut ClauseState) -> usize {
        let expr = self.parse_expression(cursor + 1, line_end);
        state.decorators.push(expr);
        if line_end < end { line_end + 1 } else { end }
    }

    fn parse_if(&mut self, cursor: usize, end: usize) -> (Statement, usize) {
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`if` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let condition = self.parse_expression(cursor + 1, colon);
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.span(cursor).merge(&body.last().map(Statement::span).unwrap_or(condition.span()));
        (
            Statement::If {
                condition,
                body,
                elifs: Vec::new(),
                else_clause: None,
                span,
            },
            next,
        )
    }

    fn parse_elif(&mut self, cursor: usize, end: usize, body: &mut [Statement], state: &mut ClauseState) -> usize {
        let owner = state.owner.filter(|&i| matches!(body.get(i), Some(Statement::If { .. })));
        let Some(idx) = owner else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`elif` without a matching `if`");
            return end;
        };
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`elif` has no colon");
            return end;
        };
        let condition = self.parse_expression(cursor + 1, colon);
        let mut elif_body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut elif_body);
        let span = self.span(cursor).merge(&elif_body.last().map(Statement::span).unwrap_or(condition.span()));
        let elif_stmt = Statement::Elif { condition, body: elif_body, span };
        if let Some(Statement::If { elifs, .. }) = body.get_mut(idx) {
            elifs.push(elif_stmt);
        }
        next
    }

    fn parse_else(&mut self, cursor: usize, end: usize, body: &mut [Statement], state: &mut ClauseState) -> usize {
        let owner = state
            .owner
            .filter(|&i| body.get(i).map(Statement::is_clause_owner).unwrap_or(false));
        let Some(idx) = owner else {
            self.set_error(
                ParseErrorKind::SyntaxError,
                cursor,
                "`else` without a matching `if`/`for`/`while`/`try`",
            );
            return end;
        };
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`else` has no colon");
            return end;
        };
        let mut else_body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut else_body);
        let span = self.tail_span(cursor, next.min(end));
        let else_stmt = Statement::Else { body: else_body, span };
        match body.get_mut(idx) {
            Some(Statement::If { else_clause, .. })
            | Some(Statement::For { else_clause, .. })
            | Some(Statement::While { else_clause, .. })
            | Some(Statement::Try { else_clause, .. }) => {
                *else_clause = Some(Box::new(else_stmt));
            }
            _ => unreachable!("owner was filtered to a clause-owning statement"),
        }
        next
    }

    fn parse_for(&mut self, cursor: usize, end: usize) -> (Statement, usize) {
        let Some(in_idx) = self.find_bracketed(cursor + 1, end, &[TokenKind::In], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`for` has no `in`");
            return (self.error_stmt(cursor), end);
        };
        let target = self.parse_unpacking_format(cursor + 1, in_idx);
        let Some(colon) = self.find_bracketed(in_idx + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`for` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let iterable = self.parse_expression_list(in_idx + 1, colon);
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.span(cursor).merge(&body.last().map(Statement::span).unwrap_or(target.span()));
        (
            Statement::For { target, iterable, body, else_clause: None, span },
            next,
        )
    }

    fn parse_while(&mut self, cursor: usize, end: usize) -> (Statement, usize) {
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`while` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let condition = self.parse_expression(cursor + 1, colon);
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.span(cursor).merge(&body.last().map(Statement::span).unwrap_or(condition.span()));
        (
            Statement::While { condition, body, else_clause: None, span },
            next,
        )
    }

    fn parse_try(&mut self, cursor: usize, end: usize) -> (Statement, usize) {
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`try` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.tail_span(cursor, next.min(end));
        (
            Statement::Try {
                body,
                excepts: Vec::new(),
                else_clause: None,
                finally_clause: None,
                span,
            },
            next,
        )
    }

    fn parse_except(&mut self, cursor: usize, end: usize, body: &mut [Statement], state: &mut ClauseState) -> usize {
        let owner = state.owner.filter(|&i| matches!(body.get(i), Some(Statement::Try { .. })));
        let Some(idx) = owner else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`except` without a matching `try`");
            return end;
        };
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`except` has no colon");
            return end;
        };
        let header_start = cursor + 1;
        let (exception_type, name) = self.parse_except_header(header_start, colon);
        let mut except_body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut except_body);
        let span = self.tail_span(cursor, next.min(end));
        let except_stmt = Statement::Except {
            exception_type,
            name,
            body: except_body,
            span,
        };
        if let Some(Statement::Try { excepts, .. }) = body.get_mut(idx) {
            excepts.push(except_stmt);
        }
        next
    }

    // `except`, `except Type`, `except Type as name`, or the legacy
    // `except Type, name` form.
    fn parse_except_header(&mut self, start: usize, end: usize) -> (Option<Expression>, Option<String>) {
        if start >= end {
            return (None, None);
        }
        let bind_idx = self
            .find_bracketed(start, end, &[TokenKind::As], false)
            .or_else(|| self.find_bracketed(start, end, &[TokenKind::Comma], false));
        match bind_idx {
            Some(bind_idx) => {
                let exception_type = if bind_idx > start {
                    Some(self.parse_expression(start, bind_idx))
                } else {
                    None
                };
                let name = match self.kind(bind_idx + 1).clone() {
                    TokenKind::Dynamic(n) if bind_idx + 1 < end => Some(n),
                    _ => {
                        self.set_error(ParseErrorKind::SyntaxError, bind_idx + 1, "expected a name after `as`");
                        None
                    }
                };
                (exception_type, name)
            }
            None => (Some(self.parse_expression(start, end)), None),
        }
    }

    fn parse_finally(&mut self, cursor: usize, end: usize, body: &mut [Statement], state: &mut ClauseState) -> usize {
        let owner = state.owner.filter(|&i| matches!(body.get(i), Some(Statement::Try { .. })));
        let Some(idx) = owner else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`finally` without a matching `try`");
            return end;
        };
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`finally` has no colon");
            return end;
        };
        let mut finally_body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut finally_body);
        let span = self.tail_span(cursor, next.min(end));
        let finally_stmt = Statement::Finally { body: finally_body, span };
        if let Some(Statement::Try { finally_clause, .. }) = body.get_mut(idx) {
            *finally_clause = Some(Box::new(finally_stmt));
        }
        next
    }

    fn parse_with(&mut self, cursor: usize, end: usize) -> (Statement, usize) {
        let Some(colon) = self.find_bracketed(cursor + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, cursor, "`with` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let items = self.parse_with_items(cursor + 1, colon);
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.tail_span(cursor, next.min(end));
        (Statement::With { items, body, span }, next)
    }

    fn parse_with_items(&mut self, start: usize, end: usize) -> Vec<WithItem> {
        self.split_on_commas(start, end)
            .into_iter()
            .map(|(s, e)| match self.find_bracketed(s, e, &[TokenKind::As], false) {
                Some(as_idx) => {
                    let context = self.parse_expression(s, as_idx);
                    let alias = match self.kind(as_idx + 1).clone() {
                        TokenKind::Dynamic(n) => Some(n),
                        _ => {
                            self.set_error(ParseErrorKind::SyntaxError, as_idx + 1, "expected a name after `as`");
                            None
                        }
                    };
                    WithItem { context, alias }
                }
                None => WithItem { context: self.parse_expression(s, e), alias: None },
            })
            .collect()
    }

    fn parse_function_definition(&mut self, cursor: usize, end: usize, decorators: Vec<Expression>) -> (Statement, usize) {
        let name_idx = cursor + 1;
        let name = match self.kind(name_idx).clone() {
            TokenKind::Dynamic(n) => n,
            _ => {
                self.set_error(ParseErrorKind::SyntaxError, name_idx, "expected a function name after `def`");
                return (self.error_stmt(cursor), end);
            }
        };
        let lparen = name_idx + 1;
        if !matches!(self.kind(lparen), TokenKind::LParen) {
            self.set_error(ParseErrorKind::SyntaxError, lparen, "expected `(` after a function name");
            return (self.error_stmt(cursor), end);
        }
        let Some(rparen) = self.find_bracketed(lparen + 1, end, &[TokenKind::RParen], false) else {
            self.set_error(
                ParseErrorKind::BracketingError,
                lparen,
                "function parameter list has no closing parenthesis",
            );
            return (self.error_stmt(cursor), end);
        };
        let params = self.parse_param_list(lparen + 1, rparen);
        let Some(colon) = self.find_bracketed(rparen + 1, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, rparen, "`def` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.tail_span(cursor, next.min(end));
        (
            Statement::FunctionDefinition { name, params, decorators, body, span },
            next,
        )
    }

    fn parse_class_definition(&mut self, cursor: usize, end: usize, decorators: Vec<Expression>) -> (Statement, usize) {
        let name_idx = cursor + 1;
        let name = match self.kind(name_idx).clone() {
            TokenKind::Dynamic(n) => n,
            _ => {
                self.set_error(ParseErrorKind::SyntaxError, name_idx, "expected a class name after `class`");
                return (self.error_stmt(cursor), end);
            }
        };
        let mut after_name = name_idx + 1;
        let bases = if matches!(self.kind(after_name), TokenKind::LParen) {
            let Some(rparen) = self.find_bracketed(after_name + 1, end, &[TokenKind::RParen], false) else {
                self.set_error(
                    ParseErrorKind::BracketingError,
                    after_name,
                    "class base-class list has no closing parenthesis",
                );
                return (self.error_stmt(cursor), end);
            };
            let bases = self.parse_expression_list(after_name + 1, rparen);
            after_name = rparen + 1;
            bases
        } else {
            Vec::new()
        };
        let Some(colon) = self.find_bracketed(after_name, end, &[TokenKind::Colon], false) else {
            self.set_error(ParseErrorKind::SyntaxError, after_name, "`class` has no colon");
            return (self.error_stmt(cursor), end);
        };
        let mut body = Vec::new();
        let next = self.parse_suite_from_colon(colon, end, &mut body);
        let span = self.tail_span(cursor, next.min(end));
        (
            Statement::ClassDefinition { name, bases, decorators, body, span },
            next,
        )
    }

    fn parse_simple_statement(&mut self, start: usize, line_end: usize) -> Statement {
        if self.has_error() {
            return self.error_stmt(start.min(line_end));
        }
        match self.kind(start).clone() {
            TokenKind::Print => self.parse_print(start, line_end),
            TokenKind::Del => self.parse_delete(start, line_end),
            TokenKind::Pass => Statement::Pass { span: self.span(start) },
            TokenKind::Break => Statement::Break { span: self.span(start) },
            TokenKind::Continue => Statement::Continue { span: self.span(start) },
            TokenKind::Return => self.parse_return(start, line_end),
            TokenKind::Raise => self.parse_raise_or_exec(start, line_end, true),
            TokenKind::Exec => self.parse_raise_or_exec(start, line_end, false),
            TokenKind::Assert => self.parse_assert(start, line_end),
            TokenKind::Yield => self.parse_yield(start, line_end),
            TokenKind::Global => self.parse_global(start, line_end),
            TokenKind::Import => self.parse_import(start, line_end),
            TokenKind::From => self.parse_from_import(start, line_end),
            _ => self.parse_expression_first(start, line_end),
        }
    }

    // `print [>> stream ,] [values...] [,]` — the trailing comma (if any)
    // suppresses the statement's newline and is consumed here, once, rather
    // than being left for a caller to re-expect (SPEC_FULL.md §9).
    fn parse_print(&mut self, start: usize, line_end: usize) -> Statement {
        let mut cursor = start + 1;
        let mut stream = None;
        if matches!(self.kind(cursor), TokenKind::RShift) {
            let Some(comma) = self.find_bracketed(cursor + 1, line_end, &[TokenKind::Comma], false) else {
                self.set_error(ParseErrorKind::SyntaxError, cursor, "`print >>` stream has no comma");
                return self.error_stmt(start);
            };
            stream = Some(self.parse_expression(cursor + 1, comma));
            cursor = comma + 1;
        }
        let suppress_newline = line_end > cursor && matches!(self.kind(line_end - 1), TokenKind::Comma);
        let values_end = if suppress_newline { line_end - 1 } else { line_end };
        let values = if cursor >= values_end { Vec::new() } else { self.parse_expression_list(cursor, values_end) };
        Statement::Print {
            stream,
            values,
            suppress_newline,
            span: self.tail_span(start, line_end),
        }
    }

    fn parse_delete(&mut self, start: usize, line_end: usize) -> Statement {
        let targets = self.parse_expression_list(start + 1, line_end);
        Statement::Delete { targets, span: self.tail_span(start, line_end) }
    }

    fn parse_return(&mut self, start: usize, line_end: usize) -> Statement {
        let value = (start + 1 < line_end).then(|| self.parse_expression_list_as_expression(start + 1, line_end));
        Statement::Return { value, span: self.tail_span(start, line_end) }
    }

    fn parse_yield(&mut self, start: usize, line_end: usize) -> Statement {
        let value = (start + 1 < line_end).then(|| self.parse_expression_list_as_expression(start + 1, line_end));
        Statement::Yield { value, span: self.tail_span(start, line_end) }
    }

    // `raise`/`exec` both take up to three comma-separated expressions.
    fn parse_raise_or_exec(&mut self, start: usize, line_end: usize, is_raise: bool) -> Statement {
        let parts = self.split_on_commas(start + 1, line_end);
        if parts.len() > 3 {
            self.set_error(ParseErrorKind::TooManyArguments, start, "at most three arguments are allowed");
            return self.error_stmt(start);
        }
        let values = parts.iter().map(|&(s, e)| self.parse_expression(s, e)).collect();
        let span = self.tail_span(start, line_end);
        if is_raise {
            Statement::Raise { values, span }
        } else {
            Statement::Exec { values, span }
        }
    }

    fn parse_assert(&mut self, start: usize, line_end: usize) -> Statement {
        let parts = self.split_on_commas(start + 1, line_end);
        if parts.len() > 2 {
            self.set_error(ParseErrorKind::TooManyArguments, start, "at most two arguments are allowed");
            return self.error_stmt(start);
        }
        let values = parts.iter().map(|&(s, e)| self.parse_expression(s, e)).collect();
        Statement::Assert { values, span: self.tail_span(start, line_end) }
    }

    fn parse_global(&mut self, start: usize, line_end: usize) -> Statement {
        let mut names = Vec::new();
        for (s, e) in self.split_on_commas(start + 1, line_end) {
            match (e.saturating_sub(s), self.kind(s).clone()) {
                (1, TokenKind::Dynamic(name)) => names.push(name),
                _ => {
                    self.set_error(ParseErrorKind::InvalidDynamicList, s, "`global` expects a list of names");
                    break;
                }
            }
        }
        Statement::Global { names, span: self.tail_span(start, line_end) }
    }

    fn parse_import(&mut self, start: usize, line_end: usize) -> Statement {
        let names = self.parse_import_names(start + 1, line_end);
        Statement::Import { names, span: self.tail_span(start, line_end) }
    }

    fn parse_from_import(&mut self, start: usize, line_end: usize) -> Statement {
        let Some(import_idx) = self.find_bracketed(start + 1, line_end, &[TokenKind::Import], false) else {
            self.set_error(ParseErrorKind::UnbalancedImportStatement, start, "`from` has no `import`");
            return self.error_stmt(start);
        };
        let module = self.parse_dotted_path(start + 1, import_idx);
        let names = self.parse_import_names(import_idx + 1, line_end);
        Statement::FromImport { module, names, span: self.tail_span(start, line_end) }
    }

    fn parse_import_names(&mut self, start: usize, end: usize) -> Vec<ImportName> {
        self.split_on_commas(start, end)
            .into_iter()
            .map(|(s, e)| self.parse_import_name(s, e))
            .collect()
    }

    fn parse_import_name(&mut self, start: usize, end: usize) -> ImportName {
        match self.find_bracketed(start, end, &[TokenKind::As], false) {
            Some(as_idx) => {
                let path = self.parse_dotted_path(start, as_idx);
                let alias = match self.kind(as_idx + 1).clone() {
                    TokenKind::Dynamic(n) => Some(n),
                    _ => {
                        self.set_error(ParseErrorKind::SyntaxError, as_idx + 1, "expected a name after `as`");
                        None
                    }
                };
                ImportName { path, alias }
            }
            None => ImportName { path: self.parse_dotted_path(start, end), alias: None },
        }
    }

    fn parse_dotted_path(&mut self, start: usize, end: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = start;
        while cursor < end {
            match self.kind(cursor).clone() {
                TokenKind::Dynamic(name) => path.push(name),
                _ => {
                    self.set_error(ParseErrorKind::InvalidDynamicList, cursor, "expected an identifier in a dotted path");
                    break;
                }
            }
            cursor += 1;
            if cursor >= end {
                break;
            }
            if matches!(self.kind(cursor), TokenKind::Dot) {
                cursor += 1;
            } else {
                self.set_error(ParseErrorKind::SyntaxError, cursor, "expected `.` in a dotted path");
                break;
            }
        }
        path
    }

    fn augmented_op(kind: &TokenKind) -> Option<BinaryOperator> {
        Some(match kind {
            TokenKind::PlusEq => BinaryOperator::Add,
            TokenKind::MinusEq => BinaryOperator::Sub,
            TokenKind::StarEq => BinaryOperator::Mul,
            TokenKind::SlashEq => BinaryOperator::Div,
            TokenKind::PercentEq => BinaryOperator::Mod,
            TokenKind::AmpEq => BinaryOperator::BitAnd,
            TokenKind::PipeEq => BinaryOperator::BitOr,
            TokenKind::CaretEq => BinaryOperator::BitXor,
            TokenKind::LShiftEq => BinaryOperator::LShift,
            TokenKind::RShiftEq => BinaryOperator::RShift,
            TokenKind::DoubleStarEq => BinaryOperator::Pow,
            TokenKind::DoubleSlashEq => BinaryOperator::FloorDiv,
            _ => return None,
        })
    }

    // No leading keyword matched: an expression, an assignment (`=`,
    // possibly chained), or an augmented assignment — selected by whichever
    // of those two operator families has the lowest-indexed top-level
    // occurrence (§4.4).
    fn parse_expression_first(&mut self, start: usize, line_end: usize) -> Statement {
        let augmented_kinds = [
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::PercentEq,
            TokenKind::AmpEq,
            TokenKind::PipeEq,
            TokenKind::CaretEq,
            TokenKind::LShiftEq,
            TokenKind::RShiftEq,
            TokenKind::DoubleStarEq,
            TokenKind::DoubleSlashEq,
        ];
        let eq_idx = self.find_bracketed(start, line_end, &[TokenKind::Eq], false);
        let aug_idx = self.find_bracketed(start, line_end, &augmented_kinds, false);

        let use_plain_eq = match (eq_idx, aug_idx) {
            (Some(e), Some(a)) => e < a,
            (Some(_), None) => true,
            (None, _) => false,
        };

        match (eq_idx, aug_idx) {
            (None, None) => {
                let value = self.parse_expression_list_as_expression(start, line_end);
                let span = value.span();
                Statement::Expression { value, span }
            }
            (_, Some(idx)) if !use_plain_eq => {
                let target = self.parse_expression(start, idx);
                if !target.is_valid_lvalue() {
                    self.set_error(
                        ParseErrorKind::InvalidAssignment,
                        start,
                        "augmented assignment target is not a valid lvalue",
                    );
                    return self.error_stmt(start);
                }
                let op = Self::augmented_op(self.kind(idx)).expect("idx matched one of augmented_kinds");
                let value = self.parse_expression_list_as_expression(idx + 1, line_end);
                let span = target.span().merge(&value.span());
                Statement::AugmentedAssignment { target, op, value, span }
            }
            _ => self.parse_assignment(start, line_end),
        }
    }

    // `a = b = c`: every `=`-delimited segment but the last is a target;
    // a bare comma list on either side collapses to a tuple (`a, b = c, d`).
    fn parse_assignment(&mut self, start: usize, line_end: usize) -> Statement {
        let mut targets = Vec::new();
        let mut cursor = start;
        loop {
            let Some(eq_idx) = self.find_bracketed(cursor, line_end, &[TokenKind::Eq], false) else {
                self.set_error(ParseErrorKind::SyntaxError, cursor, "assignment is missing `=`");
                return self.error_stmt(start);
            };
            let target = self.parse_expression_list_as_expression(cursor, eq_idx);
            if !target.is_valid_lvalue() {
                self.set_error(ParseErrorKind::InvalidAssignment, cursor, "assignment target is not a valid lvalue");
                return self.error_stmt(start);
            }
            targets.push(target);
            cursor = eq_idx + 1;
            if self.find_bracketed(cursor, line_end, &[TokenKind::Eq], false).is_none() {
                break;
            }
        }
        let value = self.parse_expression_list_as_expression(cursor, line_end);
        let span = targets[0].span().merge(&value.span());
        Statement::Assignment { targets, value, span }
    }
}
