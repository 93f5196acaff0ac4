//! A minimal AST pretty-printer (§6.4): renders an [`Ast`] back to source
//! text well enough to support the round-trip testable property
//! (`parse(lex(pretty_print(ast))) == ast` for comment-free ASTs with
//! quote/backslash-free string literals). A single recursive function over
//! the closed `Expression`/`Statement` sum-types — visitor-as-pattern-match,
//! not double-dispatch — with no line-wrapping, no comment preservation, and
//! no style configuration. Not a general-purpose formatter.

use crate::ast::{
    Argument, Ast, BinaryOperator, Expression, ImportName, Param, ParamMode, Statement,
    UnaryOperator, UnpackingFormat, WithItem,
};

const INDENT: &str = "    ";

/// Renders `ast.root` (a `Statement::Module`) back to source text.
pub fn pretty_print(ast: &Ast) -> String {
    let mut out = String::new();
    if let Statement::Module { body, .. } = &ast.root {
        print_suite(body, 0, &mut out);
    }
    out
}

fn print_suite(body: &[Statement], indent: usize, out: &mut String) {
    if body.is_empty() {
        out.push_str(&INDENT.repeat(indent));
        out.push_str("pass\n");
        return;
    }
    for stmt in body {
        print_statement(stmt, indent, out);
    }
}

fn line(indent: usize, text: &str, out: &mut String) {
    out.push_str(&INDENT.repeat(indent));
    out.push_str(text);
    out.push('\n');
}

fn print_statement(stmt: &Statement, indent: usize, out: &mut String) {
    match stmt {
        Statement::Expression { value, .. } => line(indent, &print_expression(value), out),
        Statement::Assignment { targets, value, .. } => {
            let targets = targets.iter().map(print_expression).collect::<Vec<_>>().join(" = ");
            line(indent, &format!("{targets} = {}", print_expression(value)), out);
        }
        Statement::AugmentedAssignment { target, op, value, .. } => line(
            indent,
            &format!("{} {}= {}", print_expression(target), augmented_op_str(*op), print_expression(value)),
            out,
        ),
        Statement::Print { stream, values, suppress_newline, .. } => {
            let mut text = String::from("print");
            if let Some(stream) = stream {
                text.push_str(&format!(" >> {},", print_expression(stream)));
            }
            let rendered = values.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            if !rendered.is_empty() {
                text.push(' ');
                text.push_str(&rendered);
            }
            if *suppress_newline {
                text.push(',');
            }
            line(indent, &text, out);
        }
        Statement::Delete { targets, .. } => {
            let targets = targets.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            line(indent, &format!("del {targets}"), out);
        }
        Statement::Pass { .. } => line(indent, "pass", out),
        Statement::Import { names, .. } => {
            let names = names.iter().map(print_import_name).collect::<Vec<_>>().join(", ");
            line(indent, &format!("import {names}"), out);
        }
        Statement::FromImport { module, names, .. } => {
            let names = names.iter().map(print_import_name).collect::<Vec<_>>().join(", ");
            line(indent, &format!("from {} import {names}", module.join(".")), out);
        }
        Statement::Global { names, .. } => line(indent, &format!("global {}", names.join(", ")), out),
        Statement::Exec { values, .. } => {
            let values = values.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            line(indent, &format!("exec {values}"), out);
        }
        Statement::Assert { values, .. } => {
            let values = values.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            line(indent, &format!("assert {values}"), out);
        }
        Statement::Break { .. } => line(indent, "break", out),
        Statement::Continue { .. } => line(indent, "continue", out),
        Statement::Return { value, .. } => match value {
            Some(value) => line(indent, &format!("return {}", print_expression(value)), out),
            None => line(indent, "return", out),
        },
        Statement::Raise { values, .. } => {
            let values = values.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            line(indent, &format!("raise {values}").trim_end(), out);
        }
        Statement::Yield { value, .. } => match value {
            Some(value) => line(indent, &format!("yield {}", print_expression(value)), out),
            None => line(indent, "yield", out),
        },
        Statement::Module { body, .. } => print_suite(body, indent, out),
        Statement::If { condition, body, elifs, else_clause, .. } => {
            line(indent, &format!("if {}:", print_expression(condition)), out);
            print_suite(body, indent + 1, out);
            for elif in elifs {
                print_statement(elif, indent, out);
            }
            if let Some(else_clause) = else_clause {
                print_statement(else_clause, indent, out);
            }
        }
        Statement::Elif { condition, body, .. } => {
            line(indent, &format!("elif {}:", print_expression(condition)), out);
            print_suite(body, indent + 1, out);
        }
        Statement::Else { body, .. } => {
            line(indent, "else:", out);
            print_suite(body, indent + 1, out);
        }
        Statement::For { target, iterable, body, else_clause, .. } => {
            let iterable = iterable.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            line(indent, &format!("for {} in {iterable}:", print_unpacking(target)), out);
            print_suite(body, indent + 1, out);
            if let Some(else_clause) = else_clause {
                print_statement(else_clause, indent, out);
            }
        }
        Statement::While { condition, body, else_clause, .. } => {
            line(indent, &format!("while {}:", print_expression(condition)), out);
            print_suite(body, indent + 1, out);
            if let Some(else_clause) = else_clause {
                print_statement(else_clause, indent, out);
            }
        }
        Statement::Try { body, excepts, else_clause, finally_clause, .. } => {
            line(indent, "try:", out);
            print_suite(body, indent + 1, out);
            for except in excepts {
                print_statement(except, indent, out);
            }
            if let Some(else_clause) = else_clause {
                print_statement(else_clause, indent, out);
            }
            if let Some(finally_clause) = finally_clause {
                print_statement(finally_clause, indent, out);
            }
        }
        Statement::Except { exception_type, name, body, .. } => {
            let mut header = String::from("except");
            if let Some(exception_type) = exception_type {
                header.push(' ');
                header.push_str(&print_expression(exception_type));
            }
            if let Some(name) = name {
                header.push_str(&format!(" as {name}"));
            }
            header.push(':');
            line(indent, &header, out);
            print_suite(body, indent + 1, out);
        }
        Statement::Finally { body, .. } => {
            line(indent, "finally:", out);
            print_suite(body, indent + 1, out);
        }
        Statement::With { items, body, .. } => {
            let items = items.iter().map(print_with_item).collect::<Vec<_>>().join(", ");
            line(indent, &format!("with {items}:"), out);
            print_suite(body, indent + 1, out);
        }
        Statement::FunctionDefinition { name, params, decorators, body, .. } => {
            for decorator in decorators {
                line(indent, &format!("@{}", print_expression(decorator)), out);
            }
            let params = params.iter().map(print_param).collect::<Vec<_>>().join(", ");
            line(indent, &format!("def {name}({params}):"), out);
            print_suite(body, indent + 1, out);
        }
        Statement::ClassDefinition { name, bases, decorators, body, .. } => {
            for decorator in decorators {
                line(indent, &format!("@{}", print_expression(decorator)), out);
            }
            let mut header = format!("class {name}");
            if !bases.is_empty() {
                let bases = bases.iter().map(print_expression).collect::<Vec<_>>().join(", ");
                header.push_str(&format!("({bases})"));
            }
            header.push(':');
            line(indent, &header, out);
            print_suite(body, indent + 1, out);
        }
    }
}

fn print_import_name(name: &ImportName) -> String {
    match &name.alias {
        Some(alias) => format!("{} as {alias}", name.path.join(".")),
        None => name.path.join("."),
    }
}

fn print_with_item(item: &WithItem) -> String {
    match &item.alias {
        Some(alias) => format!("{} as {alias}", print_expression(&item.context)),
        None => print_expression(&item.context),
    }
}

fn print_param(param: &Param) -> String {
    match &param.mode {
        ParamMode::Default => param.name.clone(),
        ParamMode::DefaultWithValue(value) => format!("{}={}", param.name, print_expression(value)),
        ParamMode::ArgList => format!("*{}", param.name),
        ParamMode::KeywordArgList => format!("**{}", param.name),
    }
}

fn print_argument(arg: &Argument) -> String {
    match arg {
        Argument::Positional(value) => print_expression(value),
        Argument::Star(value) => format!("*{}", print_expression(value)),
        Argument::DoubleStar(value) => format!("**{}", print_expression(value)),
        Argument::Keyword { name, value } => format!("{name}={}", print_expression(value)),
    }
}

fn print_unpacking(target: &UnpackingFormat) -> String {
    match target {
        UnpackingFormat::Variable { name, .. } => name.clone(),
        UnpackingFormat::Tuple { elements, .. } => {
            let inner = elements.iter().map(print_unpacking).collect::<Vec<_>>().join(", ");
            format!("({inner})")
        }
    }
}

fn unary_op_str(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Not => "not ",
        UnaryOperator::Plus => "+",
        UnaryOperator::Minus => "-",
        UnaryOperator::Invert => "~",
    }
}

fn binary_op_str(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Or => "or",
        BinaryOperator::And => "and",
        BinaryOperator::Lt => "<",
        BinaryOperator::LtEq => "<=",
        BinaryOperator::Gt => ">",
        BinaryOperator::GtEq => ">=",
        BinaryOperator::Eq => "==",
        BinaryOperator::NotEq => "!=",
        BinaryOperator::In => "in",
        BinaryOperator::NotIn => "not in",
        BinaryOperator::Is => "is",
        BinaryOperator::IsNot => "is not",
        BinaryOperator::BitOr => "|",
        BinaryOperator::BitXor => "^",
        BinaryOperator::BitAnd => "&",
        BinaryOperator::LShift => "<<",
        BinaryOperator::RShift => ">>",
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "/",
        BinaryOperator::FloorDiv => "//",
        BinaryOperator::Mod => "%",
        BinaryOperator::Pow => "**",
    }
}

fn augmented_op_str(op: BinaryOperator) -> &'static str {
    binary_op_str(op)
}

fn print_expression(expr: &Expression) -> String {
    match expr {
        // No enclosing parens here: in this grammar any "(...)" is itself a
        // tuple constructor (see parser::expression::parse_paren), so
        // wrapping a bare binary/unary/ternary for "clarity" would reparse
        // as a 1-tuple around it instead of the expression itself. Bare
        // printing round-trips correctly because an AST produced by this
        // parser is already precedence-consistent with its own un-
        // parenthesized text.
        Expression::Unary { op, operand, .. } => format!("{}{}", unary_op_str(*op), print_expression(operand)),
        Expression::Binary { op, left, right, .. } => {
            format!("{} {} {}", print_expression(left), binary_op_str(*op), print_expression(right))
        }
        Expression::Ternary { condition, if_true, if_false, .. } => format!(
            "{} if {} else {}",
            print_expression(if_true),
            print_expression(condition),
            print_expression(if_false)
        ),
        Expression::ListConstructor { items, .. } => {
            format!("[{}]", items.iter().map(print_expression).collect::<Vec<_>>().join(", "))
        }
        Expression::SetConstructor { items, .. } => {
            format!("{{{}}}", items.iter().map(print_expression).collect::<Vec<_>>().join(", "))
        }
        Expression::TupleConstructor { items, .. } => {
            let inner = items.iter().map(print_expression).collect::<Vec<_>>().join(", ");
            if items.len() == 1 {
                format!("({inner},)")
            } else {
                format!("({inner})")
            }
        }
        Expression::DictConstructor { items, .. } => {
            let inner = items
                .iter()
                .map(|(k, v)| format!("{}: {}", print_expression(k), print_expression(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{inner}}}")
        }
        Expression::ListComprehension { item_pattern, variables, source_data, predicate, .. } => format!(
            "[{} for {} in {}{}]",
            print_expression(item_pattern),
            print_unpacking(variables),
            print_expression(source_data),
            print_predicate(predicate)
        ),
        Expression::SetComprehension { item_pattern, variables, source_data, predicate, .. } => format!(
            "{{{} for {} in {}{}}}",
            print_expression(item_pattern),
            print_unpacking(variables),
            print_expression(source_data),
            print_predicate(predicate)
        ),
        Expression::DictComprehension { key_pattern, value_pattern, variables, source_data, predicate, .. } => format!(
            "{{{}: {} for {} in {}{}}}",
            print_expression(key_pattern),
            print_expression(value_pattern),
            print_unpacking(variables),
            print_expression(source_data),
            print_predicate(predicate)
        ),
        Expression::Lambda { params, body, .. } => {
            let params = params.iter().map(print_param).collect::<Vec<_>>().join(", ");
            format!("lambda {params}: {}", print_expression(body))
        }
        Expression::Call { callee, args, .. } => {
            format!("{}({})", print_expression(callee), args.iter().map(print_argument).collect::<Vec<_>>().join(", "))
        }
        Expression::Index { target, index, .. } => format!("{}[{}]", print_expression(target), print_expression(index)),
        Expression::Slice { target, start, stop, .. } => format!(
            "{}[{}:{}]",
            print_expression(target),
            start.as_deref().map(print_expression).unwrap_or_default(),
            stop.as_deref().map(print_expression).unwrap_or_default()
        ),
        Expression::AttributeLookup { target, attribute, .. } => format!("{}.{attribute}", print_expression(target)),
        Expression::Integer(value, _) => value.to_string(),
        Expression::Float(value, _) => value.to_string(),
        Expression::Str(value, _) => format!("\"{value}\""),
        Expression::True(_) => "True".to_string(),
        Expression::False(_) => "False".to_string(),
        Expression::None(_) => "None".to_string(),
        Expression::VariableLookup(name, _) => name.clone(),
    }
}

fn print_predicate(predicate: &Option<Box<Expression>>) -> String {
    match predicate {
        Some(predicate) => format!(" if {}", print_expression(predicate)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::lex, parser::parse};

    fn round_trip(source: &str) {
        let ast = parse(&lex(source));
        assert!(ast.is_ok(), "failed to parse {source:?}: {:?}", ast.error);
        let printed = pretty_print(&ast);
        let reparsed = parse(&lex(&printed));
        assert!(reparsed.is_ok(), "failed to reparse printed output {printed:?}: {:?}", reparsed.error);
        assert_eq!(ast.root, reparsed.root, "round trip mismatch for {source:?}: printed as {printed:?}");
    }

    #[test]
    fn round_trips_a_simple_assignment() {
        round_trip("x = 1 + 2\n");
    }

    #[test]
    fn round_trips_a_function_definition() {
        round_trip("def add(a, b=1):\n    return a + b\n");
    }

    #[test]
    fn round_trips_an_if_elif_else_chain() {
        round_trip("if x:\n    y = 1\nelif z:\n    y = 2\nelse:\n    y = 3\n");
    }

    #[test]
    fn round_trips_a_list_comprehension() {
        round_trip("result = [x for x in items if x]\n");
    }
}
