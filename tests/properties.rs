//! Integration-level tests for the quantified invariants and boundary
//! cases in §8: balanced indent/dedent, non-negative bracket depth, lvalue
//! validation, cursor-reaches-end on success, and the documented error
//! scenarios.

use pesca_front::ast::Statement;
use pesca_front::error::{LexErrorKind, ParseErrorKind};
use pesca_front::token::TokenKind;
use pesca_front::{lex, parse};

fn indent_dedent_balanced(source: &str) {
    let stream = lex(source);
    assert!(stream.is_ok(), "unexpected lex error for {source:?}: {:?}", stream.error);
    let indents = stream.tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
    let dedents = stream.tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
    assert_eq!(indents, dedents, "unbalanced indent/dedent for {source:?}");
}

#[test]
fn indent_and_dedent_counts_balance_across_nested_suites() {
    indent_dedent_balanced("");
    indent_dedent_balanced("x = 1\n");
    indent_dedent_balanced("if a:\n    if b:\n        c\n    d\ne\n");
    indent_dedent_balanced(
        "def f():\n    if a:\n        return 1\n    else:\n        return 2\n    return 3\n",
    );
}

#[test]
fn empty_input_lexes_and_parses_to_an_empty_module() {
    let stream = lex("");
    assert!(stream.is_ok());
    let ast = parse(&stream);
    assert!(ast.is_ok());
    match ast.root {
        Statement::Module { body, .. } => assert!(body.is_empty()),
        _ => panic!("root is always a Module statement"),
    }
}

#[test]
fn whitespace_only_input_parses_to_an_empty_module() {
    let ast = parse(&lex("   \n\t\n   \n".replace('\t', "    ").as_str()));
    assert!(ast.is_ok());
}

#[test]
fn only_a_comment_parses_to_an_empty_module() {
    let ast = parse(&lex("# just a comment\n"));
    assert!(ast.is_ok());
    match ast.root {
        Statement::Module { body, .. } => assert!(body.is_empty()),
        _ => unreachable!(),
    }
}

#[test]
fn mixed_indentation_depths_across_sibling_blocks() {
    let ast = parse(&lex("if a:\n    x = 1\nif b:\n      y = 2\n"));
    assert!(ast.is_ok(), "{:?}", ast.error);
    match ast.root {
        Statement::Module { body, .. } => assert_eq!(body.len(), 2),
        _ => unreachable!(),
    }
}

#[test]
fn successful_parse_always_reaches_the_end_of_the_token_stream() {
    for source in [
        "x = 1\n",
        "def f(a, b):\n    return a + b\n",
        "if a:\n    b\nelif c:\n    d\nelse:\n    e\n",
        "for x in range(10):\n    print x\n",
    ] {
        let stream = lex(source);
        let ast = parse(&stream);
        assert!(ast.is_ok(), "expected {source:?} to parse cleanly: {:?}", ast.error);
    }
}

#[test]
fn every_assignment_target_is_a_valid_lvalue() {
    let ast = parse(&lex("(x, y), z = (1, 2), 3\n"));
    assert!(ast.is_ok());
    match ast.root {
        Statement::Module { body, .. } => match &body[0] {
            Statement::Assignment { targets, .. } => {
                for target in targets {
                    assert!(target.is_valid_lvalue());
                }
            }
            other => panic!("expected an assignment, got {other:?}"),
        },
        _ => unreachable!(),
    }
}

#[test]
fn assigning_to_a_non_lvalue_is_a_sticky_error() {
    let ast = parse(&lex("1 + 1 = 2\n"));
    assert_eq!(ast.error, ParseErrorKind::InvalidAssignment);
}

#[test]
fn trailing_binary_operator_with_nothing_after_it_fails_to_parse() {
    // Scenario 6: `1 +` alone.
    let ast = parse(&lex("1 +\n"));
    assert!(matches!(
        ast.error,
        ParseErrorKind::IncompleteExpressionParsing | ParseErrorKind::IncompleteParsing
    ));
}

#[test]
fn misaligned_unindent_is_reported_as_a_lex_error() {
    let stream = lex("if a:\n    b\n   c\n");
    assert_eq!(stream.error, LexErrorKind::MisalignedUnindent);
}

#[test]
fn unmatched_closing_bracket_is_a_lex_error() {
    let stream = lex("x = [1, 2}\n");
    assert_eq!(stream.error, LexErrorKind::UnmatchedBrace);
}

#[test]
fn a_lex_error_prevents_parsing_from_ever_starting() {
    let stream = lex("x = (1\n");
    assert!(!stream.is_ok());
    let ast = parse(&stream);
    assert!(!ast.is_ok());
}

#[test]
fn assignment_target_is_validated_before_the_value_is_ever_parsed() {
    // The right-hand side is a perfectly valid expression; only the left
    // side (a literal, not an lvalue) is the problem.
    let ast = parse(&lex("1 = [1, 2]\n"));
    assert_eq!(ast.error, ParseErrorKind::InvalidAssignment);
}

#[test]
fn too_many_raise_arguments_is_rejected() {
    let ast = parse(&lex("raise a, b, c, d\n"));
    assert_eq!(ast.error, ParseErrorKind::TooManyArguments);
}

#[test]
fn too_many_assert_arguments_is_rejected() {
    let ast = parse(&lex("assert a, b, c\n"));
    assert_eq!(ast.error, ParseErrorKind::TooManyArguments);
}

#[test]
fn elif_without_a_preceding_if_is_a_syntax_error() {
    let ast = parse(&lex("x = 1\nelif a:\n    b\n"));
    assert_eq!(ast.error, ParseErrorKind::SyntaxError);
}

#[test]
fn else_without_a_clause_owner_is_a_syntax_error() {
    let ast = parse(&lex("x = 1\nelse:\n    b\n"));
    assert_eq!(ast.error, ParseErrorKind::SyntaxError);
}
