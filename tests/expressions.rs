//! Black-box tests driving the expression parser through the public
//! `lex`/`parse` pipeline (§8 boundary cases and concrete scenarios).

use pesca_front::ast::{BinaryOperator, Expression, Statement, UnpackingFormat};
use pesca_front::{lex, parse};

fn module_body(source: &str) -> Vec<Statement> {
    let ast = parse(&lex(source));
    assert!(ast.is_ok(), "failed to parse {source:?}: {:?} ({})", ast.error, ast.failure_explanation);
    match ast.root {
        Statement::Module { body, .. } => body,
        _ => panic!("root is always a Module statement"),
    }
}

fn single_expr_value(source: &str) -> Expression {
    match &module_body(source)[0] {
        Statement::Assignment { value, .. } => value.clone(),
        Statement::Expression { value, .. } => value.clone(),
        other => panic!("expected an expression-bearing statement, got {other:?}"),
    }
}

#[test]
fn precedence_of_addition_and_multiplication() {
    // Scenario 1: `x = 1 + 2 * 3` => Binary(+, 1, Binary(*, 2, 3))
    let value = single_expr_value("x = 1 + 2 * 3\n");
    match value {
        Expression::Binary { op: BinaryOperator::Add, left, right, .. } => {
            assert!(matches!(*left, Expression::Integer(1, _)));
            match *right {
                Expression::Binary { op: BinaryOperator::Mul, left, right, .. } => {
                    assert!(matches!(*left, Expression::Integer(2, _)));
                    assert!(matches!(*right, Expression::Integer(3, _)));
                }
                other => panic!("expected a multiplication on the right, got {other:?}"),
            }
        }
        other => panic!("expected a top-level addition, got {other:?}"),
    }
}

#[test]
fn ternary_is_right_associative() {
    // `a if b else c if d else e` should read as `a if b else (c if d else e)`.
    let value = single_expr_value("x = a if b else c if d else e\n");
    match value {
        Expression::Ternary { condition, if_true, if_false, .. } => {
            assert!(matches!(*condition, Expression::VariableLookup(ref n, _) if n == "b"));
            assert!(matches!(*if_true, Expression::VariableLookup(ref n, _) if n == "a"));
            match *if_false {
                Expression::Ternary { condition, if_true, if_false, .. } => {
                    assert!(matches!(*condition, Expression::VariableLookup(ref n, _) if n == "d"));
                    assert!(matches!(*if_true, Expression::VariableLookup(ref n, _) if n == "c"));
                    assert!(matches!(*if_false, Expression::VariableLookup(ref n, _) if n == "e"));
                }
                other => panic!("expected a nested ternary, got {other:?}"),
            }
        }
        other => panic!("expected a ternary, got {other:?}"),
    }
}

#[test]
fn not_in_fuses_to_a_single_operator() {
    // Only a contiguous `not`/`in` pair fuses (§3.2); `not a in b` instead
    // parses as a unary `not` wrapping a comparison (see the test below).
    let value = single_expr_value("x = a not in b\n");
    assert!(matches!(value, Expression::Binary { op: BinaryOperator::NotIn, .. }));
}

#[test]
fn not_applied_to_a_comparison_is_not_fused() {
    let value = single_expr_value("x = not a in b\n");
    assert!(matches!(value, Expression::Unary { .. }));
}

#[test]
fn is_not_fuses_to_a_single_operator() {
    let value = single_expr_value("x = a is not b\n");
    assert!(matches!(value, Expression::Binary { op: BinaryOperator::IsNot, .. }));
}

#[test]
fn lambda_as_right_operand_of_power() {
    // `2 ** lambda: 1` binds the whole lambda as the power's right operand.
    let value = single_expr_value("x = 2 ** (lambda: 1)\n");
    match value {
        Expression::Binary { op: BinaryOperator::Pow, left, right, .. } => {
            assert!(matches!(*left, Expression::Integer(2, _)));
            match *right {
                Expression::TupleConstructor { ref items, .. } if items.len() == 1 => {
                    assert!(matches!(items[0], Expression::Lambda { .. }));
                }
                other => panic!("expected the lambda wrapped in the parenthesized tuple, got {other:?}"),
            }
        }
        other => panic!("expected exponentiation, got {other:?}"),
    }
}

#[test]
fn unary_minus_binds_tighter_than_power_on_the_right() {
    // `2 ** -1` parses as `2 ** (-1)`, not `(2 ** -)1`.
    let value = single_expr_value("x = 2 ** -1\n");
    match value {
        Expression::Binary { op: BinaryOperator::Pow, left, right, .. } => {
            assert!(matches!(*left, Expression::Integer(2, _)));
            assert!(matches!(*right, Expression::Unary { op: pesca_front::ast::UnaryOperator::Minus, .. }));
        }
        other => panic!("expected exponentiation, got {other:?}"),
    }
}

#[test]
fn list_comprehension_shape() {
    // Scenario 4: `[x*x for x in range(10) if x%2]`.
    let value = single_expr_value("y = [x*x for x in range(10) if x%2]\n");
    match value {
        Expression::ListComprehension { item_pattern, variables, source_data, predicate, .. } => {
            assert!(matches!(*item_pattern, Expression::Binary { op: BinaryOperator::Mul, .. }));
            assert!(matches!(variables, UnpackingFormat::Variable { ref name, .. } if name == "x"));
            assert!(matches!(*source_data, Expression::Call { .. }));
            let predicate = predicate.expect("predicate present");
            assert!(matches!(*predicate, Expression::Binary { op: BinaryOperator::Mod, .. }));
        }
        other => panic!("expected a list comprehension, got {other:?}"),
    }
}

#[test]
fn dict_comprehension_shape() {
    let value = single_expr_value("y = {k: v for k, v in m}\n");
    match value {
        Expression::DictComprehension { key_pattern, value_pattern, variables, .. } => {
            assert!(matches!(*key_pattern, Expression::VariableLookup(ref n, _) if n == "k"));
            assert!(matches!(*value_pattern, Expression::VariableLookup(ref n, _) if n == "v"));
            assert!(matches!(variables, UnpackingFormat::Tuple { ref elements, .. } if elements.len() == 2));
        }
        other => panic!("expected a dict comprehension, got {other:?}"),
    }
}

#[test]
fn set_literal_vs_dict_literal_disambiguated_by_colon() {
    assert!(matches!(single_expr_value("y = {1, 2, 3}\n"), Expression::SetConstructor { .. }));
    assert!(matches!(single_expr_value("y = {1: 2, 3: 4}\n"), Expression::DictConstructor { .. }));
    assert!(matches!(single_expr_value("y = {}\n"), Expression::DictConstructor { .. }));
}

#[test]
fn slice_forms() {
    assert!(matches!(
        single_expr_value("y = a[:]\n"),
        Expression::Slice { start: None, stop: None, .. }
    ));
    assert!(matches!(
        single_expr_value("y = a[x:]\n"),
        Expression::Slice { start: Some(_), stop: None, .. }
    ));
    assert!(matches!(
        single_expr_value("y = a[:y]\n"),
        Expression::Slice { start: None, stop: Some(_), .. }
    ));
    assert!(matches!(
        single_expr_value("y = a[x:y]\n"),
        Expression::Slice { start: Some(_), stop: Some(_), .. }
    ));
}

#[test]
fn plain_index_has_no_colon() {
    assert!(matches!(single_expr_value("y = a[0]\n"), Expression::Index { .. }));
}

#[test]
fn call_with_star_and_double_star_arguments() {
    let value = single_expr_value("y = f(1, *args, **kwargs)\n");
    match value {
        Expression::Call { args, .. } => {
            assert_eq!(args.len(), 3);
            assert!(matches!(args[0], pesca_front::ast::Argument::Positional(_)));
            assert!(matches!(args[1], pesca_front::ast::Argument::Star(_)));
            assert!(matches!(args[2], pesca_front::ast::Argument::DoubleStar(_)));
        }
        other => panic!("expected a call, got {other:?}"),
    }
}

#[test]
fn keyword_argument_requires_single_identifier_before_eq() {
    let value = single_expr_value("y = f(a=1, b=2)\n");
    match value {
        Expression::Call { args, .. } => {
            assert!(matches!(
                args[0],
                pesca_front::ast::Argument::Keyword { ref name, .. } if name == "a"
            ));
        }
        other => panic!("expected a call, got {other:?}"),
    }
}

#[test]
fn attribute_lookup_is_a_plain_identifier() {
    let value = single_expr_value("y = a.b.c\n");
    match value {
        Expression::AttributeLookup { target, attribute, .. } => {
            assert_eq!(attribute, "c");
            assert!(matches!(*target, Expression::AttributeLookup { ref attribute, .. } if attribute == "b"));
        }
        other => panic!("expected nested attribute lookups, got {other:?}"),
    }
}

#[test]
fn nested_tuple_unpacking_in_assignment() {
    let body = module_body("(x, y), z = (1, 2), 3\n");
    match &body[0] {
        Statement::Assignment { targets, .. } => {
            assert!(targets[0].is_valid_lvalue());
        }
        other => panic!("expected an assignment, got {other:?}"),
    }
}
