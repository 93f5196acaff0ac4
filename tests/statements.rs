//! Black-box tests driving the statement parser's suite handling and
//! trailing-clause binding (§8 concrete end-to-end scenarios).

use pesca_front::ast::{Expression, ParamMode, Statement};
use pesca_front::{lex, parse};

fn module_body(source: &str) -> Vec<Statement> {
    let ast = parse(&lex(source));
    assert!(ast.is_ok(), "failed to parse {source:?}: {:?} ({})", ast.error, ast.failure_explanation);
    match ast.root {
        Statement::Module { body, .. } => body,
        _ => panic!("root is always a Module statement"),
    }
}

#[test]
fn function_definition_with_all_four_param_modes() {
    // Scenario 2: `def f(a, b=2, *c, **d): return a`.
    let body = module_body("def f(a, b=2, *c, **d):\n    return a\n");
    match &body[0] {
        Statement::FunctionDefinition { name, params, body, .. } => {
            assert_eq!(name, "f");
            assert_eq!(params.len(), 4);
            assert!(matches!(params[0].mode, ParamMode::Default));
            assert!(matches!(params[1].mode, ParamMode::DefaultWithValue(_)));
            assert!(matches!(params[2].mode, ParamMode::ArgList));
            assert!(matches!(params[3].mode, ParamMode::KeywordArgList));
            match &body[0] {
                Statement::Return { value: Some(Expression::VariableLookup(n, _)), .. } => {
                    assert_eq!(n, "a");
                }
                other => panic!("expected `return a`, got {other:?}"),
            }
        }
        other => panic!("expected a function definition, got {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    // Scenario 3.
    let body = module_body("if a:\n  b\nelif c:\n  d\nelse:\n  e\n");
    match &body[0] {
        Statement::If { elifs, else_clause, .. } => {
            assert_eq!(elifs.len(), 1);
            assert!(else_clause.is_some());
        }
        other => panic!("expected an if statement, got {other:?}"),
    }
}

#[test]
fn if_with_multiple_elifs_and_no_else() {
    let body = module_body("if a:\n  x\nelif b:\n  y\nelif c:\n  z\n");
    match &body[0] {
        Statement::If { elifs, else_clause, .. } => {
            assert_eq!(elifs.len(), 2);
            assert!(else_clause.is_none());
        }
        other => panic!("expected an if statement, got {other:?}"),
    }
}

#[test]
fn try_except_else_finally() {
    // Scenario 5, extended with an `else` clause (§8 boundary case).
    let body = module_body(
        "try:\n  a\nexcept E as e:\n  b\nexcept:\n  f\nelse:\n  g\nfinally:\n  c\n",
    );
    match &body[0] {
        Statement::Try { excepts, else_clause, finally_clause, .. } => {
            assert_eq!(excepts.len(), 2);
            match &excepts[0] {
                Statement::Except { exception_type, name, .. } => {
                    assert!(exception_type.is_some());
                    assert_eq!(name.as_deref(), Some("e"));
                }
                other => panic!("expected an except clause, got {other:?}"),
            }
            match &excepts[1] {
                Statement::Except { exception_type, name, .. } => {
                    assert!(exception_type.is_none());
                    assert!(name.is_none());
                }
                other => panic!("expected a bare except clause, got {other:?}"),
            }
            assert!(else_clause.is_some());
            assert!(finally_clause.is_some());
        }
        other => panic!("expected a try statement, got {other:?}"),
    }
}

#[test]
fn for_loop_with_tuple_target_and_trailing_else() {
    let body = module_body("for (a, b), c in pairs:\n    use(a)\nelse:\n    done()\n");
    match &body[0] {
        Statement::For { target, else_clause, .. } => {
            assert!(matches!(target, pesca_front::ast::UnpackingFormat::Tuple { .. }));
            assert!(else_clause.is_some());
        }
        other => panic!("expected a for statement, got {other:?}"),
    }
}

#[test]
fn with_statement_multiple_items_and_aliases() {
    let body = module_body("with open(a) as f, open(b):\n    pass\n");
    match &body[0] {
        Statement::With { items, .. } => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].alias.as_deref(), Some("f"));
            assert!(items[1].alias.is_none());
        }
        other => panic!("expected a with statement, got {other:?}"),
    }
}

#[test]
fn stacked_decorators_on_def_and_class() {
    let body = module_body("@a\n@b.c\ndef f():\n    pass\n\n@a\nclass C:\n    pass\n");
    match &body[0] {
        Statement::FunctionDefinition { decorators, .. } => assert_eq!(decorators.len(), 2),
        other => panic!("expected a decorated function, got {other:?}"),
    }
    match &body[1] {
        Statement::ClassDefinition { decorators, bases, .. } => {
            assert_eq!(decorators.len(), 1);
            assert!(bases.is_empty());
        }
        other => panic!("expected a decorated class, got {other:?}"),
    }
}

#[test]
fn class_with_base_list() {
    let body = module_body("class C(Base1, Base2):\n    pass\n");
    match &body[0] {
        Statement::ClassDefinition { bases, .. } => assert_eq!(bases.len(), 2),
        other => panic!("expected a class definition, got {other:?}"),
    }
}

#[test]
fn print_with_stream_and_suppressed_newline() {
    let body = module_body("print >> out, a, b,\n");
    match &body[0] {
        Statement::Print { stream, values, suppress_newline, .. } => {
            assert!(stream.is_some());
            assert_eq!(values.len(), 2);
            assert!(*suppress_newline);
        }
        other => panic!("expected a print statement, got {other:?}"),
    }
}

#[test]
fn chained_assignment_and_augmented_assignment() {
    let body = module_body("a = b = 1\nc += 2\n");
    assert!(matches!(&body[0], Statement::Assignment { targets, .. } if targets.len() == 2));
    assert!(matches!(&body[1], Statement::AugmentedAssignment { .. }));
}

#[test]
fn tuple_assignment_both_sides() {
    let body = module_body("a, b = c, d\n");
    match &body[0] {
        Statement::Assignment { targets, value, .. } => {
            assert!(matches!(&targets[0], Expression::TupleConstructor { items, .. } if items.len() == 2));
            assert!(matches!(value, Expression::TupleConstructor { items, .. } if items.len() == 2));
        }
        other => panic!("expected a tuple assignment, got {other:?}"),
    }
}

#[test]
fn import_and_from_import_with_aliases() {
    let body = module_body("import os, sys as system\nfrom a.b import c as d, e\n");
    match &body[0] {
        Statement::Import { names, .. } => {
            assert_eq!(names.len(), 2);
            assert_eq!(names[1].alias.as_deref(), Some("system"));
        }
        other => panic!("expected an import statement, got {other:?}"),
    }
    match &body[1] {
        Statement::FromImport { module, names, .. } => {
            assert_eq!(module, &vec!["a".to_string(), "b".to_string()]);
            assert_eq!(names[0].alias.as_deref(), Some("d"));
            assert!(names[1].alias.is_none());
        }
        other => panic!("expected a from-import statement, got {other:?}"),
    }
}

#[test]
fn blank_lines_amid_a_suite_are_ignored() {
    let body = module_body("if a:\n    x = 1\n\n\n    y = 2\n");
    match &body[0] {
        Statement::If { body, .. } => assert_eq!(body.len(), 2),
        other => panic!("expected an if statement, got {other:?}"),
    }
}

#[test]
fn docstring_is_a_bare_expression_statement() {
    let body = module_body("def f():\n    \"doc\"\n    pass\n");
    match &body[0] {
        Statement::FunctionDefinition { body, .. } => {
            assert!(matches!(&body[0], Statement::Expression { value: Expression::Str(..), .. }));
        }
        other => panic!("expected a function definition, got {other:?}"),
    }
}
