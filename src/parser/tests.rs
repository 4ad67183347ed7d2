use super::*;
use crate::error::ErrorKind;
use crate::ir::{Expr, Literal, StmtKind};
use crate::lexer::Lexer;

fn parse(source: &str) -> Program {
    let tokens = Lexer::new(source).tokenize().expect("lex error");
    Parser::new(tokens).parse_program().expect("parse error")
}

fn parse_err(source: &str) -> Error {
    let tokens = Lexer::new(source).tokenize().expect("lex error");
    Parser::new(tokens)
        .parse_program()
        .expect_err("expected parse error")
}

#[test]
fn test_simple_assignment() {
    let program = parse("x = 42\n");
    assert_eq!(program.body.len(), 1);
    match &program.body[0].kind {
        StmtKind::Assign { name, value } => {
            assert_eq!(name, "x");
            assert_eq!(*value, Expr::Literal(Literal::Int(42)));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_float_and_int_literals() {
    let program = parse("a = 1.5\nb = 7\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => {
            assert_eq!(*value, Expr::Literal(Literal::Float(1.5)));
        }
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[1].kind {
        StmtKind::Assign { value, .. } => {
            assert_eq!(*value, Expr::Literal(Literal::Int(7)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_augmented_assignment_is_lowered() {
    let program = parse("x += 2\n");
    match &program.body[0].kind {
        StmtKind::Assign { name, value } => {
            assert_eq!(name, "x");
            match value {
                Expr::BinOp { left, op, right } => {
                    assert_eq!(op, "+");
                    assert_eq!(**left, Expr::Var("x".to_string()));
                    assert_eq!(**right, Expr::Literal(Literal::Int(2)));
                }
                other => panic!("expected lowered binop, got {:?}", other),
            }
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_attribute_assignment_is_lowered_to_setattr() {
    let program = parse("obj.name = \"x\"\n");
    match &program.body[0].kind {
        StmtKind::Expr(Expr::Intrinsic { name, args }) => {
            assert_eq!(name, "setattr");
            assert_eq!(args[0], Expr::Var("obj".to_string()));
            assert_eq!(args[1], Expr::Literal(Literal::Str("name".to_string())));
        }
        other => panic!("expected setattr, got {:?}", other),
    }
}

#[test]
fn test_attribute_read_is_lowered_to_getattr() {
    let program = parse("x = obj.name\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::Intrinsic { name, args } => {
                assert_eq!(name, "getattr");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected getattr, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_tuple_unpacking_is_its_own_kind() {
    let program = parse("(a, b) = (1, 2)\n");
    match &program.body[0].kind {
        StmtKind::TupleAssign { names, value } => {
            assert_eq!(names, &["a".to_string(), "b".to_string()]);
            assert_eq!(
                *value,
                Expr::List(vec![
                    Expr::Literal(Literal::Int(1)),
                    Expr::Literal(Literal::Int(2)),
                ])
            );
        }
        other => panic!("expected tuple assignment, got {:?}", other),
    }
}

#[test]
fn test_if_elif_else_nests() {
    let program = parse("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
    match &program.body[0].kind {
        StmtKind::If { else_body, .. } => {
            let else_body = else_body.as_ref().expect("elif should produce else branch");
            assert_eq!(else_body.len(), 1);
            match &else_body[0].kind {
                StmtKind::If {
                    else_body: inner_else,
                    ..
                } => {
                    assert!(inner_else.is_some());
                }
                other => panic!("expected nested if, got {:?}", other),
            }
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_while_and_for() {
    let program = parse("while x < 10:\n    x += 1\nfor item in items:\n    print(item)\n");
    assert!(matches!(program.body[0].kind, StmtKind::While { .. }));
    match &program.body[1].kind {
        StmtKind::ForEach { var, .. } => assert_eq!(var, "item"),
        other => panic!("expected for-each, got {:?}", other),
    }
}

#[test]
fn test_for_with_two_loop_vars() {
    let program = parse("for k, v in pairs:\n    print(k)\n");
    match &program.body[0].kind {
        StmtKind::ForEach { var, .. } => assert_eq!(var, "k,v"),
        other => panic!("expected for-each, got {:?}", other),
    }
}

#[test]
fn test_function_and_class_defs() {
    let program = parse("def add(a, b):\n    return a + b\nclass Dog(Animal):\n    pass\n");
    match &program.body[0].kind {
        StmtKind::FnDef { name, params, body } => {
            assert_eq!(name, "add");
            assert_eq!(params, &["a".to_string(), "b".to_string()]);
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected function def, got {:?}", other),
    }
    match &program.body[1].kind {
        StmtKind::ClassDef { name, base, body } => {
            assert_eq!(name, "Dog");
            assert_eq!(base.as_deref(), Some("Animal"));
            assert!(matches!(body[0].kind, StmtKind::Pass));
        }
        other => panic!("expected class def, got {:?}", other),
    }
}

#[test]
fn test_try_except_finally() {
    let source = "\
try:
    risky()
except ValueError as e:
    print(e)
except:
    pass
finally:
    cleanup()
";
    let program = parse(source);
    match &program.body[0].kind {
        StmtKind::Try {
            body,
            handlers,
            finally,
        } => {
            assert_eq!(body.len(), 1);
            assert_eq!(handlers.len(), 2);
            assert_eq!(handlers[0].exc_type.as_deref(), Some("ValueError"));
            assert_eq!(handlers[0].binding.as_deref(), Some("e"));
            assert!(handlers[1].exc_type.is_none());
            assert!(finally.is_some());
        }
        other => panic!("expected try, got {:?}", other),
    }
}

#[test]
fn test_ternary_becomes_intrinsic() {
    let program = parse("y = x if x > 10 else 0\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::Intrinsic { name, args } => {
                assert_eq!(name, "ternary");
                assert_eq!(args.len(), 3);
                // Argument order: condition, true branch, false branch.
                assert!(matches!(args[0], Expr::BinOp { .. }));
                assert_eq!(args[1], Expr::Var("x".to_string()));
                assert_eq!(args[2], Expr::Literal(Literal::Int(0)));
            }
            other => panic!("expected ternary intrinsic, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_raise_becomes_intrinsic() {
    let program = parse("raise ValueError(\"bad\")\n");
    match &program.body[0].kind {
        StmtKind::Expr(Expr::Intrinsic { name, args }) => {
            assert_eq!(name, "raise");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected raise intrinsic, got {:?}", other),
    }
}

#[test]
fn test_print_becomes_intrinsic() {
    let program = parse("print(1, 2)\n");
    match &program.body[0].kind {
        StmtKind::Expr(Expr::Intrinsic { name, args }) => {
            assert_eq!(name, "print");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected print intrinsic, got {:?}", other),
    }
}

#[test]
fn test_indexing_and_slicing() {
    let program = parse("a = xs[0]\nb = s[1:4]\nc = s[::2]\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::MethodCall { name, args, .. } => {
                assert_eq!(name, crate::ir::GET_ITEM);
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected indexing, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[1].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::MethodCall { name, args, .. } => {
                assert_eq!(name, crate::ir::SLICE);
                assert_eq!(args.len(), 3);
                assert_eq!(args[2], Expr::Literal(Literal::None));
            }
            other => panic!("expected slice, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
    match &program.body[2].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::MethodCall { name, args, .. } => {
                assert_eq!(name, crate::ir::SLICE);
                assert_eq!(args[0], Expr::Literal(Literal::None));
                assert_eq!(args[1], Expr::Literal(Literal::None));
                assert_eq!(args[2], Expr::Literal(Literal::Int(2)));
            }
            other => panic!("expected slice, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_list_comprehension_with_filter() {
    let program = parse("squared = [x * x for x in items if x > 0]\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::ListComp {
                var,
                filter,
                ..
            } => {
                assert_eq!(var, "x");
                assert!(filter.is_some());
            }
            other => panic!("expected list comprehension, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_dict_comprehension_joins_loop_vars() {
    let program = parse("d = {k: v * 2 for k, v in pairs}\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::DictComp { vars, filter, .. } => {
                assert_eq!(vars, "k,v");
                assert!(filter.is_none());
            }
            other => panic!("expected dict comprehension, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_fstring_splits_into_parts() {
    let program = parse("msg = f\"hi {name}, bye {other}\"\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::StringInterp(parts) => {
                use crate::ir::InterpPart;
                assert_eq!(
                    parts,
                    &vec![
                        InterpPart::Text("hi ".to_string()),
                        InterpPart::Var("name".to_string()),
                        InterpPart::Text(", bye ".to_string()),
                        InterpPart::Var("other".to_string()),
                    ]
                );
            }
            other => panic!("expected string interpolation, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_imports_and_decorators_are_dropped() {
    let program = parse("import sys\nfrom os import path\n@decorator\nx = 1\n");
    assert_eq!(program.body.len(), 1);
    assert!(matches!(program.body[0].kind, StmtKind::Assign { .. }));
}

#[test]
fn test_method_call_chain() {
    let program = parse("parts = text.strip().split()\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::MethodCall { target, name, .. } => {
                assert_eq!(name, "split");
                assert!(matches!(**target, Expr::MethodCall { ref name, .. } if name == "strip"));
            }
            other => panic!("expected method chain, got {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_bitwise_or_binds_tighter_than_multiplicative() {
    // The grammar puts bitwise-or above multiplicative in binding
    // strength, so `2 * 3 | 4` groups as `2 * (3 | 4)`.
    let program = parse("x = 2 * 3 | 4\n");
    match &program.body[0].kind {
        StmtKind::Assign { value, .. } => match value {
            Expr::BinOp { op, right, .. } => {
                assert_eq!(op, "*");
                assert!(matches!(**right, Expr::BinOp { ref op, .. } if op == "|"));
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unexpected_token_is_a_parse_error() {
    let err = parse_err("x = = 1\n");
    assert_eq!(err.kind, ErrorKind::Parse);
    assert!(err.message.contains("'='"), "{}", err.message);
}

#[test]
fn test_missing_block_is_a_parse_error() {
    let err = parse_err("if x:\ny = 1\n");
    assert_eq!(err.kind, ErrorKind::Parse);
    assert!(err.message.contains("indented block"), "{}", err.message);
}

#[test]
fn test_error_carries_position() {
    let err = parse_err("x = 1\ny = (2\n");
    let span = err.span.expect("parse errors carry a span");
    assert_eq!(span.line, 2);
}
