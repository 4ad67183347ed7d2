//! Diagnostic dump of the IR tree. No round-trip guarantee: this output is
//! for humans staring at a translation, not for machines.

use crate::ir::{Expr, InterpPart, Literal, Program, Stmt, StmtKind};

pub fn pretty(program: &Program) -> String {
    let mut out = String::new();
    out.push_str("Program\n");
    for stmt in &program.body {
        print_stmt(stmt, &mut out, 1);
    }
    out
}

/// The same tree as JSON, for tooling.
pub fn to_json(program: &Program) -> String {
    serde_json::to_string_pretty(program).expect("IR serialization cannot fail")
}

fn print_stmt(stmt: &Stmt, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    if let Some(comment) = &stmt.comment {
        out.push_str(&format!("{}// {}\n", pad, comment));
    }

    match &stmt.kind {
        StmtKind::Expr(expr) => {
            out.push_str(&format!("{}ExprStmt\n", pad));
            print_expr(expr, out, indent + 1);
        }
        StmtKind::Assign { name, value } => {
            out.push_str(&format!("{}Assign \"{}\"\n", pad, name));
            print_expr(value, out, indent + 1);
        }
        StmtKind::TupleAssign { names, value } => {
            out.push_str(&format!("{}TupleAssign ({})\n", pad, names.join(", ")));
            print_expr(value, out, indent + 1);
        }
        StmtKind::Pass => out.push_str(&format!("{}Pass\n", pad)),
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            out.push_str(&format!("{}If\n", pad));
            print_expr(cond, out, indent + 1);
            for stmt in then_body {
                print_stmt(stmt, out, indent + 1);
            }
            if let Some(else_body) = else_body {
                out.push_str(&format!("{}Else\n", pad));
                for stmt in else_body {
                    print_stmt(stmt, out, indent + 1);
                }
            }
        }
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => {
            out.push_str(&format!("{}ForEach \"{}\"\n", pad, var));
            print_expr(iterable, out, indent + 1);
            for stmt in body {
                print_stmt(stmt, out, indent + 1);
            }
        }
        StmtKind::While { cond, body } => {
            out.push_str(&format!("{}While\n", pad));
            print_expr(cond, out, indent + 1);
            for stmt in body {
                print_stmt(stmt, out, indent + 1);
            }
        }
        StmtKind::FnDef { name, params, body } => {
            out.push_str(&format!("{}FnDef \"{}\" ({})\n", pad, name, params.join(", ")));
            for stmt in body {
                print_stmt(stmt, out, indent + 1);
            }
        }
        StmtKind::ClassDef { name, base, body } => {
            match base {
                Some(base) => {
                    out.push_str(&format!("{}ClassDef \"{}\" base \"{}\"\n", pad, name, base))
                }
                None => out.push_str(&format!("{}ClassDef \"{}\"\n", pad, name)),
            }
            for stmt in body {
                print_stmt(stmt, out, indent + 1);
            }
        }
        StmtKind::Try {
            body,
            handlers,
            finally,
        } => {
            out.push_str(&format!("{}Try\n", pad));
            for stmt in body {
                print_stmt(stmt, out, indent + 1);
            }
            for handler in handlers {
                out.push_str(&format!(
                    "{}Except type={:?} binding={:?}\n",
                    pad, handler.exc_type, handler.binding
                ));
                for stmt in &handler.body {
                    print_stmt(stmt, out, indent + 1);
                }
            }
            if let Some(finally) = finally {
                out.push_str(&format!("{}Finally\n", pad));
                for stmt in finally {
                    print_stmt(stmt, out, indent + 1);
                }
            }
        }
    }
}

fn print_expr(expr: &Expr, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);

    match expr {
        Expr::Literal(literal) => {
            out.push_str(&format!("{}Literal {}\n", pad, format_literal(literal)))
        }
        Expr::Var(name) => out.push_str(&format!("{}Var \"{}\"\n", pad, name)),
        Expr::StringInterp(parts) => {
            out.push_str(&format!("{}StringInterp\n", pad));
            for part in parts {
                match part {
                    InterpPart::Text(text) => {
                        out.push_str(&format!("{}  Text {:?}\n", pad, text))
                    }
                    InterpPart::Var(name) => {
                        out.push_str(&format!("{}  Var \"{}\"\n", pad, name))
                    }
                }
            }
        }
        Expr::List(elements) => {
            out.push_str(&format!("{}List\n", pad));
            for element in elements {
                print_expr(element, out, indent + 1);
            }
        }
        Expr::Dict(items) => {
            out.push_str(&format!("{}Dict\n", pad));
            for (key, value) in items {
                print_expr(key, out, indent + 1);
                print_expr(value, out, indent + 1);
            }
        }
        Expr::ListComp {
            element,
            var,
            iterable,
            filter,
        } => {
            out.push_str(&format!("{}ListComp \"{}\"\n", pad, var));
            print_expr(element, out, indent + 1);
            print_expr(iterable, out, indent + 1);
            if let Some(filter) = filter {
                print_expr(filter, out, indent + 1);
            }
        }
        Expr::DictComp {
            key,
            value,
            vars,
            iterable,
            filter,
        } => {
            out.push_str(&format!("{}DictComp \"{}\"\n", pad, vars));
            print_expr(key, out, indent + 1);
            print_expr(value, out, indent + 1);
            print_expr(iterable, out, indent + 1);
            if let Some(filter) = filter {
                print_expr(filter, out, indent + 1);
            }
        }
        Expr::Lambda { params, body } => {
            out.push_str(&format!("{}Lambda ({})\n", pad, params.join(", ")));
            print_expr(body, out, indent + 1);
        }
        Expr::BinOp { left, op, right } => {
            out.push_str(&format!("{}BinOp \"{}\"\n", pad, op));
            print_expr(left, out, indent + 1);
            print_expr(right, out, indent + 1);
        }
        Expr::UnaryOp { op, operand } => {
            out.push_str(&format!("{}UnaryOp \"{}\"\n", pad, op));
            print_expr(operand, out, indent + 1);
        }
        Expr::Call { name, args } => {
            out.push_str(&format!("{}Call \"{}\"\n", pad, name));
            for arg in args {
                print_expr(arg, out, indent + 1);
            }
        }
        Expr::MethodCall { target, name, args } => {
            out.push_str(&format!("{}MethodCall \"{}\"\n", pad, name));
            print_expr(target, out, indent + 1);
            for arg in args {
                print_expr(arg, out, indent + 1);
            }
        }
        Expr::Intrinsic { name, args } => {
            out.push_str(&format!("{}Intrinsic \"{}\"\n", pad, name));
            for arg in args {
                print_expr(arg, out, indent + 1);
            }
        }
    }
}

fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::None => "null".to_string(),
        Literal::Bool(true) => "true".to_string(),
        Literal::Bool(false) => "false".to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => value.to_string(),
        Literal::Str(text) => format!("{:?}", text),
    }
}
