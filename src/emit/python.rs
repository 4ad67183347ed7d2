//! Python backend: the dynamic target. Every IR construct has a native
//! rendering, so this emitter is the round-trip reference: re-parsing its
//! output yields a structurally equivalent tree.

use crate::error::Error;
use crate::ir::{Expr, InterpPart, Literal, Program, Stmt, StmtKind, GET_ITEM, SLICE};

use super::{is_absent, pad};

pub fn emit(program: &Program) -> Result<String, Error> {
    let mut emitter = PythonEmitter { out: String::new() };
    for stmt in &program.body {
        emitter.emit_stmt(stmt, 0)?;
    }
    Ok(emitter.out)
}

struct PythonEmitter {
    out: String,
}

impl PythonEmitter {
    fn emit_stmt(&mut self, stmt: &Stmt, indent: usize) -> Result<(), Error> {
        let pad = pad(indent);
        if let Some(comment) = &stmt.comment {
            self.out.push_str(&format!("{}# {}\n", pad, comment));
        }

        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.out.push_str(&pad);
                self.emit_stmt_expr(expr)?;
                self.out.push('\n');
            }
            StmtKind::Assign { name, value } => {
                self.out.push_str(&format!("{}{} = ", pad, name));
                self.emit_expr(value)?;
                self.out.push('\n');
            }
            StmtKind::TupleAssign { names, value } => {
                self.out
                    .push_str(&format!("{}({}) = ", pad, names.join(", ")));
                self.emit_expr(value)?;
                self.out.push('\n');
            }
            StmtKind::Pass => {
                self.out.push_str(&format!("{}pass\n", pad));
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.out.push_str(&format!("{}if ", pad));
                self.emit_expr(cond)?;
                self.out.push_str(":\n");
                self.emit_body(then_body, indent + 1)?;
                if let Some(else_body) = else_body {
                    self.out.push_str(&format!("{}else:\n", pad));
                    self.emit_body(else_body, indent + 1)?;
                }
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.out
                    .push_str(&format!("{}for {} in ", pad, var.replace(',', ", ")));
                self.emit_expr(iterable)?;
                self.out.push_str(":\n");
                self.emit_body(body, indent + 1)?;
            }
            StmtKind::While { cond, body } => {
                self.out.push_str(&format!("{}while ", pad));
                self.emit_expr(cond)?;
                self.out.push_str(":\n");
                self.emit_body(body, indent + 1)?;
            }
            StmtKind::FnDef { name, params, body } => {
                self.out
                    .push_str(&format!("{}def {}({}):\n", pad, name, params.join(", ")));
                self.emit_body(body, indent + 1)?;
            }
            StmtKind::ClassDef { name, base, body } => {
                match base {
                    Some(base) => self
                        .out
                        .push_str(&format!("{}class {}({}):\n", pad, name, base)),
                    None => self.out.push_str(&format!("{}class {}:\n", pad, name)),
                }
                self.emit_body(body, indent + 1)?;
            }
            StmtKind::Try {
                body,
                handlers,
                finally,
            } => {
                self.out.push_str(&format!("{}try:\n", pad));
                self.emit_body(body, indent + 1)?;
                for handler in handlers {
                    match (&handler.exc_type, &handler.binding) {
                        (Some(ty), Some(name)) => self
                            .out
                            .push_str(&format!("{}except {} as {}:\n", pad, ty, name)),
                        (Some(ty), None) => {
                            self.out.push_str(&format!("{}except {}:\n", pad, ty))
                        }
                        _ => self.out.push_str(&format!("{}except:\n", pad)),
                    }
                    self.emit_body(&handler.body, indent + 1)?;
                }
                if let Some(finally) = finally {
                    self.out.push_str(&format!("{}finally:\n", pad));
                    self.emit_body(finally, indent + 1)?;
                }
            }
        }
        Ok(())
    }

    fn emit_body(&mut self, body: &[Stmt], indent: usize) -> Result<(), Error> {
        if body.is_empty() {
            self.out.push_str(&format!("{}pass\n", pad(indent)));
            return Ok(());
        }
        for stmt in body {
            self.emit_stmt(stmt, indent)?;
        }
        Ok(())
    }

    /// Intrinsics that render as whole statements in Python.
    fn emit_stmt_expr(&mut self, expr: &Expr) -> Result<(), Error> {
        if let Expr::Intrinsic { name, args } = expr {
            match name.as_str() {
                "return" => {
                    self.out.push_str("return");
                    if let Some(arg) = args.first() {
                        self.out.push(' ');
                        self.emit_expr(arg)?;
                    }
                    return Ok(());
                }
                "break" => {
                    self.out.push_str("break");
                    return Ok(());
                }
                "continue" => {
                    self.out.push_str("continue");
                    return Ok(());
                }
                "raise" => {
                    self.out.push_str("raise");
                    if let Some(arg) = args.first() {
                        self.out.push(' ');
                        self.emit_expr(arg)?;
                    }
                    return Ok(());
                }
                "setattr" => {
                    self.emit_setattr(args)?;
                    return Ok(());
                }
                _ => {}
            }
        }
        self.emit_expr(expr)
    }

    fn emit_setattr(&mut self, args: &[Expr]) -> Result<(), Error> {
        match args {
            [target, Expr::Literal(Literal::Str(attr)), value] => {
                self.emit_expr(target)?;
                self.out.push_str(&format!(".{} = ", attr));
                self.emit_expr(value)
            }
            _ => Err(Error::unsupported(
                "python backend: 'setattr' intrinsic requires (target, attribute name, value)",
            )),
        }
    }

    fn emit_expr(&mut self, expr: &Expr) -> Result<(), Error> {
        match expr {
            Expr::Literal(literal) => {
                self.out.push_str(&format_literal(literal));
                Ok(())
            }
            Expr::Var(name) => {
                self.out.push_str(name);
                Ok(())
            }
            Expr::StringInterp(parts) => {
                self.out.push_str("f\"");
                for part in parts {
                    match part {
                        InterpPart::Text(text) => self.out.push_str(&escape(text)),
                        InterpPart::Var(name) => self.out.push_str(&format!("{{{}}}", name)),
                    }
                }
                self.out.push('"');
                Ok(())
            }
            Expr::List(elements) => {
                self.out.push('[');
                self.emit_comma_separated(elements)?;
                self.out.push(']');
                Ok(())
            }
            Expr::Dict(items) => {
                self.out.push('{');
                for (i, (key, value)) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(key)?;
                    self.out.push_str(": ");
                    self.emit_expr(value)?;
                }
                self.out.push('}');
                Ok(())
            }
            Expr::ListComp {
                element,
                var,
                iterable,
                filter,
            } => {
                self.out.push('[');
                self.emit_expr(element)?;
                self.out
                    .push_str(&format!(" for {} in ", var.replace(',', ", ")));
                self.emit_expr(iterable)?;
                if let Some(filter) = filter {
                    self.out.push_str(" if ");
                    self.emit_expr(filter)?;
                }
                self.out.push(']');
                Ok(())
            }
            Expr::DictComp {
                key,
                value,
                vars,
                iterable,
                filter,
            } => {
                self.out.push('{');
                self.emit_expr(key)?;
                self.out.push_str(": ");
                self.emit_expr(value)?;
                self.out
                    .push_str(&format!(" for {} in ", vars.replace(',', ", ")));
                self.emit_expr(iterable)?;
                if let Some(filter) = filter {
                    self.out.push_str(" if ");
                    self.emit_expr(filter)?;
                }
                self.out.push('}');
                Ok(())
            }
            Expr::Lambda { params, body } => {
                if params.is_empty() {
                    self.out.push_str("lambda: ");
                } else {
                    self.out.push_str(&format!("lambda {}: ", params.join(", ")));
                }
                self.emit_expr(body)
            }
            Expr::BinOp { left, op, right } => self.emit_binop(left, op, right),
            Expr::UnaryOp { op, operand } => {
                if op == "not" {
                    self.out.push_str("not ");
                } else {
                    self.out.push_str(op);
                }
                self.emit_expr(operand)
            }
            Expr::Call { name, args } => {
                self.out.push_str(&format!("{}(", name));
                self.emit_comma_separated(args)?;
                self.out.push(')');
                Ok(())
            }
            Expr::MethodCall { target, name, args } => match name.as_str() {
                n if n == GET_ITEM => {
                    self.emit_expr(target)?;
                    self.out.push('[');
                    self.emit_comma_separated(args)?;
                    self.out.push(']');
                    Ok(())
                }
                n if n == SLICE => self.emit_slice(target, args),
                _ => {
                    self.emit_expr(target)?;
                    self.out.push_str(&format!(".{}(", name));
                    self.emit_comma_separated(args)?;
                    self.out.push(')');
                    Ok(())
                }
            },
            Expr::Intrinsic { name, args } => self.emit_intrinsic(name, args),
        }
    }

    fn emit_slice(&mut self, target: &Expr, args: &[Expr]) -> Result<(), Error> {
        let [start, end, step] = args else {
            return Err(Error::unsupported(
                "python backend: slice requires exactly (start, end, step)",
            ));
        };
        self.emit_expr(target)?;
        self.out.push('[');
        if !is_absent(start) {
            self.emit_expr(start)?;
        }
        self.out.push(':');
        if !is_absent(end) {
            self.emit_expr(end)?;
        }
        if !is_absent(step) {
            self.out.push(':');
            self.emit_expr(step)?;
        }
        self.out.push(']');
        Ok(())
    }

    /// The explicit intrinsic whitelist for this backend. Unknown names are
    /// a hard error, never a silent drop.
    fn emit_intrinsic(&mut self, name: &str, args: &[Expr]) -> Result<(), Error> {
        match name {
            "print" => {
                self.out.push_str("print(");
                self.emit_comma_separated(args)?;
                self.out.push(')');
                Ok(())
            }
            "ternary" => {
                let [cond, when_true, when_false] = args else {
                    return Err(Error::unsupported(
                        "python backend: 'ternary' intrinsic requires exactly 3 arguments",
                    ));
                };
                self.emit_expr(when_true)?;
                self.out.push_str(" if ");
                self.emit_expr(cond)?;
                self.out.push_str(" else ");
                self.emit_expr(when_false)
            }
            "getattr" => match args {
                [target, Expr::Literal(Literal::Str(attr))] => {
                    self.emit_expr(target)?;
                    self.out.push_str(&format!(".{}", attr));
                    Ok(())
                }
                _ => Err(Error::unsupported(
                    "python backend: 'getattr' intrinsic requires (target, attribute name)",
                )),
            },
            "setattr" => self.emit_setattr(args),
            "raise" => {
                self.out.push_str("raise");
                if let Some(arg) = args.first() {
                    self.out.push(' ');
                    self.emit_expr(arg)?;
                }
                Ok(())
            }
            "return" | "break" | "continue" => Err(Error::unsupported(format!(
                "python backend: '{}' intrinsic is only valid in statement position",
                name
            ))),
            other => Err(Error::unsupported(format!(
                "python backend: unknown intrinsic '{}'",
                other
            ))),
        }
    }

    fn emit_binop(&mut self, left: &Expr, op: &str, right: &Expr) -> Result<(), Error> {
        let level = precedence(op);
        self.emit_operand(left, level, false)?;
        self.out.push_str(&format!(" {} ", op));
        self.emit_operand(right, level, true)
    }

    /// Parenthesize a child only where the re-parse would otherwise bind it
    /// differently (lower precedence, or equal precedence on the right of a
    /// left-associative operator).
    fn emit_operand(&mut self, child: &Expr, parent: u8, is_right: bool) -> Result<(), Error> {
        let needs_parens = match child {
            Expr::BinOp { op, .. } => {
                let child_level = precedence(op);
                child_level < parent || (is_right && child_level == parent)
            }
            // Ternaries and lambdas bind looser than any operator.
            Expr::Intrinsic { name, .. } => name == "ternary",
            Expr::Lambda { .. } => true,
            _ => false,
        };
        if needs_parens {
            self.out.push('(');
            self.emit_expr(child)?;
            self.out.push(')');
            Ok(())
        } else {
            self.emit_expr(child)
        }
    }

    fn emit_comma_separated(&mut self, exprs: &[Expr]) -> Result<(), Error> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.emit_expr(expr)?;
        }
        Ok(())
    }
}

/// Binding strength of each operator, mirroring the parser's precedence
/// chain (lowest first).
fn precedence(op: &str) -> u8 {
    match op {
        "or" => 1,
        "and" => 2,
        "==" | "!=" | "<" | ">" | "<=" | ">=" => 3,
        "+" | "-" => 4,
        "*" | "/" | "%" | "//" | "**" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "<<" | ">>" => 9,
        _ => 10,
    }
}

fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::None => "None".to_string(),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => format_float(*value),
        Literal::Str(text) => format!("\"{}\"", escape(text)),
    }
}

/// Keep a decimal point so the value stays a float literal on re-parse.
pub(super) fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}
