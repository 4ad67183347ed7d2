//! C backend: the statically-typed target with no dynamic containers.
//!
//! Variables get a fixed placeholder type (`int`), a documented
//! imprecision. Dictionaries, comprehensions, lambdas, and slices have no
//! native rendering and come out as non-executable annotations describing
//! intent; exceptions are annotations only, with no control-flow
//! semantics. Everything else that C cannot express is a hard
//! unsupported-construct error.

use crate::error::Error;
use crate::ir::{Expr, InterpPart, Literal, Program, Stmt, StmtKind, GET_ITEM, SLICE};

use super::pad;

pub fn emit(program: &Program) -> Result<String, Error> {
    let mut emitter = CEmitter { out: String::new() };

    emitter.out.push_str("#include <stdio.h>\n");
    emitter.out.push('\n');
    emitter.out.push_str("int main(void) {\n");

    for stmt in &program.body {
        emitter.emit_stmt(stmt, 1)?;
    }

    emitter.out.push_str("    return 0;\n");
    emitter.out.push_str("}\n");
    Ok(emitter.out)
}

struct CEmitter {
    out: String,
}

impl CEmitter {
    fn emit_stmt(&mut self, stmt: &Stmt, indent: usize) -> Result<(), Error> {
        let pad = pad(indent);
        if let Some(comment) = &stmt.comment {
            self.out.push_str(&format!("{}// {}\n", pad, comment));
        }

        match &stmt.kind {
            StmtKind::Expr(expr) => self.emit_stmt_expr(expr, &pad),
            StmtKind::Assign { name, value } => {
                self.out.push_str(&format!("{}int {} = ", pad, name));
                self.emit_expr(value)?;
                self.out.push_str(";\n");
                Ok(())
            }
            StmtKind::TupleAssign { .. } => Err(Error::unsupported(
                "c backend does not support tuple-unpacking assignment",
            )),
            StmtKind::Pass => {
                self.out.push_str(&format!("{};\n", pad));
                Ok(())
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.out.push_str(&format!("{}if (", pad));
                self.emit_expr(cond)?;
                self.out.push_str(") {\n");
                for stmt in then_body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                if let Some(else_body) = else_body {
                    self.out.push_str(&format!("{}}} else {{\n", pad));
                    for stmt in else_body {
                        self.emit_stmt(stmt, indent + 1)?;
                    }
                }
                self.out.push_str(&format!("{}}}\n", pad));
                Ok(())
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                // C has no foreach; the loop header survives only as an
                // annotation, the body is kept.
                self.out.push_str(&format!("{}// foreach {} in ", pad, var));
                self.emit_expr(iterable)?;
                self.out.push('\n');
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.out.push_str(&format!("{}while (", pad));
                self.emit_expr(cond)?;
                self.out.push_str(") {\n");
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                self.out.push_str(&format!("{}}}\n", pad));
                Ok(())
            }
            StmtKind::FnDef { name, params, body } => {
                let params = params
                    .iter()
                    .map(|p| format!("int {}", p))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.out.push_str(&format!("void {}({}) {{\n", name, params));
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                self.out.push_str("}\n");
                Ok(())
            }
            StmtKind::ClassDef { .. } => Err(Error::unsupported(
                "c backend does not support class definitions",
            )),
            StmtKind::Try {
                body,
                handlers,
                finally,
            } => {
                // No exception semantics in this backend; the structure is
                // preserved as annotations only.
                self.out.push_str(&format!("{}// try\n", pad));
                for stmt in body {
                    self.emit_stmt(stmt, indent)?;
                }
                for handler in handlers {
                    match (&handler.exc_type, &handler.binding) {
                        (Some(ty), Some(name)) => self
                            .out
                            .push_str(&format!("{}// except {} as {}\n", pad, ty, name)),
                        (Some(ty), None) => {
                            self.out.push_str(&format!("{}// except {}\n", pad, ty))
                        }
                        _ => self.out.push_str(&format!("{}// except\n", pad)),
                    }
                    for stmt in &handler.body {
                        self.emit_stmt(stmt, indent)?;
                    }
                }
                if let Some(finally) = finally {
                    self.out.push_str(&format!("{}// finally\n", pad));
                    for stmt in finally {
                        self.emit_stmt(stmt, indent)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Statement-position intrinsics get their C statement spelling; all
    /// other expressions become `expr;`.
    fn emit_stmt_expr(&mut self, expr: &Expr, pad: &str) -> Result<(), Error> {
        if let Expr::Intrinsic { name, args } = expr {
            match name.as_str() {
                "return" => {
                    self.out.push_str(pad);
                    self.out.push_str("return");
                    if let Some(arg) = args.first() {
                        self.out.push(' ');
                        self.emit_expr(arg)?;
                    }
                    self.out.push_str(";\n");
                    return Ok(());
                }
                "break" => {
                    self.out.push_str(&format!("{}break;\n", pad));
                    return Ok(());
                }
                "continue" => {
                    self.out.push_str(&format!("{}continue;\n", pad));
                    return Ok(());
                }
                "raise" => {
                    // Annotation only; C has nothing to throw.
                    self.out.push_str(&format!("{}// raise ", pad));
                    if let Some(arg) = args.first() {
                        self.emit_expr(arg)?;
                    }
                    self.out.push('\n');
                    return Ok(());
                }
                "setattr" => {
                    let [target, Expr::Literal(Literal::Str(attr)), value] = args.as_slice()
                    else {
                        return Err(Error::unsupported(
                            "c backend: 'setattr' intrinsic requires (target, attribute name, value)",
                        ));
                    };
                    self.out.push_str(pad);
                    self.emit_expr(target)?;
                    self.out.push_str(&format!(".{} = ", attr));
                    self.emit_expr(value)?;
                    self.out.push_str(";\n");
                    return Ok(());
                }
                _ => {}
            }
        }
        self.out.push_str(pad);
        self.emit_expr(expr)?;
        self.out.push_str(";\n");
        Ok(())
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
                // Simplified: every interpolated variable becomes %s.
                self.out.push('"');
                for part in parts {
                    match part {
                        InterpPart::Text(text) => self.out.push_str(&escape(text)),
                        InterpPart::Var(_) => self.out.push_str("%s"),
                    }
                }
                self.out.push('"');
                Ok(())
            }
            Expr::List(elements) => {
                self.out.push('{');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(element)?;
                }
                self.out.push('}');
                Ok(())
            }
            Expr::Dict(items) => {
                // No dynamic containers here; the pairs survive as an
                // annotation so the reader still sees intent and order.
                self.out.push_str("/* dict: ");
                for (i, (key, value)) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(key)?;
                    self.out.push_str(" => ");
                    self.emit_expr(value)?;
                }
                self.out.push_str(" */");
                Ok(())
            }
            Expr::ListComp {
                element,
                var,
                iterable,
                filter,
            } => {
                self.out.push_str("/* list comprehension: ");
                self.emit_expr(element)?;
                self.out.push_str(&format!(" for {} in ", var));
                self.emit_expr(iterable)?;
                if let Some(filter) = filter {
                    self.out.push_str(" if ");
                    self.emit_expr(filter)?;
                }
                self.out.push_str(" */");
                Ok(())
            }
            Expr::DictComp {
                key,
                value,
                vars,
                iterable,
                filter,
            } => {
                self.out.push_str("/* dict comprehension: ");
                self.emit_expr(key)?;
                self.out.push_str(" => ");
                self.emit_expr(value)?;
                self.out.push_str(&format!(" for {} in ", vars));
                self.emit_expr(iterable)?;
                if let Some(filter) = filter {
                    self.out.push_str(" if ");
                    self.emit_expr(filter)?;
                }
                self.out.push_str(" */");
                Ok(())
            }
            Expr::Lambda { params, body } => {
                self.out
                    .push_str(&format!("/* lambda {}: ", params.join(", ")));
                self.emit_expr(body)?;
                self.out.push_str(" */");
                Ok(())
            }
            Expr::BinOp { left, op, right } => {
                self.emit_expr(left)?;
                self.out.push_str(&format!(" {} ", translate_op(op)));
                self.emit_expr(right)
            }
            Expr::UnaryOp { op, operand } => {
                self.out.push_str(translate_unary_op(op));
                self.emit_expr(operand)
            }
            Expr::Call { name, args } => {
                self.out.push_str(&format!("{}(", name));
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(arg)?;
                }
                self.out.push(')');
                Ok(())
            }
            Expr::MethodCall { target, name, args } => match name.as_str() {
                n if n == GET_ITEM => {
                    self.emit_expr(target)?;
                    self.out.push('[');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.emit_expr(arg)?;
                    }
                    self.out.push(']');
                    Ok(())
                }
                n if n == SLICE => {
                    self.out.push_str("/* slice of ");
                    self.emit_expr(target)?;
                    self.out.push_str(" */");
                    Ok(())
                }
                _ => {
                    // No methods in C: the target becomes the first
                    // argument of a plain function call.
                    self.out.push_str(&format!("{}(", name));
                    self.emit_expr(target)?;
                    for arg in args {
                        self.out.push_str(", ");
                        self.emit_expr(arg)?;
                    }
                    self.out.push(')');
                    Ok(())
                }
            },
            Expr::Intrinsic { name, args } => self.emit_intrinsic(name, args),
        }
    }

    /// The explicit intrinsic whitelist for this backend.
    fn emit_intrinsic(&mut self, name: &str, args: &[Expr]) -> Result<(), Error> {
        match name {
            "print" => self.emit_print(args),
            "ternary" => {
                let [cond, when_true, when_false] = args else {
                    return Err(Error::unsupported(
                        "c backend: 'ternary' intrinsic requires exactly 3 arguments",
                    ));
                };
                self.emit_expr(cond)?;
                self.out.push_str(" ? ");
                self.emit_expr(when_true)?;
                self.out.push_str(" : ");
                self.emit_expr(when_false)
            }
            "getattr" => match args {
                [target, Expr::Literal(Literal::Str(attr))] => {
                    self.emit_expr(target)?;
                    self.out.push_str(&format!(".{}", attr));
                    Ok(())
                }
                _ => Err(Error::unsupported(
                    "c backend: 'getattr' intrinsic requires (target, attribute name)",
                )),
            },
            "setattr" | "raise" | "return" | "break" | "continue" => {
                Err(Error::unsupported(format!(
                    "c backend: '{}' intrinsic is only valid in statement position",
                    name
                )))
            }
            other => Err(Error::unsupported(format!(
                "c backend: unknown intrinsic '{}'",
                other
            ))),
        }
    }

    /// `print(x)` lowers to `printf`. Only a single literal argument is
    /// supported; the format specifier follows the literal's value kind.
    fn emit_print(&mut self, args: &[Expr]) -> Result<(), Error> {
        if args.len() != 1 {
            return Err(Error::unsupported(
                "c backend supports print() with exactly 1 argument",
            ));
        }
        let spec = match &args[0] {
            Expr::Literal(Literal::Str(_)) => "%s",
            Expr::Literal(Literal::Int(_)) => "%lld",
            Expr::Literal(Literal::Float(_)) => "%f",
            _ => {
                return Err(Error::unsupported(
                    "c backend supports print() of string/number literals only",
                ));
            }
        };
        self.out.push_str(&format!("printf(\"{}\\n\", ", spec));
        self.emit_expr(&args[0])?;
        self.out.push(')');
        Ok(())
    }
}

/// The IR stores operators as the source dialect spelled them; word
/// operators get their C spelling here.
fn translate_op(op: &str) -> &str {
    match op {
        "and" => "&&",
        "or" => "||",
        "//" => "/",
        other => other,
    }
}

fn translate_unary_op(op: &str) -> &str {
    match op {
        "not" => "!",
        other => other,
    }
}

fn format_literal(literal: &Literal) -> String {
    match literal {
        // Placeholder: C has no null literal for primitives.
        Literal::None => "0".to_string(),
        Literal::Bool(true) => "1".to_string(),
        Literal::Bool(false) => "0".to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => super::python::format_float(*value),
        Literal::Str(text) => format!("\"{}\"", escape(text)),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
