//! Tcl backend: the command-based target with two lexical modes.
//!
//! Tcl's expression sublanguage (inside `[expr {...}]`) and its command
//! sublanguage disagree on whether a variable reference needs its `$`
//! sigil, so every recursive emission call carries an explicit
//! [`ExprContext`] rather than inferring the mode from surrounding syntax.

use crate::error::Error;
use crate::ir::{Expr, InterpPart, Literal, Program, Stmt, StmtKind, GET_ITEM, SLICE};

use super::{is_absent, pad};

/// Which lexical mode the emitted text lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExprContext {
    /// Command position: variables need their `$` prefix.
    Normal,
    /// Inside an `[expr {...}]` block: variables are bare.
    InsideExpr,
}

pub fn emit(program: &Program) -> Result<String, Error> {
    let mut emitter = TclEmitter { out: String::new() };
    for stmt in &program.body {
        emitter.emit_stmt(stmt, 0)?;
    }
    Ok(emitter.out)
}

struct TclEmitter {
    out: String,
}

impl TclEmitter {
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
                self.out.push_str(&format!("{}set {} ", pad, name));
                self.emit_expr(value, ExprContext::Normal)?;
                self.out.push('\n');
            }
            StmtKind::TupleAssign { names, value } => {
                // Bind the value once, then destructure with lassign.
                self.out.push_str(&format!("{}set _tuple ", pad));
                self.emit_expr(value, ExprContext::Normal)?;
                self.out.push('\n');
                self.out.push_str(&format!("{}lassign $_tuple", pad));
                for name in names {
                    self.out.push(' ');
                    self.out.push_str(name);
                }
                self.out.push('\n');
            }
            StmtKind::Pass => {
                self.out.push_str(&format!("{}# pass\n", pad));
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.out.push_str(&format!("{}if {{", pad));
                self.emit_expr(cond, ExprContext::Normal)?;
                self.out.push_str("} {\n");
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
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.out.push_str(&format!("{}foreach ", pad));
                self.out.push_str(&foreach_vars(var));
                self.out.push(' ');
                self.emit_expr(iterable, ExprContext::Normal)?;
                self.out.push_str(" {\n");
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                self.out.push_str(&format!("{}}}\n", pad));
            }
            StmtKind::While { cond, body } => {
                self.out.push_str(&format!("{}while {{", pad));
                self.emit_expr(cond, ExprContext::Normal)?;
                self.out.push_str("} {\n");
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                self.out.push_str(&format!("{}}}\n", pad));
            }
            StmtKind::FnDef { name, params, body } => {
                self.out
                    .push_str(&format!("proc {} {{{}}} {{\n", name, params.join(" ")));
                for stmt in body {
                    self.emit_stmt(stmt, indent + 1)?;
                }
                self.out.push_str("}\n");
            }
            StmtKind::ClassDef { name, base, body } => {
                // No class construct here; the definition survives as an
                // annotation, its body is emitted flat.
                match base {
                    Some(base) => self
                        .out
                        .push_str(&format!("{}# class {} extends {}\n", pad, name, base)),
                    None => self.out.push_str(&format!("{}# class {}\n", pad, name)),
                }
                for stmt in body {
                    self.emit_stmt(stmt, indent)?;
                }
            }
            StmtKind::Try {
                body,
                handlers,
                finally,
            } => {
                self.out.push_str(&format!("{}# try\n", pad));
                for stmt in body {
                    self.emit_stmt(stmt, indent)?;
                }
                for handler in handlers {
                    match (&handler.exc_type, &handler.binding) {
                        (Some(ty), Some(name)) => self
                            .out
                            .push_str(&format!("{}# except {} as {}\n", pad, ty, name)),
                        (Some(ty), None) => {
                            self.out.push_str(&format!("{}# except {}\n", pad, ty))
                        }
                        _ => self.out.push_str(&format!("{}# except\n", pad)),
                    }
                    for stmt in &handler.body {
                        self.emit_stmt(stmt, indent)?;
                    }
                }
                if let Some(finally) = finally {
                    self.out.push_str(&format!("{}# finally\n", pad));
                    for stmt in finally {
                        self.emit_stmt(stmt, indent)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Statement-position intrinsics with their own command spelling.
    fn emit_stmt_expr(&mut self, expr: &Expr) -> Result<(), Error> {
        if let Expr::Intrinsic { name, args } = expr {
            match name.as_str() {
                "return" => {
                    self.out.push_str("return");
                    if let Some(arg) = args.first() {
                        self.out.push(' ');
                        self.emit_expr(arg, ExprContext::Normal)?;
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
                _ => {}
            }
        }
        self.emit_expr(expr, ExprContext::Normal)
    }

    fn emit_expr(&mut self, expr: &Expr, context: ExprContext) -> Result<(), Error> {
        match expr {
            Expr::Literal(literal) => {
                self.out.push_str(&format_literal(literal));
                Ok(())
            }
            Expr::Var(name) => {
                // The whole point of the context flag: sigil outside
                // expression-evaluation blocks, bare inside them.
                match context {
                    ExprContext::Normal => self.out.push_str(&format!("${}", name)),
                    ExprContext::InsideExpr => self.out.push_str(name),
                }
                Ok(())
            }
            Expr::StringInterp(parts) => {
                self.out.push('"');
                for part in parts {
                    match part {
                        InterpPart::Text(text) => self.out.push_str(&escape(text)),
                        InterpPart::Var(name) => self.out.push_str(&format!("${}", name)),
                    }
                }
                self.out.push('"');
                Ok(())
            }
            Expr::List(elements) => {
                self.out.push_str("[list");
                for element in elements {
                    self.out.push(' ');
                    self.emit_expr(element, ExprContext::Normal)?;
                }
                self.out.push(']');
                Ok(())
            }
            Expr::Dict(items) => {
                self.out.push_str("[dict create");
                for (key, value) in items {
                    self.out.push(' ');
                    self.emit_expr(key, ExprContext::Normal)?;
                    self.out.push(' ');
                    self.emit_expr(value, ExprContext::Normal)?;
                }
                self.out.push(']');
                Ok(())
            }
            Expr::ListComp {
                element,
                var,
                iterable,
                filter,
            } => {
                // Imperative loop into an implicit accumulator, wrapped in
                // command substitution.
                self.out.push_str("[list [foreach ");
                self.out.push_str(&foreach_vars(var));
                self.out.push(' ');
                self.emit_expr(iterable, ExprContext::Normal)?;
                self.out.push_str(" {");
                if let Some(filter) = filter {
                    self.out.push_str("if {");
                    self.emit_expr(filter, ExprContext::Normal)?;
                    self.out.push_str("} {");
                }
                self.out.push_str("lappend _result ");
                self.emit_expr(element, ExprContext::Normal)?;
                if filter.is_some() {
                    self.out.push('}');
                }
                self.out.push_str("}]]");
                Ok(())
            }
            Expr::DictComp {
                key,
                value,
                vars,
                iterable,
                filter,
            } => {
                self.out.push_str("[dict create [foreach {");
                self.out.push_str(&vars.replace(',', " "));
                self.out.push_str("} ");
                self.emit_expr(iterable, ExprContext::Normal)?;
                self.out.push_str(" {");
                if let Some(filter) = filter {
                    self.out.push_str("if {");
                    self.emit_expr(filter, ExprContext::Normal)?;
                    self.out.push_str("} {");
                }
                self.out.push_str("dict set _result ");
                self.emit_expr(key, ExprContext::Normal)?;
                self.out.push(' ');
                self.emit_expr(value, ExprContext::Normal)?;
                if filter.is_some() {
                    self.out.push('}');
                }
                self.out.push_str("}]]");
                Ok(())
            }
            Expr::Lambda { params, body } => {
                self.out.push_str("lambda");
                for param in params {
                    self.out.push(' ');
                    self.out.push_str(param);
                }
                self.out.push_str(" {");
                self.emit_expr(body, ExprContext::Normal)?;
                self.out.push('}');
                Ok(())
            }
            Expr::BinOp { left, op, right } => {
                self.out.push_str("[expr {");
                self.emit_expr(left, ExprContext::InsideExpr)?;
                self.out.push_str(&format!(" {} ", translate_op(op)));
                self.emit_expr(right, ExprContext::InsideExpr)?;
                self.out.push_str("}]");
                Ok(())
            }
            Expr::UnaryOp { op, operand } => {
                self.out.push_str("[expr {");
                self.out.push_str(translate_unary_op(op));
                self.emit_expr(operand, ExprContext::InsideExpr)?;
                self.out.push_str("}]");
                Ok(())
            }
            Expr::Call { name, args } => {
                self.out.push_str(name);
                for arg in args {
                    self.out.push(' ');
                    self.emit_expr(arg, ExprContext::Normal)?;
                }
                Ok(())
            }
            Expr::MethodCall { target, name, args } => match name.as_str() {
                n if n == GET_ITEM => {
                    self.out.push_str("[lindex ");
                    self.emit_expr(target, ExprContext::Normal)?;
                    for arg in args {
                        self.out.push(' ');
                        self.emit_expr(arg, ExprContext::Normal)?;
                    }
                    self.out.push(']');
                    Ok(())
                }
                n if n == SLICE => self.emit_slice(target, args),
                _ => {
                    // Namespace-style call with the target as the first
                    // word.
                    self.out.push_str(&format!("::{} ", name));
                    self.emit_expr(target, ExprContext::Normal)?;
                    for arg in args {
                        self.out.push(' ');
                        self.emit_expr(arg, ExprContext::Normal)?;
                    }
                    Ok(())
                }
            },
            Expr::Intrinsic { name, args } => self.emit_intrinsic(name, args),
        }
    }

    /// `a[start:end]` becomes `string range`; an absent start defaults to
    /// `0`, an absent end to `end`. The step is ignored by this backend.
    fn emit_slice(&mut self, target: &Expr, args: &[Expr]) -> Result<(), Error> {
        let [start, end, _step] = args else {
            return Err(Error::unsupported(
                "tcl backend: slice requires exactly (start, end, step)",
            ));
        };
        self.out.push_str("[string range ");
        self.emit_expr(target, ExprContext::Normal)?;
        self.out.push(' ');
        if is_absent(start) {
            self.out.push('0');
        } else {
            self.emit_expr(start, ExprContext::Normal)?;
        }
        self.out.push(' ');
        if is_absent(end) {
            self.out.push_str("end");
        } else {
            self.emit_expr(end, ExprContext::Normal)?;
        }
        self.out.push(']');
        Ok(())
    }

    /// The explicit intrinsic whitelist for this backend.
    fn emit_intrinsic(&mut self, name: &str, args: &[Expr]) -> Result<(), Error> {
        match name {
            "print" => {
                self.out.push_str("puts ");
                if args.len() == 1 {
                    self.emit_expr(&args[0], ExprContext::Normal)?;
                } else if args.len() > 1 {
                    self.out.push_str("[concat");
                    for arg in args {
                        self.out.push(' ');
                        self.emit_expr(arg, ExprContext::Normal)?;
                    }
                    self.out.push(']');
                } else {
                    self.out.push_str("\"\"");
                }
                Ok(())
            }
            "ternary" => {
                let [cond, when_true, when_false] = args else {
                    return Err(Error::unsupported(
                        "tcl backend: 'ternary' intrinsic requires exactly 3 arguments",
                    ));
                };
                self.out.push_str("[expr {");
                self.emit_expr(cond, ExprContext::InsideExpr)?;
                self.out.push_str(" ? ");
                self.emit_expr(when_true, ExprContext::InsideExpr)?;
                self.out.push_str(" : ");
                self.emit_expr(when_false, ExprContext::InsideExpr)?;
                self.out.push_str("}]");
                Ok(())
            }
            "raise" => {
                self.out.push_str("error ");
                if let Some(arg) = args.first() {
                    self.emit_expr(arg, ExprContext::Normal)?;
                } else {
                    self.out.push_str("\"\"");
                }
                Ok(())
            }
            "getattr" => match args {
                [target, Expr::Literal(Literal::Str(attr))] => {
                    self.out.push_str("getattr ");
                    self.emit_expr(target, ExprContext::Normal)?;
                    self.out.push_str(&format!(" \"{}\"", escape(attr)));
                    Ok(())
                }
                _ => Err(Error::unsupported(
                    "tcl backend: 'getattr' intrinsic requires (target, attribute name)",
                )),
            },
            "setattr" => match args {
                [target, Expr::Literal(Literal::Str(attr)), value] => {
                    self.out.push_str("setattr ");
                    self.emit_expr(target, ExprContext::Normal)?;
                    self.out.push_str(&format!(" \"{}\" ", escape(attr)));
                    self.emit_expr(value, ExprContext::Normal)?;
                    Ok(())
                }
                _ => Err(Error::unsupported(
                    "tcl backend: 'setattr' intrinsic requires (target, attribute name, value)",
                )),
            },
            "return" | "break" | "continue" => Err(Error::unsupported(format!(
                "tcl backend: '{}' intrinsic is only valid in statement position",
                name
            ))),
            other => Err(Error::unsupported(format!(
                "tcl backend: unknown intrinsic '{}'",
                other
            ))),
        }
    }
}

/// Multiple loop variables are brace-grouped for `foreach`.
fn foreach_vars(vars: &str) -> String {
    if vars.contains(',') {
        format!("{{{}}}", vars.replace(',', " "))
    } else {
        vars.to_string()
    }
}

/// Tcl's expression sublanguage wants symbolic operator spellings.
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
        Literal::None => "\"\"".to_string(),
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
        .replace('$', "\\$")
        .replace('\n', "\\n")
}
