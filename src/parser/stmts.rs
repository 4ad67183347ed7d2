use crate::error::Error;
use crate::ir::{ExceptClause, Expr, Literal, Stmt, StmtKind};
use crate::token::Tok;

use super::Parser;

impl Parser {
    /// Parse one statement. Returns `None` for lines that are consumed but
    /// produce no IR (imports, decorators).
    pub(super) fn parse_statement(&mut self) -> Result<Option<Stmt>, Error> {
        self.skip_newlines();

        match self.peek() {
            Tok::If => Ok(Some(self.parse_if()?)),
            Tok::For => Ok(Some(self.parse_for()?)),
            Tok::While => Ok(Some(self.parse_while()?)),
            Tok::Def => Ok(Some(self.parse_def()?)),
            Tok::Class => Ok(Some(self.parse_class()?)),
            Tok::Try => Ok(Some(self.parse_try()?)),
            Tok::Pass => {
                self.advance();
                Ok(Some(Stmt::new(StmtKind::Pass)))
            }
            Tok::Return => {
                self.advance();
                let args = if matches!(self.peek(), Tok::Newline | Tok::Eof | Tok::Dedent) {
                    Vec::new()
                } else {
                    vec![self.parse_expression()?]
                };
                Ok(Some(Stmt::new(StmtKind::Expr(Expr::Intrinsic {
                    name: "return".to_string(),
                    args,
                }))))
            }
            Tok::Break => {
                self.advance();
                Ok(Some(Stmt::new(StmtKind::Expr(Expr::Intrinsic {
                    name: "break".to_string(),
                    args: Vec::new(),
                }))))
            }
            Tok::Continue => {
                self.advance();
                Ok(Some(Stmt::new(StmtKind::Expr(Expr::Intrinsic {
                    name: "continue".to_string(),
                    args: Vec::new(),
                }))))
            }
            Tok::Raise => {
                self.advance();
                let args = if matches!(self.peek(), Tok::Newline | Tok::Eof | Tok::Dedent) {
                    Vec::new()
                } else {
                    vec![self.parse_expression()?]
                };
                Ok(Some(Stmt::new(StmtKind::Expr(Expr::Intrinsic {
                    name: "raise".to_string(),
                    args,
                }))))
            }
            // Imports and decorators carry no cross-language meaning here;
            // consume the line and move on.
            Tok::Import | Tok::From | Tok::At => {
                self.skip_line();
                Ok(None)
            }
            Tok::Ident(_) => self.parse_assignment_or_expr().map(Some),
            Tok::LParen if self.at_tuple_assignment() => self.parse_tuple_assignment().map(Some),
            _ => {
                let expr = self.parse_expression()?;
                Ok(Some(Stmt::new(StmtKind::Expr(expr))))
            }
        }
    }

    /// Assignment is detected by lookahead: identifier followed by `=` or
    /// an augmented-assignment token, or identifier-dot-identifier followed
    /// by the same. Anything else is a bare expression statement.
    fn parse_assignment_or_expr(&mut self) -> Result<Stmt, Error> {
        let next_aug = self.peek_at(1).and_then(aug_op);
        match self.peek_at(1) {
            Some(Tok::Eq) => {
                let name = self.expect_ident()?;
                self.expect(&Tok::Eq)?;
                let value = self.parse_expression()?;
                return Ok(Stmt::new(StmtKind::Assign { name, value }));
            }
            _ if next_aug.is_some() => {
                let name = self.expect_ident()?;
                let op = next_aug.unwrap_or("+").to_string();
                self.advance();
                let value = self.parse_expression()?;
                // Lowered at parse time into `x = x OP y`.
                return Ok(Stmt::new(StmtKind::Assign {
                    name: name.clone(),
                    value: Expr::BinOp {
                        left: Box::new(Expr::Var(name)),
                        op,
                        right: Box::new(value),
                    },
                }));
            }
            Some(Tok::Dot) => {
                let is_attr_assign = matches!(self.peek_at(2), Some(Tok::Ident(_)))
                    && matches!(
                        self.peek_at(3),
                        Some(Tok::Eq)
                            | Some(Tok::PlusEq)
                            | Some(Tok::MinusEq)
                            | Some(Tok::StarEq)
                            | Some(Tok::SlashEq)
                    );
                if is_attr_assign {
                    return self.parse_attribute_assignment();
                }
            }
            _ => {}
        }

        let expr = self.parse_expression()?;
        Ok(Stmt::new(StmtKind::Expr(expr)))
    }

    /// `obj.attr = value` and `obj.attr op= value`, lowered into the
    /// getattr/setattr intrinsic pair. The augmented form duplicates the
    /// get operation; see the double-evaluation test in the suite.
    fn parse_attribute_assignment(&mut self) -> Result<Stmt, Error> {
        let obj = self.expect_ident()?;
        self.expect(&Tok::Dot)?;
        let attr = self.expect_ident()?;

        let attr_literal = Expr::Literal(Literal::Str(attr.clone()));
        let new_value = if self.eat(&Tok::Eq) {
            self.parse_expression()?
        } else {
            let op = aug_op(self.peek()).unwrap_or("+").to_string();
            self.advance();
            let rhs = self.parse_expression()?;
            Expr::BinOp {
                left: Box::new(Expr::Intrinsic {
                    name: "getattr".to_string(),
                    args: vec![Expr::Var(obj.clone()), attr_literal.clone()],
                }),
                op,
                right: Box::new(rhs),
            }
        };

        Ok(Stmt::new(StmtKind::Expr(Expr::Intrinsic {
            name: "setattr".to_string(),
            args: vec![Expr::Var(obj), attr_literal, new_value],
        })))
    }

    /// Lookahead for `(a, b, ...) = value` without consuming anything.
    fn at_tuple_assignment(&self) -> bool {
        if !self.at(&Tok::LParen) {
            return false;
        }
        let mut i = self.pos + 1;
        let mut saw_ident = false;
        loop {
            match self.tokens.get(i).map(|t| &t.node) {
                Some(Tok::Ident(_)) => {
                    saw_ident = true;
                    i += 1;
                }
                _ => return false,
            }
            match self.tokens.get(i).map(|t| &t.node) {
                Some(Tok::Comma) => i += 1,
                Some(Tok::RParen) => {
                    i += 1;
                    break;
                }
                _ => return false,
            }
        }
        saw_ident && matches!(self.tokens.get(i).map(|t| &t.node), Some(Tok::Eq))
    }

    fn parse_tuple_assignment(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::LParen)?;
        let mut names = vec![self.expect_ident()?];
        while self.eat(&Tok::Comma) {
            names.push(self.expect_ident()?);
        }
        self.expect(&Tok::RParen)?;
        self.expect(&Tok::Eq)?;
        let value = self.parse_expression()?;
        Ok(Stmt::new(StmtKind::TupleAssign { names, value }))
    }

    /// Parse an `if`/`elif` statement; the leading keyword has already been
    /// checked and may be either.
    fn parse_if(&mut self) -> Result<Stmt, Error> {
        self.advance(); // 'if' or 'elif'
        let cond = self.parse_expression()?;
        self.expect(&Tok::Colon)?;
        let then_body = self.parse_indented_block()?;

        let else_body = if self.at(&Tok::Elif) {
            // An elif chain nests as a single-statement else branch.
            Some(vec![self.parse_if()?])
        } else if self.eat(&Tok::Else) {
            self.expect(&Tok::Colon)?;
            Some(self.parse_indented_block()?)
        } else {
            None
        };

        Ok(Stmt::new(StmtKind::If {
            cond,
            then_body,
            else_body,
        }))
    }

    fn parse_for(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::For)?;
        let var = self.parse_loop_vars()?;
        self.expect(&Tok::In)?;
        let iterable = self.parse_expression()?;
        self.expect(&Tok::Colon)?;
        let body = self.parse_indented_block()?;
        Ok(Stmt::new(StmtKind::ForEach {
            var,
            iterable,
            body,
        }))
    }

    fn parse_while(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::While)?;
        let cond = self.parse_expression()?;
        self.expect(&Tok::Colon)?;
        let body = self.parse_indented_block()?;
        Ok(Stmt::new(StmtKind::While { cond, body }))
    }

    fn parse_def(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::Def)?;
        let name = self.expect_ident()?;
        self.expect(&Tok::LParen)?;
        let mut params = Vec::new();
        if !self.at(&Tok::RParen) {
            params.push(self.expect_ident()?);
            while self.eat(&Tok::Comma) {
                params.push(self.expect_ident()?);
            }
        }
        self.expect(&Tok::RParen)?;
        self.expect(&Tok::Colon)?;
        let body = self.parse_indented_block()?;
        Ok(Stmt::new(StmtKind::FnDef { name, params, body }))
    }

    fn parse_class(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::Class)?;
        let name = self.expect_ident()?;
        let base = if self.eat(&Tok::LParen) {
            let base = self.expect_ident()?;
            self.expect(&Tok::RParen)?;
            Some(base)
        } else {
            None
        };
        self.expect(&Tok::Colon)?;
        let body = self.parse_indented_block()?;
        Ok(Stmt::new(StmtKind::ClassDef { name, base, body }))
    }

    fn parse_try(&mut self) -> Result<Stmt, Error> {
        self.expect(&Tok::Try)?;
        self.expect(&Tok::Colon)?;
        let body = self.parse_indented_block()?;

        let mut handlers = Vec::new();
        while self.at(&Tok::Except) {
            self.advance();
            let exc_type = if let Tok::Ident(_) = self.peek() {
                Some(self.expect_ident()?)
            } else {
                None
            };
            let binding = if self.eat(&Tok::As) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            self.expect(&Tok::Colon)?;
            let handler_body = self.parse_indented_block()?;
            handlers.push(ExceptClause {
                exc_type,
                binding,
                body: handler_body,
            });
        }

        let finally = if self.eat(&Tok::Finally) {
            self.expect(&Tok::Colon)?;
            Some(self.parse_indented_block()?)
        } else {
            None
        };

        Ok(Stmt::new(StmtKind::Try {
            body,
            handlers,
            finally,
        }))
    }

    /// One or more comma-separated loop variable names, joined for storage
    /// as a single delimited string (`"k,v"`).
    pub(super) fn parse_loop_vars(&mut self) -> Result<String, Error> {
        let mut vars = self.expect_ident()?;
        while self.eat(&Tok::Comma) {
            vars.push(',');
            vars.push_str(&self.expect_ident()?);
        }
        Ok(vars)
    }

    /// `NEWLINE INDENT stmt+ DEDENT` after a block-introducing colon.
    fn parse_indented_block(&mut self) -> Result<Vec<Stmt>, Error> {
        self.skip_newlines();
        if !self.at(&Tok::Indent) {
            return Err(self
                .error_here(format!(
                    "expected an indented block, found {}",
                    self.peek().description()
                ))
                .with_help("block bodies are indented by 4 spaces".to_string()));
        }
        self.advance();

        let mut body = Vec::new();
        while !self.at(&Tok::Dedent) && !self.at(&Tok::Eof) {
            self.skip_newlines();
            if self.at(&Tok::Dedent) || self.at(&Tok::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement()? {
                body.push(stmt);
            }
            self.skip_newlines();
        }
        self.eat(&Tok::Dedent);
        Ok(body)
    }
}

fn aug_op(tok: &Tok) -> Option<&'static str> {
    match tok {
        Tok::PlusEq => Some("+"),
        Tok::MinusEq => Some("-"),
        Tok::StarEq => Some("*"),
        Tok::SlashEq => Some("/"),
        _ => None,
    }
}
