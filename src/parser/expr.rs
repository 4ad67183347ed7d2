use crate::error::Error;
use crate::ir::{Expr, InterpPart, Literal, GET_ITEM, SLICE};
use crate::token::Tok;

use super::Parser;

impl Parser {
    /// Full expression, including the trailing `a if cond else b` ternary
    /// form, which is not a dedicated node kind: it parses into the
    /// `ternary(condition, trueExpr, falseExpr)` intrinsic and defers all
    /// target-specific rendering to the emitter.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_or()?;
        if self.at(&Tok::If) {
            self.advance();
            let cond = self.parse_or()?;
            self.expect(&Tok::Else)?;
            let orelse = self.parse_expression()?;
            return Ok(Expr::Intrinsic {
                name: "ternary".to_string(),
                args: vec![cond, expr, orelse],
            });
        }
        Ok(expr)
    }

    // --- Precedence chain, lowest binding first. Each level is one
    // function calling the next-tighter level. ---

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_and()?;
        while self.eat(&Tok::Or) {
            let right = self.parse_and()?;
            expr = binop(expr, "or", right);
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_comparison()?;
        while self.eat(&Tok::And) {
            let right = self.parse_comparison()?;
            expr = binop(expr, "and", right);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Tok::EqEq => "==",
                Tok::NotEq => "!=",
                Tok::Lt => "<",
                Tok::Gt => ">",
                Tok::LtEq => "<=",
                Tok::GtEq => ">=",
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = binop(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Tok::Plus => "+",
                Tok::Minus => "-",
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = binop(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_bit_or()?;
        loop {
            let op = match self.peek() {
                Tok::Star => "*",
                Tok::Slash => "/",
                Tok::Percent => "%",
                Tok::SlashSlash => "//",
                Tok::StarStar => "**",
                _ => break,
            };
            self.advance();
            let right = self.parse_bit_or()?;
            expr = binop(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_bit_or(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_bit_xor()?;
        while self.eat(&Tok::Pipe) {
            let right = self.parse_bit_xor()?;
            expr = binop(expr, "|", right);
        }
        Ok(expr)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_bit_and()?;
        while self.eat(&Tok::Caret) {
            let right = self.parse_bit_and()?;
            expr = binop(expr, "^", right);
        }
        Ok(expr)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_shift()?;
        while self.eat(&Tok::Amp) {
            let right = self.parse_shift()?;
            expr = binop(expr, "&", right);
        }
        Ok(expr)
    }

    fn parse_shift(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Tok::Shl => "<<",
                Tok::Shr => ">>",
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = binop(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let op = match self.peek() {
            Tok::Not => "not",
            Tok::Minus => "-",
            Tok::Tilde => "~",
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::UnaryOp {
            op: op.to_string(),
            operand: Box::new(operand),
        })
    }

    /// Postfix forms: `.name` (attribute read or method call), `(...)`
    /// (call on a bare name), `[...]` (indexing, or slicing when a `:`
    /// appears inside the brackets).
    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(&Tok::Dot) {
                let name = self.expect_ident()?;
                if self.eat(&Tok::LParen) {
                    let args = self.parse_arguments()?;
                    self.expect(&Tok::RParen)?;
                    expr = Expr::MethodCall {
                        target: Box::new(expr),
                        name,
                        args,
                    };
                } else {
                    expr = Expr::Intrinsic {
                        name: "getattr".to_string(),
                        args: vec![expr, Expr::Literal(Literal::Str(name))],
                    };
                }
            } else if self.at(&Tok::LParen) && matches!(expr, Expr::Var(_)) {
                self.advance();
                let args = self.parse_arguments()?;
                self.expect(&Tok::RParen)?;
                let name = match expr {
                    Expr::Var(name) => name,
                    _ => unreachable!(),
                };
                // print-like output has no common grammar production;
                // route it through the intrinsic escape hatch.
                expr = if name == "print" {
                    Expr::Intrinsic {
                        name: "print".to_string(),
                        args,
                    }
                } else {
                    Expr::Call { name, args }
                };
            } else if self.eat(&Tok::LBracket) {
                expr = self.parse_index_or_slice(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// After `[`: plain indexing unless a `:` shows up, in which case up to
    /// three optional sub-expressions (start, end, step), each defaulting
    /// to absent when omitted.
    fn parse_index_or_slice(&mut self, target: Expr) -> Result<Expr, Error> {
        let start = if self.at(&Tok::Colon) {
            Expr::Literal(Literal::None)
        } else {
            self.parse_expression()?
        };

        if !self.eat(&Tok::Colon) {
            self.expect(&Tok::RBracket)?;
            return Ok(Expr::MethodCall {
                target: Box::new(target),
                name: GET_ITEM.to_string(),
                args: vec![start],
            });
        }

        let end = if matches!(self.peek(), Tok::RBracket | Tok::Colon) {
            Expr::Literal(Literal::None)
        } else {
            self.parse_expression()?
        };
        let step = if self.eat(&Tok::Colon) {
            if self.at(&Tok::RBracket) {
                Expr::Literal(Literal::None)
            } else {
                self.parse_expression()?
            }
        } else {
            Expr::Literal(Literal::None)
        };
        self.expect(&Tok::RBracket)?;

        Ok(Expr::MethodCall {
            target: Box::new(target),
            name: SLICE.to_string(),
            args: vec![start, end, step],
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        match self.peek().clone() {
            Tok::Number(text) => {
                let span = self.current_span();
                self.advance();
                if text.contains('.') {
                    let value = text.parse::<f64>().map_err(|_| {
                        Error::parse(format!("malformed number literal '{}'", text), span)
                    })?;
                    Ok(Expr::Literal(Literal::Float(value)))
                } else {
                    let value = text.parse::<i64>().map_err(|_| {
                        Error::parse(format!("number literal '{}' is too large", text), span)
                    })?;
                    Ok(Expr::Literal(Literal::Int(value)))
                }
            }
            Tok::Str(text) => {
                self.advance();
                Ok(Expr::Literal(Literal::Str(text)))
            }
            Tok::FStr(text) => {
                self.advance();
                Ok(Expr::StringInterp(split_interpolation(&text)))
            }
            Tok::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            Tok::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            Tok::None => {
                self.advance();
                Ok(Expr::Literal(Literal::None))
            }
            Tok::Ident(name) => {
                self.advance();
                Ok(Expr::Var(name))
            }
            Tok::Lambda => self.parse_lambda(),
            Tok::LParen => self.parse_paren(),
            Tok::LBracket => self.parse_list_or_comprehension(),
            Tok::LBrace => self.parse_dict_or_comprehension(),
            other => Err(self.error_here(format!(
                "expected an expression, found {}",
                other.description()
            ))),
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr, Error> {
        self.expect(&Tok::Lambda)?;
        let mut params = Vec::new();
        if !self.at(&Tok::Colon) {
            params.push(self.expect_ident()?);
            while self.eat(&Tok::Comma) {
                params.push(self.expect_ident()?);
            }
        }
        self.expect(&Tok::Colon)?;
        let body = self.parse_expression()?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// A parenthesized expression, or a tuple expression, which is stored
    /// as a list literal: its faithful rendering per target is
    /// list-then-index anyway.
    fn parse_paren(&mut self) -> Result<Expr, Error> {
        self.expect(&Tok::LParen)?;
        let first = self.parse_expression()?;
        if self.at(&Tok::Comma) {
            let mut elements = vec![first];
            while self.eat(&Tok::Comma) {
                if self.at(&Tok::RParen) {
                    break;
                }
                elements.push(self.parse_expression()?);
            }
            self.expect(&Tok::RParen)?;
            return Ok(Expr::List(elements));
        }
        self.expect(&Tok::RParen)?;
        Ok(first)
    }

    /// `[...]`: a list literal, unless a `for` follows the first element,
    /// which switches to comprehension parsing instead.
    fn parse_list_or_comprehension(&mut self) -> Result<Expr, Error> {
        self.expect(&Tok::LBracket)?;
        if self.eat(&Tok::RBracket) {
            return Ok(Expr::List(Vec::new()));
        }

        let first = self.parse_expression()?;

        if self.eat(&Tok::For) {
            let var = self.parse_loop_vars()?;
            self.expect(&Tok::In)?;
            let iterable = self.parse_expression()?;
            let filter = if self.eat(&Tok::If) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(&Tok::RBracket)?;
            return Ok(Expr::ListComp {
                element: Box::new(first),
                var,
                iterable: Box::new(iterable),
                filter,
            });
        }

        let mut elements = vec![first];
        while self.eat(&Tok::Comma) {
            if self.at(&Tok::RBracket) {
                break;
            }
            elements.push(self.parse_expression()?);
        }
        self.expect(&Tok::RBracket)?;
        Ok(Expr::List(elements))
    }

    /// `{...}`: a dictionary literal (ordered pairs), unless a `for`
    /// follows the first key-value pair.
    fn parse_dict_or_comprehension(&mut self) -> Result<Expr, Error> {
        self.expect(&Tok::LBrace)?;
        if self.eat(&Tok::RBrace) {
            return Ok(Expr::Dict(Vec::new()));
        }

        let key = self.parse_expression()?;
        self.expect(&Tok::Colon)?;
        let value = self.parse_expression()?;

        if self.eat(&Tok::For) {
            let vars = self.parse_loop_vars()?;
            self.expect(&Tok::In)?;
            let iterable = self.parse_expression()?;
            let filter = if self.eat(&Tok::If) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(&Tok::RBrace)?;
            return Ok(Expr::DictComp {
                key: Box::new(key),
                value: Box::new(value),
                vars,
                iterable: Box::new(iterable),
                filter,
            });
        }

        let mut items = vec![(key, value)];
        while self.eat(&Tok::Comma) {
            if self.at(&Tok::RBrace) {
                break;
            }
            let key = self.parse_expression()?;
            self.expect(&Tok::Colon)?;
            let value = self.parse_expression()?;
            items.push((key, value));
        }
        self.expect(&Tok::RBrace)?;
        Ok(Expr::Dict(items))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, Error> {
        let mut args = Vec::new();
        if self.at(&Tok::RParen) {
            return Ok(args);
        }
        args.push(self.parse_expression()?);
        while self.eat(&Tok::Comma) {
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }
}

fn binop(left: Expr, op: &str, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op: op.to_string(),
        right: Box::new(right),
    }
}

/// Split the raw text of an interpolated string into literal-text parts and
/// `{name}` variable-reference parts.
fn split_interpolation(raw: &str) -> Vec<InterpPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            let mut name = String::new();
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '}' {
                    closed = true;
                    break;
                }
                name.push(inner);
            }
            if closed {
                if !text.is_empty() {
                    parts.push(InterpPart::Text(std::mem::take(&mut text)));
                }
                parts.push(InterpPart::Var(name.trim().to_string()));
            } else {
                // No closing brace; keep the text as-is.
                text.push('{');
                text.push_str(&name);
            }
        } else {
            text.push(ch);
        }
    }
    if !text.is_empty() {
        parts.push(InterpPart::Text(text));
    }
    parts
}
