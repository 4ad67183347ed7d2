mod expr;
mod stmts;

#[cfg(test)]
mod tests;

use crate::error::Error;
use crate::ir::Program;
use crate::span::{Span, Spanned};
use crate::token::Tok;

/// Recursive-descent parser over the token stream.
///
/// Fail-fast: the first parse error aborts the entire translation. There is
/// no error recovery and no partial IR output.
pub(crate) struct Parser {
    tokens: Vec<Spanned<Tok>>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned<Tok>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn parse_program(mut self) -> Result<Program, Error> {
        let mut body = Vec::new();
        self.skip_newlines();
        while !self.at(&Tok::Eof) {
            if let Some(stmt) = self.parse_statement()? {
                body.push(stmt);
            }
            self.skip_newlines();
        }
        Ok(Program { body })
    }

    // --- Utility methods ---

    fn peek(&self) -> &Tok {
        &self.tokens[self.pos].node
    }

    /// Lookahead without consuming; `peek_at(0)` is the current token.
    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|t| &t.node)
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> &Spanned<Tok> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Tok) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Tok) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Tok) -> Result<Span, Error> {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        if let Tok::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(format!(
                "expected identifier, found {}",
                self.peek().description()
            )))
        }
    }

    fn error_here(&self, message: String) -> Error {
        Error::parse(message, self.current_span())
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Tok::Newline) {}
    }

    /// Consume the rest of the current logical line (used to drop import
    /// and decorator lines).
    fn skip_line(&mut self) {
        while !matches!(self.peek(), Tok::Newline | Tok::Eof) {
            self.advance();
        }
    }
}
