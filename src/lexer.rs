use crate::error::Error;
use crate::span::{Span, Spanned};
use crate::token::Tok;

/// Spaces per indentation level.
const INDENT_UNIT: u32 = 4;

/// Indentation-sensitive tokenizer for the Python-dialect frontend.
///
/// Fail-fast: the first lexical error aborts the whole translation.
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
    /// Indent levels currently open. Seeded at 0 and scoped to this one
    /// tokenize call.
    indent_stack: Vec<u32>,
    tokens: Vec<Spanned<Tok>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            indent_stack: vec![0],
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned<Tok>>, Error> {
        while self.pos < self.source.len() {
            self.skip_spaces();
            if self.pos >= self.source.len() {
                break;
            }

            let ch = self.source[self.pos];

            if ch == b'\n' {
                self.push_at(Tok::Newline, self.pos, self.pos + 1);
                self.pos += 1;
                self.line += 1;
                self.col = 1;
                self.handle_indentation()?;
                continue;
            }

            if ch == b'#' {
                self.skip_comment();
                continue;
            }

            if ch == b'f' && matches!(self.peek_ahead(1), Some(b'"') | Some(b'\'')) {
                self.scan_fstring()?;
                continue;
            }

            if ch == b'"' || ch == b'\'' {
                self.scan_string(ch)?;
                continue;
            }

            if ch.is_ascii_digit() {
                self.scan_number()?;
                continue;
            }

            if is_ident_start(ch) {
                self.scan_ident_or_keyword();
                continue;
            }

            self.scan_operator()?;
        }

        // Close any indentation levels still open at end of input.
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push_at(Tok::Dedent, self.pos, self.pos);
        }
        self.push_at(Tok::Eof, self.pos, self.pos);
        Ok(self.tokens)
    }

    /// Skip spaces, tabs, and carriage returns, but not newlines.
    fn skip_spaces(&mut self) {
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b' ' | b'\t' | b'\r' => {
                    self.pos += 1;
                    self.col += 1;
                }
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
            self.col += 1;
        }
    }

    /// Compare the new line's leading spaces against the indent stack and
    /// synthesize INDENT/DEDENT tokens for the depth delta. Blank and
    /// comment-only lines are not logical lines and leave the stack alone.
    fn handle_indentation(&mut self) -> Result<(), Error> {
        let start = self.pos;
        let mut spaces: u32 = 0;
        while self.pos < self.source.len() && self.source[self.pos] == b' ' {
            spaces += 1;
            self.pos += 1;
        }
        self.col = spaces + 1;

        match self.source.get(self.pos) {
            Option::None | Some(b'\n') | Some(b'\r') | Some(b'#') => return Ok(()),
            _ => {}
        }

        if spaces % INDENT_UNIT != 0 {
            return Err(Error::tokenize(
                format!(
                    "indentation of {} spaces is not a multiple of the {}-space indent unit",
                    spaces, INDENT_UNIT
                ),
                Span::new(start as u32, self.pos as u32, self.line, 1),
            ));
        }

        let level = spaces / INDENT_UNIT;
        let mut current = self.indent_stack.last().copied().unwrap_or(0);

        if level > current {
            for opened in current + 1..=level {
                self.indent_stack.push(opened);
                self.push_at(Tok::Indent, start, self.pos);
            }
        } else {
            while level < current {
                self.indent_stack.pop();
                self.push_at(Tok::Dedent, start, self.pos);
                current = self.indent_stack.last().copied().unwrap_or(0);
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, quote: u8) -> Result<(), Error> {
        let (start, line, col) = (self.pos, self.line, self.col);
        self.pos += 1;
        self.col += 1;
        let text = self.scan_quoted(quote, start, line, col)?;
        self.push_span(Tok::Str(text), start, line, col);
        Ok(())
    }

    fn scan_fstring(&mut self) -> Result<(), Error> {
        let (start, line, col) = (self.pos, self.line, self.col);
        self.pos += 1; // 'f'
        self.col += 1;
        let quote = self.source[self.pos];
        self.pos += 1;
        self.col += 1;
        let text = self.scan_quoted(quote, start, line, col)?;
        self.push_span(Tok::FStr(text), start, line, col);
        Ok(())
    }

    /// Scan the body of a string literal up to the closing quote, decoding
    /// the escape sequences `\n \t \r \\ \" \'`. Running out of input is an
    /// unterminated-string error.
    fn scan_quoted(&mut self, quote: u8, start: usize, line: u32, col: u32) -> Result<String, Error> {
        let mut bytes = Vec::new();
        loop {
            match self.source.get(self.pos).copied() {
                Option::None => {
                    return Err(Error::tokenize(
                        "unterminated string literal",
                        Span::new(start as u32, self.pos as u32, line, col),
                    ));
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    self.col += 1;
                    break;
                }
                Some(b'\\') if self.pos + 1 < self.source.len() => {
                    let escaped = self.source[self.pos + 1];
                    bytes.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        b'\\' => b'\\',
                        b'"' => b'"',
                        b'\'' => b'\'',
                        other => other,
                    });
                    self.pos += 2;
                    self.col += 2;
                }
                Some(b) => {
                    bytes.push(b);
                    self.pos += 1;
                    if b == b'\n' {
                        self.line += 1;
                        self.col = 1;
                    } else {
                        self.col += 1;
                    }
                }
            }
        }
        // Only whole bytes of the UTF-8 input (plus ASCII escapes) are
        // copied, so this cannot fail.
        Ok(String::from_utf8(bytes).unwrap())
    }

    /// Maximal run of digits and `.` characters. More than one `.` is a
    /// malformed literal.
    fn scan_number(&mut self) -> Result<(), Error> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let mut dots = 0;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'0'..=b'9' => {}
                b'.' => dots += 1,
                _ => break,
            }
            self.pos += 1;
            self.col += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap()
            .to_string();
        if dots > 1 {
            return Err(Error::tokenize(
                format!("malformed number literal '{}'", text),
                Span::new(start as u32, self.pos as u32, line, col),
            ));
        }
        self.push_span(Tok::Number(text), start, line, col);
        Ok(())
    }

    fn scan_ident_or_keyword(&mut self) {
        let (start, line, col) = (self.pos, self.line, self.col);
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
            self.col += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        let tok = Tok::from_keyword(text).unwrap_or_else(|| Tok::Ident(text.to_string()));
        self.push_span(tok, start, line, col);
    }

    /// Maximal munch: try every two-character operator spelling before
    /// falling back to single characters.
    fn scan_operator(&mut self) -> Result<(), Error> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let ch = self.source[self.pos];

        if let Some(next) = self.peek_ahead(1) {
            let two = match (ch, next) {
                (b'=', b'=') => Some(Tok::EqEq),
                (b'!', b'=') => Some(Tok::NotEq),
                (b'<', b'=') => Some(Tok::LtEq),
                (b'>', b'=') => Some(Tok::GtEq),
                (b'+', b'=') => Some(Tok::PlusEq),
                (b'-', b'=') => Some(Tok::MinusEq),
                (b'*', b'=') => Some(Tok::StarEq),
                (b'/', b'=') => Some(Tok::SlashEq),
                (b'*', b'*') => Some(Tok::StarStar),
                (b'/', b'/') => Some(Tok::SlashSlash),
                (b'<', b'<') => Some(Tok::Shl),
                (b'>', b'>') => Some(Tok::Shr),
                _ => Option::None,
            };
            if let Some(tok) = two {
                self.pos += 2;
                self.col += 2;
                self.push_span(tok, start, line, col);
                return Ok(());
            }
        }

        let tok = match ch {
            b'(' => Tok::LParen,
            b')' => Tok::RParen,
            b'[' => Tok::LBracket,
            b']' => Tok::RBracket,
            b'{' => Tok::LBrace,
            b'}' => Tok::RBrace,
            b',' => Tok::Comma,
            b':' => Tok::Colon,
            b';' => Tok::Semicolon,
            b'.' => Tok::Dot,
            b'@' => Tok::At,
            b'=' => Tok::Eq,
            b'+' => Tok::Plus,
            b'-' => Tok::Minus,
            b'*' => Tok::Star,
            b'/' => Tok::Slash,
            b'%' => Tok::Percent,
            b'<' => Tok::Lt,
            b'>' => Tok::Gt,
            b'&' => Tok::Amp,
            b'|' => Tok::Pipe,
            b'^' => Tok::Caret,
            b'~' => Tok::Tilde,
            _ => {
                return Err(Error::tokenize(
                    format!("unexpected character '{}'", ch as char),
                    Span::new(start as u32, start as u32 + 1, line, col),
                ));
            }
        };
        self.pos += 1;
        self.col += 1;
        self.push_span(tok, start, line, col);
        Ok(())
    }

    fn peek_ahead(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn push_span(&mut self, tok: Tok, start: usize, line: u32, col: u32) {
        self.tokens.push(Spanned::new(
            tok,
            Span::new(start as u32, self.pos as u32, line, col),
        ));
    }

    fn push_at(&mut self, tok: Tok, start: usize, end: usize) {
        self.tokens.push(Spanned::new(
            tok,
            Span::new(start as u32, end as u32, self.line, self.col),
        ));
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn lex(source: &str) -> Vec<Tok> {
        Lexer::new(source)
            .tokenize()
            .expect("unexpected lex error")
            .into_iter()
            .map(|t| t.node)
            .collect()
    }

    fn lex_err(source: &str) -> Error {
        Lexer::new(source).tokenize().expect_err("expected lex error")
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = lex("if else for while def class foo bar_baz _x");
        assert_eq!(
            tokens,
            vec![
                Tok::If,
                Tok::Else,
                Tok::For,
                Tok::While,
                Tok::Def,
                Tok::Class,
                Tok::Ident("foo".into()),
                Tok::Ident("bar_baz".into()),
                Tok::Ident("_x".into()),
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators_win_over_single() {
        let tokens = lex("== != <= >= += -= *= /= ** // << >>");
        assert_eq!(
            tokens,
            vec![
                Tok::EqEq,
                Tok::NotEq,
                Tok::LtEq,
                Tok::GtEq,
                Tok::PlusEq,
                Tok::MinusEq,
                Tok::StarEq,
                Tok::SlashEq,
                Tok::StarStar,
                Tok::SlashSlash,
                Tok::Shl,
                Tok::Shr,
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#"x = "a\tb\n\"c\"""#);
        assert_eq!(tokens[2], Tok::Str("a\tb\n\"c\"".into()));
    }

    #[test]
    fn test_single_quoted_string() {
        let tokens = lex("x = 'hello'");
        assert_eq!(tokens[2], Tok::Str("hello".into()));
    }

    #[test]
    fn test_fstring_token() {
        let tokens = lex(r#"f"hi {name}!""#);
        assert_eq!(tokens[0], Tok::FStr("hi {name}!".into()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("x = \"oops");
        assert_eq!(err.kind, ErrorKind::Tokenize);
        assert!(err.message.contains("unterminated"));
        assert_eq!(err.span.unwrap().line, 1);
    }

    #[test]
    fn test_number_with_two_dots_is_an_error() {
        let err = lex_err("x = 1.2.3");
        assert_eq!(err.kind, ErrorKind::Tokenize);
        assert!(err.message.contains("1.2.3"));
    }

    #[test]
    fn test_indent_dedent_counts_match_depth_delta() {
        let source = "if a:\n    if b:\n        x = 1\ny = 2\n";
        let tokens = lex(source);
        let indents = tokens.iter().filter(|t| **t == Tok::Indent).count();
        let dedents = tokens.iter().filter(|t| **t == Tok::Dedent).count();
        assert_eq!(indents, 2);
        // Dropping from depth 2 back to 0 emits one DEDENT per level lost.
        assert_eq!(dedents, 2);
    }

    #[test]
    fn test_blank_lines_do_not_emit_dedents() {
        let source = "if a:\n    x = 1\n\n    y = 2\n";
        let tokens = lex(source);
        let dedents = tokens.iter().filter(|t| **t == Tok::Dedent).count();
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_comment_only_lines_do_not_touch_indentation() {
        let source = "if a:\n    x = 1\n# top comment\n    y = 2\n";
        let tokens = lex(source);
        let dedents = tokens.iter().filter(|t| **t == Tok::Dedent).count();
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_ragged_indentation_is_an_error() {
        let err = lex_err("if a:\n   x = 1\n");
        assert_eq!(err.kind, ErrorKind::Tokenize);
        assert!(err.message.contains("indent"));
    }

    #[test]
    fn test_comments_are_discarded() {
        let tokens = lex("x = 1  # trailing note\n");
        assert_eq!(
            tokens,
            vec![
                Tok::Ident("x".into()),
                Tok::Eq,
                Tok::Number("1".into()),
                Tok::Newline,
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn test_line_and_column_positions() {
        let tokens = Lexer::new("x = 1\ny = 2\n").tokenize().unwrap();
        let y = tokens
            .iter()
            .find(|t| t.node == Tok::Ident("y".into()))
            .unwrap();
        assert_eq!(y.span.line, 2);
        assert_eq!(y.span.column, 1);
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_err("x = 1 ?");
        assert_eq!(err.kind, ErrorKind::Tokenize);
        assert!(err.message.contains('?'));
    }
}
