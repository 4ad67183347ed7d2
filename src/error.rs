use std::fmt;

use crate::span::Span;

/// A translation error (tokenize, parse, or unsupported construct).
///
/// Every translation either fully succeeds or fails with exactly one of
/// these; there is no recovery and no partial output.
#[derive(Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Source position for frontend errors. Emission errors have no span:
    /// the IR carries no source positions.
    pub span: Option<Span>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed lexical input: bad indentation, unterminated string,
    /// malformed number literal, stray character.
    Tokenize,
    /// Unexpected token versus an expectation.
    Parse,
    /// A well-formed IR node or intrinsic the selected backend does not
    /// implement.
    Unsupported,
}

impl Error {
    pub fn tokenize(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ErrorKind::Tokenize,
            message: message.into(),
            span: Some(span),
            help: None,
        }
    }

    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: message.into(),
            span: Some(span),
            help: None,
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error to stderr using ariadne. Errors without a span
    /// (emission errors) fall back to a plain line.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let Some(span) = self.span else {
            eprintln!("error: {}", self.message);
            if let Some(help) = &self.help {
                eprintln!("help: {}", help);
            }
            return;
        };

        let mut report = Report::build(ReportKind::Error, filename, span.start as usize)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, span.start as usize..span.end as usize))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        report
            .finish()
            .eprint((filename, Source::from(source)))
            .ok();
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Tokenize => "tokenize error",
            ErrorKind::Parse => "parse error",
            ErrorKind::Unsupported => "unsupported construct",
        };
        match self.span {
            Some(span) => write!(
                f,
                "{} at line {}, column {}: {}",
                kind, span.line, span.column, self.message
            ),
            None => write!(f, "{}: {}", kind, self.message),
        }
    }
}

impl std::error::Error for Error {}
