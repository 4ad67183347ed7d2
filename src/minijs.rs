//! The regex-only MiniJS frontend, used for smoke testing the pipeline.
//!
//! It recognizes exactly one shape: a `console.log("...")` call, optionally
//! preceded by a single `//` comment line. The comment is captured and
//! threaded through as the statement's leading-comment annotation, so short
//! human context survives translation.

use regex::Regex;

use crate::error::Error;
use crate::ir::{Expr, Literal, Program, Stmt, StmtKind};
use crate::span::Span;

pub fn parse(source: &str) -> Result<Program, Error> {
    let pattern = Regex::new(
        r#"(?m)^\s*(?:(//[^\r\n]*)\s*)?console\.log\(\s*(?:"([^"]*)"|'([^']*)')\s*\)\s*;?\s*$"#,
    )
    .unwrap();

    let Some(captures) = pattern.captures(source) else {
        return Err(Error::parse(
            "mini-js frontend supports only: console.log(\"...\")",
            Span::new(0, source.len() as u32, 1, 1),
        )
        .with_help("optionally preceded by a single // comment line"));
    };

    let comment = captures
        .get(1)
        .map(|m| m.as_str().trim_start_matches('/').trim().to_string());
    let text = captures
        .get(2)
        .or_else(|| captures.get(3))
        .map(|m| m.as_str())
        .unwrap_or_default();

    Ok(Program {
        body: vec![Stmt::with_comment(
            StmtKind::Expr(Expr::Intrinsic {
                name: "print".to_string(),
                args: vec![Expr::Literal(Literal::Str(text.to_string()))],
            }),
            comment,
        )],
    })
}
