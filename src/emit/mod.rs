pub mod c;
pub mod python;
pub mod tcl;


use crate::error::Error;
use crate::ir::Program;

/// A target language tag. Exactly one emitter runs per translation
/// request; the IR is handed to it read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Python,
    C,
    Tcl,
}

impl Target {
    pub fn from_tag(tag: &str) -> Option<Target> {
        match tag {
            "python" | "py" => Some(Target::Python),
            "c" => Some(Target::C),
            "tcl" => Some(Target::Tcl),
            _ => None,
        }
    }
}

/// Emit the program as source text in the target language.
///
/// Pure function of the IR: the same tree emits byte-identical text. Any
/// node kind or intrinsic name the selected backend does not implement is
/// a hard, named error, never a silent drop.
pub fn emit(program: &Program, target: Target) -> Result<String, Error> {
    match target {
        Target::Python => python::emit(program),
        Target::C => c::emit(program),
        Target::Tcl => tcl::emit(program),
    }
}

/// Four spaces per nesting level, shared by all backends.
pub(crate) fn pad(indent: usize) -> String {
    " ".repeat(indent * 4)
}

/// An omitted slice bound is stored as the absent literal.
pub(crate) fn is_absent(expr: &crate::ir::Expr) -> bool {
    matches!(expr, crate::ir::Expr::Literal(crate::ir::Literal::None))
}
