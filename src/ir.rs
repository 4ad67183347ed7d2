//! The language-neutral intermediate representation.
//!
//! A strictly acyclic tree: a program owns an ordered sequence of
//! statements, every node exclusively owns its children. The catalog is
//! closed; emitters match exhaustively, so adding a node kind forces a
//! review of every backend.

use serde::Serialize;

/// Reserved method name representing plain indexing (`a[i]`).
pub const GET_ITEM: &str = "__getitem__";
/// Reserved method name representing slicing (`a[start:end:step]`).
pub const SLICE: &str = "__slice__";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// A statement plus its optional leading comment.
///
/// The comment is a best-effort human annotation preserved verbatim across
/// translation, not a general comment-preservation guarantee.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub comment: Option<String>,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            comment: None,
        }
    }

    pub fn with_comment(kind: StmtKind, comment: Option<String>) -> Self {
        Self { kind, comment }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum StmtKind {
    Expr(Expr),
    Assign {
        name: String,
        value: Expr,
    },
    /// `(a, b, ...) = value`. Kept as its own kind rather than lowered:
    /// its faithful rendering differs structurally per target.
    TupleAssign {
        names: Vec<String>,
        value: Expr,
    },
    Pass,
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    ForEach {
        /// One or more loop variable names, comma-joined.
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    FnDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    ClassDef {
        name: String,
        base: Option<String>,
        body: Vec<Stmt>,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptClause>,
        finally: Option<Vec<Stmt>>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExceptClause {
    pub exc_type: Option<String>,
    pub binding: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    /// A variable reference by name, unchecked: there is no symbol table.
    Var(String),
    StringInterp(Vec<InterpPart>),
    List(Vec<Expr>),
    /// Ordered key-value pairs. Insertion order is significant and must be
    /// preserved through translation, never reordered or hashed.
    Dict(Vec<(Expr, Expr)>),
    ListComp {
        element: Box<Expr>,
        /// Loop variable name(s), comma-joined.
        var: String,
        iterable: Box<Expr>,
        filter: Option<Box<Expr>>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        /// Loop variable name(s), comma-joined.
        vars: String,
        iterable: Box<Expr>,
        filter: Option<Box<Expr>>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        /// Operator symbol as spelled in the source dialect.
        op: String,
        right: Box<Expr>,
    },
    UnaryOp {
        op: String,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// Method call or, via the reserved names [`GET_ITEM`] and [`SLICE`],
    /// indexing and slicing.
    MethodCall {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    /// The escape hatch for operations with no single cross-language
    /// grammar production. An intrinsic's argument count and shape are part
    /// of its name's contract; each backend whitelists the names it
    /// understands and rejects the rest.
    Intrinsic {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum InterpPart {
    Text(String),
    Var(String),
}

/// A literal's runtime value tag fully determines its formatting in every
/// backend. This is a closed set, never an arbitrary object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}
