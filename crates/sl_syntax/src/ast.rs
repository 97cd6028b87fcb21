//! Tagged-sum AST produced by the parser.
//!
//! `Decl`, `Expr`, and `Stmt` are closed enums, matching spec.md §3's "three
//! top-level tagged sums" (plus the type-expression subset folded into
//! `Expr`, exactly as `examples/original_source/bling/ast/ast.h` folds array/
//! pointer/struct/union/enum/function/ellipsis/native type forms into the
//! same `ast$Expr` union via `ast$isExprType`). Every node carries the `Pos`
//! of its syntactic anchor.
//!
//! Nodes are allocated from [`AstArenas`] and are immutable once built — the
//! checker does not mutate them in place. Resolution results (which `Object`
//! an identifier refers to, whether a selector emits `.` or `->`, the
//! injected type of a composite literal) live in a side table keyed by node
//! address (`sl_compile::check::Resolutions`), not on the node itself. This
//! is the Rust answer to spec.md §9's "cyclic ownership" note: no `Cell`,
//! `Rc`, or `RefCell` anywhere in the tree.

use sl_base::{Arena, Pos, Symbol};

use crate::scope::ScopeId;
use crate::token::TokenKind;

pub type ExprRef<'a> = &'a Expr<'a>;
pub type DeclRef<'a> = &'a Decl<'a>;
pub type StmtRef<'a> = &'a Stmt<'a>;

/// The three typed arenas AST nodes are allocated from. Borrowed, not owned:
/// the backing `Arena<T>` values live in the caller (typically a
/// `Compiler`'s construction site) and outlive every `AstArenas` that
/// borrows them, which is what lets `Decl<'a>`/`Expr<'a>`/`Stmt<'a>` cross
///-reference each other under one lifetime without a self-referential
/// struct.
#[derive(Clone, Copy)]
pub struct AstArenas<'a> {
    pub decls: &'a Arena<Decl<'a>>,
    pub exprs: &'a Arena<Expr<'a>>,
    pub stmts: &'a Arena<Stmt<'a>>,
}

impl<'a> AstArenas<'a> {
    pub fn new(decls: &'a Arena<Decl<'a>>, exprs: &'a Arena<Expr<'a>>, stmts: &'a Arena<Stmt<'a>>) -> Self {
        AstArenas { decls, exprs, stmts }
    }

    pub fn decl(&self, d: Decl<'a>) -> DeclRef<'a> {
        self.decls.alloc(d)
    }

    pub fn expr(&self, e: Expr<'a>) -> ExprRef<'a> {
        self.exprs.alloc(e)
    }

    pub fn stmt(&self, s: Stmt<'a>) -> StmtRef<'a> {
        self.stmts.alloc(s)
    }
}

/// One of `field`, `func`, `import`, `pragma`, `typedef`, `value` (spec.md
/// §3). `Value` covers both `var` and `const`; `kind` (`Var`/`Const`)
/// distinguishes them, matching the original's single `ast$DECL_VALUE` with
/// a `token$Token kind` field.
/// Every field in every variant is itself `Copy` (an arena reference, a
/// `Symbol`, a `Pos`, ...), so the node itself is a cheap flyweight —
/// matching on `*decl_ref` or rebinding a whole matched arm doesn't need a
/// clone.
#[derive(Debug, Clone, Copy)]
pub enum Decl<'a> {
    Field {
        pos: Pos,
        name: Option<ExprRef<'a>>,
        ty: ExprRef<'a>,
    },
    Func {
        pos: Pos,
        name: ExprRef<'a>,
        ty: ExprRef<'a>,
        body: Option<StmtRef<'a>>,
    },
    Import {
        pos: Pos,
        path: Symbol,
    },
    Pragma {
        pos: Pos,
        text: Symbol,
    },
    Typedef {
        pos: Pos,
        name: ExprRef<'a>,
        ty: ExprRef<'a>,
    },
    Value {
        pos: Pos,
        kind: TokenKind,
        name: ExprRef<'a>,
        ty: Option<ExprRef<'a>>,
        value: Option<ExprRef<'a>>,
    },
}

impl<'a> Decl<'a> {
    pub fn pos(&self) -> Pos {
        match *self {
            Decl::Field { pos, .. }
            | Decl::Func { pos, .. }
            | Decl::Import { pos, .. }
            | Decl::Pragma { pos, .. }
            | Decl::Typedef { pos, .. }
            | Decl::Value { pos, .. } => pos,
        }
    }

    /// The declared name, for decls that have one (all but pragma/import,
    /// which name themselves via a path symbol rather than an identifier).
    pub fn name(&self) -> Option<ExprRef<'a>> {
        match *self {
            Decl::Field { name, .. } => name,
            Decl::Func { name, .. } => Some(name),
            Decl::Typedef { name, .. } => Some(name),
            Decl::Value { name, .. } => Some(name),
            Decl::Import { .. } | Decl::Pragma { .. } => None,
        }
    }

    /// The decl's type expression, for decls that have one. `Value` may
    /// have none (a `const` relying on inferred type); `Import`/`Pragma`
    /// never do.
    pub fn ty(&self) -> Option<ExprRef<'a>> {
        match *self {
            Decl::Field { ty, .. } | Decl::Func { ty, .. } | Decl::Typedef { ty, .. } => Some(ty),
            Decl::Value { ty, .. } => ty,
            Decl::Import { .. } | Decl::Pragma { .. } => None,
        }
    }
}

/// `Expr` covers both ordinary expressions and, per spec.md §3, the "type
/// expression subset" (array/pointer/struct/union/enum/function/ellipsis/
/// native). `Star` plays both roles (unary deref expression and pointer
/// type), exactly as `ast$EXPR_STAR` does in the original — which form is
/// meant is a property of where the node sits in the tree, not a separate
/// tag. `is_type_expr` mirrors `ast$isExprType`.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'a> {
    BasicLit {
        pos: Pos,
        kind: TokenKind,
        value: Symbol,
    },
    Ident {
        pos: Pos,
        name: Symbol,
    },
    Binary {
        pos: Pos,
        op: TokenKind,
        x: ExprRef<'a>,
        y: ExprRef<'a>,
    },
    Unary {
        pos: Pos,
        op: TokenKind,
        x: ExprRef<'a>,
    },
    /// Unary `*x` (dereference) when it appears where a value is expected;
    /// a pointer type `*T` when it appears where a type is expected.
    Star {
        pos: Pos,
        x: ExprRef<'a>,
    },
    Call {
        pos: Pos,
        func: ExprRef<'a>,
        args: &'a [ExprRef<'a>],
    },
    Cast {
        pos: Pos,
        ty: ExprRef<'a>,
        x: ExprRef<'a>,
    },
    /// `x.sel` or (post-check) `x->sel`. Which operator renders is resolved
    /// by the checker and recorded in `Resolutions::is_arrow`, not stored
    /// here.
    Selector {
        pos: Pos,
        x: ExprRef<'a>,
        sel: ExprRef<'a>,
    },
    Index {
        pos: Pos,
        x: ExprRef<'a>,
        index: ExprRef<'a>,
    },
    Paren {
        pos: Pos,
        x: ExprRef<'a>,
    },
    Sizeof {
        pos: Pos,
        x: ExprRef<'a>,
    },
    Ternary {
        pos: Pos,
        cond: ExprRef<'a>,
        then: ExprRef<'a>,
        alt: ExprRef<'a>,
    },
    /// `(T){ ... }` or `T{ ... }`. `ty` is `None` only before the checker
    /// injects a type from context (e.g. a bare array-element literal);
    /// spec.md §3's "every composite literal has a non-null type" invariant
    /// holds post-check via `Resolutions::expr_type`, not this field.
    CompositeLit {
        pos: Pos,
        ty: Option<ExprRef<'a>>,
        elts: &'a [ExprRef<'a>],
    },
    KeyValue {
        pos: Pos,
        key: ExprRef<'a>,
        value: ExprRef<'a>,
        is_array: bool,
    },

    // ---- type-expression subset (ast$isExprType) ----
    ArrayType {
        pos: Pos,
        len: Option<ExprRef<'a>>,
        elt: ExprRef<'a>,
    },
    StructType {
        pos: Pos,
        /// `Struct` or `Union`.
        tok: TokenKind,
        name: Option<ExprRef<'a>>,
        fields: &'a [DeclRef<'a>],
    },
    EnumType {
        pos: Pos,
        name: Option<ExprRef<'a>>,
        enumerators: &'a [DeclRef<'a>],
    },
    FuncType {
        pos: Pos,
        params: &'a [DeclRef<'a>],
        result: ExprRef<'a>,
    },
    Ellipsis {
        pos: Pos,
    },
    /// A predeclared primitive (`char`, `int`, `u64`, `void`, ...), only
    /// ever constructed by `sl_compile::universe` when populating the root
    /// scope; never produced by the parser.
    Native {
        name: Symbol,
    },
}

impl<'a> Expr<'a> {
    /// `ast$Expr_pos`: every variant's syntactic anchor. `Native` has none
    /// (it is synthesized, not parsed), matching the original returning 0.
    pub fn pos(&self) -> Pos {
        match *self {
            Expr::BasicLit { pos, .. }
            | Expr::Ident { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::Star { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::Cast { pos, .. }
            | Expr::Selector { pos, .. }
            | Expr::Index { pos, .. }
            | Expr::Paren { pos, .. }
            | Expr::Sizeof { pos, .. }
            | Expr::Ternary { pos, .. }
            | Expr::CompositeLit { pos, .. }
            | Expr::KeyValue { pos, .. }
            | Expr::ArrayType { pos, .. }
            | Expr::StructType { pos, .. }
            | Expr::EnumType { pos, .. }
            | Expr::FuncType { pos, .. }
            | Expr::Ellipsis { pos } => pos,
            Expr::Native { .. } => Pos::NONE,
        }
    }

    /// `ast$isExprType`: true for the type-expression subset. `Star` is
    /// deliberately excluded — callers that need "is this a pointer type"
    /// check context (parser lookahead, checker base-type resolution), not
    /// this predicate, exactly as the original does (a bare `ast$EXPR_STAR`
    /// is outside `[_TYPE_START, _TYPE_END]`).
    pub fn is_type_expr(&self) -> bool {
        matches!(
            self,
            Expr::ArrayType { .. }
                | Expr::StructType { .. }
                | Expr::EnumType { .. }
                | Expr::FuncType { .. }
                | Expr::Ellipsis { .. }
                | Expr::Native { .. }
        )
    }

    pub fn is_ident(&self) -> bool {
        matches!(self, Expr::Ident { .. })
    }

    pub fn ident_name(&self) -> Option<Symbol> {
        match self {
            Expr::Ident { name, .. } => Some(*name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Stmt<'a> {
    Assign {
        pos: Pos,
        x: ExprRef<'a>,
        op: TokenKind,
        y: ExprRef<'a>,
    },
    Block {
        pos: Pos,
        stmts: &'a [StmtRef<'a>],
    },
    /// `case EXPRS: STMTS` (`exprs` empty ⇒ `default`). Only ever appears
    /// directly inside a `Switch`'s `stmts` list, matching spec.md §4.2's
    /// "switch bodies contain only case/default clauses".
    Case {
        pos: Pos,
        exprs: &'a [ExprRef<'a>],
        stmts: &'a [StmtRef<'a>],
    },
    Decl {
        decl: DeclRef<'a>,
    },
    Empty {
        pos: Pos,
    },
    Expr {
        pos: Pos,
        x: ExprRef<'a>,
    },
    If {
        pos: Pos,
        cond: ExprRef<'a>,
        body: StmtRef<'a>,
        els: Option<StmtRef<'a>>,
    },
    /// `for`/`while`, unified by `kind` per spec.md §4.2.
    Iter {
        pos: Pos,
        kind: IterKind,
        init: Option<StmtRef<'a>>,
        cond: Option<ExprRef<'a>>,
        post: Option<StmtRef<'a>>,
        body: StmtRef<'a>,
    },
    Jump {
        pos: Pos,
        keyword: TokenKind,
        label: Option<ExprRef<'a>>,
    },
    Label {
        pos: Pos,
        label: ExprRef<'a>,
        stmt: StmtRef<'a>,
    },
    Postfix {
        pos: Pos,
        x: ExprRef<'a>,
        op: TokenKind,
    },
    Return {
        pos: Pos,
        x: Option<ExprRef<'a>>,
    },
    Switch {
        pos: Pos,
        tag: ExprRef<'a>,
        /// Each element is a `Stmt::Case`.
        cases: &'a [StmtRef<'a>],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterKind {
    For,
    While,
}

impl<'a> Stmt<'a> {
    pub fn pos(&self) -> Pos {
        match *self {
            Stmt::Assign { pos, .. }
            | Stmt::Block { pos, .. }
            | Stmt::Case { pos, .. }
            | Stmt::Empty { pos }
            | Stmt::Expr { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::Iter { pos, .. }
            | Stmt::Jump { pos, .. }
            | Stmt::Label { pos, .. }
            | Stmt::Postfix { pos, .. }
            | Stmt::Return { pos, .. }
            | Stmt::Switch { pos, .. } => pos,
            Stmt::Decl { decl } => decl.pos(),
        }
    }
}

/// A fully parsed source file. `scope` is the package scope this file
/// contributed its top-level declarations to (spec.md §3: "pointer to the
/// file's scope (= the package scope it contributed to)").
pub struct File<'a> {
    pub filename: String,
    pub package_name: Option<ExprRef<'a>>,
    pub imports: Vec<DeclRef<'a>>,
    pub decls: Vec<DeclRef<'a>>,
    pub scope: ScopeId,
    /// Whether this file was parsed in the C dialect (`.c`/`.h`) rather than
    /// SL (`.bling`). Fixed for the file's entire parse, per spec.md §4.2's
    /// `[SUPPLEMENT]`.
    pub c_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_type_expr_excludes_star_and_ordinary_exprs() {
        let ident = Expr::Ident { pos: Pos::NONE, name: Symbol::EMPTY };
        assert!(!ident.is_type_expr());
        let native = Expr::Native { name: Symbol::EMPTY };
        assert!(native.is_type_expr());
    }

    #[test]
    fn decl_pos_matches_anchor() {
        let mut set = sl_base::FileSet::new();
        let f = set.add_file("a.bling", "x");
        let pos = set.file(f).pos(0);
        let decl = Decl::Pragma { pos, text: Symbol::EMPTY };
        assert_eq!(decl.pos(), pos);
    }
}
