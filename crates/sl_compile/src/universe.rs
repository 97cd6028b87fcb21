//! Predeclares the root scope: primitive types, `NULL`/`true`/`false`, and
//! the builtin functions (`assert`, `panic`, `print`, `len`, ...).
//!
//! Grounded on `examples/original_source/bling/types/universe.c`, which
//! builds exactly this table once per process and hangs every package scope
//! off it as `outer`. Every predeclared name still gets a real `Decl` node
//! (allocated from the session's arenas, positioned at [`Pos::NONE`]) so
//! that `Object::decl` is never absent the way a hand-rolled enum of
//! "magic" identifiers would leave it — the checker and emitter treat a
//! universe object exactly like a user one, just with a decl that didn't
//! come out of a parsed file.
//!
//! Builtins with an open-ended argument list (`print`, `panic`, `len`) are
//! ordinary [`Decl::Func`] objects whose final parameter is
//! [`Expr::Ellipsis`] — spec.md §4.3's "a trailing ellipsis parameter
//! accepts any remaining args" rule is generic in the checker's call-typing
//! code (see `check::check_call`), so no separate "builtin type-expression"
//! call path is needed. This is a simplification from spec.md §4.3's literal
//! wording, recorded in DESIGN.md.

use sl_base::{Interner, Pos, Symbol};

use sl_syntax::ast::{AstArenas, Decl, DeclRef, Expr, ExprRef};
use sl_syntax::scope::{ObjKind, Object, ScopeId, Scopes};

/// Names of the primitive types predeclared into the universe, per spec.md
/// §2's "bool, int widths, void, voidptr".
const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "int", "u8", "u16", "u32", "u64", "uint", "float", "double", "void",
];

fn native<'a>(arenas: AstArenas<'a>, name: Symbol) -> ExprRef<'a> {
    arenas.expr(Expr::Native { name })
}

fn declare_type<'a>(arenas: AstArenas<'a>, scopes: &mut Scopes<'a>, universe: ScopeId, sym: Symbol, ty: ExprRef<'a>) {
    let name = arenas.expr(Expr::Ident { pos: Pos::NONE, name: sym });
    let decl = arenas.decl(Decl::Typedef { pos: Pos::NONE, name, ty });
    scopes.insert(universe, sym, Object::new(ObjKind::Type, sym, Some(decl)));
}

fn declare_const<'a>(
    arenas: AstArenas<'a>,
    scopes: &mut Scopes<'a>,
    universe: ScopeId,
    sym: Symbol,
    ty: ExprRef<'a>,
    value: ExprRef<'a>,
) {
    let name = arenas.expr(Expr::Ident { pos: Pos::NONE, name: sym });
    let decl = arenas.decl(Decl::Value { pos: Pos::NONE, kind: sl_syntax::token::TokenKind::Const, name, ty: Some(ty), value: Some(value) });
    scopes.insert(universe, sym, Object::new(ObjKind::Const, sym, Some(decl)));
}

/// `name(params...) result`, optionally ending with an ellipsis parameter.
fn declare_func<'a>(
    arenas: AstArenas<'a>,
    scopes: &mut Scopes<'a>,
    universe: ScopeId,
    interner: &mut Interner,
    name: &str,
    params: Vec<DeclRef<'a>>,
    result: ExprRef<'a>,
) {
    let sym = interner.intern(name);
    let name_expr = arenas.expr(Expr::Ident { pos: Pos::NONE, name: sym });
    let params = arenas.decls.alloc_slice(params);
    let ty = arenas.expr(Expr::FuncType { pos: Pos::NONE, params, result });
    let decl = arenas.decl(Decl::Func { pos: Pos::NONE, name: name_expr, ty, body: None });
    scopes.insert(universe, sym, Object::new(ObjKind::Func, sym, Some(decl)));
}

fn field<'a>(arenas: AstArenas<'a>, ty: ExprRef<'a>) -> DeclRef<'a> {
    arenas.decl(Decl::Field { pos: Pos::NONE, name: None, ty })
}

/// Builds a fresh universe scope (outer = `None`) and predeclares every
/// primitive type, constant, and builtin function into it. Called once per
/// [`crate::check::Compiler`] session.
pub fn populate<'a>(arenas: AstArenas<'a>, scopes: &mut Scopes<'a>, interner: &mut Interner) -> ScopeId {
    let universe = scopes.new_scope(None);

    let mut prim = std::collections::HashMap::new();
    for &name in PRIMITIVE_TYPES {
        let sym = interner.intern(name);
        let ty = native(arenas, sym);
        declare_type(arenas, scopes, universe, sym, ty);
        prim.insert(name, ty);
    }

    let void_ty = prim["void"];
    let bool_ty = prim["bool"];
    let char_ty = prim["char"];
    let int_ty = prim["int"];

    let void_ptr = arenas.expr(Expr::Star { pos: Pos::NONE, x: void_ty });
    {
        let sym = interner.intern("voidptr");
        declare_type(arenas, scopes, universe, sym, void_ptr);
    }
    let char_ptr = arenas.expr(Expr::Star { pos: Pos::NONE, x: char_ty });

    // Predeclared constants: NULL, true, false.
    let zero = interner.intern("0");
    let one = interner.intern("1");
    {
        let sym = interner.intern("NULL");
        let value = arenas.expr(Expr::BasicLit { pos: Pos::NONE, kind: sl_syntax::token::TokenKind::Int, value: zero });
        declare_const(arenas, scopes, universe, sym, void_ptr, value);
    }
    {
        let sym = interner.intern("true");
        let value = arenas.expr(Expr::BasicLit { pos: Pos::NONE, kind: sl_syntax::token::TokenKind::Int, value: one });
        declare_const(arenas, scopes, universe, sym, bool_ty, value);
    }
    {
        let sym = interner.intern("false");
        let value = arenas.expr(Expr::BasicLit { pos: Pos::NONE, kind: sl_syntax::token::TokenKind::Int, value: zero });
        declare_const(arenas, scopes, universe, sym, bool_ty, value);
    }

    // Predeclared builtins.
    let ellipsis = arenas.expr(Expr::Ellipsis { pos: Pos::NONE });
    declare_func(arenas, scopes, universe, interner, "assert", vec![field(arenas, bool_ty)], void_ty);
    declare_func(
        arenas,
        scopes,
        universe,
        interner,
        "panic",
        vec![field(arenas, char_ptr), field(arenas, ellipsis)],
        void_ty,
    );
    declare_func(
        arenas,
        scopes,
        universe,
        interner,
        "print",
        vec![field(arenas, char_ptr), field(arenas, ellipsis)],
        void_ty,
    );
    declare_func(arenas, scopes, universe, interner, "len", vec![field(arenas, ellipsis)], int_ty);

    universe
}
