//! Tree-walking SL emitter: re-prints a checked [`Package`] as `.bling`
//! source instead of C.
//!
//! Grounded on `emit.rs`'s indent-padded `writeln!`/`pad` idiom, retargeted
//! at SL's own surface grammar (`parser.rs`) rather than C's declarator
//! syntax. Re-emission is substantially simpler than C emission: SL's type
//! grammar is prefix-form (`*T`, `[n]T`, `func(...) T`) so no declarator
//! threading is needed, selectors always print `.` (the `.`/`->` distinction
//! only exists in generated C), and there is no name mangling — a package's
//! own top-level names are printed exactly as declared, and a qualified
//! reference is already `pkg.Name` in the AST's own `Selector` shape.
//!
//! Declaration order is left as written: unlike the C emitter's
//! `order_structs`, SL's own two-pass checker resolves names regardless of
//! declaration order (see `check.rs`), so forward-declaration is never
//! required here.

use std::fmt::Write as _;

use sl_base::Symbol;
use sl_syntax::ast::{Decl, DeclRef, Expr, ExprRef, IterKind, Stmt, StmtRef};
use sl_syntax::token::TokenKind;

use crate::check::{Compiler, Package};

/// Walks one checked [`Package`], producing its `.bling` source text.
pub struct SlEmitter<'a, 'c> {
    compiler: &'c Compiler<'a>,
    indent: usize,
    skip_semi: bool,
}

impl<'a, 'c> SlEmitter<'a, 'c> {
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        SlEmitter { compiler, indent: 0, skip_semi: false }
    }

    fn pad(&self) -> String {
        "    ".repeat(self.indent)
    }

    fn resolve(&self, sym: Symbol) -> String {
        self.compiler.interner.resolve(sym).to_string()
    }

    fn resolve_ident(&self, e: ExprRef<'a>) -> String {
        self.resolve(e.ident_name().expect("expected an identifier"))
    }

    // ---- type emission (prefix form, no declarator threading) ----

    fn emit_type(&self, ty: ExprRef<'a>) -> String {
        match *ty {
            Expr::Native { name } => self.resolve(name),
            Expr::Ident { name, .. } => self.resolve(name),
            Expr::Selector { x, sel, .. } => format!("{}.{}", self.emit_expr(x), self.resolve_ident(sel)),
            Expr::Star { x, .. } => format!("*{}", self.emit_type(x)),
            Expr::ArrayType { len, elt, .. } => {
                let dim = len.map(|l| self.emit_expr(l)).unwrap_or_default();
                format!("[{dim}]{}", self.emit_type(elt))
            }
            Expr::FuncType { params, result, .. } => {
                format!("func({}) {}", self.emit_field_list(params), self.emit_type(result))
            }
            Expr::StructType { tok, name, fields, .. } => {
                let kw = if tok == TokenKind::Union { "union" } else { "struct" };
                let tag = name.map(|n| format!(" {}", self.resolve_ident(n))).unwrap_or_default();
                let mut s = format!("{kw}{tag} {{\n");
                for f in fields {
                    writeln!(s, "    {};", self.emit_field(f)).unwrap();
                }
                s.push('}');
                s
            }
            Expr::EnumType { name, enumerators, .. } => {
                let tag = name.map(|n| format!(" {}", self.resolve_ident(n))).unwrap_or_default();
                let mut s = format!("enum{tag} {{\n");
                for en in enumerators {
                    let Decl::Value { name: ename, value, .. } = **en else { continue };
                    let en_name = self.resolve_ident(ename);
                    match value {
                        Some(v) => writeln!(s, "    {en_name} = {},", self.emit_expr(v)).unwrap(),
                        None => writeln!(s, "    {en_name},").unwrap(),
                    }
                }
                s.push('}');
                s
            }
            Expr::Ellipsis { .. } => "...".to_string(),
            _ => self.emit_expr(ty),
        }
    }

    /// `name`-less fields (anonymous struct members, unnamed parameters) print
    /// as a bare type, matching `parse_field`'s own "terminator" lookahead
    /// rule for distinguishing the two forms.
    fn emit_field(&self, f: DeclRef<'a>) -> String {
        let Decl::Field { name, ty, .. } = **f else { return String::new() };
        if matches!(*ty, Expr::Ellipsis { .. }) {
            return "...".to_string();
        }
        match name {
            Some(n) => format!("{} {}", self.resolve_ident(n), self.emit_type(ty)),
            None => self.emit_type(ty),
        }
    }

    fn emit_field_list(&self, fields: &'a [DeclRef<'a>]) -> String {
        fields.iter().map(|f| self.emit_field(f)).collect::<Vec<_>>().join(", ")
    }

    // ---- package entry point ----

    /// One `.bling` file's worth of text: package clause, imports, then every
    /// top-level declaration in source order.
    pub fn emit_package(&mut self, pkg: &Package<'a>) -> String {
        let mut out = String::new();
        writeln!(out, "package ({});", self.resolve(pkg.name)).unwrap();

        let imports: Vec<&Decl<'a>> =
            pkg.files.iter().flat_map(|f| f.imports.iter()).map(|d| &**d).collect();
        if !imports.is_empty() {
            out.push('\n');
            for imp in imports {
                if let Decl::Import { path, .. } = *imp {
                    writeln!(out, "import (\"{}\");", self.resolve(path)).unwrap();
                }
            }
        }

        for decl in pkg.files.iter().flat_map(|f| f.decls.iter()) {
            out.push('\n');
            writeln!(out, "{}", self.emit_top_decl(decl)).unwrap();
        }

        out
    }

    fn emit_top_decl(&mut self, decl: DeclRef<'a>) -> String {
        match *decl {
            Decl::Import { .. } => String::new(), // printed from `File::imports` above
            Decl::Pragma { text, .. } => self.resolve(text),
            Decl::Typedef { name, ty, .. } => format!("type {} {};", self.resolve_ident(name), self.emit_type(ty)),
            Decl::Func { name, ty, body, .. } => {
                let Expr::FuncType { params, result, .. } = *ty else { return String::new() };
                let sig = format!("func {}({}) {}", self.resolve_ident(name), self.emit_field_list(params), self.emit_type(result));
                match body {
                    Some(b) => {
                        let mut buf = String::new();
                        write!(buf, "{sig} ").unwrap();
                        self.emit_stmt(b, &mut buf);
                        buf
                    }
                    None => format!("{sig};"),
                }
            }
            Decl::Value { kind, name, ty, value, .. } => self.emit_value_decl(kind, name, ty, value),
            Decl::Field { .. } => String::new(), // never a top-level decl
        }
    }

    fn emit_value_decl(&self, kind: TokenKind, name: ExprRef<'a>, ty: Option<ExprRef<'a>>, value: Option<ExprRef<'a>>) -> String {
        let kw = kind.text();
        let mut s = format!("{kw} {}", self.resolve_ident(name));
        if let Some(t) = ty {
            write!(s, " {}", self.emit_type(t)).unwrap();
        }
        if let Some(v) = value {
            write!(s, " = {}", self.emit_expr(v)).unwrap();
        }
        s.push(';');
        s
    }

    // ---- statement emission ----

    fn emit_stmt(&mut self, stmt: StmtRef<'a>, out: &mut String) {
        match *stmt {
            Stmt::Block { stmts, .. } => {
                writeln!(out, "{{").unwrap();
                self.indent += 1;
                for s in stmts {
                    write!(out, "{}", self.pad()).unwrap();
                    self.emit_stmt(*s, out);
                }
                self.indent -= 1;
                writeln!(out, "{}}}", self.pad()).unwrap();
            }
            Stmt::Decl { decl } => {
                if let Decl::Typedef { name, ty, .. } = *decl {
                    writeln!(out, "type {} {};", self.resolve_ident(name), self.emit_type(ty)).unwrap();
                } else if let Decl::Value { kind, name, ty, value, .. } = *decl {
                    writeln!(out, "{}", self.emit_value_decl(kind, name, ty, value)).unwrap();
                }
            }
            Stmt::Empty { .. } => {
                writeln!(out, ";").unwrap();
            }
            Stmt::Expr { x, .. } => {
                writeln!(out, "{};", self.emit_expr(x)).unwrap();
            }
            Stmt::Assign { x, op, y, .. } => {
                let semi = if self.skip_semi { "" } else { ";" };
                writeln!(out, "{} {} {}{semi}", self.emit_expr(x), op.text(), self.emit_expr(y)).unwrap();
            }
            Stmt::Postfix { x, op, .. } => {
                let semi = if self.skip_semi { "" } else { ";" };
                writeln!(out, "{}{}{semi}", self.emit_expr(x), op.text()).unwrap();
            }
            Stmt::If { cond, body, els, .. } => {
                write!(out, "if ({}) ", self.emit_expr(cond)).unwrap();
                self.emit_stmt(body, out);
                if let Some(els) = els {
                    write!(out, "{}else ", self.pad()).unwrap();
                    self.emit_stmt(els, out);
                }
            }
            Stmt::Iter { kind: IterKind::While, cond, body, .. } => {
                let cond_str = cond.map(|c| self.emit_expr(c)).unwrap_or_default();
                write!(out, "while ({cond_str}) ").unwrap();
                self.emit_stmt(body, out);
            }
            Stmt::Iter { kind: IterKind::For, init, cond, post, body, .. } => {
                let init_str = init.map(|s| self.render_inline(s)).unwrap_or_default();
                let cond_str = cond.map(|c| self.emit_expr(c)).unwrap_or_default();
                let post_str = post.map(|s| self.render_inline(s)).unwrap_or_default();
                write!(out, "for ({init_str}; {cond_str}; {post_str}) ").unwrap();
                self.emit_stmt(body, out);
            }
            Stmt::Return { x: Some(x), .. } => {
                writeln!(out, "return {};", self.emit_expr(x)).unwrap();
            }
            Stmt::Return { x: None, .. } => {
                writeln!(out, "return;").unwrap();
            }
            Stmt::Switch { tag, cases, .. } => {
                writeln!(out, "switch ({}) {{", self.emit_expr(tag)).unwrap();
                self.indent += 1;
                for c in cases {
                    if let Stmt::Case { exprs, stmts, .. } = **c {
                        if exprs.is_empty() {
                            writeln!(out, "{}default:", self.pad()).unwrap();
                        } else {
                            let labels = exprs.iter().map(|e| self.emit_expr(*e)).collect::<Vec<_>>().join(", ");
                            writeln!(out, "{}case {labels}:", self.pad()).unwrap();
                        }
                        self.indent += 1;
                        for s in stmts {
                            write!(out, "{}", self.pad()).unwrap();
                            self.emit_stmt(*s, out);
                        }
                        self.indent -= 1;
                    }
                }
                self.indent -= 1;
                writeln!(out, "{}}}", self.pad()).unwrap();
            }
            Stmt::Case { .. } => {}
            Stmt::Jump { keyword, label, .. } => match keyword {
                TokenKind::Goto => {
                    let l = label.map(|l| self.resolve_ident(l)).unwrap_or_default();
                    writeln!(out, "goto {l};").unwrap();
                }
                other => writeln!(out, "{};", other.text()).unwrap(),
            },
            Stmt::Label { label, stmt, .. } => {
                writeln!(out, "{}:", self.resolve_ident(label)).unwrap();
                write!(out, "{}", self.pad()).unwrap();
                self.emit_stmt(stmt, out);
            }
        }
    }

    /// Renders a statement without its own leading pad/trailing newline/
    /// semicolon, for a `for` loop's inline `init`/`post` clauses.
    fn render_inline(&mut self, stmt: StmtRef<'a>) -> String {
        let saved_skip = self.skip_semi;
        self.skip_semi = true;
        let mut buf = String::new();
        self.emit_stmt(stmt, &mut buf);
        self.skip_semi = saved_skip;
        buf.trim_end_matches(['\n', ';']).trim_start().to_string()
    }

    // ---- expression emission ----

    fn emit_expr(&self, e: ExprRef<'a>) -> String {
        match *e {
            Expr::BasicLit { kind, value, .. } => self.emit_literal(kind, value),
            Expr::Ident { name, .. } => self.resolve(name),
            Expr::Binary { op, x, y, .. } => format!("({} {} {})", self.emit_expr(x), op.text(), self.emit_expr(y)),
            Expr::Unary { op, x, .. } => format!("({}{})", op.text(), self.emit_expr(x)),
            Expr::Star { x, .. } => format!("(*{})", self.emit_expr(x)),
            Expr::Call { func, args, .. } => {
                let args_str = args.iter().map(|a| self.emit_expr(*a)).collect::<Vec<_>>().join(", ");
                format!("{}({args_str})", self.emit_expr(func))
            }
            Expr::Cast { ty, x, .. } => format!("({}) {}", self.emit_type(ty), self.emit_expr(x)),
            Expr::Selector { x, sel, .. } => format!("{}.{}", self.emit_expr(x), self.resolve_ident(sel)),
            Expr::Index { x, index, .. } => format!("{}[{}]", self.emit_expr(x), self.emit_expr(index)),
            Expr::Paren { x, .. } => format!("({})", self.emit_expr(x)),
            Expr::Sizeof { x, .. } => {
                if x.is_type_expr() {
                    format!("sizeof({})", self.emit_type(x))
                } else {
                    format!("sizeof({})", self.emit_expr(x))
                }
            }
            Expr::Ternary { cond, then, alt, .. } => {
                format!("({} ? {} : {})", self.emit_expr(cond), self.emit_expr(then), self.emit_expr(alt))
            }
            Expr::CompositeLit { ty, elts, .. } => {
                let type_str = ty.map(|t| format!("({})", self.emit_type(t))).unwrap_or_default();
                let elts_str = elts.iter().map(|el| self.emit_expr(*el)).collect::<Vec<_>>().join(", ");
                format!("{type_str}{{ {elts_str} }}")
            }
            Expr::KeyValue { key, value, is_array, .. } => {
                if is_array {
                    format!("[{}] = {}", self.emit_expr(key), self.emit_expr(value))
                } else {
                    format!(".{} = {}", self.resolve_ident(key), self.emit_expr(value))
                }
            }
            _ => self.emit_type(e),
        }
    }

    fn emit_literal(&self, kind: TokenKind, value: Symbol) -> String {
        let text = self.compiler.interner.resolve(value);
        match kind {
            TokenKind::Char => format!("'{text}'"),
            TokenKind::String => format!("\"{text}\""),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckConfig, NoImports};
    use sl_base::{Arena, FileSet};
    use sl_syntax::ast::{AstArenas, Decl as D, Expr as E, Stmt as St};
    use sl_syntax::parser::parse_file;

    fn compile(src: &str) -> (Compiler<'static>, std::rc::Rc<Package<'static>>) {
        let decls: &'static Arena<D<'static>> = Box::leak(Box::new(Arena::new()));
        let exprs: &'static Arena<E<'static>> = Box::leak(Box::new(Arena::new()));
        let stmts: &'static Arena<St<'static>> = Box::leak(Box::new(Arena::new()));
        let arenas = AstArenas::new(decls, exprs, stmts);
        let mut compiler: Compiler<'static> = Compiler::new(arenas);
        let file_idx = compiler.fileset.add_file("t.bling", src);
        let scope = compiler.scopes.new_scope(Some(compiler.universe));
        let file = parse_file(&mut compiler.fileset, file_idx, &mut compiler.interner, arenas, &mut compiler.scopes, scope, false).expect("parse");
        let pkg = compiler
            .check_package("t", Some(vec![file]), &mut NoImports, &CheckConfig::default())
            .expect("check");
        (compiler, pkg)
    }

    #[test]
    fn round_trips_function_with_return() {
        let (compiler, pkg) = compile("func add(a int, b int) int { return a + b; }");
        let mut em = SlEmitter::new(&compiler);
        let text = em.emit_package(&pkg);
        assert!(text.contains("package (t);"), "{text}");
        assert!(text.contains("func add(a int, b int) int {"), "{text}");
        assert!(text.contains("return (a + b);"), "{text}");
    }

    #[test]
    fn struct_typedef_prints_sl_field_order() {
        let (compiler, pkg) = compile("type T struct { a int; b *T; };");
        let mut em = SlEmitter::new(&compiler);
        let text = em.emit_package(&pkg);
        assert!(text.contains("type T struct {"), "{text}");
        assert!(text.contains("a int;"), "{text}");
        assert!(text.contains("b *T;"), "{text}");
    }

    #[test]
    fn composite_literal_prints_dotted_keys() {
        let (compiler, pkg) = compile("type T struct { a int; b int; }; var x T = (T){ .a = 1, .b = 2 };");
        let mut em = SlEmitter::new(&compiler);
        let text = em.emit_package(&pkg);
        assert!(text.contains(".a = 1"), "{text}");
        assert!(text.contains(".b = 2"), "{text}");
    }
}
