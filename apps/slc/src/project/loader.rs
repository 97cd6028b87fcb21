//! [`sl_compile::PackageLoader`] backed by [`walk_package_dir`].
//!
//! An import path is resolved to a directory by joining it onto a fixed
//! project root (ordinarily the current working directory) — spec.md §6
//! doesn't specify an import-resolution algorithm beyond "a directory of
//! source files sharing a scope" (GLOSSARY: Package), so this is the
//! simplest contract that satisfies it: `import ("a/b")` means "the package
//! at `<root>/a/b`", matching `compile <path>`'s own `<path>` argument being
//! a plain directory path.
//!
//! Every file in the directory — `.bling` parsed as SL, `.c`/`.h` parsed in
//! C mode — contributes declarations to the same package scope and is
//! emitted together into one `<base>.h`/`<base>.c` pair (see
//! `project::build`'s module doc for why this crate does not keep the
//! teacher-original's split between "C-only" and "bling" package kinds).

use std::path::{Path, PathBuf};

use sl_base::{CompileError, FileSet, Interner, Result};
use sl_syntax::ast::{AstArenas, File};
use sl_syntax::parser::parse_file;
use sl_syntax::scope::{ScopeId, Scopes};

use sl_compile::PackageLoader;

use super::walk::walk_package_dir;

pub struct DirLoader {
    pub root: PathBuf,
}

impl DirLoader {
    pub fn new(root: PathBuf) -> Self {
        DirLoader { root }
    }

    pub fn package_dir(&self, import_path: &str) -> PathBuf {
        self.root.join(import_path)
    }
}

impl<'a> PackageLoader<'a> for DirLoader {
    fn load(
        &mut self,
        import_path: &str,
        fileset: &mut FileSet,
        interner: &mut Interner,
        arenas: AstArenas<'a>,
        scopes: &mut Scopes<'a>,
        pkg_scope: ScopeId,
    ) -> Result<Vec<File<'a>>> {
        let dir = self.package_dir(import_path);
        load_package_files(arenas, fileset, interner, scopes, pkg_scope, &dir)
    }
}

/// Parses every source file in `dir` against the single shared `pkg_scope`,
/// in `.bling`-then-`.h`-then-`.c` order (headers before their own bodies,
/// matching a C translation unit's usual include order).
pub fn load_package_files<'a>(
    arenas: AstArenas<'a>,
    fileset: &mut FileSet,
    interner: &mut Interner,
    scopes: &mut Scopes<'a>,
    pkg_scope: ScopeId,
    dir: &Path,
) -> Result<Vec<File<'a>>> {
    let listing = walk_package_dir(dir)?;
    let mut out = Vec::new();
    for path in &listing.bling {
        out.push(parse_one(arenas, fileset, interner, scopes, pkg_scope, path, false)?);
    }
    for path in listing.headers.iter().chain(listing.c_sources.iter()) {
        out.push(parse_one(arenas, fileset, interner, scopes, pkg_scope, path, true)?);
    }
    if out.is_empty() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no .bling/.c/.h files in package directory");
        return Err(CompileError::io(dir, err));
    }
    Ok(out)
}

fn parse_one<'a>(
    arenas: AstArenas<'a>,
    fileset: &mut FileSet,
    interner: &mut Interner,
    scopes: &mut Scopes<'a>,
    pkg_scope: ScopeId,
    path: &Path,
    c_mode: bool,
) -> Result<File<'a>> {
    let src = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    let idx = fileset.add_file(path.display().to_string(), src);
    parse_file(fileset, idx, interner, arenas, scopes, pkg_scope, c_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_base::Arena;
    use sl_compile::{CheckConfig, Compiler};
    use sl_syntax::ast::{Decl, Expr, Stmt};

    #[test]
    fn loads_and_checks_a_two_package_import() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("greet")).unwrap();
        std::fs::write(
            root.path().join("greet/greet.bling"),
            "package (greet);\nfunc hello() int { return 1; }\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.path().join("main")).unwrap();
        std::fs::write(
            root.path().join("main/main.bling"),
            "package (main);\nimport (\"greet\");\nfunc main() int { return greet.hello(); }\n",
        )
        .unwrap();

        let decls: &'static Arena<Decl<'static>> = Box::leak(Box::new(Arena::new()));
        let exprs: &'static Arena<Expr<'static>> = Box::leak(Box::new(Arena::new()));
        let stmts: &'static Arena<Stmt<'static>> = Box::leak(Box::new(Arena::new()));
        let arenas = AstArenas::new(decls, exprs, stmts);
        let mut compiler: Compiler<'static> = Compiler::new(arenas);
        let mut loader = DirLoader::new(root.path().to_path_buf());
        let pkg = compiler.check_package("main", None, &mut loader, &CheckConfig::default()).expect("check");
        assert_eq!(compiler.interner.resolve(pkg.name), "main");
        assert_eq!(pkg.imports.len(), 1);
    }
}
