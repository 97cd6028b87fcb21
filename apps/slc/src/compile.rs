//! Single-file entry points used by the `emit` subcommand.
//!
//! `compile <path>` goes through [`crate::project::build`] instead, since it
//! needs the full package/import graph; this module covers the narrower case
//! of checking and emitting one source file in isolation, with no import
//! resolution at all (an [`sl_compile::NoImports`] loader).

use std::path::Path;

use sl_base::{CompileError, Result};
use sl_compile::{CheckConfig, Compiler, Emitter, NoImports, SlEmitter};
use sl_syntax::ast::AstArenas;

pub enum EmitOutput {
    /// C header + body, destined for `<dst>.h`/`<dst>.c`.
    C { header: String, body: String },
    /// SL source, destined for a single `.bling` file.
    Sl { source: String },
}

/// Checks the single file at `src` as its own one-file package (named after
/// its own package clause) and emits either C (header/body) or, when
/// `as_sl` is set, re-emits it as SL source. Fails if the file contains an
/// `import` declaration — single-file emission has no package root to
/// resolve imports against.
pub fn emit_file(src: &Path, c_mode: bool, as_sl: bool) -> Result<EmitOutput> {
    let text = std::fs::read_to_string(src).map_err(|e| CompileError::io(src, e))?;

    let decls = sl_base::Arena::new();
    let exprs = sl_base::Arena::new();
    let stmts = sl_base::Arena::new();
    let arenas = AstArenas::new(&decls, &exprs, &stmts);
    let mut compiler = Compiler::new(arenas);

    let idx = compiler.fileset.add_file(src.display().to_string(), text);
    let scope = compiler.scopes.new_scope(Some(compiler.universe));
    let file = sl_syntax::parser::parse_file(
        &mut compiler.fileset,
        idx,
        &mut compiler.interner,
        arenas,
        &mut compiler.scopes,
        scope,
        c_mode,
    )?;

    let path_key = src.display().to_string();
    let mut loader = NoImports;
    let pkg = compiler.check_package(&path_key, Some(vec![file]), &mut loader, &CheckConfig::default())?;

    if as_sl {
        let mut emitter = SlEmitter::new(&compiler);
        Ok(EmitOutput::Sl { source: emitter.emit_package(&pkg) })
    } else {
        let mut emitter = Emitter::new(&compiler);
        Ok(EmitOutput::C { header: emitter.emit_header(&pkg), body: emitter.emit_body(&pkg) })
    }
}
