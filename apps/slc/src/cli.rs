//! Command-line argument parsing and dispatch.
//!
//! Two subcommands, matching spec.md §6's CLI surface exactly: `compile`
//! builds a package and its transitive imports into `gen/`; `emit` checks a
//! single file in isolation and writes it to an explicit destination, as C
//! (`--out` ending `.c`/`.h`) or, with `--c-mode`, parses the input as C
//! instead of SL. `--out` ending `.bling` re-emits the checked file as SL
//! source instead.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sl_base::Result;

use crate::compile::{emit_file, EmitOutput};
use crate::project::{build, BuildConfig};

#[derive(Parser)]
#[command(name = "slc", version, about = "The SL compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check `<path>` and every package it imports, then build each into
    /// `gen/`, linking an executable when the entry package is named `main`.
    Compile {
        /// Package directory to build.
        path: PathBuf,
        /// Rebuild every package even if its `gen/` artifacts look current.
        #[arg(long)]
        force: bool,
    },
    /// Check a single source file and emit it to `--out`: C (written as
    /// `<out>.h`/`<out>.c`) when `out` ends in `.c`/`.h`, or SL source
    /// (written to `out` as given) when `out` ends in `.bling`.
    Emit {
        /// Source file to check and emit.
        src: PathBuf,
        /// Destination, dispatched on its extension (`.c`/`.h` vs `.bling`).
        #[arg(short, long)]
        out: PathBuf,
        /// Parse `src` using the C dialect instead of SL.
        #[arg(long)]
        c_mode: bool,
    },
}

/// Parses `std::env::args()` and runs the selected subcommand. Returns `Err`
/// on any scan/parse/check/build failure; `main` turns that into exit code 1.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Compile { path, force } => run_compile(path, force),
        Command::Emit { src, out, c_mode } => run_emit(src, out, c_mode),
    }
}

fn run_compile(path: PathBuf, force: bool) -> Result<()> {
    let root = std::env::current_dir().map_err(|e| sl_base::CompileError::io(&path, e))?;
    let entry = path.display().to_string();
    let mut config = BuildConfig::new(entry, root);
    config.force = force;
    let result = build(&config).map_err(|e| sl_base::CompileError::internal(e.to_string()))?;
    println!("built {}", result.entry.artifact_path.display());
    Ok(())
}

/// `out`'s extension picks the emission dialect: `.bling` re-emits `src` as
/// SL source written verbatim to `out`; anything else (`.c`/`.h`/no
/// extension at all) emits C, writing `<out>.h`/`<out>.c` siblings, per
/// spec.md §6's "emit a single file as either C ... or SL".
fn run_emit(src: PathBuf, out: PathBuf, c_mode: bool) -> Result<()> {
    let as_sl = out.extension().and_then(|e| e.to_str()) == Some("bling");
    let output = emit_file(&src, c_mode, as_sl)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| sl_base::CompileError::io(&out, e))?;
    }
    match output {
        EmitOutput::Sl { source } => {
            std::fs::write(&out, source).map_err(|e| sl_base::CompileError::io(&out, e))?;
            println!("wrote {}", out.display());
        }
        EmitOutput::C { header, body } => {
            let header_path = out.with_extension("h");
            let c_path = out.with_extension("c");
            std::fs::write(&header_path, header).map_err(|e| sl_base::CompileError::io(&header_path, e))?;
            std::fs::write(&c_path, body).map_err(|e| sl_base::CompileError::io(&c_path, e))?;
            println!("wrote {} and {}", header_path.display(), c_path.display());
        }
    }
    Ok(())
}
