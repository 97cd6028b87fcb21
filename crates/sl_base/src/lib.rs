#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sl_base
//!
//! Pure structural atoms shared by every stage of the SL compiler.
//!
//! - [`Arena`] — bump allocation for stable AST references
//! - [`Interner`]/[`Symbol`] — string interning for O(1) identifier equality
//! - [`Pos`]/[`FileSet`]/[`File`] — absolute source positions and the
//!   file/line/column map they resolve to
//! - [`CompileError`]/[`Result`] — the fatal error taxonomy every pass returns
//! - [`Style`] — ANSI terminal styling for diagnostics
//!
//! This crate has no knowledge of SL's grammar or semantics; it is pure
//! infrastructure that the later crates build on.

pub mod arena;
pub mod error;
pub mod intern;
pub mod pos;
pub mod style;

pub use arena::Arena;
pub use error::{CompileError, Result};
pub use intern::{Interner, Symbol, SymbolEq};
pub use pos::{File, FileSet, Pos, Position};
pub use style::Style;
