#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sl_compile
//!
//! The two-pass package-level type checker, predeclared universe, and C
//! emitter for SL — the semantic half of the pipeline `sl_syntax` feeds.
//!
//! ## Architecture
//!
//! ```text
//! sl_syntax::File (unresolved AST, file scope)
//!      │
//!      ▼
//! ┌───────────┐     ┌────────────┐
//! │ universe  │ ──▶ │ check::     │
//! │ (builtins)│     │ Compiler    │
//! └───────────┘     └────────────┘
//!      │
//!      ▼
//! check::Package (scope + Resolutions: objects, types, `.`/`->`)
//!      │
//!      ▼
//! emit::Emitter ──▶ header text, body text
//! ```
//!
//! - [`universe`]: predeclares primitive types, constants, and builtins.
//! - [`check`]: `Compiler`/`Package`/`Resolutions`, the two-pass checker.
//! - [`emit`]: tree-walking C emitter (header + body split).
//! - [`emit_sl`]: tree-walking SL emitter, for `slc emit`'s `.bling`
//!   destination case (spec.md §6).
//!
//! Discovering *which* files make up an imported package is left to a
//! [`check::PackageLoader`] implementation the caller supplies — `apps/slc`
//! implements one backed by the file-system package walker.

pub mod check;
pub mod emit;
pub mod emit_sl;
pub mod universe;

pub use check::{CheckConfig, Compiler, NoImports, Package, PackageLoader, Resolutions};
pub use emit::Emitter;
pub use emit_sl::SlEmitter;
