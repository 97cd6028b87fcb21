//! `slc` — the SL compiler's command-line interface.
//!
//! This crate provides the `slc` binary that checks and builds SL packages.
//! It can also be used as a library for programmatic access to the build
//! system.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `slc compile <path>` | Build a package and its transitive imports |
//! | `slc emit <src> -o <dst>` | Check and emit a single file |
//!
//! # Module Structure
//!
//! - [`cli`] — command-line argument parsing and dispatch
//! - [`compile`] — single-file check-and-emit, used by `emit`
//! - [`project`] — configuration, package discovery, and the build driver
//!   - [`project::config`] — `sl.toml` parsing
//!   - [`project::walk`] — package directory enumeration
//!   - [`project::loader`] — [`sl_compile::PackageLoader`] over the file system
//!   - [`project::build`][mod@project::build] — build orchestration
//!
//! # Library usage
//!
//! ```no_run
//! use slc::project::{build, BuildConfig};
//! use std::env;
//!
//! let root = env::current_dir().unwrap();
//! let config = BuildConfig::new("main", root);
//! let result = build(&config)?;
//! println!("built {}", result.entry.artifact_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod compile;
pub mod project;

/// Entry point for the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
/// See [`cli::run_cli`] for details.
pub use cli::run_cli;
