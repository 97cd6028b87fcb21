//! Project-level plumbing: configuration, package discovery, and the build
//! driver that ties `sl_compile` to the file system.
//!
//! # Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Parse `sl.toml` (external tool paths) |
//! | [`walk`] | Enumerate a package directory's `.bling`/`.c`/`.h` files |
//! | [`loader`] | [`sl_compile::PackageLoader`] backed by [`walk`] |
//! | [`build`][mod@build] | Check + emit + invoke `cc`/`ar` per package |

pub mod build;
pub mod config;
pub mod loader;
pub mod walk;

pub use build::{build, Artifact, BuildConfig, BuildError, BuildResult};
pub use config::{Config, ConfigError, Tools};
pub use loader::DirLoader;
pub use walk::{walk_package_dir, PackageFiles};
