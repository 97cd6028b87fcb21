//! External-tool configuration (`sl.toml`).
//!
//! Grounded on the teacher's `project/manifest.rs` `serde`+`toml` load
//! pattern, trimmed to exactly the two configurable absolute paths spec.md
//! §6 calls out: the C compiler and the archiver. Neither has a meaningful
//! default that works on every machine, so a missing `sl.toml` falls back
//! to bare `cc`/`ar`, resolved via `$PATH` at spawn time (spec.md doesn't
//! require `sl.toml` to exist at all for `compile`/`emit` to work).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// `sl.toml`'s `[tools]` table: absolute paths to the external C compiler
/// and archiver the build driver invokes (spec.md §6's "External tools").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: Tools,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tools {
    /// Path to a C compiler accepting
    /// `-fms-extensions -Wno-microsoft-anon-tag -g -I. -c -o <dst> <src>`.
    #[serde(default = "default_cc")]
    pub cc_path: PathBuf,
    /// Path to an archiver accepting `rsc <lib> <objs...>`.
    #[serde(default = "default_archiver")]
    pub archiver_path: PathBuf,
}

fn default_cc() -> PathBuf {
    PathBuf::from("cc")
}

fn default_archiver() -> PathBuf {
    PathBuf::from("ar")
}

impl Default for Tools {
    fn default() -> Self {
        Tools { cc_path: default_cc(), archiver_path: default_archiver() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config { tools: Tools::default() }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{e}"),
            ConfigError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads `sl.toml` from `dir` if present; returns the all-default
    /// config (bare `cc`/`ar`) if the file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Config, ConfigError> {
        let path = dir.join("sl.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
        toml::from_str(&text).map_err(ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.tools.cc_path, PathBuf::from("cc"));
        assert_eq!(config.tools.archiver_path, PathBuf::from("ar"));
    }

    #[test]
    fn parses_custom_tool_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sl.toml"),
            "[tools]\ncc_path = \"/usr/bin/clang\"\narchiver_path = \"/usr/bin/llvm-ar\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.tools.cc_path, PathBuf::from("/usr/bin/clang"));
        assert_eq!(config.tools.archiver_path, PathBuf::from("/usr/bin/llvm-ar"));
    }
}
