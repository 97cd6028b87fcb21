//! The fatal error taxonomy every compiler pass returns.
//!
//! Every category carries enough to render `<file>:<line>:<col>: <message>`
//! plus a one-line source excerpt once paired with the [`FileSet`] that
//! resolved the `Pos`. No pass recovers from one of these; they propagate
//! via `?` up to the CLI boundary, which is the only place that prints and
//! exits the process.
//!
//! # Example
//!
//! ```
//! use sl_base::{CompileError, FileSet, Pos};
//!
//! fn check_positive(n: i64, pos: Pos) -> Result<(), CompileError> {
//!     if n < 0 {
//!         return Err(CompileError::ty(pos, "expected a non-negative value"));
//!     }
//!     Ok(())
//! }
//!
//! let mut set = FileSet::new();
//! let f = set.add_file("a.bling", "-1");
//! let err = check_positive(-1, set.file(f).pos(0)).unwrap_err();
//! assert!(err.render(&set).contains("a.bling:1:1"));
//! ```

use crate::pos::{FileSet, Pos};
use crate::style::Style;
use std::fmt;
use std::path::PathBuf;

/// One of the six fatal error categories from the compiler's error taxonomy.
#[derive(Debug)]
pub enum CompileError {
    /// File open/read/write/stat/mkdir failure.
    Io { path: PathBuf, source: std::io::Error },
    /// Unterminated comment/string, illegal byte.
    Scan { pos: Pos, message: String },
    /// "expected TOKEN, got ...", unsupported dialect feature, bad expression.
    Parse { pos: Pos, message: String },
    /// Unresolved identifier, duplicate declaration, wrong object kind.
    Resolve { pos: Pos, message: String },
    /// Not assignable, not comparable, not an lvalue, arg count mismatch, ...
    Type { pos: Pos, message: String },
    /// Reachable only on compiler bugs.
    Internal { message: String },
}

impl CompileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompileError::Io { path: path.into(), source }
    }

    pub fn scan(pos: Pos, message: impl Into<String>) -> Self {
        CompileError::Scan { pos, message: message.into() }
    }

    pub fn parse(pos: Pos, message: impl Into<String>) -> Self {
        CompileError::Parse { pos, message: message.into() }
    }

    pub fn resolve(pos: Pos, message: impl Into<String>) -> Self {
        CompileError::Resolve { pos, message: message.into() }
    }

    pub fn ty(pos: Pos, message: impl Into<String>) -> Self {
        CompileError::Type { pos, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal { message: message.into() }
    }

    fn pos(&self) -> Option<Pos> {
        match self {
            CompileError::Io { .. } | CompileError::Internal { .. } => None,
            CompileError::Scan { pos, .. }
            | CompileError::Parse { pos, .. }
            | CompileError::Resolve { pos, .. }
            | CompileError::Type { pos, .. } => Some(*pos),
        }
    }

    fn message(&self) -> String {
        match self {
            CompileError::Io { path, source } => format!("{}: {}", path.display(), source),
            CompileError::Scan { message, .. }
            | CompileError::Parse { message, .. }
            | CompileError::Resolve { message, .. }
            | CompileError::Type { message, .. }
            | CompileError::Internal { message } => message.clone(),
        }
    }

    /// Renders the full `<file>:<line>:<col>: <message>` form with a
    /// one-line source excerpt, resolved against `fileset`. This is what
    /// the CLI prints to stderr before exiting 1.
    pub fn render(&self, fileset: &FileSet) -> String {
        match self.pos() {
            Some(pos) => {
                let position = fileset.position(pos);
                let excerpt = fileset.excerpt(pos);
                format!(
                    "{}: {}\n  {}",
                    Style::bold_red(&position.to_string()),
                    self.message(),
                    excerpt
                )
            }
            None => format!("{}: {}", Style::bold_red("error"), self.message()),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Alias for `std::result::Result<T, CompileError>`. Every pass of the
/// compiler returns this, propagated with `?`.
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_position_and_excerpt() {
        let mut set = FileSet::new();
        let f = set.add_file("a.bling", "var x int = \"s\";");
        let err = CompileError::ty(set.file(f).pos(12), "not assignable: int from *char");
        let rendered = err.render(&set);
        assert!(rendered.contains("a.bling:1:13"));
        assert!(rendered.contains("not assignable"));
        assert!(rendered.contains("var x int"));
    }

    #[test]
    fn internal_error_has_no_position() {
        let set = FileSet::new();
        let err = CompileError::internal("unreachable: bad tag");
        let rendered = err.render(&set);
        assert!(rendered.contains("unreachable"));
    }

    #[test]
    fn io_error_wraps_source() {
        let path = PathBuf::from("missing.bling");
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = CompileError::io(path, io_err);
        assert!(err.to_string().contains("missing.bling"));
        use std::error::Error;
        assert!(err.source().is_some());
    }
}
