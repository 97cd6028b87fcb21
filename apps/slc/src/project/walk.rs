//! Package directory walker.
//!
//! Spec.md §1 lists "the file-system walker that enumerates package
//! directories" as an external collaborator whose contract is stated, not
//! specified in depth. Grounded on
//! `examples/original_source/bling/build/build.c`'s `ioutil$readDir` +
//! `bytes$hasSuffix` flat per-directory listing: a package is exactly one
//! directory, non-recursive, and its member files are distinguished purely
//! by extension — `.bling` (SL dialect) vs `.c`/`.h` (C dialect,
//! passthrough per spec.md §6).

use std::path::{Path, PathBuf};

use sl_base::CompileError;

/// One package directory's members, sorted by filename so a rebuild is
/// deterministic regardless of the host's directory-listing order.
#[derive(Debug, Default)]
pub struct PackageFiles {
    /// `.bling` source files, checked and re-emitted as C.
    pub bling: Vec<PathBuf>,
    /// `.c` source files, compiled as-is and archived alongside generated
    /// objects.
    pub c_sources: Vec<PathBuf>,
    /// `.h` headers, parsed in C mode to register their declarations for
    /// cross-package resolution, then passed through to `gen/` untouched.
    pub headers: Vec<PathBuf>,
}

/// Lists the members of the package directory `dir`. Fails with an I/O
/// error if `dir` doesn't exist or isn't readable — there is no recovery,
/// matching spec.md §7's I/O error category.
pub fn walk_package_dir(dir: &Path) -> Result<PackageFiles, CompileError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))?;
    let mut files = PackageFiles::default();
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("bling") => files.bling.push(path),
            Some("c") => files.c_sources.push(path),
            Some("h") => files.headers.push(path),
            _ => {}
        }
    }
    files.bling.sort();
    files.c_sources.sort();
    files.headers.sort();
    Ok(files)
}

/// Newest modification time among every file in `files` (`.bling`, `.c`,
/// and `.h` alike), used for the timestamp-based rebuild short-circuit
/// spec.md §1's Non-goals permit ("incremental recompilation beyond
/// timestamp-based short-circuiting").
pub fn newest_mtime(files: &PackageFiles) -> std::io::Result<std::time::SystemTime> {
    let mut newest = std::time::SystemTime::UNIX_EPOCH;
    for path in files.bling.iter().chain(files.c_sources.iter()).chain(files.headers.iter()) {
        let modified = std::fs::metadata(path)?.modified()?;
        if modified > newest {
            newest = modified;
        }
    }
    Ok(newest)
}

/// Modification time of `path`, or `UNIX_EPOCH` if it doesn't exist yet
/// (meaning "always rebuild").
pub fn mtime_or_epoch(path: &Path) -> std::time::SystemTime {
    std::fs::metadata(path).and_then(|m| m.modified()).unwrap_or(std::time::SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_sorts_and_buckets_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.bling"), "").unwrap();
        std::fs::write(dir.path().join("a.bling"), "").unwrap();
        std::fs::write(dir.path().join("rt.c"), "").unwrap();
        std::fs::write(dir.path().join("rt.h"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let files = walk_package_dir(dir.path()).unwrap();
        assert_eq!(files.bling.len(), 2);
        assert!(files.bling[0].ends_with("a.bling"));
        assert!(files.bling[1].ends_with("b.bling"));
        assert_eq!(files.c_sources.len(), 1);
        assert_eq!(files.headers.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let result = walk_package_dir(Path::new("/no/such/package/dir"));
        assert!(matches!(result, Err(CompileError::Io { .. })));
    }
}
