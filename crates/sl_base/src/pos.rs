//! Source positions and the file set they resolve against.
//!
//! `Pos` is an opaque integer key into a [`FileSet`]. The `FileSet` owns an
//! ordered sequence of [`File`] records; each file knows its base offset
//! within the set, its size, and the offsets where every line begins.
//! Resolving a `Pos` to a human-readable `(file, line, column)` triple is a
//! binary search over files, then a binary search over that file's line
//! table.
//!
//! ## Example
//!
//! ```
//! use sl_base::FileSet;
//!
//! let mut set = FileSet::new();
//! let file = set.add_file("a.bling", "func main() int {\n  return 0;\n}");
//! set.file_mut(file).add_line(19); // scanner records this when it crosses the `\n`
//! let pos = set.file(file).pos(20);
//! let position = set.position(pos);
//! assert_eq!(position.line, 2);
//! ```

use std::collections::HashMap;

/// An opaque key into a [`FileSet`]. Never constructed directly outside this
/// module; always produced by [`File::pos`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pos(u32);

impl Pos {
    /// The sentinel "no position" value, used for synthesized nodes that
    /// have no direct source anchor.
    pub const NONE: Pos = Pos(0);

    fn new(raw: u32) -> Self {
        Pos(raw)
    }

    fn raw(self) -> u32 {
        self.0
    }
}

/// A resolved human-readable location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// One source file registered with a [`FileSet`].
///
/// Owns a copy of the source bytes so the scanner/parser can outlive the
/// caller's buffer, and an ordered list of line-start byte offsets, appended
/// to every time the scanner crosses a `\n`.
pub struct File {
    name: String,
    base: u32,
    size: u32,
    src: String,
    /// Offsets (relative to the start of this file) where each line begins.
    /// `lines[0] == 0` always.
    lines: Vec<u32>,
}

impl File {
    fn new(name: impl Into<String>, base: u32, src: String) -> Self {
        let size = src.len() as u32;
        File {
            name: name.into(),
            base,
            size,
            src,
            lines: vec![0],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Records that a new line begins at byte `offset` (relative to this
    /// file, i.e. *not* yet offset by `base`). Offsets must be supplied in
    /// non-decreasing order; out-of-order or duplicate offsets are ignored.
    pub fn add_line(&mut self, offset: usize) {
        let offset = offset as u32;
        if let Some(&last) = self.lines.last() {
            if offset <= last {
                return;
            }
        }
        self.lines.push(offset);
    }

    /// Converts a byte offset within this file to a [`Pos`] in the owning
    /// [`FileSet`].
    pub fn pos(&self, offset: usize) -> Pos {
        Pos::new(self.base + offset as u32)
    }

    /// Resolves a relative byte offset within this file to `(line, column)`.
    /// `line` and `column` are both 1-based.
    fn line_column(&self, offset: u32) -> (u32, u32) {
        let line_index = match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.lines[line_index];
        (line_index as u32 + 1, offset - line_start + 1)
    }

    /// Returns the source text of a single 1-based line, without its
    /// trailing newline.
    pub fn line_string(&self, line: u32) -> &str {
        let idx = (line.saturating_sub(1)) as usize;
        let start = self.lines.get(idx).copied().unwrap_or(self.size) as usize;
        let end = self
            .lines
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.src.len());
        self.src[start..end].trim_end_matches(['\n', '\r'])
    }
}

/// Owns every [`File`] registered during a compilation session and maps
/// absolute [`Pos`] values back to `(file, line, column)` triples.
///
/// Files are appended in the order they are added; `base` offsets are
/// strictly increasing, which is what makes binary search over
/// `file_starts` valid.
#[derive(Default)]
pub struct FileSet {
    files: Vec<File>,
    /// Parallel to `files`: the base offset of each file, kept sorted for
    /// binary search in `file_index`.
    file_starts: Vec<u32>,
    by_name: HashMap<String, usize>,
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            files: Vec::new(),
            file_starts: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a file with its full source text and returns its index.
    /// The file's base offset is one past the end of the previously added
    /// file, so that every `Pos` in the set is unique and `position` can
    /// locate the owning file with a binary search. The scanner is expected
    /// to call [`File::add_line`] as it crosses each newline rather than
    /// have the whole line table precomputed here.
    pub fn add_file(&mut self, name: impl Into<String>, src: impl Into<String>) -> usize {
        let src = src.into();
        let base = self
            .file_starts
            .last()
            .zip(self.files.last())
            .map(|(&b, f)| b + f.size + 1)
            .unwrap_or(1);
        let name = name.into();
        let file = File::new(name.clone(), base, src);
        let idx = self.files.len();
        self.file_starts.push(base);
        self.files.push(file);
        self.by_name.insert(name, idx);
        idx
    }

    pub fn file(&self, idx: usize) -> &File {
        &self.files[idx]
    }

    pub fn file_mut(&mut self, idx: usize) -> &mut File {
        &mut self.files[idx]
    }

    pub fn file_by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Finds the index of the file containing `pos`, by binary search over
    /// file base offsets.
    fn file_index_for(&self, pos: Pos) -> usize {
        let raw = pos.raw();
        match self.file_starts.binary_search(&raw) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// Resolves an absolute `Pos` to its human-readable position. Positions
    /// returned by the scanner for a single file are always non-decreasing,
    /// so repeated calls while scanning forward are effectively O(1)
    /// amortized even though each call is a fresh binary search.
    pub fn position(&self, pos: Pos) -> Position {
        let idx = self.file_index_for(pos);
        let file = &self.files[idx];
        let offset = pos.raw() - file.base;
        let (line, column) = file.line_column(offset);
        Position {
            filename: file.name.clone(),
            offset: offset as usize,
            line,
            column,
        }
    }

    /// One-line excerpt of source around `pos`, for error messages.
    pub fn excerpt(&self, pos: Pos) -> String {
        let position = self.position(pos);
        let idx = self.file_index_for(pos);
        self.files[idx].line_string(position.line).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_resolves_first_line_first_column() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "abc\ndef");
        let pos = set.file(idx).pos(0);
        let p = set.position(pos);
        assert_eq!(p.line, 1);
        assert_eq!(p.column, 1);
    }

    #[test]
    fn position_is_monotone_within_a_file() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "abc\ndef\nghi");
        set.file_mut(idx).add_line(4);
        set.file_mut(idx).add_line(8);
        let mut last = 0;
        for offset in 0..11usize {
            let pos = set.file(idx).pos(offset);
            let p = set.position(pos);
            assert!(p.line >= last);
            last = p.line;
        }
    }

    #[test]
    fn position_resolves_second_line() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "abc\ndef");
        set.file_mut(idx).add_line(4);
        let pos = set.file(idx).pos(4);
        let p = set.position(pos);
        assert_eq!(p.line, 2);
        assert_eq!(p.column, 1);
    }

    #[test]
    fn multiple_files_resolve_to_distinct_names() {
        let mut set = FileSet::new();
        let a = set.add_file("a.bling", "xx");
        let b = set.add_file("b.bling", "yy");
        let pa = set.file(a).pos(0);
        let pb = set.file(b).pos(0);
        assert_eq!(set.position(pa).filename, "a.bling");
        assert_eq!(set.position(pb).filename, "b.bling");
        assert_ne!(pa, pb);
    }

    #[test]
    fn line_string_strips_trailing_newline() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "first\nsecond\n");
        set.file_mut(idx).add_line(6);
        set.file_mut(idx).add_line(13);
        assert_eq!(set.file(idx).line_string(1), "first");
        assert_eq!(set.file(idx).line_string(2), "second");
    }

    #[test]
    fn excerpt_returns_offending_line() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "let x\nbad line\n");
        set.file_mut(idx).add_line(6);
        let pos = set.file(idx).pos(7);
        assert_eq!(set.excerpt(pos), "bad line");
    }

    #[test]
    fn pos_none_is_distinguishable() {
        let mut set = FileSet::new();
        let idx = set.add_file("a.bling", "x");
        let real = set.file(idx).pos(0);
        assert_ne!(real, Pos::NONE);
    }
}
