//! Loading pattern lists.
//!
//! Pattern files hold one pattern per line. Trailing whitespace at the end
//! of the whole buffer is dropped before splitting, so a final newline does
//! not produce an empty pattern; whitespace inside the buffer is kept,
//! including a `\r` before each `\n` in CRLF files.

use crate::automaton::Automaton;
use crate::compiler::Compiler;
use crate::error::Result;
use log::debug;
use std::io::Read;
use std::path::Path;

/// An ordered, owned list of byte patterns.
///
/// # Examples
///
/// ```rust
/// use acism::PatternSet;
///
/// let patterns = PatternSet::split(b"GET\nPOST\nPUT\n", b'\n');
/// assert_eq!(patterns.len(), 3);
/// assert_eq!(patterns.get(1), Some(&b"POST"[..]));
///
/// let automaton = patterns.compile()?;
/// assert!(automaton.is_match(b"POST /index.html"));
/// # Ok::<(), acism::AcismError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Vec<u8>>,
}

fn is_trailing_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `buffer` on `separator` after trimming trailing whitespace.
    ///
    /// Empty pieces between two separators become empty patterns; an
    /// empty (or all-whitespace) buffer yields no patterns at all.
    pub fn split(buffer: &[u8], separator: u8) -> Self {
        let end = buffer
            .iter()
            .rposition(|&b| !is_trailing_space(b))
            .map_or(0, |last| last + 1);
        let trimmed = &buffer[..end];
        if trimmed.is_empty() {
            return Self::new();
        }
        trimmed
            .split(|&b| b == separator)
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Read all of `reader` and split it into lines.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(Self::split(&buffer, b'\n'))
    }

    /// Read a pattern file, one pattern per line.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = std::fs::read(path)?;
        let patterns = Self::split(&buffer, b'\n');
        debug!("loaded {} patterns from {}", patterns.len(), path.display());
        Ok(patterns)
    }

    pub fn push(&mut self, pattern: impl Into<Vec<u8>>) {
        self.patterns.push(pattern.into());
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The pattern reported as index `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.patterns.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.patterns.iter().map(Vec::as_slice)
    }

    pub fn as_slice(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// Compile with the default configuration.
    pub fn compile(&self) -> Result<Automaton> {
        Compiler::new().compile(&self.patterns)
    }

    pub fn compile_with(&self, compiler: &Compiler) -> Result<Automaton> {
        compiler.compile(&self.patterns)
    }
}

impl<T: Into<Vec<u8>>> FromIterator<T> for PatternSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a [u8];
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Vec<u8>>, fn(&'a Vec<u8>) -> &'a [u8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns
            .iter()
            .map(Vec::as_slice as fn(&'a Vec<u8>) -> &'a [u8])
    }
}
