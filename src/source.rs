use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StyleGuardError};

/// Dominant line-ending style of a file, used when fixes insert newlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    #[default]
    Lf,
    Crlf,
}

impl NewlineStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// A loaded source file.
///
/// The original bytes are kept untouched for write-back; all lexing and rule
/// evaluation happens on `text`, a copy with CRLF/CR normalized to LF. The
/// offsets of removed `\r` bytes are recorded so that edit ranges computed
/// against `text` can be mapped back onto the original bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    original: Vec<u8>,
    text: String,
    /// Byte offset (into `text`) of each line start.
    line_offsets: Vec<usize>,
    /// Offsets into `text` of LF characters that were preceded by a removed `\r`.
    removed_crs: Vec<usize>,
    newline: NewlineStyle,
}

impl SourceFile {
    /// Load a file from disk.
    ///
    /// # Errors
    /// Returns `FileRead` if the file cannot be read and `NotUtf8` if its
    /// content is not valid UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| StyleGuardError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(path.to_path_buf(), bytes)
    }

    /// Build a source file from in-memory bytes (stdin input, tests, re-checks).
    ///
    /// # Errors
    /// Returns `NotUtf8` if the content is not valid UTF-8.
    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>) -> Result<Self> {
        if std::str::from_utf8(&bytes).is_err() {
            return Err(StyleGuardError::NotUtf8 { path });
        }

        let (text, removed_crs) = normalize(&bytes);
        let crlf = removed_crs.len();
        let total_newlines = text.bytes().filter(|&b| b == b'\n').count();
        let newline = if crlf * 2 > total_newlines {
            NewlineStyle::Crlf
        } else {
            NewlineStyle::Lf
        };

        let mut line_offsets = vec![0];
        for (idx, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_offsets.push(idx + 1);
            }
        }

        Ok(Self {
            path,
            original: bytes,
            text,
            line_offsets,
            removed_crs,
            newline,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    #[must_use]
    pub const fn newline(&self) -> NewlineStyle {
        self.newline
    }

    /// Map a byte offset in the normalized text to 1-based (line, column).
    #[must_use]
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_offsets.partition_point(|&start| start <= offset);
        let line_start = self.line_offsets[line - 1];
        (line, offset - line_start + 1)
    }

    /// Byte offset (into the normalized text) of the start of a 1-based line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_offsets[line - 1]
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Map an offset in the normalized text back to an offset in the
    /// original bytes. A boundary that points at an LF whose `\r` was removed
    /// maps to just before that `\r`, so a range covering the LF covers the
    /// whole CRLF pair and a range ending before the LF leaves it intact.
    #[must_use]
    pub fn to_original_offset(&self, offset: usize) -> usize {
        offset + self.removed_crs.partition_point(|&pos| pos < offset)
    }
}

fn normalize(bytes: &[u8]) -> (String, Vec<usize>) {
    let mut out = Vec::with_capacity(bytes.len());
    let mut removed = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                removed.push(out.len());
                out.push(b'\n');
                i += 2;
            }
            b'\r' => {
                out.push(b'\n');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    // Input was validated as UTF-8 and only ASCII bytes were rewritten.
    let text = String::from_utf8(out).expect("normalization preserves UTF-8");
    (text, removed)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
