use std::io;
use std::path::{Path, PathBuf};

/// A documentation file: where it came from and its full text.
/// Immutable once read; sections and examples borrow from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier as given by the caller (used in test names and titles).
    pub path: PathBuf,
    pub source: String,
    /// The source file ID (for error reporting with codespan-reporting).
    pub file_id: usize,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let source = match source.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => source,
        };
        Document {
            path: path.into(),
            source,
            file_id: 0,
        }
    }

    /// Read a document from disk.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "read document");
        Ok(Document::new(path, source))
    }

    pub fn with_file_id(mut self, file_id: usize) -> Self {
        self.file_id = file_id;
        self
    }

    /// The document identifier as written by the caller, e.g. `README.rdoc`.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// Convert a byte offset in the source to a 1-based line number.
    pub fn line_of(&self, offset: usize) -> usize {
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}
