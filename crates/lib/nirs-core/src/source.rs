use std::{error::Error, fmt, path::{Path, PathBuf}};

/// Error raised when a source file cannot be read at all.
#[derive(Debug)]
pub struct SourceError {
    path: PathBuf,
    source: std::io::Error,
}

impl SourceError {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read {}: {}", self.path.display(), self.source)
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Read-only view of one file, loaded per request.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
    len: usize,
}

impl SourceFile {
    /// Reads a file, replacing undecodable bytes instead of failing.
    ///
    /// # Errors
    /// Returns `SourceError` if the file cannot be opened or read.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Self::from_bytes(path, &bytes)),
            Err(source) => Err(SourceError { path, source }),
        }
    }

    /// Decodes raw bytes; a leading byte order mark is dropped from the text.
    #[must_use]
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        Self {
            path: path.into(),
            content: strip_bom(&text).to_owned(),
            len: bytes.len(),
        }
    }

    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            len: content.len(),
            content: strip_bom(&content).to_owned(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Size of the file on disk in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// File name without extension.
    #[must_use]
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let file = SourceFile::from_bytes("Foo.m", b"% caf\xe9\nfunction y = Foo(x)\n");

        assert!(file.content().starts_with("% caf"));
        assert!(file.content().contains('\u{FFFD}'));
        assert_eq!(file.len(), 27);
        assert_eq!(file.stem(), "Foo");
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        let file = SourceFile::from_bytes("Foo.m", b"\xEF\xBB\xBFclassdef Foo < handle\nend\n");

        assert!(file.content().starts_with("classdef Foo"));
        assert_eq!(file.len(), 29);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SourceFile::read("/definitely/not/here.m").expect_err("read should fail");
        assert_eq!(err.path(), Path::new("/definitely/not/here.m"));
    }
}
