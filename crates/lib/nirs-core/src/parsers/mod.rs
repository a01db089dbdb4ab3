//! Pattern-based extraction of class and function metadata.
//!
//! Extraction is best-effort: files lacking the expected declarations,
//! blocks or comments produce entities with empty fields rather than errors.
//! Only an unreadable file fails.

mod classdef;
mod function;
pub mod scan;

use std::path::Path;

use crate::models::{Entity, EntityKind};
use crate::source::{SourceError, SourceFile};

/// Extractor for MATLAB-style `classdef` and `function` files.
pub struct MatlabParser;

impl MatlabParser {
    /// Extracts an entity from an already loaded file.
    #[must_use]
    pub fn parse(file: &SourceFile) -> Entity {
        match detect_kind(file.content()) {
            EntityKind::Class => classdef::parse_class(file),
            EntityKind::Function => function::parse_function(file),
        }
    }

    /// Reads and extracts a file.
    ///
    /// # Errors
    /// Returns `SourceError` if the file cannot be read.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Entity, SourceError> {
        let file = SourceFile::read(path)?;
        Ok(Self::parse(&file))
    }
}

/// Class when the first non-empty line opens a `classdef`, otherwise function.
#[must_use]
pub fn detect_kind(content: &str) -> EntityKind {
    let first = content
        .split('\n')
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let opens_class = first
        .strip_prefix("classdef")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '(']));
    if opens_class {
        EntityKind::Class
    } else {
        EntityKind::Function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_decided_by_first_non_empty_line() {
        assert_eq!(detect_kind("\n\nclassdef Foo < handle\n"), EntityKind::Class);
        assert_eq!(detect_kind("classdef(Abstract) Foo\n"), EntityKind::Class);
        assert_eq!(detect_kind("function y = classdefHelper(x)\n"), EntityKind::Function);
        assert_eq!(detect_kind("% classdef Foo\nclassdef Foo\n"), EntityKind::Function);
        assert_eq!(detect_kind(""), EntityKind::Function);
    }

    #[test]
    fn class_with_byte_order_mark_keeps_its_header() {
        let file = SourceFile::from_bytes("Foo.m", b"\xEF\xBB\xBFclassdef Foo < handle\nend\n");
        let entity = MatlabParser::parse(&file);

        assert_eq!(entity.kind, EntityKind::Class);
        assert_eq!(entity.name, "Foo");
        assert_eq!(entity.parent, "handle");
    }

    #[test]
    fn round_trip_property_row() {
        let file = SourceFile::from_text("Foo.m", "classdef Foo\nproperties\n  x = 5; % note\nend");
        let entity = MatlabParser::parse(&file);

        assert_eq!(entity.kind, EntityKind::Class);
        assert_eq!(entity.properties.len(), 1);
        let prop = &entity.properties[0];
        assert_eq!(prop.name, "x");
        assert_eq!(prop.default.as_deref(), Some("5"));
        assert_eq!(prop.comment.as_deref(), Some("note"));
    }
}
