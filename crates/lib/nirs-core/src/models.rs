//! Records produced by the extractor and the indexer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Function,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
        }
    }
}

/// One entry of a `properties ... end` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub default: Option<String>,
    pub comment: Option<String>,
    /// The trimmed source line the entry was parsed from.
    pub raw: String,
}

/// A function declared inside the file, other than the entity itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub returns: Option<String>,
    pub params: String,
    pub comment: Option<String>,
}

/// Structural description of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    /// Declared superclass; empty when none.
    pub parent: String,
    pub description: String,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    /// Declaration line for function files; empty for classes.
    pub signature: String,
    pub path: PathBuf,
}

impl Entity {
    #[must_use]
    pub fn empty(kind: EntityKind, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: String::new(),
            description: String::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            signature: String::new(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        if self.parent.is_empty() {
            None
        } else {
            Some(&self.parent)
        }
    }

    /// True when at least one property carries a default or an inline comment.
    #[must_use]
    pub fn has_structured_properties(&self) -> bool {
        self.properties
            .iter()
            .any(|prop| prop.default.is_some() || prop.comment.is_some())
    }
}

/// A category with the files discovered beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// A file located by name somewhere in the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    pub category: String,
    pub name: String,
    pub path: PathBuf,
}
