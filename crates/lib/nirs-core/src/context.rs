//! Immutable description of the analyzed toolbox tree.

use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE_DIR: &str = "+nirs";
pub const DEFAULT_DEMOS_DIR: &str = "demos";
pub const DEFAULT_CATEGORY_MARKER: char = '+';
pub const DEFAULT_SOURCE_EXTENSION: &str = "m";

/// Naming conventions for namespace directories and source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub marker: char,
    pub extension: String,
}

impl SourceLayout {
    #[must_use]
    pub fn new(marker: char, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            marker,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Returns the category name for a directory name carrying the marker.
    #[must_use]
    pub fn category_name<'a>(&self, dir_name: &'a str) -> Option<&'a str> {
        dir_name.strip_prefix(self.marker)
    }

    /// Directory name for a category, marker included.
    #[must_use]
    pub fn category_dir_name(&self, category: &str) -> String {
        format!("{}{category}", self.marker)
    }

    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }

    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_MARKER, DEFAULT_SOURCE_EXTENSION)
    }
}

/// Root paths and layout shared read-only by every component.
///
/// Built once at startup and passed explicitly; tests point it at a
/// temporary directory.
#[derive(Debug, Clone)]
pub struct ToolboxContext {
    root: PathBuf,
    namespace_dir: PathBuf,
    demos_dir: PathBuf,
    layout: SourceLayout,
}

impl ToolboxContext {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            namespace_dir: root.join(DEFAULT_NAMESPACE_DIR),
            demos_dir: root.join(DEFAULT_DEMOS_DIR),
            root,
            layout: SourceLayout::default(),
        }
    }

    #[must_use]
    pub fn with_namespace_dir(mut self, name: impl AsRef<Path>) -> Self {
        self.namespace_dir = self.root.join(name);
        self
    }

    #[must_use]
    pub fn with_demos_dir(mut self, name: impl AsRef<Path>) -> Self {
        self.demos_dir = self.root.join(name);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn namespace_dir(&self) -> &Path {
        &self.namespace_dir
    }

    #[must_use]
    pub fn demos_dir(&self) -> &Path {
        &self.demos_dir
    }

    #[must_use]
    pub const fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Package prefix used in generated call snippets, e.g. `nirs` for `+nirs`.
    #[must_use]
    pub fn package_name(&self) -> String {
        let dir_name = self
            .namespace_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.layout
            .category_name(dir_name)
            .unwrap_or(dir_name)
            .to_string()
    }

    /// Qualified call path for a module, e.g. `nirs.modules.BandPassFilter`.
    #[must_use]
    pub fn qualified_name(&self, category: &str, name: &str) -> String {
        let package = self.package_name();
        if package.is_empty() {
            format!("{category}.{name}")
        } else {
            format!("{package}.{category}.{name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_namespace_and_demos_from_root() {
        let ctx = ToolboxContext::new("/opt/toolbox");

        assert_eq!(ctx.namespace_dir(), Path::new("/opt/toolbox/+nirs"));
        assert_eq!(ctx.demos_dir(), Path::new("/opt/toolbox/demos"));
        assert_eq!(ctx.package_name(), "nirs");
        assert_eq!(
            ctx.qualified_name("modules", "BandPassFilter"),
            "nirs.modules.BandPassFilter"
        );
    }

    #[test]
    fn layout_strips_leading_dot_from_extension() {
        let layout = SourceLayout::new('+', ".src");

        assert_eq!(layout.file_name("Foo"), "Foo.src");
        assert!(layout.is_source_file(Path::new("a/Foo.src")));
        assert!(!layout.is_source_file(Path::new("a/Foo.m")));
        assert_eq!(layout.category_name("+io"), Some("io"));
        assert_eq!(layout.category_name("private"), None);
    }
}
