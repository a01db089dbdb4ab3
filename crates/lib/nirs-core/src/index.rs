//! Discovery of categories, modules and demos on disk.
//!
//! Every call walks the file system again; callers never see stale results.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};

use crate::context::ToolboxContext;
use crate::models::{Category, ModuleLocation};
use crate::source::file_stem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    CategoryNotFound(String),
    ModuleNotFound { category: String, name: String },
    DemoNotFound(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryNotFound(category) => write!(f, "category not found: {category}"),
            Self::ModuleNotFound { category, name } => {
                write!(f, "module not found: {category}/{name}")
            }
            Self::DemoNotFound(name) => write!(f, "demo not found: {name}"),
        }
    }
}

impl Error for IndexError {}

/// Read-only view over the namespace and demos directories of a toolbox.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceIndex<'a> {
    ctx: &'a ToolboxContext,
}

impl<'a> NamespaceIndex<'a> {
    #[must_use]
    pub const fn new(ctx: &'a ToolboxContext) -> Self {
        Self { ctx }
    }

    /// Maps each marker-prefixed subdirectory to every source file beneath it.
    #[must_use]
    pub fn discover(&self) -> BTreeMap<String, Vec<PathBuf>> {
        let layout = self.ctx.layout();
        let mut categories = BTreeMap::new();
        for dir in list_subdirectories(self.ctx.namespace_dir()) {
            let Some(dir_name) = dir.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(category) = layout.category_name(dir_name) else {
                continue;
            };
            let files = self.find_files(&dir, &format!("*.{}", layout.extension));
            categories.insert(category.to_string(), files);
        }
        debug!(count = categories.len(), "discovered categories");
        categories
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.discover()
            .into_iter()
            .map(|(name, files)| Category { name, files })
            .collect()
    }

    /// Sorted category names.
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        self.discover().into_keys().collect()
    }

    #[must_use]
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.ctx
            .namespace_dir()
            .join(self.ctx.layout().category_dir_name(category))
    }

    /// Directory of an existing category.
    ///
    /// # Errors
    /// Returns `IndexError::CategoryNotFound` if the directory does not exist.
    pub fn category_dir(&self, category: &str) -> Result<PathBuf, IndexError> {
        let dir = self.category_path(category);
        if is_plain_name(category) && dir.is_dir() {
            Ok(dir)
        } else {
            Err(IndexError::CategoryNotFound(category.to_string()))
        }
    }

    /// Locates `<category>/<name>.<ext>`, falling back to nested directories.
    ///
    /// # Errors
    /// Returns `IndexError::ModuleNotFound` when no file matches.
    pub fn resolve(&self, category: &str, name: &str) -> Result<PathBuf, IndexError> {
        let not_found = || IndexError::ModuleNotFound {
            category: category.to_string(),
            name: name.to_string(),
        };
        if !is_plain_name(category) || !is_plain_name(name) {
            return Err(not_found());
        }

        let dir = self.category_path(category);
        let file_name = self.ctx.layout().file_name(name);
        let direct = dir.join(&file_name);
        if direct.is_file() {
            return Ok(direct);
        }
        self.find_files(&dir, &Pattern::escape(&file_name))
            .into_iter()
            .next()
            .ok_or_else(not_found)
    }

    /// Every file whose base name equals `name`, in category order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<ModuleLocation> {
        if !is_plain_name(name) {
            return Vec::new();
        }
        self.discover()
            .into_iter()
            .flat_map(|(category, files)| {
                files
                    .into_iter()
                    .filter(|path| file_stem(path) == name)
                    .map(move |path| ModuleLocation {
                        category: category.clone(),
                        name: name.to_string(),
                        path,
                    })
            })
            .collect()
    }

    /// First match for `name`, restricted to `category` when given.
    #[must_use]
    pub fn find_module(&self, name: &str, category: Option<&str>) -> Option<ModuleLocation> {
        match category {
            Some(category) => self.resolve(category, name).ok().map(|path| ModuleLocation {
                category: category.to_string(),
                name: name.to_string(),
                path,
            }),
            None => self.find_all(name).into_iter().next(),
        }
    }

    /// Source files directly inside `dir`, sorted.
    #[must_use]
    pub fn direct_files(&self, dir: &Path) -> Vec<PathBuf> {
        let layout = self.ctx.layout();
        let mut files: Vec<PathBuf> = read_entries(dir)
            .into_iter()
            .filter(|path| path.is_file() && layout.is_source_file(path))
            .collect();
        files.sort();
        files
    }

    /// Subdirectories directly inside `dir`, sorted.
    #[must_use]
    pub fn subdirectories(&self, dir: &Path) -> Vec<PathBuf> {
        list_subdirectories(dir)
    }

    #[must_use]
    pub fn demo_files(&self) -> Vec<PathBuf> {
        self.direct_files(self.ctx.demos_dir())
    }

    /// Path of a demo script.
    ///
    /// # Errors
    /// Returns `IndexError::DemoNotFound` if the script does not exist.
    pub fn resolve_demo(&self, name: &str) -> Result<PathBuf, IndexError> {
        let path = self.ctx.demos_dir().join(self.ctx.layout().file_name(name));
        if is_plain_name(name) && path.is_file() {
            Ok(path)
        } else {
            Err(IndexError::DemoNotFound(name.to_string()))
        }
    }

    fn find_files(&self, dir: &Path, file_pattern: &str) -> Vec<PathBuf> {
        let root = Pattern::escape(&dir.to_string_lossy());
        let pattern = format!("{root}/**/{file_pattern}");
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(err) => {
                warn!(%pattern, error = %err, "invalid search pattern");
                return Vec::new();
            }
        };

        let layout = self.ctx.layout();
        let mut files: Vec<PathBuf> = paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path");
                    None
                }
            })
            .filter(|path| path.is_file() && layout.is_source_file(path))
            .collect();
        files.sort();
        files
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn read_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                    None
                }
            })
            .collect(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "directory does not exist");
            Vec::new()
        }
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "failed to list directory");
            Vec::new()
        }
    }
}

fn list_subdirectories(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = read_entries(dir)
        .into_iter()
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}
