use tracing::debug;

use crate::parsers::scan::first_comment_line;
use crate::render::{Markdown, code};
use crate::source::{SourceFile, file_stem};

use super::{ControlError, NirsControlPlane, plural};

const SUBDIRECTORY_PREVIEW: usize = 5;

/// Lines 2..10 hold the one-line summary of a listed file.
pub(crate) const SUMMARY_SKIP: usize = 1;
pub(crate) const SUMMARY_TAKE: usize = 10;

impl NirsControlPlane {
    /// Lists every category with its file count, largest first.
    #[must_use]
    pub fn list_categories(&self) -> String {
        let mut categories = self.index().categories();
        categories.sort_by(|a, b| {
            b.files
                .len()
                .cmp(&a.files.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        debug!(count = categories.len(), "list_categories");

        let mut doc = Markdown::new();
        doc.heading(1, format!("{} toolbox categories", self.ctx.package_name()));
        doc.paragraph(format!(
            "The toolbox contains **{}**:",
            plural(categories.len(), "category", "categories")
        ));
        for category in &categories {
            let count = plural(category.files.len(), "file", "files");
            doc.heading(2, format!("{} ({count})", category.name));
            doc.bullet(format!(
                "Details: {}",
                code(&format!("category://{}", category.name))
            ));
            doc.blank();
        }
        doc.rule();
        doc.line("Usage:");
        doc.bullet("Browse a category: `category://<category>`");
        doc.bullet("Module details: `module://<category>/<module>`");
        doc.finish()
    }

    /// Lists the modules directly inside a category, or its subdirectories
    /// when it has no direct files.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if a listed file cannot be read.
    pub fn get_category(&self, category: &str) -> Result<String, ControlError> {
        let index = self.index();
        let Ok(dir) = index.category_dir(category) else {
            return Ok(self.category_not_found(category));
        };

        let mut doc = Markdown::new();
        doc.heading(1, format!("{}.{category}", self.ctx.package_name()));

        let files = index.direct_files(&dir);
        if files.is_empty() {
            let subdirs = index.subdirectories(&dir);
            if subdirs.is_empty() {
                doc.line("(no source files in this category)");
                return Ok(doc.finish());
            }
            doc.heading(2, "Submodules");
            for subdir in subdirs {
                let nested = index.direct_files(&subdir);
                let dir_name = subdir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                doc.heading(3, format!("{dir_name} ({})", plural(nested.len(), "file", "files")));
                for path in nested.iter().take(SUBDIRECTORY_PREVIEW) {
                    let stem = file_stem(path);
                    doc.bullet(format!(
                        "{} - {}",
                        code(&stem),
                        code(&format!("module://{category}/{stem}"))
                    ));
                }
                if nested.len() > SUBDIRECTORY_PREVIEW {
                    let remaining = nested.len() - SUBDIRECTORY_PREVIEW;
                    doc.bullet(format!("... and {remaining} more"));
                }
                doc.blank();
            }
            return Ok(doc.finish());
        }

        doc.paragraph(format!("**{}**:", plural(files.len(), "module", "modules")));
        for path in &files {
            let file = SourceFile::read(path)?;
            let stem = file.stem();
            doc.heading(3, &stem);
            if let Some(summary) = first_comment_line(file.content(), SUMMARY_SKIP, SUMMARY_TAKE)
                .filter(|line| !line.is_empty())
            {
                doc.line(summary);
            }
            doc.bullet(format!(
                "Details: {}",
                code(&format!("module://{category}/{stem}"))
            ));
            doc.blank();
        }
        Ok(doc.finish())
    }

    fn category_not_found(&self, category: &str) -> String {
        let mut doc = Markdown::new();
        doc.paragraph(format!("Category '{category}' not found."));
        doc.line("Available categories:");
        for name in self.index().category_names() {
            doc.line(format!("  - {name}"));
        }
        doc.blank();
        doc.line("Usage: `category://<category>`");
        doc.finish()
    }
}
