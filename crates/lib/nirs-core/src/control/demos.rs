use tracing::debug;

use crate::parsers::scan::first_comment_line;
use crate::render::{Markdown, code};
use crate::source::{SourceFile, file_stem};

use super::{ControlError, NirsControlPlane, plural};

const DEMO_SUMMARY_LINES: usize = 10;

impl NirsControlPlane {
    /// Lists demo scripts with the first comment line of each.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if a demo script cannot be read.
    pub fn list_demos(&self) -> Result<String, ControlError> {
        let demos = self.index().demo_files();
        debug!(count = demos.len(), "list_demos");

        let mut doc = Markdown::new();
        doc.heading(1, format!("{} toolbox demos", self.ctx.package_name()));
        if demos.is_empty() {
            doc.line(format!(
                "(no demo scripts found in {})",
                code(&self.ctx.demos_dir().display().to_string())
            ));
            return Ok(doc.finish());
        }

        doc.paragraph(format!("**{}**:", plural(demos.len(), "demo", "demos")));
        for path in &demos {
            let file = SourceFile::read(path)?;
            let name = file.stem();
            doc.heading(3, &name);
            if let Some(summary) = first_comment_line(file.content(), 0, DEMO_SUMMARY_LINES)
                .filter(|line| !line.is_empty())
            {
                doc.line(summary);
            }
            doc.bullet(format!("Code: {}", code(&format!("demo://{name}"))));
            doc.blank();
        }
        Ok(doc.finish())
    }

    /// Full text of a demo script.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if the script cannot be read.
    pub fn get_demo(&self, name: &str) -> Result<String, ControlError> {
        let index = self.index();
        let Ok(path) = index.resolve_demo(name) else {
            let mut doc = Markdown::new();
            doc.paragraph(format!("Demo '{name}' not found."));
            doc.line("Available demos:");
            for path in index.demo_files() {
                doc.line(format!("  - {}", file_stem(&path)));
            }
            return Ok(doc.finish());
        };

        let file = SourceFile::read(&path)?;
        let mut doc = Markdown::new();
        doc.heading(1, name);
        doc.heading(2, "Code").code_block("matlab", file.content());
        doc.rule();
        doc.line(format!("**Path**: {}", code(&path.display().to_string())));
        doc.line(format!("**Lines**: {}", file.content().lines().count()));
        Ok(doc.finish())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::context::ToolboxContext;
    use crate::control::NirsControlPlane;

    #[test]
    fn demos_are_listed_and_served() {
        let dir = tempfile::tempdir().expect("tempdir");
        let demos = dir.path().join("demos");
        fs::create_dir_all(&demos).expect("mkdir");
        fs::write(demos.join("basic_glm.m"), "% Basic GLM walkthrough\nraw = load();\n")
            .expect("write");
        let plane = NirsControlPlane::new(ToolboxContext::new(dir.path()));

        let listing = plane.list_demos().expect("lists");
        assert!(listing.contains("### basic_glm\n\nBasic GLM walkthrough"));
        assert!(listing.contains("`demo://basic_glm`"));

        let demo = plane.get_demo("basic_glm").expect("renders");
        assert!(demo.contains("raw = load();"));
        assert!(demo.contains("**Lines**: 2"));
    }

    #[test]
    fn unknown_demo_lists_available_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let demos = dir.path().join("demos");
        fs::create_dir_all(&demos).expect("mkdir");
        fs::write(demos.join("a.m"), "").expect("write");
        let plane = NirsControlPlane::new(ToolboxContext::new(dir.path()));

        let out = plane.get_demo("../a").expect("renders");
        assert!(out.starts_with("Demo '../a' not found."));
        assert!(out.contains("  - a\n"));
    }
}
