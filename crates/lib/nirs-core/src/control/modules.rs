use tracing::debug;

use crate::catalog::related_modules;
use crate::models::{Entity, ModuleLocation};
use crate::parsers::MatlabParser;
use crate::parsers::scan::first_comment_line;
use crate::render::{Markdown, RenderContext, View, code, format_entity};
use crate::source::SourceFile;

use super::namespace::{SUMMARY_SKIP, SUMMARY_TAKE};
use super::{ControlError, NirsControlPlane, plural};

const SEARCH_HITS_PER_CATEGORY: usize = 10;
const COMPARE_EXCERPT_CHARS: usize = 500;

/// One file matched by `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub category: String,
    pub name: String,
    pub summary: Option<String>,
}

impl NirsControlPlane {
    /// Summary page for `<category>/<name>`, including its full source.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if the module file cannot be read.
    pub fn get_module(&self, category: &str, name: &str) -> Result<String, ControlError> {
        let Ok(path) = self.index().resolve(category, name) else {
            debug!(category, name, "module not found");
            return Ok(format!(
                "Module '{category}/{name}' not found.\n\nUsage: `module://<category>/<module>`\n"
            ));
        };
        let file = SourceFile::read(&path)?;
        let entity = MatlabParser::parse(&file);
        let ctx = RenderContext {
            category,
            qualified_name: self.ctx.qualified_name(category, &entity.name),
            view: View::Summary,
            source: Some(file.content()),
            related: &[],
        };
        Ok(format_entity(&entity, &ctx))
    }

    /// Detailed page for a module looked up by name across all categories.
    ///
    /// When `category` is `None` the first category in sorted order wins and
    /// other categories holding the same name are listed at the end.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if the module file cannot be read.
    pub fn get_module_details(
        &self,
        name: &str,
        include_source: bool,
        category: Option<&str>,
    ) -> Result<String, ControlError> {
        let index = self.index();
        let (location, others) = match category {
            Some(category) => (index.find_module(name, Some(category)), Vec::new()),
            None => {
                let mut all = index.find_all(name).into_iter();
                let first = all.next();
                (first, all.collect::<Vec<_>>())
            }
        };
        let Some(location) = location else {
            return Ok(module_missing(name, category));
        };

        let file = SourceFile::read(&location.path)?;
        let entity = MatlabParser::parse(&file);
        let ctx = RenderContext {
            category: &location.category,
            qualified_name: self.ctx.qualified_name(&location.category, &entity.name),
            view: View::Detailed,
            source: include_source.then_some(file.content()),
            related: related_modules(self.related, &entity.name),
        };
        let mut out = format_entity(&entity, &ctx);
        if !others.is_empty() {
            let names: Vec<&str> = others.iter().map(|other| other.category.as_str()).collect();
            out.push_str(&format!(
                "---\n*Also found in: {}. Pass `category` to choose one.*\n",
                names.join(", ")
            ));
        }
        Ok(out)
    }

    /// Structured form of a module, `None` when it does not exist.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if the module file cannot be read.
    pub fn extract_module(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Option<Entity>, ControlError> {
        self.index()
            .find_module(name, category)
            .map(|location| MatlabParser::parse_file(&location.path))
            .transpose()
            .map_err(ControlError::from)
    }

    /// Every file whose content or base name contains `keyword`, ignoring case.
    /// The keyword is matched as given; a blank keyword matches nothing.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if a file cannot be read.
    pub fn search(&self, keyword: &str) -> Result<Vec<SearchHit>, ControlError> {
        if keyword.trim().is_empty() {
            return Ok(Vec::new());
        }
        let needle = keyword.to_lowercase();

        let mut hits = Vec::new();
        for (category, files) in self.index().discover() {
            for path in files {
                let file = SourceFile::read(&path)?;
                let stem = file.stem();
                if file.content().to_lowercase().contains(&needle)
                    || stem.to_lowercase().contains(&needle)
                {
                    hits.push(SearchHit {
                        category: category.clone(),
                        name: stem,
                        summary: first_comment_line(file.content(), SUMMARY_SKIP, SUMMARY_TAKE)
                            .filter(|line| !line.is_empty()),
                    });
                }
            }
        }
        debug!(keyword, hits = hits.len(), "search");
        Ok(hits)
    }

    /// Search results grouped by category.
    ///
    /// # Errors
    /// See [`NirsControlPlane::search`].
    pub fn search_module(&self, keyword: &str) -> Result<String, ControlError> {
        if keyword.trim().is_empty() {
            return Ok("Provide a non-empty keyword to search for.\n".to_string());
        }
        let hits = self.search(keyword)?;
        if hits.is_empty() {
            return Ok(format!("No modules found containing '{keyword}'.\n"));
        }

        let mut doc = Markdown::new();
        doc.heading(1, format!("Search results: '{keyword}'"));
        doc.paragraph(format!(
            "Found **{}**:",
            plural(hits.len(), "matching module", "matching modules")
        ));

        let package = self.ctx.package_name();
        for group in hits.chunk_by(|a, b| a.category == b.category) {
            let category = &group[0].category;
            doc.heading(2, format!("{package}.{category}"));
            for hit in group.iter().take(SEARCH_HITS_PER_CATEGORY) {
                doc.heading(3, &hit.name);
                if let Some(summary) = &hit.summary {
                    doc.line(summary);
                }
                doc.bullet(format!(
                    "Details: {}",
                    code(&format!("module://{category}/{}", hit.name))
                ));
                doc.blank();
            }
            if group.len() > SEARCH_HITS_PER_CATEGORY {
                let remaining = group.len() - SEARCH_HITS_PER_CATEGORY;
                doc.paragraph(format!("*... and {remaining} more in {category}*"));
            }
        }
        Ok(doc.finish())
    }

    /// Source excerpts of two modules side by side, followed by the points
    /// a comparison should cover.
    ///
    /// # Errors
    /// Returns `ControlError::Source` if either module file cannot be read.
    pub fn compare_modules(&self, first: &str, second: &str) -> Result<String, ControlError> {
        let index = self.index();
        let (a, b) = match (index.find_module(first, None), index.find_module(second, None)) {
            (Some(a), Some(b)) => (a, b),
            (None, None) => return Ok(format!("Modules '{first}' and '{second}' not found.\n")),
            (None, Some(_)) => return Ok(format!("Module '{first}' not found.\n")),
            (Some(_), None) => return Ok(format!("Module '{second}' not found.\n")),
        };

        let mut doc = Markdown::new();
        doc.heading(1, format!("Comparison: {first} vs {second}"));
        for (position, location) in [(1, &a), (2, &b)] {
            self.write_excerpt(&mut doc, position, location)?;
        }
        doc.heading(2, "Points to compare");
        for (number, point) in [
            "Functional differences",
            "Use cases",
            "Parameter settings",
            "Pros and cons",
            "Recommendation",
        ]
        .iter()
        .enumerate()
        {
            doc.line(format!("{}. {point}", number + 1));
        }
        Ok(doc.finish())
    }

    fn write_excerpt(
        &self,
        doc: &mut Markdown,
        position: usize,
        location: &ModuleLocation,
    ) -> Result<(), ControlError> {
        let file = SourceFile::read(&location.path)?;
        let mut excerpt: String = file.content().chars().take(COMPARE_EXCERPT_CHARS).collect();
        if file.content().chars().nth(COMPARE_EXCERPT_CHARS).is_some() {
            excerpt.push_str("\n...");
        }
        doc.heading(
            2,
            format!(
                "Module {position}: {}",
                self.ctx.qualified_name(&location.category, &location.name)
            ),
        );
        doc.code_block("matlab", excerpt);
        Ok(())
    }
}

fn module_missing(name: &str, category: Option<&str>) -> String {
    match category {
        Some(category) => format!(
            "Module '{name}' not found in category '{category}'.\n\nUse `search_module` to look for it elsewhere.\n"
        ),
        None => format!("Module '{name}' not found.\n\nUse `search_module` to look for modules.\n"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crate::context::ToolboxContext;
    use crate::control::NirsControlPlane;
    use crate::models::Entity;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, text).expect("write");
    }

    fn fixture() -> (tempfile::TempDir, NirsControlPlane) {
        let dir = tempfile::tempdir().expect("tempdir");
        let ns = dir.path().join("+nirs");
        write(
            &ns.join("+modules/AR_IRLS.m"),
            "classdef AR_IRLS < nirs.modules.AbstractGLM\n% GLM via AR-IRLS\nproperties\n  order = 4; % model order\nend\nend\n",
        );
        write(&ns.join("+modules/Dup.m"), "function Dup\n% modules copy\n");
        write(&ns.join("+util/Dup.m"), "function Dup\n% util copy\n");
        let plane = NirsControlPlane::new(ToolboxContext::new(dir.path()));
        (dir, plane)
    }

    #[test]
    fn module_page_contains_source() {
        let (_dir, plane) = fixture();
        let out = plane.get_module("modules", "AR_IRLS").expect("renders");

        assert!(out.starts_with("# AR_IRLS\n"));
        assert!(out.contains("## Source"));
        assert!(out.contains("order = 4; % model order"));
    }

    #[test]
    fn details_include_related_modules_from_table() {
        let (_dir, plane) = fixture();
        let out = plane.get_module_details("AR_IRLS", false, None).expect("renders");

        assert!(out.starts_with("# nirs.modules.AR_IRLS\n"));
        assert!(out.contains("`MixedEffects` - Group-level analysis"));
        assert!(out.contains("include_source=true"));
    }

    #[test]
    fn duplicate_names_resolve_to_first_category() {
        let (_dir, plane) = fixture();
        let out = plane.get_module_details("Dup", true, None).expect("renders");
        assert!(out.contains("modules copy"));
        assert!(out.contains("Also found in: util."));

        let out = plane.get_module_details("Dup", true, Some("util")).expect("renders");
        assert!(out.contains("util copy"));
        assert!(!out.contains("Also found in"));
    }

    #[test]
    fn blank_keyword_is_answered_with_text() {
        let (_dir, plane) = fixture();
        assert!(plane.search("  ").expect("search runs").is_empty());
        assert_eq!(
            plane.search_module("").expect("search renders"),
            "Provide a non-empty keyword to search for.\n"
        );
    }

    #[test]
    fn keyword_surrounding_spaces_are_significant() {
        let (_dir, plane) = fixture();
        assert_eq!(plane.search("MODEL ORDER").expect("search runs").len(), 1);
        assert!(plane.search("model order ").expect("search runs").is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_file_fails_only_the_query_that_reads_it() {
        use crate::control::ControlError;

        let (dir, plane) = fixture();
        // Reading offset zero of the process memory file fails with EIO.
        std::os::unix::fs::symlink("/proc/self/mem", dir.path().join("+nirs/+modules/Broken.m"))
            .expect("symlink");

        let err = plane.get_module("modules", "Broken").expect_err("unreadable");
        assert!(matches!(err, ControlError::Source(_)));
        assert!(err.to_string().contains("Broken.m"));
        assert!(matches!(plane.search("order"), Err(ControlError::Source(_))));
        assert!(matches!(
            plane.compare_modules("Broken", "AR_IRLS"),
            Err(ControlError::Source(_))
        ));

        assert!(plane.get_module("modules", "AR_IRLS").is_ok());
    }

    #[test]
    fn compare_names_only_the_missing_module() {
        let (_dir, plane) = fixture();
        let out = plane.compare_modules("Nope", "AR_IRLS").expect("renders");
        assert_eq!(out, "Module 'Nope' not found.\n");

        let out = plane.compare_modules("Nope", "Nada").expect("renders");
        assert_eq!(out, "Modules 'Nope' and 'Nada' not found.\n");
    }

    #[test]
    fn extract_module_returns_entity() {
        let (_dir, plane) = fixture();
        let entity = plane
            .extract_module("AR_IRLS", None)
            .expect("readable")
            .expect("exists");

        assert_eq!(entity.parent(), Some("nirs.modules.AbstractGLM"));
        assert_eq!(entity.properties[0].default.as_deref(), Some("4"));
        assert!(plane.extract_module("Missing", None).expect("readable").is_none());
    }

    #[test]
    fn extracted_entity_serializes_for_json_output() {
        let (_dir, plane) = fixture();
        let entity = plane
            .extract_module("AR_IRLS", Some("modules"))
            .expect("readable")
            .expect("exists");

        let json = serde_json::to_value(&entity).expect("serializes");
        assert_eq!(json["kind"], "class");
        assert_eq!(json["name"], "AR_IRLS");
        assert_eq!(json["properties"][0]["comment"], "model order");

        let back: Entity = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, entity);
    }
}
