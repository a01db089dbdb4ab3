//! Markdown rendering of extracted entities.
//!
//! Output depends only on the entity and the render context, so identical
//! inputs always produce identical documents.

mod markdown;

pub use markdown::{Markdown, code};

use crate::catalog::RelatedModule;
use crate::models::{Entity, EntityKind};

const SUMMARY_METHOD_LIMIT: usize = 10;
const DETAILED_METHOD_LIMIT: usize = 5;
const EXAMPLE_PROPERTY_LIMIT: usize = 3;

/// How much of an entity to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Compact page used by the `module://` resource.
    Summary,
    /// Full page used by `get_module_details`.
    Detailed,
}

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub category: &'a str,
    /// Dotted call path, e.g. `nirs.modules.BandPassFilter`.
    pub qualified_name: String,
    pub view: View,
    /// Full file text; rendered only when present.
    pub source: Option<&'a str>,
    pub related: &'a [RelatedModule],
}

impl RenderContext<'_> {
    const fn method_limit(&self) -> usize {
        match self.view {
            View::Summary => SUMMARY_METHOD_LIMIT,
            View::Detailed => DETAILED_METHOD_LIMIT,
        }
    }
}

/// Renders an entity: title, type/parent/path, description, properties,
/// methods, usage, related modules, then source.
#[must_use]
pub fn format_entity(entity: &Entity, ctx: &RenderContext<'_>) -> String {
    let mut doc = Markdown::new();
    write_header(&mut doc, entity, ctx);
    if !entity.description.is_empty() {
        doc.heading(2, "Description").paragraph(&entity.description);
    }
    write_properties(&mut doc, entity, ctx);
    write_methods(&mut doc, entity, ctx);
    write_usage(&mut doc, entity, ctx);
    if ctx.view == View::Detailed {
        write_related(&mut doc, ctx);
    }
    write_source(&mut doc, entity, ctx);
    doc.finish()
}

fn write_header(doc: &mut Markdown, entity: &Entity, ctx: &RenderContext<'_>) {
    let title = match ctx.view {
        View::Summary => entity.name.clone(),
        View::Detailed => ctx.qualified_name.clone(),
    };
    doc.heading(1, title);

    doc.line(format!("**Type**: MATLAB {}", entity.kind.as_str()));
    if let Some(parent) = entity.parent() {
        doc.line(format!("**Inherits from**: {}", code(parent)));
    }
    doc.line(format!("**Category**: {}", ctx.category));
    doc.paragraph(format!("**Path**: {}", code(&entity.path.display().to_string())));

    if !entity.signature.is_empty() {
        doc.heading(2, "Signature").code_block("matlab", &entity.signature);
    }
}

fn write_properties(doc: &mut Markdown, entity: &Entity, ctx: &RenderContext<'_>) {
    if entity.properties.is_empty() {
        return;
    }
    doc.heading(2, "Properties");
    if ctx.view == View::Detailed && entity.has_structured_properties() {
        doc.table_header(&["Name", "Default", "Description"]);
        for prop in &entity.properties {
            doc.table_row([
                code(&prop.name),
                prop.default.as_deref().map_or_else(|| "(none)".to_string(), code),
                prop.comment.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
        doc.blank();
    } else {
        for prop in &entity.properties {
            doc.bullet(code(&prop.raw));
        }
        doc.blank();
    }
}

fn write_methods(doc: &mut Markdown, entity: &Entity, ctx: &RenderContext<'_>) {
    if entity.methods.is_empty() {
        return;
    }
    let heading = match entity.kind {
        EntityKind::Class => "Methods",
        EntityKind::Function => "Local functions",
    };
    doc.heading(2, heading);

    let limit = ctx.method_limit();
    for method in entity.methods.iter().take(limit) {
        match ctx.view {
            View::Summary => {
                doc.bullet(code(&format!("{}()", method.name)));
            }
            View::Detailed => {
                doc.heading(3, code(&format!("{}({})", method.name, method.params)));
                if let Some(returns) = &method.returns {
                    doc.line(format!("**Returns**: {}", code(returns)));
                }
                if let Some(comment) = &method.comment {
                    doc.line(comment);
                }
                doc.blank();
            }
        }
    }

    let remaining = entity.methods.len().saturating_sub(limit);
    if remaining > 0 {
        match ctx.view {
            View::Summary => doc.bullet(format!("... and {remaining} more")),
            View::Detailed => doc.line(format!("*... and {remaining} more*")),
        };
    }
    doc.blank();
}

fn write_usage(doc: &mut Markdown, entity: &Entity, ctx: &RenderContext<'_>) {
    doc.heading(2, "Usage");
    let qualified = &ctx.qualified_name;

    match (entity.kind, ctx.view) {
        (EntityKind::Function, _) => {
            doc.code_block("matlab", format!("result = {qualified}(...);"));
        }
        (EntityKind::Class, View::Summary) => {
            doc.code_block("matlab", format!("% create an instance\nobj = {qualified}();"));
        }
        (EntityKind::Class, View::Detailed) => {
            let mut standalone = format!("% standalone\njob = {qualified}();\n");
            let examples: Vec<String> = entity
                .properties
                .iter()
                .filter_map(|prop| {
                    let default = prop.default.as_deref()?;
                    let comment = prop.comment.as_deref().unwrap_or_default();
                    Some(format!("job.{} = {default};  % {comment}", prop.name))
                })
                .take(EXAMPLE_PROPERTY_LIMIT)
                .collect();
            if !examples.is_empty() {
                standalone.push_str("\n% set parameters\n");
                for example in examples {
                    standalone.push_str(example.trim_end());
                    standalone.push('\n');
                }
            }
            standalone.push_str("\n% run\nresult = job.run(data);");
            doc.heading(3, "Create an instance").code_block("matlab", standalone);

            let next = qualified.rsplit_once('.').map_or_else(
                || "NextModule".to_string(),
                |(package, _)| format!("{package}.NextModule"),
            );
            doc.heading(3, "Use in a pipeline").code_block(
                "matlab",
                format!(
                    "job1 = {qualified}();\njob2 = {next}(job1);  % chain\n\nresult = job2.run(data);"
                ),
            );
        }
    }
}

fn write_related(doc: &mut Markdown, ctx: &RenderContext<'_>) {
    doc.heading(2, "Related modules");
    if ctx.related.is_empty() {
        doc.paragraph("*Use `search_module` to find related modules.*");
        return;
    }
    for related in ctx.related {
        doc.bullet(format!("{} - {}", code(related.name), related.description));
    }
    doc.blank();
}

fn write_source(doc: &mut Markdown, entity: &Entity, ctx: &RenderContext<'_>) {
    match (ctx.source, ctx.view) {
        (Some(source), _) => {
            doc.heading(2, "Source").code_block("matlab", source);
        }
        (None, View::Detailed) => {
            doc.heading(2, "Source").paragraph(format!(
                "*Call `get_module_details(\"{}\", include_source=true)` to view the full source.*",
                entity.name
            ));
        }
        (None, View::Summary) => {}
    }
}
