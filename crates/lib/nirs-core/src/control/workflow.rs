use tracing::debug;

use crate::catalog::{self, WorkflowTemplate};
use crate::render::{Markdown, code};

use super::NirsControlPlane;

impl NirsControlPlane {
    /// Recommended module sequence for a task, or the known workflow keys
    /// when nothing matches.
    #[must_use]
    pub fn find_workflow(&self, task: &str) -> String {
        match catalog::find_workflow(self.workflows, task) {
            Some(template) => {
                debug!(task, workflow = template.key, "workflow matched");
                self.render_workflow(template)
            }
            None => {
                debug!(task, "no workflow matched");
                self.workflow_keys(task)
            }
        }
    }

    fn render_workflow(&self, template: &WorkflowTemplate) -> String {
        let mut doc = Markdown::new();
        doc.heading(1, format!("Workflow: {}", template.title));
        doc.paragraph(template.description);
        doc.heading(2, "Recommended steps");
        for (number, step) in template.steps.iter().enumerate() {
            doc.line(format!("{}. **{}** - {}", number + 1, step.module, step.description));
            doc.line(format!(
                "   - Details: {}",
                code(&format!("module://{}/{}", step.category, step.module))
            ));
        }
        doc.blank();

        let mut pipeline = String::from("% build the pipeline\n");
        for (number, step) in template.steps.iter().enumerate() {
            let call = self.ctx.qualified_name(step.category, step.module);
            if number == 0 {
                pipeline.push_str(&format!("job = {call}();\n"));
            } else {
                pipeline.push_str(&format!("job = {call}(job);\n"));
            }
        }
        pipeline.push_str("\n% run the pipeline\nresult = job.run(raw);");
        doc.heading(2, "Example").code_block("matlab", pipeline);
        doc.finish()
    }

    fn workflow_keys(&self, task: &str) -> String {
        let mut doc = Markdown::new();
        doc.paragraph(format!("No workflow matches '{task}'."));
        doc.line("Available workflow keywords:");
        for template in self.workflows {
            doc.bullet(format!("{} - {}", code(template.key), template.description));
        }
        doc.blank();
        doc.line("Describe the task using one of these keywords.");
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{WorkflowStep, WorkflowTemplate};
    use crate::context::ToolboxContext;
    use crate::control::NirsControlPlane;

    const SINGLE: &[WorkflowTemplate] = &[WorkflowTemplate {
        key: "cleanup",
        title: "Cleanup",
        description: "Signal cleanup",
        steps: &[
            WorkflowStep {
                category: "modules",
                module: "TDDR",
                description: "Motion repair",
            },
            WorkflowStep {
                category: "modules",
                module: "BandPassFilter",
                description: "Band-pass filtering",
            },
        ],
    }];

    fn plane() -> NirsControlPlane {
        NirsControlPlane::new(ToolboxContext::new("/toolbox")).with_workflows(SINGLE)
    }

    #[test]
    fn matched_workflow_lists_steps_and_pipeline() {
        let out = plane().find_workflow("Data CLEANUP please");

        assert!(out.starts_with("# Workflow: Cleanup\n\nSignal cleanup\n"));
        assert!(out.contains("1. **TDDR** - Motion repair\n   - Details: `module://modules/TDDR`"));
        assert!(out.contains("job = nirs.modules.TDDR();\njob = nirs.modules.BandPassFilter(job);"));
    }

    #[test]
    fn unmatched_task_lists_keywords() {
        let out = plane().find_workflow("spectral unmixing");

        assert!(out.starts_with("No workflow matches 'spectral unmixing'."));
        assert!(out.contains("- `cleanup` - Signal cleanup"));
    }
}
