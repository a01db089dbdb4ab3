//! Query resolution over a toolbox tree.
//!
//! Each operation re-scans the tree, extracts what it needs and returns a
//! markdown document. Missing categories, modules and demos are answered with
//! descriptive text; only unreadable files are errors.

use std::{error::Error, fmt, sync::Arc};

use crate::catalog::{RELATED_MODULES, RelatedModule, WORKFLOWS, WorkflowTemplate};
use crate::context::ToolboxContext;
use crate::index::NamespaceIndex;
use crate::source::SourceError;

pub mod demos;
pub mod modules;
pub mod namespace;
pub mod workflow;

pub use modules::SearchHit;

type RelatedTable = &'static [(&'static str, &'static [RelatedModule])];

#[derive(Debug)]
pub enum ControlError {
    Source(SourceError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
        }
    }
}

impl From<SourceError> for ControlError {
    fn from(err: SourceError) -> Self {
        Self::Source(err)
    }
}

/// Entry point for every query operation.
#[derive(Debug, Clone)]
pub struct NirsControlPlane {
    ctx: Arc<ToolboxContext>,
    workflows: &'static [WorkflowTemplate],
    related: RelatedTable,
}

impl NirsControlPlane {
    #[must_use]
    pub fn new(ctx: ToolboxContext) -> Self {
        Self::from_arc(Arc::new(ctx))
    }

    #[must_use]
    pub fn from_arc(ctx: Arc<ToolboxContext>) -> Self {
        Self {
            ctx,
            workflows: WORKFLOWS,
            related: RELATED_MODULES,
        }
    }

    #[must_use]
    pub const fn with_workflows(mut self, workflows: &'static [WorkflowTemplate]) -> Self {
        self.workflows = workflows;
        self
    }

    pub(crate) fn index(&self) -> NamespaceIndex<'_> {
        NamespaceIndex::new(&self.ctx)
    }
}

pub(crate) fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
