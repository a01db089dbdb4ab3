//! Built-in lookup tables: analysis workflows and related-module suggestions.
//!
//! These are curated data, not derived from the scanned tree. Lookups take the
//! table as an argument so alternative tables can be supplied.

/// One step of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowStep {
    pub category: &'static str,
    pub module: &'static str,
    pub description: &'static str,
}

/// A named, ordered sequence of modules answering "how do I do X".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: &'static [WorkflowStep],
}

impl WorkflowTemplate {
    /// The key itself or any `_`-separated token of it occurs in `task`.
    #[must_use]
    pub fn matches(&self, task: &str) -> bool {
        let task = task.to_lowercase();
        task.contains(self.key)
            || self
                .key
                .split('_')
                .filter(|token| !token.is_empty())
                .any(|token| task.contains(token))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedModule {
    pub name: &'static str,
    pub description: &'static str,
}

const fn step(
    category: &'static str,
    module: &'static str,
    description: &'static str,
) -> WorkflowStep {
    WorkflowStep {
        category,
        module,
        description,
    }
}

const fn related(name: &'static str, description: &'static str) -> RelatedModule {
    RelatedModule { name, description }
}

pub const WORKFLOWS: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        key: "preprocessing",
        title: "Preprocessing",
        description: "fNIRS data preprocessing",
        steps: &[
            step("modules", "BandPassFilter", "Band-pass filtering"),
            step("modules", "OpticalDensity", "Convert to optical density"),
            step("modules", "BeerLambertLaw", "Convert to HbO/HbR"),
            step("modules", "AR_IRLS", "AR-IRLS statistics"),
        ],
    },
    WorkflowTemplate {
        key: "glm",
        title: "GLM",
        description: "General linear model analysis",
        steps: &[
            step("modules", "OpticalDensity", "Convert to optical density"),
            step("modules", "BeerLambertLaw", "Convert to HbO/HbR"),
            step("modules", "AR_IRLS", "AR-IRLS regression"),
            step("modules", "MixedEffects", "Mixed-effects model (group level)"),
        ],
    },
    WorkflowTemplate {
        key: "connectivity",
        title: "Connectivity",
        description: "Functional connectivity analysis",
        steps: &[
            step("modules", "BandPassFilter", "Band-pass filtering (0.01-0.1 Hz)"),
            step("modules", "OpticalDensity", "Convert to optical density"),
            step("modules", "BeerLambertLaw", "Convert to HbO/HbR"),
            step("modules", "Connectivity", "Compute functional connectivity"),
        ],
    },
    WorkflowTemplate {
        key: "image_reconstruction",
        title: "Image reconstruction",
        description: "Image reconstruction and source localization",
        steps: &[
            step("modules", "OpticalDensity", "Convert to optical density"),
            step("registration", "Register", "Register to a standard space"),
            step("modules", "ImageReconMFX", "MFX image reconstruction"),
        ],
    },
];

pub const RELATED_MODULES: &[(&str, &[RelatedModule])] = &[
    (
        "BandPassFilter",
        &[
            related("WaveletFilter", "Wavelet filtering, suited to motion artifacts"),
            related("BaselinePCAFilter", "PCA baseline filtering"),
            related("OpticalDensity", "Optical density conversion, required before filtering"),
        ],
    ),
    (
        "OpticalDensity",
        &[
            related("BandPassFilter", "Band-pass filtering (next step)"),
            related("BeerLambertLaw", "Beer-Lambert conversion"),
        ],
    ),
    (
        "BeerLambertLaw",
        &[
            related("OpticalDensity", "Optical density conversion (previous step)"),
            related("AR_IRLS", "GLM statistics (next step)"),
        ],
    ),
    (
        "AR_IRLS",
        &[
            related("MixedEffects", "Group-level analysis"),
            related("GLM", "GLM model"),
        ],
    ),
    (
        "WaveletFilter",
        &[
            related("BandPassFilter", "Band-pass filtering"),
            related("TDDR", "Temporal derivative distribution repair"),
        ],
    ),
];

/// First template, in table order, matching the task description.
#[must_use]
pub fn find_workflow<'t>(
    table: &'t [WorkflowTemplate],
    task: &str,
) -> Option<&'t WorkflowTemplate> {
    table.iter().find(|template| template.matches(task))
}

/// Suggestions for an entity name; empty when the name is not in the table.
#[must_use]
pub fn related_modules<'t>(
    table: &'t [(&'static str, &'static [RelatedModule])],
    name: &str,
) -> &'t [RelatedModule] {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map_or(&[][..], |(_, related)| *related)
}
