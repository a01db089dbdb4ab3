//! Canned user prompts that walk an agent through common analysis questions.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::{PromptMessage, PromptMessageRole},
    prompt,
    prompt_router,
    schemars,
};
use serde::{Deserialize, Serialize};

use crate::NirsMcp;

pub const DEFAULT_DEVICE: &str = "NIRx";
pub const DEFAULT_TASK: &str = "group analysis";

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LoadDataArgs {
    /// Recording device or file format, e.g. `NIRx`. Defaults to `NIRx`.
    pub device: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BuildPipelineArgs {
    /// Analysis goal. Defaults to `group analysis`.
    pub task: Option<String>,
}

#[must_use]
pub fn preprocess_text() -> String {
    r#"I want to preprocess my fNIRS data. Please:

1. Call `find_workflow("preprocessing")` for the recommended sequence
2. Explain what each step does
3. Explain how to choose its parameters
4. Give a complete MATLAB example

My data:
- Device: [NIRx/Hitachi/other]
- Sampling rate: [Hz]
- Channels: [count]
- Design: [block/event-related]
"#
    .to_string()
}

#[must_use]
pub fn glm_text() -> String {
    r"I want to run a GLM analysis. Please:

1. Read `module://modules/AR_IRLS` to understand the AR-IRLS model
2. Check `list://demos` for a complete analysis demo
3. Explain how the design matrix is built
4. Explain how to interpret the statistics
5. Give a complete code example

My experiment:
- Task: [description]
- Stimulus duration: [s]
- Inter-stimulus interval: [s]
- Repetitions: [count]
"
    .to_string()
}

#[must_use]
pub fn load_data_text(device: &str) -> String {
    format!(
        r"I want to load fNIRS data recorded with {device}. Please:

1. Read `category://io` to find the matching loader
2. Read `module://io/load{device}` for its usage
3. Explain the expected data format
4. Give example loading code
5. List common problems and how to fix them

My data:
- Format: {device}
- Path: [fill in]
- Probe information included: [yes/no]
"
    )
}

#[must_use]
pub fn build_pipeline_text(task: &str) -> String {
    format!(
        r"I want to build a complete fNIRS analysis pipeline for: {task}

Please:

1. Look through the related demos
2. List every module needed
3. Explain each module and its parameters
4. Write the full pipeline code
5. Explain how to interpret and visualise the results

Goal:
- Task: {task}
- Subjects: [fill in]
- Data source: [fill in]
- Expected output: [fill in]
"
    )
}

fn non_blank(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[prompt_router(vis = "pub")]
impl NirsMcp {
    #[prompt(name = "how_to_preprocess", description = "Guide to preprocessing fNIRS data.")]
    async fn how_to_preprocess(&self) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(PromptMessageRole::User, preprocess_text())]
    }

    #[prompt(name = "how_to_glm_analysis", description = "Guide to GLM statistical analysis.")]
    async fn how_to_glm_analysis(&self) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(PromptMessageRole::User, glm_text())]
    }

    #[prompt(name = "how_to_load_data", description = "Guide to loading recordings from a device.")]
    async fn how_to_load_data(
        &self,
        Parameters(args): Parameters<LoadDataArgs>,
    ) -> Vec<PromptMessage> {
        let device = non_blank(args.device, DEFAULT_DEVICE);
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            load_data_text(&device),
        )]
    }

    #[prompt(name = "build_pipeline", description = "Build a complete analysis pipeline for a task.")]
    async fn build_pipeline(
        &self,
        Parameters(args): Parameters<BuildPipelineArgs>,
    ) -> Vec<PromptMessage> {
        let task = non_blank(args.task, DEFAULT_TASK);
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            build_pipeline_text(&task),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_data_names_the_device_loader() {
        let text = load_data_text("Hitachi");
        assert!(text.contains("recorded with Hitachi"));
        assert!(text.contains("`module://io/loadHitachi`"));
    }

    #[test]
    fn blank_arguments_fall_back_to_defaults() {
        assert_eq!(non_blank(None, DEFAULT_DEVICE), "NIRx");
        assert_eq!(non_blank(Some("  ".to_string()), DEFAULT_TASK), "group analysis");
        assert_eq!(non_blank(Some("resting state".to_string()), DEFAULT_TASK), "resting state");
        assert!(build_pipeline_text("resting state").contains("pipeline for: resting state"));
    }

    #[test]
    fn guides_point_at_server_features() {
        assert!(preprocess_text().contains("find_workflow(\"preprocessing\")"));
        assert!(glm_text().contains("module://modules/AR_IRLS"));
    }
}
