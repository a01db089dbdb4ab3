use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::NirsMcp;

/// Payload listing the server's tools, resources and prompts.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub tools: Vec<String>,
    pub resources: Vec<String>,
    pub prompts: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            tools: vec![
                "search_module - Find modules by keyword in their source or file name.".to_string(),
                "get_module_details - Full description of a module; include_source appends the code."
                    .to_string(),
                "compare_modules - Side-by-side excerpt of two modules with a comparison checklist."
                    .to_string(),
                "find_workflow - Ordered module sequence for an analysis task.".to_string(),
                "extract_module - Extracted module metadata as JSON.".to_string(),
                "help - This list.".to_string(),
                "health - Returns 'ok'.".to_string(),
            ],
            resources: vec![
                "list://categories - All categories with file counts.".to_string(),
                "list://demos - Demo scripts with one-line descriptions.".to_string(),
                "category://{category} - Modules in a category.".to_string(),
                "module://{category}/{name} - Module summary with full source.".to_string(),
                "demo://{demo} - Full code of a demo script.".to_string(),
            ],
            prompts: vec![
                "how_to_preprocess - Guide to the standard preprocessing chain.".to_string(),
                "how_to_glm_analysis - Guide to first- and group-level GLM analysis.".to_string(),
                "how_to_load_data(device) - Guide to loading recordings from a device.".to_string(),
                "build_pipeline(task) - Asks for a complete pipeline for a task.".to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl NirsMcp {
    #[tool(description = "List the tools, resources and prompts this server provides.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
