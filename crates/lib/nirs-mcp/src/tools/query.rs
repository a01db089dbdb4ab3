use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::NirsMcp;
use crate::helpers;

/// Parameters for keyword search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchModuleParams {
    /// Case-insensitive substring matched against file content and names.
    pub keyword: String,
}

/// Parameters for a detailed module page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ModuleDetailsParams {
    /// Module base name, e.g. `BandPassFilter`.
    pub module_name: String,
    /// Append the full source. Defaults to false.
    pub include_source: Option<bool>,
    /// Restrict the lookup to one category when a name exists in several.
    pub category: Option<String>,
}

/// Parameters for comparing two modules.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CompareModulesParams {
    pub module1: String,
    pub module2: String,
}

/// Parameters for workflow lookup.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FindWorkflowParams {
    /// Free-text task description, e.g. `GLM analysis`.
    pub task: String,
}

/// Parameters for structured extraction.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractModuleParams {
    pub module_name: String,
    pub category: Option<String>,
}

#[tool_router(router = tool_router_query, vis = "pub")]
impl NirsMcp {
    #[tool(description = "Search toolbox modules whose source or file name contains a keyword (case-insensitive).")]
    pub(crate) async fn search_module(
        &self,
        Parameters(params): Parameters<SearchModuleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(keyword = %params.keyword, "search_module");
        let text = helpers::blocking(self.control(), move |control| {
            control.search_module(&params.keyword)
        })
        .await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Detailed description of a module: signature, property table, methods, usage examples and related modules. Set include_source to append the full code.")]
    pub(crate) async fn get_module_details(
        &self,
        Parameters(params): Parameters<ModuleDetailsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(module = %params.module_name, "get_module_details");
        let include_source = params.include_source.unwrap_or(false);
        let text = helpers::blocking(self.control(), move |control| {
            control.get_module_details(
                &params.module_name,
                include_source,
                params.category.as_deref(),
            )
        })
        .await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Place the beginning of two modules side by side with a checklist for comparing them.")]
    pub(crate) async fn compare_modules(
        &self,
        Parameters(params): Parameters<CompareModulesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(first = %params.module1, second = %params.module2, "compare_modules");
        let text = helpers::blocking(self.control(), move |control| {
            control.compare_modules(&params.module1, &params.module2)
        })
        .await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Recommend an ordered module workflow for an analysis task (preprocessing, glm, connectivity, image_reconstruction).")]
    pub(crate) async fn find_workflow(
        &self,
        Parameters(params): Parameters<FindWorkflowParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(task = %params.task, "find_workflow");
        Ok(CallToolResult::success(vec![Content::text(
            self.control().find_workflow(&params.task),
        )]))
    }

    #[tool(description = "Extracted module metadata as JSON: kind, name, parent, description, properties, methods, signature and path.")]
    pub(crate) async fn extract_module(
        &self,
        Parameters(params): Parameters<ExtractModuleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(module = %params.module_name, "extract_module");
        let name = params.module_name.clone();
        let entity = helpers::blocking(self.control(), move |control| {
            control.extract_module(&params.module_name, params.category.as_deref())
        })
        .await?;
        match entity {
            Some(entity) => Ok(CallToolResult::success(vec![Content::json(entity)?])),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "Module '{name}' not found."
            ))])),
        }
    }
}
