//! MCP server implementation for nirs-mcp.
//!
//! This crate wires the toolbox control plane into rmcp resource, tool and
//! prompt handlers.

mod helpers;
mod prompts;
mod resources;
mod tools;
pub mod server;

use std::sync::Arc;

use nirs_core::{NirsControlPlane, ToolboxContext};
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::{router::prompt::PromptRouter, tool::ToolRouter},
    model::{
        AnnotateAble,
        CallToolResult,
        Content,
        ErrorCode,
        GetPromptRequestParams,
        GetPromptResult,
        ListPromptsResult,
        ListResourceTemplatesResult,
        ListResourcesResult,
        PaginatedRequestParams,
        RawResource,
        RawResourceTemplate,
        ReadResourceRequestParams,
        ReadResourceResult,
        ResourceContents,
        ResourceTemplate,
        ServerCapabilities,
        ServerInfo,
    },
    prompt_handler,
    service::RequestContext,
    tool,
    tool_handler,
    tool_router,
};
use tracing::debug;

pub use resources::ResourceUri;

const MARKDOWN_MIME: &str = "text/markdown";

const SERVER_INSTRUCTIONS: &str = r"nirs-mcp exposes a MATLAB-style NIRS analysis toolbox: its categories, modules (classes and functions) and demo scripts.

Resources:
- `list://categories` lists every category with its file count.
- `category://{category}` lists the modules in a category.
- `module://{category}/{name}` shows a module summary with its full source.
- `list://demos` and `demo://{demo}` list and show demo scripts.

Tools:
- `search_module` finds modules by keyword.
- `get_module_details` gives a full description; set `include_source` for the code and `category` when a name exists in several categories.
- `compare_modules` places two modules side by side.
- `find_workflow` recommends an ordered module sequence for an analysis task.
- `extract_module` returns the extracted metadata as JSON.
- `help` lists everything; `health` returns `ok`.

Prompts: `how_to_preprocess`, `how_to_glm_analysis`, `how_to_load_data`, `build_pipeline`.";

/// MCP server wrapper around the toolbox control plane.
#[derive(Clone)]
pub struct NirsMcp {
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
    control: NirsControlPlane,
}

impl NirsMcp {
    #[must_use]
    pub fn new(ctx: ToolboxContext) -> Self {
        Self::with_context(Arc::new(ctx))
    }

    /// Creates a server sharing a context handle, one per HTTP session.
    #[must_use]
    pub fn with_context(ctx: Arc<ToolboxContext>) -> Self {
        Self::with_control(NirsControlPlane::from_arc(ctx))
    }

    #[must_use]
    pub fn with_control(control: NirsControlPlane) -> Self {
        let tool_router =
            Self::tool_router_core() + Self::tool_router_query() + Self::tool_router_context();
        Self {
            tool_router,
            prompt_router: Self::prompt_router(),
            control,
        }
    }

    pub(crate) const fn control(&self) -> &NirsControlPlane {
        &self.control
    }

    /// Reads a resource by URI.
    ///
    /// # Errors
    /// Returns `RESOURCE_NOT_FOUND` for unknown URIs and `INTERNAL_ERROR` when a
    /// backing file cannot be read.
    pub async fn read_uri(&self, uri: &str) -> Result<String, ErrorData> {
        let Some(resource) = ResourceUri::parse(uri) else {
            return Err(helpers::mcp_err(
                ErrorCode::RESOURCE_NOT_FOUND,
                format!("unknown resource: {uri}"),
            ));
        };
        debug!(%uri, "read_resource");
        helpers::blocking(&self.control, move |control| resource.read(control)).await
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl NirsMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

fn static_resource(uri: &str, name: &str, description: &str) -> rmcp::model::Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(MARKDOWN_MIME.to_string());
    raw.no_annotation()
}

fn resource_template(uri_template: &str, name: &str, description: &str) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        mime_type: Some(MARKDOWN_MIME.to_string()),
        icons: None,
    }
    .no_annotation()
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for NirsMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(vec![
            static_resource(
                resources::CATEGORIES_URI,
                "categories",
                "All toolbox categories with their file counts.",
            ),
            static_resource(
                resources::DEMOS_URI,
                "demos",
                "Demo scripts with a one-line description each.",
            ),
        ]))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        let templates = resources::TEMPLATES
            .iter()
            .map(|(uri, name, description)| resource_template(uri, name, description))
            .collect();
        Ok(ListResourceTemplatesResult::with_all_items(templates))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let text = self.read_uri(&request.uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
