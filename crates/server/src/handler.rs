//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{WebReadParams, WebSearchParams, read_impl, search_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use surf_client::{Reader, SearchProvider};

/// The main MCP server handler for surf.
///
/// The reader and the search provider are built once at start-up and shared
/// read-only by every request.
#[derive(Clone)]
pub struct SurfServer {
    reader: Arc<Reader>,
    search: Arc<SearchProvider>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SurfServer {
    pub fn new(reader: Reader, search: SearchProvider) -> Self {
        Self { reader: Arc::new(reader), search: Arc::new(search), tool_router: Self::tool_router() }
    }

    /// Fetch a URL and return its readable content.
    #[tool(
        description = "Fetch a web page, plain-text or JSON URL and return clean Markdown-flavoured content with its title. Navigation, ads, scripts and other boilerplate are removed."
    )]
    async fn web_read(&self, params: Parameters<WebReadParams>) -> Result<CallToolResult, McpError> {
        read_impl(&self.reader, params.0).await
    }

    /// Search the web with the configured provider.
    #[tool(
        description = "Search the web. Returns up to max_results (1-10) ranked results with title, URL and snippet."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.search, params.0).await
    }
}

impl ServerHandler for SurfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "surf".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(format!(
                "web_read fetches and cleans a URL; web_search queries {}.",
                self.search.kind()
            )),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
