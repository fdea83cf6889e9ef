//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use adsift_core::{AdEngine, CacheStore};
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

use crate::tools::cache::{CachePurgeParams, purge_impl};
use crate::tools::{
    AdsByIdParams, AdsByKeywordMultiParams, AdsByKeywordParams, by_id_impl, by_keyword_impl, by_keyword_multi_impl,
};

/// The main MCP server handler for mcp-ads.
#[derive(Clone)]
pub struct AdServer {
    engine: Arc<AdEngine>,
    cache: Arc<dyn CacheStore>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl AdServer {
    /// Create a new server handler over a shared engine and its cache store.
    pub fn new(engine: Arc<AdEngine>, cache: Arc<dyn CacheStore>) -> Self {
        Self { engine, cache, tool_router: Self::tool_router() }
    }

    #[tool(description = "Ads for a comma-separated list of catalog item identifiers. \
                          Returns JSON {cache_date, items: [{title, url, image_url, price_display}]}.")]
    async fn ads_by_id(&self, params: Parameters<AdsByIdParams>) -> Result<CallToolResult, McpError> {
        by_id_impl(&self.engine, params.0).await
    }

    #[tool(description = "Ads for a keyword in one catalog category, deduplicated by title and sampled \
                          down to `limit`. Returns JSON {cache_date, items}.")]
    async fn ads_by_keyword(&self, params: Parameters<AdsByKeywordParams>) -> Result<CallToolResult, McpError> {
        by_keyword_impl(&self.engine, params.0).await
    }

    /// Fan a keyword expression out over several categories.
    ///
    /// Required terms ("+term") appear in every search; each optional term
    /// yields its own search. All results are merged, deduplicated and sampled.
    #[tool(description = "Ads for a keyword expression across comma-separated categories. Terms prefixed \
                          with '+' are required; every other term becomes its own search. Results are \
                          merged, deduplicated by title and sampled down to `limit`.")]
    async fn ads_by_keyword_multi(
        &self, params: Parameters<AdsByKeywordMultiParams>,
    ) -> Result<CallToolResult, McpError> {
        by_keyword_multi_impl(&self.engine, params.0).await
    }

    #[tool(description = "Delete cached catalog responses older than `older_than_days` (default 1).")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.cache.as_ref(), params.0).await
    }
}

impl ServerHandler for AdServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-ads".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Product ads from a cached catalog. Use ads_by_keyword_multi for content-driven slots, \
                 ads_by_id for hand-picked items."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::engine;

    #[tokio::test]
    async fn test_tools_are_registered() {
        let (engine, _, cache) = engine(vec!["Hit"]).await;
        let server = AdServer::new(engine, cache);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["ads_by_id", "ads_by_keyword", "ads_by_keyword_multi", "cache_purge"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let (engine, _, cache) = engine(vec![]).await;
        let info = AdServer::new(engine, cache).get_info();
        assert_eq!(info.server_info.name, "mcp-ads");
        assert!(info.capabilities.tools.is_some());
    }
}
