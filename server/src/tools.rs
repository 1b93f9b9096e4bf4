use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::docs::DocsSearch;

/// Jina Reader converts any webpage to clean markdown when the target URL
/// is appended to this prefix.
const JINA_READER_PREFIX: &str = "https://r.jina.ai/";

#[derive(Clone)]
pub struct DocsService {
    docs: Arc<DocsSearch>,
    client: reqwest::Client,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRequest {
    #[schemars(description = "First addend")]
    pub a: i64,
    #[schemars(description = "Second addend")]
    pub b: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadWebpageRequest {
    #[schemars(description = "The URL of the webpage to read, e.g. 'https://datatalks.club'")]
    pub url: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchDocsRequest {
    #[schemars(description = "The search query string, e.g. 'how to create a tool'")]
    pub query: String,
}

impl DocsService {
    pub fn new(docs: Arc<DocsSearch>) -> Self {
        Self {
            docs,
            client: reqwest::Client::new(),
            tool_router: Self::tool_router(),
        }
    }

    async fn fetch_markdown(&self, url: &str) -> anyhow::Result<String> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[tool_router]
impl DocsService {
    #[tool(description = "Add two numbers")]
    pub async fn add(
        &self,
        Parameters(req): Parameters<AddRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            (req.a + req.b).to_string(),
        )]))
    }

    #[tool(
        description = "Download and return the content of any webpage in markdown format using Jina Reader."
    )]
    pub async fn read_webpage(
        &self,
        Parameters(req): Parameters<ReadWebpageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let jina_url = format!("{JINA_READER_PREFIX}{}", req.url);
        match self.fetch_markdown(&jina_url).await {
            Ok(markdown) => Ok(CallToolResult::success(vec![Content::text(markdown)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }

    #[tool(
        description = "Search the FastMCP documentation for a given query. Returns the top 5 most relevant documentation pages with previews."
    )]
    pub async fn search_docs(
        &self,
        Parameters(req): Parameters<SearchDocsRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.docs.search(&req.query).await {
            Ok(results) => Ok(CallToolResult::success(vec![Content::text(results)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }
}

#[tool_handler]
impl ServerHandler for DocsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Documentation search tools. Use 'search_docs' to find relevant FastMCP \
                 documentation pages, 'read_webpage' to fetch any webpage as markdown, and \
                 'add' for quick arithmetic."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
