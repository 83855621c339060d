use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    answer::{self, Answer},
    error,
    knowledge::Knowledge,
};

#[derive(Clone)]
pub struct FiqhMcpServer {
    knowledge: Arc<Knowledge>,
    tool_router: ToolRouter<Self>,
}

impl FiqhMcpServer {
    pub fn new(knowledge: Knowledge) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl FiqhMcpServer {
    /// Answer a question from the offline knowledge base.
    #[tool(
        name = "fiqh_ask",
        description = "Answer an Islamic law question from the curated offline knowledge base. Returns source=not_found with known topics and search links when no topic matches confidently."
    )]
    pub async fn fiqh_ask(
        &self,
        params: Parameters<AskParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let question = params.0.question;
        let answer = answer::resolve(&question, &self.knowledge);

        let summary = match &answer {
            Answer::Offline { title, answer } => format!("{title}\n\n{answer}"),
            Answer::NotFound { message, topics, .. } => {
                format!("{message} Known topics: {}", topics.join(", "))
            }
        };
        let structured = serde_json::to_value(&answer)
            .map_err(|e| mcp_error("failed to serialize answer", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    /// List the topics the knowledge base covers.
    #[tool(
        name = "fiqh_topics",
        description = "List every topic in the offline knowledge base with its key phrases."
    )]
    pub async fn fiqh_topics(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let topics: Vec<TopicItem> = self
            .knowledge
            .catalog
            .entries()
            .iter()
            .map(|entry| TopicItem {
                title: entry.title.clone(),
                keys: entry.keys.clone(),
            })
            .collect();

        let summary = topics
            .iter()
            .map(|t| t.title.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let structured = serde_json::to_value(TopicsResponse {
            topic_count: topics.len(),
            topics,
        })
        .map_err(|e| mcp_error("failed to serialize topics", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for FiqhMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("fiqh", env!("CARGO_PKG_VERSION")).with_title("fiqh MCP"),
            )
            .with_instructions(
                "Use fiqh_ask with the user's question in Russian. When it returns not_found, fall back to your own answer and recommend consulting a scholar.",
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskParams {
    /// The user's question, in free text.
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicsResponse {
    topic_count: usize,
    topics: Vec<TopicItem>,
}

#[derive(Debug, Serialize)]
struct TopicItem {
    title: String,
    keys: Vec<String>,
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(knowledge: Knowledge) -> error::Result<()> {
    let server = FiqhMcpServer::new(knowledge);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}
