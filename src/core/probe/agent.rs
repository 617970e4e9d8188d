// src/core/probe/agent.rs

use crate::core::models::AgentProbeResult;
use crate::core::probe::{PathResponse, fetch_path};
use tracing::{debug, info};
use url::Url;

/// Well-known locations for MCP servers and agent endpoints.
const AGENT_PATHS: &[&str] = &["/.mcp/config.json", "/mcp", "/api/mcp", "/agent"];

/// Sweeps the agent/MCP candidate paths without following redirects. Unlike
/// the admin sweep, every path is probed so the report can list all exposed
/// endpoints. A 200 response counts when it serves JSON or mentions "mcp".
pub async fn run(client: &reqwest::Client, target: &Url) -> AgentProbeResult {
    info!(target = %target, "Starting agent endpoint sweep.");

    let mut paths = Vec::new();
    for path in AGENT_PATHS {
        let Ok(url) = target.join(path) else {
            continue;
        };
        if let Some(response) = fetch_path(client, url).await {
            if looks_like_agent_endpoint(&response) {
                debug!(path, "Agent endpoint matched.");
                paths.push(path.to_string());
            }
        }
    }

    info!(found = paths.len(), "Agent endpoint sweep finished.");
    AgentProbeResult {
        exposed: !paths.is_empty(),
        paths,
    }
}

fn looks_like_agent_endpoint(response: &PathResponse) -> bool {
    response.content_type.contains("application/json") || response.body.to_lowercase().contains("mcp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_type_matches() {
        let response = PathResponse {
            content_type: "application/json; charset=utf-8".to_string(),
            body: "{}".to_string(),
        };
        assert!(looks_like_agent_endpoint(&response));
    }

    #[test]
    fn mcp_keyword_in_body_matches() {
        let response = PathResponse {
            content_type: "text/html".to_string(),
            body: "<p>MCP server running</p>".to_string(),
        };
        assert!(looks_like_agent_endpoint(&response));
    }

    #[test]
    fn unrelated_page_does_not_match() {
        let response = PathResponse {
            content_type: "text/html".to_string(),
            body: "<p>Nothing to see here</p>".to_string(),
        };
        assert!(!looks_like_agent_endpoint(&response));
    }
}
