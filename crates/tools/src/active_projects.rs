//! `list_active_projects` and `is_project_active`.
//!
//! Both read the shared cache and never contact the tracker. The check tool
//! returns only the human-readable message of an [`ActivityCheck`]; the
//! structured match list stays on the Rust side.
//!
//! [`ActivityCheck`]: projects::ActivityCheck

use crate::{empty_schema, Tool, ToolInput, ToolOutput, ToolSpec};
use anyhow::Result;
use projects::ActiveProjectsCache;
use serde_json::json;
use std::sync::Arc;

pub const LIST_ACTIVE_PROJECTS: &str = "list_active_projects";
pub const IS_PROJECT_ACTIVE: &str = "is_project_active";

pub struct ListActiveProjectsTool {
    cache: Arc<ActiveProjectsCache>,
}

impl ListActiveProjectsTool {
    pub fn new(cache: Arc<ActiveProjectsCache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl Tool for ListActiveProjectsTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: LIST_ACTIVE_PROJECTS.to_string(),
            description: "List all currently active projects and clients from the TSG Capacity \
                Management Tool. Use this when the user asks about active projects, wants to see \
                what projects are being tracked, or needs to know what projects are available."
                .to_string(),
            input_schema: empty_schema(),
        }
    }

    async fn execute(&self, _input: ToolInput) -> Result<ToolOutput> {
        let projects = self.cache.list_all();
        if projects.is_empty() {
            return Ok(ToolOutput::text(
                "No active projects loaded. The cache may not have been initialized.",
            ));
        }

        let lines = projects
            .iter()
            .map(|p| format!("  - {}: {}", p.key, p.name))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolOutput::text(format!(
            "Active Projects ({} total):\n{}",
            projects.len(),
            lines
        )))
    }
}

pub struct IsProjectActiveTool {
    cache: Arc<ActiveProjectsCache>,
}

impl IsProjectActiveTool {
    pub fn new(cache: Arc<ActiveProjectsCache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl Tool for IsProjectActiveTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: IS_PROJECT_ACTIVE.to_string(),
            description: "Check if a specific project or client is currently active in the TSG \
                Capacity Management Tool. IMPORTANT: Use this BEFORE querying Confluence, Jira, or \
                GitHub for project-specific information. Pass the project name or TCM key (e.g., \
                'Thrivent', 'TCM-27829', '3M', 'Medtronic')."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_name": {
                        "type": "string",
                        "description": "The project name or TCM key to check"
                    }
                },
                "required": ["project_name"]
            }),
        }
    }

    async fn execute(&self, input: ToolInput) -> Result<ToolOutput> {
        // a missing or non-string argument resolves like an empty query
        let check = self.cache.is_active(input.get_str("project_name"));
        Ok(ToolOutput::text(check.message))
    }
}

/// Both allow-list tools, sharing one cache
pub fn active_projects_tools(cache: Arc<ActiveProjectsCache>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(ListActiveProjectsTool::new(Arc::clone(&cache))),
        Box::new(IsProjectActiveTool::new(cache)),
    ]
}
