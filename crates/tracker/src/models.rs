use serde::{Deserialize, Serialize};

/// One entry of the allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub key: String,
    pub name: String,
}

impl ProjectRecord {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Flattened view of a tracker issue, as written by the dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub key: Option<String>,
    pub summary: Option<String>,
    pub issuetype: Option<String>,
    pub status: Option<String>,
}

// Wire types for POST /rest/api/3/search/jql

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequest<'a> {
    pub jql: String,
    pub max_results: u32,
    pub fields: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
    pub is_last: Option<bool>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Issue {
    pub key: Option<String>,
    pub fields: Option<IssueFields>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IssueFields {
    pub summary: Option<String>,
    pub issuetype: Option<Named>,
    pub status: Option<Named>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    pub name: Option<String>,
}

impl Issue {
    /// Allow-list view. The name falls back to the key when the summary is
    /// missing or empty; issues without a key are dropped.
    pub fn into_project(self) -> Option<ProjectRecord> {
        let key = self.key.filter(|k| !k.is_empty())?;
        let name = self
            .fields
            .and_then(|f| f.summary)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| key.clone());
        Some(ProjectRecord { key, name })
    }

    pub fn into_summary(self) -> IssueSummary {
        let fields = self.fields.unwrap_or_default();
        IssueSummary {
            key: self.key,
            summary: fields.summary,
            issuetype: fields.issuetype.and_then(|n| n.name),
            status: fields.status.and_then(|n| n.name),
        }
    }
}
