use crate::error::{TrackerError, TrackerResult};
use crate::models::{IssueSummary, ProjectRecord, SearchRequest, SearchResponse};
use crate::ProjectSource;
use async_trait::async_trait;
use common::TrackerConfig;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_PATH: &str = "/rest/api/3/search/jql";
const ACTIVE_FIELDS: &[&str] = &["summary"];
const DUMP_FIELDS: &[&str] = &["summary", "issuetype", "status"];

#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    email: Option<String>,
    api_token: Option<String>,
    project_key: String,
    max_results: u32,
    client: Client,
}

impl JiraClient {
    pub fn new(config: &TrackerConfig) -> TrackerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            project_key: config.project_key.clone(),
            max_results: config.max_results,
            client,
        })
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    fn active_jql(&self) -> String {
        format!(
            "project = {} AND issuetype in (\"Client\", \"Project\")",
            self.project_key
        )
    }

    fn credentials(&self) -> TrackerResult<(&str, &str)> {
        match (self.email.as_deref(), self.api_token.as_deref()) {
            (Some(email), Some(token)) => Ok((email, token)),
            _ => Err(TrackerError::MissingCredentials),
        }
    }

    async fn search(&self, request: &SearchRequest<'_>) -> TrackerResult<SearchResponse> {
        let (email, token) = self.credentials()?;
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        debug!(url = %url, jql = %request.jql, "Searching tracker");

        let response = self
            .client
            .post(&url)
            .basic_auth(email, Some(token))
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Tracker search failed");
            return Err(TrackerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Active "Client" and "Project" issues, at most `max_results` of them.
    pub async fn active_projects(&self) -> TrackerResult<Vec<ProjectRecord>> {
        let request = SearchRequest {
            jql: self.active_jql(),
            max_results: self.max_results,
            fields: ACTIVE_FIELDS,
            next_page_token: None,
        };

        let response = self.search(&request).await?;
        let projects: Vec<ProjectRecord> = response
            .issues
            .into_iter()
            .filter_map(|issue| issue.into_project())
            .collect();

        info!(count = projects.len(), project = %self.project_key, "Fetched active projects");
        Ok(projects)
    }

    /// Every issue in the project regardless of type, following
    /// `nextPageToken` until the tracker reports the last page.
    pub async fn fetch_all_issues(&self) -> TrackerResult<Vec<IssueSummary>> {
        let mut all_issues = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let request = SearchRequest {
                jql: format!("project = {}", self.project_key),
                max_results: self.max_results,
                fields: DUMP_FIELDS,
                next_page_token: next_page_token.take(),
            };

            let page = self.search(&request).await?;
            debug!(page_size = page.issues.len(), "Fetched issue page");
            all_issues.extend(page.issues.into_iter().map(|issue| issue.into_summary()));

            if page.is_last.unwrap_or(true) {
                break;
            }
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        Ok(all_issues)
    }

    /// Fetch every issue and write them as pretty JSON to `path`.
    pub async fn dump_all_issues(&self, path: &Path) -> TrackerResult<Vec<IssueSummary>> {
        let issues = self.fetch_all_issues().await?;
        let dump_err = |source| TrackerError::Dump {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(dump_err)?;
        }
        let json = serde_json::to_string_pretty(&issues)?;
        tokio::fs::write(path, json).await.map_err(dump_err)?;

        info!(count = issues.len(), path = %path.display(), "Wrote tracker dump");
        Ok(issues)
    }
}

#[async_trait]
impl ProjectSource for JiraClient {
    async fn fetch_projects(&self) -> anyhow::Result<Vec<ProjectRecord>> {
        Ok(self.active_projects().await?)
    }
}
