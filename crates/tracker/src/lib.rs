//! Client for the capacity-management tracker (a Jira Cloud project).
//!
//! The allow-list of active projects is every issue of type "Client" or
//! "Project" in one tracker project. [`JiraClient`] fetches that list and,
//! as an operational aid, can dump every issue in the project to a file.

mod client;
mod error;
mod models;

pub use client::JiraClient;
pub use error::{TrackerError, TrackerResult};
pub use models::{IssueSummary, ProjectRecord};

use async_trait::async_trait;

/// Something that can produce the current allow-list.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn fetch_projects(&self) -> anyhow::Result<Vec<ProjectRecord>>;
}
