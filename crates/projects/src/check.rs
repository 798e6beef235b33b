use serde::Serialize;
use tracker::ProjectRecord;

/// Which resolution tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    EmptyQuery,
    Key,
    Name,
    Partial,
    NotFound,
}

/// Outcome of an allow-list lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCheck {
    pub active: bool,
    pub exact_match: bool,
    /// In load order
    pub matches: Vec<ProjectRecord>,
    pub message: String,
    #[serde(skip)]
    pub kind: MatchKind,
}

fn list_matches(matches: &[ProjectRecord]) -> String {
    matches
        .iter()
        .map(|m| format!("{}: {}", m.key, m.name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ActivityCheck {
    pub(crate) fn empty_query() -> Self {
        Self {
            active: false,
            exact_match: false,
            matches: Vec::new(),
            message: "No project name provided.".to_string(),
            kind: MatchKind::EmptyQuery,
        }
    }

    pub(crate) fn key(query: &str, record: ProjectRecord) -> Self {
        let message = format!(
            "YES - '{}' is an active project: {}: {}",
            query, record.key, record.name
        );
        Self {
            active: true,
            exact_match: true,
            matches: vec![record],
            message,
            kind: MatchKind::Key,
        }
    }

    pub(crate) fn name(query: &str, matches: Vec<ProjectRecord>) -> Self {
        let message = format!(
            "YES - '{}' is an active project. Matches: {}",
            query,
            list_matches(&matches)
        );
        Self {
            active: true,
            exact_match: true,
            matches,
            message,
            kind: MatchKind::Name,
        }
    }

    pub(crate) fn partial(query: &str, matches: Vec<ProjectRecord>) -> Self {
        let message = format!(
            "PARTIAL MATCH - '{}' partially matches active projects: {}. Please clarify which one.",
            query,
            list_matches(&matches)
        );
        Self {
            active: true,
            exact_match: false,
            matches,
            message,
            kind: MatchKind::Partial,
        }
    }

    pub(crate) fn not_found(query: &str) -> Self {
        Self {
            active: false,
            exact_match: false,
            matches: Vec::new(),
            message: format!(
                "NO - '{}' is NOT in the active projects list. Do not query Confluence/Jira/GitHub for this project.",
                query
            ),
            kind: MatchKind::NotFound,
        }
    }

    /// True when the caller must ask the user which project they meant
    pub fn needs_clarification(&self) -> bool {
        self.kind == MatchKind::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_message_lists_every_match() {
        let check = ActivityCheck::partial(
            "Thrivent",
            vec![
                ProjectRecord::new("TCM-2", "Thrivent Retirement"),
                ProjectRecord::new("TCM-3", "Thrivent Financial"),
            ],
        );
        assert_eq!(
            check.message,
            "PARTIAL MATCH - 'Thrivent' partially matches active projects: \
             TCM-2: Thrivent Retirement, TCM-3: Thrivent Financial. Please clarify which one."
        );
        assert!(check.needs_clarification());
    }

    #[test]
    fn test_kind_is_not_serialized() {
        let json = serde_json::to_value(ActivityCheck::empty_query()).unwrap();
        assert!(json.get("kind").is_none());
        assert_eq!(json["active"], false);
    }
}
