use crate::check::ActivityCheck;
use std::collections::HashSet;
use tracker::ProjectRecord;

/// Immutable view of the allow-list as of one load.
///
/// Both index sets are derived from `projects` at construction and never
/// touched afterwards; a reload builds a whole new snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    projects: Vec<ProjectRecord>,
    names_lower: HashSet<String>,
    keys: HashSet<String>,
    loaded: bool,
}

impl Snapshot {
    /// The state before any load
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(projects: Vec<ProjectRecord>) -> Self {
        let names_lower = projects.iter().map(|p| p.name.to_lowercase()).collect();
        let keys = projects.iter().map(|p| p.key.to_uppercase()).collect();
        Self {
            projects,
            names_lower,
            keys,
            loaded: true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn sample_names(&self, limit: usize) -> Vec<String> {
        self.projects
            .iter()
            .take(limit)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Resolve a query against this snapshot. First matching tier wins.
    pub fn resolve(&self, query: Option<&str>) -> ActivityCheck {
        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return ActivityCheck::empty_query(),
        };
        let query_lower = query.to_lowercase();
        let query_upper = query.to_uppercase();

        if self.keys.contains(&query_upper) {
            if let Some(record) = self
                .projects
                .iter()
                .find(|p| p.key.to_uppercase() == query_upper)
            {
                return ActivityCheck::key(query, record.clone());
            }
        }

        if self.names_lower.contains(&query_lower) {
            let exact: Vec<ProjectRecord> = self
                .projects
                .iter()
                .filter(|p| p.name.to_lowercase() == query_lower)
                .cloned()
                .collect();
            return ActivityCheck::name(query, exact);
        }

        let partial: Vec<ProjectRecord> = self
            .projects
            .iter()
            .filter(|p| {
                let name_lower = p.name.to_lowercase();
                // an empty name would be contained in every query
                !name_lower.is_empty()
                    && (name_lower.contains(&query_lower) || query_lower.contains(&name_lower))
            })
            .cloned()
            .collect();
        if !partial.is_empty() {
            return ActivityCheck::partial(query, partial);
        }

        ActivityCheck::not_found(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchKind;

    fn snapshot() -> Snapshot {
        Snapshot::build(vec![
            ProjectRecord::new("TCM-1", "3M"),
            ProjectRecord::new("TCM-2", "Thrivent Retirement"),
            ProjectRecord::new("TCM-3", "Thrivent Financial"),
        ])
    }

    #[test]
    fn test_empty_snapshot_is_not_loaded() {
        let empty = Snapshot::empty();
        assert!(!empty.is_loaded());
        assert!(empty.is_empty());
        assert_eq!(empty.resolve(Some("3M")).kind, MatchKind::NotFound);
    }

    #[test]
    fn test_key_lookup_any_case() {
        for query in ["TCM-1", "tcm-1", "Tcm-1", "  tcm-1  "] {
            let check = snapshot().resolve(Some(query));
            assert_eq!(check.kind, MatchKind::Key, "query {query:?}");
            assert!(check.active && check.exact_match);
            assert_eq!(check.matches, vec![ProjectRecord::new("TCM-1", "3M")]);
        }
    }

    #[test]
    fn test_key_message_uses_trimmed_query() {
        let check = snapshot().resolve(Some("  tcm-1 "));
        assert_eq!(check.message, "YES - 'tcm-1' is an active project: TCM-1: 3M");
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        let check = snapshot().resolve(Some("3m"));
        assert_eq!(check.kind, MatchKind::Name);
        assert!(check.active && check.exact_match);
        assert_eq!(check.message, "YES - '3m' is an active project. Matches: TCM-1: 3M");
    }

    #[test]
    fn test_partial_match_both_directions() {
        let fragment = snapshot().resolve(Some("Thrivent"));
        assert_eq!(fragment.kind, MatchKind::Partial);
        assert!(fragment.active && !fragment.exact_match);
        assert_eq!(fragment.matches.len(), 2);
        assert_eq!(fragment.matches[0].key, "TCM-2");
        assert_eq!(fragment.matches[1].key, "TCM-3");

        let longer = snapshot().resolve(Some("the 3M account"));
        assert_eq!(longer.kind, MatchKind::Partial);
        assert_eq!(longer.matches, vec![ProjectRecord::new("TCM-1", "3M")]);
    }

    #[test]
    fn test_key_tier_wins_over_name_tier() {
        let snapshot = Snapshot::build(vec![
            ProjectRecord::new("TCM-5", "Alpha"),
            ProjectRecord::new("TCM-6", "tcm-5"),
        ]);
        let check = snapshot.resolve(Some("TCM-5"));
        assert_eq!(check.kind, MatchKind::Key);
        assert_eq!(check.matches, vec![ProjectRecord::new("TCM-5", "Alpha")]);
    }

    #[test]
    fn test_empty_and_whitespace_queries() {
        for query in [None, Some(""), Some("   "), Some("\t\n")] {
            let check = snapshot().resolve(query);
            assert_eq!(check.kind, MatchKind::EmptyQuery);
            assert!(!check.active && !check.exact_match);
            assert!(check.matches.is_empty());
            assert_eq!(check.message, "No project name provided.");
        }
    }

    #[test]
    fn test_empty_name_does_not_match_everything() {
        let snapshot = Snapshot::build(vec![ProjectRecord::new("TCM-8", "")]);
        let check = snapshot.resolve(Some("Acme"));
        assert_eq!(check.kind, MatchKind::NotFound);
    }

    #[test]
    fn test_sample_names_respects_limit() {
        assert_eq!(snapshot().sample_names(2), vec!["3M", "Thrivent Retirement"]);
        assert_eq!(snapshot().sample_names(10).len(), 3);
        assert!(snapshot().sample_names(0).is_empty());
    }
}
