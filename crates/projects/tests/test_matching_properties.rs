use projects::{MatchKind, ProjectRecord, Snapshot};
use proptest::prelude::*;

fn records() -> impl Strategy<Value = Vec<ProjectRecord>> {
    (
        prop::collection::hash_set(1u32..100_000, 1..30),
        prop::collection::vec("[A-Za-z]([A-Za-z ]{0,12}[A-Za-z])?", 30),
    )
        .prop_map(|(ids, names)| {
            ids.into_iter()
                .zip(names)
                .map(|(id, name)| ProjectRecord::new(format!("TCM-{id}"), name))
                .collect()
        })
}

fn mixed_case(text: &str, mask: u64) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 64) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn key_in_any_case_resolves_to_that_record(
        projects in records(),
        pick in any::<prop::sample::Index>(),
        mask in any::<u64>(),
    ) {
        let target = pick.get(&projects).clone();
        let snapshot = Snapshot::build(projects);

        let check = snapshot.resolve(Some(&mixed_case(&target.key, mask)));

        prop_assert_eq!(check.kind, MatchKind::Key);
        prop_assert!(check.active && check.exact_match);
        prop_assert_eq!(check.matches, vec![target]);
    }

    #[test]
    fn name_in_any_case_returns_every_equal_name(
        projects in records(),
        pick in any::<prop::sample::Index>(),
        mask in any::<u64>(),
    ) {
        let target = pick.get(&projects).clone();
        let expected: Vec<ProjectRecord> = projects
            .iter()
            .filter(|p| p.name.to_lowercase() == target.name.to_lowercase())
            .cloned()
            .collect();
        let snapshot = Snapshot::build(projects);

        let check = snapshot.resolve(Some(&mixed_case(&target.name, mask)));

        prop_assert!(check.active && check.exact_match);
        prop_assert_eq!(check.matches, expected);
    }

    #[test]
    fn unrelated_query_is_rejected(projects in records(), query in "[0-9]{3,8}") {
        let snapshot = Snapshot::build(projects);
        let check = snapshot.resolve(Some(&query));

        prop_assert!(!check.active);
        prop_assert!(check.matches.is_empty());
    }

    #[test]
    fn blank_query_never_matches(projects in records(), query in "[ \t]{0,5}") {
        let snapshot = Snapshot::build(projects);
        let check = snapshot.resolve(Some(&query));

        prop_assert_eq!(check.kind, MatchKind::EmptyQuery);
        prop_assert!(!check.active && !check.exact_match);
        prop_assert!(check.matches.is_empty());
    }

    #[test]
    fn unique_substring_is_partial(
        target_name in "[a-z]{3,12}",
        decoys in prop::collection::vec("[0-9]{3,10}", 0..10),
        position in any::<prop::sample::Index>(),
        start in any::<prop::sample::Index>(),
        width in any::<prop::sample::Index>(),
    ) {
        // decoy names are digits only, so no letter fragment can reach them
        let mut names = decoys;
        names.insert(position.index(names.len() + 1), target_name.clone());
        let projects: Vec<ProjectRecord> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| ProjectRecord::new(format!("TCM-{}", i + 1), name))
            .collect();
        let target = projects
            .iter()
            .find(|p| p.name == target_name)
            .cloned()
            .unwrap();

        let len = target_name.len();
        let frag_len = 1 + width.index(len - 1);
        let from = start.index(len - frag_len + 1);
        let fragment = mixed_case(&target_name[from..from + frag_len], 0b1010);

        let check = Snapshot::build(projects).resolve(Some(&fragment));

        prop_assert_eq!(check.kind, MatchKind::Partial);
        prop_assert!(check.active);
        prop_assert!(!check.exact_match);
        prop_assert_eq!(check.matches, vec![target]);
    }
}
