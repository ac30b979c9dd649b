// tests/property_patterns.rs

use std::collections::HashSet;

use proptest::prelude::*;
use prepwatch::watch::{BlockPatterns, ChangeBatch};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("src".to_string()),
        "[a-z]{1,4}",
        "[a-z]{1,3}\\.(rs|md|xxx)",
    ]
}

fn rel_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..4).prop_map(|segs| segs.join("/"))
}

fn pattern_set() -> impl Strategy<Value = Vec<String>> {
    let include = prop_oneof![
        Just("**".to_string()),
        Just("a/*".to_string()),
        Just("**/*.rs".to_string()),
        Just("src/**".to_string()),
        Just("b/*/*.md".to_string()),
    ];
    let exclude = prop_oneof![
        Just("!**/*.xxx".to_string()),
        Just("!a/b/**".to_string()),
        Just("!src/*".to_string()),
    ];
    (
        proptest::collection::vec(include, 1..3),
        proptest::collection::vec(exclude, 0..2),
    )
        .prop_map(|(mut inc, exc)| {
            inc.extend(exc);
            inc
        })
}

proptest! {
    #[test]
    fn match_paths_is_an_ordered_duplicate_free_subset(
        patterns in pattern_set(),
        paths in proptest::collection::vec(rel_path(), 0..12),
    ) {
        let compiled = BlockPatterns::compile(&patterns).unwrap();
        let matched = compiled.match_paths(&paths);

        // Subset, each element individually accepted.
        for m in &matched {
            prop_assert!(paths.contains(m));
            prop_assert!(compiled.matches(m));
        }

        // No duplicates.
        let unique: HashSet<&String> = matched.iter().collect();
        prop_assert_eq!(unique.len(), matched.len());

        // First occurrences, in input order.
        let mut expected = Vec::new();
        for p in &paths {
            if compiled.matches(p) && !expected.contains(p) {
                expected.push(p.clone());
            }
        }
        prop_assert_eq!(matched, expected);
    }

    #[test]
    fn excluded_paths_never_match(
        patterns in pattern_set(),
        paths in proptest::collection::vec(rel_path(), 0..12),
    ) {
        let compiled = BlockPatterns::compile(&patterns).unwrap();
        for p in compiled.match_paths(&paths) {
            prop_assert!(!p.ends_with(".xxx") || !patterns.iter().any(|x| x == "!**/*.xxx"));
            prop_assert!(!p.starts_with("a/b/") || !patterns.iter().any(|x| x == "!a/b/**"));
        }
    }

    #[test]
    fn change_batch_lists_are_sorted_and_disjoint(
        added in proptest::collection::vec(rel_path(), 0..8),
        modified in proptest::collection::vec(rel_path(), 0..8),
        deleted in proptest::collection::vec(rel_path(), 0..8),
    ) {
        let batch = ChangeBatch::new(&added, &modified, &deleted);

        for list in [batch.added(), batch.modified(), batch.deleted()] {
            let mut sorted = list.to_vec();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(list, sorted.as_slice());
        }

        let total: HashSet<&str> = batch.paths().into_iter().collect();
        prop_assert_eq!(total.len(), batch.len());

        for d in &deleted {
            prop_assert!(batch.deleted().contains(d));
        }
        prop_assert!(batch.all().iter().all(|p| !batch.deleted().contains(p)));
    }
}
