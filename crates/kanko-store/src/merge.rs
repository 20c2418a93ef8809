//! Keyed merge policies for the persisted tables.
//!
//! The two policies are intentionally different: search results merge with
//! new data winning on key collision, while the enrichment table keeps
//! existing rows on conflict (existing-then-new concatenation deduplicated
//! first-occurrence-wins).

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Union `existing` and `new` by key, with entries from `new` replacing
/// existing entries in place. Items from `new` with unseen keys are appended
/// in their input order.
pub fn merge_keyed_new_wins<T, K, F>(existing: Vec<T>, new: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged = existing;
    let mut index_by_key: HashMap<K, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect();

    for item in new {
        match index_by_key.get(&key(&item)) {
            Some(&i) => merged[i] = item,
            None => {
                index_by_key.insert(key(&item), merged.len());
                merged.push(item);
            }
        }
    }
    merged
}

/// Keep only the first occurrence of each key, preserving input order.
pub fn dedup_keyed_first_wins<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wins_replaces_in_place_and_appends_fresh_keys() {
        let existing = vec![("a", 1), ("b", 2)];
        let new = vec![("b", 20), ("c", 3)];
        let merged = merge_keyed_new_wins(existing, new, |&(k, _)| k);
        assert_eq!(merged, vec![("a", 1), ("b", 20), ("c", 3)]);
    }

    #[test]
    fn new_wins_with_empty_existing_keeps_new_order() {
        let merged = merge_keyed_new_wins(Vec::new(), vec![("x", 1), ("y", 2)], |&(k, _)| k);
        assert_eq!(merged, vec![("x", 1), ("y", 2)]);
    }

    #[test]
    fn new_wins_later_duplicate_within_new_overwrites_earlier() {
        let merged = merge_keyed_new_wins(
            Vec::new(),
            vec![("x", 1), ("x", 2), ("x", 3)],
            |&(k, _)| k,
        );
        assert_eq!(merged, vec![("x", 3)]);
    }

    #[test]
    fn first_wins_keeps_earliest_occurrence() {
        let items = vec![("a", 1), ("b", 2), ("a", 99), ("c", 3), ("b", 98)];
        let deduped = dedup_keyed_first_wins(items, |&(k, _)| k);
        assert_eq!(deduped, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn first_wins_existing_rows_beat_new_on_concat() {
        // Enrichment merge: concatenating existing-then-new and deduping
        // first-wins preserves the existing rows on conflict.
        let existing = vec![("v1", "old")];
        let new = vec![("v1", "new"), ("v2", "new")];
        let concatenated: Vec<_> = existing.into_iter().chain(new).collect();
        let merged = dedup_keyed_first_wins(concatenated, |&(k, _)| k);
        assert_eq!(merged, vec![("v1", "old"), ("v2", "new")]);
    }

    #[test]
    fn policies_are_idempotent_on_rerun_with_same_data() {
        let table = vec![("a", 1), ("b", 2)];
        let rerun = merge_keyed_new_wins(table.clone(), table.clone(), |&(k, _)| k);
        assert_eq!(rerun, table);
        let rerun = dedup_keyed_first_wins(
            table.iter().copied().chain(table.iter().copied()).collect(),
            |&(k, _)| k,
        );
        assert_eq!(rerun, table);
    }
}
