//! Key-grouping utility for has-many loaders
//!
//! Every collection loader runs the same step after its bulk query: group the
//! flat row set by a foreign key so each requested parent can be answered from
//! one map lookup. This module centralizes that step as a pure function.

use std::collections::HashMap;
use std::hash::Hash;

/// Group rows by a derived key, preserving input order within each group.
///
/// No entry is created for keys absent from the input; callers default missing
/// groups to an empty list. Rows whose key function returns `None` (e.g. an
/// optional foreign key that is null) are dropped.
pub fn group_by_key<K, T, F>(rows: impl IntoIterator<Item = T>, key_fn: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        if let Some(key) = key_fn(&row) {
            groups.entry(key).or_default().push(row);
        }
    }
    groups
}
