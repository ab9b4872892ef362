//! Deduplicating key/value lookup with sorted-key adjacency.

use std::collections::BTreeMap;

/// Last-write-wins mapping from key to value plus the distinct keys in ascending order.
#[derive(Debug, Clone)]
pub struct KeyedValueIndex<K, V> {
    values: BTreeMap<K, V>,
    ordered: Vec<K>,
}

impl<K: Ord + Clone, V> KeyedValueIndex<K, V> {
    /// Index `records`, extracting each key and value with the given accessors.
    ///
    /// Later records overwrite earlier ones with the same key.
    pub fn build<R>(
        records: &[R],
        key_fn: impl Fn(&R) -> K,
        value_fn: impl Fn(&R) -> V,
    ) -> Self {
        let mut values = BTreeMap::new();
        for record in records {
            values.insert(key_fn(record), value_fn(record));
        }
        let ordered = values.keys().cloned().collect();
        Self { values, ordered }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Position of `key` among the sorted distinct keys.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.ordered.binary_search(key).ok()
    }

    /// The entry sorting immediately before `key`, bridging any gaps in the sequence.
    pub fn predecessor(&self, key: &K) -> Option<(&K, &V)> {
        let position = self.position(key)?;
        let previous = self.ordered.get(position.checked_sub(1)?)?;
        self.values.get_key_value(previous)
    }

    pub fn ordered_keys(&self) -> &[K] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(rows: &[(&'static str, i32)]) -> KeyedValueIndex<&'static str, i32> {
        KeyedValueIndex::build(rows, |r| r.0, |r| r.1)
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert!(idx.ordered_keys().is_empty());
        assert_eq!(idx.predecessor(&"a"), None);
    }

    #[test]
    fn duplicates_keep_last_value() {
        let idx = index(&[("2012-01-11", 2), ("2012-01-12", 5), ("2012-01-11", 3)]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(&"2012-01-11"), Some(&3));
    }

    #[test]
    fn keys_sort_regardless_of_input_order() {
        let idx = index(&[("c", 1), ("a", 2), ("b", 3)]);
        assert_eq!(idx.ordered_keys(), &["a", "b", "c"]);
        assert_eq!(idx.position(&"c"), Some(2));
    }

    #[test]
    fn predecessor_bridges_gaps() {
        let idx = index(&[("13", 1), ("15", 2), ("12", 0)]);
        assert_eq!(idx.predecessor(&"15"), Some((&"13", &1)));
        assert_eq!(idx.predecessor(&"12"), None);
        assert_eq!(idx.predecessor(&"14"), None);
    }
}
