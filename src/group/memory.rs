//! In-memory group used by the CLI and by callers without an aggregation engine.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

use super::{AsNumber, Group, Record};
use crate::error::{AccumulatorError, Result};

/// A mutable list of records exposing the group contract.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGroup<K, V> {
    records: Vec<Record<K, V>>,
}

impl<K, V> Default for MemoryGroup<K, V> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<K, V> MemoryGroup<K, V> {
    pub fn new(records: Vec<Record<K, V>>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, key: K, value: V) {
        self.records.push(Record::new(key, value));
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record<K, V>] {
        &self.records
    }
}

impl<K, V> Extend<Record<K, V>> for MemoryGroup<K, V> {
    fn extend<I: IntoIterator<Item = Record<K, V>>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryGroup<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Record::from).collect())
    }
}

impl<K: Clone, V: Clone + AsNumber> Group for MemoryGroup<K, V> {
    type Record = Record<K, V>;

    fn all(&self) -> Vec<Self::Record> {
        self.records.clone()
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        let mut ranked: Vec<&Record<K, V>> = self.records.iter().collect();
        ranked.sort_by(|a, b| match (numeric(&a.value), numeric(&b.value)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        ranked.into_iter().take(n).cloned().collect()
    }
}

impl MemoryGroup<String, Value> {
    /// Build a group from a JSON object of the form `{"all": [{"key": .., "value": ..}, ..]}`.
    ///
    /// Anything else (null, a number, a string, an object without an `all` array) is rejected
    /// with [`AccumulatorError::InvalidArgument`]. Keys are coerced to strings.
    pub fn from_json(source: Value) -> Result<Self> {
        let mut object = match source {
            Value::Object(object) => object,
            Value::Null => return Err(AccumulatorError::missing_group("got null")),
            other => {
                return Err(AccumulatorError::missing_group(format!(
                    "got {}",
                    json_kind(&other)
                )))
            }
        };
        let rows = match object.remove("all") {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(AccumulatorError::missing_group(format!(
                    "`all` is {}, expected an array",
                    json_kind(&other)
                )))
            }
            None => return Err(AccumulatorError::missing_group("object has no `all` member")),
        };

        let mut records = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let Value::Object(mut row) = row else {
                return Err(AccumulatorError::InvalidArgument(format!(
                    "record {idx} is not an object"
                )));
            };
            let key = row.remove("key").map(key_string).unwrap_or_default();
            let value = row.remove("value").unwrap_or(Value::Null);
            records.push(Record::new(key, value));
        }
        debug!(records = records.len(), "loaded json group");
        Ok(Self::new(records))
    }
}

/// `NaN` ranks with the non-numeric values.
fn numeric<V: AsNumber>(value: &V) -> Option<f64> {
    value.as_number().filter(|v| !v.is_nan())
}

fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn top_orders_by_value_descending() {
        let group: MemoryGroup<&str, f64> =
            [("a", 1.0), ("b", 5.0), ("c", 3.0)].into_iter().collect();
        let keys: Vec<_> = group.top(2).into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn top_places_non_numeric_values_last() {
        let group: MemoryGroup<&str, Option<f64>> =
            [("a", None), ("b", Some(1.0))].into_iter().collect();
        let keys: Vec<_> = group.top(5).into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn top_skips_nan_in_favour_of_real_values() {
        let group: MemoryGroup<usize, f64> = (0..60)
            .map(|idx| {
                let value = if idx % 3 == 0 { f64::NAN } else { idx as f64 };
                (idx, value)
            })
            .collect();
        let values: Vec<f64> = group.top(10).into_iter().map(|r| r.value).collect();
        assert_eq!(
            values,
            vec![59.0, 58.0, 56.0, 55.0, 53.0, 52.0, 50.0, 49.0, 47.0, 46.0]
        );

        let tail = group.top(60);
        assert!(tail[..40].iter().all(|r| !r.value.is_nan()));
        assert!(tail[40..].iter().all(|r| r.value.is_nan()));
    }

    #[test]
    fn json_keys_are_coerced_to_strings() {
        let group = MemoryGroup::from_json(json!({
            "all": [{"key": 10, "value": 1}, {"key": "x", "value": {"count": 2}}]
        }))
        .unwrap();
        assert_eq!(group.records()[0].key, "10");
        assert_eq!(group.records()[1].value, json!({"count": 2}));
    }

    #[test]
    fn json_rejects_non_object_records() {
        let err = MemoryGroup::from_json(json!({"all": [1]})).unwrap_err();
        assert!(matches!(err, AccumulatorError::InvalidArgument(_)));
    }
}
