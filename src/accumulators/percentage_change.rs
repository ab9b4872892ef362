//! Period-over-period percentage change for every record of a group.
//!
//! The predecessor of a record is the entry whose key sorts immediately before it once the
//! snapshot has been deduplicated by key, so unordered and duplicate-keyed input is handled
//! and missing periods are bridged. Each call to [`Group::all`] or [`Group::top`] rebuilds
//! the index from the source's current snapshot.

use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::{debug, instrument, trace};

use super::{
    index::KeyedValueIndex,
    order::{sort_by_percentage_change, PercentageOrder},
};
use crate::{
    error::{AccumulatorError, Result},
    group::{AsNumber, Group, Record},
};

type KeyFn<R, K> = Box<dyn Fn(&R) -> K>;
type ValueFn<R, V> = Box<dyn Fn(&R) -> V>;
type CalculationFn<V> = Box<dyn Fn(&V) -> Option<f64>>;
type NestedFn<V> = Box<dyn Fn(&V) -> Option<IndexMap<String, V>>>;

/// `((current - previous) / previous) * 100`.
///
/// Returns `NaN` when either side is missing or the baseline is zero, and exactly `0.0`
/// when the two sides are equal.
pub fn percentage_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    let (Some(current), Some(previous)) = (current, previous) else {
        return f64::NAN;
    };
    if previous == 0.0 {
        return f64::NAN;
    }
    let difference = current - previous;
    if difference == 0.0 {
        return 0.0;
    }
    (difference / previous) * 100.0
}

/// A named extractor for the per-record sub-collection to recurse into.
pub struct IterationAccessor<V> {
    name: String,
    extract: NestedFn<V>,
}

impl<V> IterationAccessor<V> {
    /// Field name the nested results are published under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extract(&self, value: &V) -> Option<IndexMap<String, V>> {
        (self.extract)(value)
    }
}

impl<V> std::fmt::Debug for IterationAccessor<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterationAccessor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One enriched record.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageChangeRecord<K, V> {
    pub key: K,
    /// The deduplicated value held for `key`.
    pub value: V,
    pub percentage_change: f64,
    pub nested: Option<NestedChanges<V>>,
    pub debug: Option<PercentageChangeTrace<K, V>>,
}

/// Per-entry changes of a record's sub-collection, published under `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedChanges<V> {
    pub field: String,
    pub entries: Vec<NestedChange<V>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedChange<V> {
    pub key: String,
    /// `None` when only the predecessor carries this entry.
    pub value: Option<V>,
    pub percentage_change: f64,
    #[serde(rename = "_debug", skip_serializing_if = "Option::is_none")]
    pub debug: Option<NestedTrace<V>>,
}

/// Resolution details of a top-level record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageChangeTrace<K, V> {
    pub key: K,
    pub value: V,
    pub position: usize,
    pub previous_key: Option<K>,
    pub previous_value: Option<V>,
    pub current_number: Option<f64>,
    pub previous_number: Option<f64>,
}

/// Resolution details of a nested entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTrace<V> {
    pub key: String,
    pub value: Option<V>,
    pub previous_value: Option<V>,
    pub current_number: Option<f64>,
    pub previous_number: Option<f64>,
}

impl<K: Serialize, V: Serialize> Serialize for PercentageChangeRecord<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 3 + usize::from(self.nested.is_some()) + usize::from(self.debug.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("key", &self.key)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("percentageChange", &self.percentage_change)?;
        if let Some(nested) = &self.nested {
            map.serialize_entry(nested.field.as_str(), &nested.entries)?;
        }
        if let Some(trace) = &self.debug {
            map.serialize_entry("_debug", trace)?;
        }
        map.end()
    }
}

/// Wraps a group and yields each record's percentage change against its predecessor.
pub struct PercentageChange<G: Group, K, V> {
    source: G,
    key_accessor: KeyFn<G::Record, K>,
    value_accessor: ValueFn<G::Record, V>,
    calculation_accessor: CalculationFn<V>,
    iteration_accessor: Option<IterationAccessor<V>>,
    order: PercentageOrder,
    order_only_nested: bool,
    debug: bool,
}

impl<G, K, V> PercentageChange<G, K, V>
where
    G: Group<Record = Record<K, V>>,
    K: Ord + Clone + 'static,
    V: Clone + AsNumber + 'static,
{
    /// Wrap a group of plain `{key, value}` records with the default accessors.
    pub fn new(source: G) -> Self {
        Self::with_accessors(
            source,
            |record: &Record<K, V>| record.key.clone(),
            |record: &Record<K, V>| record.value.clone(),
            |value: &V| value.as_number(),
        )
    }

    /// Like [`PercentageChange::new`], failing when no source is supplied.
    pub fn try_new(source: Option<G>) -> Result<Self> {
        source
            .map(Self::new)
            .ok_or_else(|| AccumulatorError::missing_group("no source supplied"))
    }
}

impl<G: Group, K, V> PercentageChange<G, K, V> {
    /// Wrap any group, extracting keys, values and comparable numbers with the given accessors.
    pub fn with_accessors(
        source: G,
        key_accessor: impl Fn(&G::Record) -> K + 'static,
        value_accessor: impl Fn(&G::Record) -> V + 'static,
        calculation_accessor: impl Fn(&V) -> Option<f64> + 'static,
    ) -> Self {
        Self {
            source,
            key_accessor: Box::new(key_accessor),
            value_accessor: Box::new(value_accessor),
            calculation_accessor: Box::new(calculation_accessor),
            iteration_accessor: None,
            order: PercentageOrder::default(),
            order_only_nested: false,
            debug: false,
        }
    }

    pub fn source(&self) -> &G {
        &self.source
    }

    /// Mutable access to the wrapped group; changes show up on the next call.
    pub fn source_mut(&mut self) -> &mut G {
        &mut self.source
    }

    pub fn key_accessor(&self) -> &dyn Fn(&G::Record) -> K {
        &*self.key_accessor
    }

    pub fn set_key_accessor(&mut self, accessor: impl Fn(&G::Record) -> K + 'static) {
        self.key_accessor = Box::new(accessor);
    }

    pub fn value_accessor(&self) -> &dyn Fn(&G::Record) -> V {
        &*self.value_accessor
    }

    pub fn set_value_accessor(&mut self, accessor: impl Fn(&G::Record) -> V + 'static) {
        self.value_accessor = Box::new(accessor);
    }

    pub fn calculation_accessor(&self) -> &dyn Fn(&V) -> Option<f64> {
        &*self.calculation_accessor
    }

    /// Pick the number to compare out of a (possibly composite) value.
    pub fn set_calculation_accessor(&mut self, accessor: impl Fn(&V) -> Option<f64> + 'static) {
        self.calculation_accessor = Box::new(accessor);
    }

    pub fn iteration_accessor(&self) -> Option<&IterationAccessor<V>> {
        self.iteration_accessor.as_ref()
    }

    /// Recurse into the sub-collection `extract` returns, publishing results under `name`.
    pub fn set_iteration_accessor(
        &mut self,
        name: impl Into<String>,
        extract: impl Fn(&V) -> Option<IndexMap<String, V>> + 'static,
    ) {
        self.iteration_accessor = Some(IterationAccessor {
            name: name.into(),
            extract: Box::new(extract),
        });
    }

    pub fn clear_iteration_accessor(&mut self) {
        self.iteration_accessor = None;
    }

    pub fn order_by_percentage_change(&self) -> PercentageOrder {
        self.order
    }

    pub fn set_order_by_percentage_change(&mut self, order: PercentageOrder) {
        self.order = order;
    }

    pub fn order_only_nested_values(&self) -> bool {
        self.order_only_nested
    }

    /// When set, sorting applies to nested collections only and top-level order is kept.
    pub fn set_order_only_nested_values(&mut self, only_nested: bool) {
        self.order_only_nested = only_nested;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug = debug;
    }
}

impl<G, K, V> PercentageChange<G, K, V>
where
    G: Group,
    K: Ord + Clone,
    V: Clone,
{
    #[instrument(level = "debug", skip_all, fields(records = snapshot.len()))]
    fn accumulate(&self, snapshot: Vec<G::Record>) -> Vec<PercentageChangeRecord<K, V>> {
        let index = KeyedValueIndex::build(&snapshot, &*self.key_accessor, &*self.value_accessor);
        debug!(keys = index.len(), order = ?self.order, "indexed snapshot");

        let mut results = Vec::with_capacity(snapshot.len());
        for record in &snapshot {
            let key = (self.key_accessor)(record);
            let value = match index.get(&key) {
                Some(value) => value.clone(),
                None => (self.value_accessor)(record),
            };
            let predecessor = index.predecessor(&key);
            let current_number = (self.calculation_accessor)(&value);
            let previous_number =
                predecessor.and_then(|(_, previous)| (self.calculation_accessor)(previous));
            let change = match predecessor {
                Some(_) => percentage_change(current_number, previous_number),
                None => 0.0,
            };
            trace!(
                has_predecessor = predecessor.is_some(),
                change,
                "resolved record"
            );

            let nested = self.iteration_accessor.as_ref().and_then(|accessor| {
                self.nested_changes(accessor, &value, predecessor.map(|(_, previous)| previous))
            });
            let trace = self.debug.then(|| PercentageChangeTrace {
                key: key.clone(),
                value: value.clone(),
                position: index.position(&key).unwrap_or_default(),
                previous_key: predecessor.map(|(previous_key, _)| previous_key.clone()),
                previous_value: predecessor.map(|(_, previous)| previous.clone()),
                current_number,
                previous_number,
            });

            results.push(PercentageChangeRecord {
                key,
                value,
                percentage_change: change,
                nested,
                debug: trace,
            });
        }

        if !self.order_only_nested {
            sort_by_percentage_change(&mut results, self.order, |r| r.percentage_change);
        }
        results
    }

    fn nested_changes(
        &self,
        accessor: &IterationAccessor<V>,
        current: &V,
        previous: Option<&V>,
    ) -> Option<NestedChanges<V>> {
        let current_entries = accessor.extract(current);
        let previous_entries = previous.and_then(|previous| accessor.extract(previous));
        if current_entries.is_none() && previous_entries.is_none() {
            return None;
        }
        let current_entries = current_entries.unwrap_or_default();
        let previous_entries = previous_entries.unwrap_or_default();

        let keys = current_entries
            .keys()
            .chain(previous_entries.keys().filter(|k| !current_entries.contains_key(*k)));
        let mut entries = Vec::with_capacity(current_entries.len().max(previous_entries.len()));
        for key in keys {
            let value = current_entries.get(key);
            let previous_value = previous_entries.get(key);
            let current_number = value.and_then(|v| (self.calculation_accessor)(v));
            let previous_number = previous_value.and_then(|v| (self.calculation_accessor)(v));
            let change = match previous {
                Some(_) => percentage_change(current_number, previous_number),
                None => 0.0,
            };
            entries.push(NestedChange {
                key: key.clone(),
                value: value.cloned(),
                percentage_change: change,
                debug: self.debug.then(|| NestedTrace {
                    key: key.clone(),
                    value: value.cloned(),
                    previous_value: previous_value.cloned(),
                    current_number,
                    previous_number,
                }),
            });
        }

        sort_by_percentage_change(&mut entries, self.order, |e| e.percentage_change);
        Some(NestedChanges {
            field: accessor.name().to_owned(),
            entries,
        })
    }
}

impl<G, K, V> Group for PercentageChange<G, K, V>
where
    G: Group,
    K: Ord + Clone,
    V: Clone,
{
    type Record = PercentageChangeRecord<K, V>;

    fn all(&self) -> Vec<Self::Record> {
        self.accumulate(self.source.all())
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        self.accumulate(self.source.top(n))
    }
}
