//! Trailing N-point moving average over a group's snapshot.
//!
//! Windows are positional: a record is averaged with the entries directly before it in
//! the snapshot, not with its key-sorted neighbours. Near the start of the snapshot the
//! window shrinks to whatever is available.
//!
//! `top(n)` does not average: it only reports the running total over the source's top
//! records. [`MovingAverage::top_averaged`] averages the top-n snapshot instead.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::group::{AsNumber, Group, Record};

type KeyFn<R, K> = Box<dyn Fn(&R) -> K>;
type NumberFn<R> = Box<dyn Fn(&R) -> f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageRecord<K> {
    pub key: K,
    /// The windowed average; absent on records produced by [`Group::top`].
    pub value: Option<f64>,
    pub debug: MovingAverageTrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverageTrace {
    /// Running total of every value seen so far in this traversal.
    pub cumulate: f64,
    /// Sum over the current window (the record's own value for `top`).
    pub this_result: f64,
    /// The average for `all`, the running total for `top`.
    pub result: f64,
}

/// Wraps a group and yields each record averaged with its preceding entries.
pub struct MovingAverage<G: Group, K> {
    source: G,
    window: usize,
    key_accessor: KeyFn<G::Record, K>,
    value_accessor: NumberFn<G::Record>,
}

impl<G, K, V> MovingAverage<G, K>
where
    G: Group<Record = Record<K, V>>,
    K: Clone + 'static,
    V: AsNumber + 'static,
{
    /// Average each `{key, value}` record over `window` points; non-numeric values count as `NaN`.
    pub fn new(source: G, window: usize) -> Self {
        Self::with_accessors(
            source,
            window,
            |record: &Record<K, V>| record.key.clone(),
            |record: &Record<K, V>| record.value.as_number().unwrap_or(f64::NAN),
        )
    }
}

impl<G: Group, K> MovingAverage<G, K> {
    pub fn with_accessors(
        source: G,
        window: usize,
        key_accessor: impl Fn(&G::Record) -> K + 'static,
        value_accessor: impl Fn(&G::Record) -> f64 + 'static,
    ) -> Self {
        Self {
            source,
            window,
            key_accessor: Box::new(key_accessor),
            value_accessor: Box::new(value_accessor),
        }
    }

    pub fn source(&self) -> &G {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut G {
        &mut self.source
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// A window of zero behaves like a window of one.
    pub fn set_window(&mut self, window: usize) {
        self.window = window;
    }

    /// Moving averages over the source's top `n` records.
    pub fn top_averaged(&self, n: usize) -> Vec<MovingAverageRecord<K>> {
        self.averaged(self.source.top(n))
    }

    #[instrument(level = "debug", skip_all, fields(records = snapshot.len(), window = self.window))]
    fn averaged(&self, snapshot: Vec<G::Record>) -> Vec<MovingAverageRecord<K>> {
        let window = self.window.max(1);
        let values: Vec<f64> = snapshot.iter().map(|r| (self.value_accessor)(r)).collect();

        let mut cumulate = 0.0;
        let mut results = Vec::with_capacity(snapshot.len());
        for (idx, record) in snapshot.iter().enumerate() {
            cumulate += values[idx];
            let start = (idx + 1).saturating_sub(window);
            let points = &values[start..=idx];
            let sum: f64 = points.iter().sum();
            let average = sum / points.len() as f64;
            results.push(MovingAverageRecord {
                key: (self.key_accessor)(record),
                value: Some(average),
                debug: MovingAverageTrace {
                    cumulate,
                    this_result: sum,
                    result: average,
                },
            });
        }
        debug!(cumulate, "computed moving averages");
        results
    }

    fn running_totals(&self, snapshot: Vec<G::Record>) -> Vec<MovingAverageRecord<K>> {
        let mut cumulate = 0.0;
        snapshot
            .iter()
            .map(|record| {
                let value = (self.value_accessor)(record);
                cumulate += value;
                MovingAverageRecord {
                    key: (self.key_accessor)(record),
                    value: None,
                    debug: MovingAverageTrace {
                        cumulate,
                        this_result: value,
                        result: cumulate,
                    },
                }
            })
            .collect()
    }
}

impl<G: Group, K> Group for MovingAverage<G, K> {
    type Record = MovingAverageRecord<K>;

    fn all(&self) -> Vec<Self::Record> {
        self.averaged(self.source.all())
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        self.running_totals(self.source.top(n))
    }
}
