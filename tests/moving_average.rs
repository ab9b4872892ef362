use group_accumulators::{Group, MemoryGroup, MovingAverage, Record};
use serde_json::{json, Value};

const VISITS: [f64; 7] = [2.0, 3.0, 10.0, 3.0, 10.0, 12.0, 7.0];

fn visits() -> MemoryGroup<String, f64> {
    VISITS
        .into_iter()
        .enumerate()
        .map(|(idx, v)| (format!("2012-01-{}", 11 + idx), v))
        .collect()
}

fn averages(accumulator: &MovingAverage<MemoryGroup<String, f64>, String>) -> Vec<f64> {
    accumulator
        .all()
        .into_iter()
        .map(|r| r.value.unwrap_or(f64::NAN))
        .collect()
}

#[test]
fn two_point_average() {
    let accumulator = MovingAverage::new(visits(), 2);
    assert_eq!(
        averages(&accumulator),
        vec![2.0, 2.5, 6.5, 6.5, 6.5, 11.0, 9.5]
    );
}

#[test]
fn three_point_average() {
    let accumulator = MovingAverage::new(visits(), 3);
    assert_eq!(
        averages(&accumulator),
        vec![
            2.0,
            2.5,
            5.0,
            5.333333333333333,
            7.666666666666667,
            8.333333333333334,
            9.666666666666666
        ]
    );
}

#[test]
fn window_shrinks_at_the_start() {
    let accumulator = MovingAverage::new(visits(), 30);
    let results = accumulator.all();
    assert_eq!(results[0].value, Some(2.0));
    assert_eq!(results[6].value, Some(47.0 / 7.0));
}

#[test]
fn zero_window_averages_single_points() {
    let mut accumulator = MovingAverage::new(visits(), 3);
    accumulator.set_window(0);
    assert_eq!(accumulator.window(), 0);
    assert_eq!(averages(&accumulator), VISITS.to_vec());
}

#[test]
fn trace_carries_running_total_and_window_sum() {
    let accumulator = MovingAverage::new(visits(), 2);
    let results = accumulator.all();
    let trace = results[2].debug;
    assert_eq!(trace.cumulate, 15.0);
    assert_eq!(trace.this_result, 13.0);
    assert_eq!(trace.result, 6.5);
    assert_eq!(results[6].debug.cumulate, 47.0);
    assert_eq!(results[2].key, "2012-01-13");
}

#[test]
fn repeated_calls_are_identical() {
    let accumulator = MovingAverage::new(visits(), 3);
    assert_eq!(accumulator.all(), accumulator.all());
}

#[test]
fn top_reports_running_totals_only() {
    let accumulator = MovingAverage::new(visits(), 2);
    let results = accumulator.top(3);
    let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["2012-01-16", "2012-01-13", "2012-01-15"]);
    assert!(results.iter().all(|r| r.value.is_none()));
    let totals: Vec<_> = results.iter().map(|r| r.debug.result).collect();
    assert_eq!(totals, vec![12.0, 22.0, 32.0]);
    assert_eq!(results[1].debug.this_result, 10.0);
}

#[test]
fn top_averaged_averages_the_top_snapshot() {
    let accumulator = MovingAverage::new(visits(), 2);
    let results = accumulator.top_averaged(3);
    let values: Vec<_> = results.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![Some(12.0), Some(11.0), Some(10.0)]);
}

#[test]
fn non_numeric_values_poison_their_windows() {
    let group: MemoryGroup<&str, Value> = [("a", json!(1)), ("b", json!("x")), ("c", json!(3))]
        .into_iter()
        .collect();
    let results = MovingAverage::new(group, 2).all();
    assert_eq!(results[0].value, Some(1.0));
    assert!(results[1].value.unwrap().is_nan());
    assert!(results[2].value.unwrap().is_nan());
}

#[test]
fn custom_accessors_read_any_record_shape() {
    let group = Records(vec![Record::new("a", (1, 4.0)), Record::new("b", (2, 8.0))]);
    let accumulator = MovingAverage::with_accessors(
        group,
        2,
        |r: &Record<&'static str, (u32, f64)>| r.key,
        |r: &Record<&'static str, (u32, f64)>| r.value.1,
    );
    let values: Vec<_> = accumulator.all().into_iter().map(|r| r.value).collect();
    assert_eq!(values, vec![Some(4.0), Some(6.0)]);
}

/// A group over records whose values are not numbers on their own.
struct Records(Vec<Record<&'static str, (u32, f64)>>);

impl Group for Records {
    type Record = Record<&'static str, (u32, f64)>;

    fn all(&self) -> Vec<Self::Record> {
        self.0.clone()
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        self.0.iter().take(n).cloned().collect()
    }
}
