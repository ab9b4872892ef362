use group_accumulators::{Group, MemoryGroup, MovingAverage, PercentageChange, PercentageOrder};
use proptest::prelude::*;

fn records() -> impl Strategy<Value = Vec<(u8, Option<i16>)>> {
    prop::collection::vec((0u8..40, prop::option::weighted(0.9, -50i16..50)), 0..60)
}

fn group(rows: &[(u8, Option<i16>)]) -> MemoryGroup<String, Option<f64>> {
    rows.iter()
        .map(|(day, value)| (format!("day-{day:02}"), value.map(f64::from)))
        .collect()
}

proptest! {
    #[test]
    fn percentage_change_preserves_cardinality(rows in records()) {
        let source = group(&rows);
        let results = PercentageChange::new(source.clone()).all();
        prop_assert_eq!(results.len(), source.all().len());
    }

    #[test]
    fn ascending_order_puts_nan_first(rows in records()) {
        let mut accumulator = PercentageChange::new(group(&rows));
        accumulator.set_order_by_percentage_change(PercentageOrder::Ascending);
        let changes: Vec<f64> = accumulator.all().iter().map(|r| r.percentage_change).collect();
        let numbers = changes.iter().skip_while(|c| c.is_nan()).copied().collect::<Vec<_>>();
        prop_assert!(numbers.iter().all(|c| !c.is_nan()));
        prop_assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn descending_order_puts_nan_last(rows in records()) {
        let mut accumulator = PercentageChange::new(group(&rows));
        accumulator.set_order_by_percentage_change(PercentageOrder::Descending);
        let changes: Vec<f64> = accumulator.all().iter().map(|r| r.percentage_change).collect();
        let numbers = changes.iter().take_while(|c| !c.is_nan()).copied().collect::<Vec<_>>();
        prop_assert!(changes[numbers.len()..].iter().all(|c| c.is_nan()));
        prop_assert!(numbers.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn percentage_change_is_idempotent(rows in records(), debug in any::<bool>()) {
        let mut accumulator = PercentageChange::new(group(&rows));
        accumulator.set_debug_mode(debug);
        let first = serde_json::to_value(accumulator.all()).unwrap();
        let second = serde_json::to_value(accumulator.all()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn moving_average_is_idempotent(rows in records(), window in 1usize..10) {
        let accumulator = MovingAverage::new(group(&rows), window);
        let first = serde_json::to_value(accumulator.all()).unwrap();
        let second = serde_json::to_value(accumulator.all()).unwrap();
        prop_assert_eq!(first, second);
    }
}
