//! Derived-aggregate transforms that wrap a [`Group`](crate::group::Group).

pub mod index;
pub mod moving_average;
pub mod order;
pub mod percentage_change;

pub use index::KeyedValueIndex;
pub use moving_average::{MovingAverage, MovingAverageRecord, MovingAverageTrace};
pub use order::{compare_percentage_change, sort_by_percentage_change, PercentageOrder};
pub use percentage_change::{
    percentage_change, IterationAccessor, NestedChange, NestedChanges, NestedTrace,
    PercentageChange, PercentageChangeRecord, PercentageChangeTrace,
};
