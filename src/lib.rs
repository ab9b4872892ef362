//! Moving-average and percentage-change transforms over key/value aggregation groups.
//!
//! Every accumulator wraps a [`Group`] and is itself a [`Group`], so transforms stack:
//!
//! ```
//! use group_accumulators::{Group, MemoryGroup, PercentageChange};
//!
//! let visits: MemoryGroup<&str, f64> =
//!     [("2012-01-11", 2.0), ("2012-01-12", 3.0)].into_iter().collect();
//! let changes = PercentageChange::new(visits).all();
//! assert_eq!(changes[1].percentage_change, 50.0);
//! ```

pub mod accumulators;
pub mod cli;
pub mod config;
pub mod error;
pub mod group;
pub mod logging;

pub use accumulators::{
    KeyedValueIndex, MovingAverage, MovingAverageRecord, PercentageChange, PercentageChangeRecord,
    PercentageOrder,
};
pub use error::{AccumulatorError, Result};
pub use group::{AsNumber, Group, MemoryGroup, Record};
