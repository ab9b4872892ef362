//! The group contract consumed and exposed by every accumulator.

mod memory;

pub use memory::MemoryGroup;

use serde::{Deserialize, Serialize};

/// A sorted key/value collection with a full snapshot and a top-n view.
///
/// Accumulators both consume and implement this trait, so they can be stacked.
pub trait Group {
    type Record;

    /// Full, currently filtered snapshot in whatever order the group keeps.
    fn all(&self) -> Vec<Self::Record>;

    /// The `n` largest records by the group's own value ordering.
    fn top(&self, n: usize) -> Vec<Self::Record>;
}

impl<G: Group + ?Sized> Group for &G {
    type Record = G::Record;

    fn all(&self) -> Vec<Self::Record> {
        (**self).all()
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        (**self).top(n)
    }
}

impl<G: Group + ?Sized> Group for Box<G> {
    type Record = G::Record;

    fn all(&self) -> Vec<Self::Record> {
        (**self).all()
    }

    fn top(&self, n: usize) -> Vec<Self::Record> {
        (**self).top(n)
    }
}

/// Default record shape produced by aggregation groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> From<(K, V)> for Record<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

/// Numeric view of a group value; `None` marks a value with no usable number.
pub trait AsNumber {
    fn as_number(&self) -> Option<f64>;
}

impl AsNumber for f64 {
    fn as_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl AsNumber for f32 {
    fn as_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

macro_rules! integer_as_number {
    ($($ty:ty),*) => {
        $(
            impl AsNumber for $ty {
                fn as_number(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

integer_as_number!(i32, i64, u32, u64, usize);

impl<T: AsNumber> AsNumber for Option<T> {
    fn as_number(&self) -> Option<f64> {
        self.as_ref().and_then(AsNumber::as_number)
    }
}

impl AsNumber for serde_json::Value {
    fn as_number(&self) -> Option<f64> {
        self.as_f64()
    }
}
