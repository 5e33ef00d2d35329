// dayhist-stats/src/lib.rs
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod aggregation;
pub mod selection;
pub mod statistics;

pub use aggregation::{aggregate, Aggregation, ParseAggregationError};

/// A single present sample extracted from a statistics record.
pub type Sample = f64;
