//! Analysis modules.
//!
//! The aggregator is the summary engine proper; buckets and periods derive
//! extra views from raw events.

pub mod aggregator;
pub mod buckets;
pub mod periods;

pub use aggregator::*;
