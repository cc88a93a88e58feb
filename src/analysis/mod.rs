//! Analysis modules.
//!
//! Classification rules, the statistics aggregator and the roster queries
//! that feed the report.

pub mod aggregator;
pub mod classify;
pub mod roster;

pub use aggregator::*;
pub use roster::*;
