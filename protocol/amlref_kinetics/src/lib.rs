//! WT1 transcript kinetics.
//!
//! The reduction between two WT1 expression percentages is measured in
//! base-10 log units, because the protocol's response targets are defined
//! that way (≥ 1 log after induction, ≥ 2 log after consolidation ①).

pub mod verdict;
pub mod wt1;

pub use verdict::*;
pub use wt1::*;
