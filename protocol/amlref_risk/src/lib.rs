//! Risk stratification for the SCCCG-AML2025 protocol.
//!
//! [`classify`] is a pure decision table: given the baseline genetic tier and
//! the measurements of one treatment stage it returns a tier and the
//! condition that decided it. No state is kept between calls and stages are
//! not required to arrive in clinical order.

pub mod classifier;
pub mod finding;
pub mod input;
pub mod thresholds;

pub use classifier::*;
pub use finding::*;
pub use input::*;
