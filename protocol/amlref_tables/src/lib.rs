//! Read-only reference tables of the SCCCG-AML2025 protocol.
//!
//! Every table is a `'static` slice built at compile time. Nothing here is
//! mutated; the risk classifier only reads the baseline [`RiskLevel`] of the
//! selected [`GeneticAbnormality`].
//!
//! [`RiskLevel`]: amlref_types::RiskLevel

pub mod drugs;
pub mod genetics;
pub mod intrathecal;

pub use drugs::*;
pub use genetics::*;
pub use intrathecal::*;
