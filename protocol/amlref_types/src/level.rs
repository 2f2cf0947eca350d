// Risk tiers and prognosis categories used throughout the protocol tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clinical risk tier assigned to a patient.
///
/// Ordered by severity, so `Low < Medium < High` and `max` picks the more
/// severe of two tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Stable machine code, also accepted by `FromStr`.
    pub const fn code(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Label as printed in the protocol.
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "标危",
            RiskLevel::Medium => "中危",
            RiskLevel::High => "高危",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub input: String,
}

impl FromStr for RiskLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        RiskLevel::ALL
            .into_iter()
            .find(|l| t.eq_ignore_ascii_case(l.code()) || t == l.label())
            .ok_or_else(|| ParseLabelError {
                kind: "risk level",
                input: s.to_string(),
            })
    }
}

/// Prognosis category of a genetic marker in the handbook table.
///
/// Not consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrognosisType {
    Favorable,
    Intermediate,
    Adverse,
}

impl PrognosisType {
    pub const fn label(self) -> &'static str {
        match self {
            PrognosisType::Favorable => "预后好",
            PrognosisType::Intermediate => "预后中等",
            PrognosisType::Adverse => "预后差",
        }
    }
}

impl fmt::Display for PrognosisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
