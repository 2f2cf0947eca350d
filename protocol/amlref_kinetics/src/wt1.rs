use std::fmt;
use std::str::FromStr;

use amlref_types::parse_measurement;
use serde::{Deserialize, Serialize};

/// Substitute for a current reading of zero or below under [`ZeroReadingPolicy::Floor`].
pub const DEFAULT_ZERO_FLOOR_PERCENT: f64 = 1e-5;

/// What to do when the current WT1 reading is zero or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroReadingPolicy {
    /// Replace the reading with a small positive floor. An undetectable
    /// transcript is a valid result and still yields a (large) reduction.
    #[default]
    Floor,
    /// Treat the reading as invalid; the reduction is undetermined.
    Reject,
}

impl fmt::Display for ZeroReadingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroReadingPolicy::Floor => f.write_str("floor"),
            ZeroReadingPolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for ZeroReadingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(ZeroReadingPolicy::Floor),
            "reject" => Ok(ZeroReadingPolicy::Reject),
            other => Err(format!(
                "unknown zero reading policy '{other}' (expected 'floor' or 'reject')"
            )),
        }
    }
}

/// Computes `log10(previous / current)` for two WT1 expression percentages.
///
/// Inputs are not bounded to (0, 100]. A result is produced only when the
/// previous reading is a finite positive number and the current reading is
/// finite; how a current reading `<= 0` is handled depends on the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wt1Calculator {
    policy: ZeroReadingPolicy,
    floor_percent: f64,
}

impl Default for Wt1Calculator {
    fn default() -> Self {
        Self {
            policy: ZeroReadingPolicy::Floor,
            floor_percent: DEFAULT_ZERO_FLOOR_PERCENT,
        }
    }
}

impl Wt1Calculator {
    /// `floor_percent` is only consulted under [`ZeroReadingPolicy::Floor`]
    /// and must be finite and positive; anything else falls back to
    /// [`DEFAULT_ZERO_FLOOR_PERCENT`].
    pub fn new(policy: ZeroReadingPolicy, floor_percent: f64) -> Self {
        let floor_percent = if floor_percent.is_finite() && floor_percent > 0.0 {
            floor_percent
        } else {
            log::warn!(
                "ignoring WT1 floor {floor_percent}; using {DEFAULT_ZERO_FLOOR_PERCENT}"
            );
            DEFAULT_ZERO_FLOOR_PERCENT
        };
        Self {
            policy,
            floor_percent,
        }
    }

    pub fn rejecting_zero() -> Self {
        Self::new(ZeroReadingPolicy::Reject, DEFAULT_ZERO_FLOOR_PERCENT)
    }

    pub fn policy(&self) -> ZeroReadingPolicy {
        self.policy
    }

    pub fn floor_percent(&self) -> f64 {
        self.floor_percent
    }

    /// Log reduction from `previous` to `current`, or `None` when undetermined.
    pub fn log_reduction(&self, previous: Option<f64>, current: Option<f64>) -> Option<f64> {
        let (prev, curr) = match (previous, current) {
            (Some(p), Some(c)) if p.is_finite() && c.is_finite() => (p, c),
            _ => {
                log::debug!("WT1 reduction undetermined: missing or non-finite reading");
                return None;
            }
        };
        if prev <= 0.0 {
            log::debug!("WT1 reduction undetermined: previous reading {prev} <= 0");
            return None;
        }
        let effective = if curr > 0.0 {
            curr
        } else {
            match self.policy {
                ZeroReadingPolicy::Floor => {
                    log::debug!(
                        "WT1 current reading {curr} <= 0, flooring to {}",
                        self.floor_percent
                    );
                    self.floor_percent
                }
                ZeroReadingPolicy::Reject => {
                    log::debug!("WT1 reduction undetermined: current reading {curr} <= 0");
                    return None;
                }
            }
        };
        let delta = prev.log10() - effective.log10();
        delta.is_finite().then_some(delta)
    }

    /// Same as [`Wt1Calculator::log_reduction`] on raw form text.
    pub fn log_reduction_from_text(&self, previous: &str, current: &str) -> Option<f64> {
        self.log_reduction(parse_measurement(previous), parse_measurement(current))
    }
}

/// Log reduction under the default (flooring) calculator.
pub fn log_reduction(previous: f64, current: f64) -> Option<f64> {
    Wt1Calculator::default().log_reduction(Some(previous), Some(current))
}
