// Interpretation of a WT1 log reduction against the protocol targets

use amlref_types::TreatmentStage;
use serde::Serialize;

/// Minimum reduction (log10) after induction.
pub const POST_INDUCTION_TARGET_LOG: f64 = 1.0;
/// Minimum reduction (log10) after the first consolidation course.
pub const POST_CONSOLIDATION1_TARGET_LOG: f64 = 2.0;

/// WT1 reduction target for a stage. There is none at diagnosis.
pub fn wt1_target_log(stage: TreatmentStage) -> Option<f64> {
    match stage {
        TreatmentStage::Initial => None,
        TreatmentStage::PostInduction => Some(POST_INDUCTION_TARGET_LOG),
        TreatmentStage::PostConsolidation1 => Some(POST_CONSOLIDATION1_TARGET_LOG),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KineticsVerdict {
    /// No reduction could be computed yet.
    Pending,
    OnTarget,
    BelowTarget,
}

impl KineticsVerdict {
    /// `reduction` meets the target when it is at least `target_log`.
    pub fn assess(reduction: Option<f64>, target_log: f64) -> Self {
        match reduction {
            None => KineticsVerdict::Pending,
            Some(v) if v >= target_log => KineticsVerdict::OnTarget,
            Some(_) => KineticsVerdict::BelowTarget,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            KineticsVerdict::Pending => "等待数据录入...",
            KineticsVerdict::OnTarget => "动力学达标",
            KineticsVerdict::BelowTarget => "动力学不佳",
        }
    }
}
