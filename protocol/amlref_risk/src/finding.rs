use amlref_types::{RiskLevel, TreatmentStage};
use serde::Serialize;

/// A measurement the rules may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    Wbc,
    Mrd,
    Wt1,
}

impl Measurement {
    pub const fn label(self) -> &'static str {
        match self {
            Measurement::Wbc => "WBC",
            Measurement::Mrd => "MRD",
            Measurement::Wt1 => "WT1",
        }
    }
}

/// The condition that decided a classification.
///
/// Stable across wording changes of the reason text, so callers and tests
/// can rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFinding {
    /// Tier follows the genetic baseline alone.
    BaselineGenetics,
    /// Standard-risk genetics with presenting WBC above the limit.
    HighPresentingWbc,
    /// Bone marrow not in complete remission after induction.
    NoCompleteRemission,
    /// MRD and/or WT1 kinetics missed the stage target.
    InadequateResponse { mrd_breached: bool, wt1_breached: bool },
    /// A measurement the rule needs was not supplied; nothing was escalated.
    InsufficientData { missing: Vec<Measurement> },
    /// Every stage target was met.
    TargetsMet,
}

impl RiskFinding {
    /// Whether this finding raised the tier above the baseline.
    pub fn escalates(&self) -> bool {
        matches!(
            self,
            RiskFinding::HighPresentingWbc
                | RiskFinding::NoCompleteRemission
                | RiskFinding::InadequateResponse { .. }
        )
    }

    /// Protocol wording for this finding.
    pub fn reason(&self, stage: TreatmentStage, baseline: RiskLevel) -> String {
        match self {
            RiskFinding::BaselineGenetics if baseline == RiskLevel::Low => {
                "初诊标危基因且 WBC ≤ 100×10⁹/L。".to_string()
            }
            RiskFinding::BaselineGenetics => format!("基于初始遗传学分类：{baseline}。"),
            RiskFinding::HighPresentingWbc => {
                "初诊标危基因但 WBC > 100×10⁹/L，上调至中危。".to_string()
            }
            RiskFinding::NoCompleteRemission => "诱导后骨髓未达 CR，直接判定为高危。".to_string(),
            RiskFinding::InadequateResponse {
                mrd_breached,
                wt1_breached,
            } => inadequate_response_reason(stage, *mrd_breached, *wt1_breached),
            RiskFinding::InsufficientData { missing } => {
                let names: Vec<&str> = missing.iter().map(|m| m.label()).collect();
                format!(
                    "{stage}评估未录入 {}，数据不足不作升级，维持{baseline}。",
                    names.join("、")
                )
            }
            RiskFinding::TargetsMet => match stage {
                TreatmentStage::PostConsolidation1 => {
                    "巩固①后评估达标，维持当前治疗方案。".to_string()
                }
                _ => "诱导后达 CR 且 MRD/WT1 动力学达标，维持原分层。".to_string(),
            },
        }
    }
}

fn inadequate_response_reason(stage: TreatmentStage, mrd: bool, wt1: bool) -> String {
    match stage {
        TreatmentStage::PostConsolidation1 => {
            let detail = match (mrd, wt1) {
                (true, true) => "MRD 持续阳性且 WT1 下降不足 (目标 2log)",
                (true, false) => "MRD 持续阳性",
                _ => "WT1 下降不足 (目标 2log)",
            };
            format!("巩固①后{detail}，最终判定为高危。")
        }
        _ => {
            let detail = match (mrd, wt1) {
                (true, true) => "MRD ≥ 0.1% 且 WT1 下降 < 1log",
                (true, false) => "MRD ≥ 0.1%",
                _ => "WT1 下降 < 1log",
            };
            format!("MRD 缓解深度不足 ({detail})，转为高危。")
        }
    }
}
