use amlref_kinetics::Wt1Calculator;
use amlref_types::{RiskLevel, TreatmentStage};
use serde::Serialize;

use crate::finding::{Measurement, RiskFinding};
use crate::input::{AssessmentInput, ResponseMeasurements, StageAssessment, Wt1Response};
use crate::thresholds;

/// Outcome of one classification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub level: RiskLevel,
    pub reason: String,
    pub finding: RiskFinding,
    pub baseline: RiskLevel,
    pub stage: TreatmentStage,
    /// WT1 log reduction the rule actually compared, if one was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wt1_log_reduction: Option<f64>,
}

/// Applies the stratification rules.
///
/// The only configuration is how a WT1 transcript pair is reduced to a log
/// value; the cutoffs themselves are fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskClassifier {
    wt1: Wt1Calculator,
}

impl RiskClassifier {
    pub fn new(wt1: Wt1Calculator) -> Self {
        Self { wt1 }
    }

    pub fn wt1_calculator(&self) -> &Wt1Calculator {
        &self.wt1
    }

    pub fn classify(&self, input: &AssessmentInput) -> ClassificationResult {
        let baseline = input.baseline;
        let stage = input.stage.stage();
        let (level, finding, wt1_log_reduction) = match &input.stage {
            StageAssessment::Initial { wbc } => {
                let (level, finding) = classify_initial(baseline, *wbc);
                (level, finding, None)
            }
            StageAssessment::PostInduction {
                complete_remission: false,
                response,
            } => {
                log::debug!("post-induction: no CR, escalating to high risk");
                (
                    RiskLevel::High,
                    RiskFinding::NoCompleteRemission,
                    self.effective_wt1(response),
                )
            }
            StageAssessment::PostInduction {
                complete_remission: true,
                response,
            } => self.classify_response(
                baseline,
                response,
                thresholds::post_induction_mrd_breached,
                thresholds::post_induction_wt1_breached,
            ),
            StageAssessment::PostConsolidation1 { response } => self.classify_response(
                baseline,
                response,
                thresholds::post_consolidation1_mrd_breached,
                thresholds::post_consolidation1_wt1_breached,
            ),
        };

        ClassificationResult {
            level,
            reason: finding.reason(stage, baseline),
            finding,
            baseline,
            stage,
            wt1_log_reduction,
        }
    }

    /// The WT1 log reduction the rules see, or `None` when undetermined.
    pub fn effective_wt1(&self, response: &ResponseMeasurements) -> Option<f64> {
        match response.wt1? {
            Wt1Response::LogReduction(v) => v.is_finite().then_some(v),
            Wt1Response::Transcripts { previous, current } => {
                self.wt1.log_reduction(previous, current)
            }
        }
    }

    fn classify_response(
        &self,
        baseline: RiskLevel,
        response: &ResponseMeasurements,
        mrd_breached: fn(f64) -> bool,
        wt1_breached: fn(f64) -> bool,
    ) -> (RiskLevel, RiskFinding, Option<f64>) {
        let mrd = response.mrd_percent.filter(|v| v.is_finite());
        let wt1 = self.effective_wt1(response);

        let mrd_hit = mrd.is_some_and(mrd_breached);
        let wt1_hit = wt1.is_some_and(wt1_breached);
        log::debug!("response check: mrd={mrd:?} breached={mrd_hit} wt1={wt1:?} breached={wt1_hit}");

        if mrd_hit || wt1_hit {
            let finding = RiskFinding::InadequateResponse {
                mrd_breached: mrd_hit,
                wt1_breached: wt1_hit,
            };
            return (RiskLevel::High, finding, wt1);
        }

        let mut missing = Vec::new();
        if mrd.is_none() {
            missing.push(Measurement::Mrd);
        }
        if wt1.is_none() {
            missing.push(Measurement::Wt1);
        }
        let finding = if missing.is_empty() {
            RiskFinding::TargetsMet
        } else {
            RiskFinding::InsufficientData { missing }
        };
        (baseline, finding, wt1)
    }
}

fn classify_initial(baseline: RiskLevel, wbc: Option<f64>) -> (RiskLevel, RiskFinding) {
    if baseline != RiskLevel::Low {
        return (baseline, RiskFinding::BaselineGenetics);
    }
    match wbc.filter(|v| v.is_finite()) {
        Some(w) if thresholds::wbc_escalates(w) => {
            log::debug!("initial: standard-risk genetics with WBC {w}, escalating to medium");
            (RiskLevel::Medium, RiskFinding::HighPresentingWbc)
        }
        Some(_) => (baseline, RiskFinding::BaselineGenetics),
        None => (
            baseline,
            RiskFinding::InsufficientData {
                missing: vec![Measurement::Wbc],
            },
        ),
    }
}

/// Classify with the default calculator (zero WT1 readings are floored).
pub fn classify(input: &AssessmentInput) -> ClassificationResult {
    RiskClassifier::default().classify(input)
}
