// Assessment input: one payload shape per treatment stage

use amlref_types::{RiskLevel, TreatmentStage};
use serde::{Deserialize, Serialize};

/// WT1 response as it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wt1Response {
    /// A log reduction entered directly.
    LogReduction(f64),
    /// Expression percentages; the reduction is computed from them.
    Transcripts {
        previous: Option<f64>,
        current: Option<f64>,
    },
}

/// Response measurements taken after a treatment course. `None` means not measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeasurements {
    pub mrd_percent: Option<f64>,
    pub wt1: Option<Wt1Response>,
}

impl ResponseMeasurements {
    pub fn new(mrd_percent: Option<f64>, wt1: Option<Wt1Response>) -> Self {
        Self { mrd_percent, wt1 }
    }

    pub fn with_wt1_log(mrd_percent: Option<f64>, wt1_log_reduction: Option<f64>) -> Self {
        Self {
            mrd_percent,
            wt1: wt1_log_reduction.map(Wt1Response::LogReduction),
        }
    }

    pub fn with_transcripts(
        mrd_percent: Option<f64>,
        previous: Option<f64>,
        current: Option<f64>,
    ) -> Self {
        Self {
            mrd_percent,
            wt1: Some(Wt1Response::Transcripts { previous, current }),
        }
    }
}

/// Stage-specific data. Only the fields that the stage's rule reads exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageAssessment {
    Initial {
        /// Presenting white cell count, ×10⁹/L.
        wbc: Option<f64>,
    },
    PostInduction {
        complete_remission: bool,
        #[serde(flatten)]
        response: ResponseMeasurements,
    },
    PostConsolidation1 {
        #[serde(flatten)]
        response: ResponseMeasurements,
    },
}

impl StageAssessment {
    pub fn stage(&self) -> TreatmentStage {
        match self {
            StageAssessment::Initial { .. } => TreatmentStage::Initial,
            StageAssessment::PostInduction { .. } => TreatmentStage::PostInduction,
            StageAssessment::PostConsolidation1 { .. } => TreatmentStage::PostConsolidation1,
        }
    }
}

/// Everything one classification run needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    /// Tier of the selected genetic abnormality.
    pub baseline: RiskLevel,
    #[serde(flatten)]
    pub stage: StageAssessment,
}

impl AssessmentInput {
    pub fn initial(baseline: RiskLevel, wbc: Option<f64>) -> Self {
        Self {
            baseline,
            stage: StageAssessment::Initial { wbc },
        }
    }

    pub fn post_induction(
        baseline: RiskLevel,
        complete_remission: bool,
        response: ResponseMeasurements,
    ) -> Self {
        Self {
            baseline,
            stage: StageAssessment::PostInduction {
                complete_remission,
                response,
            },
        }
    }

    pub fn post_consolidation1(baseline: RiskLevel, response: ResponseMeasurements) -> Self {
        Self {
            baseline,
            stage: StageAssessment::PostConsolidation1 { response },
        }
    }
}
