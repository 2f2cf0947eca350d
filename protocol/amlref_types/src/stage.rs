use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::level::ParseLabelError;

/// Point in care at which an assessment is made.
///
/// A branch selector only: nothing enforces that stages are visited in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentStage {
    Initial,
    PostInduction,
    PostConsolidation1,
}

impl TreatmentStage {
    pub const ALL: [TreatmentStage; 3] = [
        TreatmentStage::Initial,
        TreatmentStage::PostInduction,
        TreatmentStage::PostConsolidation1,
    ];

    /// Short name used on the command line and in the form.
    pub const fn code(self) -> &'static str {
        match self {
            TreatmentStage::Initial => "initial",
            TreatmentStage::PostInduction => "induction",
            TreatmentStage::PostConsolidation1 => "consolidation1",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TreatmentStage::Initial => "初诊",
            TreatmentStage::PostInduction => "诱导后",
            TreatmentStage::PostConsolidation1 => "巩固①后",
        }
    }

    /// Whether response measurements (CR, MRD, WT1) apply at this stage.
    pub const fn is_response_stage(self) -> bool {
        !matches!(self, TreatmentStage::Initial)
    }
}

impl fmt::Display for TreatmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TreatmentStage {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let stage = match t.as_str() {
            "initial" | "diagnosis" => TreatmentStage::Initial,
            "induction" | "post-induction" | "post_induction" => TreatmentStage::PostInduction,
            "consolidation1" | "post-consolidation1" | "post_consolidation1" => {
                TreatmentStage::PostConsolidation1
            }
            _ => {
                return TreatmentStage::ALL
                    .into_iter()
                    .find(|st| s.trim() == st.label())
                    .ok_or_else(|| ParseLabelError {
                        kind: "treatment stage",
                        input: s.to_string(),
                    })
            }
        };
        Ok(stage)
    }
}
