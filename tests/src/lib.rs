//! Shared fixtures for the cross-crate tests.

use amlref_risk::{AssessmentInput, ResponseMeasurements};
use amlref_tables::resolve_abnormality;
use amlref_types::{parse_measurement, RiskLevel};

/// Baseline tier of a gene query, resolved the way the CLI and form do it.
pub fn baseline_of(query: &str) -> RiskLevel {
    match resolve_abnormality(query) {
        Ok(row) => row.category,
        Err(e) => panic!("fixture gene '{query}' did not resolve: {e}"),
    }
}

/// Post-induction input from form text, with CR achieved.
pub fn induction_from_text(gene: &str, mrd: &str, wt1_log: &str) -> AssessmentInput {
    AssessmentInput::post_induction(
        baseline_of(gene),
        true,
        ResponseMeasurements::with_wt1_log(parse_measurement(mrd), parse_measurement(wt1_log)),
    )
}

/// Post-consolidation ① input from form text.
pub fn consolidation_from_text(gene: &str, mrd: &str, wt1_log: &str) -> AssessmentInput {
    AssessmentInput::post_consolidation1(
        baseline_of(gene),
        ResponseMeasurements::with_wt1_log(parse_measurement(mrd), parse_measurement(wt1_log)),
    )
}
