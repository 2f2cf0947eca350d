// Clinical cutoffs. The comparison operator of each rule is part of the cutoff.

pub use amlref_kinetics::{POST_CONSOLIDATION1_TARGET_LOG, POST_INDUCTION_TARGET_LOG};

/// Presenting WBC (×10⁹/L) above which a standard-risk patient moves to
/// intermediate risk. Strict: `wbc > 100`.
pub const INITIAL_WBC_LIMIT: f64 = 100.0;

/// Post-induction flow MRD (%) at or above which the patient is high risk.
/// Inclusive: `mrd >= 0.1`.
pub const POST_INDUCTION_MRD_LIMIT: f64 = 0.1;

/// Post-consolidation ① flow MRD (%) above which the patient is high risk.
/// Strict: any `mrd > 0`.
pub const POST_CONSOLIDATION1_MRD_LIMIT: f64 = 0.0;

pub fn wbc_escalates(wbc: f64) -> bool {
    wbc > INITIAL_WBC_LIMIT
}

pub fn post_induction_mrd_breached(mrd: f64) -> bool {
    mrd >= POST_INDUCTION_MRD_LIMIT
}

pub fn post_induction_wt1_breached(log_reduction: f64) -> bool {
    log_reduction < POST_INDUCTION_TARGET_LOG
}

pub fn post_consolidation1_mrd_breached(mrd: f64) -> bool {
    mrd > POST_CONSOLIDATION1_MRD_LIMIT
}

pub fn post_consolidation1_wt1_breached(log_reduction: f64) -> bool {
    log_reduction < POST_CONSOLIDATION1_TARGET_LOG
}
