use amlref_kinetics::Wt1Calculator;
use amlref_risk::{
    classify, AssessmentInput, Measurement, ResponseMeasurements, RiskClassifier, RiskFinding,
};
use amlref_types::RiskLevel;
use proptest::prelude::*;

fn level_strategy() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High),
    ]
}

fn optional(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), range.prop_map(Some)]
}

#[test]
fn post_induction_walkthrough() {
    let _ = env_logger::builder().is_test(true).try_init();

    let baseline = RiskLevel::Low;
    let cases = [
        (Some(0.05), Some(1.5), RiskLevel::Low),
        (Some(0.1), Some(1.5), RiskLevel::High),
        (Some(0.05), Some(0.99), RiskLevel::High),
        (Some(0.2), None, RiskLevel::High),
    ];
    for (mrd, wt1, expected) in cases {
        let input = AssessmentInput::post_induction(
            baseline,
            true,
            ResponseMeasurements::with_wt1_log(mrd, wt1),
        );
        assert_eq!(classify(&input).level, expected, "mrd={mrd:?} wt1={wt1:?}");
    }
}

#[test]
fn consolidation_without_any_measurement_reports_both_missing() {
    let input = AssessmentInput::post_consolidation1(RiskLevel::High, ResponseMeasurements::default());
    let r = classify(&input);
    assert_eq!(r.level, RiskLevel::High);
    assert_eq!(
        r.finding,
        RiskFinding::InsufficientData {
            missing: vec![Measurement::Mrd, Measurement::Wt1]
        }
    );
}

proptest! {
    #[test]
    fn classification_is_idempotent(
        baseline in level_strategy(),
        cr in any::<bool>(),
        mrd in optional(0.0..5.0),
        wt1 in optional(-1.0..6.0),
    ) {
        let input = AssessmentInput::post_induction(
            baseline,
            cr,
            ResponseMeasurements::with_wt1_log(mrd, wt1),
        );
        let classifier = RiskClassifier::new(Wt1Calculator::default());
        prop_assert_eq!(classifier.classify(&input), classifier.classify(&input));
    }

    #[test]
    fn result_never_drops_below_baseline(
        baseline in level_strategy(),
        mrd in optional(0.0..5.0),
        wt1 in optional(-1.0..6.0),
        wbc in optional(0.0..400.0),
    ) {
        let response = ResponseMeasurements::with_wt1_log(mrd, wt1);
        for input in [
            AssessmentInput::initial(baseline, wbc),
            AssessmentInput::post_induction(baseline, true, response),
            AssessmentInput::post_consolidation1(baseline, response),
        ] {
            let r = classify(&input);
            prop_assert!(r.level >= baseline);
            if r.level > baseline {
                prop_assert!(r.finding.escalates());
            }
            if !r.finding.escalates() {
                prop_assert_eq!(r.level, baseline);
            }
        }
    }

    #[test]
    fn lower_wt1_reduction_never_lowers_the_tier(
        baseline in level_strategy(),
        cr in any::<bool>(),
        mrd in optional(0.0..1.0),
        high in 0.0f64..6.0,
        drop in 0.0f64..6.0,
    ) {
        let low = high - drop;
        let at = |wt1: f64| {
            let response = ResponseMeasurements::with_wt1_log(mrd, Some(wt1));
            (
                classify(&AssessmentInput::post_induction(baseline, cr, response)).level,
                classify(&AssessmentInput::post_consolidation1(baseline, response)).level,
            )
        };
        let (ind_high, con_high) = at(high);
        let (ind_low, con_low) = at(low);
        prop_assert!(ind_low >= ind_high);
        prop_assert!(con_low >= con_high);
    }
}
