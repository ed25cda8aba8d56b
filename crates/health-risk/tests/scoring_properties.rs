use health_risk::assessment::{
    score_factors, FactorKind, FactorSet, FactorValue, RiskModel, ScoreScale, SleepWindowMetrics,
    SLEEP_SCALE,
};
use health_risk::profile::{ActivityLevel, DietQuality, Gender};
use proptest::prelude::*;

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Male),
        Just(Gender::Female),
        Just(Gender::Unknown)
    ]
}

fn activity() -> impl Strategy<Value = ActivityLevel> {
    prop_oneof![
        Just(ActivityLevel::Sedentary),
        Just(ActivityLevel::Light),
        Just(ActivityLevel::Moderate),
        Just(ActivityLevel::Active),
        Just(ActivityLevel::VeryActive),
    ]
}

fn diet() -> impl Strategy<Value = DietQuality> {
    prop_oneof![
        Just(DietQuality::Poor),
        Just(DietQuality::Moderate),
        Just(DietQuality::Good)
    ]
}

prop_compose! {
    fn factor_set()(
        age in 0u32..110,
        gender in gender(),
        bmi in 10.0f64..60.0,
        systolic in 80.0f64..220.0,
        diastolic in 50.0f64..130.0,
        glucose in 3.0f64..15.0,
        total in 100.0f64..350.0,
        hdl in 20.0f64..100.0,
        activity in activity(),
        diet in diet(),
        (family, smoking, diabetes) in (any::<bool>(), any::<bool>(), any::<bool>()),
    ) -> FactorSet {
        FactorSet::new()
            .with(FactorKind::Age, FactorValue::Integer(age))
            .with(FactorKind::Gender, FactorValue::Gender(gender))
            .with(FactorKind::Bmi, FactorValue::Decimal(bmi))
            .with(FactorKind::SystolicBp, FactorValue::Decimal(systolic))
            .with(FactorKind::DiastolicBp, FactorValue::Decimal(diastolic))
            .with(FactorKind::FastingGlucose, FactorValue::Decimal(glucose))
            .with(FactorKind::TotalCholesterol, FactorValue::Decimal(total))
            .with(FactorKind::HdlCholesterol, FactorValue::Decimal(hdl))
            .with(FactorKind::FamilyHistory, FactorValue::Flag(family))
            .with(FactorKind::Smoking, FactorValue::Flag(smoking))
            .with(FactorKind::ActivityLevel, FactorValue::Activity(activity))
            .with(FactorKind::DietQuality, FactorValue::Diet(diet))
            .with(FactorKind::Diabetes, FactorValue::Flag(diabetes))
    }
}

fn assert_bounded(scale: &ScoreScale, score: u32) {
    let probability = scale.probability(score);
    assert!(score <= scale.max_score);
    assert!((0.0..=scale.cap).contains(&probability));
}

proptest! {
    #[test]
    fn scores_and_probabilities_stay_in_range(factors in factor_set()) {
        for model in RiskModel::all() {
            let breakdown = score_factors(model.rules, &factors);
            assert_bounded(&model.scale, breakdown.total);
            prop_assert_eq!(
                breakdown.total,
                breakdown.components.iter().map(|component| component.points).sum::<u32>()
            );
        }
    }

    #[test]
    fn raising_a_measurement_never_lowers_the_score(
        factors in factor_set(),
        bump in 0.0f64..80.0,
    ) {
        for kind in [
            FactorKind::Bmi,
            FactorKind::SystolicBp,
            FactorKind::FastingGlucose,
            FactorKind::TotalCholesterol,
        ] {
            let current = factors.get(kind).and_then(FactorValue::as_number).unwrap_or(0.0);
            let raised = factors.clone().with(kind, FactorValue::Decimal(current + bump));
            for model in RiskModel::all() {
                prop_assert!(
                    score_factors(model.rules, &raised).total
                        >= score_factors(model.rules, &factors).total
                );
            }
        }
    }

    #[test]
    fn getting_older_never_lowers_the_score(factors in factor_set(), years in 0u32..30) {
        let age = factors.get(FactorKind::Age).and_then(FactorValue::as_number).unwrap_or(0.0);
        let older = factors
            .clone()
            .with(FactorKind::Age, FactorValue::Integer(age as u32 + years));
        for model in RiskModel::all() {
            prop_assert!(
                score_factors(model.rules, &older).total
                    >= score_factors(model.rules, &factors).total
            );
        }
    }

    #[test]
    fn tier_is_monotone_in_probability(low in 0.0f64..1.0, high in 0.0f64..1.0) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        for model in RiskModel::all() {
            let breakpoints = model.scale.breakpoints;
            prop_assert!(breakpoints.classify(low) <= breakpoints.classify(high));
        }
    }

    #[test]
    fn sleep_score_is_bounded(poor in 0usize..8, short in 0usize..8, low in 0usize..8) {
        let score = SleepWindowMetrics {
            poor_sleep_days: poor,
            short_sleep_days: short,
            low_efficiency_days: low,
        }
        .score();
        assert_bounded(&SLEEP_SCALE, score);
    }
}
