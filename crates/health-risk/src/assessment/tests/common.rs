use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::assessment::AssessmentContext;
use crate::profile::{
    ActivityLevel, BasicInfo, CalculatedMetrics, DietQuality, Gender, Lifestyle, Observations,
    Profile,
};
use crate::tracking::{
    DailyIntake, NutritionLog, SleepLog, SleepMetrics, SleepQuality, SleepRecord,
    SubjectiveQuality,
};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn profile(birth_date: &str, gender: Gender, bmi: Option<f64>) -> Profile {
    Profile {
        basic_info: BasicInfo {
            birth_date: Some(birth_date.to_string()),
            gender,
        },
        calculated: CalculatedMetrics { bmi },
        ..Profile::default()
    }
}

/// Age 70, BMI 32, systolic 145, family history, smoker, sedentary.
pub(super) fn hypertensive_context() -> AssessmentContext {
    let mut profile = profile("1955-01-01", Gender::Male, Some(32.0));
    profile
        .family_history
        .insert("hypertension".to_string(), true);
    profile.lifestyle = Lifestyle {
        activity_level: Some(ActivityLevel::Sedentary),
        smoking: true,
    };

    AssessmentContext::new(as_of())
        .with_profile(profile)
        .with_observations(Observations {
            systolic_bp: Some(145.0),
            ..Observations::default()
        })
}

/// Age 55, BMI 28, fasting glucose 6.0, moderate activity and diet.
pub(super) fn prediabetic_context() -> AssessmentContext {
    let mut profile = profile("1970-01-01", Gender::Female, Some(28.0));
    profile.lifestyle.activity_level = Some(ActivityLevel::Moderate);

    AssessmentContext::new(as_of())
        .with_profile(profile)
        .with_observations(Observations {
            fasting_glucose: Some(6.0),
            diet_quality: Some(DietQuality::Moderate),
            ..Observations::default()
        })
}

/// Male born 1975, no other risk markers.
pub(super) fn cardiovascular_context(observations: Observations) -> AssessmentContext {
    AssessmentContext::new(as_of())
        .with_profile(profile("1975-01-01", Gender::Male, Some(23.0)))
        .with_observations(observations)
}

pub(super) fn night(quality: SubjectiveQuality, hours: f64, efficiency: f64) -> SleepRecord {
    SleepRecord {
        date: None,
        sleep_quality: SleepQuality {
            subjective_quality: quality,
        },
        sleep_metrics: SleepMetrics {
            sleep_duration_hours: hours,
            sleep_efficiency: efficiency,
        },
    }
}

pub(super) fn sleep_log(records: Vec<SleepRecord>) -> SleepLog {
    SleepLog {
        sleep_records: records,
    }
}

/// Four poor nights, five short nights, four low-efficiency nights.
pub(super) fn restless_week() -> SleepLog {
    sleep_log(vec![
        night(SubjectiveQuality::Poor, 5.0, 80.0),
        night(SubjectiveQuality::VeryPoor, 5.5, 82.0),
        night(SubjectiveQuality::Poor, 4.5, 70.0),
        night(SubjectiveQuality::Poor, 5.0, 84.0),
        night(SubjectiveQuality::Good, 5.8, 90.0),
        night(SubjectiveQuality::Fair, 7.0, 92.0),
        night(SubjectiveQuality::Excellent, 8.0, 95.0),
    ])
}

pub(super) fn intake(ratios: &[(&str, f64)]) -> DailyIntake {
    DailyIntake {
        date: None,
        rda_achievement: ratios
            .iter()
            .map(|(key, ratio)| (key.to_string(), *ratio))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(super) fn nutrition_log(records: Vec<DailyIntake>) -> NutritionLog {
    NutritionLog {
        daily_records: records,
    }
}

pub(super) fn female_context() -> AssessmentContext {
    AssessmentContext::new(as_of()).with_profile(profile("1990-05-01", Gender::Female, None))
}
