//! Daily tracker feeds consumed by the specialized assessors.

mod nutrition;
mod sleep;

pub use nutrition::{DailyIntake, Nutrient, NutritionLog};
pub use sleep::{SleepLog, SleepMetrics, SleepQuality, SleepRecord, SubjectiveQuality};
