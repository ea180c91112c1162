pub mod daily_log;
pub mod error;
pub mod feedback;
pub mod meal;
pub mod nutrients;
pub mod profile;
pub mod store;

pub use daily_log::DailyLog;
pub use error::{JournalError, Result};
pub use feedback::{parse_feedback_sections, BodyLine, FeedbackSection, SectionKind, VitalScore};
pub use meal::{Meal, PendingDrink};
pub use nutrients::{
    compute_calorie_percentage, compute_weekly_averages, progress, sum_daily_nutrients,
    AverageNutrients, NutrientProgress, NutrientTargets, Nutrients,
};
pub use profile::{ActivityLevel, ProfilePatch, UserProfile};
pub use store::{JournalStore, StoreKey, Theme, TodayState, HISTORY_LIMIT};
