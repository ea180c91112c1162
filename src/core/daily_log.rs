use serde::{Deserialize, Serialize};

use super::meal::{new_id, Meal};
use super::nutrients::{sum_daily_nutrients, Nutrients};
use super::profile::UserProfile;

/// One calendar day's committed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: String,

    /// Display label of the day, e.g. "Saturday, 17 October". At most one log per label.
    pub date: String,

    pub meals: Vec<Meal>,

    pub water_ml: u32,

    /// Profile as it was when the day was analyzed
    pub profile_snapshot: UserProfile,

    /// Raw coach text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Frozen at commit time, never recomputed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_nutrients: Option<Nutrients>,
}

impl DailyLog {
    /// Bare log without totals or analysis
    pub fn new(date: String, meals: Vec<Meal>, water_ml: u32, profile_snapshot: UserProfile) -> Self {
        Self {
            id: new_id(),
            date,
            meals,
            water_ml,
            profile_snapshot,
            analysis: None,
            total_nutrients: None,
        }
    }

    /// Snapshot of the day with its totals aggregated from `meals`
    pub fn snapshot(date: String, meals: Vec<Meal>, water_ml: u32, profile: &UserProfile) -> Self {
        let totals = sum_daily_nutrients(&meals);
        let mut log = Self::new(date, meals, water_ml, profile.clone());
        log.total_nutrients = Some(totals);
        log
    }

    pub fn junk_meal_count(&self) -> usize {
        self.meals.iter().filter(|m| m.is_junk).count()
    }
}
