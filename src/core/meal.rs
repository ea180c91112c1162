use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nutrients::Nutrients;

/// Portion label used when a manual entry leaves it blank
pub const DEFAULT_PORTION: &str = "Standard serving";

/// Rough estimate attached to manually logged meals
pub const MANUAL_ESTIMATE: Nutrients = Nutrients {
    calories: 150.0,
    carbs: 20.0,
    protein: 5.0,
    fiber: 2.0,
    fats: 5.0,
};

/// A single logged meal. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Time-ordered unique identifier (UUIDv7)
    pub id: String,

    /// Display time, e.g. "13:05"
    pub time: String,

    pub food: String,

    pub portion: String,

    pub is_junk: bool,

    pub is_home_cooked: bool,

    /// Absent only while an analysis is still in flight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<Nutrients>,

    /// Where the scanned photo came from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Meal {
    /// Manual entry from the add-meal form. Returns `None` for a blank food name.
    pub fn manual(
        food: &str,
        time: Option<&str>,
        portion: Option<&str>,
        is_junk: bool,
        is_home_cooked: bool,
    ) -> Option<Self> {
        let food = food.trim();
        if food.is_empty() {
            return None;
        }

        let time = non_blank(time).map(str::to_string).unwrap_or_else(current_time);
        let portion = non_blank(portion).unwrap_or(DEFAULT_PORTION);

        Some(Self {
            id: new_id(),
            time,
            food: food.to_string(),
            portion: portion.to_string(),
            is_junk,
            is_home_cooked,
            nutrients: Some(MANUAL_ESTIMATE),
            image_url: None,
        })
    }

    /// Meal identified from a photo
    pub fn scanned(food: String, time: String, nutrients: Nutrients, image_url: Option<String>) -> Self {
        Self {
            id: new_id(),
            time,
            food,
            portion: "Smart scan".to_string(),
            is_junk: false,
            is_home_cooked: true,
            nutrients: Some(nutrients),
            image_url,
        }
    }

    /// Blended drink completed from its ingredient list
    pub fn blended(pending: PendingDrink, nutrients: Nutrients) -> Self {
        Self {
            id: new_id(),
            time: pending.time,
            food: format!("{} (Custom Mix)", pending.food_name),
            portion: "Blended serving".to_string(),
            is_junk: false,
            is_home_cooked: true,
            nutrients: Some(nutrients),
            image_url: pending.image_url,
        }
    }

    /// "Cheat" or "Clean"
    pub fn kind_label(&self) -> &'static str {
        if self.is_junk {
            "Cheat"
        } else {
            "Clean"
        }
    }
}

/// A scanned drink waiting for its ingredients before it becomes a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDrink {
    pub food_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub time: String,
}

impl PendingDrink {
    pub fn new(food_name: String, image_url: Option<String>, time: String) -> Self {
        Self {
            food_name,
            image_url,
            time,
        }
    }
}

pub(crate) fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current local time as "HH:MM"
pub fn current_time() -> String {
    Local::now().format("%H:%M").to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_meal_defaults() {
        let meal = Meal::manual("Dal rice", None, None, false, true).unwrap();
        assert_eq!(meal.food, "Dal rice");
        assert_eq!(meal.portion, DEFAULT_PORTION);
        assert_eq!(meal.nutrients, Some(MANUAL_ESTIMATE));
        assert_eq!(meal.time.len(), 5);
        assert!(meal.image_url.is_none());
    }

    #[test]
    fn test_manual_meal_requires_food() {
        assert!(Meal::manual("", Some("09:00"), None, false, false).is_none());
        assert!(Meal::manual("   ", None, None, true, false).is_none());
    }

    #[test]
    fn test_manual_meal_keeps_given_fields() {
        let meal = Meal::manual("Samosa", Some("17:30"), Some("2 pieces"), true, false).unwrap();
        assert_eq!(meal.time, "17:30");
        assert_eq!(meal.portion, "2 pieces");
        assert!(meal.is_junk);
        assert_eq!(meal.kind_label(), "Cheat");
    }

    #[test]
    fn test_blended_meal_from_pending() {
        let pending = PendingDrink::new(
            "Green Smoothie".to_string(),
            Some("photo.jpg".to_string()),
            "08:15".to_string(),
        );
        let nutrients = Nutrients::new(180.0, 30.0, 4.0, 5.0, 2.0);
        let meal = Meal::blended(pending, nutrients);

        assert_eq!(meal.food, "Green Smoothie (Custom Mix)");
        assert_eq!(meal.portion, "Blended serving");
        assert_eq!(meal.time, "08:15");
        assert_eq!(meal.image_url.as_deref(), Some("photo.jpg"));
        assert_eq!(meal.kind_label(), "Clean");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Meal::scanned("A".to_string(), "10:00".to_string(), Nutrients::default(), None);
        let b = Meal::scanned("B".to_string(), "10:00".to_string(), Nutrients::default(), None);
        assert_ne!(a.id, b.id);
    }
}
