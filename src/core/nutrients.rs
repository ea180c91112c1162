use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::daily_log::DailyLog;
use super::meal::Meal;

/// Calorie and macro quantities for a meal or a whole day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    /// Energy in kcal
    pub calories: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Protein in grams
    pub protein: f64,
    /// Dietary fiber in grams
    pub fiber: f64,
    /// Fats in grams
    pub fats: f64,
}

/// Per-day averages over a run of daily logs
pub type AverageNutrients = Nutrients;

impl Nutrients {
    pub fn new(calories: f64, carbs: f64, protein: f64, fiber: f64, fats: f64) -> Self {
        Self {
            calories,
            carbs,
            protein,
            fiber,
            fats,
        }
    }

    /// Divide every field by `count`
    fn divided_by(self, count: f64) -> Self {
        Self {
            calories: self.calories / count,
            carbs: self.carbs / count,
            protein: self.protein / count,
            fiber: self.fiber / count,
            fats: self.fats / count,
        }
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Nutrients) -> Nutrients {
        Nutrients {
            calories: self.calories + rhs.calories,
            carbs: self.carbs + rhs.carbs,
            protein: self.protein + rhs.protein,
            fiber: self.fiber + rhs.fiber,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for Nutrients {
    fn add_assign(&mut self, rhs: Nutrients) {
        *self = *self + rhs;
    }
}

impl Sum for Nutrients {
    fn sum<I: Iterator<Item = Nutrients>>(iter: I) -> Nutrients {
        iter.fold(Nutrients::default(), Add::add)
    }
}

impl<'a> Sum<&'a Nutrients> for Nutrients {
    fn sum<I: Iterator<Item = &'a Nutrients>>(iter: I) -> Nutrients {
        iter.copied().sum()
    }
}

/// Sum nutrients across a day's meals.
///
/// Meals whose nutrients are still unknown (an image being analyzed)
/// contribute nothing.
pub fn sum_daily_nutrients(meals: &[Meal]) -> Nutrients {
    meals.iter().filter_map(|m| m.nutrients.as_ref()).sum()
}

/// Average the frozen daily totals over `logs`.
///
/// A log without totals still counts in the denominator and contributes
/// zero to every field. Returns `None` for an empty slice.
pub fn compute_weekly_averages(logs: &[DailyLog]) -> Option<AverageNutrients> {
    if logs.is_empty() {
        return None;
    }

    let sums: Nutrients = logs
        .iter()
        .map(|log| log.total_nutrients.unwrap_or_default())
        .sum();

    Some(sums.divided_by(logs.len() as f64))
}

/// Share of `target` reached by `total`, clamped to 0..=100.
pub fn compute_calorie_percentage(total: f64, target: f64) -> f64 {
    let pct = if target > 0.0 { total / target * 100.0 } else { 0.0 };
    pct.clamp(0.0, 100.0)
}

/// Daily goals the totals are measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientTargets {
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for NutrientTargets {
    fn default() -> Self {
        Self {
            calories: 2200.0,
            protein: 120.0,
            fiber: 30.0,
            carbs: 250.0,
            fats: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientProgress {
    pub label: &'static str,
    pub value: f64,
    pub target: f64,
    pub unit: &'static str,
    pub percentage: f64,
}

/// Macro progress rows in display order: protein, fiber, carbs, fats.
pub fn progress(totals: &Nutrients, targets: &NutrientTargets) -> Vec<NutrientProgress> {
    [
        ("Protein", totals.protein, targets.protein),
        ("Fiber", totals.fiber, targets.fiber),
        ("Carbs", totals.carbs, targets.carbs),
        ("Fats", totals.fats, targets.fats),
    ]
    .into_iter()
    .map(|(label, value, target)| NutrientProgress {
        label,
        value,
        target,
        unit: "g",
        percentage: compute_calorie_percentage(value, target),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::UserProfile;

    fn meal_with(nutrients: Option<Nutrients>) -> Meal {
        let mut meal = Meal::scanned("Test".to_string(), "08:00".to_string(), Nutrients::default(), None);
        meal.nutrients = nutrients;
        meal
    }

    fn log_with(total: Option<Nutrients>) -> DailyLog {
        let mut log = DailyLog::new(
            "Saturday, 17 October".to_string(),
            Vec::new(),
            0,
            UserProfile::default(),
        );
        log.total_nutrients = total;
        log
    }

    #[test]
    fn test_sum_of_no_meals_is_zero() {
        assert_eq!(sum_daily_nutrients(&[]), Nutrients::default());
    }

    #[test]
    fn test_sum_skips_meals_without_nutrients() {
        let meals = vec![
            meal_with(Some(Nutrients::new(300.0, 40.0, 10.0, 3.0, 8.0))),
            meal_with(None),
            meal_with(Some(Nutrients::new(200.0, 10.0, 20.0, 1.0, 5.0))),
        ];

        let total = sum_daily_nutrients(&meals);
        assert_eq!(total, Nutrients::new(500.0, 50.0, 30.0, 4.0, 13.0));
    }

    #[test]
    fn test_sum_is_order_independent() {
        let a = meal_with(Some(Nutrients::new(120.0, 15.0, 3.0, 2.0, 4.0)));
        let b = meal_with(Some(Nutrients::new(450.0, 60.0, 25.0, 6.0, 12.0)));
        let c = meal_with(None);

        let forward = sum_daily_nutrients(&[a.clone(), b.clone(), c.clone()]);
        let backward = sum_daily_nutrients(&[c, b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_weekly_averages_empty_is_none() {
        assert!(compute_weekly_averages(&[]).is_none());
    }

    #[test]
    fn test_weekly_averages() {
        let logs = vec![
            log_with(Some(Nutrients::new(2000.0, 250.0, 100.0, 30.0, 60.0))),
            log_with(Some(Nutrients::new(1800.0, 210.0, 80.0, 20.0, 70.0))),
        ];

        let avg = compute_weekly_averages(&logs).unwrap();
        assert_eq!(avg.calories, 1900.0);
        assert_eq!(avg.carbs, 230.0);
        assert_eq!(avg.protein, 90.0);
        assert_eq!(avg.fiber, 25.0);
        assert_eq!(avg.fats, 65.0);
    }

    #[test]
    fn test_weekly_averages_count_missing_totals_as_zero() {
        let logs = vec![
            log_with(Some(Nutrients::new(2000.0, 0.0, 0.0, 0.0, 0.0))),
            log_with(None),
        ];

        let avg = compute_weekly_averages(&logs).unwrap();
        assert_eq!(avg.calories, 1000.0);
    }

    #[test]
    fn test_calorie_percentage() {
        assert_eq!(compute_calorie_percentage(1100.0, 2200.0), 50.0);
        assert_eq!(compute_calorie_percentage(5000.0, 2200.0), 100.0);
        assert_eq!(compute_calorie_percentage(100.0, 0.0), 0.0);
        assert_eq!(compute_calorie_percentage(0.0, 2200.0), 0.0);
    }

    #[test]
    fn test_progress_rows() {
        let totals = Nutrients::new(1000.0, 125.0, 60.0, 45.0, 0.0);
        let rows = progress(&totals, &NutrientTargets::default());

        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Protein", "Fiber", "Carbs", "Fats"]);
        assert_eq!(rows[0].percentage, 50.0);
        assert_eq!(rows[1].percentage, 100.0);
        assert_eq!(rows[2].percentage, 50.0);
        assert_eq!(rows[3].percentage, 0.0);
    }
}
