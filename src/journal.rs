use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::meal::current_time;
use crate::core::{
    compute_calorie_percentage, compute_weekly_averages, parse_feedback_sections, progress,
    sum_daily_nutrients, AverageNutrients, DailyLog, FeedbackSection, JournalError, JournalStore,
    Meal, NutrientProgress, NutrientTargets, Nutrients, PendingDrink, Result,
};
use crate::export;
use crate::gateway::FeedbackGateway;

/// Display label for a calendar day, e.g. "Saturday, 17 October"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%A, %-d %B").to_string()
}

pub fn today_label() -> String {
    date_label(Local::now().date_naive())
}

/// Fields of the add-meal form
#[derive(Debug, Clone, Default)]
pub struct ManualMeal {
    pub food: String,
    pub time: Option<String>,
    pub portion: Option<String>,
    pub is_junk: bool,
    pub is_home_cooked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Recognised and added to today's meals
    Logged(Meal),
    /// A blended drink; its ingredients are needed before it can be logged
    NeedsIngredients(PendingDrink),
}

/// Coach reply for the day, raw and split into sections
#[derive(Debug, Clone)]
pub struct CoachReport {
    pub text: String,
    pub sections: Vec<FeedbackSection>,
}

#[derive(Debug, Clone)]
pub struct DaySummary {
    pub date: String,
    pub meal_count: usize,
    pub totals: Nutrients,
    pub water_ml: u32,
    pub calorie_target: f64,
    pub calorie_percentage: f64,
    pub macros: Vec<NutrientProgress>,
    pub averages: Option<AverageNutrients>,
}

/// The journal's user actions over an injected store and gateway.
pub struct Journal {
    store: JournalStore,
    gateway: Arc<dyn FeedbackGateway>,
    targets: NutrientTargets,
}

impl Journal {
    pub fn new(store: JournalStore, gateway: Arc<dyn FeedbackGateway>, targets: NutrientTargets) -> Self {
        Self {
            store,
            gateway,
            targets,
        }
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut JournalStore {
        &mut self.store
    }

    /// Log a meal from the form. A blank food name is ignored.
    pub fn add_manual_meal(&mut self, form: ManualMeal) -> Result<Option<Meal>> {
        let Some(meal) = Meal::manual(
            &form.food,
            form.time.as_deref(),
            form.portion.as_deref(),
            form.is_junk,
            form.is_home_cooked,
        ) else {
            tracing::debug!("ignoring meal without a food name");
            return Ok(None);
        };

        self.store.add_meal(meal.clone())?;
        Ok(Some(meal))
    }

    /// Identify a meal photo. Blended drinks are parked until their
    /// ingredients are given.
    pub async fn scan_meal(&mut self, image: &[u8], mime_type: &str, image_ref: Option<String>) -> Result<ScanOutcome> {
        let analysis = self
            .gateway
            .analyze_meal_image(image, mime_type)
            .await
            .map_err(JournalError::Scan)?;

        let time = current_time();
        if analysis.is_blended_drink {
            let pending = PendingDrink::new(analysis.food_name, image_ref, time);
            self.store.set_pending_drink(pending.clone())?;
            return Ok(ScanOutcome::NeedsIngredients(pending));
        }

        let meal = Meal::scanned(analysis.food_name, time, analysis.nutrients, image_ref);
        self.store.add_meal(meal.clone())?;
        Ok(ScanOutcome::Logged(meal))
    }

    /// Turn the pending drink into a meal. Returns `None` when nothing is
    /// pending or `ingredients` is blank. On gateway failure the drink stays
    /// pending.
    pub async fn complete_blended_drink(&mut self, ingredients: &str) -> Result<Option<Meal>> {
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Ok(None);
        }
        let Some(pending) = self.store.pending_drink().cloned() else {
            return Ok(None);
        };

        let nutrients = self
            .gateway
            .nutrients_from_ingredients(ingredients, &pending.food_name)
            .await
            .map_err(JournalError::Ingredients)?;

        self.store.take_pending_drink()?;
        let meal = Meal::blended(pending, nutrients);
        self.store.add_meal(meal.clone())?;
        Ok(Some(meal))
    }

    pub fn cancel_blended_drink(&mut self) -> Result<Option<PendingDrink>> {
        self.store.take_pending_drink()
    }

    pub fn remove_meal(&mut self, id: &str) -> Result<Meal> {
        self.store.remove_meal(id)
    }

    pub fn add_water(&mut self, amount_ml: u32) -> Result<u32> {
        self.store.add_water(amount_ml)
    }

    /// Ask the coach about today, then record the day in history.
    pub async fn analyze_day(&mut self) -> Result<CoachReport> {
        let mut log = DailyLog::snapshot(
            self.store.today_label().to_string(),
            self.store.current_meals().to_vec(),
            self.store.current_water_ml(),
            self.store.profile(),
        );

        tracing::info!(date = %log.date, meals = log.meals.len(), "requesting health analysis");
        let text = self
            .gateway
            .generate_health_analysis(&log, self.store.history())
            .await;

        log.analysis = Some(text.clone());
        self.store.commit_daily_log(log)?;

        let sections = parse_feedback_sections(&text);
        Ok(CoachReport { text, sections })
    }

    pub fn summary(&self) -> DaySummary {
        let meals = self.store.current_meals();
        let totals = sum_daily_nutrients(meals);

        DaySummary {
            date: self.store.today_label().to_string(),
            meal_count: meals.len(),
            totals,
            water_ml: self.store.current_water_ml(),
            calorie_target: self.targets.calories,
            calorie_percentage: compute_calorie_percentage(totals.calories, self.targets.calories),
            macros: progress(&totals, &self.targets),
            averages: compute_weekly_averages(self.store.history()),
        }
    }

    pub fn export_csv(&self, dir: &Path) -> Result<PathBuf> {
        export::write_daily_csv(
            dir,
            self.store.today_label(),
            self.store.current_meals(),
            self.store.current_water_ml(),
        )
    }
}
