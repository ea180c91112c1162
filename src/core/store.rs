use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::daily_log::DailyLog;
use super::error::{JournalError, Result};
use super::meal::{Meal, PendingDrink};
use super::profile::{ProfilePatch, UserProfile};

/// Most recent daily logs kept in history
pub const HISTORY_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(JournalError::Config(format!("Unknown theme: {}", s))),
        }
    }
}

/// The day currently being logged
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TodayState {
    pub date: String,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub water_ml: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_drink: Option<PendingDrink>,
}

impl TodayState {
    fn fresh(date: String) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }
}

/// Persisted keys, one JSON file each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Profile,
    History,
    Theme,
    Today,
}

impl StoreKey {
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKey::Profile => "profile.json",
            StoreKey::History => "history.json",
            StoreKey::Theme => "theme.json",
            StoreKey::Today => "today.json",
        }
    }
}

/// Journal state: profile, today's meals and water, history and theme.
///
/// Loaded once on open and written back on every mutation. Without a data
/// directory the store lives only in memory.
#[derive(Debug)]
pub struct JournalStore {
    data_dir: Option<PathBuf>,
    profile: UserProfile,
    history: Vec<DailyLog>,
    theme: Theme,
    today: TodayState,
}

impl JournalStore {
    /// Open the store in `data_dir`, starting a fresh day if the saved one
    /// is not `today_label`.
    pub fn open(data_dir: impl Into<PathBuf>, today_label: impl Into<String>) -> Result<Self> {
        let data_dir = data_dir.into();
        let today_label = today_label.into();
        std::fs::create_dir_all(&data_dir)?;

        let profile = load_key(&data_dir, StoreKey::Profile)?.unwrap_or_default();
        let mut history: Vec<DailyLog> = load_key(&data_dir, StoreKey::History)?.unwrap_or_default();
        let theme = load_key(&data_dir, StoreKey::Theme)?.unwrap_or_default();
        let saved_today: Option<TodayState> = load_key(&data_dir, StoreKey::Today)?;

        let loaded = history.len();
        let mut seen = HashSet::new();
        history.retain(|log| seen.insert(log.date.clone()));
        if history.len() < loaded {
            tracing::warn!(
                dropped = loaded - history.len(),
                "history had repeated dates, keeping the newest entry of each"
            );
        }
        history.truncate(HISTORY_LIMIT);

        let today = match saved_today {
            Some(today) if today.date == today_label => today,
            Some(stale) => {
                tracing::info!(
                    previous = %stale.date,
                    meals = stale.meals.len(),
                    "starting a new day"
                );
                TodayState::fresh(today_label)
            }
            None => TodayState::fresh(today_label),
        };

        let store = Self {
            data_dir: Some(data_dir),
            profile,
            history,
            theme,
            today,
        };
        store.save(StoreKey::Today)?;
        Ok(store)
    }

    /// Store without persistence
    pub fn in_memory(today_label: impl Into<String>) -> Self {
        Self {
            data_dir: None,
            profile: UserProfile::default(),
            history: Vec::new(),
            theme: Theme::default(),
            today: TodayState::fresh(today_label.into()),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn today_label(&self) -> &str {
        &self.today.date
    }

    pub fn current_meals(&self) -> &[Meal] {
        &self.today.meals
    }

    pub fn current_water_ml(&self) -> u32 {
        self.today.water_ml
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Most recent first, at most `HISTORY_LIMIT` entries
    pub fn history(&self) -> &[DailyLog] {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pending_drink(&self) -> Option<&PendingDrink> {
        self.today.pending_drink.as_ref()
    }

    pub fn add_meal(&mut self, meal: Meal) -> Result<()> {
        tracing::debug!(id = %meal.id, food = %meal.food, "adding meal");
        self.today.meals.push(meal);
        self.save(StoreKey::Today)
    }

    pub fn remove_meal(&mut self, id: &str) -> Result<Meal> {
        let index = self
            .today
            .meals
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| JournalError::MealNotFound(id.to_string()))?;

        let meal = self.today.meals.remove(index);
        self.save(StoreKey::Today)?;
        Ok(meal)
    }

    /// Add water and return the new daily total
    pub fn add_water(&mut self, amount_ml: u32) -> Result<u32> {
        self.today.water_ml = self.today.water_ml.saturating_add(amount_ml);
        self.save(StoreKey::Today)?;
        Ok(self.today.water_ml)
    }

    pub fn set_pending_drink(&mut self, drink: PendingDrink) -> Result<()> {
        self.today.pending_drink = Some(drink);
        self.save(StoreKey::Today)
    }

    pub fn take_pending_drink(&mut self) -> Result<Option<PendingDrink>> {
        let drink = self.today.pending_drink.take();
        if drink.is_some() {
            self.save(StoreKey::Today)?;
        }
        Ok(drink)
    }

    /// Insert `log` at the front, replacing any log with the same date,
    /// and keep only the newest `HISTORY_LIMIT` entries.
    pub fn commit_daily_log(&mut self, log: DailyLog) -> Result<()> {
        self.history.retain(|existing| existing.date != log.date);
        self.history.insert(0, log);
        self.history.truncate(HISTORY_LIMIT);
        self.save(StoreKey::History)
    }

    pub fn remove_history_entry(&mut self, id: &str) -> Result<DailyLog> {
        let index = self
            .history
            .iter()
            .position(|log| log.id == id)
            .ok_or_else(|| JournalError::HistoryNotFound(id.to_string()))?;

        let log = self.history.remove(index);
        self.save(StoreKey::History)?;
        Ok(log)
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<&UserProfile> {
        self.profile.apply(patch);
        self.save(StoreKey::Profile)?;
        Ok(&self.profile)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.save(StoreKey::Theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.set_theme(self.theme.toggled())?;
        Ok(self.theme)
    }

    fn save(&self, key: StoreKey) -> Result<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };

        let content = match key {
            StoreKey::Profile => serde_json::to_string_pretty(&self.profile)?,
            StoreKey::History => serde_json::to_string_pretty(&self.history)?,
            StoreKey::Theme => serde_json::to_string_pretty(&self.theme)?,
            StoreKey::Today => serde_json::to_string_pretty(&self.today)?,
        };

        std::fs::write(dir.join(key.file_name()), content)?;
        Ok(())
    }
}

/// Read one key. A missing file is `None`; an unreadable one is moved aside
/// to `<name>.bak` and also treated as missing.
fn load_key<T: DeserializeOwned>(dir: &Path, key: StoreKey) -> Result<Option<T>> {
    let path = dir.join(key.file_name());
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let backup = path.with_extension("json.bak");
            tracing::warn!(
                file = %path.display(),
                backup = %backup.display(),
                error = %e,
                "could not parse saved state, starting from defaults"
            );
            std::fs::rename(&path, &backup)?;
            Ok(None)
        }
    }
}
