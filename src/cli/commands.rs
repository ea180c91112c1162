use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,
    /// Update one or more profile fields
    Set {
        /// Age in years (non-numeric input counts as 0)
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Height with unit, e.g. 175cm
        #[arg(long)]
        height: Option<String>,
        /// Weight with unit, e.g. 70kg
        #[arg(long)]
        weight: Option<String>,
        /// low, medium or high
        #[arg(long)]
        activity: Option<String>,
        /// Health goals and notes
        #[arg(long)]
        conditions: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MealCommands {
    /// Log a meal by hand
    Add {
        food: String,
        /// Time of the meal (HH:MM), defaults to now
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        portion: Option<String>,
        /// Mark as a cheat meal
        #[arg(long)]
        junk: bool,
        #[arg(long)]
        home_cooked: bool,
    },
    /// Identify a meal from a photo
    Scan {
        image: PathBuf,
    },
    /// Give the ingredients of a scanned blended drink
    Drink {
        ingredients: String,
    },
    /// Discard the scanned drink waiting for ingredients
    CancelDrink,
    /// Remove a meal from today
    Remove {
        id: String,
    },
    /// List today's meals
    List,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List past daily logs
    List {
        /// Print the stored coach analysis of each day
        #[arg(long)]
        details: bool,
    },
    /// Delete a past daily log
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    Show,
    Toggle,
    /// light or dark
    Set {
        theme: String,
    },
}
