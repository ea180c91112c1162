use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aaharwise::config::Config;
use aaharwise::core::profile::coerce_age;
use aaharwise::core::{
    BodyLine, FeedbackSection, JournalError, JournalStore, ProfilePatch, SectionKind, Theme,
};
use aaharwise::gateway::GeminiGateway;
use aaharwise::journal::{today_label, CoachReport, Journal, ManualMeal, ScanOutcome};

pub use commands::{HistoryCommands, MealCommands, ProfileCommands, ThemeCommands};

mod commands;

fn open_journal(data_dir: Option<PathBuf>) -> Result<Journal> {
    let config = Config::new(data_dir)?;
    let store = JournalStore::open(config.journal_dir(), today_label())
        .context("Failed to open journal")?;
    let gateway = GeminiGateway::new(&config.gateway).context("Failed to create AI client")?;

    Ok(Journal::new(store, Arc::new(gateway), config.targets))
}

fn accent(theme: Theme, text: &str) -> ColoredString {
    match theme {
        Theme::Light => text.blue().bold(),
        Theme::Dark => text.cyan().bold(),
    }
}

/// Print the friendly message for failures that started at this boundary
fn report_failure(err: JournalError) -> Result<()> {
    match err {
        JournalError::Scan(_) | JournalError::Ingredients(_) => {
            tracing::warn!(error = %err, "gateway request failed");
            println!("{}", err.user_message().yellow());
            Ok(())
        }
        other => Err(other.into()),
    }
}

pub fn handle_profile(command: ProfileCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;

    if let ProfileCommands::Set {
        age,
        gender,
        height,
        weight,
        activity,
        conditions,
    } = command
    {
        let patch = ProfilePatch {
            age: age.as_deref().map(coerce_age),
            gender,
            height,
            weight,
            activity_level: activity.as_deref().map(str::parse).transpose()?,
            conditions,
        };
        if patch.is_empty() {
            println!("{}", "Nothing to update".yellow());
            return Ok(());
        }
        journal.store_mut().update_profile(patch)?;
        println!("{}", "Profile updated".green());
    }

    let theme = journal.store().theme();
    let profile = journal.store().profile();
    println!("{}", accent(theme, "Profile"));
    println!("  Age:        {}", profile.age);
    println!("  Gender:     {}", profile.gender);
    println!("  Height:     {}", profile.height);
    println!("  Weight:     {}", profile.weight);
    println!("  Activity:   {}", profile.activity_level);
    println!("  Intentions: {}", profile.conditions);
    Ok(())
}

pub async fn handle_meal(command: MealCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;
    let theme = journal.store().theme();

    match command {
        MealCommands::Add {
            food,
            time,
            portion,
            junk,
            home_cooked,
        } => {
            let form = ManualMeal {
                food,
                time,
                portion,
                is_junk: junk,
                is_home_cooked: home_cooked,
            };
            if let Some(meal) = journal.add_manual_meal(form)? {
                println!("{} {} ({})", "Logged".green(), meal.food, meal.id.dimmed());
            }
        }
        MealCommands::Scan { image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("Failed to read image {}", image.display()))?;
            let image_ref = Some(image.display().to_string());

            match journal.scan_meal(&bytes, mime_type_for(&image), image_ref).await {
                Ok(ScanOutcome::Logged(meal)) => {
                    let kcal = meal.nutrients.map(|n| n.calories).unwrap_or_default();
                    println!("{} {} - {:.0} kcal", "Logged".green(), meal.food, kcal);
                }
                Ok(ScanOutcome::NeedsIngredients(drink)) => {
                    println!("{}", accent(theme, "Blended drink detected"));
                    println!(
                        "{} looks like a blend. Tell me what went into it:",
                        drink.food_name
                    );
                    println!("  aaharwise meal drink \"2 Apples, 1 Carrot, Ginger, 1 tsp Honey\"");
                }
                Err(err) => report_failure(err)?,
            }
        }
        MealCommands::Drink { ingredients } => {
            if journal.store().pending_drink().is_none() {
                println!("{}", "No scanned drink is waiting for ingredients".yellow());
                return Ok(());
            }
            match journal.complete_blended_drink(&ingredients).await {
                Ok(Some(meal)) => println!("{} {}", "Logged".green(), meal.food),
                Ok(None) => {}
                Err(err) => report_failure(err)?,
            }
        }
        MealCommands::CancelDrink => match journal.cancel_blended_drink()? {
            Some(drink) => println!("Discarded {}", drink.food_name),
            None => println!("{}", "Nothing to discard".yellow()),
        },
        MealCommands::Remove { id } => {
            let meal = journal.remove_meal(&id)?;
            println!("{} {}", "Removed".red(), meal.food);
        }
        MealCommands::List => {
            let meals = journal.store().current_meals();
            println!("{}", accent(theme, &format!("Meals - {}", journal.store().today_label())));
            if meals.is_empty() {
                println!("{}", "No meals logged yet".dimmed());
            }
            for meal in meals {
                let kcal = meal
                    .nutrients
                    .map(|n| format!("{:.0} kcal", n.calories))
                    .unwrap_or_else(|| "analyzing".to_string());
                let kind = if meal.is_junk {
                    meal.kind_label().red()
                } else {
                    meal.kind_label().green()
                };
                println!(
                    "  {} {:<24} {:<18} {:<6} {:>10}  {}",
                    meal.time,
                    meal.food,
                    meal.portion,
                    kind,
                    kcal,
                    meal.id.dimmed()
                );
            }
        }
    }

    Ok(())
}

pub fn handle_water(amount: u32, data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;
    let total = journal.add_water(amount)?;
    println!("+{}ml water, {}ml today", amount, total);
    Ok(())
}

pub fn handle_summary(data_dir: Option<PathBuf>) -> Result<()> {
    let journal = open_journal(data_dir)?;
    let theme = journal.store().theme();
    let summary = journal.summary();

    println!("{}", accent(theme, &summary.date));
    println!(
        "Calories: {:.0} / {:.0} kcal ({:.0}%)",
        summary.totals.calories, summary.calorie_target, summary.calorie_percentage
    );
    for row in &summary.macros {
        println!(
            "  {:<8} {:>6.0}{} / {:.0}{}  {}",
            row.label,
            row.value,
            row.unit,
            row.target,
            row.unit,
            progress_bar(row.percentage)
        );
    }
    println!("Water: {}ml", summary.water_ml);
    println!("Meals: {}", summary.meal_count);

    if let Some(avg) = summary.averages {
        println!("\n{}", accent(theme, "History averages"));
        println!(
            "  {:.0} kcal, {:.0}g protein, {:.0}g carbs, {:.0}g fats, {:.0}g fiber",
            avg.calories, avg.protein, avg.carbs, avg.fats, avg.fiber
        );
    }
    Ok(())
}

pub async fn handle_analyze(data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;
    let theme = journal.store().theme();

    println!("{}", "Consulting the coach...".dimmed());
    let report = journal.analyze_day().await?;
    print_report(theme, &report);
    Ok(())
}

pub fn handle_history(command: HistoryCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;
    let theme = journal.store().theme();

    match command {
        HistoryCommands::List { details } => {
            let history = journal.store().history();
            if history.is_empty() {
                println!("{}", "No historical data recorded.".dimmed());
                return Ok(());
            }
            for log in history {
                let kcal = log.total_nutrients.map(|n| n.calories).unwrap_or_default();
                println!(
                    "{}  {} meals, {}ml water, {:.0} kcal  {}",
                    accent(theme, &log.date),
                    log.meals.len(),
                    log.water_ml,
                    kcal,
                    log.id.dimmed()
                );
                if details {
                    if let Some(text) = &log.analysis {
                        print_report(
                            theme,
                            &CoachReport {
                                text: text.clone(),
                                sections: aaharwise::core::parse_feedback_sections(text),
                            },
                        );
                    }
                }
            }
        }
        HistoryCommands::Remove { id } => {
            let log = journal.store_mut().remove_history_entry(&id)?;
            println!("{} {}", "Removed".red(), log.date);
        }
    }
    Ok(())
}

pub fn handle_export(out: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let journal = open_journal(data_dir)?;
    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let path = journal.export_csv(&dir)?;
    println!("Exported {}", path.display());
    Ok(())
}

pub fn handle_theme(command: ThemeCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let mut journal = open_journal(data_dir)?;
    let store = journal.store_mut();

    let theme = match command {
        ThemeCommands::Show => store.theme(),
        ThemeCommands::Toggle => store.toggle_theme()?,
        ThemeCommands::Set { theme } => {
            let theme: Theme = theme.parse()?;
            store.set_theme(theme)?;
            theme
        }
    };
    println!("Theme: {}", accent(theme, &theme.to_string()));
    Ok(())
}

fn print_report(theme: Theme, report: &CoachReport) {
    if report.sections.is_empty() {
        println!("{}", report.text);
        return;
    }

    for section in &report.sections {
        print_section(theme, section);
        println!();
    }
    println!(
        "{}",
        "AaharWise is a wellness and nutrition education tool, not medical advice or a medical device. For diagnosis or treatment, please consult a doctor."
            .dimmed()
            .italic()
    );
}

fn print_section(theme: Theme, section: &FeedbackSection) {
    match section.kind() {
        SectionKind::Verdict => {
            println!("{}", accent(theme, "METABOLIC STATUS"));
            println!("{}", section.verdict_headline().bold());
            if !section.content.is_empty() {
                println!("{}", section.content.italic());
            }
        }
        SectionKind::VitalScore => {
            let score = section.vital_score();
            println!("{}", accent(theme, "HEALTH PERFORMANCE"));
            println!("{} / 10  {}", score.numerator.bold(), score.label.to_uppercase());
        }
        SectionKind::Forecast => {
            println!("{}", accent(theme, "BIOLOGICAL TRAJECTORY"));
            if !section.inline_data.is_empty() {
                println!("\"{}\"", section.inline_data.italic());
            }
            println!("{}", section.content);
        }
        SectionKind::Generic => {
            println!("{}", accent(theme, &section.title));
            if let Some(headline) = section.headline() {
                println!("{}", headline.bold());
            }
            for line in section.body_lines() {
                match line {
                    BodyLine::Bullet(item) => println!("  {} {}", "→".cyan(), item.bold()),
                    BodyLine::Paragraph(text) => println!("{}", text),
                }
            }
        }
    }
}

fn progress_bar(percentage: f64) -> String {
    let filled = (percentage / 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled.min(10)))
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
