use csv::{QuoteStyle, WriterBuilder};
use std::path::{Path, PathBuf};

use crate::core::{Meal, Result};

pub const CSV_HEADER: [&str; 11] = [
    "Date",
    "Time",
    "Food",
    "Portion",
    "Type",
    "Calories",
    "Protein(g)",
    "Carbs(g)",
    "Fats(g)",
    "Fiber(g)",
    "Water(ml)",
];

/// `AaharWise_<date label with whitespace as underscores>.csv`
pub fn export_file_name(date_label: &str) -> String {
    let date = date_label.split_whitespace().collect::<Vec<_>>().join("_");
    format!("AaharWise_{}.csv", date)
}

/// Render the day's meals as CSV. Food and portion are always quoted; date,
/// time and type are quoted only when they contain a separator or quote.
/// Numeric columns are `0` for meals without nutrients.
pub fn meals_to_csv(date_label: &str, meals: &[Meal], water_ml: u32) -> Result<String> {
    let mut csv = encode_record(&CSV_HEADER, QuoteStyle::Necessary)?;
    csv.push('\n');

    let date = encode_field(date_label, QuoteStyle::Necessary)?;
    for meal in meals {
        let n = meal.nutrients.unwrap_or_default();
        let row = [
            date.clone(),
            encode_field(&meal.time, QuoteStyle::Necessary)?,
            encode_field(&meal.food, QuoteStyle::Always)?,
            encode_field(&meal.portion, QuoteStyle::Always)?,
            encode_field(meal.kind_label(), QuoteStyle::Necessary)?,
            n.calories.to_string(),
            n.protein.to_string(),
            n.carbs.to_string(),
            n.fats.to_string(),
            n.fiber.to_string(),
            water_ml.to_string(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    Ok(csv)
}

fn encode_field(value: &str, style: QuoteStyle) -> Result<String> {
    encode_record(&[value], style)
}

/// One record without its line terminator
fn encode_record(fields: &[&str], style: QuoteStyle) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(style)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::from(e.error().kind()))?;

    let record = String::from_utf8_lossy(&bytes);
    Ok(record.trim_end_matches(['\r', '\n']).to_string())
}

/// Write the day's CSV into `dir` and return the file path
pub fn write_daily_csv(dir: &Path, date_label: &str, meals: &[Meal], water_ml: u32) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date_label));
    std::fs::write(&path, meals_to_csv(date_label, meals, water_ml)?)?;

    tracing::info!(path = %path.display(), meals = meals.len(), "exported daily csv");
    Ok(path)
}
