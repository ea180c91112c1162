use crate::core::{sum_daily_nutrients, DailyLog};

/// History entries mentioned in the forecast prompt
pub const HISTORY_SAMPLE: usize = 5;

pub const MEAL_IMAGE_PROMPT: &str = "Identify the main food in this image. Estimate its total calories and macronutrients. IMPORTANT: If this is a juice, milkshake, smoothie, or any blended liquid drink, set isBlendedDrink to true. Return the result in JSON format.";

pub fn ingredients_prompt(ingredients: &str, context_name: &str) -> String {
    format!(
        "Analyze the following ingredients for a {}: \"{}\". Provide total nutrients (calories, carbs, protein, fats, fiber). Return JSON only.",
        context_name, ingredients
    )
}

/// Coach persona and the exact section layout the reply must follow
pub fn system_instruction(today: &DailyLog) -> String {
    format!(
        r#"You are AaharWise - an elite preventive health strategist.
Your goal is to show the user the "Biological Destination" of their current lifestyle.

Structure your response EXACTLY as follows:
### VERDICT: [HIGH-IMPACT STATUS e.g., ACCELERATED AGING, PEAK VITALITY, METABOLIC DECAY]
[One sharp sentence on the current state.]

### THE LONG-TERM FORECAST (5-10 YEARS)
[Based on the user's age ({age}), gender, and habits, describe exactly what will happen to their body if this intake pattern continues. Mention specific risks like insulin resistance, visceral fat, muscle loss, or skin health.]

### VITAL SCORE: [X]/10 - [CREATIVE LABEL]

### THE BIOLOGICAL FIX
- [Immediate change to stop the damage]
- [Long-term habit to build resilience]

### HISTORICAL PATTERN
[Synthesize today's data with their history. Are they improving or sliding? Mention if they are consistently hitting or missing protein/fiber/water goals.]"#,
        age = today.profile_snapshot.age
    )
}

/// Today's numbers plus a short trend from the most recent history
pub fn health_prompt(today: &DailyLog, history: &[DailyLog]) -> String {
    let profile = &today.profile_snapshot;
    let totals = today
        .total_nutrients
        .unwrap_or_else(|| sum_daily_nutrients(&today.meals));

    format!(
        "User: {}yo {}, Goal: {}\n\
         Today's Intake: {} cal, {}g Protein, {}g Fiber, {}ml Water.\n\
         Cheat Meals Today: {}\n\
         \n\
         Recent History Trend:\n\
         {}\n\
         \n\
         Predict the future health of this person if this intake becomes their standard lifestyle.",
        profile.age,
        profile.gender,
        profile.conditions,
        totals.calories,
        totals.protein,
        totals.fiber,
        today.water_ml,
        today.junk_meal_count(),
        history_trend(history),
    )
}

fn history_trend(history: &[DailyLog]) -> String {
    if history.is_empty() {
        return "No previous history available.".to_string();
    }

    history
        .iter()
        .take(HISTORY_SAMPLE)
        .map(|log| {
            let calories = log
                .total_nutrients
                .map(|n| n.calories.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("- {}: {} cal, {} cheat meals", log.date, calories, log.junk_meal_count())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
