use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("History entry not found: {0}")]
    HistoryNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Meal scan failed: {0}")]
    Scan(#[source] GatewayError),

    #[error("Ingredient analysis failed: {0}")]
    Ingredients(#[source] GatewayError),
}

impl JournalError {
    /// Message shown to the user at the boundary where the action started.
    pub fn user_message(&self) -> String {
        match self {
            JournalError::Scan(_) => "Oops! Could not identify that. Try a brighter shot!".to_string(),
            JournalError::Ingredients(_) => "Error analyzing ingredients.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_failures_map_to_retry_prompts() {
        let scan = JournalError::Scan(GatewayError::MissingApiKey);
        assert_eq!(
            scan.user_message(),
            "Oops! Could not identify that. Try a brighter shot!"
        );

        let drink = JournalError::Ingredients(GatewayError::EmptyResponse);
        assert_eq!(drink.user_message(), "Error analyzing ingredients.");
    }

    #[test]
    fn test_other_errors_use_display() {
        let err = JournalError::MealNotFound("abc".to_string());
        assert_eq!(err.user_message(), "Meal not found: abc");
    }
}
