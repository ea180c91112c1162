pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::{DailyLog, Nutrients};

pub use gemini::GeminiGateway;

/// Text used when the model answers with nothing
pub const COACH_OFFLINE: &str = "Coach is offline.";
/// Text used when the forecast request fails
pub const ANALYSIS_FAILED: &str = "Analysis hit a wall. Try again.";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Could not decode model output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the model recognised in a meal photo
#[derive(Debug, Clone, PartialEq)]
pub struct MealAnalysis {
    pub food_name: String,
    pub nutrients: Nutrients,
    /// Juice, smoothie or shake whose ingredients have to be asked for
    pub is_blended_drink: bool,
}

/// Hosted generative model behind meal recognition and the health forecast.
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    async fn analyze_meal_image(&self, image: &[u8], mime_type: &str) -> Result<MealAnalysis, GatewayError>;

    async fn nutrients_from_ingredients(
        &self,
        ingredients: &str,
        context_name: &str,
    ) -> Result<Nutrients, GatewayError>;

    async fn request_health_analysis(
        &self,
        today: &DailyLog,
        history: &[DailyLog],
    ) -> Result<String, GatewayError>;

    /// Forecast text for `today`. Never fails: errors and empty answers
    /// become a readable fallback message.
    async fn generate_health_analysis(&self, today: &DailyLog, history: &[DailyLog]) -> String {
        match self.request_health_analysis(today, history).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => COACH_OFFLINE.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "health analysis failed");
                ANALYSIS_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserProfile;

    struct CannedGateway {
        reply: Option<String>,
    }

    #[async_trait]
    impl FeedbackGateway for CannedGateway {
        async fn analyze_meal_image(&self, _image: &[u8], _mime: &str) -> Result<MealAnalysis, GatewayError> {
            Err(GatewayError::EmptyResponse)
        }

        async fn nutrients_from_ingredients(&self, _i: &str, _c: &str) -> Result<Nutrients, GatewayError> {
            Err(GatewayError::EmptyResponse)
        }

        async fn request_health_analysis(
            &self,
            _today: &DailyLog,
            _history: &[DailyLog],
        ) -> Result<String, GatewayError> {
            self.reply.clone().ok_or(GatewayError::MissingApiKey)
        }
    }

    fn today() -> DailyLog {
        DailyLog::new("Saturday, 17 October".to_string(), Vec::new(), 0, UserProfile::default())
    }

    #[tokio::test]
    async fn test_analysis_passes_text_through() {
        let gateway = CannedGateway {
            reply: Some("### VERDICT: OK".to_string()),
        };
        assert_eq!(gateway.generate_health_analysis(&today(), &[]).await, "### VERDICT: OK");
    }

    #[tokio::test]
    async fn test_analysis_fallbacks() {
        let empty = CannedGateway {
            reply: Some("  ".to_string()),
        };
        assert_eq!(empty.generate_health_analysis(&today(), &[]).await, COACH_OFFLINE);

        let failing = CannedGateway { reply: None };
        assert_eq!(failing.generate_health_analysis(&today(), &[]).await, ANALYSIS_FAILED);
    }
}
