use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::prompt;
use super::{FeedbackGateway, GatewayError, MealAnalysis};
use crate::config::GatewayConfig;
use crate::core::{DailyLog, Nutrients};

/// Gemini `generateContent` client
pub struct GeminiGateway {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Structured answer for a photo. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanPayload {
    food_name: Option<String>,
    #[serde(flatten)]
    nutrients: NutrientPayload,
    is_blended_drink: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct NutrientPayload {
    calories: Option<f64>,
    carbs: Option<f64>,
    protein: Option<f64>,
    fats: Option<f64>,
    fiber: Option<f64>,
}

impl From<NutrientPayload> for Nutrients {
    fn from(p: NutrientPayload) -> Self {
        Nutrients {
            calories: p.calories.unwrap_or(0.0),
            carbs: p.carbs.unwrap_or(0.0),
            protein: p.protein.unwrap_or(0.0),
            fiber: p.fiber.unwrap_or(0.0),
            fats: p.fats.unwrap_or(0.0),
        }
    }
}

impl GeminiGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, body: Value) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_ref().ok_or(GatewayError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        tracing::debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyResponse)?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

fn nutrient_schema_properties() -> Value {
    json!({
        "calories": { "type": "NUMBER" },
        "carbs": { "type": "NUMBER" },
        "protein": { "type": "NUMBER" },
        "fats": { "type": "NUMBER" },
        "fiber": { "type": "NUMBER" }
    })
}

/// Decode a JSON-mode answer, treating an empty answer as `{}`
fn decode_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    let source = if trimmed.is_empty() { "{}" } else { trimmed };
    Ok(serde_json::from_str(source)?)
}

#[async_trait]
impl FeedbackGateway for GeminiGateway {
    async fn analyze_meal_image(&self, image: &[u8], mime_type: &str) -> Result<MealAnalysis, GatewayError> {
        let mut properties = nutrient_schema_properties();
        properties["foodName"] = json!({ "type": "STRING" });
        properties["isBlendedDrink"] = json!({ "type": "BOOLEAN" });

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": general_purpose::STANDARD.encode(image) } },
                    { "text": prompt::MEAL_IMAGE_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": properties,
                    "required": ["foodName", "calories", "carbs", "protein", "fats", "fiber", "isBlendedDrink"]
                }
            }
        });

        let text = self.generate(body).await?;
        let payload: ScanPayload = decode_json(&text)?;

        let analysis = MealAnalysis {
            food_name: payload
                .food_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown Meal".to_string()),
            nutrients: payload.nutrients.into(),
            is_blended_drink: payload.is_blended_drink.unwrap_or(false),
        };

        tracing::info!(
            food = %analysis.food_name,
            calories = analysis.nutrients.calories,
            blended = analysis.is_blended_drink,
            "meal image analyzed"
        );
        Ok(analysis)
    }

    async fn nutrients_from_ingredients(
        &self,
        ingredients: &str,
        context_name: &str,
    ) -> Result<Nutrients, GatewayError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt::ingredients_prompt(ingredients, context_name) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": nutrient_schema_properties(),
                    "required": ["calories", "carbs", "protein", "fats", "fiber"]
                }
            }
        });

        let text = self.generate(body).await?;
        let payload: NutrientPayload = decode_json(&text)?;
        Ok(payload.into())
    }

    async fn request_health_analysis(
        &self,
        today: &DailyLog,
        history: &[DailyLog],
    ) -> Result<String, GatewayError> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": prompt::system_instruction(today) }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt::health_prompt(today, history) }]
            }],
            "generationConfig": {
                "temperature": self.temperature
            }
        });

        self.generate(body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserProfile;
    use crate::gateway::ANALYSIS_FAILED;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

    fn gateway_for(server: &MockServer, api_key: Option<&str>) -> GeminiGateway {
        let config = GatewayConfig {
            api_key: api_key.map(str::to_string),
            model: "test-model".to_string(),
            base_url: server.uri(),
            temperature: 0.7,
            timeout_secs: 5,
        };
        GeminiGateway::new(&config).unwrap()
    }

    fn reply_with(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn test_analyze_meal_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(reply_with(
                r#"{"foodName":"Masala Dosa","calories":380,"carbs":52,"protein":8,"fats":14,"fiber":4,"isBlendedDrink":false}"#,
            ))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let analysis = gateway.analyze_meal_image(b"fake-bytes", "image/jpeg").await.unwrap();

        assert_eq!(analysis.food_name, "Masala Dosa");
        assert_eq!(analysis.nutrients, Nutrients::new(380.0, 52.0, 8.0, 4.0, 14.0));
        assert!(!analysis.is_blended_drink);
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(reply_with(r#"{"isBlendedDrink":true}"#))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let analysis = gateway.analyze_meal_image(b"x", "image/png").await.unwrap();

        assert_eq!(analysis.food_name, "Unknown Meal");
        assert_eq!(analysis.nutrients, Nutrients::default());
        assert!(analysis.is_blended_drink);
    }

    #[tokio::test]
    async fn test_nutrients_from_ingredients() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(reply_with(
                "```json\n{\"calories\":210,\"carbs\":45,\"protein\":3,\"fats\":1,\"fiber\":6}\n```",
            ))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let nutrients = gateway
            .nutrients_from_ingredients("2 apples, 1 carrot", "Juice")
            .await
            .unwrap();

        assert_eq!(nutrients, Nutrients::new(210.0, 45.0, 3.0, 6.0, 1.0));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let err = gateway.analyze_meal_image(b"x", "image/jpeg").await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server, None);
        let err = gateway.nutrients_from_ingredients("milk", "Shake").await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_health_analysis_falls_back_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let today = DailyLog::new("Saturday, 17 October".to_string(), Vec::new(), 0, UserProfile::default());
        let text = gateway.generate_health_analysis(&today, &[]).await;
        assert_eq!(text, ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_health_analysis_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(reply_with("### VERDICT: PEAK VITALITY\nYou're thriving."))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        let today = DailyLog::new("Saturday, 17 October".to_string(), Vec::new(), 0, UserProfile::default());
        let text = gateway.generate_health_analysis(&today, &[]).await;
        assert!(text.starts_with("### VERDICT"));
    }
}
