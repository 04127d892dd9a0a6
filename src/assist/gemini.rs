//! Gemini `generateContent` client.
//!
//! Both calls ask for `application/json` output constrained by a response
//! schema, then parse the first candidate's text as that JSON.

use crate::{
    assist::{InsightSample, InsightsProvider, ProductAnalyzer, ProductSuggestion, StoreInsights},
    config::store::GeminiConfig,
    core::model::Category,
    errors::{Error, Result},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error};

/// HTTP client for the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    vision_model: String,
    insights_model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Suggestion as the model returns it, before the category is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    name: String,
    category: String,
    cost_price: f64,
    selling_price: f64,
}

impl GeminiClient {
    /// Builds a client for `api_key` with the endpoint and models from `config`.
    ///
    /// # Errors
    /// [`Error::ExternalService`] if the HTTP client cannot be built.
    pub fn new(api_key: String, config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::external(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            vision_model: config.vision_model.clone(),
            insights_model: config.insights_model.clone(),
        })
    }

    async fn generate(&self, model: &str, body: &Value) -> Result<String> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        debug!(model, "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {e}");
                Error::external(format!("Gemini request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini returned an error: {error_text}");
            return Err(Error::external(format!("Gemini returned status {status}")));
        }

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| Error::external(format!("Failed to parse Gemini response: {e}")))?;
        response_text(body)
    }
}

#[async_trait]
impl ProductAnalyzer for GeminiClient {
    async fn analyze_image(&self, image: &[u8], mime_type: &str) -> Result<ProductSuggestion> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": BASE64.encode(image) } },
                    { "text": image_prompt() },
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": suggestion_schema(),
            }
        });

        let text = self.generate(&self.vision_model, &body).await?;
        parse_suggestion(&text)
    }
}

#[async_trait]
impl InsightsProvider for GeminiClient {
    async fn generate_insights(&self, sample: &InsightSample) -> Result<StoreInsights> {
        let prompt = insights_prompt(sample, Local::now().date_naive())?;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": insights_schema(),
            }
        });

        let text = self.generate(&self.insights_model, &body).await?;
        parse_insights(&text)
    }
}

fn category_keys() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.key()).collect()
}

fn image_prompt() -> String {
    format!(
        "This photo shows a product sold in a sari-sari store in the Philippines. \
         Identify the product's full name and pick its category from this list: [{}]. \
         Estimate a typical cost price and selling price in Philippine Pesos (PHP). \
         Answer with a single JSON object.",
        category_keys().join(", ")
    )
}

fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "Full product name." },
            "category": { "type": "STRING", "description": "One of the listed categories.", "enum": category_keys() },
            "costPrice": { "type": "NUMBER", "description": "Estimated cost price in PHP." },
            "sellingPrice": { "type": "NUMBER", "description": "Estimated selling price in PHP." },
        },
        "required": ["name", "category", "costPrice", "sellingPrice"],
    })
}

fn insights_prompt(sample: &InsightSample, today: NaiveDate) -> Result<String> {
    Ok(format!(
        "You advise the owner of a small sari-sari store in the Philippines. \
         Use the inventory and sales data below to give practical insights.\n\n\
         Today's date: {}\n\n\
         Inventory (sample):\n{}\n\n\
         Recent sales (sample):\n{}\n\n\
         Reply with a JSON object with the keys \"topSelling\", \"profitAnalysis\" and \"aiRecommendations\":\n\
         - topSelling: a short paragraph on the three best-selling products.\n\
         - profitAnalysis: a short paragraph on the most profitable items or categories.\n\
         - aiRecommendations: one concrete suggestion for the owner.\n\
         Return only the JSON object.",
        today.format("%a %b %d %Y"),
        serde_json::to_string_pretty(&sample.inventory)?,
        serde_json::to_string_pretty(&sample.sales)?,
    ))
}

fn insights_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topSelling": { "type": "STRING" },
            "profitAnalysis": { "type": "STRING" },
            "aiRecommendations": { "type": "STRING" },
        },
        "required": ["topSelling", "profitAnalysis", "aiRecommendations"],
    })
}

fn response_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::external("Gemini returned an empty response"));
    }
    Ok(text)
}

fn parse_suggestion(text: &str) -> Result<ProductSuggestion> {
    let raw: RawSuggestion = serde_json::from_str(text)
        .map_err(|e| Error::external(format!("Could not read product suggestion: {e}")))?;

    Ok(ProductSuggestion {
        name: raw.name.trim().to_string(),
        category: Category::from_key_or_other(raw.category.trim().to_lowercase().as_str()),
        cost_price: raw.cost_price,
        selling_price: raw.selling_price,
    })
}

fn parse_insights(text: &str) -> Result<StoreInsights> {
    serde_json::from_str(text)
        .map_err(|e| Error::external(format!("Could not read store insights: {e}")))
}
