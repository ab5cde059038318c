//! Parameter advisor backed by an OpenAI-compatible chat-completion endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT},
    Client,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::AdvisoryConfig,
    domain::{AdvisorVerdict, ClimateReading, UserProfile},
    engine::recommendation::resolve_consumption,
};

use super::{AdvisoryError, ParameterAdvisor};

const SYSTEM_PROMPT: &str = "You are an expert in renewable energy and climatology. \
Analyse the data provided and produce precise recommendations for renewable energy \
systems based on location, climate and site conditions. Answer in JSON only.";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Clone)]
pub struct ChatCompletionAdvisor {
    client: Client,
    api_url: String,
    model: String,
}

impl ChatCompletionAdvisor {
    pub fn new(cfg: &AdvisoryConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("ecosmart-advisor/0.3"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .context("invalid advisory API key")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl ParameterAdvisor for ChatCompletionAdvisor {
    async fn evaluate(
        &self,
        profile: &UserProfile,
        climate: &ClimateReading,
    ) -> Result<AdvisorVerdict, AdvisoryError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(profile, climate)},
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!(model = %self.model, "requesting advisor verdict");
        let resp = self.client.post(&self.api_url).json(&payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status.as_u16()));
        }

        let chat: ChatResponse = resp.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AdvisoryError::MissingContent)?;

        let verdict = parse_verdict(&content)?;
        info!(best_option = ?verdict.best_option, "advisor verdict received");
        Ok(verdict)
    }
}

/// Decode the JSON object embedded in a chat answer
pub fn parse_verdict(content: &str) -> Result<AdvisorVerdict, AdvisoryError> {
    let json = extract_json_object(content).ok_or(AdvisoryError::MissingContent)?;
    serde_json::from_str(json).map_err(|e| AdvisoryError::Malformed(e.to_string()))
}

/// Slice from the first `{` to the last `}`, dropping any prose or code fences around it
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn build_prompt(profile: &UserProfile, climate: &ClimateReading) -> String {
    let coordinates = match (climate.latitude, climate.longitude) {
        (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
        _ => "unknown".to_string(),
    };
    let dwelling = profile
        .dwelling_type
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"Analyse the following data and recommend the best renewable energy system.

LOCATION AND CLIMATE:
- Location: {location}
- Coordinates: {coordinates}
- Solar irradiance: {irradiance} kWh/m²/day
- Wind speed: {wind} m/s
- Average temperature: {temperature} °C

USER DATA:
- Dwelling type: {dwelling}
- Available area: {area} m²
- Monthly consumption: {consumption:.0} kWh
- Main objective: {objective}

Determine:
1. Optimal factors for each technology (photovoltaic, wind, solar water heater)
2. The best option or combination of options
3. Recommended system efficiency, panel tilt, orientation and tower height where relevant
4. Estimated coverage percentage of each option
5. A short technical justification for each recommendation

Answer ONLY with JSON of this shape:
{{
  "best_option": "solar|wind|solar_thermal|combination",
  "justification": "short explanation of the main recommendation",
  "options": {{
    "solar": {{"viable": true, "system_efficiency": 85, "panel_tilt": 30, "orientation": "north", "estimated_coverage": 65, "justification": "..."}},
    "wind": {{"viable": false, "tower_height": 15, "recommended_capacity": 2.5, "estimated_coverage": 40, "justification": "..."}},
    "solar_thermal": {{"viable": true, "system_efficiency": 70, "optimal_tilt": 35, "estimated_coverage": 25, "justification": "..."}}
  }},
  "recommended_combination": {{"options": ["solar", "solar_thermal"], "combined_coverage": 85, "justification": "..."}}
}}"#,
        location = climate.location_label,
        irradiance = climate.solar_irradiance,
        wind = climate.wind_speed,
        temperature = climate.avg_temperature,
        area = profile.usable_area_m2(),
        consumption = resolve_consumption(profile),
        objective = profile.objective,
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}
