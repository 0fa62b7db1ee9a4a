//! Weather lookup and disease-risk rules
//!
//! Current conditions come from an OpenWeatherMap-compatible endpoint. The
//! risk assessment is a static rule table over temperature, humidity and the
//! reported condition group.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current conditions for a place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub place: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// Condition group such as `Rain` or `Clear`
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub message: &'static str,
}

fn is_wet(condition: &str) -> bool {
    matches!(
        condition.to_ascii_lowercase().as_str(),
        "rain" | "drizzle" | "thunderstorm"
    )
}

/// Qualitative fungal disease risk for the given conditions
pub fn assess_disease_risk(temperature: f64, humidity: f64, condition: &str) -> RiskAssessment {
    let wet = is_wet(condition);
    let mild = (15.0..=30.0).contains(&temperature);

    if (wet && humidity >= 80.0) || (mild && humidity >= 85.0) {
        RiskAssessment {
            level: RiskLevel::High,
            message: "Warm, wet conditions strongly favour blight and other fungal diseases. \
                      Inspect crops daily and apply preventive fungicide.",
        }
    } else if wet || humidity >= 70.0 || (mild && humidity >= 60.0) {
        RiskAssessment {
            level: RiskLevel::Moderate,
            message: "Humidity is elevated. Keep foliage dry, improve air circulation \
                      and watch lower leaves for early lesions.",
        }
    } else {
        RiskAssessment {
            level: RiskLevel::Low,
            message: "Current conditions are unfavourable for most fungal diseases. \
                      Continue routine monitoring.",
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Deserialize)]
struct Payload {
    name: String,
    main: MainPayload,
    #[serde(default)]
    wind: WindPayload,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
}

#[derive(Deserialize)]
struct MainPayload {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Deserialize, Default)]
struct WindPayload {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize)]
struct ConditionPayload {
    main: String,
    #[serde(default)]
    description: String,
}

/// Parse a current-weather response body
pub fn parse_conditions(body: &str) -> CoreResult<Conditions> {
    let payload: Payload = serde_json::from_str(body)
        .map_err(|e| CoreError::Weather(format!("unexpected response: {}", e)))?;

    let (condition, description) = payload
        .weather
        .into_iter()
        .next()
        .map(|c| (c.main, c.description))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

    Ok(Conditions {
        place: payload.name,
        temperature: payload.main.temp,
        feels_like: payload.main.feels_like,
        humidity: payload.main.humidity,
        wind_speed: payload.wind.speed,
        condition,
        description,
    })
}

/// HTTP client for current conditions
pub struct WeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Current conditions for `place`, or `None` when the place is unknown
    pub async fn current(&self, place: &str) -> CoreResult<Option<Conditions>> {
        let place = place.trim();
        if place.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Fetching weather for {}", place);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", place),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CoreError::Weather(format!(
                "weather service returned {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_conditions(&body).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 21.4, "feels_like": 21.9, "temp_min": 20.0, "temp_max": 23.0, "pressure": 1012, "humidity": 88},
        "wind": {"speed": 3.6, "deg": 200},
        "name": "Nairobi",
        "cod": 200
    }"#;

    #[test]
    fn test_parse_conditions() {
        let conditions = parse_conditions(SAMPLE).unwrap();
        assert_eq!(conditions.place, "Nairobi");
        assert_eq!(conditions.condition, "Rain");
        assert_eq!(conditions.description, "light rain");
        assert!((conditions.humidity - 88.0).abs() < f64::EPSILON);
        assert!((conditions.wind_speed - 3.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_without_weather_entries() {
        let body = r#"{"name": "X", "main": {"temp": 1.0, "feels_like": 0.0, "humidity": 10}}"#;
        let conditions = parse_conditions(body).unwrap();
        assert_eq!(conditions.condition, "Unknown");
        assert_eq!(conditions.wind_speed, 0.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_conditions("{}"), Err(CoreError::Weather(_))));
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(assess_disease_risk(22.0, 90.0, "Clouds").level, RiskLevel::High);
        assert_eq!(assess_disease_risk(8.0, 82.0, "Rain").level, RiskLevel::High);
        assert_eq!(assess_disease_risk(8.0, 50.0, "Drizzle").level, RiskLevel::Moderate);
        assert_eq!(assess_disease_risk(25.0, 65.0, "Clear").level, RiskLevel::Moderate);
        assert_eq!(assess_disease_risk(35.0, 72.0, "Clear").level, RiskLevel::Moderate);
        assert_eq!(assess_disease_risk(32.0, 30.0, "Clear").level, RiskLevel::Low);
    }

    #[test]
    fn test_condition_case_insensitive() {
        assert_eq!(assess_disease_risk(20.0, 81.0, "THUNDERSTORM").level, RiskLevel::High);
    }

    fn client_for(server: &mockito::Server) -> WeatherClient {
        let mut config = WeatherConfig::new("test-key");
        config.base_url = format!("{}/data/2.5/weather", server.url());
        WeatherClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_current_sends_metric_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("q".into(), "Nairobi".into()),
                mockito::Matcher::UrlEncoded("appid".into(), "test-key".into()),
                mockito::Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE)
            .expect(1)
            .create_async()
            .await;

        let conditions = client_for(&server).current("  Nairobi ").await.unwrap().unwrap();
        assert_eq!(conditions.place, "Nairobi");
        assert!((conditions.temperature - 21.4).abs() < f64::EPSILON);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_current_unknown_place() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(r#"{"cod":"404","message":"city not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.current("Atlantis").await.unwrap().is_none());
        assert!(client.current("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let result = client_for(&server).current("Nairobi").await;
        assert!(matches!(result, Err(CoreError::Weather(_))));
    }
}
