//! # Weather Provider
//!
//! Fetches current conditions from OpenWeatherMap and converts them into the
//! key/value [`WeatherMessage`] the watchface's weather inbox understands.
//!
//! ## Conversions
//! - Temperatures arrive in Kelvin and are rounded to whole degrees Celsius
//! - The condition group (`weather[0].main`, e.g. "Clouds") is lowercased
//!
//! ## Failure Handling
//! A failed fetch is reported as a [`WeatherError`]; the caller then shows the
//! "unavailable" marker via [`unavailable_message`], which carries zeros and
//! the `X` conditions marker, so the display never stalls on "loading...".

use crate::config::WeatherConfig;
use crate::status::{MessageKey, Tuple, TupleValue, WeatherMessage};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Offset between Kelvin and Celsius
const KELVIN_OFFSET: f64 = 273.15;

/// Errors that can occur while fetching weather.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("malformed weather response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response carried no condition entries
    #[error("weather response has no conditions")]
    MissingConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: Readings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

/// Round a Kelvin temperature to whole degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET).round() as i32
}

/// Convert an OpenWeatherMap current-weather body into a weather message.
pub fn parse_current_weather(body: &str) -> Result<WeatherMessage, WeatherError> {
    let current: CurrentWeather = serde_json::from_str(body)?;
    let condition = current
        .weather
        .first()
        .ok_or(WeatherError::MissingConditions)?;

    Ok(vec![
        Tuple::new(
            MessageKey::Temperature,
            TupleValue::Int(kelvin_to_celsius(current.main.temp)),
        ),
        Tuple::new(
            MessageKey::Low,
            TupleValue::Int(kelvin_to_celsius(current.main.temp_min)),
        ),
        Tuple::new(
            MessageKey::High,
            TupleValue::Int(kelvin_to_celsius(current.main.temp_max)),
        ),
        Tuple::new(
            MessageKey::Conditions,
            TupleValue::Text(condition.main.to_lowercase()),
        ),
    ])
}

/// Message sent when no weather can be obtained.
pub fn unavailable_message() -> WeatherMessage {
    vec![
        Tuple::new(MessageKey::Temperature, TupleValue::Int(0)),
        Tuple::new(MessageKey::Low, TupleValue::Int(0)),
        Tuple::new(MessageKey::High, TupleValue::Int(0)),
        Tuple::new(MessageKey::Conditions, TupleValue::Text("X".to_string())),
    ]
}

/// HTTP client for the configured weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: String,
    params: Vec<(&'static str, String)>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut params = vec![
            ("lat", config.latitude.to_string()),
            ("lon", config.longitude.to_string()),
        ];
        if !config.api_key.is_empty() {
            params.push(("appid", config.api_key.clone()));
        }

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            params,
        })
    }

    /// Fetch current conditions.
    pub async fn fetch(&self) -> Result<WeatherMessage, WeatherError> {
        debug!(endpoint = %self.endpoint, "requesting weather");
        let body = self
            .http
            .get(&self.endpoint)
            .query(&self.params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_current_weather(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::WeatherInbox;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -70.26, "lat": 43.66},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
        "main": {"temp": 285.3, "feels_like": 284.1, "temp_min": 281.0, "temp_max": 288.7, "humidity": 71},
        "name": "Portland"
    }"#;

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(kelvin_to_celsius(273.15), 0);
        assert_eq!(kelvin_to_celsius(285.3), 12);
        assert_eq!(kelvin_to_celsius(263.0), -10);
    }

    #[test]
    fn test_parse_current_weather() {
        let message = parse_current_weather(SAMPLE).unwrap();

        assert_eq!(message.len(), 4);
        assert_eq!(message[0].value, TupleValue::Int(12));
        assert_eq!(message[1].value, TupleValue::Int(8));
        assert_eq!(message[2].value, TupleValue::Int(16));
        assert_eq!(message[3].value, TupleValue::Text("clouds".to_string()));

        let mut inbox = WeatherInbox::new();
        assert_eq!(inbox.receive(&message), "12C (8/16) clouds");
    }

    #[test]
    fn test_parse_rejects_missing_conditions() {
        let body = r#"{"weather": [], "main": {"temp": 280.0, "temp_min": 279.0, "temp_max": 281.0}}"#;
        assert!(matches!(
            parse_current_weather(body),
            Err(WeatherError::MissingConditions)
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_current_weather("<html>502</html>"),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_unavailable_message_shows_marker() {
        let mut inbox = WeatherInbox::new();
        assert_eq!(inbox.receive(&unavailable_message()), "X");
    }

    #[test]
    fn test_client_query_params() {
        let mut config = WeatherConfig::default();
        config.api_key = "abc".to_string();

        let client = WeatherClient::new(&config).unwrap();
        let keys: Vec<_> = client.params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["lat", "lon", "appid"]);
    }
}
