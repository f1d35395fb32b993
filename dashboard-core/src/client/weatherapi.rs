use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    config::Config,
    error::WeatherError,
    model::{DailyPoint, HourlyPoint, WeatherSnapshot},
};

use super::WeatherSource;

/// Forecast horizon requested from the provider. The daily series never exceeds it.
const FORECAST_DAYS: &str = "3";

const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Client for the WeatherAPI.com `forecast.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key, config.base_url(), config.timeout())?)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/forecast.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", FORECAST_DAYS),
                ("aqi", "yes"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, "forecast request rejected");
            return Err(WeatherError::NotFound(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: WaForecastResponse = serde_json::from_str(&body)?;
        let snapshot = parsed.into_snapshot()?;

        info!(
            city = %snapshot.city,
            hours = snapshot.hourly.len(),
            days = snapshot.daily.len(),
            "fetched forecast"
        );

        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl WaForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let mut days = self.forecast.forecastday.into_iter();
        let first = days.next().ok_or_else(|| {
            WeatherError::Transport("forecast response contained no forecastday data".into())
        })?;

        let hourly = first
            .hour
            .iter()
            .map(|h| {
                hour_label(&h.time).map(|time_label| HourlyPoint { time_label, temp_c: h.temp_c })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let day_high_c = first.day.maxtemp_c;
        let night_low_c = first.day.mintemp_c;

        let daily = std::iter::once(first)
            .chain(days)
            .map(|d| DailyPoint { date_label: d.date, max_temp_c: d.day.maxtemp_c })
            .collect();

        Ok(WeatherSnapshot {
            city: self.location.name,
            temp_c: self.current.temp_c,
            condition: self.current.condition.text,
            day_high_c,
            night_low_c,
            humidity_pct: self.current.humidity,
            feels_like_c: self.current.feelslike_c,
            wind_kph: self.current.wind_kph,
            hourly,
            daily,
        })
    }
}

/// `2024-06-01 13:00` -> `13:00`
fn hour_label(time: &str) -> Result<String, WeatherError> {
    NaiveDateTime::parse_from_str(time, HOUR_FORMAT)
        .map(|dt| dt.format("%H:%M").to_string())
        .map_err(|e| WeatherError::Transport(format!("unexpected hour timestamp '{time}': {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
