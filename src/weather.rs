use crate::config::WeatherConfig;
use crate::error::FetchError;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE: &str = "https://api.open-meteo.com";

/// Forecast endpoint base. May be overridden by OPEN_METEO_BASE (useful for tests).
pub fn base() -> String {
    std::env::var("OPEN_METEO_BASE").unwrap_or_else(|_| DEFAULT_BASE.into())
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    precipitation: f64,
    weather_code: u16,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
    daylight_duration: Vec<f64>,
    precipitation_hours: Vec<f64>,
}

/// Current conditions plus today's daily aggregates, already formatted for
/// the weather panel. Icon selection for the weather code is left to the
/// presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Local observation time, "HH:MM".
    pub observed_at: String,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub precipitation_mm: f64,
    pub weather_code: u16,
    pub is_day: bool,
    pub max_temperature_c: f64,
    pub min_temperature_c: f64,
    pub sunrise: String,
    pub sunset: String,
    pub daylight_hours: f64,
    pub precipitation_hours: f64,
}

/// One-shot fetch of the Open-Meteo forecast. The request names a timezone,
/// so all times in the response are already local.
pub async fn fetch_weather(
    client: &Client,
    base: &str,
    cfg: &WeatherConfig,
) -> Result<WeatherReport, FetchError> {
    let mut url = Url::parse(&format!("{}/v1/forecast", base))
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("latitude", &cfg.latitude.to_string())
        .append_pair("longitude", &cfg.longitude.to_string())
        .append_pair(
            "current",
            "temperature_2m,apparent_temperature,is_day,precipitation,weather_code",
        )
        .append_pair(
            "daily",
            "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,daylight_duration,precipitation_hours",
        )
        .append_pair("timezone", &cfg.timezone)
        .append_pair("forecast_days", &cfg.forecast_days.to_string());

    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let f: ForecastResponse = resp.json().await?;

    let daylight_secs = first(&f.daily.daylight_duration, "daylight_duration")?;
    Ok(WeatherReport {
        observed_at: format_time(&f.current.time),
        temperature_c: f.current.temperature_2m,
        apparent_temperature_c: f.current.apparent_temperature,
        precipitation_mm: f.current.precipitation,
        weather_code: f.current.weather_code,
        is_day: f.current.is_day == 1,
        max_temperature_c: first(&f.daily.temperature_2m_max, "temperature_2m_max")?,
        min_temperature_c: first(&f.daily.temperature_2m_min, "temperature_2m_min")?,
        sunrise: format_time(&first_str(&f.daily.sunrise, "sunrise")?),
        sunset: format_time(&first_str(&f.daily.sunset, "sunset")?),
        daylight_hours: (daylight_secs / 3600.0 * 100.0).round() / 100.0,
        precipitation_hours: first(&f.daily.precipitation_hours, "precipitation_hours")?,
    })
}

fn first(values: &[f64], field: &str) -> Result<f64, FetchError> {
    values
        .first()
        .copied()
        .ok_or_else(|| FetchError::Decode(format!("daily forecast missing {}", field)))
}

fn first_str(values: &[String], field: &str) -> Result<String, FetchError> {
    values
        .first()
        .cloned()
        .ok_or_else(|| FetchError::Decode(format!("daily forecast missing {}", field)))
}

/// "2024-05-14T06:32" -> "06:32". Unparseable input passes through unchanged.
pub fn format_time(iso: &str) -> String {
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| iso.to_string())
}
