use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the persisted Spotify credential file.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Delay between poll cycles, measured from the end of the previous cycle.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-request timeout so one slow cycle cannot starve the schedule.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Track/artist text longer than this many characters scrolls as a marquee.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: usize,

    /// Image reference shown when no album art is available.
    #[serde(default = "default_fallback_image")]
    pub fallback_image: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

fn default_credentials_path() -> PathBuf { "/var/lib/now-playing-kiosk/spotify_token".into() }
fn default_poll_interval() -> u64 { 5000 }
fn default_request_timeout() -> u64 { 10 }
fn default_scroll_threshold() -> usize { 20 }
fn default_fallback_image() -> String { "spotify_logo.jpg".into() }
fn default_log_dir() -> PathBuf { "/var/log/now-playing-kiosk".into() }
fn default_latitude() -> f64 { 41.80968 }
fn default_longitude() -> f64 { -87.5968 }
fn default_timezone() -> String { "America/Chicago".into() }
fn default_forecast_days() -> u32 { 1 }

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }
}
