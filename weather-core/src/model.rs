use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;

/// Current conditions for one city, decoded from `GET /api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub condition: String,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub location_name: String,
    pub icon: String,
}

/// One timestamped forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Raw `dt_txt` value, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub temperature_c: f64,
    pub description: String,
}

impl ForecastSample {
    /// Whether the sample's date component is `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.timestamp
            .starts_with(&date.format("%Y-%m-%d").to_string())
    }

    /// `HH:MM` part of the timestamp, `None` when the timestamp has no time component.
    pub fn time_label(&self) -> Option<&str> {
        let (_, time) = self.timestamp.split_once(' ')?;
        Some(time.get(..5).unwrap_or(time))
    }
}

/// Forecast samples in the order the backend returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    /// Samples falling on `date`, original order preserved.
    pub fn same_day(&self, date: NaiveDate) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter().filter(move |s| s.is_on(date))
    }
}

// Wire format of the backend, which passes OpenWeather payloads through.

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrentResponse {
    name: String,
    main: ApiMain,
    weather: Vec<ApiWeather>,
    wind: ApiWind,
}

impl TryFrom<ApiCurrentResponse> for CurrentConditions {
    type Error = BackendError;

    fn try_from(parsed: ApiCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("weather list is empty".to_string()))?;

        Ok(Self {
            condition: weather.main,
            description: weather.description,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            location_name: parsed.name,
            icon: weather.icon,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ApiForecastWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiForecastEntry {
    dt_txt: String,
    main: ApiForecastMain,
    #[serde(default)]
    weather: Vec<ApiForecastWeather>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastResponse {
    list: Vec<ApiForecastEntry>,
}

impl From<ApiForecastResponse> for ForecastSeries {
    fn from(parsed: ApiForecastResponse) -> Self {
        let samples = parsed
            .list
            .into_iter()
            .map(|entry| ForecastSample {
                timestamp: entry.dt_txt,
                temperature_c: entry.main.temp,
                description: entry
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.description)
                    .unwrap_or_default(),
            })
            .collect();

        Self { samples }
    }
}
