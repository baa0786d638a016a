//! Chart input and the renderer abstraction the view draws through.

use chrono::NaiveDate;

use crate::{backend::BackendError, model::ForecastSeries};

pub const DATASET_LABEL: &str = "Hourly Temperature (°C)";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Time of day, `HH:MM`.
    pub label: String,
    pub temperature_c: f64,
    pub description: String,
}

impl ChartPoint {
    pub fn tooltip(&self) -> String {
        format!("Temp: {}°C, {}", self.temperature_c, self.description)
    }
}

/// Line chart data: x-axis time labels, y-axis temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Builds the series from the forecast samples falling on `today`.
    pub fn same_day(forecast: &ForecastSeries, today: NaiveDate) -> Result<Self, BackendError> {
        let points = forecast
            .same_day(today)
            .map(|sample| -> Result<ChartPoint, BackendError> {
                let label = sample.time_label().ok_or_else(|| {
                    BackendError::Decode(format!("timestamp without time: {}", sample.timestamp))
                })?;
                Ok(ChartPoint {
                    label: label.to_string(),
                    temperature_c: sample.temperature_c,
                    description: sample.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            label: DATASET_LABEL.to_string(),
            points,
        })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.temperature_c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest temperature, `None` for an empty series.
    pub fn range(&self) -> Option<TemperatureRange> {
        let mut temps = self.points.iter().map(|p| p.temperature_c);
        let first = temps.next()?;
        let (low, high) = temps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(TemperatureRange { low, high })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub low: f64,
    pub high: f64,
}

impl TemperatureRange {
    pub fn low_label(&self) -> String {
        format!("LOW {}°C", self.low)
    }

    pub fn high_label(&self) -> String {
        format!("HIGH {}°C", self.high)
    }
}

/// Draws charts and hands back a handle that can later destroy them.
pub trait ChartRenderer {
    type Handle: Send;

    fn render(&mut self, series: &ChartSeries) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}
