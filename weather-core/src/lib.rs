//! Core library for the weather view.
//!
//! This crate defines:
//! - The lookup cycle ([`WeatherView`]) that fetches a city's current
//!   conditions and forecast and renders them
//! - Abstractions over the backend, the render target, the chart and the clock
//! - Shared domain models and configuration handling
//!
//! It is used by `weather-cli` and `weather-server`, but can also be reused by
//! other front ends that implement [`RenderTarget`] and [`ChartRenderer`].

pub mod backend;
pub mod chart;
pub mod clock;
pub mod config;
pub mod model;
pub mod render;
pub mod view;

pub use backend::{BackendError, HttpBackend, WeatherBackend};
pub use chart::{ChartPoint, ChartRenderer, ChartSeries, TemperatureRange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ProviderConfig, ServerConfig};
pub use model::{CurrentConditions, ForecastSample, ForecastSeries};
pub use render::{CitySummary, Panel, RenderTarget};
pub use view::{LookupError, LookupOutcome, WeatherView};
