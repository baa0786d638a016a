use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::{
    Config,
    model::{
        ApiCurrentResponse, ApiErrorBody, ApiForecastResponse, CurrentConditions, ForecastSeries,
    },
};

/// Failure talking to the weather backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("backend responded with status {status}")]
    Status {
        status: u16,
        /// `error` field of the JSON payload, when the endpoint reports one.
        message: Option<String>,
    },

    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed backend response: {0}")]
    Decode(String),
}

/// Source of current conditions and forecasts for a city.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentConditions, BackendError>;

    async fn forecast(&self, city: &str) -> Result<ForecastSeries, BackendError>;
}

/// Client for the `/api/weather` and `/api/forecast` endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(
        &self,
        path: &str,
        city: &str,
    ) -> Result<(reqwest::StatusCode, String), BackendError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self.http.get(&url).query(&[("city", city)]).send().await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%url, %status, bytes = body.len(), "backend responded");

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<CurrentConditions, BackendError> {
        let (status, body) = self.get("/api/weather", city).await?;

        if !status.is_success() {
            let payload: ApiErrorBody = serde_json::from_str(&body).map_err(|e| {
                BackendError::Decode(format!("error payload ({e}): {}", truncate_body(&body)))
            })?;
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: payload.error,
            });
        }

        let parsed: ApiCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            BackendError::Decode(format!("current conditions ({e}): {}", truncate_body(&body)))
        })?;

        CurrentConditions::try_from(parsed)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<ForecastSeries, BackendError> {
        let (status, body) = self.get("/api/forecast", city).await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: None,
            });
        }

        let parsed: ApiForecastResponse = serde_json::from_str(&body).map_err(|e| {
            BackendError::Decode(format!("forecast ({e}): {}", truncate_body(&body)))
        })?;

        Ok(parsed.into())
    }
}

/// Shortens a response body for error messages and logs, on a char boundary.
pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
