use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use weather_core::backend::truncate_body;

/// Failure fetching from OpenWeather.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to send request to OpenWeather: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeather JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// OpenWeather data endpoints the proxy forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Weather,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches `endpoint` for `city` in metric units and returns the JSON body untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self, endpoint: Endpoint, city: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint.as_str());

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Weather.as_str(), "weather");
        assert_eq!(Endpoint::Forecast.to_string(), "forecast");
    }

    #[test]
    fn status_error_mentions_body() {
        let err = UpstreamError::Status {
            status: 401,
            body: truncate_body(r#"{"cod":401,"message":"Invalid API key"}"#),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn long_rejection_body_is_truncated() {
        use wiremock::{Mock, MockServer, ResponseTemplate, matchers::path};

        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_string("x".repeat(500)))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new("KEY".to_string(), &server.uri());
        match client.fetch(Endpoint::Weather, "Pune").await {
            Err(UpstreamError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body.chars().count(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
