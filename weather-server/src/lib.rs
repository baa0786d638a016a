//! Backend proxy for the weather view.
//!
//! Serves `/api/weather` and `/api/forecast` by forwarding to OpenWeather with
//! the server-side API key, so clients never see the key. Static pages can be
//! served from a directory under `/site`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::{path::Path, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

pub mod upstream;

pub use upstream::{Endpoint, OpenWeatherClient, UpstreamError};

#[derive(Debug, Clone)]
pub struct AppState {
    upstream: Arc<OpenWeatherClient>,
}

impl AppState {
    pub fn new(upstream: OpenWeatherClient) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: Option<String>,
}

/// Builds the proxy router; `site_dir`, when set, is served under `/site`.
pub fn router(state: AppState, site_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/weather", get(weather))
        .route("/api/forecast", get(forecast))
        .with_state(state);

    if let Some(dir) = site_dir {
        router = router.nest_service("/site", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http())
}

async fn weather(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Response {
    proxy(&state, Endpoint::Weather, query).await
}

async fn forecast(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Response {
    proxy(&state, Endpoint::Forecast, query).await
}

async fn proxy(state: &AppState, endpoint: Endpoint, query: CityQuery) -> Response {
    let Some(city) = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "City is required");
    };

    match state.upstream.fetch(endpoint, city).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(UpstreamError::Status { status, body }) => {
            info!(%endpoint, city, status, body = %body, "upstream rejected city");
            error_response(StatusCode::NOT_FOUND, "City not found")
        }
        Err(err) => {
            warn!(%endpoint, city, error = %err, "upstream unavailable");
            error_response(StatusCode::BAD_GATEWAY, "Weather service unavailable")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
