//! Router tests against a wiremock stand-in for OpenWeather.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use tower::ServiceExt;
use weather_core::{
    ChartRenderer, ChartSeries, FixedClock, HttpBackend, LookupOutcome, Panel, WeatherView,
};
use weather_server::{AppState, OpenWeatherClient, router};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn upstream_current() -> serde_json::Value {
    serde_json::json!({
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 29.4, "feels_like": 30.2, "pressure": 1009, "humidity": 48 },
        "wind": { "speed": 2.1 },
        "name": "Mumbai",
        "cod": 200
    })
}

fn upstream_forecast() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "list": [
            { "dt_txt": "2026-10-19 12:00:00", "main": { "temp": 30.0 }, "weather": [{ "description": "clear sky" }] },
            { "dt_txt": "2026-10-19 15:00:00", "main": { "temp": 31.5 }, "weather": [{ "description": "clear sky" }] },
            { "dt_txt": "2026-10-20 00:00:00", "main": { "temp": 26.0 }, "weather": [{ "description": "clear sky" }] }
        ]
    })
}

fn test_router(upstream: &MockServer) -> Router {
    router(
        AppState::new(OpenWeatherClient::new("TEST_KEY".to_string(), &upstream.uri())),
        None,
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("body must be JSON")
}

// ============================================================================
// Proxy routes
// ============================================================================

#[tokio::test]
async fn weather_forwards_city_key_and_metric_units() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Mumbai"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_current()))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = get(test_router(&upstream), "/api/weather?city=Mumbai").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), upstream_current());
}

#[tokio::test]
async fn forecast_is_passed_through() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Mumbai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_forecast()))
        .mount(&upstream)
        .await;

    let (status, body) = get(test_router(&upstream), "/api/forecast?city=Mumbai").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), upstream_forecast());
}

#[tokio::test]
async fn missing_or_blank_city_is_rejected() {
    let upstream = MockServer::start().await;

    for uri in ["/api/weather", "/api/weather?city=", "/api/forecast?city=%20%20"] {
        let (status, body) = get(test_router(&upstream), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json(&body), serde_json::json!({ "error": "City is required" }));
    }

    let requests = upstream.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn upstream_rejection_becomes_not_found() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&upstream)
        .await;

    let (status, body) = get(test_router(&upstream), "/api/weather?city=Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), serde_json::json!({ "error": "City not found" }));
}

#[tokio::test]
async fn unreadable_upstream_body_is_bad_gateway() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&upstream)
        .await;

    let (status, body) = get(test_router(&upstream), "/api/forecast?city=Pune").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json(&body), serde_json::json!({ "error": "Weather service unavailable" }));
}

#[tokio::test]
async fn site_directory_is_served() {
    let upstream = MockServer::start().await;
    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "<h1>weather</h1>").unwrap();

    let app = router(
        AppState::new(OpenWeatherClient::new("TEST_KEY".to_string(), &upstream.uri())),
        Some(site.path()),
    );

    let (status, body) = get(app.clone(), "/site/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>weather</h1>");

    let (status, _) = get(app, "/site/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Lookup cycle through the proxy
// ============================================================================

#[derive(Debug, Default)]
struct LastChart(Option<ChartSeries>);

impl ChartRenderer for LastChart {
    type Handle = ();

    fn render(&mut self, series: &ChartSeries) {
        self.0 = Some(series.clone());
    }

    fn destroy(&mut self, _handle: ()) {
        self.0 = None;
    }
}

#[tokio::test]
async fn view_renders_through_running_proxy() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_current()))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_forecast()))
        .mount(&upstream)
        .await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_router(&upstream);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let view = WeatherView::new(
        HttpBackend::new(format!("http://{addr}")),
        Panel::default(),
        LastChart::default(),
    )
    .with_clock(FixedClock(today.and_hms_opt(11, 0, 0).unwrap()));

    assert_eq!(view.lookup_and_render("Mumbai").await, LookupOutcome::Rendered);
    view.with_surface(|panel, chart| {
        assert_eq!(panel.location, "Mumbai");
        assert_eq!(panel.temperature, "29°");
        assert_eq!(panel.details, "Feels like 30°C. Pressure: 1009 hPa.");
        assert_eq!(
            panel.range_labels,
            Some(("LOW 30°C".to_string(), "HIGH 31.5°C".to_string()))
        );
        let series = chart.0.as_ref().expect("chart drawn");
        assert_eq!(series.labels(), vec!["12:00", "15:00"]);
    });

    // Unknown city: the proxy's 404 payload is what the banner shows.
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .mount(&upstream)
        .await;

    assert_eq!(view.lookup_and_render("Atlantis").await, LookupOutcome::NotFound);
    view.with_surface(|panel, _| {
        assert_eq!(panel.error.as_deref(), Some("City not found"));
        assert!(!panel.loading);
    });
}
