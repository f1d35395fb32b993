//! Integration tests for WeatherApiClient using wiremock.
//!
//! These tests verify request parameters and response normalization against a mock HTTP server.

use std::{sync::Arc, time::Duration};

use dashboard_core::{
    Config, PageKind, PageRenderPlanner, WeatherApiClient, WeatherError, WeatherSource,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Chennai", "country": "India" },
        "current": {
            "temp_c": 10.0,
            "feelslike_c": 8.4,
            "humidity": 50,
            "wind_kph": 18.0,
            "condition": { "text": "Light rain", "code": 1183 },
            "air_quality": { "pm2_5": 16.0 }
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2024-06-01",
                    "day": { "maxtemp_c": 14.0, "mintemp_c": 6.5 },
                    "hour": [
                        { "time": "2024-06-01 00:00", "temp_c": 7.1 },
                        { "time": "2024-06-01 01:00", "temp_c": 6.9 },
                        { "time": "2024-06-01 02:00", "temp_c": 6.5 }
                    ]
                },
                {
                    "date": "2024-06-02",
                    "day": { "maxtemp_c": 15.2, "mintemp_c": 7.0 },
                    "hour": []
                },
                {
                    "date": "2024-06-03",
                    "day": { "maxtemp_c": 17.8, "mintemp_c": 8.3 },
                    "hour": []
                }
            ]
        }
    })
}

fn client_for(server: &MockServer, timeout: Duration) -> WeatherApiClient {
    WeatherApiClient::new("TEST_KEY", format!("{}/v1", server.uri()), timeout).unwrap()
}

#[tokio::test]
async fn test_fetch_normalizes_forecast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "Chennai"))
        .and(query_param("days", "3"))
        .and(query_param("aqi", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let snapshot = client.fetch("Chennai").await.unwrap();

    assert_eq!(snapshot.city, "Chennai");
    assert_eq!(snapshot.temp_c, 10.0);
    assert_eq!(snapshot.condition, "Light rain");
    assert_eq!(snapshot.day_high_c, 14.0);
    assert_eq!(snapshot.night_low_c, 6.5);
    assert_eq!(snapshot.humidity_pct, 50);
    assert_eq!(snapshot.feels_like_c, 8.4);
    assert_eq!(snapshot.wind_kph, 18.0);

    let times: Vec<_> = snapshot.hourly.iter().map(|h| h.time_label.as_str()).collect();
    assert_eq!(times, vec!["00:00", "01:00", "02:00"]);

    let days: Vec<_> =
        snapshot.daily.iter().map(|d| (d.date_label.as_str(), d.max_temp_c)).collect();
    assert_eq!(days, vec![("2024-06-01", 14.0), ("2024-06-02", 15.2), ("2024-06-03", 17.8)]);
}

#[tokio::test]
async fn test_fetch_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let err = client.fetch("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::NotFound(ref msg) if msg.contains("No matching location")));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let err = client.fetch("Chennai").await.unwrap_err();

    assert!(matches!(err, WeatherError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_missing_forecast_is_transport_error() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body();
    body.as_object_mut().unwrap().remove("forecast");

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let err = client.fetch("Chennai").await.unwrap_err();

    assert!(matches!(err, WeatherError::Transport(ref msg) if msg.contains("malformed")));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_millis(100));
    let err = client.fetch("Chennai").await.unwrap_err();

    assert!(matches!(err, WeatherError::Transport(ref msg) if msg.contains("timed out")));
}

#[tokio::test]
async fn test_client_from_config_uses_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("key", "CONFIG_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let config = Config {
        api_key: Some("CONFIG_KEY".into()),
        base_url: Some(format!("{}/v1/", mock_server.uri())),
        ..Config::default()
    };

    let client = WeatherApiClient::from_config(&config).unwrap();
    assert!(client.fetch("Chennai").await.is_ok());
}

#[tokio::test]
async fn test_hourly_page_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let planner = PageRenderPlanner::new(Arc::new(client));
    let desc = planner.plan(PageKind::Hourly, "Chennai").await;

    let series = desc.series.expect("hourly page has a chart");
    assert_eq!(series.labels().len(), 3);
    assert_eq!(series.values(), &[7.1, 6.9, 6.5]);

    let advisory = desc.advisory.unwrap();
    assert_eq!(advisory.health_tip, "Cold weather: Stay warm and hydrated.");
    assert_eq!(advisory.travel_alert, "Rainy: Avoid unnecessary travel.");
    assert_eq!(advisory.activity_rec, "Rainy: Indoor activities recommended.");
}

#[tokio::test]
async fn test_placeholder_page_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let planner = PageRenderPlanner::new(Arc::new(client));
    let desc = planner.plan(PageKind::Allergy, "").await;

    assert_eq!(desc.panel.unwrap().title, "Allergy Tracker - ");
}
