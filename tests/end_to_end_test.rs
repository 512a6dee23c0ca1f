use agr_map::core::report::GEOCODE_FAILURE_MESSAGE;
use agr_map::domain::model::ValueSource;
use agr_map::{build_estimator, AgrError, DataStrategy, TomlConfig};
use httpmock::prelude::*;

fn config_for(server: &MockServer, strategy: DataStrategy) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.geocoder.endpoint = server.url("/v3");
    config.geocoder.api_key = Some("test-key".to_string());
    config.geocoder.timeout_seconds = 5;
    config.statistics.endpoint = server.url("/sparql");
    config.statistics.timeout_seconds = 5;
    config.land_values.strategy = strategy;
    config
}

fn mock_geocode<'a>(server: &'a MockServer, words: &str, lat: f64, lng: f64) -> httpmock::Mock<'a> {
    let words = words.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/v3/convert-to-coordinates")
            .query_param("words", &words);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "country": "GB",
                "coordinates": {"lat": lat, "lng": lng},
                "words": words
            }));
    })
}

#[tokio::test]
async fn test_edinburgh_static_scenario() {
    let server = MockServer::start();
    let geocode_mock = mock_geocode(&server, "filled.count.soap", 56.0, -3.2);

    let config = config_for(&server, DataStrategy::Static);
    let estimator = build_estimator(&config).unwrap();
    let report = estimator.estimate("filled.count.soap").await.unwrap();

    geocode_mock.assert();
    assert_eq!(report.region.as_str(), "Edinburgh");
    assert_eq!(report.record.value_per_sqm, 1500.0);
    assert_eq!(report.estimate.agr, 675.0);
    assert_eq!(
        report.render_lines(),
        vec![
            "Coords: 56, -3.2".to_string(),
            "Estimated AGR: £675.00".to_string(),
            "Base: £1500.00/sqm (Edinburgh, static static-table)".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_highlands_static_scenario() {
    let server = MockServer::start();
    mock_geocode(&server, "index.home.raft", 55.0, -4.5);

    let config = config_for(&server, DataStrategy::Static);
    let estimator = build_estimator(&config).unwrap();
    let report = estimator.estimate("///index.home.raft").await.unwrap();

    assert_eq!(report.region.as_str(), "Highlands");
    assert_eq!(report.record.value_per_sqm, 50.0);
    assert_eq!(report.estimate.agr, 22.5);
    assert_eq!(report.agr_line(), "Estimated AGR: £22.50");
}

#[tokio::test]
async fn test_missing_coordinates_takes_failure_path() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v3/convert-to-coordinates");
        then.status(400).json_body(serde_json::json!({
            "error": {"code": "BadWords", "message": "Invalid or non-existent 3 word address"}
        }));
    });
    let sparql_mock = server.mock(|when, then| {
        when.method(POST).path("/sparql");
        then.status(200);
    });

    let config = config_for(&server, DataStrategy::Live);
    let estimator = build_estimator(&config).unwrap();
    let err = estimator.estimate("filled.count.soup").await.unwrap_err();

    assert!(matches!(err, AgrError::GeocodeFailure { .. }));
    assert_eq!(err.user_friendly_message(), GEOCODE_FAILURE_MESSAGE);
    sparql_mock.assert_hits(0);
}

#[tokio::test]
async fn test_live_failure_falls_back_to_default_value() {
    let server = MockServer::start();
    mock_geocode(&server, "filled.count.soap", 56.0, -3.2);
    let sparql_mock = server.mock(|when, then| {
        when.method(POST).path("/sparql");
        then.status(500);
    });

    let config = config_for(&server, DataStrategy::Live);
    let estimator = build_estimator(&config).unwrap();
    let report = estimator.estimate("filled.count.soap").await.unwrap();

    sparql_mock.assert();
    assert_eq!(report.record.source, ValueSource::Fallback);
    assert_eq!(report.record.value_per_sqm, 100.0);
    assert_eq!(report.estimate.agr, 45.0);
}

#[tokio::test]
async fn test_live_network_failure_falls_back() {
    let server = MockServer::start();
    mock_geocode(&server, "filled.count.soap", 56.0, -3.2);

    let mut config = config_for(&server, DataStrategy::Live);
    config.statistics.endpoint = "http://127.0.0.1:9/sparql".to_string();
    config.statistics.timeout_seconds = 1;

    let estimator = build_estimator(&config).unwrap();
    let report = estimator.estimate("filled.count.soap").await.unwrap();

    assert_eq!(report.record.source, ValueSource::Fallback);
    assert_eq!(report.record.value_per_sqm, 100.0);
}

#[tokio::test]
async fn test_live_lookups_are_cached_across_requests() {
    let server = MockServer::start();
    let geocode_mock = mock_geocode(&server, "filled.count.soap", 56.0, -3.2);
    let sparql_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/sparql")
            .header("accept", "application/sparql-results+json")
            .body_contains("Edinburgh");
        then.status(200)
            .header("Content-Type", "application/sparql-results+json")
            .json_body(serde_json::json!({
                "head": {"vars": ["areaname", "period", "value"]},
                "results": {"bindings": [{
                    "areaname": {"type": "literal", "value": "City of Edinburgh"},
                    "period": {"type": "literal", "value": "2021"},
                    "value": {"type": "literal", "value": "15.2"}
                }]}
            }));
    });

    let config = config_for(&server, DataStrategy::Live);
    let estimator = build_estimator(&config).unwrap();

    let first = estimator.estimate("filled.count.soap").await.unwrap();
    let second = estimator.estimate("filled.count.soap").await.unwrap();

    geocode_mock.assert_hits(2);
    sparql_mock.assert_hits(1);
    assert_eq!(first.record.source, ValueSource::Live);
    assert_eq!(first.record.period, "2021");
    assert_eq!(first.record.value_per_sqm, 152.0);
    assert_eq!(first.estimate.agr, second.estimate.agr);
    assert_eq!(first.estimate.agr, 68.4);
}

#[test]
fn test_missing_api_key_is_rejected() {
    let config = TomlConfig::default();
    let err = build_estimator(&config).err().unwrap();
    assert!(matches!(err, AgrError::MissingConfigError { .. }));
}

#[tokio::test]
async fn test_live_nan_statistic_falls_back() {
    let server = MockServer::start();
    mock_geocode(&server, "filled.count.soap", 56.0, -3.2);
    server.mock(|when, then| {
        when.method(POST).path("/sparql");
        then.status(200).json_body(serde_json::json!({
            "results": {"bindings": [{"value": {"type": "literal", "value": "NaN"}}]}
        }));
    });

    let config = config_for(&server, DataStrategy::Live);
    let estimator = build_estimator(&config).unwrap();
    let report = estimator.estimate("filled.count.soap").await.unwrap();

    assert_eq!(report.record.source, ValueSource::Fallback);
    assert_eq!(report.record.value_per_sqm, 100.0);
    assert_eq!(report.agr_line(), "Estimated AGR: £45.00");
}
