use ecosmart_advisor::{
    climate::{ClimateError, ClimateProvider, Location, OpenMeteoClient},
    config::ClimateConfig,
    domain::ClimateSource,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> OpenMeteoClient {
    let cfg = ClimateConfig {
        geocoding_url: server.uri(),
        archive_url: server.uri(),
        forecast_url: server.uri(),
        http_timeout_seconds: 2,
        lookup_timeout_seconds: 3,
        ..ClimateConfig::default()
    };
    OpenMeteoClient::new(&cfg).unwrap()
}

async fn mount_series(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("windspeed_unit", "ms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {
                "temperature_2m_mean": [18.0, 20.0, null],
                "windspeed_10m_mean": [3.0, 4.0]
            }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("daily", "shortwave_radiation_sum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": { "shortwave_radiation_sum": [18.0, 21.6] }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_coordinates_skip_geocoding() {
    let server = MockServer::start().await;
    mount_series(&server).await;

    let reading = client_for(&server)
        .try_lookup(&Location::parse("-31.4,-64.2").unwrap())
        .await
        .unwrap();

    assert_eq!(reading.source, ClimateSource::Measured);
    assert_eq!(reading.latitude, Some(-31.4));
    assert_eq!(reading.solar_irradiance, 5.5);
    assert_eq!(reading.wind_speed, 3.5);
    assert_eq!(reading.avg_temperature, 19.0);
}

#[tokio::test]
async fn test_place_is_geocoded_with_default_country() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Córdoba, Argentina"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "-31.4167", "lon": "-64.1833", "display_name": "Córdoba, Argentina"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_series(&server).await;

    let reading = client_for(&server).lookup("Córdoba").await;
    assert_eq!(reading.source, ClimateSource::Measured);
    assert_eq!(reading.location_label, "Córdoba, Argentina");
    assert_eq!(reading.longitude, Some(-64.1833));
}

#[tokio::test]
async fn test_unknown_place_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .try_lookup(&Location::parse("Atlantis").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClimateError::NotFound(_)));
}

#[tokio::test]
async fn test_server_error_falls_back_to_estimate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let reading = client_for(&server).lookup("-34.6,-58.4").await;
    assert!(reading.is_estimated());
    assert_eq!(reading.solar_irradiance, 4.2);
    assert_eq!(reading.latitude, Some(-34.6));
}

#[tokio::test]
async fn test_empty_series_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"daily": {}})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .try_lookup(&Location::parse("10,10").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClimateError::EmptySeries));
}

#[tokio::test]
#[ignore = "hits the public Open-Meteo and Nominatim services"]
async fn test_live_lookup() {
    let client = OpenMeteoClient::new(&ClimateConfig::default()).unwrap();
    let reading = client.lookup("Mendoza").await;
    assert_eq!(reading.source, ClimateSource::Measured);
}
