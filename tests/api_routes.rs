use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ecosmart_advisor::{
    advisory::RuleBasedAdvisor,
    api,
    climate::ClimateProvider,
    config::Config,
    controller::{AdvisorController, AppState},
    domain::ClimateReading,
    engine::impact,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedClimate;

#[async_trait]
impl ClimateProvider for FixedClimate {
    async fn lookup(&self, location: &str) -> ClimateReading {
        ClimateReading::measured(location, None, None, 5.2, 3.8, 18.0)
    }
}

fn app() -> Router {
    let cfg = Config::default();
    let controller = AdvisorController::new(Arc::new(FixedClimate), cfg.simulator.default_location.clone())
        .with_text_generator(Arc::new(RuleBasedAdvisor));
    let state = AppState::from_parts(cfg.clone(), controller);
    api::router(state, &cfg)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_diagnosis_returns_recommendation_and_advice() {
    let (status, body) = send(post(
        "/api/v1/diagnosis",
        json!({
            "location": "Córdoba",
            "dwelling_type": "medium_house",
            "monthly_consumption_kwh": 300,
            "available_area_m2": "80",
            "objective": "savings",
            "appliances": ["air_conditioning"]
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["climate"]["location_label"], "Córdoba");
    assert_eq!(data["recommendation"]["source"], "static_rules");
    assert_eq!(data["recommendation"]["options"][0]["technology"], "solar");
    assert!(data["advice"]["principal_recommendation"].is_string());
    assert!(data.get("substituted_inputs").is_none());
}

#[tokio::test]
async fn test_diagnosis_reports_substitutions() {
    let (status, body) = send(post(
        "/api/v1/diagnosis",
        json!({"monthly_consumption_kwh": -5, "available_area_m2": "lots", "dwelling_type": "igloo"}),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let fields: Vec<&str> = body["data"]["substituted_inputs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["field"].as_str())
        .collect();
    assert!(fields.contains(&"location"));
    assert!(fields.contains(&"monthly_consumption_kwh"));
    // Unknown dwelling falls back to the generic 350 kWh estimate
    assert_eq!(body["data"]["recommendation"]["monthly_consumption_kwh"], 350.0);
}

#[tokio::test]
async fn test_simulation_substitutes_capacity() {
    let (status, body) = send(post(
        "/api/v1/simulation",
        json!({"technology": "solar", "capacity": 0, "location": "-31.4,-64.2", "monthly_consumption_kwh": 300}),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["capacity"], 1.0);
    assert_eq!(body["data"]["substituted_inputs"][0]["field"], "capacity");
}

#[tokio::test]
async fn test_unknown_technology_is_bad_request() {
    let (status, body) = send(post("/api/v1/simulation", json!({"technology": "bogus"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UnsupportedTechnology");
    assert!(body["details"].as_str().unwrap().contains("solar_thermal"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::post("/api/v1/simulation")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn test_consumption_estimate() {
    let (status, body) = send(post(
        "/api/v1/consumption/estimate",
        json!({"dwelling_type": "apartment", "appliances": ["pool", "unknown_gadget"]}),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["monthly_consumption_kwh"].as_f64().unwrap() > 0.0);
    assert_eq!(body["data"]["appliances"], json!(["pool"]));
}

#[tokio::test]
async fn test_climate_lookup_uses_default_location() {
    let request = Request::get("/api/v1/climate").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["solar_irradiance"], 5.2);
    assert_eq!(body["data"]["location_label"], "-34.6037,-58.3816");
}

#[tokio::test]
async fn test_constants_match_simulation_economics() {
    let request = Request::get("/api/v1/constants").body(Body::empty()).unwrap();
    let (status, constants) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(constants["data"]["viability"].as_array().unwrap().len(), 3);
    let price = constants["data"]["price_per_kwh"].as_f64().unwrap();
    let co2 = constants["data"]["co2_kg_per_kwh"].as_f64().unwrap();
    assert_eq!(price, impact::PRICE_PER_KWH);

    let (_, sim) = send(post(
        "/api/v1/simulation",
        json!({"technology": "solar", "capacity": 3, "location": "-31.4,-64.2", "monthly_consumption_kwh": 300}),
    ))
    .await;
    let annual = sim["data"]["annual_generation_kwh"].as_f64().unwrap();
    let savings = sim["data"]["annual_savings"].as_f64().unwrap();
    let co2_avoided = sim["data"]["environmental_metrics"]["co2_avoided_kg_year"].as_f64().unwrap();
    assert!((savings - annual * price).abs() < 1e-6);
    assert!((co2_avoided - annual * co2).abs() < 1e-6);
}

#[tokio::test]
async fn test_health_probes() {
    let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["parameter_advisor"]["status"], "disabled");
    assert!(body["checks"]["parameter_advisor"].get("latency_ms").is_none());

    let (status, _) = send(Request::get("/health/live").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(Request::get("/health/ready").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
}
