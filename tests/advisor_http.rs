use async_trait::async_trait;
use ecosmart_advisor::{
    advisory::{AdvisoryError, ChatCompletionAdvisor, ParameterAdvisor},
    climate::ClimateProvider,
    config::AdvisoryConfig,
    controller::AdvisorController,
    domain::{BestOption, ClimateReading, Principal, RecommendationSource, Technology, UserProfile},
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{bearer_token, body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

const VERDICT: &str = r#"{
  "best_option": "combination",
  "justification": "High irradiance and calm winds",
  "options": {
    "solar": {"viable": true, "system_efficiency": 80, "panel_tilt": 30, "orientation": "north", "estimated_coverage": 70},
    "wind": {"viable": false, "estimated_coverage": 5},
    "solar_thermal": {"viable": true, "system_efficiency": 70, "optimal_tilt": 35, "estimated_coverage": 140}
  },
  "recommended_combination": {"options": ["solar", "solar_thermal"], "combined_coverage": 95, "justification": "Panels for power, collector for hot water"}
}"#;

struct Sunny;

#[async_trait]
impl ClimateProvider for Sunny {
    async fn lookup(&self, location: &str) -> ClimateReading {
        ClimateReading::measured(location, Some(-24.8), Some(-65.4), 5.8, 2.9, 19.0)
    }
}

fn advisor_for(server: &MockServer) -> ChatCompletionAdvisor {
    let cfg = AdvisoryConfig {
        enabled: true,
        api_url: format!("{}/chat/completions", server.uri()),
        api_key: "test-key".into(),
        http_timeout_seconds: 2,
        ..AdvisoryConfig::default()
    };
    ChatCompletionAdvisor::new(&cfg).unwrap()
}

fn chat_answer(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

#[tokio::test]
async fn test_verdict_is_decoded_from_fenced_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({"model": "deepseek-chat", "temperature": 0.3})))
        .respond_with(chat_answer(&format!("```json\n{VERDICT}\n```")))
        .expect(1)
        .mount(&server)
        .await;

    let climate = ClimateReading::measured("Salta", None, None, 5.8, 2.9, 19.0);
    let verdict = advisor_for(&server)
        .evaluate(&UserProfile::default(), &climate)
        .await
        .unwrap();
    assert_eq!(verdict.best_option, Some(BestOption::Combination));
    assert!(!verdict.options.wind.viable);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let climate = ClimateReading::estimated("x", None, None);
    let err = advisor_for(&server)
        .evaluate(&UserProfile::default(), &climate)
        .await
        .unwrap_err();
    assert!(matches!(err, AdvisoryError::Status(429)));
}

#[tokio::test]
async fn test_answer_without_json_is_missing_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_answer("I cannot help with that."))
        .mount(&server)
        .await;

    let climate = ClimateReading::estimated("x", None, None);
    let err = advisor_for(&server)
        .evaluate(&UserProfile::default(), &climate)
        .await
        .unwrap_err();
    assert!(matches!(err, AdvisoryError::MissingContent));
}

#[tokio::test]
async fn test_diagnosis_uses_advisor_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_answer(VERDICT))
        .mount(&server)
        .await;

    let controller = AdvisorController::new(Arc::new(Sunny), "-34.6037,-58.3816".into())
        .with_parameter_advisor(Arc::new(advisor_for(&server)), Duration::from_secs(2));
    let diagnosis = controller.diagnose(&UserProfile::default(), Some("Salta")).await;
    let rec = diagnosis.recommendation;

    assert_eq!(rec.source, RecommendationSource::Advisor);
    assert_eq!(rec.options.len(), 2);
    assert!(rec.option(Technology::Wind).is_none());
    // Advisor coverage is clamped
    assert_eq!(rec.option(Technology::SolarThermal).map(|o| o.coverage_pct), Some(100.0));
    assert!(rec.options.iter().all(|o| o.detail.is_tuned()));
    match rec.principal {
        Some(Principal::Combination(c)) => {
            assert_eq!(c.technologies, [Technology::Solar, Technology::SolarThermal]);
        }
        other => panic!("expected a combination, got {other:?}"),
    }
}

#[tokio::test]
async fn test_diagnosis_falls_back_when_advisor_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let controller = AdvisorController::new(Arc::new(Sunny), "-34.6037,-58.3816".into())
        .with_parameter_advisor(Arc::new(advisor_for(&server)), Duration::from_secs(2));
    let diagnosis = controller.diagnose(&UserProfile::default(), Some("Salta")).await;
    assert_eq!(diagnosis.recommendation.source, RecommendationSource::StaticRules);
    assert!(diagnosis.recommendation.justification.is_none());
}
