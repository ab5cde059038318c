use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

use crate::controller::AppState;
use crate::domain::{ClimateReading, UserProfile};
use crate::engine;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: &'static str,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    engine: ComponentHealth,
    parameter_advisor: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error),
        }
    }

    /// Present but not probed
    fn configured() -> Self {
        Self {
            status: "configured".to_string(),
            latency_ms: None,
            error: None,
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled".to_string(),
            latency_ms: None,
            error: None,
        }
    }
}

/// GET /health
///
/// Runs a recommendation on the default climate reading. External providers
/// are not probed: their failures never fail a request.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let engine_health = check_engine();
    let all_healthy = engine_health.status == "healthy";

    let parameter_advisor = advisor_health(state.advisor.has_parameter_advisor());

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            engine: engine_health,
            parameter_advisor,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    tracing::debug!(healthy = all_healthy, "health check completed");

    (status_code, Json(response))
}

fn advisor_health(configured: bool) -> ComponentHealth {
    if configured {
        ComponentHealth::configured()
    } else {
        ComponentHealth::disabled()
    }
}

fn check_engine() -> ComponentHealth {
    let start = Instant::now();
    let climate = ClimateReading::estimated("health", None, None);
    let rec = engine::compute_recommendation(&UserProfile::default(), &climate);
    if rec.monthly_consumption_kwh.is_finite() {
        ComponentHealth::healthy(start.elapsed().as_millis() as u64)
    } else {
        ComponentHealth::unhealthy("engine produced a non-finite consumption".into())
    }
}

/// GET /health/ready
pub async fn readiness_check(State(_state): State<AppState>) -> impl IntoResponse {
    if check_engine().status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health_unhealthy() {
        let health = ComponentHealth::unhealthy("engine broke".to_string());
        assert_eq!(health.status, "unhealthy");
        assert!(health.latency_ms.is_none());
        assert_eq!(health.error, Some("engine broke".to_string()));
    }

    #[test]
    fn test_configured_advisor_reports_no_latency() {
        let health = advisor_health(true);
        assert_eq!(health.status, "configured");
        assert!(health.latency_ms.is_none());
        assert_eq!(advisor_health(false).status, "disabled");
    }

    #[test]
    fn test_engine_check_is_healthy() {
        assert_eq!(check_engine().status, "healthy");
    }
}
