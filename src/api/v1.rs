use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{collections::BTreeSet, str::FromStr, time::Instant};
use strum::IntoEnumIterator;
use tracing::warn;
use validator::Validate;

use super::{error::ApiError, response::ApiResponse};
use crate::{
    controller::{AppState, Diagnosis},
    domain::{
        Appliance, ClimateReading, DwellingType, Objective, SimulationResult, SubstitutedInput,
        Technology, UserProfile, DEFAULT_AVAILABLE_AREA_M2,
    },
    engine::{impact, potential},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/diagnosis", post(diagnose))
        .route("/simulation", post(simulate))
        .route("/consumption/estimate", post(estimate_consumption))
        .route("/climate", get(climate))
        .route("/constants", get(constants))
}

// ============================================================================
// Lenient field decoding
// ============================================================================

/// A number, or a string holding one. Anything else decodes to `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(supplied = %s, "ignoring non-numeric value");
                None
            }
        },
        Some(other) => {
            warn!(supplied = %other, "ignoring non-numeric value");
            None
        }
    })
}

/// A known variant name. Unknown or non-string values decode to `None`.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match T::from_str(s.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(supplied = %s, "ignoring unknown value");
                None
            }
        },
        Some(other) => {
            warn!(supplied = %other, "ignoring unknown value");
            None
        }
    })
}

/// Appliance names, either as a list or a comma separated string. Unknown names are dropped.
fn lenient_appliances<'de, D>(deserializer: D) -> Result<BTreeSet<Appliance>, D::Error>
where
    D: Deserializer<'de>,
{
    let names: Vec<String> = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    Ok(names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter_map(|n| match Appliance::from_str(n) {
            Ok(a) => Some(a),
            Err(_) => {
                warn!(appliance = %n, "ignoring unknown appliance");
                None
            }
        })
        .collect())
}

fn parse_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload?;
    Ok(body)
}

// ============================================================================
// Diagnosis
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DiagnosisRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub dwelling_type: Option<DwellingType>,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[validate(range(exclusive_min = 0.0))]
    pub monthly_consumption_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0))]
    pub available_area_m2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub objective: Option<Objective>,
    #[serde(default, deserialize_with = "lenient_appliances")]
    pub appliances: BTreeSet<Appliance>,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[validate(range(exclusive_min = 0.0))]
    pub budget: Option<f64>,
}

impl DiagnosisRequest {
    /// Build the profile the engine runs on. Out-of-range numbers are dropped
    /// in favour of defaults and reported back as substitutions.
    pub fn into_profile(self) -> (UserProfile, Vec<SubstitutedInput>) {
        let invalid: Vec<String> = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.field_errors().keys().map(|k| k.to_string()).collect(),
        };
        let is_invalid = |field: &str, value: Option<f64>| {
            let bad = invalid.iter().any(|f| f == field)
                || value.map_or(false, |v| !v.is_finite());
            if bad {
                warn!(field, supplied = ?value, "invalid value, using default");
            }
            bad
        };

        let mut substituted = Vec::new();

        let monthly_consumption_kwh = if is_invalid("monthly_consumption_kwh", self.monthly_consumption_kwh) {
            substituted.push(SubstitutedInput::new("monthly_consumption_kwh", "estimated"));
            None
        } else {
            self.monthly_consumption_kwh
        };

        let available_area_m2 = if is_invalid("available_area_m2", self.available_area_m2) {
            substituted.push(SubstitutedInput::new("available_area_m2", DEFAULT_AVAILABLE_AREA_M2));
            DEFAULT_AVAILABLE_AREA_M2
        } else {
            self.available_area_m2.unwrap_or(DEFAULT_AVAILABLE_AREA_M2)
        };

        let budget = if is_invalid("budget", self.budget) {
            substituted.push(SubstitutedInput::new("budget", "none"));
            None
        } else {
            self.budget
        };

        let profile = UserProfile {
            dwelling_type: self.dwelling_type,
            monthly_consumption_kwh,
            available_area_m2,
            objective: self.objective.unwrap_or_default(),
            appliances: self.appliances,
            budget,
        };
        (profile, substituted)
    }
}

pub async fn diagnose(
    State(st): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<ApiResponse<Diagnosis>, ApiError> {
    let start = Instant::now();
    let mut request = parse_body(payload)?;
    let location = request.location.take();
    let (profile, substituted) = request.into_profile();

    let mut diagnosis = st.advisor.diagnose(&profile, location.as_deref()).await;
    diagnosis.substituted_inputs.extend(substituted);

    Ok(ApiResponse::success(diagnosis).with_duration(start.elapsed().as_millis() as u64))
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub technology: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monthly_consumption_kwh: Option<f64>,
}

pub async fn simulate(
    State(st): State<AppState>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<ApiResponse<SimulationResult>, ApiError> {
    let start = Instant::now();
    let request = parse_body(payload)?;

    let result = st
        .advisor
        .simulate(
            &request.technology,
            request.capacity,
            request.location.as_deref(),
            request.monthly_consumption_kwh,
        )
        .await?;

    Ok(ApiResponse::success(result).with_duration(start.elapsed().as_millis() as u64))
}

// ============================================================================
// Consumption estimate
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ConsumptionRequest {
    #[serde(default, deserialize_with = "lenient_enum")]
    pub dwelling_type: Option<DwellingType>,
    #[serde(default, deserialize_with = "lenient_appliances")]
    pub appliances: BTreeSet<Appliance>,
}

#[derive(Debug, Serialize)]
pub struct ConsumptionEstimate {
    pub monthly_consumption_kwh: f64,
    pub dwelling_type: Option<DwellingType>,
    pub appliances: Vec<Appliance>,
}

pub async fn estimate_consumption(
    State(st): State<AppState>,
    payload: Result<Json<ConsumptionRequest>, JsonRejection>,
) -> Result<ApiResponse<ConsumptionEstimate>, ApiError> {
    let request = parse_body(payload)?;
    let appliances: Vec<Appliance> = request.appliances.into_iter().collect();
    let monthly_consumption_kwh = st.advisor.estimate_consumption(request.dwelling_type, &appliances);

    Ok(ApiResponse::success(ConsumptionEstimate {
        monthly_consumption_kwh,
        dwelling_type: request.dwelling_type,
        appliances,
    }))
}

// ============================================================================
// Climate
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClimateQuery {
    pub location: Option<String>,
}

pub async fn climate(
    State(st): State<AppState>,
    Query(q): Query<ClimateQuery>,
) -> ApiResponse<ClimateReading> {
    let start = Instant::now();
    let (location, _) = st.advisor.resolve_location(q.location.as_deref());
    let reading = st.advisor.climate(&location).await;
    ApiResponse::success(reading).with_duration(start.elapsed().as_millis() as u64)
}

// ============================================================================
// Constants
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ViabilityThreshold {
    pub technology: Technology,
    pub min_coverage_pct: f64,
    pub capacity_unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EngineConstants {
    pub price_per_kwh: f64,
    pub co2_kg_per_kwh: f64,
    pub trees_per_kg_co2: f64,
    pub car_kg_co2_per_km: f64,
    pub solar_cost_per_kwp: f64,
    pub wind_cost_per_kw: f64,
    pub thermal_base_cost: f64,
    pub thermal_cost_per_liter: f64,
    pub panel_efficiency: f64,
    pub system_losses: f64,
    pub wind_cut_in_speed: f64,
    pub wind_rated_speed: f64,
    pub wind_cut_out_speed: f64,
    pub default_available_area_m2: f64,
    pub viability: Vec<ViabilityThreshold>,
}

pub async fn constants() -> ApiResponse<EngineConstants> {
    let viability = Technology::iter()
        .map(|technology| ViabilityThreshold {
            technology,
            min_coverage_pct: technology.viability_threshold_pct(),
            capacity_unit: technology.capacity_unit(),
        })
        .collect();

    ApiResponse::success(EngineConstants {
        price_per_kwh: impact::PRICE_PER_KWH,
        co2_kg_per_kwh: impact::CO2_KG_PER_KWH,
        trees_per_kg_co2: impact::TREES_PER_KG_CO2,
        car_kg_co2_per_km: impact::CAR_KG_CO2_PER_KM,
        solar_cost_per_kwp: impact::SOLAR_COST_PER_KWP,
        wind_cost_per_kw: impact::WIND_COST_PER_KW,
        thermal_base_cost: impact::THERMAL_BASE_COST,
        thermal_cost_per_liter: impact::THERMAL_COST_PER_LITER,
        panel_efficiency: potential::PANEL_EFFICIENCY,
        system_losses: potential::SYSTEM_LOSSES,
        wind_cut_in_speed: potential::CUT_IN_SPEED,
        wind_rated_speed: potential::RATED_SPEED,
        wind_cut_out_speed: potential::CUT_OUT_SPEED,
        default_available_area_m2: DEFAULT_AVAILABLE_AREA_M2,
        viability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_accepted() {
        let req: DiagnosisRequest = serde_json::from_str(
            r#"{"monthly_consumption_kwh": "250", "available_area_m2": 30, "budget": "lots"}"#,
        )
        .unwrap();
        assert_eq!(req.monthly_consumption_kwh, Some(250.0));
        assert_eq!(req.available_area_m2, Some(30.0));
        assert_eq!(req.budget, None);
    }

    #[test]
    fn test_unknown_enums_and_appliances_are_dropped() {
        let req: DiagnosisRequest = serde_json::from_str(
            r#"{"dwelling_type": "castle", "objective": "savings",
                "appliances": ["pool", "teleporter", "HEAT_PUMP"]}"#,
        )
        .unwrap();
        assert_eq!(req.dwelling_type, None);
        assert_eq!(req.objective, Some(Objective::Savings));
        assert_eq!(
            req.appliances.into_iter().collect::<Vec<_>>(),
            vec![Appliance::HeatPump, Appliance::Pool]
        );
    }

    #[test]
    fn test_comma_separated_appliances() {
        let req: ConsumptionRequest =
            serde_json::from_str(r#"{"appliances": "pool, dryer"}"#).unwrap();
        assert_eq!(req.appliances.len(), 2);
    }

    #[test]
    fn test_out_of_range_values_are_substituted() {
        let req = DiagnosisRequest {
            monthly_consumption_kwh: Some(-20.0),
            available_area_m2: Some(-5.0),
            budget: Some(0.0),
            ..Default::default()
        };
        let (profile, substituted) = req.into_profile();
        assert_eq!(profile.monthly_consumption_kwh, None);
        assert_eq!(profile.available_area_m2, DEFAULT_AVAILABLE_AREA_M2);
        assert_eq!(profile.budget, None);
        let fields: Vec<_> = substituted.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields, vec!["monthly_consumption_kwh", "available_area_m2", "budget"]);
    }

    #[test]
    fn test_valid_request_has_no_substitutions() {
        let req = DiagnosisRequest {
            monthly_consumption_kwh: Some(320.0),
            available_area_m2: Some(0.0),
            objective: Some(Objective::Environmental),
            ..Default::default()
        };
        let (profile, substituted) = req.into_profile();
        assert!(substituted.is_empty());
        assert_eq!(profile.available_area_m2, 0.0);
        assert_eq!(profile.objective, Objective::Environmental);
    }
}
