use serde::{Deserialize, Serialize};

use super::{ClimateReading, Technology};

/// CO2 and everyday equivalents of a year of generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMetrics {
    pub co2_avoided_kg_year: f64,
    pub tree_equivalent: f64,
    pub car_km_equivalent: f64,
}

/// Technology specific figures of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationDetail {
    Solar {
        panel_area_m2: f64,
        capacity_factor_pct: f64,
        system_efficiency_pct: f64,
    },
    Wind {
        viability_factor: f64,
        capacity_factor_pct: f64,
        cut_in_speed: f64,
        rated_speed: f64,
        cut_out_speed: f64,
    },
    SolarThermal {
        people_served: f64,
        energy_needed_daily_kwh: f64,
        energy_delivered_daily_kwh: f64,
        system_efficiency_pct: f64,
    },
}

/// Input the simulator replaced with a documented default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutedInput {
    pub field: String,
    pub value: String,
}

impl SubstitutedInput {
    pub fn new(field: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Performance, economics and impact of one explicitly sized installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub technology: Technology,
    pub capacity: f64,
    pub capacity_unit: String,
    pub daily_generation_kwh: f64,
    pub monthly_generation_kwh: f64,
    pub annual_generation_kwh: f64,
    pub estimated_cost: f64,
    pub coverage_pct: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// `None` when either savings or cost is zero
    pub payback_years: Option<f64>,
    pub environmental_metrics: EnvironmentalMetrics,
    pub detail: SimulationDetail,
    pub climate: ClimateReading,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substituted_inputs: Vec<SubstitutedInput>,
}
