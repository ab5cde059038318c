//! # Installation simulator
//!
//! Full performance, cost and impact report for an installation whose size is
//! given explicitly. Bad numeric inputs are replaced with defaults and reported
//! in [`SimulationResult::substituted_inputs`]; only an unknown technology key
//! makes the simulation fail.

use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::domain::{
    ClimateReading, SimulationDetail, SimulationResult, SubstitutedInput, Technology,
    ThermalParameters,
};

use super::{impact, potential};

/// Consumption used when none, or a non-positive one, is supplied (kWh/month)
pub const DEFAULT_MONTHLY_CONSUMPTION_KWH: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("unsupported technology: {0}")]
    UnsupportedTechnology(String),
}

/// Simulate `technology` (key such as `solar`, `wind`, `solar_thermal`) at `capacity`
pub fn simulate_installation(
    technology: &str,
    capacity: Option<f64>,
    climate: &ClimateReading,
    monthly_consumption: Option<f64>,
) -> Result<SimulationResult, SimulationError> {
    let technology = parse_technology(technology)?;
    Ok(simulate(technology, capacity, climate, monthly_consumption))
}

pub fn parse_technology(key: &str) -> Result<Technology, SimulationError> {
    Technology::from_str(key.trim()).map_err(|_| SimulationError::UnsupportedTechnology(key.to_string()))
}

/// Simulate an already parsed technology. Never fails.
pub fn simulate(
    technology: Technology,
    capacity: Option<f64>,
    climate: &ClimateReading,
    monthly_consumption: Option<f64>,
) -> SimulationResult {
    let mut substituted = Vec::new();

    let capacity = match capacity {
        Some(c) if c.is_finite() && c > 0.0 => c,
        other => {
            let fallback = technology.default_capacity();
            warn!(
                %technology,
                supplied = ?other,
                substituted = fallback,
                "invalid capacity, using default"
            );
            substituted.push(SubstitutedInput::new("capacity", fallback));
            fallback
        }
    };

    let consumption = match monthly_consumption {
        Some(c) if c.is_finite() && c > 0.0 => c,
        other => {
            warn!(
                supplied = ?other,
                substituted = DEFAULT_MONTHLY_CONSUMPTION_KWH,
                "invalid monthly consumption, using default"
            );
            substituted.push(SubstitutedInput::new(
                "monthly_consumption_kwh",
                DEFAULT_MONTHLY_CONSUMPTION_KWH,
            ));
            DEFAULT_MONTHLY_CONSUMPTION_KWH
        }
    };

    let (daily, monthly, annual, cost, detail) = match technology {
        Technology::Solar => {
            let out = potential::solar_output_for_capacity(capacity, climate);
            let detail = SimulationDetail::Solar {
                panel_area_m2: out.panel_area_m2,
                capacity_factor_pct: out.annual_kwh / (capacity * potential::HOURS_PER_YEAR) * 100.0,
                system_efficiency_pct: out.system_efficiency * 100.0,
            };
            (
                out.daily_kwh,
                out.monthly_kwh,
                out.annual_kwh,
                impact::solar_cost(capacity),
                detail,
            )
        }
        Technology::Wind => {
            let out = potential::wind_output_for_capacity(capacity, climate);
            let detail = SimulationDetail::Wind {
                viability_factor: out.viability_factor,
                capacity_factor_pct: out.capacity_factor * 100.0,
                cut_in_speed: potential::CUT_IN_SPEED,
                rated_speed: potential::RATED_SPEED,
                cut_out_speed: potential::CUT_OUT_SPEED,
            };
            (
                out.daily_kwh,
                out.monthly_kwh,
                out.annual_kwh,
                impact::wind_cost(capacity),
                detail,
            )
        }
        Technology::SolarThermal => {
            let out = potential::thermal_output(capacity, climate, &ThermalParameters::Default);
            let detail = SimulationDetail::SolarThermal {
                people_served: capacity / potential::HOT_WATER_LITERS_PER_PERSON,
                energy_needed_daily_kwh: out.energy_needed_daily_kwh,
                energy_delivered_daily_kwh: out.energy_delivered_daily_kwh,
                system_efficiency_pct: out.effective_efficiency * 100.0,
            };
            (
                out.energy_delivered_daily_kwh,
                out.monthly_kwh,
                out.annual_kwh,
                impact::thermal_cost(capacity),
                detail,
            )
        }
    };

    let monthly_savings = monthly * impact::PRICE_PER_KWH;
    let annual_savings = annual * impact::PRICE_PER_KWH;

    SimulationResult {
        technology,
        capacity,
        capacity_unit: technology.capacity_unit().to_string(),
        daily_generation_kwh: daily,
        monthly_generation_kwh: monthly,
        annual_generation_kwh: annual,
        estimated_cost: cost,
        coverage_pct: impact::coverage_pct(monthly, consumption),
        monthly_savings,
        annual_savings,
        payback_years: impact::payback_years(cost, annual_savings),
        environmental_metrics: impact::environmental_metrics(annual),
        detail,
        climate: climate.clone(),
        substituted_inputs: substituted,
    }
}
