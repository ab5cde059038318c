//! Economic and environmental conversions shared by the recommendation engine
//! and the installation simulator.

use crate::domain::EnvironmentalMetrics;

/// Average electricity price (currency units per kWh)
pub const PRICE_PER_KWH: f64 = 0.15;
/// Grid emission factor (kg CO2 per kWh)
pub const CO2_KG_PER_KWH: f64 = 0.4;
/// Trees needed to absorb one kg of CO2 per year
pub const TREES_PER_KG_CO2: f64 = 0.06;
/// Average passenger car emissions (kg CO2 per km)
pub const CAR_KG_CO2_PER_KM: f64 = 0.2;

pub const SOLAR_COST_PER_KWP: f64 = 1200.0;
pub const WIND_COST_PER_KW: f64 = 2000.0;
pub const THERMAL_BASE_COST: f64 = 800.0;
pub const THERMAL_COST_PER_LITER: f64 = 2.0;

/// Share of the monthly consumption a generation figure covers, clamped to [0, 100]
pub fn coverage_pct(monthly_generation_kwh: f64, monthly_consumption_kwh: f64) -> f64 {
    if monthly_consumption_kwh <= 0.0 || !monthly_consumption_kwh.is_finite() {
        return 0.0;
    }
    let pct = monthly_generation_kwh / monthly_consumption_kwh * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn annual_savings(monthly_generation_kwh: f64) -> f64 {
    monthly_generation_kwh * 12.0 * PRICE_PER_KWH
}

pub fn annual_co2_avoided_kg(monthly_generation_kwh: f64) -> f64 {
    monthly_generation_kwh * 12.0 * CO2_KG_PER_KWH
}

pub fn environmental_metrics(annual_generation_kwh: f64) -> EnvironmentalMetrics {
    let co2 = annual_generation_kwh * CO2_KG_PER_KWH;
    EnvironmentalMetrics {
        co2_avoided_kg_year: co2,
        tree_equivalent: co2 * TREES_PER_KG_CO2,
        car_km_equivalent: co2 / CAR_KG_CO2_PER_KM,
    }
}

/// Years to recover the cost. Undefined (`None`) when cost or savings is zero.
pub fn payback_years(cost: f64, annual_savings: f64) -> Option<f64> {
    if cost > 0.0 && annual_savings > 0.0 {
        Some(cost / annual_savings)
    } else {
        None
    }
}

pub fn solar_cost(capacity_kwp: f64) -> f64 {
    capacity_kwp * SOLAR_COST_PER_KWP
}

pub fn wind_cost(capacity_kw: f64) -> f64 {
    capacity_kw * WIND_COST_PER_KW
}

pub fn thermal_cost(tank_liters: f64) -> f64 {
    THERMAL_BASE_COST + tank_liters * THERMAL_COST_PER_LITER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_is_clamped() {
        assert_eq!(coverage_pct(1000.0, 100.0), 100.0);
        assert_eq!(coverage_pct(-5.0, 100.0), 0.0);
        assert!((coverage_pct(50.0, 200.0) - 25.0).abs() < 1e-9);
        assert_eq!(coverage_pct(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_environmental_metrics() {
        let m = environmental_metrics(1000.0);
        assert!((m.co2_avoided_kg_year - 400.0).abs() < 1e-9);
        assert!((m.tree_equivalent - 24.0).abs() < 1e-9);
        assert!((m.car_km_equivalent - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_payback_undefined_without_savings_or_cost() {
        assert_eq!(payback_years(1200.0, 0.0), None);
        assert_eq!(payback_years(0.0, 100.0), None);
        assert_eq!(payback_years(1200.0, 300.0), Some(4.0));
    }

    #[test]
    fn test_costs() {
        assert_eq!(solar_cost(2.0), 2400.0);
        assert_eq!(wind_cost(1.5), 3000.0);
        assert_eq!(thermal_cost(200.0), 1200.0);
    }

    #[test]
    fn test_annual_figures() {
        assert!((annual_savings(100.0) - 180.0).abs() < 1e-9);
        assert!((annual_co2_avoided_kg(100.0) - 480.0).abs() < 1e-9);
    }
}
