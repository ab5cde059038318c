//! # Technology potential
//!
//! Deterministic generation estimates for photovoltaic panels, small wind
//! turbines and solar water heaters.
//!
//! Two families of functions live here:
//! - `*_potential` sizes the installation from the household (available area,
//!   fixed hot-water demand) and reports a [`TechnologyPotential`].
//! - `*_output_for_*` computes the output of an installation whose size is
//!   already fixed. The installation simulator is built on these.

use crate::domain::{
    ClimateReading, PotentialDetail, SolarParameters, Technology, TechnologyPotential,
    ThermalParameters, WindParameters,
};

use super::impact;

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const HOURS_PER_YEAR: f64 = 8760.0;

// Photovoltaic
pub const PANEL_EFFICIENCY: f64 = 0.18;
pub const AREA_UTILIZATION: f64 = 0.70;
pub const OPTIMIZED_AREA_UTILIZATION: f64 = 0.85;
pub const REFERENCE_CELL_TEMPERATURE_C: f64 = 25.0;
pub const TEMPERATURE_LOSS_PER_DEGREE: f64 = 0.004;
pub const SYSTEM_LOSSES: f64 = 0.85;
pub const KWP_PER_M2: f64 = 0.185;
pub const PANEL_AREA_M2: f64 = 1.7;
pub const SOLAR_MIN_MONTHLY_KWH: f64 = 30.0;

// Wind
pub const CUT_IN_SPEED: f64 = 2.5;
pub const RATED_SPEED: f64 = 11.0;
pub const CUT_OUT_SPEED: f64 = 25.0;
pub const MAX_TURBINE_KW: f64 = 3.0;
pub const AREA_PER_TURBINE_KW_M2: f64 = 30.0;
pub const DEFAULT_TOWER_HEIGHT_M: f64 = 15.0;
pub const REFERENCE_WIND_HEIGHT_M: f64 = 10.0;
pub const WIND_SHEAR_EXPONENT: f64 = 0.14;
/// Conservative power-curve coefficient. 0.2 overestimated generation about twice.
pub const POWER_CURVE_COEFFICIENT: f64 = 0.1;
pub const BASE_CAPACITY_FACTOR: f64 = 0.15;
pub const MAX_SIMULATED_CAPACITY_FACTOR: f64 = 0.35;
pub const WIND_MIN_MONTHLY_KWH: f64 = 30.0;

// Solar thermal
pub const HOT_WATER_LITERS_PER_PERSON: f64 = 50.0;
pub const HOUSEHOLD_PEOPLE: u32 = 4;
pub const WATER_SPECIFIC_HEAT_KWH: f64 = 0.00116;
pub const HOT_WATER_TARGET_C: f64 = 45.0;
pub const THERMAL_EFFICIENCY: f64 = 0.70;
pub const THERMAL_REFERENCE_IRRADIANCE: f64 = 4.0;
pub const TUNED_THERMAL_REFERENCE_IRRADIANCE: f64 = 3.5;
pub const TUNED_TILT_BONUS: f64 = 1.15;
pub const TANK_MARGIN: f64 = 1.2;
pub const THERMAL_MIN_MONTHLY_KWH: f64 = 20.0;

/// Daily hot water demand of the reference household (liters)
pub fn household_hot_water_liters() -> f64 {
    HOT_WATER_LITERS_PER_PERSON * HOUSEHOLD_PEOPLE as f64
}

/// Panel output multiplier for hot climates: -0.4 %/°C above 25 °C, never above 1
pub fn temperature_derate(avg_temperature_c: f64) -> f64 {
    1.0 - ((avg_temperature_c - REFERENCE_CELL_TEMPERATURE_C) * TEMPERATURE_LOSS_PER_DEGREE).max(0.0)
}

/// Site quality multiplier from the mean wind speed
pub fn wind_viability_factor(wind_speed: f64) -> f64 {
    if wind_speed < 3.0 {
        0.3
    } else if wind_speed < 4.0 {
        0.6
    } else if wind_speed < 5.0 {
        0.8
    } else {
        1.0
    }
}

/// Wind speed at hub height from the 10 m reading (power law)
pub fn wind_speed_at_height(wind_speed_10m: f64, tower_height_m: f64) -> f64 {
    wind_speed_10m * (tower_height_m / REFERENCE_WIND_HEIGHT_M).powf(WIND_SHEAR_EXPONENT)
}

// ============================================================================
// Household-sized potentials
// ============================================================================

/// Photovoltaic potential of the available area
pub fn solar_potential(
    climate: &ClimateReading,
    available_area_m2: f64,
    params: &SolarParameters,
) -> TechnologyPotential {
    let area = available_area_m2.max(0.0);
    let (utilization, system_efficiency, description) = match params {
        SolarParameters::Default => (
            AREA_UTILIZATION,
            PANEL_EFFICIENCY * temperature_derate(climate.avg_temperature) * SYSTEM_LOSSES,
            "Photovoltaic system with high-efficiency monocrystalline panels.".to_string(),
        ),
        SolarParameters::Tuned {
            system_efficiency_pct,
            tilt_deg,
            orientation,
        } => {
            let utilization = if params.layout_optimized() {
                OPTIMIZED_AREA_UTILIZATION
            } else {
                AREA_UTILIZATION
            };
            let description = format!(
                "Photovoltaic system with panels tilted {:.0}° facing {}, system efficiency {:.0}%.",
                tilt_deg.unwrap_or(30.0),
                orientation.as_deref().unwrap_or("north"),
                system_efficiency_pct
            );
            (utilization, system_efficiency_pct / 100.0, description)
        }
    };

    let panel_area = area * utilization;
    let capacity_kwp = panel_area * KWP_PER_M2;
    // Peak sun hours equal the daily irradiance in kWh/m²/day
    let daily = capacity_kwp * climate.solar_irradiance * system_efficiency;
    let monthly = daily * DAYS_PER_MONTH;

    TechnologyPotential {
        technology: Technology::Solar,
        recommended_capacity: capacity_kwp,
        daily_generation_kwh: daily,
        monthly_generation_kwh: monthly,
        estimated_cost: impact::solar_cost(capacity_kwp),
        description,
        is_viable: monthly > SOLAR_MIN_MONTHLY_KWH,
        detail: PotentialDetail::Solar {
            panel_area_m2: panel_area,
            panel_count: (panel_area / PANEL_AREA_M2).round() as u32,
            system_efficiency,
            tuned: !matches!(params, SolarParameters::Default),
        },
    }
}

/// Small wind turbine potential; turbine size is bounded by the available area
pub fn wind_potential(
    climate: &ClimateReading,
    available_area_m2: f64,
    params: &WindParameters,
) -> TechnologyPotential {
    let (max_capacity_kw, tower_height_m, effective_speed, description) = match params {
        WindParameters::Default => (
            MAX_TURBINE_KW.min(available_area_m2.max(0.0) / AREA_PER_TURBINE_KW_M2),
            DEFAULT_TOWER_HEIGHT_M,
            climate.wind_speed,
            format!("Residential wind turbine on a {DEFAULT_TOWER_HEIGHT_M:.0} m tower."),
        ),
        WindParameters::Tuned {
            recommended_capacity_kw,
            tower_height_m,
        } => (
            *recommended_capacity_kw,
            *tower_height_m,
            wind_speed_at_height(climate.wind_speed, *tower_height_m),
            format!(
                "{recommended_capacity_kw:.1} kW wind turbine mounted at {tower_height_m:.0} m to reach steadier winds."
            ),
        ),
    };

    let viability_factor = wind_viability_factor(effective_speed);
    let nominal_kw = if effective_speed < CUT_IN_SPEED {
        0.0
    } else {
        (max_capacity_kw * POWER_CURVE_COEFFICIENT * effective_speed.powi(3) / RATED_SPEED.powi(3))
            .min(max_capacity_kw)
    };
    let capacity_factor = BASE_CAPACITY_FACTOR * viability_factor;
    let daily = nominal_kw * 24.0 * capacity_factor;
    let monthly = daily * DAYS_PER_MONTH;

    TechnologyPotential {
        technology: Technology::Wind,
        recommended_capacity: max_capacity_kw,
        daily_generation_kwh: daily,
        monthly_generation_kwh: monthly,
        estimated_cost: impact::wind_cost(max_capacity_kw),
        description,
        is_viable: monthly > WIND_MIN_MONTHLY_KWH && effective_speed >= CUT_IN_SPEED,
        detail: PotentialDetail::Wind {
            viability_factor,
            effective_wind_speed: effective_speed,
            tower_height_m,
            cut_in_speed: CUT_IN_SPEED,
            rated_speed: RATED_SPEED,
            cut_out_speed: CUT_OUT_SPEED,
            tuned: !matches!(params, WindParameters::Default),
        },
    }
}

/// Solar water heater savings for the reference four-person household
pub fn solar_thermal_potential(
    climate: &ClimateReading,
    params: &ThermalParameters,
) -> TechnologyPotential {
    let demand_liters = household_hot_water_liters();
    let output = thermal_output(demand_liters, climate, params);
    let tank_liters = demand_liters * TANK_MARGIN;

    let description = match params {
        ThermalParameters::Default => {
            "Solar water heater for domestic hot water.".to_string()
        }
        ThermalParameters::Tuned {
            system_efficiency_pct,
            optimal_tilt_deg,
        } => format!(
            "Solar water heater tilted {:.0}° with {:.0}% system efficiency.",
            optimal_tilt_deg.unwrap_or(35.0),
            system_efficiency_pct
        ),
    };

    TechnologyPotential {
        technology: Technology::SolarThermal,
        recommended_capacity: tank_liters,
        daily_generation_kwh: output.energy_delivered_daily_kwh,
        monthly_generation_kwh: output.monthly_kwh,
        estimated_cost: impact::thermal_cost(tank_liters),
        description,
        is_viable: output.monthly_kwh > THERMAL_MIN_MONTHLY_KWH,
        detail: PotentialDetail::SolarThermal {
            people: HOUSEHOLD_PEOPLE,
            daily_hot_water_liters: demand_liters,
            energy_needed_daily_kwh: output.energy_needed_daily_kwh,
            energy_delivered_daily_kwh: output.energy_delivered_daily_kwh,
            effective_efficiency: output.effective_efficiency,
            tuned: !matches!(params, ThermalParameters::Default),
        },
    }
}

// ============================================================================
// Fixed-size outputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarOutput {
    pub capacity_kwp: f64,
    pub panel_area_m2: f64,
    /// Temperature derate times balance-of-system losses
    pub system_efficiency: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub annual_kwh: f64,
}

/// Output of a photovoltaic array of known peak power.
///
/// The kWp rating already embeds panel efficiency, so only the temperature
/// derate and system losses apply.
pub fn solar_output_for_capacity(capacity_kwp: f64, climate: &ClimateReading) -> SolarOutput {
    let system_efficiency = temperature_derate(climate.avg_temperature) * SYSTEM_LOSSES;
    let daily = capacity_kwp * climate.solar_irradiance * system_efficiency;
    SolarOutput {
        capacity_kwp,
        panel_area_m2: capacity_kwp / KWP_PER_M2,
        system_efficiency,
        daily_kwh: daily,
        monthly_kwh: daily * DAYS_PER_MONTH,
        annual_kwh: daily * DAYS_PER_YEAR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindOutput {
    pub capacity_kw: f64,
    pub viability_factor: f64,
    pub capacity_factor: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub annual_kwh: f64,
}

/// Capacity factor of a turbine: zero below cut-in, linear up to rated speed,
/// flat at 35 % of the site viability above it
pub fn wind_capacity_factor(wind_speed: f64) -> f64 {
    let ceiling = MAX_SIMULATED_CAPACITY_FACTOR * wind_viability_factor(wind_speed);
    if wind_speed < CUT_IN_SPEED {
        0.0
    } else if wind_speed > RATED_SPEED {
        ceiling
    } else {
        ceiling * (wind_speed - CUT_IN_SPEED) / (RATED_SPEED - CUT_IN_SPEED)
    }
}

/// Output of a turbine of known rated power
pub fn wind_output_for_capacity(capacity_kw: f64, climate: &ClimateReading) -> WindOutput {
    let capacity_factor = wind_capacity_factor(climate.wind_speed);
    let annual = capacity_kw * capacity_factor * HOURS_PER_YEAR;
    let monthly = annual / 12.0;
    WindOutput {
        capacity_kw,
        viability_factor: wind_viability_factor(climate.wind_speed),
        capacity_factor,
        daily_kwh: monthly / DAYS_PER_MONTH,
        monthly_kwh: monthly,
        annual_kwh: annual,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalOutput {
    pub daily_volume_liters: f64,
    /// Heat needed to bring the daily volume to 45 °C, never negative
    pub energy_needed_daily_kwh: f64,
    pub energy_delivered_daily_kwh: f64,
    /// System efficiency times irradiance factor
    pub effective_efficiency: f64,
    pub monthly_kwh: f64,
    pub annual_kwh: f64,
}

/// Heat a solar water heater contributes when heating `daily_volume_liters` per day
pub fn thermal_output(
    daily_volume_liters: f64,
    climate: &ClimateReading,
    params: &ThermalParameters,
) -> ThermalOutput {
    // Above 45 °C ambient there is nothing to heat
    let energy_needed = (daily_volume_liters
        * WATER_SPECIFIC_HEAT_KWH
        * (HOT_WATER_TARGET_C - climate.avg_temperature))
        .max(0.0);

    let (efficiency, irradiance_factor) = match params {
        ThermalParameters::Default => (
            THERMAL_EFFICIENCY,
            (climate.solar_irradiance / THERMAL_REFERENCE_IRRADIANCE).min(1.0),
        ),
        ThermalParameters::Tuned {
            system_efficiency_pct,
            optimal_tilt_deg,
        } => {
            let bonus = if optimal_tilt_deg.is_some() { TUNED_TILT_BONUS } else { 1.0 };
            (
                system_efficiency_pct / 100.0,
                (climate.solar_irradiance / TUNED_THERMAL_REFERENCE_IRRADIANCE).min(1.0) * bonus,
            )
        }
    };

    let delivered = energy_needed * efficiency * irradiance_factor;
    ThermalOutput {
        daily_volume_liters,
        energy_needed_daily_kwh: energy_needed,
        energy_delivered_daily_kwh: delivered,
        effective_efficiency: efficiency * irradiance_factor,
        monthly_kwh: delivered * DAYS_PER_MONTH,
        annual_kwh: delivered * DAYS_PER_YEAR,
    }
}
