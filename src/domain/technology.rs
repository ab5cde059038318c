use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ============================================================================
// Technologies
// ============================================================================

/// Renewable technology the advisor can size and simulate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Technology {
    /// Photovoltaic panels, sized in kWp
    Solar,
    /// Small residential wind turbine, sized in kW
    Wind,
    /// Solar water heater, sized in liters
    #[strum(to_string = "solar_thermal", serialize = "thermal")]
    SolarThermal,
}

impl Technology {
    /// Human readable name used in messages and combination descriptions
    pub fn title(&self) -> &'static str {
        match self {
            Technology::Solar => "Photovoltaic solar system",
            Technology::Wind => "Residential wind turbine",
            Technology::SolarThermal => "Solar water heater",
        }
    }

    /// Minimum coverage (% of monthly consumption) for the technology to be recommended
    pub fn viability_threshold_pct(&self) -> f64 {
        match self {
            Technology::Solar | Technology::Wind => 15.0,
            Technology::SolarThermal => 5.0,
        }
    }

    pub fn capacity_unit(&self) -> &'static str {
        match self {
            Technology::Solar => "kWp",
            Technology::Wind => "kW",
            Technology::SolarThermal => "L",
        }
    }

    /// Capacity substituted when a simulation request carries none or an invalid one
    pub fn default_capacity(&self) -> f64 {
        match self {
            Technology::Solar | Technology::Wind => 1.0,
            Technology::SolarThermal => 200.0,
        }
    }
}

// ============================================================================
// Household description
// ============================================================================

/// Kind of dwelling, drives the base consumption estimate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DwellingType {
    SmallHouse,
    MediumHouse,
    LargeHouse,
    Apartment,
    Office,
    Commerce,
    Other,
}

/// Electrical appliance that raises the monthly consumption estimate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Appliance {
    AirConditioning,
    ElectricHeating,
    HeatPump,
    Refrigerator,
    WashingMachine,
    Dryer,
    Dishwasher,
    ElectricOven,
    Computers,
    LedLighting,
    TraditionalLighting,
    Pool,
    Jacuzzi,
    Other,
}

/// What the user wants to optimise for; selects the ranking key
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Objective {
    /// Rank by annual savings
    Savings,
    /// Rank by annual CO2 avoided
    Environmental,
    /// Rank by coverage of the monthly consumption
    #[default]
    #[serde(alias = "coverage")]
    #[strum(to_string = "balanced", serialize = "coverage")]
    Balanced,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_technology_parsing() {
        assert_eq!(Technology::from_str("solar"), Ok(Technology::Solar));
        assert_eq!(Technology::from_str("WIND"), Ok(Technology::Wind));
        assert_eq!(Technology::from_str("solar_thermal"), Ok(Technology::SolarThermal));
        assert_eq!(Technology::from_str("thermal"), Ok(Technology::SolarThermal));
        assert!(Technology::from_str("bogus").is_err());
    }

    #[test]
    fn test_technology_display() {
        assert_eq!(Technology::SolarThermal.to_string(), "solar_thermal");
        assert_eq!(Technology::Solar.to_string(), "solar");
    }

    #[test]
    fn test_viability_thresholds() {
        assert_eq!(Technology::Solar.viability_threshold_pct(), 15.0);
        assert_eq!(Technology::Wind.viability_threshold_pct(), 15.0);
        assert_eq!(Technology::SolarThermal.viability_threshold_pct(), 5.0);
    }

    #[test]
    fn test_objective_default_and_alias() {
        assert_eq!(Objective::default(), Objective::Balanced);
        assert_eq!(Objective::from_str("coverage"), Ok(Objective::Balanced));
        assert_eq!(Objective::from_str("savings"), Ok(Objective::Savings));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Appliance::AirConditioning).unwrap();
        assert_eq!(json, "\"air_conditioning\"");
        let dwelling: DwellingType = serde_json::from_str("\"small_house\"").unwrap();
        assert_eq!(dwelling, DwellingType::SmallHouse);
    }
}
