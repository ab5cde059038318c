use serde::{Deserialize, Serialize};

use super::{SolarParameters, Technology, ThermalParameters, WindParameters};

const DEFAULT_TUNED_SOLAR_EFFICIENCY_PCT: f64 = 75.0;
const DEFAULT_TUNED_THERMAL_EFFICIENCY_PCT: f64 = 70.0;
const DEFAULT_TUNED_WIND_CAPACITY_KW: f64 = 2.0;
const DEFAULT_TUNED_TOWER_HEIGHT_M: f64 = 15.0;

// ============================================================================
// Parameter advisor verdict
// ============================================================================

/// What the advisor picked as the principal recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestOption {
    Solar,
    Wind,
    SolarThermal,
    Combination,
}

impl BestOption {
    pub fn technology(&self) -> Option<Technology> {
        match self {
            BestOption::Solar => Some(Technology::Solar),
            BestOption::Wind => Some(Technology::Wind),
            BestOption::SolarThermal => Some(Technology::SolarThermal),
            BestOption::Combination => None,
        }
    }
}

/// Per-technology viability and tuned sizing returned by the parameter advisor.
///
/// Decoded from the advisor's JSON answer; any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorVerdict {
    #[serde(default)]
    pub best_option: Option<BestOption>,
    #[serde(default)]
    pub justification: String,
    pub options: AdvisedOptions,
    #[serde(default)]
    pub recommended_combination: Option<AdvisedCombination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisedOptions {
    pub solar: AdvisedSolar,
    pub wind: AdvisedWind,
    pub solar_thermal: AdvisedThermal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisedSolar {
    pub viable: bool,
    #[serde(default)]
    pub system_efficiency: Option<f64>,
    #[serde(default)]
    pub panel_tilt: Option<f64>,
    #[serde(default)]
    pub orientation: Option<String>,
    /// Percent of the monthly consumption; a viable entry without it is discarded
    #[serde(default)]
    pub estimated_coverage: Option<f64>,
    #[serde(default)]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisedWind {
    pub viable: bool,
    #[serde(default)]
    pub tower_height: Option<f64>,
    #[serde(default)]
    pub recommended_capacity: Option<f64>,
    /// Percent of the monthly consumption; a viable entry without it is discarded
    #[serde(default)]
    pub estimated_coverage: Option<f64>,
    #[serde(default)]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisedThermal {
    pub viable: bool,
    #[serde(default)]
    pub system_efficiency: Option<f64>,
    #[serde(default)]
    pub optimal_tilt: Option<f64>,
    /// Percent of the monthly consumption; a viable entry without it is discarded
    #[serde(default)]
    pub estimated_coverage: Option<f64>,
    #[serde(default)]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisedCombination {
    #[serde(default)]
    pub options: Vec<Technology>,
    #[serde(default)]
    pub combined_coverage: f64,
    #[serde(default)]
    pub justification: String,
}

impl AdvisedSolar {
    pub fn parameters(&self) -> SolarParameters {
        SolarParameters::Tuned {
            system_efficiency_pct: percent_or(self.system_efficiency, DEFAULT_TUNED_SOLAR_EFFICIENCY_PCT),
            tilt_deg: self.panel_tilt.filter(|t| t.is_finite()),
            orientation: self.orientation.clone().filter(|o| !o.trim().is_empty()),
        }
    }
}

impl AdvisedWind {
    pub fn parameters(&self) -> WindParameters {
        WindParameters::Tuned {
            recommended_capacity_kw: positive_or(self.recommended_capacity, DEFAULT_TUNED_WIND_CAPACITY_KW),
            tower_height_m: positive_or(self.tower_height, DEFAULT_TUNED_TOWER_HEIGHT_M),
        }
    }
}

impl AdvisedThermal {
    pub fn parameters(&self) -> ThermalParameters {
        ThermalParameters::Tuned {
            system_efficiency_pct: percent_or(self.system_efficiency, DEFAULT_TUNED_THERMAL_EFFICIENCY_PCT),
            optimal_tilt_deg: self.optimal_tilt.filter(|t| t.is_finite()),
        }
    }
}

fn percent_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 && v <= 100.0 => v,
        _ => fallback,
    }
}

fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    }
}

// ============================================================================
// Advisory text
// ============================================================================

/// Human readable advice attached to a diagnosis. Never feeds back into the numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceReport {
    pub principal_recommendation: String,
    pub justification: String,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub special_considerations: String,
}
