//! Sizing parameters for the potential calculators.
//!
//! Every calculator takes either the documented static defaults or a set of
//! advisor-tuned values. Tuned values are constructed only through
//! [`crate::domain::AdvisorVerdict`] so the calculators never probe loose maps.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SolarParameters {
    #[default]
    Default,
    Tuned {
        /// Whole-system efficiency in percent, replaces panel efficiency, derate and losses
        system_efficiency_pct: f64,
        tilt_deg: Option<f64>,
        orientation: Option<String>,
    },
}

impl SolarParameters {
    /// Tilt and orientation both given means the array layout was optimised
    pub fn layout_optimized(&self) -> bool {
        matches!(
            self,
            SolarParameters::Tuned {
                tilt_deg: Some(_),
                orientation: Some(_),
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WindParameters {
    #[default]
    Default,
    Tuned {
        recommended_capacity_kw: f64,
        tower_height_m: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThermalParameters {
    #[default]
    Default,
    Tuned {
        system_efficiency_pct: f64,
        optimal_tilt_deg: Option<f64>,
    },
}
