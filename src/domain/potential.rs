use serde::{Deserialize, Serialize};

use super::Technology;

/// Generation or savings potential of one technology for one household and climate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyPotential {
    pub technology: Technology,
    /// kWp for solar, kW for wind, liters of tank for solar thermal
    pub recommended_capacity: f64,
    pub daily_generation_kwh: f64,
    pub monthly_generation_kwh: f64,
    pub estimated_cost: f64,
    pub description: String,
    pub is_viable: bool,
    pub detail: PotentialDetail,
}

/// Technology specific figures reported with a potential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PotentialDetail {
    Solar {
        panel_area_m2: f64,
        panel_count: u32,
        system_efficiency: f64,
        tuned: bool,
    },
    Wind {
        viability_factor: f64,
        effective_wind_speed: f64,
        tower_height_m: f64,
        cut_in_speed: f64,
        rated_speed: f64,
        cut_out_speed: f64,
        tuned: bool,
    },
    SolarThermal {
        people: u32,
        daily_hot_water_liters: f64,
        energy_needed_daily_kwh: f64,
        energy_delivered_daily_kwh: f64,
        effective_efficiency: f64,
        tuned: bool,
    },
}

impl TechnologyPotential {
    /// Whether advisor-tuned parameters produced this estimate
    pub fn is_tuned(&self) -> bool {
        match self.detail {
            PotentialDetail::Solar { tuned, .. }
            | PotentialDetail::Wind { tuned, .. }
            | PotentialDetail::SolarThermal { tuned, .. } => tuned,
        }
    }

    /// One-line technical summary shown next to a ranked option
    pub fn technical_summary(&self) -> String {
        match &self.detail {
            PotentialDetail::Solar { panel_count, .. } => format!(
                "Recommended power: {:.2} kWp ({} panels)",
                self.recommended_capacity, panel_count
            ),
            PotentialDetail::Wind { tower_height_m, .. } => format!(
                "Recommended power: {:.2} kW, tower height: {:.0} m",
                self.recommended_capacity, tower_height_m
            ),
            PotentialDetail::SolarThermal { .. } => format!(
                "Recommended capacity: {:.0} liters",
                self.recommended_capacity
            ),
        }
    }
}
