use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Appliance, DwellingType, Objective};

/// Area assumed when the user does not say how much roof or land is available (m²)
pub const DEFAULT_AVAILABLE_AREA_M2: f64 = 50.0;

/// Household description the recommendation is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// `None` when the user gave no type or one we do not know
    pub dwelling_type: Option<DwellingType>,
    /// Filled in by the consumption estimator when absent or not positive
    pub monthly_consumption_kwh: Option<f64>,
    pub available_area_m2: f64,
    pub objective: Objective,
    pub appliances: BTreeSet<Appliance>,
    /// Optional spending limit for the budget-constrained mix
    pub budget: Option<f64>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            dwelling_type: None,
            monthly_consumption_kwh: None,
            available_area_m2: DEFAULT_AVAILABLE_AREA_M2,
            objective: Objective::default(),
            appliances: BTreeSet::new(),
            budget: None,
        }
    }
}

impl UserProfile {
    /// Consumption supplied by the user, if it is usable
    pub fn stated_consumption(&self) -> Option<f64> {
        self.monthly_consumption_kwh
            .filter(|kwh| kwh.is_finite() && *kwh > 0.0)
    }

    /// Available area with negative or non-finite values treated as zero
    pub fn usable_area_m2(&self) -> f64 {
        if self.available_area_m2.is_finite() {
            self.available_area_m2.max(0.0)
        } else {
            0.0
        }
    }
}
