use serde::{Deserialize, Serialize};

use super::{Technology, TechnologyPotential};

/// A technology that cleared its viability threshold, with its economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    pub technology: Technology,
    pub title: String,
    /// Share of the monthly consumption covered, in [0, 100]
    pub coverage_pct: f64,
    pub monthly_generation_kwh: f64,
    pub annual_savings: f64,
    pub annual_co2_avoided_kg: f64,
    pub technical_detail: String,
    pub detail: TechnologyPotential,
}

/// Two technologies installed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub technologies: [Technology; 2],
    /// Sum of individual coverages, capped at 100
    pub combined_coverage_pct: f64,
    pub description: String,
}

/// The recommendation put forward first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    Option(RankedOption),
    Combination(Combination),
}

impl Principal {
    pub fn coverage_pct(&self) -> f64 {
        match self {
            Principal::Option(o) => o.coverage_pct,
            Principal::Combination(c) => c.combined_coverage_pct,
        }
    }

    pub fn technologies(&self) -> Vec<Technology> {
        match self {
            Principal::Option(o) => vec![o.technology],
            Principal::Combination(c) => c.technologies.to_vec(),
        }
    }
}

/// Which path produced the recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    StaticRules,
    Advisor,
}

/// Installation plan picked under an optional budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixPlan {
    pub technologies: Vec<Technology>,
    pub total_coverage_pct: f64,
    pub total_cost: f64,
    /// Coverage points per 100 currency units spent
    pub cost_benefit: f64,
}

/// Result of a diagnosis. `principal` is `None` when nothing is viable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub message: String,
    pub monthly_consumption_kwh: f64,
    pub options: Vec<RankedOption>,
    pub combinations: Vec<Combination>,
    pub principal: Option<Principal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_plan: Option<MixPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn option(&self, technology: Technology) -> Option<&RankedOption> {
        self.options.iter().find(|o| o.technology == technology)
    }
}
