//! # Recommendation engine
//!
//! Turns the three technology potentials into ranked options, pairs them into
//! combinations and picks the principal recommendation for the user's objective.
//!
//! Two paths produce a [`Recommendation`]:
//! - the static path uses the default constants of [`super::potential`];
//! - the advised path takes an [`AdvisorVerdict`] with per-technology viability
//!   and tuned parameters. An unusable verdict drops back to the static path.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::domain::{
    AdvisorVerdict, BestOption, ClimateReading, Combination, MixPlan, Objective, Principal,
    RankedOption, Recommendation, RecommendationSource, SolarParameters, Technology,
    TechnologyPotential, ThermalParameters, UserProfile, WindParameters,
};

use super::{consumption, impact, potential};

/// Pairs that may be installed together. Solar with wind is not modelled.
pub const COMBINABLE_PAIRS: [[Technology; 2]; 2] = [
    [Technology::Solar, Technology::SolarThermal],
    [Technology::Wind, Technology::SolarThermal],
];

/// Stated consumption, or the estimate from dwelling type and appliances
pub fn resolve_consumption(profile: &UserProfile) -> f64 {
    profile
        .stated_consumption()
        .unwrap_or_else(|| consumption::estimate_consumption(profile.dwelling_type, &profile.appliances))
}

/// Potentials of all three technologies with default parameters
pub fn static_potentials(profile: &UserProfile, climate: &ClimateReading) -> [TechnologyPotential; 3] {
    let area = profile.usable_area_m2();
    [
        potential::solar_potential(climate, area, &SolarParameters::Default),
        potential::wind_potential(climate, area, &WindParameters::Default),
        potential::solar_thermal_potential(climate, &ThermalParameters::Default),
    ]
}

/// Attach coverage and economics to a potential
pub fn rank_option(potential: TechnologyPotential, coverage_pct: f64) -> RankedOption {
    RankedOption {
        technology: potential.technology,
        title: potential.technology.title().to_string(),
        coverage_pct,
        monthly_generation_kwh: potential.monthly_generation_kwh,
        annual_savings: impact::annual_savings(potential.monthly_generation_kwh),
        annual_co2_avoided_kg: impact::annual_co2_avoided_kg(potential.monthly_generation_kwh),
        technical_detail: potential.technical_summary(),
        detail: potential,
    }
}

/// Value an option is ranked by under an objective
pub fn ranking_key(option: &RankedOption, objective: Objective) -> f64 {
    match objective {
        Objective::Savings => option.annual_savings,
        Objective::Environmental => option.annual_co2_avoided_kg,
        Objective::Balanced => option.coverage_pct,
    }
}

/// Sort descending by the objective key. Stable, so ties keep technology order.
pub fn sort_options(options: &mut [RankedOption], objective: Objective) {
    options.sort_by(|a, b| ranking_key(b, objective).total_cmp(&ranking_key(a, objective)));
}

fn combination(technologies: [Technology; 2], combined_coverage_pct: f64) -> Combination {
    let [first, second] = technologies;
    Combination {
        technologies,
        combined_coverage_pct,
        description: format!(
            "{} + {}: {:.1}% combined coverage of the monthly consumption",
            first.title(),
            second.title(),
            combined_coverage_pct
        ),
    }
}

/// Combinations of the allowed pairs whose members are both options
pub fn pair_combinations(options: &[RankedOption]) -> Vec<Combination> {
    let coverage_of = |tech: Technology| {
        options
            .iter()
            .find(|o| o.technology == tech)
            .map(|o| o.coverage_pct)
    };

    COMBINABLE_PAIRS
        .iter()
        .filter_map(|pair| {
            let first = coverage_of(pair[0])?;
            let second = coverage_of(pair[1])?;
            Some(combination(*pair, (first + second).min(100.0)))
        })
        .collect()
}

fn summary_message(count: usize) -> String {
    match count {
        0 => "No renewable option is recommended for this location and household. \
              Try increasing the available area or reducing consumption."
            .to_string(),
        1 => "Identified 1 viable renewable option".to_string(),
        n => format!("Identified {n} viable renewable options"),
    }
}

// ============================================================================
// Static path
// ============================================================================

/// Recommendation from the default constants
pub fn compute_recommendation(profile: &UserProfile, climate: &ClimateReading) -> Recommendation {
    let monthly_consumption = resolve_consumption(profile);

    let mut options: Vec<RankedOption> = static_potentials(profile, climate)
        .into_iter()
        .filter_map(|p| {
            let coverage = impact::coverage_pct(p.monthly_generation_kwh, monthly_consumption);
            (coverage >= p.technology.viability_threshold_pct()).then(|| rank_option(p, coverage))
        })
        .collect();
    sort_options(&mut options, profile.objective);

    let combinations = pair_combinations(&options);
    let principal = options.first().cloned().map(Principal::Option);
    let budget_plan = optimal_mix(&options, profile.budget);

    debug!(
        monthly_consumption,
        options = options.len(),
        combinations = combinations.len(),
        "static recommendation computed"
    );

    Recommendation {
        message: summary_message(options.len()),
        monthly_consumption_kwh: monthly_consumption,
        options,
        combinations,
        principal,
        budget_plan,
        justification: None,
        source: RecommendationSource::StaticRules,
    }
}

// ============================================================================
// Advised path
// ============================================================================

/// Recommendation from an advisor verdict, or the static one when the verdict
/// marks nothing viable
pub fn compute_advised_recommendation(
    profile: &UserProfile,
    climate: &ClimateReading,
    verdict: &AdvisorVerdict,
) -> Recommendation {
    match advised_recommendation(profile, climate, verdict) {
        Some(recommendation) => recommendation,
        None => {
            warn!("advisor marked no technology viable, using static rules");
            compute_recommendation(profile, climate)
        }
    }
}

fn advised_recommendation(
    profile: &UserProfile,
    climate: &ClimateReading,
    verdict: &AdvisorVerdict,
) -> Option<Recommendation> {
    let monthly_consumption = resolve_consumption(profile);
    let area = profile.usable_area_m2();
    let advised = &verdict.options;

    let mut options = Vec::new();
    if let Some(coverage) = advised_coverage(Technology::Solar, advised.solar.viable, advised.solar.estimated_coverage) {
        let p = potential::solar_potential(climate, area, &advised.solar.parameters());
        options.push(rank_option(p, coverage));
    }
    if let Some(coverage) = advised_coverage(Technology::Wind, advised.wind.viable, advised.wind.estimated_coverage) {
        let p = potential::wind_potential(climate, area, &advised.wind.parameters());
        options.push(rank_option(p, coverage));
    }
    if let Some(coverage) = advised_coverage(
        Technology::SolarThermal,
        advised.solar_thermal.viable,
        advised.solar_thermal.estimated_coverage,
    ) {
        let p = potential::solar_thermal_potential(climate, &advised.solar_thermal.parameters());
        options.push(rank_option(p, coverage));
    }
    if options.is_empty() {
        return None;
    }
    sort_options(&mut options, profile.objective);

    let combinations = match advised_combination(verdict, &options) {
        Some(c) => vec![c],
        None => pair_combinations(&options),
    };

    let principal = match verdict.best_option {
        Some(BestOption::Combination) if !combinations.is_empty() => {
            Some(Principal::Combination(combinations[0].clone()))
        }
        Some(best) => best
            .technology()
            .and_then(|tech| options.iter().find(|o| o.technology == tech))
            .or_else(|| options.first())
            .cloned()
            .map(Principal::Option),
        None => options.first().cloned().map(Principal::Option),
    };
    let budget_plan = optimal_mix(&options, profile.budget);

    Some(Recommendation {
        message: summary_message(options.len()),
        monthly_consumption_kwh: monthly_consumption,
        options,
        combinations,
        principal,
        budget_plan,
        justification: Some(verdict.justification.clone()),
        source: RecommendationSource::Advisor,
    })
}

/// Clamped coverage of an advised technology. Viable entries without a
/// coverage estimate are dropped.
fn advised_coverage(technology: Technology, viable: bool, coverage: Option<f64>) -> Option<f64> {
    if !viable {
        return None;
    }
    match coverage {
        Some(pct) if pct.is_finite() && pct > 0.0 => Some(clamp_coverage(pct)),
        other => {
            warn!(%technology, coverage = ?other, "advised option has no usable coverage, dropping it");
            None
        }
    }
}

/// Allowed pair made of `a` and `b`, in its canonical order
fn combinable_pair(a: Technology, b: Technology) -> Option<[Technology; 2]> {
    COMBINABLE_PAIRS
        .into_iter()
        .find(|[first, second]| (a, b) == (*first, *second) || (b, a) == (*first, *second))
}

/// The advisor's own pairing, when it names an allowed pair of two advised options
fn advised_combination(verdict: &AdvisorVerdict, options: &[RankedOption]) -> Option<Combination> {
    let advised = verdict.recommended_combination.as_ref()?;
    let [first, second] = match advised.options.as_slice() {
        [a, b, ..] => combinable_pair(*a, *b)?,
        _ => return None,
    };
    let is_option = |tech: Technology| options.iter().any(|o| o.technology == tech);
    if !is_option(first) || !is_option(second) {
        warn!(
            advised = ?advised.options,
            "advisor combination names a technology that is not an option, pairing options instead"
        );
        return None;
    }

    let coverage = if advised.combined_coverage.is_finite() && advised.combined_coverage > 0.0 {
        clamp_coverage(advised.combined_coverage)
    } else {
        let sum: f64 = options
            .iter()
            .filter(|o| o.technology == first || o.technology == second)
            .map(|o| o.coverage_pct)
            .sum();
        sum.min(100.0)
    };

    let mut combo = combination([first, second], coverage);
    if !advised.justification.trim().is_empty() {
        combo.description = advised.justification.clone();
    }
    Some(combo)
}

fn clamp_coverage(pct: f64) -> f64 {
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

// ============================================================================
// Budget-constrained mix
// ============================================================================

/// Best installation plan among single options and allowed pairs.
///
/// With a budget, plans costing more are dropped and the rest are ranked by
/// coverage per 100 currency units. Without one, by total coverage.
pub fn optimal_mix(options: &[RankedOption], budget: Option<f64>) -> Option<MixPlan> {
    let budget = budget.filter(|b| b.is_finite() && *b > 0.0);

    let mut plans: Vec<MixPlan> = options
        .iter()
        .map(|o| plan(&[o]))
        .collect();
    for pair in COMBINABLE_PAIRS {
        let first = options.iter().find(|o| o.technology == pair[0]);
        let second = options.iter().find(|o| o.technology == pair[1]);
        if let (Some(first), Some(second)) = (first, second) {
            plans.push(plan(&[first, second]));
        }
    }

    if let Some(limit) = budget {
        plans.retain(|p| p.total_cost <= limit);
    }

    let key = |p: &MixPlan| if budget.is_some() { p.cost_benefit } else { p.total_coverage_pct };
    plans
        .into_iter()
        .max_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal))
}

fn plan(members: &[&RankedOption]) -> MixPlan {
    let total_cost: f64 = members.iter().map(|o| o.detail.estimated_cost).sum();
    let total_coverage_pct = members
        .iter()
        .map(|o| o.coverage_pct)
        .sum::<f64>()
        .min(100.0);
    MixPlan {
        technologies: members.iter().map(|o| o.technology).collect(),
        total_coverage_pct,
        total_cost,
        cost_benefit: if total_cost > 0.0 {
            total_coverage_pct / total_cost * 100.0
        } else {
            0.0
        },
    }
}
