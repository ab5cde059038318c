//! Advice text from fixed rule tables keyed by objective and climate class.

use crate::domain::{
    AdviceReport, ClimateReading, DwellingType, Objective, Technology, TechnologyPotential,
    UserProfile,
};

use super::AdvisoryTextGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suitability {
    Good,
    Conditional,
    Poor,
}

/// How well the climate suits each technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateOutlook {
    pub solar: Suitability,
    pub wind: Suitability,
    pub solar_thermal: bool,
}

impl ClimateOutlook {
    pub fn classify(climate: &ClimateReading) -> Self {
        let solar = match climate.solar_irradiance {
            x if x >= 4.0 => Suitability::Good,
            x if x >= 3.0 => Suitability::Conditional,
            _ => Suitability::Poor,
        };
        let wind = match climate.wind_speed {
            x if x >= 4.5 => Suitability::Good,
            x if x >= 3.5 => Suitability::Conditional,
            _ => Suitability::Poor,
        };
        Self {
            solar,
            wind,
            solar_thermal: climate.solar_irradiance >= 3.0 && climate.avg_temperature >= 15.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAdvisor;

impl AdvisoryTextGenerator for RuleBasedAdvisor {
    fn advise(
        &self,
        profile: &UserProfile,
        climate: &ClimateReading,
        potentials: &[TechnologyPotential],
    ) -> AdviceReport {
        let outlook = ClimateOutlook::classify(climate);
        let irr = climate.solar_irradiance;
        let wind = climate.wind_speed;

        let mut report = match profile.objective {
            Objective::Savings => savings_advice(outlook, irr, wind, climate.avg_temperature),
            Objective::Environmental => environmental_advice(outlook, irr, wind),
            Objective::Balanced => balanced_advice(outlook, irr, wind),
        };

        let viable: Vec<&str> = potentials
            .iter()
            .filter(|p| p.is_viable)
            .map(|p| p.technology.title())
            .collect();
        if !viable.is_empty() {
            report.justification.push_str(&format!(
                " Technologies with meaningful generation at this site: {}.",
                viable.join(", ")
            ));
        }
        if let Some(solar) = potentials
            .iter()
            .find(|p| p.technology == Technology::Solar && p.is_viable)
        {
            report.tips.push(format!(
                "A {:.1} kWp array fits your available area and would produce about {:.0} kWh per month",
                solar.recommended_capacity, solar.monthly_generation_kwh
            ));
        }

        report.special_considerations = dwelling_considerations(profile.dwelling_type).to_string();
        report
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn savings_advice(outlook: ClimateOutlook, irr: f64, wind: f64, temp: f64) -> AdviceReport {
    if outlook.solar == Suitability::Good {
        AdviceReport {
            principal_recommendation: "Photovoltaic solar system".into(),
            justification: format!(
                "With solar irradiance of {irr} kWh/m²/day at your location, a photovoltaic \
                 system gives the best return on investment for maximising savings."
            ),
            advantages: strings(&[
                "Excellent long-term cost-benefit ratio",
                "Significant reduction of the electricity bill",
                "Low maintenance and a service life of 25+ years",
            ]),
            disadvantages: strings(&[
                "Considerable upfront investment",
                "Generation varies with the weather",
                "Needs enough well-oriented roof or ground space",
            ]),
            tips: strings(&[
                "Start with a small, expandable system",
                "Check the tax incentives or subsidies available in your region",
                "Add energy efficiency measures to make the most of the savings",
            ]),
            ..AdviceReport::default()
        }
    } else if outlook.wind == Suitability::Good {
        AdviceReport {
            principal_recommendation: "Domestic wind system".into(),
            justification: format!(
                "With an average wind speed of {wind} m/s at your location, a domestic wind \
                 turbine offers a good opportunity to save on energy."
            ),
            advantages: strings(&[
                "Generates day and night",
                "Good complement for cloudy days",
                "High output potential in windy regions",
            ]),
            disadvantages: strings(&[
                "More maintenance than solar panels",
                "May produce noise and vibration",
                "Output varies strongly with the exact site",
            ]),
            tips: strings(&[
                "Commission a local wind study before investing",
                "Check local rules on tower height and noise",
            ]),
            ..AdviceReport::default()
        }
    } else {
        AdviceReport {
            principal_recommendation: "Solar water heater with a basic photovoltaic system".into(),
            justification: format!(
                "Given your savings objective and the local climate (irradiance {irr} kWh/m²/day, \
                 temperature {temp} °C), a solar water heater combined with a basic photovoltaic \
                 system gives the best cost-benefit balance."
            ),
            advantages: strings(&[
                "Excellent cost-benefit ratio for domestic hot water",
                "Lower upfront investment than a full system",
                "Fast payback of the water heater (3 to 5 years)",
            ]),
            disadvantages: strings(&[
                "Does not cover all of your energy needs",
                "Needs space for both systems",
                "May need backup heating on low-irradiance days",
            ]),
            tips: strings(&[
                "Size the water heater to your actual hot water use",
                "Expand the photovoltaic system progressively",
            ]),
            ..AdviceReport::default()
        }
    }
}

fn environmental_advice(outlook: ClimateOutlook, irr: f64, wind: f64) -> AdviceReport {
    if outlook.solar == Suitability::Good && outlook.solar_thermal {
        AdviceReport {
            principal_recommendation: "Integrated hybrid system (photovoltaic + solar water heater)".into(),
            justification: format!(
                "A hybrid system that pairs photovoltaic panels with a solar water heater makes \
                 full use of the good irradiance at your location ({irr} kWh/m²/day) and cuts \
                 emissions from both electricity and water heating."
            ),
            advantages: strings(&[
                "Largest reduction of CO2 emissions",
                "Covers both electrical and thermal needs",
                "Greater energy independence",
            ]),
            disadvantages: strings(&[
                "Higher upfront investment",
                "Needs more installation space",
                "More complex installation and maintenance",
            ]),
            tips: strings(&[
                "Consider a battery to raise self-consumption",
                "Pair the system with consumption reduction measures",
            ]),
            ..AdviceReport::default()
        }
    } else if outlook.wind == Suitability::Good {
        AdviceReport {
            principal_recommendation: "Wind system with storage".into(),
            justification: format!(
                "Given the good wind conditions at your location (average {wind} m/s) and your \
                 environmental objective, a wind turbine with energy storage is an excellent way \
                 to reduce your carbon footprint."
            ),
            advantages: strings(&[
                "High reduction of CO2 emissions",
                "Generates around the clock when the wind blows",
                "Complements other renewable sources",
            ]),
            disadvantages: strings(&[
                "Higher maintenance cost",
                "Output depends on wind conditions",
                "Battery manufacturing has its own environmental impact",
            ]),
            tips: strings(&[
                "Look for turbines built with recyclable materials",
                "Plan for component recycling at end of life",
            ]),
            ..AdviceReport::default()
        }
    } else {
        AdviceReport {
            principal_recommendation: "Photovoltaic system sized for maximum capacity".into(),
            justification: format!(
                "For the largest positive impact at your location, a photovoltaic system sized \
                 to maximise generation makes the most of the available irradiance \
                 ({irr} kWh/m²/day)."
            ),
            advantages: strings(&[
                "Significant reduction of CO2 emissions",
                "Mature and proven technology",
                "Long service life with little degradation",
            ]),
            disadvantages: strings(&[
                "Generates during daylight only",
                "Needs a large surface to maximise capacity",
                "Seasonal variation in output",
            ]),
            tips: strings(&[
                "Use as much of the available surface as possible",
                "Consider bifacial panels for higher yield",
                "Install monitoring to track performance",
            ]),
            ..AdviceReport::default()
        }
    }
}

fn balanced_advice(outlook: ClimateOutlook, irr: f64, wind: f64) -> AdviceReport {
    if outlook.solar == Suitability::Good {
        AdviceReport {
            principal_recommendation: "Balanced photovoltaic system".into(),
            justification: format!(
                "A photovoltaic system offers the best balance between investment, output and \
                 sustainability at your location, which receives {irr} kWh/m²/day."
            ),
            advantages: strings(&[
                "Good balance between investment and return",
                "Proven and widely available technology",
                "Scales with your needs and budget",
            ]),
            disadvantages: strings(&[
                "Generates during daylight only",
                "Efficiency suffers from shading and poor orientation",
            ]),
            tips: strings(&[
                "Size the system to your average consumption",
                "Add storage progressively",
            ]),
            ..AdviceReport::default()
        }
    } else if outlook.wind == Suitability::Good {
        AdviceReport {
            principal_recommendation: "Adapted domestic wind system".into(),
            justification: format!(
                "Considering your balanced objective and the favourable wind at your location \
                 (average {wind} m/s), a domestic wind turbine combines output and investment well."
            ),
            advantages: strings(&[
                "Potential generation around the clock",
                "Needs less surface than solar panels",
            ]),
            disadvantages: strings(&[
                "Higher variability of output",
                "Requires detailed wind studies",
                "Possible municipal restrictions",
            ]),
            tips: strings(&[
                "Start small and evaluate the results",
                "Install at the highest, most open point available",
            ]),
            ..AdviceReport::default()
        }
    } else {
        AdviceReport {
            principal_recommendation: "Staged hybrid system".into(),
            justification: "A staged approach, starting with a solar water heater and adding a \
                            photovoltaic system later, fits your climate and objectives best."
                .into(),
            advantages: strings(&[
                "More affordable initial investment",
                "Can be expanded progressively",
                "Adapts to changes in consumption or budget",
            ]),
            disadvantages: strings(&[
                "Longer implementation timeline",
                "Later stages may need modifications",
            ]),
            tips: strings(&[
                "Begin with a solar water heater for hot water",
                "Plan the photovoltaic installation as a second phase",
            ]),
            ..AdviceReport::default()
        }
    }
}

fn dwelling_considerations(dwelling: Option<DwellingType>) -> &'static str {
    match dwelling {
        Some(DwellingType::Apartment) => {
            "In an apartment, check the building regulations first and favour compact \
             solutions such as balcony solar kits or shared community installations."
        }
        Some(DwellingType::SmallHouse) => {
            "In a small house, prioritise space efficiency: use high-efficiency panels and \
             integrated solutions that combine several functions."
        }
        Some(DwellingType::Commerce) => {
            "Commercial premises consume mostly during daylight, which suits direct solar \
             self-consumption. Analyse your load curve to size the system."
        }
        _ => "",
    }
}
