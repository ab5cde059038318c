use anyhow::Result;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{
    advisory::{AdvisoryTextGenerator, ChatCompletionAdvisor, ParameterAdvisor, RuleBasedAdvisor},
    climate::{CachedClimateProvider, ClimateProvider, Location, OpenMeteoClient, SystemClock, TtlCache},
    config::Config,
    domain::{
        AdviceReport, Appliance, ClimateReading, DwellingType, Recommendation, SimulationResult,
        SubstitutedInput, UserProfile,
    },
    engine::{self, recommendation, simulator, SimulationError},
    fallback::{with_fallback, with_fallback_timeout},
};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub advisor: Arc<AdvisorController>,
}

impl AppState {
    pub async fn new(cfg: Config) -> Result<Self> {
        let open_meteo: Arc<dyn ClimateProvider> = Arc::new(OpenMeteoClient::new(&cfg.climate)?);
        let cache = TtlCache::new(
            Duration::from_secs(cfg.climate.cache_ttl_seconds),
            cfg.climate.cache_capacity,
            Arc::new(SystemClock),
        );
        let climate: Arc<dyn ClimateProvider> =
            Arc::new(CachedClimateProvider::new(open_meteo, cache));

        let mut advisor = AdvisorController::new(climate, cfg.simulator.default_location.clone());

        if cfg.advisory.enabled {
            if cfg.advisory.api_key.trim().is_empty() {
                warn!("advisory enabled without an API key, using static rules only");
            } else if let Some(chat) = with_fallback(
                "parameter advisor",
                || ChatCompletionAdvisor::new(&cfg.advisory).map(Some),
                None,
            ) {
                advisor = advisor.with_parameter_advisor(
                    Arc::new(chat),
                    Duration::from_secs(cfg.advisory.http_timeout_seconds),
                );
                info!(model = %cfg.advisory.model, "parameter advisor enabled");
            }
        }
        if cfg.advisory.text_advice {
            advisor = advisor.with_text_generator(Arc::new(RuleBasedAdvisor));
        }

        Ok(Self::from_parts(cfg, advisor))
    }

    pub fn from_parts(cfg: Config, advisor: AdvisorController) -> Self {
        Self {
            cfg,
            advisor: Arc::new(advisor),
        }
    }
}

/// Outcome of a full diagnosis
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub climate: ClimateReading,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<AdviceReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substituted_inputs: Vec<SubstitutedInput>,
}

/// Request pipeline: climate lookup, consumption estimate, engine, advice
pub struct AdvisorController {
    climate: Arc<dyn ClimateProvider>,
    parameter_advisor: Option<(Arc<dyn ParameterAdvisor>, Duration)>,
    text_generator: Option<Arc<dyn AdvisoryTextGenerator>>,
    default_location: String,
}

impl AdvisorController {
    pub fn new(climate: Arc<dyn ClimateProvider>, default_location: String) -> Self {
        Self {
            climate,
            parameter_advisor: None,
            text_generator: None,
            default_location,
        }
    }

    pub fn with_parameter_advisor(mut self, advisor: Arc<dyn ParameterAdvisor>, timeout: Duration) -> Self {
        self.parameter_advisor = Some((advisor, timeout));
        self
    }

    pub fn with_text_generator(mut self, generator: Arc<dyn AdvisoryTextGenerator>) -> Self {
        self.text_generator = Some(generator);
        self
    }

    pub fn has_parameter_advisor(&self) -> bool {
        self.parameter_advisor.is_some()
    }

    /// The requested location, or the default one when it is missing or malformed
    pub fn resolve_location(&self, requested: Option<&str>) -> (String, Option<SubstitutedInput>) {
        match requested.map(Location::parse) {
            Some(Ok(location)) => (location.to_string(), None),
            other => {
                let reason = match other {
                    Some(Err(e)) => e.to_string(),
                    _ => "missing".to_string(),
                };
                warn!(
                    requested = ?requested,
                    reason = %reason,
                    substituted = %self.default_location,
                    "invalid location, using default"
                );
                (
                    self.default_location.clone(),
                    Some(SubstitutedInput::new("location", &self.default_location)),
                )
            }
        }
    }

    pub async fn climate(&self, location: &str) -> ClimateReading {
        self.climate.lookup(location).await
    }

    pub async fn diagnose(&self, profile: &UserProfile, location: Option<&str>) -> Diagnosis {
        let (location, substituted) = self.resolve_location(location);
        let climate = self.climate.lookup(&location).await;

        let verdict = match &self.parameter_advisor {
            Some((advisor, timeout)) => {
                with_fallback_timeout(
                    "parameter advisor",
                    *timeout,
                    async { advisor.evaluate(profile, &climate).await.map(Some) },
                    || None,
                )
                .await
            }
            None => None,
        };

        let recommendation = match &verdict {
            Some(v) => engine::compute_advised_recommendation(profile, &climate, v),
            None => engine::compute_recommendation(profile, &climate),
        };

        let advice = self.text_generator.as_ref().map(|generator| {
            let potentials = recommendation::static_potentials(profile, &climate);
            generator.advise(profile, &climate, &potentials)
        });

        info!(
            location = %climate.location_label,
            source = ?recommendation.source,
            options = recommendation.options.len(),
            "diagnosis complete"
        );

        Diagnosis {
            climate,
            recommendation,
            advice,
            substituted_inputs: substituted.into_iter().collect(),
        }
    }

    pub async fn simulate(
        &self,
        technology: &str,
        capacity: Option<f64>,
        location: Option<&str>,
        monthly_consumption: Option<f64>,
    ) -> Result<SimulationResult, SimulationError> {
        // Unknown technologies are rejected before any climate lookup
        let technology = simulator::parse_technology(technology)?;

        let (location, substituted) = self.resolve_location(location);
        let climate = self.climate.lookup(&location).await;
        let mut result = simulator::simulate(technology, capacity, &climate, monthly_consumption);
        result.substituted_inputs.extend(substituted);
        Ok(result)
    }

    pub fn estimate_consumption(
        &self,
        dwelling_type: Option<DwellingType>,
        appliances: &[Appliance],
    ) -> f64 {
        engine::estimate_consumption(dwelling_type, appliances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advisory::AdvisoryError,
        domain::{AdvisorVerdict, RecommendationSource, Technology},
    };
    use async_trait::async_trait;

    struct FixedClimate;

    #[async_trait]
    impl ClimateProvider for FixedClimate {
        async fn lookup(&self, location: &str) -> ClimateReading {
            ClimateReading::measured(location, None, None, 5.5, 3.0, 20.0)
        }
    }

    struct FailingAdvisor;

    #[async_trait]
    impl ParameterAdvisor for FailingAdvisor {
        async fn evaluate(
            &self,
            _profile: &UserProfile,
            _climate: &ClimateReading,
        ) -> Result<AdvisorVerdict, AdvisoryError> {
            Err(AdvisoryError::MissingContent)
        }
    }

    struct SlowAdvisor;

    #[async_trait]
    impl ParameterAdvisor for SlowAdvisor {
        async fn evaluate(
            &self,
            _profile: &UserProfile,
            _climate: &ClimateReading,
        ) -> Result<AdvisorVerdict, AdvisoryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(AdvisoryError::MissingContent)
        }
    }

    fn controller() -> AdvisorController {
        AdvisorController::new(Arc::new(FixedClimate), "-34.6037,-58.3816".into())
    }

    #[test]
    fn test_resolve_location_substitutes_default() {
        let c = controller();
        let (loc, sub) = c.resolve_location(Some("  "));
        assert_eq!(loc, "-34.6037,-58.3816");
        assert_eq!(sub.map(|s| s.field), Some("location".to_string()));

        let (loc, sub) = c.resolve_location(Some("100,0"));
        assert_eq!(loc, "-34.6037,-58.3816");
        assert!(sub.is_some());

        let (loc, sub) = c.resolve_location(Some("Bariloche"));
        assert_eq!(loc, "Bariloche");
        assert!(sub.is_none());
    }

    #[tokio::test]
    async fn test_failing_advisor_falls_back_to_static_rules() {
        let c = controller().with_parameter_advisor(Arc::new(FailingAdvisor), Duration::from_secs(1));
        let d = c.diagnose(&UserProfile::default(), Some("Córdoba")).await;
        assert_eq!(d.recommendation.source, RecommendationSource::StaticRules);
        assert!(d.advice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_advisor_times_out() {
        let c = controller().with_parameter_advisor(Arc::new(SlowAdvisor), Duration::from_secs(2));
        let d = c.diagnose(&UserProfile::default(), None).await;
        assert_eq!(d.recommendation.source, RecommendationSource::StaticRules);
        assert_eq!(d.climate.location_label, "-34.6037,-58.3816");
    }

    #[tokio::test]
    async fn test_text_generator_attaches_advice() {
        let c = controller().with_text_generator(Arc::new(RuleBasedAdvisor));
        let d = c.diagnose(&UserProfile::default(), Some("Salta")).await;
        let advice = d.advice.expect("advice generated");
        assert!(!advice.principal_recommendation.is_empty());
    }

    #[tokio::test]
    async fn test_simulate_records_location_substitution() {
        let result = controller()
            .simulate("solar", Some(2.0), None, Some(250.0))
            .await
            .unwrap();
        assert_eq!(result.technology, Technology::Solar);
        assert!(result.substituted_inputs.iter().any(|s| s.field == "location"));
    }

    #[tokio::test]
    async fn test_simulate_unknown_technology() {
        let err = controller().simulate("geothermal", None, None, None).await.unwrap_err();
        assert_eq!(err, SimulationError::UnsupportedTechnology("geothermal".into()));
    }
}
