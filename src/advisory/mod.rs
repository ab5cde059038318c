//! Optional advisors around the numeric engine.
//!
//! A [`ParameterAdvisor`] supplies per-technology viability and tuned
//! parameters for the advised recommendation path. An [`AdvisoryTextGenerator`]
//! writes the human readable advice. Neither is required: without them the
//! engine runs on its static rules and the response carries no advice.

pub mod chat;
pub mod rules;

pub use chat::ChatCompletionAdvisor;
pub use rules::RuleBasedAdvisor;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AdviceReport, AdvisorVerdict, ClimateReading, TechnologyPotential, UserProfile};

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisor returned HTTP {0}")]
    Status(u16),
    #[error("advisor answer carried no JSON content")]
    MissingContent,
    #[error("advisor answer is malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ParameterAdvisor: Send + Sync {
    async fn evaluate(
        &self,
        profile: &UserProfile,
        climate: &ClimateReading,
    ) -> Result<AdvisorVerdict, AdvisoryError>;
}

pub trait AdvisoryTextGenerator: Send + Sync {
    fn advise(
        &self,
        profile: &UserProfile,
        climate: &ClimateReading,
        potentials: &[TechnologyPotential],
    ) -> AdviceReport;
}
