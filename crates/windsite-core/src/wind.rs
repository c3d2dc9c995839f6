//! Wind scenarios and weighted wind regimes.

use crate::units::{Degrees, MetersPerSecond};
use crate::{SiteError, SiteResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tolerance on `|Σp − 1|` before a regime counts as unnormalized
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One wind state: free-stream speed, compass direction and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindScenario {
    pub speed: MetersPerSecond,
    /// Compass bearing the wind blows from
    pub direction: Degrees,
    pub probability: f64,
}

impl WindScenario {
    pub fn new(speed: f64, direction: f64, probability: f64) -> Self {
        Self {
            speed: MetersPerSecond(speed),
            direction: Degrees(direction),
            probability,
        }
    }

    fn validate(&self, index: usize) -> SiteResult<()> {
        if !self.speed.is_finite() || self.speed.value() < 0.0 {
            return Err(SiteError::Validation(format!(
                "scenario {index}: speed must be finite and non-negative, got {}",
                self.speed
            )));
        }
        if !self.direction.is_finite() {
            return Err(SiteError::Validation(format!(
                "scenario {index}: direction must be finite"
            )));
        }
        if !self.probability.is_finite() || self.probability < 0.0 {
            return Err(SiteError::Validation(format!(
                "scenario {index}: probability must be finite and non-negative, got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

/// What to do when regime probabilities do not sum to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityPolicy {
    /// Use the weights verbatim
    PassThrough,
    /// Use the weights verbatim and log a warning
    #[default]
    Warn,
    /// Rescale the weights so they sum to one
    Normalize,
    /// Refuse the regime
    Reject,
}

impl std::str::FromStr for ProbabilityPolicy {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pass_through" | "pass-through" | "passthrough" => Ok(Self::PassThrough),
            "warn" => Ok(Self::Warn),
            "normalize" => Ok(Self::Normalize),
            "reject" => Ok(Self::Reject),
            other => Err(SiteError::Config(format!(
                "unknown probability policy '{other}'"
            ))),
        }
    }
}

/// Ordered collection of weighted wind scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindRegime {
    scenarios: Vec<WindScenario>,
}

impl WindRegime {
    /// Build a regime under the default [`ProbabilityPolicy::Warn`].
    pub fn new(scenarios: Vec<WindScenario>) -> SiteResult<Self> {
        Self::with_policy(scenarios, ProbabilityPolicy::default())
    }

    /// Single scenario carrying the full probability mass.
    pub fn single(speed: f64, direction: f64) -> SiteResult<Self> {
        Self::new(vec![WindScenario::new(speed, direction, 1.0)])
    }

    pub fn with_policy(
        mut scenarios: Vec<WindScenario>,
        policy: ProbabilityPolicy,
    ) -> SiteResult<Self> {
        if scenarios.is_empty() {
            return Err(SiteError::Precondition("wind regime has no scenarios".into()));
        }
        for (idx, scenario) in scenarios.iter_mut().enumerate() {
            scenario.validate(idx)?;
            scenario.direction = scenario.direction.normalized();
        }

        let total: f64 = scenarios.iter().map(|s| s.probability).sum();
        let normalized = (total - 1.0).abs() <= PROBABILITY_TOLERANCE;
        match policy {
            ProbabilityPolicy::PassThrough => {}
            ProbabilityPolicy::Warn => {
                if !normalized {
                    warn!(
                        total_probability = total,
                        "wind regime probabilities do not sum to 1; using them as given"
                    );
                }
            }
            ProbabilityPolicy::Normalize => {
                if total <= 0.0 {
                    return Err(SiteError::Validation(
                        "cannot normalize a wind regime with zero total probability".into(),
                    ));
                }
                if !normalized {
                    for scenario in &mut scenarios {
                        scenario.probability /= total;
                    }
                }
            }
            ProbabilityPolicy::Reject => {
                if !normalized {
                    return Err(SiteError::Validation(format!(
                        "wind regime probabilities sum to {total:.6}, expected 1"
                    )));
                }
            }
        }

        Ok(Self { scenarios })
    }

    #[inline]
    pub fn scenarios(&self) -> &[WindScenario] {
        &self.scenarios
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WindScenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.scenarios.iter().map(|s| s.probability).sum()
    }

    /// Highest free-stream speed in the regime
    pub fn max_speed(&self) -> MetersPerSecond {
        self.scenarios
            .iter()
            .map(|s| s.speed)
            .fold(MetersPerSecond(0.0), MetersPerSecond::max)
    }
}

impl<'a> IntoIterator for &'a WindRegime {
    type Item = &'a WindScenario;
    type IntoIter = std::slice::Iter<'a, WindScenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
