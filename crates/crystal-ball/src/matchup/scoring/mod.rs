mod noise;
mod rules;

pub use noise::{NoiseMode, NoiseSource, Noiseless, ParseNoiseModeError, RandomNoise};

use std::fmt;
use std::str::FromStr;

use super::domain::AttributeMap;

/// Where the normalized policy divides by the weight sum and adds its Gaussian draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Once, after every attribute has been accumulated.
    Once,
    /// After every accumulation, compounding across attributes (legacy output).
    PerAttribute,
}

/// Scoring rule applied to a competitor's attributes for an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Weighted sum with one uniform jitter draw in `[-2, 2]`.
    Linear,
    /// Sign-preserving `|v|^1.2` scaling, per-attribute form in `[0.9, 1.1]`,
    /// normalization by the absolute weight sum, and `N(0, 1.5)` noise.
    Normalized(Normalization),
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::Normalized(Normalization::Once)
    }
}

impl ScoringPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringPolicy::Linear => "linear",
            ScoringPolicy::Normalized(Normalization::Once) => "normalized",
            ScoringPolicy::Normalized(Normalization::PerAttribute) => "normalized-compounding",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised scoring policy '{0}'")]
pub struct ParseScoringPolicyError(pub String);

impl FromStr for ScoringPolicy {
    type Err = ParseScoringPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(ScoringPolicy::Linear),
            "normalized" | "normalised" => Ok(ScoringPolicy::Normalized(Normalization::Once)),
            "normalized-compounding" | "compounding" => {
                Ok(ScoringPolicy::Normalized(Normalization::PerAttribute))
            }
            _ => Err(ParseScoringPolicyError(value.to_string())),
        }
    }
}

/// Stateless scorer; all randomness comes from the caller's [`NoiseSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator {
    policy: ScoringPolicy,
}

impl ScoreCalculator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Weights absent from `attributes` count as zero; attributes without a weight are ignored.
    pub fn score(
        &self,
        attributes: &AttributeMap,
        weights: &AttributeMap,
        noise: &mut dyn NoiseSource,
    ) -> f64 {
        match self.policy {
            ScoringPolicy::Linear => rules::linear_score(attributes, weights, noise),
            ScoringPolicy::Normalized(normalization) => {
                rules::normalized_score(attributes, weights, normalization, noise)
            }
        }
    }
}
