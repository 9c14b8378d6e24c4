use std::sync::Arc;

use tracing::debug;

use super::domain::ComparisonResult;
use super::roster::Roster;
use super::scoring::{NoiseSource, ScoreCalculator, ScoringPolicy};

/// Typed failure for lookups that miss the roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("athlete(s) not found: {}", .0.join(", "))]
    CompetitorNotFound(Vec<String>),
    #[error("activity not found: {0}")]
    ActivityNotFound(String),
    #[error("score for {competitor} in {activity} is not a finite number")]
    NonFiniteScore { competitor: String, activity: String },
}

/// Resolves names against the roster and scores both competitors.
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    roster: Arc<Roster>,
    calculator: ScoreCalculator,
}

impl ComparisonEngine {
    pub fn new(roster: Arc<Roster>, policy: ScoringPolicy) -> Self {
        Self {
            roster,
            calculator: ScoreCalculator::new(policy),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.calculator.policy()
    }

    /// Competitor 1 draws its noise before competitor 2. Overflowing scores are rejected
    /// rather than compared.
    pub fn compare(
        &self,
        competitor1: &str,
        competitor2: &str,
        activity: &str,
        noise: &mut dyn NoiseSource,
    ) -> Result<ComparisonResult, ComparisonError> {
        let first = self.roster.competitor(competitor1);
        let second = self.roster.competitor(competitor2);

        let (first, second) = match (first, second) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                let missing = [(competitor1, first), (competitor2, second)]
                    .into_iter()
                    .filter(|(_, found)| found.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                return Err(ComparisonError::CompetitorNotFound(missing));
            }
        };

        let activity = self
            .roster
            .activity(activity)
            .ok_or_else(|| ComparisonError::ActivityNotFound(activity.to_string()))?;

        let score1 = self
            .calculator
            .score(&first.attributes, &activity.weights, noise);
        let score2 = self
            .calculator
            .score(&second.attributes, &activity.weights, noise);

        for (competitor, score) in [(first, score1), (second, score2)] {
            if !score.is_finite() {
                return Err(ComparisonError::NonFiniteScore {
                    competitor: competitor.name.clone(),
                    activity: activity.name.clone(),
                });
            }
        }

        let result =
            ComparisonResult::from_scores(&activity.name, &first.name, score1, &second.name, score2);
        debug!(
            activity = %result.activity,
            score1 = result.score1,
            score2 = result.score2,
            winner = result.winner_label(),
            "comparison scored"
        );
        Ok(result)
    }
}
