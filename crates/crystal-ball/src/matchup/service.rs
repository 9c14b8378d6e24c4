use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::commentary::{CommentaryError, CommentaryGenerator, CommentaryRequest};
use super::domain::ComparisonResult;
use super::engine::{ComparisonEngine, ComparisonError};
use super::scoring::NoiseMode;

/// Inbound selection. Field aliases cover both names the legacy browser client used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchupRequest {
    #[serde(default, alias = "player1")]
    pub athlete1: Option<String>,
    #[serde(default, alias = "player2")]
    pub athlete2: Option<String>,
    #[serde(default, alias = "event")]
    pub activity: Option<String>,
}

/// A request with every field present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupSelection {
    pub competitor1: String,
    pub competitor2: String,
    pub activity: String,
}

impl MatchupRequest {
    pub fn new(
        athlete1: impl Into<String>,
        athlete2: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            athlete1: Some(athlete1.into()),
            athlete2: Some(athlete2.into()),
            activity: Some(activity.into()),
        }
    }

    pub fn into_selection(self) -> Result<MatchupSelection, MatchupServiceError> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        }

        let athlete1 = present(self.athlete1);
        let athlete2 = present(self.athlete2);
        let activity = present(self.activity);

        match (athlete1, athlete2, activity) {
            (Some(competitor1), Some(competitor2), Some(activity)) => Ok(MatchupSelection {
                competitor1,
                competitor2,
                activity,
            }),
            (athlete1, athlete2, activity) => {
                let missing = [
                    ("athlete1", athlete1.is_none()),
                    ("athlete2", athlete2.is_none()),
                    ("activity", activity.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(MatchupServiceError::MissingSelection(missing))
            }
        }
    }
}

/// What happened to the narrative step of a matchup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryStatus {
    Generated,
    Unavailable(CommentaryError),
    Skipped,
}

impl CommentaryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CommentaryStatus::Generated => "generated",
            CommentaryStatus::Unavailable(_) => "unavailable",
            CommentaryStatus::Skipped => "skipped",
        }
    }
}

/// Comparison plus the fate of its commentary. The numbers are valid either way.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupOutcome {
    pub result: ComparisonResult,
    pub commentary: CommentaryStatus,
}

impl MatchupOutcome {
    pub fn view(&self) -> MatchupView {
        let result = &self.result;
        MatchupView {
            activity: result.activity.clone(),
            athlete1: result.competitor1.clone(),
            score1: result.score1,
            athlete2: result.competitor2.clone(),
            score2: result.score2,
            margin: result.margin,
            winner: result.winner_label().to_string(),
            draw: result.verdict.is_draw(),
            commentary: result.commentary.clone(),
            commentary_status: self.commentary.label(),
            commentary_error: match &self.commentary {
                CommentaryStatus::Unavailable(err) => Some(err.to_string()),
                _ => None,
            },
        }
    }
}

/// Outbound JSON shape for a finished matchup.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupView {
    pub activity: String,
    pub athlete1: String,
    pub score1: f64,
    pub athlete2: String,
    pub score2: f64,
    pub margin: f64,
    pub winner: String,
    pub draw: bool,
    pub commentary: Option<String>,
    pub commentary_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary_error: Option<String>,
}

/// Validates selections, runs the engine, then asks for commentary without
/// letting the narrator put the result at risk.
pub struct MatchupService {
    engine: Arc<ComparisonEngine>,
    commentary: Arc<dyn CommentaryGenerator>,
    noise: NoiseMode,
    commentary_timeout: Duration,
}

impl MatchupService {
    pub fn new(
        engine: Arc<ComparisonEngine>,
        commentary: Arc<dyn CommentaryGenerator>,
        noise: NoiseMode,
        commentary_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            commentary,
            noise,
            commentary_timeout,
        }
    }

    pub fn engine(&self) -> &ComparisonEngine {
        &self.engine
    }

    pub fn noise(&self) -> NoiseMode {
        self.noise
    }

    /// Numbers only, no commentary.
    pub fn compare(
        &self,
        selection: &MatchupSelection,
    ) -> Result<ComparisonResult, ComparisonError> {
        let mut noise = self.noise.source();
        self.engine.compare(
            &selection.competitor1,
            &selection.competitor2,
            &selection.activity,
            noise.as_mut(),
        )
    }

    /// Validate, compare, and narrate.
    pub async fn run(&self, request: MatchupRequest) -> Result<MatchupOutcome, MatchupServiceError> {
        let selection = request.into_selection()?;
        self.run_selection(&selection, true).await
    }

    pub async fn run_selection(
        &self,
        selection: &MatchupSelection,
        with_commentary: bool,
    ) -> Result<MatchupOutcome, MatchupServiceError> {
        let mut result = self.compare(selection)?;
        info!(
            activity = %result.activity,
            athlete1 = %result.competitor1,
            athlete2 = %result.competitor2,
            winner = result.winner_label(),
            margin = result.margin,
            policy = %self.engine.policy(),
            "matchup decided"
        );

        let commentary = if with_commentary {
            self.narrate(&mut result).await
        } else {
            CommentaryStatus::Skipped
        };

        Ok(MatchupOutcome { result, commentary })
    }

    async fn narrate(&self, result: &mut ComparisonResult) -> CommentaryStatus {
        let request = CommentaryRequest::from_result(result);
        let attempt =
            tokio::time::timeout(self.commentary_timeout, self.commentary.generate(&request))
                .await
                .unwrap_or(Err(CommentaryError::Timeout(self.commentary_timeout)));

        match attempt {
            Ok(text) => {
                result.commentary = Some(text);
                CommentaryStatus::Generated
            }
            Err(err) => {
                warn!(
                    provider = self.commentary.provider_name(),
                    error = %err,
                    "commentary unavailable; returning comparison without it"
                );
                CommentaryStatus::Unavailable(err)
            }
        }
    }
}

/// Error raised by the matchup service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchupServiceError {
    #[error("Missing selection: {}", .0.join(", "))]
    MissingSelection(Vec<&'static str>),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}
