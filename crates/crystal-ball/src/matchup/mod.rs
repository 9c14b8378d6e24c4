//! Head-to-head matchups: roster lookups, randomized scoring, verdicts, and
//! optional commentary from a text-generation provider.

pub mod commentary;
pub mod domain;
pub mod engine;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use commentary::{
    CommentaryError, CommentaryGenerator, CommentaryRequest, DisabledCommentary, GeminiCommentary,
};
pub use domain::{Activity, AttributeMap, ComparisonResult, Competitor, Verdict, DRAW_LABEL};
pub use engine::{ComparisonEngine, ComparisonError};
pub use roster::{Roster, RosterError, RosterSource};
pub use router::matchup_router;
pub use scoring::{
    NoiseMode, NoiseSource, Noiseless, Normalization, ParseNoiseModeError,
    ParseScoringPolicyError, RandomNoise, ScoreCalculator, ScoringPolicy,
};
pub use service::{
    CommentaryStatus, MatchupOutcome, MatchupRequest, MatchupSelection, MatchupService,
    MatchupServiceError, MatchupView,
};
