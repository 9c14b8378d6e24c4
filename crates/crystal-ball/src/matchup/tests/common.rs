use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::matchup::{
    Activity, AttributeMap, CommentaryError, CommentaryGenerator, CommentaryRequest,
    ComparisonEngine, Competitor, MatchupService, NoiseMode, NoiseSource, Roster, ScoringPolicy,
};

pub(super) fn attributes(pairs: &[(&str, f64)]) -> AttributeMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn roster() -> Roster {
    Roster::new(
        vec![
            Competitor::new("Speedy", attributes(&[("speed", 10.0)])),
            Competitor::new("Slowpoke", attributes(&[("speed", 2.0)])),
            Competitor::new("Twin A", attributes(&[("speed", 5.0), ("stamina", 3.0)])),
            Competitor::new("Twin B", attributes(&[("speed", 5.0), ("stamina", 3.0)])),
            Competitor::new("Glass Cannon", attributes(&[("strength", -4.0)])),
        ],
        vec![
            Activity::new("Sprint", attributes(&[("speed", 1.0)])),
            Activity::new("Marathon", attributes(&[("speed", 0.5), ("stamina", 2.0)])),
            Activity::new("Arm Wrestling", attributes(&[("strength", 1.0), ("grip", 2.0)])),
            Activity::new("Nap", AttributeMap::new()),
        ],
    )
    .expect("fixture roster is valid")
}

pub(super) fn engine(policy: ScoringPolicy) -> ComparisonEngine {
    ComparisonEngine::new(Arc::new(roster()), policy)
}

pub(super) fn service<C>(commentary: C, noise: NoiseMode, timeout: Duration) -> MatchupService
where
    C: CommentaryGenerator + 'static,
{
    MatchupService::new(
        Arc::new(engine(ScoringPolicy::Linear)),
        Arc::new(commentary),
        noise,
        timeout,
    )
}

/// Which distribution a scoring rule asked for, in call order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Draw {
    Uniform(f64, f64),
    Gaussian(f64, f64),
}

/// Behaves like `Noiseless` but remembers every request.
#[derive(Debug, Default)]
pub(super) struct RecordingNoise {
    pub(super) draws: Vec<Draw>,
}

impl NoiseSource for RecordingNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.draws.push(Draw::Uniform(low, high));
        (low + high) / 2.0
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.draws.push(Draw::Gaussian(mean, std_dev));
        mean
    }
}

pub(super) struct FixedCommentary(pub(super) &'static str);

#[async_trait]
impl CommentaryGenerator for FixedCommentary {
    async fn generate(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
        Ok(self.0.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

pub(super) struct FailingCommentary(pub(super) CommentaryError);

#[async_trait]
impl CommentaryGenerator for FailingCommentary {
    async fn generate(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
        Err(self.0.clone())
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

pub(super) struct SlowCommentary(pub(super) Duration);

#[async_trait]
impl CommentaryGenerator for SlowCommentary {
    async fn generate(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
        tokio::time::sleep(self.0).await;
        Ok("far too late".to_string())
    }

    fn provider_name(&self) -> &'static str {
        "slow"
    }
}

#[derive(Clone, Default)]
pub(super) struct RecordingCommentary {
    requests: Arc<Mutex<Vec<CommentaryRequest>>>,
}

impl RecordingCommentary {
    pub(super) fn requests(&self) -> Vec<CommentaryRequest> {
        self.requests.lock().expect("commentary mutex poisoned").clone()
    }
}

#[async_trait]
impl CommentaryGenerator for RecordingCommentary {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
        self.requests
            .lock()
            .expect("commentary mutex poisoned")
            .push(request.clone());
        Ok("recorded".to_string())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}
