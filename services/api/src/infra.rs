use crystal_ball::config::{AppConfig, CommentaryConfig};
use crystal_ball::error::AppError;
use crystal_ball::matchup::{
    CommentaryGenerator, ComparisonEngine, DisabledCommentary, GeminiCommentary, MatchupService,
    Roster,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the roster and wires the engine and narrator described by `config`.
pub(crate) fn build_matchup_service(config: &AppConfig) -> Result<MatchupService, AppError> {
    let roster = Roster::from_paths(&config.roster.athletes_path, &config.roster.activities_path)?;
    info!(
        athletes = roster.competitor_names().len(),
        activities = roster.activity_names().len(),
        "roster loaded"
    );

    let engine = ComparisonEngine::new(Arc::new(roster), config.scoring.policy);
    let commentary = commentary_from_config(&config.commentary);

    Ok(MatchupService::new(
        Arc::new(engine),
        commentary,
        config.scoring.noise,
        config.commentary.timeout,
    ))
}

pub(crate) fn commentary_from_config(config: &CommentaryConfig) -> Arc<dyn CommentaryGenerator> {
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("GEMINI_API_KEY not set; matchups will be returned without commentary");
        return Arc::new(DisabledCommentary);
    };

    match GeminiCommentary::new(api_key, config.model.clone(), config.timeout) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "commentary client unavailable; continuing without it");
            Arc::new(DisabledCommentary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_key_disables_commentary() {
        let generator = commentary_from_config(&CommentaryConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(generator.provider_name(), "disabled");
    }

    #[test]
    fn configured_key_selects_gemini() {
        let generator = commentary_from_config(&CommentaryConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(generator.provider_name(), "gemini");
    }
}
