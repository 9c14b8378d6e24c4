use crate::infra::build_matchup_service;
use clap::Args;
use crystal_ball::config::AppConfig;
use crystal_ball::error::AppError;
use crystal_ball::matchup::{
    CommentaryStatus, MatchupOutcome, MatchupRequest, NoiseMode, Roster, ScoringPolicy,
};

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// First athlete (exact roster name)
    pub(crate) athlete1: String,
    /// Second athlete (exact roster name)
    pub(crate) athlete2: String,
    /// Activity to compete in
    #[arg(long)]
    pub(crate) activity: String,
    /// Scoring policy: linear, normalized, or normalized-compounding
    #[arg(long)]
    pub(crate) policy: Option<ScoringPolicy>,
    /// Seed the noise so the matchup can be replayed
    #[arg(long, conflicts_with = "no_noise")]
    pub(crate) seed: Option<u64>,
    /// Score without any randomness
    #[arg(long)]
    pub(crate) no_noise: bool,
    /// Do not call the commentary provider
    #[arg(long)]
    pub(crate) skip_commentary: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RosterArgs {
    /// Include each activity's attribute weights
    #[arg(long)]
    pub(crate) weights: bool,
}

pub(crate) async fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let CompareArgs {
        athlete1,
        athlete2,
        activity,
        policy,
        seed,
        no_noise,
        skip_commentary,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(policy) = policy {
        config.scoring.policy = policy;
    }
    if let Some(seed) = seed {
        config.scoring.noise = NoiseMode::Seeded(seed);
    }
    if no_noise {
        config.scoring.noise = NoiseMode::Disabled;
    }

    let service = build_matchup_service(&config)?;
    let selection = MatchupRequest::new(athlete1, athlete2, activity).into_selection()?;
    let outcome = service.run_selection(&selection, !skip_commentary).await?;

    if json {
        match serde_json::to_string_pretty(&outcome.view()) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("JSON output unavailable: {err}"),
        }
    } else {
        render_outcome(&outcome, config.scoring.policy, service.noise());
    }

    Ok(())
}

pub(crate) fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let roster = Roster::from_paths(&config.roster.athletes_path, &config.roster.activities_path)?;
    render_roster(&roster, args.weights);
    Ok(())
}

fn render_outcome(outcome: &MatchupOutcome, policy: ScoringPolicy, noise: NoiseMode) {
    let result = &outcome.result;
    println!(
        "{}: {} vs {} ({} scoring, {} noise)",
        result.activity,
        result.competitor1,
        result.competitor2,
        policy,
        noise.label()
    );
    println!("- {}: {:.2}", result.competitor1, result.score1);
    println!("- {}: {:.2}", result.competitor2, result.score2);

    if result.verdict.is_draw() {
        println!("\nResult: a dead heat (margin {:.2})", result.margin);
    } else {
        println!(
            "\nWinner: {} (margin {:.2})",
            result.winner_label(),
            result.margin
        );
    }

    match (&outcome.commentary, &result.commentary) {
        (CommentaryStatus::Generated, Some(text)) => println!("\nCommentary\n{text}"),
        (CommentaryStatus::Unavailable(err), _) => println!("\nCommentary unavailable: {err}"),
        _ => {}
    }
}

fn render_roster(roster: &Roster, include_weights: bool) {
    println!("Athletes");
    for name in roster.competitor_names() {
        println!("- {name}");
    }

    println!("\nActivities");
    for name in roster.activity_names() {
        println!("- {name}");
        if !include_weights {
            continue;
        }
        if let Some(activity) = roster.activity(&name) {
            for (attribute, weight) in &activity.weights {
                println!("    {attribute}: {weight}");
            }
        }
    }
}
