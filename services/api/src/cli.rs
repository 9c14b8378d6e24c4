use crate::console::{run_compare, run_roster, CompareArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use crystal_ball::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Crystal Ball",
    about = "Pit two competitors against each other and let fate (and a narrator) decide",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single matchup and print the result
    Compare(CompareArgs),
    /// List the loaded athletes and activities
    Roster(RosterArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Compare(args) => run_compare(args).await,
        Command::Roster(args) => run_roster(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crystal_ball::matchup::ScoringPolicy;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["crystal-ball"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn compare_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "crystal-ball",
            "compare",
            "Tiger Woods",
            "Donald Trump",
            "--activity",
            "Egg and Spoon",
            "--policy",
            "linear",
            "--seed",
            "9",
            "--skip-commentary",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Compare(args)) => {
                assert_eq!(args.athlete1, "Tiger Woods");
                assert_eq!(args.athlete2, "Donald Trump");
                assert_eq!(args.activity, "Egg and Spoon");
                assert_eq!(args.policy, Some(ScoringPolicy::Linear));
                assert_eq!(args.seed, Some(9));
                assert!(args.skip_commentary);
                assert!(!args.no_noise);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn seed_and_no_noise_conflict() {
        let err = Cli::try_parse_from([
            "crystal-ball",
            "compare",
            "A",
            "B",
            "--activity",
            "Sprint",
            "--seed",
            "1",
            "--no-noise",
        ])
        .expect_err("conflicting flags");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn serve_accepts_host_and_port() {
        let cli = Cli::try_parse_from(["crystal-ball", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
