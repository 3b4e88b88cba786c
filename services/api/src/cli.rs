use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rmi_audit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RMI Audit",
    about = "Score reliability maturity assessments and serve the scoring API",
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
    /// Score an assessment snapshot file offline
    Score(ScoreArgs),
    /// Score the built-in sample assessment and print the summary
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "rmi-audit",
            "score",
            "--snapshot",
            "plant.json",
            "--methodology",
            "v2.json",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.snapshot.to_str(), Some("plant.json"));
                assert!(args.methodology.is_some());
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["rmi-audit"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
