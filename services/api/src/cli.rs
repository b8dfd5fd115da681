use crate::demo::{run_demo, run_match, run_suggest, DemoArgs, MatchArgs, SuggestArgs};
use crate::server;
use career_match::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Career Match",
    about = "Serve and explore skill-to-job matching from the command line",
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
    /// Rank catalog postings against a set of skills
    Match(MatchArgs),
    /// Autocomplete a skill prefix against the vocabulary
    Suggest(SuggestArgs),
    /// Walk through a matching session, including a superseded analysis
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
    /// Job catalog CSV export (defaults to MATCH_CATALOG_CSV, then the built-in postings)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["career-match-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn match_accepts_comma_separated_skills() {
        let cli = Cli::try_parse_from([
            "career-match-api",
            "match",
            "--skill",
            "JavaScript,React",
            "--skill",
            "Node.js",
            "--top-n",
            "2",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Match(args)) => {
                assert_eq!(args.skills, vec!["JavaScript", "React", "Node.js"]);
                assert_eq!(args.top_n, Some(2));
                assert!(!args.json);
            }
            other => panic!("expected match command, got {other:?}"),
        }
    }

    #[test]
    fn suggest_requires_prefix() {
        assert!(Cli::try_parse_from(["career-match-api", "suggest"]).is_err());

        let cli = Cli::try_parse_from(["career-match-api", "suggest", "java", "--exclude", "Java"])
            .expect("parses");
        match cli.command {
            Some(Command::Suggest(args)) => {
                assert_eq!(args.prefix, "java");
                assert_eq!(args.exclude, vec!["Java"]);
            }
            other => panic!("expected suggest command, got {other:?}"),
        }
    }
}
