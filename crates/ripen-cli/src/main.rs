#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use ripen_core::config::resolve_config;
use ripen_core::error::ErrorCode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "ripen",
    author,
    version,
    about = "ripen: card maturity and retention over time from a review log",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Configuration file. Defaults to ./ripen.toml, then the user config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Reports",
        about = "Chart card maturity in day, week, or month buckets",
        after_help = "EXAMPLES:\n    # Last three months of a collection\n    ripen report --db collection.anki2\n\n    # One deck, weekly buckets, as JSON\n    ripen report --db collection.anki2 --deck 'Lang::French' --width 7 --json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Show the day-by-day replay behind a report"
    )]
    Daily(cmd::daily::DailyArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Show the effective configuration"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    ripen completions bash > ~/.local/share/bash-completion/completions/ripen"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RIPEN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "ripen=debug,info"
        } else {
            "ripen=info,warn"
        })
    });

    let format = env::var("RIPEN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let working_dir = env::current_dir()?;
    let output = cli.output_mode();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args, &mut command);
    }

    let effective = match resolve_config(cli.config.as_deref(), &working_dir) {
        Ok(effective) => effective,
        Err(err) => {
            let shown = CliError::new(ErrorCode::ConfigLoadError, format!("{err:#}"));
            render_error(output, &shown)?;
            return Err(err);
        }
    };
    debug!(source = ?effective.source, "resolved configuration");

    match &cli.command {
        Commands::Report(args) => cmd::report::run_report(args, &effective.chart, output),
        Commands::Daily(args) => cmd::daily::run_daily(args, &effective.chart, output),
        Commands::Config(args) => cmd::config::run_config(args, &effective, output),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripen_core::window::Period;

    #[test]
    fn report_subcommand_parses() {
        let cli = Cli::parse_from(["ripen", "report", "--db", "c.anki2"]);
        let Commands::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.window.period, Period::ThreeMonths);
        assert!(args.window.deck.is_none());
        assert!(!args.window.main);
    }

    #[test]
    fn period_and_width_parse() {
        let cli = Cli::parse_from([
            "ripen", "daily", "--db", "c.anki2", "--period", "2y", "--width", "14",
        ]);
        let Commands::Daily(args) = cli.command else {
            panic!("expected daily");
        };
        assert_eq!(args.window.period, Period::Years(2));
        assert_eq!(args.window.width, Some(14));
    }

    #[test]
    fn unknown_period_is_rejected() {
        let result = Cli::try_parse_from(["ripen", "report", "--db", "c.anki2", "--period", "5w"]);
        assert!(result.is_err());
    }

    #[test]
    fn main_conflicts_with_width() {
        let result = Cli::try_parse_from([
            "ripen", "report", "--db", "c.anki2", "--main", "--width", "7",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["ripen", "config", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["ripen", "--format", "text", "config"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["ripen", "config", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["ripen", "completions", "zsh"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn command_is_named_after_the_binary() {
        assert_eq!(Cli::command().get_name(), "ripen");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
