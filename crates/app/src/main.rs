use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use drill_core::model::{SessionOptions, SessionType};
use services::stats_view::DEFAULT_MIN_SAMPLES;
use services::{AppServices, Clock};

mod commands;
mod config;
mod format;

use commands::manage::{HistoryAction, SettingsAction, TemplateAction};
use commands::practice::CustomArgs;

#[derive(Debug, Parser)]
#[command(name = "drill", version, about = "Timed arithmetic and matrix practice")]
struct Cli {
    /// SQLite database url or path
    #[arg(long, global = true, env = "DRILL_DB_URL", default_value = config::DEFAULT_DB_URL)]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Practice every pair of the default range (e.g. `add`, `sqr`, `matrix-mul`)
    Practice { session_type: SessionType },
    /// Practice with custom operands and ordering
    Custom(CustomArgs),
    /// Manage saved custom sessions
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Per-type statistics, or an overview without a type
    Stats {
        session_type: Option<SessionType>,
        /// Sessions needed before a pair's average is shown
        #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES)]
        min_samples: usize,
    },
    /// Browse or prune session history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print all data as portable text
    Export,
    /// Replace all data with previously exported text
    Import { text: String },
    /// Delete all sessions, templates and settings
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let db_url = config::normalize_sqlite_url(&cli.db);
    // Open + migrate SQLite at startup; core and services stay storage-agnostic.
    config::prepare_sqlite_file(&db_url)?;
    let mut services = AppServices::new_sqlite(&db_url, Clock::default_clock()).await?;

    match cli.command {
        Commands::Practice { session_type } => {
            commands::practice::run(&mut services, &SessionOptions::default_for(session_type))
                .await
        }
        Commands::Custom(args) => commands::practice::custom(&mut services, &args).await,
        Commands::Template { action } => commands::manage::template(&mut services, action).await,
        Commands::Stats {
            session_type,
            min_samples,
        } => {
            commands::stats::show(&services, session_type, min_samples);
            Ok(())
        }
        Commands::History { action } => commands::manage::history(&mut services, action).await,
        Commands::Settings { action } => commands::manage::settings(&mut services, action).await,
        Commands::Export => commands::manage::export(&services),
        Commands::Import { text } => commands::manage::import(&mut services, &text).await,
        Commands::Reset { yes } => commands::manage::reset(&mut services, yes).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();
    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn practice_parses_session_type_keys() {
        let cli = Cli::try_parse_from(["drill", "practice", "matrix-mul"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Practice {
                session_type: SessionType::Matrix(_)
            }
        ));
        assert!(Cli::try_parse_from(["drill", "practice", "pow"]).is_err());
    }

    #[test]
    fn reset_takes_a_confirmation_flag() {
        let cli = Cli::try_parse_from(["drill", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: true }));
        let cli = Cli::try_parse_from(["drill", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: false }));
    }

    #[test]
    fn custom_pool_conflicts_with_range() {
        let parsed = Cli::try_parse_from([
            "drill", "custom", "--type", "mul", "--pool", "3,4", "--min", "2",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["drill", "custom", "--type", "mul", "--pool", "3,4"])
            .unwrap();
        let Commands::Custom(args) = cli.command else {
            panic!("expected custom command");
        };
        assert_eq!(args.pool, vec![3, 4]);
    }
}
