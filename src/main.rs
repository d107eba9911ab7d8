use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use scoreline::config::Config;
use scoreline::domain::{LeagueCode, Season};
use scoreline::pipeline::Pipeline;
use scoreline::store::Store;

#[derive(Parser)]
#[command(name = "scoreline", version, about = "Aggregate football match data from multiple sources")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "scoreline.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch standings and matches for a league and reconcile them.
    Sync {
        /// League code, e.g. EPL, LA_LIGA, SERIE_A.
        #[arg(long, value_parser = parse_league)]
        league: LeagueCode,
        /// Season in YYYY-YY form, e.g. 2023-24.
        #[arg(long, value_parser = parse_season)]
        season: Season,
        /// Only reconcile standings; skip the match stage.
        #[arg(long)]
        skip_matches: bool,
    },
    /// Fetch bookmaker odds for a league and store them.
    Odds {
        /// League code, e.g. EPL, LA_LIGA, SERIE_A.
        #[arg(long, value_parser = parse_league)]
        league: LeagueCode,
        /// Restrict storage to one persisted match id.
        #[arg(long)]
        match_id: Option<i32>,
    },
}

fn parse_league(value: &str) -> Result<LeagueCode, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_season(value: &str) -> Result<Season, String> {
    value.parse().map_err(|e| format!("{e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::from(2);
        }
    };
    config.init_logging();

    let store = match Store::open(&config.database.url) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to open database");
            return ExitCode::FAILURE;
        }
    };
    let pipeline = match Pipeline::from_config(&config, store) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "failed to build pipeline");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Sync {
            league,
            season,
            skip_matches,
        } => match pipeline.run_full_pipeline(league, &season, !skip_matches).await {
            Ok(summary) => {
                println!("{summary}");
                for failure in &summary.errors {
                    println!("  source error: {failure}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "pipeline run failed");
                eprintln!("Pipeline failed: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Odds { league, match_id } => {
            match pipeline.fetch_and_store_odds(league, match_id).await {
                Ok(summary) => {
                    println!("{summary}");
                    for message in &summary.errors {
                        println!("  odds error: {message}");
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "odds ingestion failed");
                    eprintln!("Odds ingestion failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
