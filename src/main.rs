mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cli::{HistoryCommands, MealCommands, ProfileCommands, ThemeCommands};

#[derive(Parser)]
#[command(name = "aaharwise")]
#[command(about = "Nutrition journal with daily AI health forecasts")]
#[command(version)]
struct Args {
    /// Directory holding config.json and the journal
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Log, scan and remove today's meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Add water intake in millilitres
    Water {
        amount_ml: u32,
    },
    /// Today's totals against your targets
    Summary,
    /// Close the day and ask the coach for a forecast
    Analyze,
    /// Past daily logs
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Export today's meals as CSV
    Export {
        /// Output directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Light or dark accents
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "aaharwise=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();
    let data_dir = args.data_dir;

    match args.command {
        Commands::Profile { command } => cli::handle_profile(command, data_dir),
        Commands::Meal { command } => cli::handle_meal(command, data_dir).await,
        Commands::Water { amount_ml } => cli::handle_water(amount_ml, data_dir),
        Commands::Summary => cli::handle_summary(data_dir),
        Commands::Analyze => cli::handle_analyze(data_dir).await,
        Commands::History { command } => cli::handle_history(command, data_dir),
        Commands::Export { out } => cli::handle_export(out, data_dir),
        Commands::Theme { command } => cli::handle_theme(command, data_dir),
    }
}
