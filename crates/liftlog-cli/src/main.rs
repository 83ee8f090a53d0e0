//! Liftlog CLI - Log workouts from the terminal
//!
//! Every command works offline; changes queue locally and sync when the
//! server is reachable.

use clap::Parser;

mod cli;
mod commands;
mod error;

use cli::{Cli, Commands};
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("liftlog=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Add {
            date,
            notes,
            exercises,
        } => commands::add::run_add(date.as_deref(), notes, &exercises).await?,
        Commands::List { limit, json } => commands::list::run_list(limit, json).await?,
        Commands::Show { id, json } => commands::show::run_show(&id, json).await?,
        Commands::Edit {
            id,
            date,
            notes,
            exercises,
        } => commands::edit::run_edit(&id, date.as_deref(), notes, &exercises).await?,
        Commands::Delete { id } => commands::delete::run_delete(&id).await?,
        Commands::Stats { weeks, json } => commands::stats::run_stats(weeks, json).await?,
        Commands::History {
            exercise,
            limit,
            json,
        } => commands::history::run_history(&exercise, limit, json).await?,
        Commands::Sync => commands::sync::run_sync().await?,
        Commands::Status => commands::status::run_status().await?,
        Commands::Login { email, password } => {
            commands::auth_cmd::run_login(&email, &password).await?;
        }
        Commands::Logout => commands::auth_cmd::run_logout().await?,
        Commands::Catalog { query } => commands::catalog::run_catalog(query.as_deref()).await?,
        Commands::Config { unit, auto_sync } => {
            commands::config::run_config(unit.as_deref(), auto_sync.as_deref()).await?;
        }
    }

    Ok(())
}
