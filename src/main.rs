mod cli;
mod config;
mod db;
mod models;
mod prayer_times;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    match cli.command {
        // Config commands never touch the database
        Some(Commands::Config { action }) => handlers::handle_config(&config, &action)?,
        None => handlers::handle_status(&open_db()?, &config, None, false)?,
        Some(Commands::Status { at, json }) => {
            handlers::handle_status(&open_db()?, &config, at.as_deref(), json)?;
        }
        Some(Commands::Times { date, prayer }) => {
            handlers::handle_times(&open_db()?, &config, date.as_deref(), prayer.as_deref())?;
        }
        Some(Commands::Watch { interval, count }) => {
            handlers::handle_watch(&open_db()?, &config, interval, count)?;
        }
        Some(Commands::Cache { action }) => {
            handlers::handle_cache(&open_db()?, &config, &action)?;
        }
    }

    Ok(())
}

fn open_db() -> Result<Connection> {
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    Ok(conn)
}
