mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;
use std::fs::{File, OpenOptions};
use std::path::Path;

use cli::args::{Cli, Commands};
use cli::handlers;
use taqwim::config::AppConfig;
use taqwim::db::migrations::run_migrations;
use taqwim::utils::locale;

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Opening log file at {:?}", path))
}

/// Logs go to stderr, except under the dashboard where stderr is the
/// alternate screen; there they are appended to the log file instead.
fn init_logging(dashboard: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if dashboard {
        AppConfig::ensure_data_dir()?;
        let file = open_log_file(&AppConfig::log_path()?)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;
    let mut config = AppConfig::load().context("Loading config")?;
    if let Some(lang) = &cli.lang {
        if !locale::is_supported(lang) {
            log::warn!("Language '{}' has no locale table entry, using English glyphs", lang);
        }
        config.display.language = lang.clone();
    }
    let lang = config.display.language.clone();

    // `format` needs neither the cache nor the config file
    if let Some(Commands::Format { time }) = &cli.command {
        return handlers::handle_format(time, &lang);
    }

    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Import { file, system }) => {
            handlers::handle_import(&conn, &config, &file, system)?;
        }
        Some(Commands::Calendar { month }) => {
            handlers::handle_calendar(&conn, &config, &lang, &month)?;
        }
        Some(Commands::Month { month }) => {
            handlers::handle_month(&conn, &config, &lang, &month)?;
        }
        Some(Commands::Times { date }) => {
            handlers::handle_times(&conn, &config, &lang, date)?;
        }
        Some(Commands::Months) => {
            handlers::handle_months(&conn, &config)?;
        }
        Some(Commands::Clear) => {
            handlers::handle_clear(&conn)?;
        }
        Some(Commands::Format { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_appended_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taqwim.log");
        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn log_file_in_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("taqwim.log");
        assert!(open_log_file(&path).is_err());
    }
}
