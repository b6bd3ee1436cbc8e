//! `tenki` — JMA forecasts in the terminal, with a local history.
//!
//! # Usage
//!
//! ```text
//! tenki areas
//! tenki fetch 130000
//! tenki history 130000
//! tenki show 130000 2024-05-01
//! ```

mod app;
mod render;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use app::{App, AppError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use settings::Settings;
use tenki_core::forecast::today_in_japan;
use tenki_jma::JmaClient;
use tenki_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tenki", version, about = "JMA weather forecasts with local history")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "tenki.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List centers and their offices.
  Areas,
  /// Store the name of every office in the area table.
  SyncAreas,
  /// Fetch an office's forecast, store it and show the next three days.
  Fetch { office: String },
  /// Show the latest stored forecast of an office for one date.
  Show { office: String, date: NaiveDate },
  /// List the dates stored for an office.
  History { office: String },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config).context("failed to read configuration")?;
  let store_path = settings.store_path();

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let client = JmaClient::new(settings.jma_config()).context("failed to build JMA client")?;
  let app = App::new(client, store);

  match run(&app, cli.command).await {
    Ok(output) => {
      print!("{output}");
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      tracing::debug!(kind = ?e.kind(), "action failed");
      eprintln!("error: {e}");
      Ok(ExitCode::FAILURE)
    }
  }
}

async fn run(app: &App<SqliteStore>, command: Command) -> Result<String, AppError> {
  match command {
    Command::Areas => {
      let mut view = app.catalog_view().await;
      if let Some(e) = view.error.take() {
        return Err(e);
      }
      Ok(render::catalog(&view))
    }
    Command::SyncAreas => {
      let saved = app.sync_areas().await?;
      Ok(format!("stored {saved} office names\n"))
    }
    Command::Fetch { office } => {
      let selection = app.select(&office).await?;
      let summary = app.fetch_and_store(&selection).await?;
      let views = app.upcoming(&selection, today_in_japan()).await?;
      Ok(format!(
        "stored {} records from {} (reported {})\n{}",
        summary.saved,
        summary.forecast.office_code,
        summary.forecast.report_datetime,
        render::days(&selection, &views)
      ))
    }
    Command::Show { office, date } => {
      let selection = app.select_stored(&office).await?;
      let view = app.history(&selection, date).await?;
      Ok(render::days(&selection, &[view]))
    }
    Command::History { office } => {
      let selection = app.select_stored(&office).await?;
      let dates = app.history_dates(&selection).await?;
      Ok(render::dates(&selection, &dates))
    }
  }
}
