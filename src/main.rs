mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod mood;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiClient, CredentialStore, HttpTransport};
use crate::mood::{DaySeries, MoodTracker};
use crate::ui::chart::{ChartBoard, MOOD_CHART_MOUNT};
use crate::ui::status::StatusBar;

/// Variable holding the password for `mindwell login`.
const PASSWORD_ENV: &str = "MINDWELL_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "mindwell")]
#[command(about = "Track your mood from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/mindwell/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Server base URL, overriding the config file
  #[arg(short, long)]
  server: Option<String>,

  #[command(subcommand)]
  command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
  /// Open the interactive mood tracker (default)
  Tui,
  /// Log a mood, e.g. `mindwell log good 4`
  Log { mood: String, value: String },
  /// Print the last seven days
  History,
  /// Sign in and store the session token; password is read from MINDWELL_PASSWORD
  Login {
    #[arg(short, long)]
    email: String,
  },
  /// Forget the stored session token
  Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;
  let config = if let Some(server) = args.server {
    config::Config {
      api: config::ApiConfig {
        base_url: server,
        ..config.api
      },
      ..config
    }
  } else {
    config
  };

  let credentials = CredentialStore::default_location()?;

  match args.command.unwrap_or(CliCommand::Tui) {
    CliCommand::Tui => {
      let _guard = logging::init_file()?;
      let charts = ChartBoard::with_mount(MOOD_CHART_MOUNT);
      let status = StatusBar::new();
      let tracker = build_tracker(&config, credentials, charts.clone())?
        .with_notifier(Arc::new(status.clone()));

      let mut app = app::App::new(tracker, charts, status);
      app.run().await?;
    }
    CliCommand::Log { mood, value } => {
      logging::init_stderr();
      let tracker = build_tracker(&config, credentials, ChartBoard::new())?;
      let entry = tracker.log_mood(&mood, &value).await?;
      println!("Logged {} ({}) at {}", entry.mood, entry.value, entry.timestamp);
    }
    CliCommand::History => {
      logging::init_stderr();
      let tracker = build_tracker(&config, credentials, ChartBoard::new())?;
      let series = tracker.fetch_mood_history(true).await?;
      print_series(&series, &tracker);
    }
    CliCommand::Login { email } => {
      logging::init_stderr();
      let password = std::env::var(PASSWORD_ENV)
        .map_err(|_| eyre!("Password not found. Set the {} environment variable.", PASSWORD_ENV))?;
      let mut credentials = credentials;
      // A stale stored token is not sent along with the login
      let client = ApiClient::new(
        HttpTransport::new()?,
        config.base_url()?,
        CredentialStore::Fixed(None),
      );
      let token = client
        .login(&config.api.login_endpoint, &email, &password)
        .await?;
      credentials.save(&token)?;
      println!("Signed in as {}", email);
    }
    CliCommand::Logout => {
      let mut credentials = credentials;
      credentials.clear()?;
      println!("Signed out");
    }
  }

  Ok(())
}

fn build_tracker(
  config: &config::Config,
  credentials: CredentialStore,
  charts: ChartBoard,
) -> Result<MoodTracker<HttpTransport>> {
  let client = ApiClient::new(HttpTransport::new()?, config.base_url()?, credentials);
  Ok(MoodTracker::new(client, config.tracker_config(), charts))
}

fn print_series(series: &DaySeries, tracker: &MoodTracker<HttpTransport>) {
  for point in &series.points {
    match point.value {
      Some(value) => {
        let scale = tracker.scale();
        let mood = scale
          .label_for(value)
          .and_then(|label| scale.get(label))
          .map(|m| format!("{} {}", m.glyph, m.label))
          .unwrap_or_default();
        println!("{}  {}  {}", point.label, value, mood);
      }
      None => println!("{}  -", point.label),
    }
  }
}
