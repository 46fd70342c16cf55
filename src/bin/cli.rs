use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use now_playing_kiosk as lib;
use lib::config::Config;
use lib::credentials::CredentialStore;
use lib::display::{Artwork, LogSink};
use lib::player::PlayerClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "now-playing-kiosk", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the poll loop (long-running)
    Run,
    /// Run a single poll cycle and print the resulting display update
    Once,
    /// Fetch and print the weather report
    Weather,
    /// Send a playback command to the active device
    Control {
        #[command(subcommand)]
        action: ControlCommands,
    },
    /// Validate config file and exit
    ConfigValidate,
}

#[derive(Subcommand)]
enum ControlCommands {
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to the next track
    Next,
    /// Skip to the previous track
    Previous,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Resolve config path: explicit --config overrides; otherwise prefer the
    // system-wide config and fall back to the repository example config for
    // local/dev usage.
    let resolved_config_path: PathBuf = match &cli.config {
        Some(p) => p.clone(),
        None => {
            let etc_path = Path::new("/etc/now-playing-kiosk/config.toml");
            if etc_path.exists() {
                etc_path.to_path_buf()
            } else {
                PathBuf::from("config/example-config.toml")
            }
        }
    };

    let cfg = Config::from_path(&resolved_config_path)
        .with_context(|| format!("loading config from {}", resolved_config_path.display()))?;

    // Initialize log->tracing bridge and structured logging.
    // Logs go to both stdout and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "now-playing-kiosk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);

    tracing_subscriber_global::set_global_default(subscriber)
        .expect("failed to set global tracing subscriber");

    let timeout = Duration::from_secs(cfg.request_timeout_secs);

    match cli.command {
        Commands::Run => {
            let store = CredentialStore::new(&cfg.credentials_path);
            let player = PlayerClient::new(store, timeout)
                .with_context(|| "building player client".to_string())?;
            let mut sink = LogSink;
            poll_forever(&player, &mut sink, &cfg).await?;
        }
        Commands::Once => {
            let store = CredentialStore::new(&cfg.credentials_path);
            let player = PlayerClient::new(store, timeout)
                .with_context(|| "building player client".to_string())?;
            let state = player
                .fetch()
                .await
                .with_context(|| "fetching playback state".to_string())?;
            let update = lib::display::reconcile(state);
            println!("track:   {}", update.track_text);
            println!("artist:  {}", update.artist_text);
            println!("control: {}", update.control_label);
            match &update.artwork {
                Artwork::Url(u) => println!("artwork: {}", u),
                Artwork::Fallback => println!("artwork: {} (fallback)", cfg.fallback_image),
            }
        }
        Commands::Weather => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let report = lib::weather::fetch_weather(&client, &lib::weather::base(), &cfg.weather)
                .await
                .with_context(|| "fetching weather".to_string())?;
            println!("{}hrs", report.observed_at);
            println!("{} °C (feels like {} °C)", report.temperature_c, report.apparent_temperature_c);
            println!("max {} °C / min {} °C", report.max_temperature_c, report.min_temperature_c);
            println!("{} hrs Daylight", report.daylight_hours);
            println!("Sunrise {}  Sunset {}", report.sunrise, report.sunset);
            println!("Current PP {} mm  PP Hours {} h", report.precipitation_mm, report.precipitation_hours);
        }
        Commands::Control { action } => {
            let store = CredentialStore::new(&cfg.credentials_path);
            let player = PlayerClient::new(store, timeout)
                .with_context(|| "building player client".to_string())?;
            match action {
                ControlCommands::Play => player.play().await?,
                ControlCommands::Pause => player.pause().await?,
                ControlCommands::Next => player.next().await?,
                ControlCommands::Previous => player.previous().await?,
            }
        }
        Commands::ConfigValidate => match Config::from_path(resolved_config_path.as_path()) {
            Ok(_) => println!("OK"),
            Err(e) => {
                eprintln!("Config validation failed: {}", e);
                std::process::exit(2);
            }
        },
    }

    Ok(())
}

async fn poll_forever(
    player: &PlayerClient,
    sink: &mut LogSink,
    cfg: &Config,
) -> Result<()> {
    let interval = Duration::from_millis(cfg.poll_interval_ms);
    lib::poll::run(player, sink, interval)
        .await
        .with_context(|| "running poll loop".to_string())
}
