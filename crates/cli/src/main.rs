//! Fieldtrace command-line client
//!
//! The interactive surface over the auth and tracking services: login,
//! logout, check-in, check-out, status. Coordinates come from flags or
//! environment variables; on a real device they would come from the
//! platform geolocation API behind the same provider trait.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use fieldtrace_domain::{Config, Coordinates, LocationRecord, LoginCredentials};
use fieldtrace_infra::{
    ApiClient, AuthService, FileStore, FixedPositionProvider, KeyValueStore, StoredTokenProvider,
    TrackingService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldtrace", version, about = "Field check-in/check-out client")]
struct Cli {
    /// Directory holding the on-device key-value store
    #[arg(long, env = "FIELDTRACE_DATA_DIR", default_value = ".fieldtrace")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and store the session token
    Login {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        password: String,
    },
    /// End the session (token cleanup is best-effort)
    Logout,
    /// Record a check-in at the current position
    CheckIn(PositionArgs),
    /// Record a check-out, falling back to the last check-in position
    CheckOut(PositionArgs),
    /// Show session state, toggle state and the last records
    Status,
}

#[derive(Args)]
struct PositionArgs {
    /// Latitude of the current position
    #[arg(long, env = "FIELDTRACE_LAT", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the current position
    #[arg(long, env = "FIELDTRACE_LON", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Simulate the user denying location permission
    #[arg(long)]
    deny_location: bool,
}

impl PositionArgs {
    fn provider(&self) -> FixedPositionProvider {
        if self.deny_location {
            return FixedPositionProvider::denied();
        }
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => {
                FixedPositionProvider::new(Coordinates { latitude, longitude })
            }
            _ => FixedPositionProvider::unavailable(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging first so .env loading is visible.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    let config = fieldtrace_infra::config::load().context("could not load configuration")?;

    let store: Arc<FileStore> = Arc::new(
        FileStore::open(cli.data_dir.join("store.json"))
            .await
            .context("could not open local store")?,
    );
    let kv: Arc<dyn KeyValueStore> = store.clone();

    let tokens = Arc::new(StoredTokenProvider::new(kv.clone()));
    let api = Arc::new(ApiClient::new(config.api.clone(), tokens)?);

    match cli.command {
        Command::Login { user_name, password } => {
            let auth = AuthService::new(api, kv);
            let outcome = auth.login(LoginCredentials::new(user_name, password)).await?;
            if outcome.offline_demo {
                println!("Logged in with the demo account (server unreachable).");
            } else {
                println!("Logged in.");
            }
        }
        Command::Logout => {
            let auth = AuthService::new(api, kv)
                .with_logout_hook(|| println!("Returning to the login screen."));
            auth.restore().await;
            auth.logout().await;
            println!("Logged out.");
        }
        Command::CheckIn(position) => {
            let tracking = tracking_service(api, kv, &position, &config);
            tracking.restore().await;
            let record = tracking.check_in().await?;
            println!("Checked in.");
            print_record(&record);
        }
        Command::CheckOut(position) => {
            let tracking = tracking_service(api, kv, &position, &config);
            tracking.restore().await;
            let record = tracking.check_out().await?;
            println!("Checked out.");
            print_record(&record);
        }
        Command::Status => {
            let auth = AuthService::new(api.clone(), kv.clone());
            let session = auth.restore().await;

            let tracking = tracking_service(
                api,
                kv,
                &PositionArgs { lat: None, lon: None, deny_location: false },
                &config,
            );
            let toggle = tracking.restore().await;

            println!("Session:  {:?}", session);
            println!("Tracking: {:?}", toggle);
            println!("Device:   {}", tracking.device_id().await);

            if let Some(record) = tracking.last_check_in().await? {
                println!("Last check-in:");
                print_record(&record);
            }
            if let Some(record) = tracking.last_check_out().await? {
                println!("Last check-out:");
                print_record(&record);
            }
        }
    }

    Ok(())
}

fn tracking_service(
    api: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
    position: &PositionArgs,
    config: &Config,
) -> TrackingService {
    TrackingService::new(api, store, Arc::new(position.provider()), config.device.clone())
}

fn print_record(record: &LocationRecord) {
    println!("  device:    {}", record.device_id);
    println!("  latitude:  {}", record.latitude);
    println!("  longitude: {}", record.longitude);
    println!("  date:      {}", record.date);
    println!("  time:      {}", record.time);
}
