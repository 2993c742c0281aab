//! Configuration
//!
//! Settings for the remote collaborators, loaded from CLI arguments with
//! environment fallbacks and an optional `.env` file.

use clap::{Args, Parser};

/// Hosted data store settings.
#[derive(Debug, Clone, Args)]
pub struct RemoteConfig {
    /// Base URL of the hosted data store, e.g. `https://xyz.example.co`
    #[arg(long, env = "KILIMA_REMOTE_URL")]
    pub remote_url: String,

    /// API key sent with every data store request
    #[arg(long, env = "KILIMA_REMOTE_API_KEY")]
    pub remote_api_key: String,

    /// Table receiving order-intent rows
    #[arg(long, env = "KILIMA_ORDERS_TABLE", default_value = "bookings")]
    pub orders_table: String,
}

/// Outbound notification settings.
#[derive(Debug, Clone, Args)]
pub struct NotifyConfig {
    /// Serverless function URL triggered after a successful checkout;
    /// notifications are skipped when unset
    #[arg(long, env = "KILIMA_NOTIFY_URL")]
    pub notify_url: Option<String>,
}

/// Kilima booking core configuration.
#[derive(Debug, Parser)]
#[command(name = "kilima", about = "Kilima booking core", long_about = None)]
pub struct Config {
    /// Hosted data store settings.
    #[command(flatten)]
    pub remote: RemoteConfig,

    /// Outbound notification settings.
    #[command(flatten)]
    pub notify: NotifyConfig,

    /// Chat contact (international phone number, digits only) for the
    /// message-export checkout path
    #[arg(long, env = "KILIMA_CHAT_CONTACT")]
    pub chat_contact: Option<String>,
}

impl Config {
    /// Load configuration from environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
