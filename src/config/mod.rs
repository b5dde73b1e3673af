use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Path of the invoice listing that actions invalidate and redirect to
pub const DEFAULT_INVOICES_PATH: &str = "/dashboard/invoices";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Size of the connection pool
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Listing path refreshed after every successful write
    #[serde(default = "default_invoices_path")]
    pub invoices_path: String,

    /// Opt-in for the delete path, which otherwise always fails
    #[serde(default)]
    pub invoice_delete_enabled: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_invoices_path() -> String {
    DEFAULT_INVOICES_PATH.to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}
