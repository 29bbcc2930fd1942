//! Process configuration read from the environment

use std::env;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Country calling code prefixed to national phone numbers
pub const DEFAULT_PHONE_COUNTRY_CODE: &str = "+44";

const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Public base URL of the web app; invitation links hang off it
    pub app_base_url: String,

    /// Prefix for phone numbers given without one, e.g. `+44`
    pub phone_country_code: String,

    pub rust_log: String,
    pub port: u16,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            app_base_url: var_or("APP_BASE_URL", DEFAULT_APP_BASE_URL),
            phone_country_code: var_or("PHONE_COUNTRY_CODE", DEFAULT_PHONE_COUNTRY_CODE),
            rust_log: var_or("RUST_LOG", "roster=debug"),
            port,
        };
        config.check()?;

        Ok(config)
    }

    fn check(&self) -> Result<()> {
        let digits = self.phone_country_code.strip_prefix('+').unwrap_or("");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            bail!(
                "PHONE_COUNTRY_CODE must be '+' followed by digits, got {}",
                self.phone_country_code
            );
        }
        Ok(())
    }
}
